//! Template catalog and layout parameters

use crate::layout::{Point, Rect};
use pdf_core::{Align, Color, PageSize, StandardFont};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Page margin of the classic layout, also the right margin of every flow
const MARGIN: f64 = 50.0;

/// The three visual templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateKind {
    #[default]
    Classic,
    Modern,
    Creative,
}

impl TemplateKind {
    /// All templates, in display order
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::Classic,
        TemplateKind::Modern,
        TemplateKind::Creative,
    ];

    /// Wire identifier
    pub fn id(self) -> &'static str {
        match self {
            TemplateKind::Classic => "classic",
            TemplateKind::Modern => "modern",
            TemplateKind::Creative => "creative",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TemplateKind::Classic => "Classic",
            TemplateKind::Modern => "Modern",
            TemplateKind::Creative => "Creative",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateKind::Classic => {
                "Clean, minimal, and professional look for traditional resumes."
            }
            TemplateKind::Modern => "Bold header with profile photo support and sleek styling.",
            TemplateKind::Creative => {
                "Stylish sidebar layout with accent colors and strong visuals."
            }
        }
    }

    /// Map an identifier to a template; unknown or empty ids fall back to classic
    pub fn from_id(id: &str) -> Self {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id))
            .unwrap_or_default()
    }

    /// Layout parameters of this template on an A4 page
    pub fn spec(self) -> TemplateSpec {
        let page = PageSize::A4;

        match self {
            TemplateKind::Classic => TemplateSpec {
                kind: self,
                page,
                header_style: HeaderStyle::Plain,
                header_color: Color::white(),
                name_style: TextStyle {
                    font: StandardFont::HelveticaBold,
                    size: 20.0,
                    color: Color::black(),
                    position: None,
                    width: page.width - 2.0 * MARGIN,
                    space_after: 0.2,
                },
                title_style: TextStyle {
                    font: StandardFont::HelveticaOblique,
                    size: 11.0,
                    color: Color::from_rgb(0x55, 0x55, 0x55),
                    position: None,
                    width: page.width - 2.0 * MARGIN,
                    space_after: 0.6,
                },
                image_placement: None,
                show_contact_inline: true,
                multi_page: false,
                flow_origin: Point::new(MARGIN, MARGIN),
                flow_width: page.width - 2.0 * MARGIN,
            },
            TemplateKind::Modern => {
                let banner_height = 90.0;
                TemplateSpec {
                    kind: self,
                    page,
                    header_style: HeaderStyle::Banner {
                        height: banner_height,
                    },
                    header_color: Color::from_rgb(0x0e, 0xa5, 0xa4),
                    name_style: TextStyle {
                        font: StandardFont::HelveticaBold,
                        size: 22.0,
                        color: Color::white(),
                        position: Some(Point::new(40.0, 26.0)),
                        width: page.width - 40.0 - MARGIN,
                        space_after: 0.0,
                    },
                    title_style: TextStyle {
                        font: StandardFont::Helvetica,
                        size: 10.0,
                        color: Color::white(),
                        position: Some(Point::new(40.0, 52.0)),
                        width: page.width - 40.0 - MARGIN,
                        space_after: 0.0,
                    },
                    image_placement: Some(ImagePlacement {
                        rect: Rect::new(450.0, 18.0, 80.0, 80.0),
                        align: Align::Right,
                    }),
                    show_contact_inline: true,
                    multi_page: false,
                    flow_origin: Point::new(40.0, banner_height + 12.0),
                    flow_width: page.width - 40.0 - MARGIN,
                }
            }
            TemplateKind::Creative => {
                let sidebar_width = 160.0;
                TemplateSpec {
                    kind: self,
                    page,
                    header_style: HeaderStyle::Sidebar {
                        width: sidebar_width,
                    },
                    header_color: Color::from_rgb(0x7c, 0x3a, 0xed),
                    name_style: TextStyle {
                        font: StandardFont::HelveticaBold,
                        size: 20.0,
                        color: Color::white(),
                        position: Some(Point::new(20.0, 40.0)),
                        width: 120.0,
                        space_after: 0.0,
                    },
                    title_style: TextStyle {
                        font: StandardFont::Helvetica,
                        size: 10.0,
                        color: Color::from_rgb(0xe6, 0xe6, 0xfa),
                        position: Some(Point::new(20.0, 80.0)),
                        width: 120.0,
                        space_after: 0.0,
                    },
                    image_placement: Some(ImagePlacement {
                        rect: Rect::new(30.0, 140.0, 100.0, 100.0),
                        align: Align::Left,
                    }),
                    show_contact_inline: false,
                    multi_page: true,
                    flow_origin: Point::new(sidebar_width + 20.0, 40.0),
                    flow_width: page.width - (sidebar_width + 20.0) - MARGIN,
                }
            }
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for TemplateKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Lenient: any string maps through `from_id`, anything else is classic
impl<'de> Deserialize<'de> for TemplateKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(id)) => TemplateKind::from_id(&id),
            _ => TemplateKind::default(),
        })
    }
}

/// Resolve a template identifier to its layout parameters
pub fn resolve(id: &str) -> TemplateSpec {
    TemplateKind::from_id(id).spec()
}

/// How the name/title header is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderStyle {
    /// Name and title are part of the text flow
    Plain,
    /// Full-width colored band across the top of the page
    Banner { height: f64 },
    /// Full-height colored column on the left of the page
    Sidebar { width: f64 },
}

/// Font, color and placement of a header line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
    /// Fixed top-left position, or `None` to place the line in the flow
    pub position: Option<Point>,
    /// Wrap width in points
    pub width: f64,
    /// Lines to move down after a flow line
    pub space_after: f64,
}

/// Profile image box; images are fit inside preserving aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub rect: Rect,
    pub align: Align,
}

/// Layout parameters derived from a `TemplateKind`
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSpec {
    pub kind: TemplateKind,
    pub page: PageSize,
    pub header_style: HeaderStyle,
    pub header_color: Color,
    pub name_style: TextStyle,
    pub title_style: TextStyle,
    pub image_placement: Option<ImagePlacement>,
    pub show_contact_inline: bool,
    pub multi_page: bool,
    /// Top-left of the main text flow
    pub flow_origin: Point,
    pub flow_width: f64,
}

impl TemplateSpec {
    pub fn sidebar_width(&self) -> Option<f64> {
        match self.header_style {
            HeaderStyle::Sidebar { width } => Some(width),
            _ => None,
        }
    }

    /// Rectangle filled with `header_color`, if the header style has one
    pub fn header_rect(&self) -> Option<Rect> {
        match self.header_style {
            HeaderStyle::Plain => None,
            HeaderStyle::Banner { height } => Some(Rect::new(0.0, 0.0, self.page.width, height)),
            HeaderStyle::Sidebar { width } => Some(Rect::new(0.0, 0.0, width, self.page.height)),
        }
    }
}
