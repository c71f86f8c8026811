//! Layout of a resume record into drawing instructions
//!
//! `compose` is pure: it measures text with the standard font metrics and
//! threads a `Cursor` through the main flow, producing a `RenderPlan` that a
//! `Canvas` can replay.

use crate::image_loader::ImageBuffer;
use crate::layout::{Cursor, Point, Rect};
use crate::model::ResumeRecord;
use crate::template::{TemplateSpec, TextStyle};
use pdf_core::{wrap_text, Align, Color, StandardFont};

const SECTION_TITLE_SIZE: f64 = 11.0;
const BODY_SIZE: f64 = 10.0;

/// Lines moved down after the contact line and after each section
const SECTION_GAP: f64 = 0.6;
/// Lines moved down after each experience or education entry
const ENTRY_GAP: f64 = 0.3;
const EXPERIENCE_LIST_GAP: f64 = 0.4;
const EDUCATION_LIST_GAP: f64 = 0.2;

/// What a drawing instruction represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Header,
    Name,
    Title,
    Contact,
    SectionTitle,
    SectionBody,
    EntryHeading,
    EntryDetails,
    ProfileImage,
}

/// A block of text wrapped to `width`, its top-left at `(x, y)`
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub role: Role,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
}

impl TextRun {
    /// The text broken into the lines it occupies
    pub fn lines(&self) -> Vec<String> {
        wrap_text(&self.text, self.font, self.size, self.width)
    }

    pub fn line_height(&self) -> f64 {
        self.font.line_height(self.size)
    }

    pub fn height(&self) -> f64 {
        self.lines().len() as f64 * self.line_height()
    }
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp<'a> {
    /// Header band or sidebar
    FillRect { rect: Rect, color: Color },
    Text(TextRun),
    /// Profile image fit inside `rect`
    Image {
        data: &'a [u8],
        rect: Rect,
        align: Align,
    },
    /// Start a new page
    PageBreak,
}

impl DrawOp<'_> {
    pub fn role(&self) -> Option<Role> {
        match self {
            DrawOp::FillRect { .. } => Some(Role::Header),
            DrawOp::Text(run) => Some(run.role),
            DrawOp::Image { .. } => Some(Role::ProfileImage),
            DrawOp::PageBreak => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawOp::Text(run) => Some(run),
            _ => None,
        }
    }
}

/// Document title and ordered drawing instructions
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan<'a> {
    pub title: String,
    pub ops: Vec<DrawOp<'a>>,
}

impl RenderPlan<'_> {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(DrawOp::as_text)
    }

    /// Text runs with the given role, in plan order
    pub fn runs_with_role(&self, role: Role) -> impl Iterator<Item = &TextRun> {
        self.text_runs().filter(move |run| run.role == role)
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.ops.iter().filter(|op| op.role() == Some(role)).count()
    }

    pub fn page_breaks(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::PageBreak))
            .count()
    }

    /// Number of pages the plan draws on
    pub fn page_count(&self) -> usize {
        1 + self.page_breaks()
    }
}

/// Document title for a resume owner
pub fn document_title(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{name} - Resume")
    }
}

/// Lay out `record` with `spec`
///
/// The profile image is placed only when `image` is present and the template
/// has an image box; its bytes are not validated here.
pub fn compose<'a>(
    record: &ResumeRecord,
    spec: &TemplateSpec,
    image: Option<&'a ImageBuffer>,
) -> RenderPlan<'a> {
    let mut composer = Composer {
        ops: Vec::new(),
        cursor: Cursor::new(spec.flow_origin, spec.flow_width),
    };

    composer.header(record, spec);

    match (image, spec.image_placement) {
        (Some(image), Some(placement)) => composer.ops.push(DrawOp::Image {
            data: image.as_bytes(),
            rect: placement.rect,
            align: placement.align,
        }),
        (Some(_), None) => {
            log::debug!("Template {} has no image box, image ignored", spec.kind)
        }
        _ => {}
    }

    if spec.show_contact_inline {
        composer.flow_run(
            Role::Contact,
            format!("Email: {}   |   Phone: {}", record.email, record.phone),
            StandardFont::Helvetica,
            BODY_SIZE,
        );
        composer.cursor.move_down(SECTION_GAP);
    }

    composer.sections(record);

    if spec.multi_page {
        composer.ops.push(DrawOp::PageBreak);
    }

    log::debug!(
        "Composed {} template: {} instructions",
        spec.kind,
        composer.ops.len()
    );

    RenderPlan {
        title: document_title(&record.name),
        ops: composer.ops,
    }
}

struct Composer<'a> {
    ops: Vec<DrawOp<'a>>,
    cursor: Cursor,
}

impl Composer<'_> {
    fn header(&mut self, record: &ResumeRecord, spec: &TemplateSpec) {
        if let Some(rect) = spec.header_rect() {
            self.ops.push(DrawOp::FillRect {
                rect,
                color: spec.header_color,
            });
        }

        self.header_line(Role::Name, &record.name, &spec.name_style);
        self.header_line(Role::Title, &record.title, &spec.title_style);
    }

    /// Header lines are emitted even when empty so spacing stays consistent
    fn header_line(&mut self, role: Role, text: &str, style: &TextStyle) {
        match style.position {
            Some(Point { x, y }) => self.ops.push(DrawOp::Text(TextRun {
                role,
                text: text.to_string(),
                x,
                y,
                width: style.width,
                font: style.font,
                size: style.size,
                color: style.color,
            })),
            None => {
                self.push_run(role, text.to_string(), style.font, style.size, style.color);
                self.cursor.move_down(style.space_after);
            }
        }
    }

    /// Summary, skills, experience and education in that order
    ///
    /// A section with nothing to show is left out along with its title. A
    /// summary or skill that is empty or only whitespace counts as nothing,
    /// as do entry details, which then drop only their body line.
    fn sections(&mut self, record: &ResumeRecord) {
        if !record.summary.trim().is_empty() {
            self.section_title("Summary");
            self.body(Role::SectionBody, record.summary.clone());
            self.cursor.move_down(SECTION_GAP);
        }

        let skills: Vec<&str> = record
            .skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .collect();
        if !skills.is_empty() {
            self.section_title("Skills");
            self.body(Role::SectionBody, skills.join(", "));
            self.cursor.move_down(SECTION_GAP);
        }

        if !record.experience.is_empty() {
            self.section_title("Experience");
            for entry in &record.experience {
                self.entry(
                    format!(
                        "{} — {} ({} - {})",
                        entry.role, entry.company, entry.from, entry.to
                    ),
                    &entry.details,
                );
            }
            self.cursor.move_down(EXPERIENCE_LIST_GAP);
        }

        if !record.education.is_empty() {
            self.section_title("Education");
            for entry in &record.education {
                self.entry(
                    format!("{} — {} ({})", entry.degree, entry.institution, entry.year),
                    &entry.details,
                );
            }
            self.cursor.move_down(EDUCATION_LIST_GAP);
        }
    }

    fn section_title(&mut self, title: &str) {
        self.flow_run(
            Role::SectionTitle,
            title.to_string(),
            StandardFont::HelveticaBold,
            SECTION_TITLE_SIZE,
        );
    }

    fn entry(&mut self, heading: String, details: &str) {
        self.flow_run(
            Role::EntryHeading,
            heading,
            StandardFont::HelveticaBold,
            BODY_SIZE,
        );
        if !details.trim().is_empty() {
            self.body(Role::EntryDetails, details.to_string());
        }
        self.cursor.move_down(ENTRY_GAP);
    }

    fn body(&mut self, role: Role, text: String) {
        self.flow_run(role, text, StandardFont::Helvetica, BODY_SIZE);
    }

    fn flow_run(&mut self, role: Role, text: String, font: StandardFont, size: f64) {
        self.push_run(role, text, font, size, Color::black());
    }

    /// Place a run at the cursor and move past it
    fn push_run(&mut self, role: Role, text: String, font: StandardFont, size: f64, color: Color) {
        let run = TextRun {
            role,
            text,
            x: self.cursor.x,
            y: self.cursor.y,
            width: self.cursor.width,
            font,
            size,
            color,
        };
        self.cursor.advance(run.lines().len(), run.line_height());
        self.ops.push(DrawOp::Text(run));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Education, Experience};
    use crate::template::TemplateKind;
    use pretty_assertions::assert_eq;

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            name: "Jane Doe".to_string(),
            title: "Staff Engineer".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0100".to_string(),
            summary: "Builds reliable systems.".to_string(),
            skills: vec!["Go".to_string(), "Rust".to_string()],
            experience: vec![Experience {
                role: "Engineer".to_string(),
                company: "Acme".to_string(),
                from: "2019".to_string(),
                to: "2023".to_string(),
                details: "Shipped the ingestion pipeline.".to_string(),
            }],
            education: vec![Education {
                degree: "BSc".to_string(),
                institution: "State U".to_string(),
                year: "2018".to_string(),
                details: String::new(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title("Jane Doe"), "Jane Doe - Resume");
        assert_eq!(document_title(""), "Resume");
        assert_eq!(document_title("  "), "Resume");
    }

    #[test]
    fn test_classic_flow_positions() {
        let spec = TemplateKind::Classic.spec();
        let plan = compose(&sample_record(), &spec, None);

        let name = plan.runs_with_role(Role::Name).next().unwrap();
        assert_eq!((name.x, name.y), (50.0, 50.0));

        // name: one 20pt bold line, then 0.2 of it
        let title = plan.runs_with_role(Role::Title).next().unwrap();
        let expected = 50.0 + 1.2 * StandardFont::HelveticaBold.line_height(20.0);
        assert!((title.y - expected).abs() < 1e-9);

        let contact = plan.runs_with_role(Role::Contact).next().unwrap();
        let expected = title.y + 1.6 * StandardFont::HelveticaOblique.line_height(11.0);
        assert!((contact.y - expected).abs() < 1e-9);
        assert_eq!(contact.text, "Email: jane@example.com   |   Phone: 555-0100");
    }

    #[test]
    fn test_runs_never_overlap() {
        for kind in TemplateKind::ALL {
            let spec = kind.spec();
            let plan = compose(&sample_record(), &spec, None);
            // banner and sidebar header lines sit outside the flow
            let in_flow = |run: &&TextRun| {
                kind == TemplateKind::Classic || !matches!(run.role, Role::Name | Role::Title)
            };
            let flow: Vec<&TextRun> = plan.text_runs().filter(in_flow).collect();

            for pair in flow.windows(2) {
                assert!(pair[1].y >= pair[0].y + pair[0].height() - 1e-9);
            }
        }
    }

    #[test]
    fn test_section_sequence() {
        let plan = compose(&sample_record(), &TemplateKind::Classic.spec(), None);
        let titles: Vec<&str> = plan
            .runs_with_role(Role::SectionTitle)
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(titles, vec!["Summary", "Skills", "Experience", "Education"]);

        let headings: Vec<&str> = plan
            .runs_with_role(Role::EntryHeading)
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(
            headings,
            vec!["Engineer — Acme (2019 - 2023)", "BSc — State U (2018)"]
        );

        // education entry has no details
        assert_eq!(plan.count_role(Role::EntryDetails), 1);
    }

    #[test]
    fn test_skills_are_trimmed_and_blank_tokens_dropped() {
        let record = ResumeRecord {
            skills: vec![" Go".to_string(), "".to_string(), "Rust ".to_string()],
            ..Default::default()
        };
        let plan = compose(&record, &TemplateKind::Classic.spec(), None);
        let bodies: Vec<&str> = plan
            .runs_with_role(Role::SectionBody)
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(bodies, vec!["Go, Rust"]);
    }

    #[test]
    fn test_whitespace_summary_is_skipped() {
        let record = ResumeRecord {
            summary: "  \n ".to_string(),
            skills: vec!["   ".to_string()],
            ..Default::default()
        };
        let plan = compose(&record, &TemplateKind::Modern.spec(), None);
        assert_eq!(plan.count_role(Role::SectionTitle), 0);
    }

    #[test]
    fn test_whitespace_details_keep_heading_only() {
        let record = ResumeRecord {
            summary: "\t".to_string(),
            experience: vec![Experience {
                role: "Engineer".to_string(),
                company: "Acme".to_string(),
                details: " \n ".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let plan = compose(&record, &TemplateKind::Classic.spec(), None);
        let titles: Vec<&str> = plan
            .runs_with_role(Role::SectionTitle)
            .map(|run| run.text.as_str())
            .collect();

        assert_eq!(titles, vec!["Experience"]);
        assert_eq!(plan.count_role(Role::EntryHeading), 1);
        assert_eq!(plan.count_role(Role::EntryDetails), 0);
    }

    #[test]
    fn test_long_summary_advances_by_wrapped_lines() {
        let record = ResumeRecord {
            summary: "word ".repeat(200),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let plan = compose(&record, &TemplateKind::Classic.spec(), None);

        let summary = plan.runs_with_role(Role::SectionBody).next().unwrap();
        let skills_title = plan.runs_with_role(Role::SectionTitle).nth(1).unwrap();
        let lines = summary.lines().len();
        assert!(lines > 1);

        let line_height = StandardFont::Helvetica.line_height(BODY_SIZE);
        let expected = summary.y + (lines as f64 + SECTION_GAP) * line_height;
        assert!((skills_title.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_image_only_when_template_has_a_box() {
        let image = ImageBuffer::new(vec![1, 2, 3]);

        let classic = compose(&sample_record(), &TemplateKind::Classic.spec(), Some(&image));
        assert_eq!(classic.count_role(Role::ProfileImage), 0);

        let modern = compose(&sample_record(), &TemplateKind::Modern.spec(), Some(&image));
        let placed = modern
            .ops
            .iter()
            .find(|op| op.role() == Some(Role::ProfileImage))
            .unwrap();
        assert_eq!(
            placed,
            &DrawOp::Image {
                data: &[1, 2, 3],
                rect: Rect::new(450.0, 18.0, 80.0, 80.0),
                align: Align::Right,
            }
        );
    }

    #[test]
    fn test_sidebar_header_lines_are_fixed() {
        let plan = compose(&sample_record(), &TemplateKind::Creative.spec(), None);

        assert_eq!(
            plan.ops[0],
            DrawOp::FillRect {
                rect: Rect::new(0.0, 0.0, 160.0, 841.89),
                color: Color::from_rgb(0x7c, 0x3a, 0xed),
            }
        );
        let name = plan.runs_with_role(Role::Name).next().unwrap();
        assert_eq!((name.x, name.y, name.width), (20.0, 40.0, 120.0));
        assert_eq!(name.color, Color::white());

        let first_section = plan.runs_with_role(Role::SectionTitle).next().unwrap();
        assert_eq!((first_section.x, first_section.y), (180.0, 40.0));
    }
}
