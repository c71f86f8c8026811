//! Resume record wire model
//!
//! Every field is optional on the wire. Missing fields and JSON `null` both
//! map to the empty default, and scalar text fields also accept numbers and
//! booleans (e.g. `"year": 2019`).

use crate::template::TemplateKind;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A resume as submitted by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    pub template: TemplateKind,
    #[serde(
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Inline image (`data:<mime>;base64,<payload>`)
    #[serde(
        rename = "imageBase64",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_data: Option<String>,
}

/// A work history entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(deserialize_with = "lenient_string")]
    pub details: String,
}

/// An education entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub details: String,
}

impl ResumeRecord {
    /// Parse a JSON request body
    ///
    /// An empty body or `null` is an empty record; anything other than an
    /// object is rejected.
    pub fn from_json(body: &str) -> crate::Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        match serde_json::from_str::<Value>(body)? {
            Value::Null => Ok(Self::default()),
            value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))
            .into()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string).unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(scalar_to_string)
        .collect())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(scalar_to_string)
        .filter(|s| !s.trim().is_empty()))
}
