use serde::{Deserialize, Deserializer, Serialize};

/// Raw form field as typed by the operator. Accepts JSON strings, numbers or null
/// so hand-written parte files may use either.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TextInput(String);

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// `None` and whitespace-only input are both blank.
pub fn is_blank(input: &Option<TextInput>) -> bool {
    input.as_ref().map(TextInput::is_blank).unwrap_or(true)
}

pub fn as_text(input: &Option<TextInput>) -> Option<&str> {
    input.as_ref().map(TextInput::as_str)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl<'de> Deserialize<'de> for TextInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawInput::deserialize(deserializer)?;
        Ok(match raw {
            RawInput::Text(text) => TextInput(text),
            RawInput::Integer(value) => TextInput(value.to_string()),
            RawInput::Float(value) => TextInput(value.to_string()),
            // not numeric, coerces to zero like any other garbage
            RawInput::Flag(value) => TextInput(value.to_string()),
        })
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
