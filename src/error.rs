use std::fmt::Display;

/// Raised when a negative outcome is asked for a positive payload it does
/// not have, or when a filter rejects a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoSuchElement(String);

impl NoSuchElement {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl Display for NoSuchElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NoSuchElement {}

/// Cause recorded when a panic is captured by `Try::of_unwind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked(Option<String>);

impl Panicked {
    pub(crate) fn new(message: Option<String>) -> Self {
        Self(message)
    }

    /// Panic message, if the payload was a string.
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl Display for Panicked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(message) => write!(f, "panicked: {}", message),
            None => f.write_str("panicked with a non-string payload"),
        }
    }
}

impl std::error::Error for Panicked {}
