//! Candidate replies — literal text or a generator evaluated at reply time.

use std::fmt;
use std::sync::Arc;

/// A candidate reply held by a pattern rule.
///
/// Generators run each time the reply is chosen, never at table
/// construction, so time and date replies stay current.
#[derive(Clone)]
pub enum Reply {
    Literal(String),
    Generator(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Reply {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn generator(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Generator(Arc::new(f))
    }

    /// Produce the reply text.
    pub fn render(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Generator(f) => f(),
        }
    }

    pub fn is_generator(&self) -> bool {
        matches!(self, Self::Generator(_))
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Self::literal(s)
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}
