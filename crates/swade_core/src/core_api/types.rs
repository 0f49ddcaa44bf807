use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{CoreError, CoreErrorCode};
use crate::character::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetFormat {
    #[serde(rename = "markup")]
    Markup,
    #[serde(rename = "text")]
    PlainText,
}

impl SheetFormat {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Markup => "markup",
            Self::PlainText => "text",
        }
    }
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SheetFormat {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" | "htm" => Ok(Self::Markup),
            "text" | "txt" | "plain" | "plaintext" => Ok(Self::PlainText),
            other => Err(CoreError::new(
                CoreErrorCode::UnsupportedFormat,
                format!("unknown sheet format '{other}', expected html or text"),
            )),
        }
    }
}

/// Non-fatal conditions met while parsing. The character is still returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    ContentNotFound { selectors: Vec<String> },
    NoSections,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentNotFound { selectors } => write!(
                f,
                "no character content found (tried {})",
                selectors.join(", ")
            ),
            Self::NoSections => f.write_str("no sheet sections recognised"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub format: SheetFormat,
    pub character: Character,
    pub issues: Vec<ParseIssue>,
    /// Raw markup the character was parsed from; `None` on the text path.
    pub markup: Option<String>,
}

impl Sheet {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
