//! Input checks run before any query reaches the database.

use regex::Regex;

use crate::errors::RequestError;

/// Characters allowed in usernames, titles and slugs.
pub const DEFAULT_NAME_CHARSET: &str = "A-Za-z_";
/// Characters allowed in free-text bodies.
pub const DEFAULT_BODY_CHARSET: &str = r#"A-Za-z_\s,.!";?@&£"#;

/// A set of allowed characters, written as the inside of a regex character
/// class (`A-Za-z_`).
#[derive(Debug, Clone)]
pub struct CharAllowList {
    outside: Regex,
}

impl CharAllowList {
    pub fn new(charset: &str) -> Result<Self, regex::Error> {
        let outside = Regex::new(&format!("[^{charset}]"))?;
        Ok(Self { outside })
    }

    /// True when `value` holds at least one character outside the list.
    pub fn contains_restricted(&self, value: &str) -> bool {
        self.outside.is_match(value)
    }
}

#[derive(Debug, Clone)]
pub struct TextRules {
    pub name: CharAllowList,
    pub body: CharAllowList,
}

impl TextRules {
    pub fn new(name_charset: &str, body_charset: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: CharAllowList::new(name_charset)?,
            body: CharAllowList::new(body_charset)?,
        })
    }

    pub fn is_restricted_text(&self, value: &str) -> bool {
        self.name.contains_restricted(value)
    }

    pub fn is_restricted_body(&self, value: &str) -> bool {
        self.body.contains_restricted(value)
    }

    /// Requires a non-empty value made only of name characters.
    pub fn check_name<'a>(
        &self,
        value: Option<&'a str>,
        field: &'static str,
    ) -> Result<&'a str, RequestError> {
        match value {
            Some(value) if !value.is_empty() && !self.is_restricted_text(value) => Ok(value),
            _ => Err(RequestError::BadInput(field)),
        }
    }

    /// Requires a non-empty value made only of body characters.
    pub fn check_body<'a>(
        &self,
        value: Option<&'a str>,
        field: &'static str,
    ) -> Result<&'a str, RequestError> {
        match value {
            Some(value) if !value.is_empty() && !self.is_restricted_body(value) => Ok(value),
            _ => Err(RequestError::BadInput(field)),
        }
    }
}

impl Default for TextRules {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_CHARSET, DEFAULT_BODY_CHARSET)
            .expect("default charsets are valid character classes")
    }
}

pub fn is_positive_integer(value: &str) -> bool {
    parse_positive_integer(value).is_some()
}

/// Digits only, and at least 1. Values too large for an `i64` are rejected.
pub fn parse_positive_integer(value: &str) -> Option<i64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<i64>().ok().filter(|n| *n >= 1)
}

pub fn require_positive_integer(value: &str, field: &'static str) -> Result<i64, RequestError> {
    parse_positive_integer(value).ok_or(RequestError::BadInput(field))
}

/// Same as [`require_positive_integer`] but falls back to `default` when the
/// parameter was not sent at all.
pub fn positive_integer_or(
    value: Option<&str>,
    default: i64,
    field: &'static str,
) -> Result<i64, RequestError> {
    match value {
        Some(value) => require_positive_integer(value, field),
        None => Ok(default),
    }
}
