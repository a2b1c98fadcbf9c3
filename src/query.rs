//! Free-text query normalization and LIKE-pattern escaping.

/// Escape character attached to every LIKE clause (`ESCAPE '\'`)
pub const LIKE_ESCAPE: char = '\\';

/// A trimmed free-text query.
///
/// Empty input is a valid value meaning "no text filter"; normalization
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    text: String,
}

impl NormalizedQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            text: raw.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `%...%` substring pattern with `\`, `%` and `_` escaped so
    /// user-entered wildcard characters match literally.
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.text.len() + 2);
        escaped.push('%');
        for ch in self.text.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                escaped.push(LIKE_ESCAPE);
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }

    /// Case-insensitive substring test, the in-memory twin of
    /// [`like_pattern`](Self::like_pattern).
    pub fn matches(&self, haystack: &str) -> bool {
        !self.text.is_empty() && haystack.to_lowercase().contains(&self.text.to_lowercase())
    }
}

impl From<&str> for NormalizedQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
