use crate::error::{Result, SnipError};
use regex::bytes::Regex;

/// Literal marker that opens and closes a fence.
pub const FENCE_MARKER: &str = "```";

/// Decides which lines are fence boundaries, which fences are selected,
/// and which content lines are dropped.
#[derive(Debug, Clone)]
pub struct FenceMatcher {
    language: String,
    labeled: Regex,
    exclude: Option<Regex>,
}

impl FenceMatcher {
    pub fn new<S: AsRef<str>>(language: &str, exclude_markers: &[S]) -> Result<Self> {
        let language = language.trim();
        if language.is_empty() {
            return Err(SnipError::Config {
                message: "Target language must not be empty".to_string(),
            });
        }

        // Marker anchored at the start of the trimmed line, language anywhere after it.
        // The gap matches raw bytes so invalid UTF-8 between the two does not break the match.
        let labeled = Regex::new(&format!(
            "(?i)^{}(?s-u:.)*{}",
            regex::escape(FENCE_MARKER),
            regex::escape(language)
        ))?;

        let markers: Vec<String> = exclude_markers
            .iter()
            .map(|m| m.as_ref().trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect();

        let exclude = if markers.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?i){}", markers.join("|")))?)
        };

        Ok(Self {
            language: language.to_string(),
            labeled,
            exclude,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Any line containing the marker toggles fence state.
    pub fn is_fence(&self, line: &[u8]) -> bool {
        line.windows(FENCE_MARKER.len()).any(|w| w == FENCE_MARKER.as_bytes())
    }

    /// Whether an opening fence line starts a block worth collecting.
    pub fn is_selected(&self, line: &[u8]) -> bool {
        let trimmed = line.trim_ascii();
        trimmed == FENCE_MARKER.as_bytes() || self.labeled.is_match(trimmed)
    }

    /// Lines are raw bytes; input need not be valid UTF-8.
    pub fn is_excluded(&self, line: &[u8]) -> bool {
        self.exclude.as_ref().is_some_and(|re| re.is_match(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> FenceMatcher {
        FenceMatcher::new("pyrope", &["compile error"]).unwrap()
    }

    #[test]
    fn test_fence_detection() {
        let m = matcher();
        assert!(m.is_fence(b"```\n"));
        assert!(m.is_fence(b"  ```pyrope\n"));
        assert!(m.is_fence(b"text with ``` inside"));
        assert!(!m.is_fence(b"``not a fence``"));
        assert!(!m.is_fence(b"plain text\n"));
    }

    #[test]
    fn test_bare_fence_is_selected() {
        let m = matcher();
        assert!(m.is_selected(b"```\n"));
        assert!(m.is_selected(b"   ```   \r\n"));
    }

    #[test]
    fn test_labeled_fence_selection() {
        let m = matcher();
        assert!(m.is_selected(b"```pyrope\n"));
        assert!(m.is_selected(b"``` Pyrope\n"));
        assert!(m.is_selected(b"```{.PYROPE linenos}\n"));
        assert!(!m.is_selected(b"```rust\n"));
        assert!(!m.is_selected(b"```console\n"));
    }

    #[test]
    fn test_label_must_follow_marker() {
        let m = matcher();
        // Marker not at the start of the trimmed line
        assert!(!m.is_selected(b"pyrope ```\n"));
        assert!(!m.is_selected(b"see ```pyrope\n"));
    }

    #[test]
    fn test_language_is_matched_literally() {
        let m = FenceMatcher::new("c++", &["compile error"]).unwrap();
        assert!(m.is_selected(b"```c++\n"));
        assert!(!m.is_selected(b"```c\n"));
    }

    #[test]
    fn test_exclusion_marker() {
        let m = matcher();
        assert!(m.is_excluded(b"x = 1 // Compile Error here\n"));
        assert!(m.is_excluded(b"COMPILE ERROR\n"));
        assert!(!m.is_excluded(b"compile_error\n"));

        let none = FenceMatcher::new("pyrope", &[] as &[&str]).unwrap();
        assert!(!none.is_excluded(b"compile error\n"));
    }

    #[test]
    fn test_multiple_exclusion_markers() {
        let m = FenceMatcher::new("rust", &["compile error", "ignore-me"]).unwrap();
        assert!(m.is_excluded(b"// IGNORE-ME\n"));
        assert!(m.is_excluded(b"// compile error\n"));
        assert!(!m.is_excluded(b"let x = 1;\n"));
    }

    #[test]
    fn test_non_utf8_lines() {
        let m = matcher();
        assert!(m.is_fence(b"```\xff\n"));
        assert!(m.is_selected(b"```pyrope \xe9\n"));
        assert!(m.is_selected(b"```\xff pyrope\n"));
        assert!(!m.is_selected(b"```\xe9\n"));
        assert!(m.is_excluded(b"caf\xe9 compile error\n"));
    }

    #[test]
    fn test_empty_language_rejected() {
        assert!(FenceMatcher::new("  ", &["compile error"]).is_err());
    }
}
