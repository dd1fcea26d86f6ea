//! Extraction of anti-bot values from the provider's share page
//!
//! The share page embeds its js token and log id as URL-encoded fragments
//! inside inline script. Nothing here parses HTML: values are located by the
//! literal text around them, so any markup change on the provider side shows
//! up as a missing value rather than a parse error. Keep that brittleness
//! behind [`TokenExtractor`] so a structured strategy can replace it.

/// Strategy for pulling the listing API credentials out of a share page
pub trait TokenExtractor: Send + Sync {
    /// Anti-bot token required by the listing endpoint
    fn js_token(&self, html: &str) -> Option<String>;

    /// Request correlation id required by the listing endpoint
    fn log_id(&self, html: &str) -> Option<String>;
}

/// Literal opening and closing text around an embedded value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub start: String,
    pub end: String,
}

impl Delimiters {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Delimiter scan over the raw page text
#[derive(Debug, Clone)]
pub struct DelimiterExtractor {
    js_token: Delimiters,
    log_id: Delimiters,
}

impl Default for DelimiterExtractor {
    fn default() -> Self {
        Self {
            // fn("<token>") as it appears percent-encoded in the page
            js_token: Delimiters::new("fn%28%22", "%22%29"),
            log_id: Delimiters::new("dp-logid=", "&"),
        }
    }
}

impl DelimiterExtractor {
    pub fn new(js_token: Delimiters, log_id: Delimiters) -> Self {
        Self { js_token, log_id }
    }
}

impl TokenExtractor for DelimiterExtractor {
    fn js_token(&self, html: &str) -> Option<String> {
        find_between(html, &self.js_token.start, &self.js_token.end).map(str::to_string)
    }

    fn log_id(&self, html: &str) -> Option<String> {
        find_between(html, &self.log_id.start, &self.log_id.end).map(str::to_string)
    }
}

/// Text between the first `start` and the next `end`; empty matches count as misses
pub fn find_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let len = haystack[from..].find(end)?;
    let value = &haystack[from..from + len];
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<html><script>var a = decodeURIComponent(\"",
        "%28function%28%29%7Bfn%28%22A1B2C3D4E5%22%29%7D%29",
        "\");</script>",
        "<a href=\"/share/list?dp-logid=778899001122&page=1\">x</a></html>"
    );

    #[test]
    fn test_extracts_js_token() {
        let extractor = DelimiterExtractor::default();
        assert_eq!(extractor.js_token(PAGE).as_deref(), Some("A1B2C3D4E5"));
    }

    #[test]
    fn test_extracts_log_id() {
        let extractor = DelimiterExtractor::default();
        assert_eq!(extractor.log_id(PAGE).as_deref(), Some("778899001122"));
    }

    #[test]
    fn test_missing_start_delimiter() {
        let extractor = DelimiterExtractor::default();
        assert_eq!(extractor.js_token("<html>no token here</html>"), None);
    }

    #[test]
    fn test_missing_end_delimiter() {
        assert_eq!(find_between("dp-logid=12345", "dp-logid=", "&"), None);
    }

    #[test]
    fn test_empty_value_is_a_miss() {
        assert_eq!(find_between("fn%28%22%22%29", "fn%28%22", "%22%29"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(find_between("[a][b]", "[", "]"), Some("a"));
    }

    #[test]
    fn test_custom_delimiters() {
        let extractor = DelimiterExtractor::new(
            Delimiters::new("jsToken=\"", "\""),
            Delimiters::new("logid:", ";"),
        );
        let html = "jsToken=\"XYZ\" logid:42;";
        assert_eq!(extractor.js_token(html).as_deref(), Some("XYZ"));
        assert_eq!(extractor.log_id(html).as_deref(), Some("42"));
    }
}
