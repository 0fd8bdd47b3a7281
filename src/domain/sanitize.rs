//! HTML-metacharacter escaping for user-supplied text. Values are
//! stored escaped; clients decode at render time, so the mapping must
//! round-trip.

/// Trim, then escape `& < > " ' /`. Ampersand goes first so the
/// ampersands introduced by the other entities stay literal.
pub fn escape_html(s: &str) -> String {
    s.trim()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('/', "&#x2F;")
}

/// Inverse of [`escape_html`]. Ampersand last for the same reason it
/// goes first when escaping.
pub fn unescape_html(s: &str) -> String {
    s.replace("&#x2F;", "/")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>a & "b" / 'c'</b>"#),
            "&lt;b&gt;a &amp; &quot;b&quot; &#x2F; &#39;c&#39;&lt;&#x2F;b&gt;"
        );
    }

    #[test]
    fn trims_before_escaping() {
        assert_eq!(escape_html("  hi  "), "hi");
        assert_eq!(escape_html("   "), "");
    }

    #[test]
    fn round_trips() {
        let original = r#"<script>alert("x & y")</script>"#;
        assert_eq!(unescape_html(&escape_html(original)), original);
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(escape_html("Buy milk"), "Buy milk");
        assert_eq!(unescape_html("Buy milk"), "Buy milk");
    }
}
