/// Flatten server-rendered entry and comment HTML for terminal display.
///
/// Links keep only their text, `<b>`/`<i>` become `*`/`_`, line breaks
/// and paragraphs collapse to spaces, and entities are decoded last so an
/// escaped `&lt;b&gt;` stays literal text.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            // Unterminated tag: keep it verbatim
            text.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = &rest[start + 1..start + end];
        text.push_str(replacement(tag));
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);

    let decoded = html_escape::decode_html_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn replacement(tag: &str) -> &'static str {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match name.as_str() {
        "b" | "strong" => "*",
        "i" | "em" => "_",
        "br" | "p" | "div" => " ",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_basic_tags() {
        assert_eq!(strip_html("<p>Hello</p><p>World</p>"), "Hello World");
        assert_eq!(strip_html("Line1<br>Line2"), "Line1 Line2");
        assert_eq!(strip_html("Line1<br/>Line2"), "Line1 Line2");
    }

    #[test]
    fn test_strip_html_formatting() {
        assert_eq!(strip_html("<i>italic</i>"), "_italic_");
        assert_eq!(strip_html("<b>bold</b>"), "*bold*");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("&lt;tag&gt;"), "<tag>");
        assert_eq!(strip_html("&amp;&quot;&#x27;"), "&\"'");
        assert_eq!(strip_html("&lt;b&gt;not bold&lt;/b&gt;"), "<b>not bold</b>");
    }

    #[test]
    fn test_strip_html_links() {
        let html = r#"Check <a href="http://example.com/" rel="nofollow">this link</a> out"#;
        assert_eq!(strip_html(html), "Check this link out");
    }

    #[test]
    fn test_strip_html_unterminated_tag() {
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        assert_eq!(strip_html("  too   many    spaces  "), "too many spaces");
        assert_eq!(strip_html("<p>  \n\n  </p>text"), "text");
    }
}
