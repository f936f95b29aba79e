//! Allowlist HTML sanitizer

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

/// URI values with a safe scheme, or relative references
static SAFE_URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:https?|ftp|mailto|tel):|[^a-z]|[a-z+.\-]+(?:[^a-z+.\-:]|$))").unwrap()
});

static CUSTOM_ATTRIBUTE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:data|aria)-[a-z0-9_.\-]+$").unwrap());

/// Sanitizer for HTML fragments.
///
/// Only HTML formatting and structural elements survive. Scripting and
/// embedding elements, SVG and MathML are removed together with their
/// content; any other unknown element is unwrapped, keeping its children.
#[derive(Debug, Clone, Default)]
pub struct HtmlSanitizer;

impl HtmlSanitizer {
    pub fn new() -> Self {
        Self
    }

    pub fn sanitize(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut output = String::with_capacity(html.len());

        Self::write_children(&fragment.root_element(), &mut output);

        output
    }

    fn write_children(element: &ElementRef, output: &mut String) {
        for node in element.children() {
            if let Some(el) = ElementRef::wrap(node) {
                Self::write_element(&el, output);
            } else if let Some(text) = node.value().as_text() {
                output.push_str(&escape_text(text));
            }
        }
    }

    fn write_element(element: &ElementRef, output: &mut String) {
        let tag_name = element.value().name();

        if is_dropped_with_content(tag_name) {
            return;
        }

        if !is_allowed_tag(tag_name) {
            Self::write_children(element, output);
            return;
        }

        output.push('<');
        output.push_str(tag_name);

        for (name, value) in element.value().attrs() {
            if is_allowed_attribute(name, value) {
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(&escape_attribute(value));
                output.push('"');
            }
        }

        output.push('>');

        if is_void(tag_name) {
            return;
        }

        Self::write_children(element, output);

        output.push_str("</");
        output.push_str(tag_name);
        output.push('>');
    }
}

fn is_dropped_with_content(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "script"
            | "style"
            | "svg"
            | "math"
            | "iframe"
            | "frame"
            | "frameset"
            | "object"
            | "embed"
            | "applet"
            | "noscript"
            | "noembed"
            | "noframes"
            | "template"
            | "textarea"
            | "select"
            | "xmp"
            | "plaintext"
            | "head"
            | "title"
            | "base"
            | "link"
            | "meta"
    )
}

fn is_allowed_tag(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "a" | "abbr"
            | "address"
            | "article"
            | "aside"
            | "b"
            | "bdi"
            | "bdo"
            | "blockquote"
            | "br"
            | "caption"
            | "cite"
            | "code"
            | "col"
            | "colgroup"
            | "dd"
            | "del"
            | "details"
            | "dfn"
            | "div"
            | "dl"
            | "dt"
            | "em"
            | "figcaption"
            | "figure"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "i"
            | "img"
            | "ins"
            | "kbd"
            | "li"
            | "main"
            | "mark"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "q"
            | "rp"
            | "rt"
            | "ruby"
            | "s"
            | "samp"
            | "section"
            | "small"
            | "span"
            | "strike"
            | "strong"
            | "sub"
            | "summary"
            | "sup"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "time"
            | "tr"
            | "u"
            | "ul"
            | "var"
            | "wbr"
    )
}

fn is_void(tag_name: &str) -> bool {
    matches!(tag_name, "br" | "col" | "hr" | "img" | "wbr")
}

fn is_allowed_attribute(name: &str, value: &str) -> bool {
    let name = name.to_ascii_lowercase();

    if is_uri_attribute(&name) {
        return is_safe_uri(value);
    }

    if CUSTOM_ATTRIBUTE_PATTERN.is_match(&name) {
        return true;
    }

    matches!(
        name.as_str(),
        "id" | "class"
            | "title"
            | "lang"
            | "dir"
            | "role"
            | "alt"
            | "width"
            | "height"
            | "align"
            | "colspan"
            | "rowspan"
            | "headers"
            | "scope"
            | "start"
            | "reversed"
            | "type"
            | "datetime"
            | "target"
            | "rel"
            | "open"
    )
}

fn is_uri_attribute(name: &str) -> bool {
    matches!(name, "href" | "src" | "cite")
}

fn is_safe_uri(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    SAFE_URI_PATTERN.is_match(&compact)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(html: &str) -> String {
        HtmlSanitizer::new().sanitize(html)
    }

    #[test]
    fn test_removes_event_handlers() {
        assert_eq!(
            sanitize("<img src=x onerror=alert(1)><b>ok</b>"),
            r#"<img src="x"><b>ok</b>"#
        );
    }

    #[test]
    fn test_removes_scripts_with_content() {
        let output = sanitize("<p>Visible</p><script>alert('hidden')</script><style>p{}</style>");

        assert_eq!(output, "<p>Visible</p>");
    }

    #[test]
    fn test_removes_svg_and_math() {
        let output = sanitize(
            r#"<svg><g onload="alert(1)"><text>svg</text></g></svg><math><mi>x</mi></math><em>kept</em>"#,
        );

        assert_eq!(output, "<em>kept</em>");
    }

    #[test]
    fn test_rejects_script_uris() {
        let output = sanitize(
            r#"<a href="javascript:alert(1)">a</a><a href=" jav&#x09;ascript:alert(1)">b</a><a href="data:text/html,x">c</a>"#,
        );

        assert_eq!(output, "<a>a</a><a>b</a><a>c</a>");
    }

    #[test]
    fn test_keeps_safe_links() {
        let output = sanitize(r#"<a href="https://example.com/?a=1&amp;b=2" target="_blank">x</a>"#);

        assert!(output.contains(r#"href="https://example.com/?a=1&amp;b=2""#));
        assert!(output.contains(r#"target="_blank""#));

        assert_eq!(
            sanitize(r#"<a href="/relative/path">r</a>"#),
            r#"<a href="/relative/path">r</a>"#
        );
        assert_eq!(
            sanitize(r#"<a href="mailto:team@example.com">m</a>"#),
            r#"<a href="mailto:team@example.com">m</a>"#
        );
    }

    #[test]
    fn test_unwraps_unknown_elements() {
        assert_eq!(
            sanitize("<font color=red>red <b>bold</b></font>"),
            "red <b>bold</b>"
        );
    }

    #[test]
    fn test_keeps_structure_and_custom_attributes() {
        let output = sanitize(
            r#"<table><tr><td colspan="2" data-row="1" style="color:red">cell</td></tr></table>"#,
        );

        assert!(output.starts_with("<table><tbody><tr><td"));
        assert!(output.contains(r#"colspan="2""#));
        assert!(output.contains(r#"data-row="1""#));
        assert!(!output.contains("style"));
        assert!(output.ends_with("cell</td></tr></tbody></table>"));
    }

    #[test]
    fn test_escapes_text() {
        assert_eq!(sanitize("1 &lt; 2 &amp;&amp; <br>"), "1 &lt; 2 &amp;&amp; <br>");
        assert_eq!(sanitize("plain text"), "plain text");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_drops_comments() {
        assert_eq!(sanitize("<!-- secret --><i>x</i>"), "<i>x</i>");
    }
}
