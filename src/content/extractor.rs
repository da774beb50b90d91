//! HTML text extraction
//!
//! Reduces a fetched page to the plain text of its primary content region.

use scraper::{ElementRef, Html, Node, Selector};

/// Markup that never carries evidence text
const NOISE_ELEMENTS: &[&str] = &["script", "style", "header", "footer", "nav", "aside"];

/// Extract plain text from HTML
///
/// Prefers a primary content container (`<main>`, `<article>`, then
/// `<body>`), falling back to the whole document when none is present.
/// Script, style, and page-chrome elements are skipped, and whitespace is
/// normalized to single spaces.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in ["main", "article", "body"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = visible_text(element);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    visible_text(document.root_element())
}

/// Collect text under an element, skipping noise subtrees
fn visible_text(element: ElementRef) -> String {
    let mut fragments = Vec::new();
    collect_text(element, &mut fragments);
    normalize_whitespace(&fragments.join(" "))
}

fn collect_text(element: ElementRef, out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Node::Element(el) => {
                if NOISE_ELEMENTS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_WITH_MAIN: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Drug notice</title><style>.x { color: red; }</style></head>
        <body>
            <header>Site banner that is not evidence</header>
            <nav>Home | Drugs | Contact</nav>
            <main>
                <h1>Prohibition notice</h1>
                <p>The manufacture, sale and distribution of the fixed dose
                combination is prohibited with immediate effect.</p>
            </main>
            <footer>Copyright notice</footer>
            <script>analytics();</script>
        </body>
        </html>
    "#;

    const PAGE_WITH_ARTICLE: &str = r#"
        <html><body>
            <aside>Related links</aside>
            <article>
                <p>Sibutramine was withdrawn from the market
                following cardiovascular safety findings.</p>
            </article>
        </body></html>
    "#;

    #[test]
    fn test_prefers_main_container() {
        let text = extract_text(PAGE_WITH_MAIN);
        assert!(text.contains("Prohibition notice"));
        assert!(text.contains("immediate effect"));
        assert!(!text.contains("Site banner"));
        assert!(!text.contains("analytics"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn test_falls_back_to_article() {
        let text = extract_text(PAGE_WITH_ARTICLE);
        assert!(text.contains("Sibutramine"));
        assert!(!text.contains("Related links"));
    }

    #[test]
    fn test_whole_document_fallback() {
        let text = extract_text("no markup at all, just words");
        assert!(text.contains("just words"));
    }

    #[test]
    fn test_whitespace_normalized_to_single_spaces() {
        let text = extract_text("<body><p>one\n   two\n\nthree</p></body>");
        assert_eq!(text, "one two three");
    }

    #[test]
    fn test_style_and_script_stripped_in_fallback() {
        let html = "<body><script>var x = 1;</script><p>visible</p><style>p{}</style></body>";
        let text = extract_text(html);
        assert_eq!(text, "visible");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_text(""), "");
    }
}
