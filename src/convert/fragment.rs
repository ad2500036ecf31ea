//! Document decomposition into head/header/main/footer fragments.

use super::document::{Document, Element, Node};
use super::relocate::PathMapping;
use super::rewrite::rewrite_fragment;

/// The four template fragments cut from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Inner content of `<head>`, without the wrapper.
    pub head: String,
    pub header: String,
    pub main: String,
    pub footer: String,
}

impl Fragments {
    /// Split a document into fragments. Comments never survive.
    ///
    /// - head: inner content of the first `<head>`
    /// - header: first `<header>` in the body, else the body's first element
    /// - main: first `<main>` in the body, else every top-level body child
    ///   except `<header>`/`<footer>` (blank text dropped)
    /// - footer: first `<footer>` in the body, else empty
    ///
    /// Without a `<body>` the whole document becomes `main`.
    pub fn extract(doc: &Document) -> Self {
        let head = doc.head().map(|head| inner(doc, head)).unwrap_or_default();

        let Some(body) = doc.body() else {
            return Self {
                head,
                main: doc.full_text(),
                ..Self::default()
            };
        };

        let header = body
            .find("header")
            .or_else(|| body.child_elements().next())
            .map(|el| doc.text(&el.span))
            .unwrap_or_default();

        let main = match body.find("main") {
            Some(main) => doc.text(&main.span),
            None => main_fallback(doc, body),
        };

        let footer = body
            .find("footer")
            .map(|el| doc.text(&el.span))
            .unwrap_or_default();

        Self {
            head,
            header,
            main,
            footer,
        }
    }

    /// Rewrite asset references in every fragment.
    pub fn rewrite(&self, mapping: &PathMapping) -> Self {
        Self {
            head: rewrite_fragment(&self.head, mapping).into_owned(),
            header: rewrite_fragment(&self.header, mapping).into_owned(),
            main: rewrite_fragment(&self.main, mapping).into_owned(),
            footer: rewrite_fragment(&self.footer, mapping).into_owned(),
        }
    }
}

/// Children of an element joined back together, comments removed.
fn inner(doc: &Document, el: &Element) -> String {
    el.children
        .iter()
        .filter(|node| !matches!(node, Node::Comment(_)))
        .map(|node| doc.text(node.span()))
        .collect()
}

/// Body children except header/footer, skipping comments and blank text.
fn main_fallback(doc: &Document, body: &Element) -> String {
    let mut out = String::new();
    for node in &body.children {
        match node {
            Node::Element(el) if el.is("header") || el.is("footer") => {}
            Node::Element(el) => out.push_str(&doc.text(&el.span)),
            Node::Text(span) => {
                let text = doc.raw(span);
                if !text.trim().is_empty() {
                    out.push_str(text);
                }
            }
            Node::Comment(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn extract(html: &str) -> Fragments {
        let doc = Document::parse(html.to_string(), Path::new("index.html")).unwrap();
        Fragments::extract(&doc)
    }

    #[test]
    fn test_semantic_sections() {
        let f = extract(
            "<html><head><title>T</title></head><body>\n<header>H</header>\n<main>M</main>\n<footer>F</footer>\n</body></html>",
        );
        assert_eq!(f.head, "<title>T</title>");
        assert_eq!(f.header, "<header>H</header>");
        assert_eq!(f.main, "<main>M</main>");
        assert_eq!(f.footer, "<footer>F</footer>");
    }

    #[test]
    fn test_header_falls_back_to_first_element() {
        let f = extract("<body>\n  <div id=\"top\">X</div>\n  <section>S</section>\n</body>");
        assert_eq!(f.header, "<div id=\"top\">X</div>");
        assert_eq!(f.footer, "");
    }

    #[test]
    fn test_main_fallback_skips_header_footer_comments_and_blank_text() {
        let f = extract(
            "<body>\n<header>H</header>\n<!-- nav -->\n<section>A</section>\ntext\n<div>B</div>\n<footer>F</footer>\n</body>",
        );
        assert_eq!(f.main, "<section>A</section>\ntext\n<div>B</div>");
        assert_eq!(f.header, "<header>H</header>");
        assert_eq!(f.footer, "<footer>F</footer>");
    }

    #[test]
    fn test_nested_sections_found_depth_first() {
        let f = extract(
            "<body><div class=\"wrap\"><header>H</header><main><p>M</p></main></div><div><footer>F</footer></div></body>",
        );
        assert_eq!(f.header, "<header>H</header>");
        assert_eq!(f.main, "<main><p>M</p></main>");
        assert_eq!(f.footer, "<footer>F</footer>");
    }

    #[test]
    fn test_head_inner_without_comments() {
        let f = extract(
            "<html><head>\n<!-- meta -->\n<meta charset=\"utf-8\">\n<link href=\"css/site.css\"><!-- x --></head><body></body></html>",
        );
        assert!(!f.head.contains("<head>"));
        assert!(!f.head.contains("<!--"));
        assert!(f.head.contains("<meta charset=\"utf-8\">"));
        assert!(f.head.contains("<link href=\"css/site.css\">"));
    }

    #[test]
    fn test_comments_inside_sections_removed() {
        let f = extract("<body><header>H<!-- logo --></header></body>");
        assert_eq!(f.header, "<header>H</header>");
    }

    #[test]
    fn test_no_body_is_whole_document_main() {
        let f = extract("<div class=\"card\">loose</div><!-- c --><p>more</p>");
        assert_eq!(f.main, "<div class=\"card\">loose</div><p>more</p>");
        assert!(f.header.is_empty());
        assert!(f.footer.is_empty());
        assert!(f.head.is_empty());
    }

    #[test]
    fn test_inline_script_survives_in_head() {
        let f = extract(
            "<html><head><meta charset=\"utf-8\"><script>tailwind.config = { sm: 640 < w };</script></head><body><header>H</header><main>M</main></body></html>",
        );
        assert_eq!(
            f.head,
            "<meta charset=\"utf-8\"><script>tailwind.config = { sm: 640 < w };</script>"
        );
        assert_eq!(f.header, "<header>H</header>");
        assert_eq!(f.main, "<main>M</main>");
    }

    #[test]
    fn test_sections_with_omitted_end_tags() {
        let f = extract(
            "<body><header><ul><li>One<li>Two</ul></header><main><p>a<p>b<br><img src=\"x.png\"></main><footer>F</footer></body>",
        );
        assert_eq!(f.header, "<header><ul><li>One<li>Two</ul></header>");
        assert_eq!(f.main, "<main><p>a<p>b<br><img src=\"x.png\"></main>");
        assert_eq!(f.footer, "<footer>F</footer>");
    }

    #[test]
    fn test_main_fallback_with_unclosed_paragraph() {
        let f = extract(
            "<body><p>intro<section>S</section><script>if (n < 2) go();</script><footer>F</footer></body>",
        );
        assert_eq!(f.header, "<p>intro");
        assert_eq!(
            f.main,
            "<p>intro<section>S</section><script>if (n < 2) go();</script>"
        );
        assert_eq!(f.footer, "<footer>F</footer>");
    }

    #[test]
    fn test_rewrite_all_fragments() {
        let f = extract(
            "<html><head><link href=\"css/site.css\"></head><body><header><img src=\"img/logo.png\"></header><main>M</main><footer><script src=\"js/app.js\"></script></footer></body></html>",
        );
        let mut mapping = PathMapping::new();
        mapping.insert("css/site.css", "css/site.css");
        mapping.insert("img/logo.png", "img/logo.png");
        mapping.insert("js/app.js", "js/app.js");

        let rewritten = f.rewrite(&mapping);
        assert!(rewritten.head.contains("/assets/css/site.css"));
        assert!(rewritten.header.contains("/assets/img/logo.png"));
        assert!(rewritten.footer.contains("/assets/js/app.js"));
        assert_eq!(rewritten.main, "<main>M</main>");
    }
}
