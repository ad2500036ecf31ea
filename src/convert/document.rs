//! Parsed HTML document with raw source spans.
//!
//! The document is tokenized once with `tl` and built into an owned tree of
//! [`Node`] variants, with end tags matched against the source. Every node remembers the byte range it was parsed from,
//! so fragments are cut straight out of the original text instead of being
//! re-serialized. This keeps markup exactly as the author wrote it (no entity
//! escaping, no attribute reordering).

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::ConvertError;

/// Byte range into [`Document::source`].
pub type Span = Range<usize>;

/// A node in the parsed tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(Span),
    Comment(Span),
}

/// An element with its attributes and children.
#[derive(Debug, Clone)]
pub struct Element {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes in source order; names lowercased, values raw.
    pub attrs: Vec<(String, String)>,
    /// Full outer span, start tag through end tag.
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn span(&self) -> &Span {
        match self {
            Self::Element(el) => &el.span,
            Self::Text(span) | Self::Comment(span) => span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl Element {
    /// Value of an attribute, matched case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant (depth-first, pre-order, excluding self) with the given tag.
    pub fn find(&self, name: &str) -> Option<&Element> {
        find_in(&self.children, name)
    }
}

/// Depth-first, pre-order search over a node list.
fn find_in<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Element> {
    nodes.iter().filter_map(Node::as_element).find_map(|el| {
        if el.is(name) {
            Some(el)
        } else {
            find_in(&el.children, name)
        }
    })
}

/// One parsed HTML file.
#[derive(Debug)]
pub struct Document {
    source: String,
    roots: Vec<Node>,
    /// Spans of every comment in the file, sorted by start.
    comments: Vec<Span>,
}

impl Document {
    /// Parse HTML source. `path` is only used for error messages.
    pub fn parse(source: String, path: &Path) -> Result<Self, ConvertError> {
        let parse_error = |message: String| ConvertError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let tokens = {
            let dom = tl::parse(&source, tl::ParserOptions::default())
                .map_err(|e| parse_error(format!("{e:?}")))?;
            let mut lexer = Lexer {
                source: &source,
                parser: dom.parser(),
                tokens: Vec::new(),
            };
            lexer.collect_all(dom.children()).map_err(parse_error)?;
            lexer.tokens
        };

        let (roots, mut comments) = TreeBuilder::new(&source).build(tokens);
        comments.sort_by_key(|span| span.start);

        Ok(Self {
            source,
            roots,
            comments,
        })
    }

    /// First element with the given tag anywhere in the document.
    pub fn find(&self, name: &str) -> Option<&Element> {
        find_in(&self.roots, name)
    }

    pub fn head(&self) -> Option<&Element> {
        self.find("head")
    }

    pub fn body(&self) -> Option<&Element> {
        self.find("body")
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<&Element> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Element>) {
            for el in nodes.iter().filter_map(Node::as_element) {
                out.push(el);
                walk(&el.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }

    /// Source text of a span with every comment inside it removed.
    pub fn text(&self, span: &Span) -> String {
        let mut out = String::with_capacity(span.len());
        let mut cursor = span.start;
        for comment in &self.comments {
            if comment.start < cursor || comment.end > span.end {
                continue;
            }
            out.push_str(self.slice(cursor..comment.start));
            cursor = comment.end;
        }
        out.push_str(self.slice(cursor..span.end));
        out
    }

    /// Whole document with comments removed.
    pub fn full_text(&self) -> String {
        self.text(&(0..self.source.len()))
    }

    /// Exact source text of a span, comments included.
    pub fn raw(&self, span: &Span) -> &str {
        self.slice(span.clone())
    }

    #[inline]
    fn slice(&self, span: Span) -> &str {
        self.source.get(span).unwrap_or_default()
    }
}

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_TAGS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Elements that never have content or an end tag.
const VOID_TAGS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Start tags that end an open `<p>`.
const CLOSES_P: [&str; 34] = [
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "table",
    "ul",
];

static END_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</([A-Za-z][A-Za-z0-9:-]*)[^>]*>").expect("valid end tag regex")
});

/// Whether an open `open` element ends where a `next` start tag begins.
fn implied_end(open: &str, next: &str) -> bool {
    match open {
        "p" => CLOSES_P.contains(&next),
        "li" => next == "li",
        "dt" | "dd" => matches!(next, "dt" | "dd"),
        "option" => matches!(next, "option" | "optgroup"),
        "tr" => matches!(next, "tr" | "tbody" | "tfoot" | "thead"),
        "td" | "th" => matches!(next, "td" | "th" | "tr" | "tbody" | "tfoot" | "thead"),
        "thead" | "tbody" => matches!(next, "tbody" | "tfoot"),
        _ => false,
    }
}

/// Byte offset just past the `>` ending the start tag at `start`.
fn start_tag_end(source: &str, start: usize) -> usize {
    let mut quote = None;
    let mut after_eq = false;
    for (i, &b) in source.as_bytes().iter().enumerate().skip(start + 1) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'>' => return i + 1,
            b'"' | b'\'' if after_eq => quote = Some(b),
            _ => {}
        }
        if !b.is_ascii_whitespace() {
            after_eq = b == b'=';
        }
    }
    // unbalanced quote: settle for the first `>`
    source[start..]
        .find('>')
        .map_or(source.len(), |i| start + i + 1)
}

/// `(start, end)` of the first `</name>` at or after `from`, name matched
/// case-insensitively.
fn find_end_tag(source: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut at = from;
    while let Some(offset) = source.get(at..)?.find("</") {
        let open = at + offset;
        let name_end = open + 2 + name.len();
        let matches = bytes
            .get(open + 2..name_end)
            .is_some_and(|n| n.eq_ignore_ascii_case(name.as_bytes()))
            && !bytes.get(name_end).is_some_and(u8::is_ascii_alphanumeric);
        if matches {
            let end = source[name_end..]
                .find('>')
                .map_or(source.len(), |i| name_end + i + 1);
            return Some((open, end));
        }
        at = open + 2;
    }
    None
}

/// Markup `tl` recognized, in source order.
enum Token {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        start: usize,
    },
    Text(Span),
    Comment(Span),
}

impl Token {
    fn start(&self) -> usize {
        match self {
            Self::Start { start, .. } => *start,
            Self::Text(span) | Self::Comment(span) => span.start,
        }
    }
}

/// Flattens the `tl` tree into [`Token`]s.
///
/// `tl` only closes an element when the end tag matches the innermost open
/// one, and it reads `<` inside scripts as markup. Its nesting and its
/// `raw()` ranges are therefore not trusted: only start positions, attributes,
/// text and comments are taken from it, and [`TreeBuilder`] rebuilds the tree
/// from the source.
struct Lexer<'s, 'p> {
    source: &'s str,
    parser: &'p tl::Parser<'s>,
    tokens: Vec<Token>,
}

impl Lexer<'_, '_> {
    fn collect_all<'h>(
        &mut self,
        handles: impl IntoIterator<Item = &'h tl::NodeHandle>,
    ) -> Result<(), String> {
        for handle in handles {
            self.collect(*handle)?;
        }
        Ok(())
    }

    fn collect(&mut self, handle: tl::NodeHandle) -> Result<(), String> {
        let Some(node) = handle.get(self.parser) else {
            return Ok(());
        };

        match node {
            tl::Node::Tag(tag) => {
                let name = tag.name().as_utf8_str().to_ascii_lowercase();
                // `<?php`, `< 3` and the like stay text
                if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    return self.collect_all(tag.children().top().iter());
                }
                let attrs = tag
                    .attributes()
                    .iter()
                    .map(|(key, value)| {
                        (
                            key.to_ascii_lowercase(),
                            value.map(|v| v.into_owned()).unwrap_or_default(),
                        )
                    })
                    .collect();
                let start = self.span_of(tag.raw().as_bytes())?.start;
                self.tokens.push(Token::Start {
                    name,
                    attrs,
                    start,
                });
                self.collect_all(tag.children().top().iter())?;
            }
            tl::Node::Raw(bytes) if !bytes.as_bytes().is_empty() => {
                let span = self.span_of(bytes.as_bytes())?;
                self.tokens.push(Token::Text(span));
            }
            // an unterminated comment comes back empty
            tl::Node::Comment(bytes) if !bytes.as_bytes().is_empty() => {
                let span = self.comment_span(self.span_of(bytes.as_bytes())?);
                self.tokens.push(Token::Comment(span));
            }
            _ => {}
        }
        Ok(())
    }

    /// Locate a parser slice inside the source it was parsed from.
    fn span_of(&self, bytes: &[u8]) -> Result<Span, String> {
        let base = self.source.as_ptr() as usize;
        let start = (bytes.as_ptr() as usize)
            .checked_sub(base)
            .filter(|start| start + bytes.len() <= self.source.len())
            .ok_or_else(|| "node does not point into the source text".to_string())?;
        Ok(start..start + bytes.len())
    }

    /// Widen a comment span to cover its `<!--` and `-->` delimiters.
    fn comment_span(&self, mut span: Span) -> Span {
        let (before, inner, after) = (
            &self.source[..span.start],
            &self.source[span.clone()],
            &self.source[span.end..],
        );
        let widen_start = !inner.starts_with("<!--") && before.ends_with("<!--");
        let widen_end = !inner.ends_with("-->") && after.starts_with("-->");
        if widen_start {
            span.start -= 4;
        }
        if widen_end {
            span.end += 3;
        }
        span
    }
}

/// An element whose end has not been seen yet.
struct OpenElement {
    name: String,
    attrs: Vec<(String, String)>,
    start: usize,
    /// End of the start tag or of the last child, whichever is later.
    content_end: usize,
    children: Vec<Node>,
}

/// Builds the owned tree from source-ordered tokens.
///
/// End tags are read from the source between tokens. An end tag closes the
/// nearest open element with its name, and anything still open inside it ends
/// at its last content. End tags with no open element are ignored. Optional
/// end tags (`li`, `p`, table rows, ...) are implied by the start tags that
/// end them, and raw-text elements run to their own end tag.
struct TreeBuilder<'s> {
    source: &'s str,
    stack: Vec<OpenElement>,
    roots: Vec<Node>,
    comments: Vec<Span>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stack: Vec::new(),
            roots: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn build(mut self, mut tokens: Vec<Token>) -> (Vec<Node>, Vec<Span>) {
        tokens.sort_by_key(Token::start);

        let mut cursor = 0;
        for token in tokens {
            let start = token.start();
            // inside a raw-text element
            if start < cursor {
                continue;
            }
            self.gap(cursor..start);
            cursor = self.token(token);
        }
        self.gap(cursor..self.source.len());

        while !self.stack.is_empty() {
            self.close_top(None);
        }
        (self.roots, self.comments)
    }

    /// Handle one token, returning the offset where its markup ends.
    fn token(&mut self, token: Token) -> usize {
        match token {
            Token::Text(span) => {
                let end = span.end;
                self.push(Node::Text(span));
                end
            }
            Token::Comment(span) => {
                let end = span.end;
                self.comments.push(span.clone());
                self.push(Node::Comment(span));
                end
            }
            Token::Start { name, attrs, start } => self.start_tag(name, attrs, start),
        }
    }

    /// Source between two tokens: end tags, plus any text `tl` skipped.
    fn gap(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        let source = self.source;
        let mut cursor = span.start;
        for caps in END_TAG_RE.captures_iter(&source[span.clone()]) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let (open, close) = (span.start + whole.start(), span.start + whole.end());
            self.text(cursor..open);
            self.end_tag(&name.as_str().to_ascii_lowercase(), close);
            cursor = close;
        }
        self.text(cursor..span.end);
    }

    fn text(&mut self, span: Span) {
        if !span.is_empty() {
            self.push(Node::Text(span));
        }
    }

    fn start_tag(&mut self, name: String, attrs: Vec<(String, String)>, start: usize) -> usize {
        while self
            .stack
            .last()
            .is_some_and(|open| implied_end(&open.name, &name))
        {
            self.close_top(None);
        }

        let tag_end = start_tag_end(self.source, start);
        let self_closing = self.source[..tag_end].ends_with("/>");

        if VOID_TAGS.contains(&name.as_str()) || self_closing {
            self.push(Node::Element(Element {
                name,
                attrs,
                span: start..tag_end,
                children: Vec::new(),
            }));
            return tag_end;
        }

        if RAW_TEXT_TAGS.contains(&name.as_str()) {
            let len = self.source.len();
            let (body_end, end) = find_end_tag(self.source, tag_end, &name).unwrap_or((len, len));
            let children = if body_end > tag_end {
                vec![Node::Text(tag_end..body_end)]
            } else {
                Vec::new()
            };
            self.push(Node::Element(Element {
                name,
                attrs,
                span: start..end,
                children,
            }));
            return end;
        }

        self.stack.push(OpenElement {
            name,
            attrs,
            start,
            content_end: tag_end,
            children: Vec::new(),
        });
        tag_end
    }

    /// Close the nearest open `name`; `end` is just past its end tag.
    fn end_tag(&mut self, name: &str, end: usize) {
        let Some(depth) = self.stack.iter().rposition(|open| open.name == name) else {
            return;
        };
        while self.stack.len() > depth + 1 {
            self.close_top(None);
        }
        self.close_top(Some(end));
    }

    /// Pop the innermost open element. Without an explicit `end` it ends at
    /// its last content.
    fn close_top(&mut self, end: Option<usize>) {
        let Some(open) = self.stack.pop() else {
            return;
        };
        let end = end.unwrap_or(open.content_end);
        self.push(Node::Element(Element {
            name: open.name,
            attrs: open.attrs,
            span: open.start..end,
            children: open.children,
        }));
    }

    fn push(&mut self, node: Node) {
        let end = node.span().end;
        match self.stack.last_mut() {
            Some(open) => {
                open.content_end = open.content_end.max(end);
                open.children.push(node);
            }
            None => self.roots.push(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Document {
        Document::parse(html.to_string(), Path::new("index.html")).unwrap()
    }

    #[test]
    fn test_finds_head_and_body() {
        let doc = parse(
            "<html><head><title>T</title></head><body><p class=\"x\">Hi</p></body></html>",
        );
        assert!(doc.head().is_some());
        let body = doc.body().unwrap();
        let p = body.find("p").unwrap();
        assert_eq!(p.attr("class"), Some("x"));
        assert_eq!(doc.raw(&p.span), "<p class=\"x\">Hi</p>");
    }

    #[test]
    fn test_spans_keep_source_text() {
        let html = "<body><a href=\"a.html?x=1&amp;y=2\">A &amp; B</a></body>";
        let doc = parse(html);
        let a = doc.body().unwrap().find("a").unwrap();
        assert_eq!(doc.raw(&a.span), "<a href=\"a.html?x=1&amp;y=2\">A &amp; B</a>");
    }

    #[test]
    fn test_text_strips_comments() {
        let doc = parse("<div>a<!-- hidden -->b<span><!--x-->c</span></div>");
        let div = doc.find("div").unwrap();
        assert_eq!(doc.text(&div.span), "<div>ab<span>c</span></div>");
        assert!(doc.raw(&div.span).contains("hidden"));
    }

    #[test]
    fn test_find_is_depth_first() {
        let doc = parse("<body><div><header id=\"inner\"></header></div><header id=\"outer\"></header></body>");
        let header = doc.body().unwrap().find("header").unwrap();
        assert_eq!(header.attr("id"), Some("inner"));
    }

    #[test]
    fn test_elements_in_document_order() {
        let doc = parse("<div><img src=\"a.png\"><p><img src=\"b.png\"></p></div>");
        let srcs: Vec<_> = doc
            .elements()
            .into_iter()
            .filter_map(|el| el.attr("src"))
            .collect();
        assert_eq!(srcs, ["a.png", "b.png"]);
    }

    #[test]
    fn test_uppercase_tags_and_attrs() {
        let doc = parse("<BODY><img SRC=\"logo.png\"></BODY>");
        let img = doc.body().unwrap().find("img").unwrap();
        assert_eq!(img.attr("src"), Some("logo.png"));
    }

    #[test]
    fn test_inline_script_with_less_than_kept_whole() {
        let doc = parse(
            "<html><head><script>if (a < b) { x = 1; }</script><link href=\"a.css\"></head><body><p>x</p></body></html>",
        );
        let head = doc.head().unwrap();
        let names: Vec<_> = head.child_elements().map(|el| el.name.as_str()).collect();
        assert_eq!(names, ["script", "link"]);
        let script = head.find("script").unwrap();
        assert_eq!(doc.raw(&script.span), "<script>if (a < b) { x = 1; }</script>");
        assert!(script.find("b").is_none());

        let body = doc.body().unwrap();
        assert_eq!(doc.raw(&body.span), "<body><p>x</p></body>");
    }

    #[test]
    fn test_raw_text_elements_ignore_markup() {
        let doc = parse(
            "<head><script>for (i=0;i<n;i++) { s += '<div>'; }</script><style>a > b { color: red }</style><TITLE>a <b> c</TITLE></head>",
        );
        let head = doc.head().unwrap();
        assert_eq!(head.child_elements().count(), 3);
        assert_eq!(
            doc.raw(&head.find("script").unwrap().span),
            "<script>for (i=0;i<n;i++) { s += '<div>'; }</script>"
        );
        assert_eq!(
            doc.raw(&head.find("style").unwrap().span),
            "<style>a > b { color: red }</style>"
        );
        assert_eq!(doc.raw(&head.find("title").unwrap().span), "<TITLE>a <b> c</TITLE>");
        assert!(doc.find("div").is_none());
    }

    #[test]
    fn test_omitted_li_end_tags() {
        let html = "<body><header><ul><li>One<li>Two</ul></header><main>M</main></body>";
        let doc = parse(html);
        let header = doc.body().unwrap().find("header").unwrap();
        assert_eq!(doc.raw(&header.span), "<header><ul><li>One<li>Two</ul></header>");
        assert!(header.find("main").is_none());

        let ul = header.find("ul").unwrap();
        let items: Vec<_> = ul.child_elements().map(|li| doc.raw(&li.span)).collect();
        assert_eq!(items, ["<li>One", "<li>Two"]);
    }

    #[test]
    fn test_omitted_p_end_tags() {
        let doc = parse("<body><main><p>a<p>b<div>c</div></main><footer>F</footer></body>");
        let main = doc.find("main").unwrap();
        assert_eq!(doc.raw(&main.span), "<main><p>a<p>b<div>c</div></main>");
        let children: Vec<_> = main.child_elements().map(|el| el.name.as_str()).collect();
        assert_eq!(children, ["p", "p", "div"]);
        assert!(main.find("footer").is_none());

        let body = doc.body().unwrap();
        assert_eq!(body.child_elements().count(), 2);
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let doc = parse("<div><br>a<img src=\"x.png\"/>b<input type=text><hr></div>");
        let div = doc.find("div").unwrap();
        assert_eq!(doc.raw(&div.span), "<div><br>a<img src=\"x.png\"/>b<input type=text><hr></div>");
        let names: Vec<_> = div.child_elements().map(|el| el.name.as_str()).collect();
        assert_eq!(names, ["br", "img", "input", "hr"]);
        assert!(div.child_elements().all(|el| el.children.is_empty()));
    }

    #[test]
    fn test_stray_end_tag_ignored() {
        let doc = parse("<div>a</span>b</div><p>after</p>");
        let div = doc.find("div").unwrap();
        assert_eq!(doc.raw(&div.span), "<div>a</span>b</div>");
        assert!(div.find("p").is_none());
    }

    #[test]
    fn test_unclosed_at_end_of_input() {
        let doc = parse("<div><p>open");
        let div = doc.find("div").unwrap();
        assert_eq!(doc.raw(&div.span), "<div><p>open");
        assert_eq!(doc.raw(&div.find("p").unwrap().span), "<p>open");
    }

    #[test]
    fn test_processing_instruction_is_text() {
        let doc = parse("<body><?php echo 1; ?><main>M</main></body>");
        let body = doc.body().unwrap();
        let names: Vec<_> = body.child_elements().map(|el| el.name.as_str()).collect();
        assert_eq!(names, ["main"]);
        assert_eq!(doc.raw(&body.span), "<body><?php echo 1; ?><main>M</main></body>");
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let doc = parse("<a title=\"x > y\" href=\"a.html\">A</a>");
        let a = doc.find("a").unwrap();
        assert_eq!(a.attr("href"), Some("a.html"));
        assert_eq!(doc.raw(&a.span), "<a title=\"x > y\" href=\"a.html\">A</a>");
    }
}
