//! Structural model of an embedded module document.
//!
//! Search highlighting walks text nodes and wraps matches in marker elements,
//! so attribute values and tag names are never touched.

use scraper::{ElementRef, Html, Node as HtmlNode, Selector};

/// Class carried by every highlight marker.
pub const HIGHLIGHT_CLASS: &str = "search-highlight";

const VOID_TAGS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// Elements whose text is never searched.
const OPAQUE_TAGS: [&str; 4] = ["script", "style", "textarea", "noscript"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    fn highlight_marker(text: &str) -> Self {
        Self::new("span")
            .with_attr("class", HIGHLIGHT_CLASS)
            .with_text(text)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|v| v.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn is_opaque_for_search(&self) -> bool {
        OPAQUE_TAGS.contains(&self.tag.as_str()) || self.has_class(HIGHLIGHT_CLASS)
    }
}

/// Body content of an embedded page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDocument {
    body: Vec<Node>,
}

impl ContentDocument {
    pub fn from_nodes(body: Vec<Node>) -> Self {
        Self { body }
    }

    /// Parses a full HTML document (or a body fragment) and keeps the body's children.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let body = Selector::parse("body")
            .ok()
            .and_then(|selector| parsed.select(&selector).next())
            .map(convert_children)
            .unwrap_or_default();
        Self { body }
    }

    pub fn body(&self) -> &[Node] {
        &self.body
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.body, &mut out);
        out
    }

    /// Number of elements carrying `class`.
    pub fn count_class(&self, class: &str) -> usize {
        count_class_in(&self.body, class)
    }

    /// Wraps every case-insensitive occurrence of `query` in a highlight marker.
    /// Returns the number of markers added.
    pub fn highlight(&mut self, query: &str) -> usize {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return 0;
        }
        let mut added = 0;
        wrap_matches(&mut self.body, &needle, &mut added);
        added
    }

    /// Replaces each highlight marker with its plain text and merges adjacent text nodes.
    /// Returns the number of markers removed.
    pub fn clear_highlights(&mut self) -> usize {
        let mut removed = 0;
        unwrap_markers(&mut self.body, &mut removed);
        if removed > 0 {
            normalize(&mut self.body);
        }
        removed
    }

    /// Serializes the body content back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.body {
            write_node(node, false, &mut out);
        }
        out
    }
}

fn convert_children(element: ElementRef<'_>) -> Vec<Node> {
    element
        .children()
        .filter_map(|child| {
            if let Some(child_element) = ElementRef::wrap(child) {
                return Some(Node::Element(convert_element(child_element)));
            }
            match child.value() {
                HtmlNode::Text(text) => Some(Node::Text((**text).to_owned())),
                _ => None,
            }
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    Element {
        tag: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(name, val)| (name.to_string(), val.to_string()))
            .collect(),
        children: convert_children(element),
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

fn count_class_in(nodes: &[Node], class: &str) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text(_) => 0,
            Node::Element(element) => {
                usize::from(element.has_class(class)) + count_class_in(&element.children, class)
            }
        })
        .sum()
}

/// Byte ranges in `text` whose lowercase form equals `needle` (already lowercase).
fn find_case_insensitive(text: &str, needle: &str) -> Vec<(usize, usize)> {
    let mut lowered = String::with_capacity(text.len());
    // origin[i] = byte offset in `text` of the char that produced lowered byte i
    let mut origin: Vec<usize> = Vec::with_capacity(text.len() + 1);
    for (idx, ch) in text.char_indices() {
        let before = lowered.len();
        lowered.extend(ch.to_lowercase());
        origin.resize(origin.len() + (lowered.len() - before), idx);
    }
    origin.push(text.len());

    lowered
        .match_indices(needle)
        .map(|(start, matched)| (origin[start], origin[start + matched.len()]))
        .filter(|(start, end)| end > start)
        .collect()
}

fn wrap_matches(nodes: &mut Vec<Node>, needle: &str, added: &mut usize) {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            Node::Text(text) => {
                let ranges = find_case_insensitive(&text, needle);
                if ranges.is_empty() {
                    out.push(Node::Text(text));
                    continue;
                }
                let mut cursor = 0;
                for (start, end) in ranges {
                    if start > cursor {
                        out.push(Node::Text(text[cursor..start].to_string()));
                    }
                    out.push(Node::Element(Element::highlight_marker(&text[start..end])));
                    *added += 1;
                    cursor = end;
                }
                if cursor < text.len() {
                    out.push(Node::Text(text[cursor..].to_string()));
                }
            }
            Node::Element(mut element) => {
                if !element.is_opaque_for_search() {
                    wrap_matches(&mut element.children, needle, added);
                }
                out.push(Node::Element(element));
            }
        }
    }
    *nodes = out;
}

fn unwrap_markers(nodes: &mut Vec<Node>, removed: &mut usize) {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            Node::Element(element) if element.has_class(HIGHLIGHT_CLASS) => {
                *removed += 1;
                out.push(Node::Text(element.text_content()));
            }
            Node::Element(mut element) => {
                unwrap_markers(&mut element.children, removed);
                out.push(Node::Element(element));
            }
            text => out.push(text),
        }
    }
    *nodes = out;
}

/// Merges adjacent text nodes and drops empty ones, like `Node.normalize()`.
fn normalize(nodes: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => match out.last_mut() {
                Some(Node::Text(previous)) => previous.push_str(&text),
                _ => out.push(Node::Text(text)),
            },
            Node::Element(mut element) => {
                normalize(&mut element.children);
                out.push(Node::Element(element));
            }
        }
    }
    *nodes = out;
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => escape_into(text, false, out),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&element.tag.as_str()) {
                return;
            }
            let raw = matches!(element.tag.as_str(), "script" | "style");
            for child in &element.children {
                write_node(child, raw, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_wraps_text_nodes_only() {
        let mut doc = ContentDocument::parse(
            "<p>细胞核是细胞的控制中心，<b>细胞核</b>内有DNA</p><script>var q = \"细胞核\";</script>",
        );
        let added = doc.highlight("细胞核");
        assert_eq!(added, 2);
        assert_eq!(doc.count_class(HIGHLIGHT_CLASS), 2);
        assert_eq!(
            doc.to_html(),
            "<p><span class=\"search-highlight\">细胞核</span>是细胞的控制中心，<b><span class=\"search-highlight\">细胞核</span></b>内有DNA</p><script>var q = \"细胞核\";</script>"
        );
    }

    #[test]
    fn attribute_values_are_never_rewritten() {
        let mut doc = ContentDocument::parse("<div class=\"card\">card</div>");
        assert_eq!(doc.highlight("card"), 1);
        assert_eq!(
            doc.to_html(),
            "<div class=\"card\"><span class=\"search-highlight\">card</span></div>"
        );
    }

    #[test]
    fn matching_ignores_case_and_keeps_source_casing() {
        let mut doc = ContentDocument::parse("<p>Mitochondria and MITOCHONDRIA</p>");
        assert_eq!(doc.highlight("mitochondria"), 2);
        assert!(doc.to_html().contains(">MITOCHONDRIA</span>"));
        assert!(doc.to_html().contains(">Mitochondria</span>"));
    }

    #[test]
    fn highlighting_twice_does_not_nest_markers() {
        let mut doc = ContentDocument::parse("<p>液泡与液泡</p>");
        assert_eq!(doc.highlight("液泡"), 2);
        assert_eq!(doc.highlight("液泡"), 0);
        assert_eq!(doc.count_class(HIGHLIGHT_CLASS), 2);
    }

    #[test]
    fn clear_restores_text_and_merges_nodes() {
        let original = ContentDocument::parse("<p>线粒体是动力工厂，线粒体很重要</p>");
        let mut doc = original.clone();
        assert_eq!(doc.highlight("线粒体"), 2);
        assert_eq!(doc.clear_highlights(), 2);
        assert_eq!(doc, original);
        match &doc.body()[0] {
            Node::Element(p) => assert_eq!(p.children.len(), 1),
            other => panic!("expected <p>, got {other:?}"),
        }
    }

    #[test]
    fn clear_without_markers_is_a_no_op() {
        let mut doc = ContentDocument::parse("<p>细胞壁</p>");
        let before = doc.clone();
        assert_eq!(doc.clear_highlights(), 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn blank_query_highlights_nothing() {
        let mut doc = ContentDocument::parse("<p>细胞</p>");
        assert_eq!(doc.highlight("   "), 0);
    }

    #[test]
    fn text_is_escaped_on_serialization() {
        let doc = ContentDocument::from_nodes(vec![Node::Element(
            Element::new("p").with_text("a < b & c"),
        )]);
        assert_eq!(doc.to_html(), "<p>a &lt; b &amp; c</p>");
        assert_eq!(doc.text_content(), "a < b & c");
    }
}
