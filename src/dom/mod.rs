pub mod parser;
pub mod css;

use std::collections::HashMap;

use url::Url;

use css::StyleProps;

/// Handle to an element inside a [`Document`].
///
/// Handles are plain arena indices; they stay valid for the lifetime of the
/// document because elements are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A single page element.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub classes: Vec<String>,
    pub inner_html: String,
    pub style: StyleProps,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: impl Into<String>, attributes: HashMap<String, String>) -> Self {
        let classes = attributes
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let style = attributes
            .get("style")
            .map(|s| css::parse_inline_style(s))
            .unwrap_or_default();
        Self {
            tag: tag.into(),
            attributes,
            classes,
            inner_html: String::new(),
            style,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Pixel dimension from the `width`/`height` attribute, then inline style.
    fn dimension(&self, name: &str) -> f32 {
        self.attr(name)
            .and_then(css::parse_css_size)
            .or(match name {
                "width" => self.style.width,
                _ => self.style.height,
            })
            .unwrap_or(0.0)
    }
}

/// Rendered page: an arena of elements in document (pre-)order.
///
/// This is the page-side collaborator of the navigation engine. It answers
/// id lookups, exposes the per-element data the engine reads (title, href,
/// offsets, size) and carries the visual state the engine mutates
/// (classes, visibility, image source, inner HTML).
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    ids: HashMap<String, NodeId>,
    pub url: Url,
    pub title: String,
    nav_config: Option<String>,
}

impl Document {
    pub fn new(url: Url) -> Self {
        Self {
            elements: Vec::new(),
            ids: HashMap::new(),
            url,
            title: String::new(),
            nav_config: None,
        }
    }

    /// Append an element under `parent`. Elements must be pushed in
    /// document order. The first element carrying a given id wins lookups,
    /// like `getElementById`.
    pub fn push(&mut self, parent: Option<NodeId>, mut element: Element) -> NodeId {
        let node = NodeId(self.elements.len());
        element.parent = parent;
        if let Some(id) = element.id() {
            self.ids.entry(id.to_string()).or_insert(node);
        }
        self.elements.push(element);
        if let Some(p) = parent {
            self.elements[p.0].children.push(node);
        }
        node
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by id. Unknown or empty ids yield `None`.
    pub fn query(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.ids.get(id).copied()
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.elements[node.0]
    }

    pub fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.elements[node.0]
    }

    /// All elements with the given tag, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, el)| el.tag.eq_ignore_ascii_case(tag))
            .map(|(i, _)| NodeId(i))
    }

    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.element(node).id()
    }

    /// The `title` attribute, which TV pages use as the element's link target.
    pub fn title_of(&self, node: NodeId) -> &str {
        self.element(node).attr("title").unwrap_or("")
    }

    pub fn href_of(&self, node: NodeId) -> &str {
        self.element(node).attr("href").unwrap_or("")
    }

    pub fn show(&mut self, node: NodeId) {
        let style = &mut self.element_mut(node).style;
        style.display = Some("block".into());
        style.visibility = Some("visible".into());
    }

    pub fn hide(&mut self, node: NodeId) {
        let style = &mut self.element_mut(node).style;
        style.display = Some("none".into());
        style.visibility = Some("hidden".into());
    }

    /// Reads visibility only; `display` is ignored.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.element(node).style.visibility.as_deref() == Some("hidden")
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.element_mut(node).classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.element_mut(node).classes.retain(|c| c != class);
    }

    pub fn class_name(&self, node: NodeId) -> String {
        self.element(node).classes.join(" ")
    }

    pub fn src_of(&self, node: NodeId) -> &str {
        self.element(node).attr("src").unwrap_or("")
    }

    pub fn set_src(&mut self, node: NodeId, src: &str) {
        self.element_mut(node)
            .attributes
            .insert("src".to_string(), src.to_string());
    }

    pub fn inner_html(&self, node: NodeId) -> &str {
        &self.element(node).inner_html
    }

    pub fn set_inner_html(&mut self, node: NodeId, html: impl Into<String>) {
        self.element_mut(node).inner_html = html.into();
    }

    /// Nearest positioned ancestor, falling back to `<body>`.
    /// `<body>` and `<html>` have no offset parent.
    pub fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        let el = self.element(node);
        if el.tag == "body" || el.tag == "html" {
            return None;
        }
        let mut current = el.parent;
        while let Some(p) = current {
            let parent = self.element(p);
            if parent.style.position.is_positioned() || parent.tag == "body" {
                return Some(p);
            }
            current = parent.parent;
        }
        None
    }

    pub fn offset_left(&self, node: NodeId) -> f32 {
        self.element(node).style.left.unwrap_or(0.0)
    }

    pub fn offset_top(&self, node: NodeId) -> f32 {
        self.element(node).style.top.unwrap_or(0.0)
    }

    pub fn width_of(&self, node: NodeId) -> f32 {
        self.element(node).dimension("width")
    }

    pub fn height_of(&self, node: NodeId) -> f32 {
        self.element(node).dimension("height")
    }

    /// Raw JSON of the page's embedded navigation configuration, if any.
    pub fn nav_config(&self) -> Option<&str> {
        self.nav_config.as_deref()
    }

    pub fn set_nav_config(&mut self, json: impl Into<String>) {
        self.nav_config = Some(json.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Url::parse("http://stb.local/index.html").unwrap())
    }

    fn el(tag: &str, attrs: &[(&str, &str)]) -> Element {
        Element::new(
            tag,
            attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn query_finds_first_id_only() {
        let mut d = doc();
        let body = d.push(None, el("body", &[]));
        let first = d.push(Some(body), el("img", &[("id", "page_a")]));
        d.push(Some(body), el("img", &[("id", "page_a")]));
        assert_eq!(d.query("page_a"), Some(first));
        assert_eq!(d.query("missing"), None);
        assert_eq!(d.query(""), None);
    }

    #[test]
    fn show_hide_toggle_visibility() {
        let mut d = doc();
        let n = d.push(None, el("div", &[("style", "visibility:hidden")]));
        assert!(d.is_hidden(n));
        d.show(n);
        assert!(!d.is_hidden(n));
        assert_eq!(d.element(n).style.display.as_deref(), Some("block"));
        d.hide(n);
        assert!(d.is_hidden(n));
        assert_eq!(d.element(n).style.display.as_deref(), Some("none"));
    }

    #[test]
    fn class_list_is_a_set() {
        let mut d = doc();
        let n = d.push(None, el("div", &[("class", "select flicker")]));
        d.add_class(n, "scale");
        d.add_class(n, "scale");
        assert_eq!(d.class_name(n), "select flicker scale");
        d.remove_class(n, "scale");
        assert!(!d.has_class(n, "scale"));
        assert!(d.has_class(n, "flicker"));
    }

    #[test]
    fn offset_parent_skips_static_ancestors() {
        let mut d = doc();
        let html = d.push(None, el("html", &[]));
        let body = d.push(Some(html), el("body", &[]));
        let wrap = d.push(Some(body), el("div", &[("style", "position:absolute;left:100px")]));
        let plain = d.push(Some(wrap), el("div", &[]));
        let img = d.push(Some(plain), el("img", &[("style", "position:absolute;left:5px")]));
        assert_eq!(d.offset_parent(img), Some(wrap));
        assert_eq!(d.offset_parent(wrap), Some(body));
        assert_eq!(d.offset_parent(body), None);
        assert_eq!(d.offset_left(img), 5.0);
    }

    #[test]
    fn dimensions_prefer_attributes() {
        let mut d = doc();
        let n = d.push(
            None,
            el("img", &[("width", "120"), ("style", "width:80px;height:40px")]),
        );
        assert_eq!(d.width_of(n), 120.0);
        assert_eq!(d.height_of(n), 40.0);
    }
}
