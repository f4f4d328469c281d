use crate::dom::{Document, Element, NodeId};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;
use url::Url;

/// Id of the `<script type="application/json">` block holding the page's
/// navigation configuration.
pub const NAV_CONFIG_ID: &str = "nav-config";

/// Parse raw HTML string into a [`Document`] rooted at `url`.
pub fn parse_html(html: &str, url: Url) -> Document {
    let document = Html::parse_document(html);
    let mut doc = Document::new(url);

    // Extract <title>
    doc.title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_string();

    convert_element(document.root_element(), None, &mut doc);
    doc
}

fn convert_element(el: ElementRef<'_>, parent: Option<NodeId>, doc: &mut Document) {
    let tag = el.value().name.local.as_ref().to_string();
    let attributes: HashMap<String, String> = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Embedded config is captured, not modelled as an element
    if tag == "script" {
        if el.value().attr("id") == Some(NAV_CONFIG_ID) {
            doc.set_nav_config(el.text().collect::<String>());
        }
        return;
    }

    let mut element = Element::new(tag, attributes);
    element.inner_html = el.inner_html();
    let node = doc.push(parent, element);

    for child_ref in el.children() {
        if let Node::Element(_) = child_ref.value() {
            if let Some(child_el) = ElementRef::wrap(child_ref) {
                convert_element(child_el, Some(node), doc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://stb.local/home.html").unwrap()
    }

    #[test]
    fn parse_simple_page() {
        let html = r#"
        <html>
            <head><title>Home</title></head>
            <body>
                <div id="div_page_a" style="position:absolute;left:10px;top:20px">
                    <img id="page_a" width="100" height="50" title="detail.html">
                </div>
                <span id="page_a_scroll">Some title</span>
            </body>
        </html>
        "#;

        let doc = parse_html(html, base());
        assert_eq!(doc.title, "Home");
        let img = doc.query("page_a").unwrap();
        assert_eq!(doc.title_of(img), "detail.html");
        assert_eq!(doc.width_of(img), 100.0);
        let wrap = doc.query("div_page_a").unwrap();
        assert_eq!(doc.offset_parent(img), Some(wrap));
        let scroll = doc.query("page_a_scroll").unwrap();
        assert_eq!(doc.inner_html(scroll), "Some title");
    }

    #[test]
    fn images_come_in_document_order() {
        let html = r#"<html><body>
            <img id="page_1"><div><img id="page_2"></div><img id="page_3">
        </body></html>"#;
        let doc = parse_html(html, base());
        let ids: Vec<&str> = doc
            .elements_by_tag("img")
            .filter_map(|n| doc.id_of(n))
            .collect();
        assert_eq!(ids, vec!["page_1", "page_2", "page_3"]);
    }

    #[test]
    fn captures_embedded_nav_config() {
        let html = r#"<html><body>
            <script type="application/json" id="nav-config">{"focus": "page_1"}</script>
            <script>var ignored = 1;</script>
        </body></html>"#;
        let doc = parse_html(html, base());
        assert_eq!(doc.nav_config().map(str::trim), Some(r#"{"focus": "page_1"}"#));
        assert_eq!(doc.elements_by_tag("script").count(), 0);
    }
}
