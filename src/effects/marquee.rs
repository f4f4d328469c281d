//! Marquee effect: scroll focused text that does not fit its box.

use crate::dom::{Document, NodeId};

/// Display width above which text is wrapped in a marquee.
pub const MARQUEE_MIN_WIDTH: usize = 20;

const MARQUEE_OPEN: &str = r#"<marquee behavior="alternate" direction="left" scrollamount="1">"#;
const MARQUEE_CLOSE: &str = "</marquee>";

/// Display width in columns; characters outside Latin-1 count double.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| if (c as u32) <= 0xff { 1 } else { 2 }).sum()
}

pub fn is_scrolling(doc: &Document, node: NodeId) -> bool {
    doc.inner_html(node).contains(MARQUEE_CLOSE)
}

/// Wrap the node's content in a marquee if it is too wide.
/// Returns whether a marquee was applied.
pub fn start(doc: &mut Document, node: NodeId) -> bool {
    if is_scrolling(doc, node) {
        return false;
    }
    let html = doc.inner_html(node);
    if display_width(html) <= MARQUEE_MIN_WIDTH {
        return false;
    }
    let wrapped = format!("{}{}{}", MARQUEE_OPEN, html, MARQUEE_CLOSE);
    doc.set_inner_html(node, wrapped);
    true
}

/// Remove the marquee wrapper, restoring the original content.
pub fn stop(doc: &mut Document, node: NodeId) -> bool {
    let html = doc.inner_html(node);
    let Some(open_start) = html.find("<marquee") else {
        return false;
    };
    let Some(open_len) = html[open_start..].find('>') else {
        return false;
    };
    let content_start = open_start + open_len + 1;
    let Some(close) = html.rfind(MARQUEE_CLOSE) else {
        return false;
    };
    if close < content_start {
        return false;
    }
    let restored = format!(
        "{}{}{}",
        &html[..open_start],
        &html[content_start..close],
        &html[close + MARQUEE_CLOSE.len()..]
    );
    doc.set_inner_html(node, restored);
    true
}
