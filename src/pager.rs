//! Column pager: a sliding window over a longer list of columns.
//!
//! The page renders `end - begin + 1` columns into fixed slots. When focus
//! tries to leave the bottom slot downward (or the top slot upward) the
//! window shifts by one column and every visible slot is re-rendered through
//! the caller's switch function.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Document;
use crate::effects::marquee;
use crate::nav::config::MoveHook;
use crate::nav::{Direction, NavConfig, NavNode};

pub const CURSOR_NEXT_ID: &str = "cursor_page_next";
pub const CURSOR_PREV_ID: &str = "cursor_page_prev";

/// Re-render one visible slot: `(doc, columns, column_index, slot)`.
pub type SwitchFn<T> = Box<dyn FnMut(&mut Document, &[T], usize, usize)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerOptions {
    /// First visible column, inclusive.
    pub begin: usize,
    /// Last visible column, inclusive.
    pub end: usize,
    /// In-column index of the bottom slot.
    pub max_index: usize,
    /// Number of the first render slot.
    pub first_slot: usize,
    pub cursor_next: String,
    pub cursor_prev: String,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            begin: 0,
            end: 2,
            max_index: 2,
            first_slot: 1,
            cursor_next: CURSOR_NEXT_ID.to_string(),
            cursor_prev: CURSOR_PREV_ID.to_string(),
        }
    }
}

pub struct ColumnPager<T> {
    columns: Vec<T>,
    options: PagerOptions,
    switch_fn: SwitchFn<T>,
}

impl<T> std::fmt::Debug for ColumnPager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnPager")
            .field("columns", &self.columns.len())
            .field("options", &self.options)
            .finish()
    }
}

impl<T> ColumnPager<T> {
    /// Create the pager and set the cursor indicators for the initial window.
    pub fn new(
        doc: &mut Document,
        columns: Vec<T>,
        options: PagerOptions,
        switch_fn: impl FnMut(&mut Document, &[T], usize, usize) + 'static,
    ) -> Self {
        let pager = Self {
            columns,
            options,
            switch_fn: Box::new(switch_fn),
        };
        pager.show_cursors(doc);
        pager
    }

    pub fn begin(&self) -> usize {
        self.options.begin
    }

    pub fn end(&self) -> usize {
        self.options.end
    }

    pub fn columns(&self) -> &[T] {
        &self.columns
    }

    pub fn has_next(&self) -> bool {
        self.options.end + 1 < self.columns.len()
    }

    pub fn has_prev(&self) -> bool {
        self.options.begin > 0
    }

    /// React to a focus move out of `node`. Returns whether the window moved.
    pub fn on_move(&mut self, doc: &mut Document, node: &NavNode, dir: Direction) -> bool {
        if let Some(scroll) = node.handles.scroll {
            marquee::stop(doc, scroll);
        }
        let index = node.index();
        let shifted = match dir {
            Direction::Down if index == Some(self.options.max_index) => self.shift_down(),
            Direction::Up if index == Some(0) => self.shift_up(),
            _ => return false,
        };
        if shifted {
            log::debug!(
                "pager window → {}..={} of {}",
                self.options.begin,
                self.options.end,
                self.columns.len()
            );
            self.render(doc);
            self.show_cursors(doc);
        }
        shifted
    }

    fn shift_down(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.options.begin += 1;
        self.options.end += 1;
        true
    }

    fn shift_up(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.options.begin -= 1;
        self.options.end -= 1;
        true
    }

    fn render(&mut self, doc: &mut Document) {
        let last = self.options.end.min(self.columns.len().saturating_sub(1));
        for (slot, column) in (self.options.begin..=last).enumerate() {
            (self.switch_fn)(doc, &self.columns, column, self.options.first_slot + slot);
        }
    }

    fn show_cursors(&self, doc: &mut Document) {
        toggle(doc, &self.options.cursor_next, self.has_next());
        toggle(doc, &self.options.cursor_prev, self.has_prev());
    }
}

fn toggle(doc: &mut Document, id: &str, visible: bool) {
    let Some(node) = doc.query(id) else {
        return;
    };
    if visible {
        doc.show(node);
    } else {
        doc.hide(node);
    }
}

impl<T: 'static> ColumnPager<T> {
    /// Wrap a shared pager as an `onmove` hook. The hook never vetoes.
    pub fn into_hook(pager: Rc<RefCell<Self>>) -> MoveHook {
        Rc::new(move |doc: &mut Document, node: &NavNode, dir: Direction| {
            pager.borrow_mut().on_move(doc, node, dir);
            Ok(false)
        })
    }

    /// Install the pager on a column of element ids, listed top to bottom.
    /// Each id gets the pager as its `onmove` hook and its position as `index`.
    pub fn attach(pager: &Rc<RefCell<Self>>, config: &mut NavConfig, ids: &[&str]) {
        let hook = Self::into_hook(Rc::clone(pager));
        for (index, id) in ids.iter().enumerate() {
            let route = config.route_mut(*id);
            route.hooks.on_move = Some(Rc::clone(&hook));
            route.props.insert("index".to_string(), index.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use crate::host::MemoryHost;
    use crate::nav::graph::ElementHandles;
    use crate::nav::{NavigationSession, RouteOverride};
    use url::Url;

    type Renders = Rc<RefCell<Vec<(usize, usize)>>>;

    const PAGE: &str = r#"<html><body>
        <img id="cursor_page_next" src="next.png">
        <img id="cursor_page_prev" src="prev.png">
        <img id="page_list_0" style="position:absolute;left:0px;top:0px" width="200" height="100">
        <img id="page_list_1" style="position:absolute;left:0px;top:150px" width="200" height="100">
        <img id="page_list_2" style="position:absolute;left:0px;top:300px" width="200" height="100">
        <span id="page_list_2_scroll">An extremely long column entry title</span>
    </body></html>"#;

    fn doc() -> Document {
        parse_html(PAGE, Url::parse("http://stb.local/").unwrap())
    }

    fn pager(doc: &mut Document, columns: usize) -> (ColumnPager<String>, Renders) {
        let renders: Renders = Rc::default();
        let log = renders.clone();
        let columns = (0..columns).map(|i| format!("column {}", i)).collect();
        let pager = ColumnPager::new(doc, columns, PagerOptions::default(), move |_, _, i, slot| {
            log.borrow_mut().push((i, slot))
        });
        (pager, renders)
    }

    fn node_at(doc: &Document, index: usize) -> NavNode {
        let id = format!("page_list_{}", index);
        NavNode {
            handles: ElementHandles::resolve(doc, &id).unwrap(),
            id,
            adjacency: Default::default(),
            btn_info: None,
            hooks: Default::default(),
            props: [("index".to_string(), serde_json::Value::from(index))]
                .into_iter()
                .collect(),
        }
    }

    fn cursor_hidden(doc: &Document, id: &str) -> bool {
        doc.is_hidden(doc.query(id).unwrap())
    }

    #[test]
    fn initial_cursors() {
        let mut d = doc();
        let (p, renders) = pager(&mut d, 5);
        assert!(p.has_next());
        assert!(!cursor_hidden(&d, CURSOR_NEXT_ID));
        assert!(cursor_hidden(&d, CURSOR_PREV_ID));
        assert!(renders.borrow().is_empty());
    }

    #[test]
    fn five_columns_walk_down_to_the_end() {
        let mut d = doc();
        let (mut p, renders) = pager(&mut d, 5);
        let bottom = node_at(&d, 2);

        assert!(p.on_move(&mut d, &bottom, Direction::Down));
        assert_eq!((p.begin(), p.end()), (1, 3));
        assert_eq!(*renders.borrow(), vec![(1, 1), (2, 2), (3, 3)]);
        assert!(!cursor_hidden(&d, CURSOR_PREV_ID));

        assert!(p.on_move(&mut d, &bottom, Direction::Down));
        assert_eq!((p.begin(), p.end()), (2, 4));
        assert!(cursor_hidden(&d, CURSOR_NEXT_ID));

        renders.borrow_mut().clear();
        assert!(!p.on_move(&mut d, &bottom, Direction::Down));
        assert_eq!((p.begin(), p.end()), (2, 4));
        assert!(renders.borrow().is_empty());
        assert!(cursor_hidden(&d, CURSOR_NEXT_ID));
    }

    #[test]
    fn up_from_top_slot_shifts_back() {
        let mut d = doc();
        let (mut p, renders) = pager(&mut d, 4);
        let top = node_at(&d, 0);
        let bottom = node_at(&d, 2);
        p.on_move(&mut d, &bottom, Direction::Down);
        renders.borrow_mut().clear();

        assert!(p.on_move(&mut d, &top, Direction::Up));
        assert_eq!((p.begin(), p.end()), (0, 2));
        assert_eq!(*renders.borrow(), vec![(0, 1), (1, 2), (2, 3)]);
        assert!(cursor_hidden(&d, CURSOR_PREV_ID));
        assert!(!cursor_hidden(&d, CURSOR_NEXT_ID));
        // Already at the top
        assert!(!p.on_move(&mut d, &top, Direction::Up));
    }

    #[test]
    fn middle_slots_and_sideways_moves_do_nothing() {
        let mut d = doc();
        let (mut p, renders) = pager(&mut d, 5);
        let (top, middle, bottom) = (node_at(&d, 0), node_at(&d, 1), node_at(&d, 2));
        assert!(!p.on_move(&mut d, &middle, Direction::Down));
        assert!(!p.on_move(&mut d, &bottom, Direction::Right));
        assert!(!p.on_move(&mut d, &top, Direction::Down));
        assert!(renders.borrow().is_empty());
    }

    #[test]
    fn move_stops_marquee() {
        let mut d = doc();
        let (mut p, _) = pager(&mut d, 5);
        let node = node_at(&d, 2);
        let scroll = node.handles.scroll.unwrap();
        marquee::start(&mut d, scroll);
        p.on_move(&mut d, &node, Direction::Right);
        assert!(!marquee::is_scrolling(&d, scroll));
    }

    #[test]
    fn drives_a_session_column() {
        let mut d = doc();
        let (p, renders) = pager(&mut d, 5);
        let p = Rc::new(RefCell::new(p));
        let mut config = NavConfig::new()
            .with_focus("page_list_2")
            .with_route("page_list_0", RouteOverride::new().block(Direction::Up));
        ColumnPager::attach(&p, &mut config, &["page_list_0", "page_list_1", "page_list_2"]);

        let mut s = NavigationSession::new(d, MemoryHost::new(), &config).unwrap();
        let graph_node = s.graph().get("page_list_1").unwrap();
        assert_eq!(graph_node.index(), Some(1));

        // Bottom slot: no neighbor below, but the window shifts
        s.move_focus(Direction::Down).unwrap();
        assert_eq!(s.current(), "page_list_2");
        assert_eq!((p.borrow().begin(), p.borrow().end()), (1, 3));
        assert_eq!(renders.borrow().len(), 3);

        s.move_focus(Direction::Up).unwrap();
        assert_eq!(s.current(), "page_list_1");
        assert_eq!(renders.borrow().len(), 3);
    }
}
