//! Navigation Graph: per-element neighbors, hooks, metadata and overlays.
//!
//! Built once per session from the registry. Computed adjacency is merged
//! with manual routes: a direction override is honored only when it is an
//! explicit `null` or names a registered element. In manual route mode
//! geometry is skipped and the routes are taken as they are.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use serde_json::{Map, Value};

use crate::dom::{Document, NodeId};

use super::adjacency::{adjacency_of, Adjacency};
use super::config::{Hooks, NavConfig, RouteOverride};
use super::registry::ElementRegistry;
use super::Direction;

/// Page elements attached to a focusable element, found by id convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandles {
    /// The focusable element itself (`{id}`).
    pub element: NodeId,
    /// Container shown while unfocused (`div_{id}`).
    pub wrap: Option<NodeId>,
    /// Focus overlay (`{id}_focus`).
    pub focus: Option<NodeId>,
    /// Image inside the focus overlay (`img_{id}_focus`).
    pub focus_image: Option<NodeId>,
    /// Selection overlay (`{id}_select`).
    pub select: Option<NodeId>,
    /// Marquee text target (`{id}_scroll`).
    pub scroll: Option<NodeId>,
    /// Highlight flag (`{id}_flag`).
    pub flag: Option<NodeId>,
}

impl ElementHandles {
    pub fn resolve(doc: &Document, id: &str) -> Option<Self> {
        Some(Self {
            element: doc.query(id)?,
            wrap: doc.query(&format!("div_{}", id)),
            focus: doc.query(&format!("{}_focus", id)),
            focus_image: doc.query(&format!("img_{}_focus", id)),
            select: doc.query(&format!("{}_select", id)),
            scroll: doc.query(&format!("{}_scroll", id)),
            flag: doc.query(&format!("{}_flag", id)),
        })
    }
}

/// One node of the navigation graph.
#[derive(Debug, Clone)]
pub struct NavNode {
    pub id: String,
    pub adjacency: Adjacency,
    /// Opaque per-element metadata.
    pub btn_info: Option<Value>,
    pub handles: ElementHandles,
    pub hooks: Hooks,
    /// Extra keys from the manual route, e.g. `index` for column paging.
    pub props: Map<String, Value>,
}

impl NavNode {
    pub fn neighbor(&self, dir: Direction) -> Option<&str> {
        self.adjacency.get(dir)
    }

    /// Position of the element inside its column.
    pub fn index(&self) -> Option<usize> {
        self.props
            .get("index")
            .and_then(Value::as_u64)
            .map(|i| i as usize)
    }

    /// `btn_info.focus_image`, the image swapped into the focus overlay.
    pub fn focus_image(&self) -> Option<&str> {
        self.btn_info
            .as_ref()
            .and_then(|info| info.get("focus_image"))
            .and_then(Value::as_str)
            .filter(|src| !src.is_empty())
    }
}

/// Element id → node, plus registry order of the nodes.
#[derive(Debug, Clone, Default)]
pub struct NavigationGraph {
    nodes: HashMap<String, NavNode>,
    order: Vec<String>,
}

impl NavigationGraph {
    pub fn build(doc: &Document, registry: &ElementRegistry, config: &NavConfig) -> Self {
        let started = Instant::now();
        let mut graph = Self::default();

        for id in registry.ids() {
            let route = config.routes.get(id);

            let adjacency = if config.route_type {
                let Some(route) = route else {
                    log::debug!("manual routes: `{}` has no route, not focusable", id);
                    continue;
                };
                manual_adjacency(route)
            } else {
                let mut adjacency = adjacency_of(registry, id, &config.canvas);
                if let Some(route) = route {
                    apply_overrides(&mut adjacency, id, route, registry);
                }
                adjacency
            };

            let Some(handles) = ElementHandles::resolve(doc, id) else {
                log::warn!("`{}` is registered but missing from the page", id);
                continue;
            };

            graph.insert(NavNode {
                id: id.clone(),
                adjacency,
                btn_info: config.info.get(id).cloned(),
                handles,
                hooks: route.map(|r| r.hooks.clone()).unwrap_or_default(),
                props: route.map(|r| r.props.clone()).unwrap_or_default(),
            });
        }

        if config.route_type {
            for id in config.routes.keys() {
                if !graph.contains(id) {
                    log::debug!("manual routes: `{}` is not a focusable element, ignored", id);
                }
            }
        }

        log::debug!(
            "navigation graph: {} nodes in {:.2}ms",
            graph.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        if log::log_enabled!(log::Level::Debug) {
            match graph.route_table_json() {
                Ok(json) => log::debug!("route table: {}", json),
                Err(e) => log::debug!("route table unavailable: {}", e),
            }
        }

        graph
    }

    pub fn insert(&mut self, node: NavNode) {
        if !self.nodes.contains_key(&node.id) {
            self.order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn get(&self, id: &str) -> Option<&NavNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node ids in registry order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn last(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Four-direction table of every node, sorted by id. Feeding it back as
    /// `routes` with `routeType: true` reproduces this graph without geometry.
    pub fn route_table(&self) -> BTreeMap<String, Adjacency> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.adjacency.clone()))
            .collect()
    }

    pub fn route_table_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.route_table())
    }
}

fn manual_adjacency(route: &RouteOverride) -> Adjacency {
    let mut adjacency = Adjacency::default();
    for (dir, target) in &route.directions {
        adjacency.set(*dir, target.clone());
    }
    adjacency
}

fn apply_overrides(
    adjacency: &mut Adjacency,
    id: &str,
    route: &RouteOverride,
    registry: &ElementRegistry,
) {
    for (dir, target) in &route.directions {
        match target {
            None => adjacency.set(*dir, None),
            Some(t) if registry.contains(t) => adjacency.set(*dir, Some(t.clone())),
            Some(t) => log::warn!(
                "route `{}`.{} names unknown element `{}`; keeping computed `{}`",
                id,
                dir,
                t,
                adjacency.get(*dir).unwrap_or("null")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use url::Url;

    /// Two rows:
    /// ```text
    ///   [page_card_1] [page_card_2]
    ///   [focus_btn  ]
    /// ```
    const PAGE: &str = r#"<html><body>
        <div id="div_page_card_1" style="position:absolute;left:0px;top:0px">
            <img id="page_card_1" width="200" height="100">
        </div>
        <div id="page_card_1_focus"><img id="img_page_card_1_focus"></div>
        <div id="page_card_1_select" class="flicker"></div>
        <img id="page_card_2" style="position:absolute;left:300px;top:0px" width="200" height="100">
        <span id="page_card_2_scroll">Card two</span>
        <img id="focus_btn" style="position:absolute;left:0px;top:200px" width="200" height="100">
        <span id="focus_btn_flag"></span>
    </body></html>"#;

    fn setup(config: &NavConfig) -> (Document, NavigationGraph) {
        let doc = parse_html(PAGE, Url::parse("http://stb.local/").unwrap());
        let registry = ElementRegistry::scan(&doc);
        let graph = NavigationGraph::build(&doc, &registry, config);
        (doc, graph)
    }

    #[test]
    fn computed_graph_and_handles() {
        let (doc, graph) = setup(&NavConfig::new());
        assert_eq!(graph.ids(), &["page_card_1", "page_card_2", "focus_btn"]);

        let card1 = graph.get("page_card_1").unwrap();
        assert_eq!(card1.neighbor(Direction::Right), Some("page_card_2"));
        assert_eq!(card1.neighbor(Direction::Down), Some("focus_btn"));
        assert_eq!(card1.neighbor(Direction::Left), None);
        assert_eq!(card1.handles.wrap, doc.query("div_page_card_1"));
        assert_eq!(card1.handles.focus, doc.query("page_card_1_focus"));
        assert_eq!(card1.handles.focus_image, doc.query("img_page_card_1_focus"));
        assert!(card1.handles.select.is_some());
        assert!(card1.handles.scroll.is_none());

        let card2 = graph.get("page_card_2").unwrap();
        assert!(card2.handles.scroll.is_some());
        assert_eq!(card2.neighbor(Direction::Left), Some("page_card_1"));

        let btn = graph.get("focus_btn").unwrap();
        assert!(btn.handles.flag.is_some());
        assert_eq!(btn.neighbor(Direction::Up), Some("page_card_1"));
    }

    #[test]
    fn override_to_unknown_element_keeps_computed() {
        let config = NavConfig::new()
            .with_route("focus_btn", RouteOverride::new().to(Direction::Up, "page_missing"));
        let (_, graph) = setup(&config);
        assert_eq!(graph.get("focus_btn").unwrap().neighbor(Direction::Up), Some("page_card_1"));
    }

    #[test]
    fn explicit_null_override_clears_neighbor() {
        let config = NavConfig::new().with_route(
            "focus_btn",
            RouteOverride::new()
                .block(Direction::Up)
                .to(Direction::Right, "page_card_2")
                .prop("index", 1),
        );
        let (_, graph) = setup(&config);
        let btn = graph.get("focus_btn").unwrap();
        assert_eq!(btn.neighbor(Direction::Up), None);
        assert_eq!(btn.neighbor(Direction::Right), Some("page_card_2"));
        assert_eq!(btn.index(), Some(1));
    }

    #[test]
    fn manual_mode_uses_routes_only() {
        let config = NavConfig::new()
            .with_route_type(true)
            .with_route("page_card_1", RouteOverride::new().to(Direction::Left, "page_card_2"))
            .with_route("page_ghost", RouteOverride::new().to(Direction::Left, "page_card_1"));
        let (_, graph) = setup(&config);
        assert_eq!(graph.ids(), &["page_card_1"]);
        let card1 = graph.get("page_card_1").unwrap();
        assert_eq!(card1.neighbor(Direction::Left), Some("page_card_2"));
        // Geometry is not consulted
        assert_eq!(card1.neighbor(Direction::Right), None);
    }

    #[test]
    fn info_is_attached() {
        let config = NavConfig::new().with_info(
            "page_card_1",
            serde_json::json!({"focus_image": "on.png", "price": 3}),
        );
        let (_, graph) = setup(&config);
        let card1 = graph.get("page_card_1").unwrap();
        assert_eq!(card1.focus_image(), Some("on.png"));
        assert_eq!(graph.get("page_card_2").unwrap().focus_image(), None);
    }

    #[test]
    fn route_table_feeds_manual_mode() {
        let (_, computed) = setup(&NavConfig::new());
        let json = computed.route_table_json().unwrap();
        let config = NavConfig::from_json(&format!(r#"{{"routeType": true, "routes": {}}}"#, json))
            .unwrap();
        let (_, manual) = setup(&config);
        assert_eq!(manual.route_table(), computed.route_table());
    }
}
