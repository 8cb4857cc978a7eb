//! In-memory stand-ins for the browser, used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use futures::future::LocalBoxFuture;

use crate::focus::FOCUSABLE;
use crate::lead_form::{LeadPayload, Tariff};
use crate::page::{Page, Viewport};
use crate::random::RandomSource;
use crate::submission::{LeadSubmitter, SubmitError, SubmitReceipt};

#[derive(Debug, Default, Clone)]
struct Node {
    selectors: Vec<String>,
    parent: Option<usize>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    data: BTreeMap<String, String>,
    value: String,
    text: String,
    html: String,
    disabled: bool,
    removed: bool,
    top: f64,
}

/// A document made of nodes that match selectors by exact string.
pub struct FakePage {
    nodes: RefCell<Vec<Node>>,
    body: usize,
    active: Cell<Option<usize>>,
    scroll_y: Cell<f64>,
    viewport: Cell<Viewport>,
    scrolled_to: Cell<Option<f64>>,
    mounts: RefCell<Vec<Option<Tariff>>>,
}

impl FakePage {
    pub fn new() -> Self {
        let body = Node {
            selectors: vec!["body".into()],
            ..Node::default()
        };
        Self {
            nodes: RefCell::new(vec![body]),
            body: 0,
            active: Cell::new(None),
            scroll_y: Cell::new(0.0),
            viewport: Cell::new(Viewport {
                width: 1280.0,
                height: 800.0,
            }),
            scrolled_to: Cell::new(None),
            mounts: RefCell::new(Vec::new()),
        }
    }

    pub fn add(&self, tag: &str, selectors: &[&str]) -> usize {
        self.add_child(self.body, tag, selectors)
    }

    pub fn add_child(&self, parent: usize, tag: &str, selectors: &[&str]) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        let mut all: Vec<String> = vec![tag.to_string()];
        all.extend(selectors.iter().map(|s| s.to_string()));
        nodes.push(Node {
            selectors: all,
            parent: Some(parent),
            ..Node::default()
        });
        nodes.len() - 1
    }

    fn is_within(nodes: &[Node], id: usize, root: usize) -> bool {
        let mut cursor = nodes[id].parent;
        while let Some(parent) = cursor {
            if parent == root {
                return true;
            }
            cursor = nodes[parent].parent;
        }
        false
    }

    fn matching(&self, root: usize, selector: &str) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        (0..nodes.len())
            .filter(|id| {
                let node = &nodes[*id];
                !node.removed
                    && node.selectors.iter().any(|s| s == selector)
                    && Self::is_within(&nodes, *id, root)
            })
            .collect()
    }

    fn remove_descendants(&self, root: usize) {
        let mut nodes = self.nodes.borrow_mut();
        for id in 0..nodes.len() {
            if Self::is_within(&nodes, id, root) {
                nodes[id].removed = true;
            }
        }
    }

    pub fn set_data(&self, id: usize, key: &str, value: &str) {
        self.nodes.borrow_mut()[id]
            .data
            .insert(key.to_string(), value.to_string());
    }

    pub fn set_value(&self, id: usize, value: &str) {
        self.nodes.borrow_mut()[id].value = value.to_string();
    }

    pub fn set_top(&self, id: usize, top: f64) {
        self.nodes.borrow_mut()[id].top = top;
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn style(&self, id: usize, property: &str) -> Option<String> {
        self.nodes.borrow()[id].styles.get(property).cloned()
    }

    pub fn value(&self, id: usize) -> String {
        self.nodes.borrow()[id].value.clone()
    }

    pub fn text(&self, id: usize) -> String {
        self.nodes.borrow()[id].text.clone()
    }

    pub fn html(&self, id: usize) -> String {
        self.nodes.borrow()[id].html.clone()
    }

    pub fn is_disabled(&self, id: usize) -> bool {
        self.nodes.borrow()[id].disabled
    }

    pub fn scrolled_to(&self) -> Option<f64> {
        self.scrolled_to.get()
    }

    /// Default tariff of every lead form mounted so far.
    pub fn mounts(&self) -> Vec<Option<Tariff>> {
        self.mounts.borrow().clone()
    }

    pub fn rendered_forms(&self, body: usize) -> usize {
        self.matching(body, "form").len()
    }

    pub fn children_with_class(&self, parent: usize, class: &str) -> usize {
        self.nodes
            .borrow()
            .iter()
            .filter(|node| !node.removed && node.parent == Some(parent) && node.classes.contains(class))
            .count()
    }
}

impl Page for FakePage {
    type Element = usize;

    fn query(&self, selector: &str) -> Option<usize> {
        self.matching(self.body, selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<usize> {
        self.matching(self.body, selector)
    }

    fn query_in(&self, root: &usize, selector: &str) -> Option<usize> {
        self.matching(*root, selector).into_iter().next()
    }

    fn query_all_in(&self, root: &usize, selector: &str) -> Vec<usize> {
        self.matching(*root, selector)
    }

    fn set_class(&self, element: &usize, class: &str, enabled: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[*element].classes;
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn has_class(&self, element: &usize, class: &str) -> bool {
        self.nodes.borrow()[*element].classes.contains(class)
    }

    fn set_style(&self, element: &usize, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let styles = &mut nodes[*element].styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn data(&self, element: &usize, key: &str) -> Option<String> {
        self.nodes.borrow()[*element].data.get(key).cloned()
    }

    fn set_disabled(&self, element: &usize, disabled: bool) {
        self.nodes.borrow_mut()[*element].disabled = disabled;
    }

    fn field_value(&self, form: &usize, name: &str) -> String {
        self.query_in(form, &format!("[name=\"{}\"]", name))
            .map(|id| self.value(id))
            .unwrap_or_default()
    }

    fn set_field_value(&self, form: &usize, name: &str, value: &str) {
        if let Some(id) = self.query_in(form, &format!("[name=\"{}\"]", name)) {
            self.set_value(id, value);
        }
    }

    fn set_text(&self, element: &usize, text: &str) {
        self.nodes.borrow_mut()[*element].text = text.to_string();
    }

    fn set_html(&self, element: &usize, html: &str) {
        self.remove_descendants(*element);
        self.nodes.borrow_mut()[*element].html = html.to_string();
    }

    fn append_div(&self, parent: &usize, class: &str, styles: &[(&str, String)]) -> Option<usize> {
        let id = self.add_child(*parent, "div", &[format!(".{}", class).as_str()]);
        self.set_class(&id, class, true);
        for (property, value) in styles {
            self.set_style(&id, property, value);
        }
        Some(id)
    }

    fn remove(&self, element: &usize) {
        self.remove_descendants(*element);
        self.nodes.borrow_mut()[*element].removed = true;
    }

    fn focus(&self, element: &usize) {
        self.active.set(Some(*element));
    }

    fn focus_body(&self) {
        self.active.set(Some(self.body));
    }

    fn active_element(&self) -> Option<usize> {
        self.active.get()
    }

    fn body(&self) -> Option<usize> {
        Some(self.body)
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn document_top(&self, element: &usize) -> f64 {
        self.nodes.borrow()[*element].top
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scrolled_to.set(Some(top));
    }

    /// Renders a form with the four focusable controls of the real modal.
    fn mount_lead_form(&self, body: &usize, default_tariff: Option<Tariff>) {
        self.mounts.borrow_mut().push(default_tariff);
        let form = self.add_child(*body, "form", &[".connection-form"]);
        for tag in ["input", "input", "select", "button"] {
            self.add_child(form, tag, &[FOCUSABLE]);
        }
    }

    fn unmount_lead_form(&self, body: &usize) {
        self.remove_descendants(*body);
    }
}

/// Cycles through a fixed list of rolls.
pub struct FixedRandom {
    rolls: Vec<f64>,
    next: Cell<usize>,
}

impl FixedRandom {
    pub fn new(rolls: Vec<f64>) -> Self {
        assert!(!rolls.is_empty(), "need at least one roll");
        Self {
            rolls,
            next: Cell::new(0),
        }
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        let index = self.next.get();
        self.next.set((index + 1) % self.rolls.len());
        self.rolls[index]
    }
}

/// Resolves immediately with a canned outcome and remembers every payload.
pub struct RecordingSubmitter {
    outcome: Result<SubmitReceipt, SubmitError>,
    received: RefCell<Vec<LeadPayload>>,
}

impl RecordingSubmitter {
    pub fn succeeding() -> Self {
        Self {
            outcome: Ok(SubmitReceipt {
                message: "ok".into(),
            }),
            received: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(err: SubmitError) -> Self {
        Self {
            outcome: Err(err),
            received: RefCell::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<LeadPayload> {
        self.received.borrow().clone()
    }
}

impl LeadSubmitter for RecordingSubmitter {
    fn submit(&self, payload: LeadPayload) -> LocalBoxFuture<'static, Result<SubmitReceipt, SubmitError>> {
        self.received.borrow_mut().push(payload);
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}
