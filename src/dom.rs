use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, NodeList, ScrollBehavior,
    ScrollToOptions, Window,
};
use yew::{AppHandle, Callback};

use crate::components::lead_modal::{LeadModal, LeadModalProps};
use crate::lead_form::Tariff;
use crate::manager::field_selector;
use crate::page::{Page, Viewport};
use crate::submission::LeadSubmitter;

fn collect(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// `Page` over the live browser document.
pub struct DomPage {
    window: Window,
    document: Document,
    submitter: Rc<dyn LeadSubmitter>,
    on_close: RefCell<Callback<()>>,
    lead_form: RefCell<Option<AppHandle<LeadModal>>>,
}

impl DomPage {
    pub fn new(window: Window, document: Document, submitter: Rc<dyn LeadSubmitter>) -> Self {
        Self {
            window,
            document,
            submitter,
            on_close: RefCell::new(Callback::from(|_| ())),
            lead_form: RefCell::new(None),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// What the close button of the success message triggers.
    pub fn set_close_handler(&self, on_close: Callback<()>) {
        *self.on_close.borrow_mut() = on_close;
    }

    fn field(&self, form: &Element, name: &str) -> Option<Element> {
        form.query_selector(&field_selector(name)).ok().flatten()
    }
}

impl Page for DomPage {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        collect(self.document.query_selector_all(selector))
    }

    fn query_in(&self, root: &Element, selector: &str) -> Option<Element> {
        root.query_selector(selector).ok().flatten()
    }

    fn query_all_in(&self, root: &Element, selector: &str) -> Vec<Element> {
        collect(root.query_selector_all(selector))
    }

    fn set_class(&self, element: &Element, class: &str, enabled: bool) {
        let _ = element.class_list().toggle_with_force(class, enabled);
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        let Some(element) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = element.style();
        let _ = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
    }

    fn data(&self, element: &Element, key: &str) -> Option<String> {
        element.get_attribute(&format!("data-{}", key))
    }

    fn set_disabled(&self, element: &Element, disabled: bool) {
        let _ = if disabled {
            element.set_attribute("disabled", "")
        } else {
            element.remove_attribute("disabled")
        };
    }

    fn field_value(&self, form: &Element, name: &str) -> String {
        let Some(field) = self.field(form, name) else {
            return String::new();
        };
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = field.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            field.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_field_value(&self, form: &Element, name: &str, value: &str) {
        let Some(field) = self.field(form, name) else {
            return;
        };
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = field.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_html(&self, element: &Element, html: &str) {
        element.set_inner_html(html);
    }

    fn append_div(&self, parent: &Element, class: &str, styles: &[(&str, String)]) -> Option<Element> {
        let div = self.document.create_element("div").ok()?;
        div.set_class_name(class);
        for (property, value) in styles {
            self.set_style(&div, property, value);
        }
        parent.append_child(&div).ok()?;
        Some(div)
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn focus(&self, element: &Element) {
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn focus_body(&self) {
        if let Some(body) = self.document.body() {
            let _ = body.focus();
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport {
            width: read(self.window.inner_width()),
            height: read(self.window.inner_height()),
        }
    }

    fn document_top(&self, element: &Element) -> f64 {
        element.get_bounding_client_rect().top() + self.scroll_y()
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn mount_lead_form(&self, body: &Element, default_tariff: Option<Tariff>) {
        if let Some(previous) = self.lead_form.borrow_mut().take() {
            previous.destroy();
        }
        body.set_inner_html("");
        let props = LeadModalProps {
            default_tariff,
            submitter: self.submitter.clone(),
            on_close: self.on_close.borrow().clone(),
        };
        let handle = yew::Renderer::<LeadModal>::with_root_and_props(body.clone(), props).render();
        *self.lead_form.borrow_mut() = Some(handle);
    }

    fn unmount_lead_form(&self, body: &Element) {
        if let Some(handle) = self.lead_form.borrow_mut().take() {
            handle.destroy();
        }
        body.set_inner_html("");
    }
}
