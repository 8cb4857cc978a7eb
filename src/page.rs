use crate::lead_form::Tariff;

/// Below this width the page is laid out for phones.
pub const NARROW_BREAKPOINT: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn is_narrow(&self) -> bool {
        self.width < NARROW_BREAKPOINT
    }
}

/// Everything the landing controller needs from the surrounding document.
///
/// The browser build implements this over `web-sys` (see `dom::DomPage`);
/// tests use an in-memory page. All mutations take `&self` because DOM
/// handles are shared references into the document anyway.
pub trait Page {
    type Element: Clone + PartialEq;

    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn query_in(&self, root: &Self::Element, selector: &str) -> Option<Self::Element>;
    fn query_all_in(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element>;

    fn set_class(&self, element: &Self::Element, class: &str, enabled: bool);
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn set_style(&self, element: &Self::Element, property: &str, value: &str);
    fn data(&self, element: &Self::Element, key: &str) -> Option<String>;
    fn set_disabled(&self, element: &Self::Element, disabled: bool);

    /// Value of the named form control inside `form`, empty when missing.
    fn field_value(&self, form: &Self::Element, name: &str) -> String;
    fn set_field_value(&self, form: &Self::Element, name: &str, value: &str);
    fn set_text(&self, element: &Self::Element, text: &str);
    fn set_html(&self, element: &Self::Element, html: &str);

    /// Creates a `div` with the given class and inline styles under `parent`.
    fn append_div(
        &self,
        parent: &Self::Element,
        class: &str,
        styles: &[(&str, String)],
    ) -> Option<Self::Element>;
    fn remove(&self, element: &Self::Element);

    fn focus(&self, element: &Self::Element);
    fn focus_body(&self);
    fn active_element(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;

    fn scroll_y(&self) -> f64;
    fn viewport(&self) -> Viewport;
    /// Distance from the top of the document to the top of `element`.
    fn document_top(&self, element: &Self::Element) -> f64;
    fn smooth_scroll_to(&self, top: f64);

    /// Renders the lead form into the modal body.
    fn mount_lead_form(&self, body: &Self::Element, default_tariff: Option<Tariff>);
    /// Tears down whatever `mount_lead_form` rendered and empties the body.
    fn unmount_lead_form(&self, body: &Self::Element);
}
