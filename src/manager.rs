use std::rc::Rc;

use crate::effects::{features, particles::ParticleField, shapes, slideshow};
use crate::effects::slideshow::Slideshow;
use crate::focus::{trap_target, FOCUSABLE};
use crate::lead_form::{validate_fields, Field, LeadPayload, Tariff, INVALID_BORDER};
use crate::page::Page;
use crate::phone::mask_phone;
use crate::random::RandomSource;
use crate::scroll::{ScrollFrame, ScrollReactor, FEATURES_OFFSET, SCROLL_THROTTLE_MS};
use crate::selectors::{ElementCache, ElementKey, SelectorMap};
use crate::submission::{SubmitError, SubmitReceipt};
use crate::throttle::{Debounce, Throttle};

pub const RESIZE_DEBOUNCE_MS: u32 = 250;
pub const LOADING_HIDE_DELAY_MS: u32 = 500;

const MODAL_BODY: &str = ".modal-body";
const SUBMIT_BUTTON: &str = ".submit-button";
const FORM_ERROR: &str = "form-error";

pub const SUCCESS_TITLE: &str = "Заявка принята!";
pub const SUCCESS_TEXT: &str = "Наш менеджер свяжется с вами в течение 15 минут";

pub fn field_selector(name: &str) -> String {
    format!("[name=\"{}\"]", name)
}

/// Outcome of a key press as far as the browser is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    /// Handled, and the browser must not run its own default.
    PreventDefault,
}

#[derive(Debug, Clone, Default)]
struct ContactSubmission {
    attempt: u64,
    in_flight: bool,
}

/// Drives every interactive piece of the landing page.
///
/// The manager only owns state and talks to the document through `Page`;
/// the browser adapter decides when each handler runs.
pub struct LandingManager<P: Page> {
    page: P,
    elements: ElementCache<P::Element>,
    random: Rc<dyn RandomSource>,
    modal_open: bool,
    modal_generation: u64,
    scroll: ScrollReactor,
    scroll_throttle: Throttle,
    resize_debounce: Debounce,
    slideshow: Slideshow,
    particles: ParticleField<P::Element>,
    contact: ContactSubmission,
}

impl<P: Page> LandingManager<P> {
    pub fn new(page: P, selectors: &SelectorMap, random: Rc<dyn RandomSource>) -> Self {
        let elements = ElementCache::resolve(&page, selectors);
        let slideshow = Slideshow::new(elements.all(ElementKey::Slides).len());
        Self {
            page,
            elements,
            random,
            modal_open: false,
            modal_generation: 0,
            scroll: ScrollReactor::default(),
            scroll_throttle: Throttle::new(SCROLL_THROTTLE_MS),
            resize_debounce: Debounce::new(RESIZE_DEBOUNCE_MS),
            slideshow,
            particles: ParticleField::default(),
            contact: ContactSubmission::default(),
        }
    }

    /// One-time visual set-up: feature indices, floating shapes, particles.
    pub fn init(&mut self) {
        features::index_items(&self.page, self.elements.all(ElementKey::FeatureItems));
        shapes::animate(&self.page, self.elements.all(ElementKey::Shapes));
        self.refresh_particles();
        log::info!("LandingManager initialized");
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn elements(&self) -> &ElementCache<P::Element> {
        &self.elements
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Bumped on every open. A deferred close captures it and goes through
    /// `close_modal_from`, so it can't shut a modal opened after it.
    pub fn modal_generation(&self) -> u64 {
        self.modal_generation
    }

    #[cfg(test)]
    pub fn last_scroll_y(&self) -> f64 {
        self.scroll.last_y()
    }

    #[cfg(test)]
    pub fn current_slide(&self) -> usize {
        self.slideshow.current()
    }

    #[cfg(test)]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    // --- modal ---

    /// Opens the lead form. Returns false if it was already open or the
    /// page has no modal to open.
    pub fn open_modal(&mut self, default_tariff: Option<Tariff>) -> bool {
        if self.modal_open {
            return false;
        }
        let Some(modal) = self.elements.get(ElementKey::ConnectionModal) else {
            log::warn!("connection modal is missing, lead form unavailable");
            return false;
        };
        let Some(body) = self.page.query_in(modal, MODAL_BODY) else {
            log::warn!("connection modal has no {} region", MODAL_BODY);
            return false;
        };

        self.modal_open = true;
        self.modal_generation += 1;
        self.page.set_class(modal, "active", true);
        self.page.mount_lead_form(&body, default_tariff);
        log::debug!("lead form opened with tariff {:?}", default_tariff);
        true
    }

    /// Opens the modal preselecting the tariff named in the button's
    /// `data-tariff`.
    pub fn open_for_tariff_button(&mut self, button: &P::Element) -> bool {
        let tariff = self
            .page
            .data(button, "tariff")
            .and_then(|raw| match raw.parse::<Tariff>() {
                Ok(tariff) => Some(tariff),
                Err(err) => {
                    log::warn!("{}", err);
                    None
                }
            });
        self.open_modal(tariff)
    }

    pub fn close_modal(&mut self) {
        let Some(modal) = self.elements.get(ElementKey::ConnectionModal) else {
            return;
        };
        self.page.set_class(modal, "active", false);
        if let Some(body) = self.page.query_in(modal, MODAL_BODY) {
            self.page.unmount_lead_form(&body);
        }
        self.modal_open = false;
        self.page.focus_body();
    }

    /// Closes the modal only if it is still the one opened as `generation`.
    pub fn close_modal_from(&mut self, generation: u64) -> bool {
        if !self.modal_open || generation != self.modal_generation {
            log::debug!("ignoring close for stale modal generation {}", generation);
            return false;
        }
        self.close_modal();
        true
    }

    pub fn on_keydown(&mut self, key: &str, shift: bool) -> KeyOutcome {
        if !self.modal_open {
            return KeyOutcome::Ignored;
        }
        match key {
            "Escape" => {
                self.close_modal();
                KeyOutcome::Handled
            }
            "Tab" => {
                if self.trap_focus(shift) {
                    KeyOutcome::PreventDefault
                } else {
                    KeyOutcome::Handled
                }
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn trap_focus(&self, backwards: bool) -> bool {
        let Some(modal) = self.elements.get(ElementKey::ConnectionModal) else {
            return false;
        };
        let focusable = self.page.query_all_in(modal, FOCUSABLE);
        let current = self
            .page
            .active_element()
            .and_then(|active| focusable.iter().position(|el| *el == active));
        match trap_target(current, focusable.len(), backwards) {
            Some(index) => {
                self.page.focus(&focusable[index]);
                true
            }
            None => false,
        }
    }

    // --- scrolling and layout ---

    /// Runs the scroll reactor unless the throttle drops this call.
    pub fn on_scroll(&mut self, now_ms: f64) -> Option<ScrollFrame> {
        if !self.scroll_throttle.admit(now_ms) {
            return None;
        }
        let frame = self.scroll.react(self.page.scroll_y(), self.page.viewport());
        log::trace!("scroll delta {}", frame.delta);

        if let Some(nav) = self.elements.get(ElementKey::Nav) {
            self.page.set_class(nav, "scrolled", frame.nav_scrolled);
            for (property, value) in frame.nav_presentation().declarations() {
                self.page.set_style(nav, property, value);
            }
        }
        if let Some(sticky) = self.elements.get(ElementKey::StickyCta) {
            self.page.set_class(sticky, "visible", frame.sticky_visible);
        }
        Some(frame)
    }

    /// Records a resize and returns the ticket its timer must present to
    /// `resize_settled`.
    pub fn request_resize(&mut self) -> u64 {
        self.resize_debounce.schedule()
    }

    pub fn resize_wait_ms(&self) -> u32 {
        self.resize_debounce.wait_ms()
    }

    pub fn resize_settled(&mut self, ticket: u64) -> bool {
        if !self.resize_debounce.settle(ticket) {
            return false;
        }
        self.refresh_particles();
        true
    }

    fn refresh_particles(&mut self) -> bool {
        let Some(container) = self.elements.get(ElementKey::ParticlesField) else {
            return false;
        };
        self.particles
            .sync(&self.page, container, self.page.viewport(), self.random.as_ref())
    }

    pub fn scroll_to_features(&self) {
        if let Some(features) = self.elements.get(ElementKey::Features) {
            let top = self.page.document_top(features) - FEATURES_OFFSET;
            self.page.smooth_scroll_to(top);
        }
    }

    pub fn toggle_mobile_menu(&self) {
        let Some(toggle) = self.elements.get(ElementKey::MobileMenuToggle) else {
            return;
        };
        let open = !self.page.has_class(toggle, "active");
        self.page.set_class(toggle, "active", open);
        if let Some(menu) = self.elements.get(ElementKey::NavMenu) {
            self.page.set_class(menu, "active", open);
        }
        if let Some(body) = self.page.body() {
            self.page.set_class(&body, "menu-open", open);
        }
    }

    pub fn hide_loading(&self) {
        if let Some(loading) = self.elements.get(ElementKey::LoadingState) {
            self.page.set_class(loading, "hidden", true);
        }
    }

    // --- effects ---

    pub fn feature_enter(&self, item: &P::Element) {
        features::enhance(&self.page, item);
    }

    pub fn feature_leave(&self, item: &P::Element) {
        features::reset(&self.page, item);
    }

    /// Hands the `active` class to the next slide.
    pub fn advance_slide(&mut self) -> Option<usize> {
        let (previous, next) = self.slideshow.advance()?;
        let slides = self.elements.all(ElementKey::Slides);
        self.page.set_class(&slides[previous], slideshow::ACTIVE_CLASS, false);
        self.page.set_class(&slides[next], slideshow::ACTIVE_CLASS, true);
        Some(next)
    }

    // --- in-page contact form ---

    pub fn mask_contact_phone(&self) {
        if let Some(form) = self.elements.get(ElementKey::ContactForm) {
            let raw = self.page.field_value(form, Field::Phone.input_name());
            self.page
                .set_field_value(form, Field::Phone.input_name(), &mask_phone(&raw));
        }
    }

    /// Validates the contact form and, if it passes, locks it for
    /// submission. Returns the attempt number and payload to send.
    pub fn begin_contact_submit(&mut self) -> Option<(u64, LeadPayload)> {
        let form = self.elements.get(ElementKey::ContactForm)?;
        if self.contact.in_flight {
            return None;
        }

        let name = self.page.field_value(form, Field::Name.input_name());
        let phone = self.page.field_value(form, Field::Phone.input_name());
        let tariff = self
            .page
            .field_value(form, "tariff")
            .parse::<Tariff>()
            .unwrap_or_default();

        let invalid = validate_fields(&name, &phone);
        for field in Field::REQUIRED {
            if let Some(input) = self.page.query_in(form, &field_selector(field.input_name())) {
                let border = if invalid.contains(&field) { INVALID_BORDER } else { "" };
                self.page.set_style(&input, "border-color", border);
            }
        }
        if !invalid.is_empty() {
            return None;
        }

        if let Some(button) = self.page.query_in(form, SUBMIT_BUTTON) {
            self.page.set_disabled(&button, true);
            self.page.set_class(&button, "loading", true);
        }
        if let Some(error) = self.page.query_in(form, &format!(".{}", FORM_ERROR)) {
            self.page.set_text(&error, "");
        }

        self.contact.attempt += 1;
        self.contact.in_flight = true;
        Some((
            self.contact.attempt,
            LeadPayload {
                name: name.trim().to_string(),
                phone: phone.trim().to_string(),
                tariff,
            },
        ))
    }

    pub fn finish_contact_submit(
        &mut self,
        attempt: u64,
        outcome: Result<SubmitReceipt, SubmitError>,
    ) -> bool {
        if attempt != self.contact.attempt || !self.contact.in_flight {
            return false;
        }
        self.contact.in_flight = false;
        let Some(form) = self.elements.get(ElementKey::ContactForm) else {
            return false;
        };

        if let Some(button) = self.page.query_in(form, SUBMIT_BUTTON) {
            self.page.set_disabled(&button, false);
            self.page.set_class(&button, "loading", false);
        }

        match outcome {
            Ok(_) => {
                self.page.set_html(
                    form,
                    &format!(
                        "<div class=\"success-state\"><div class=\"success-icon\">✓</div>\
                         <h4>{}</h4><p>{}</p></div>",
                        SUCCESS_TITLE, SUCCESS_TEXT
                    ),
                );
            }
            Err(err) => {
                log::error!("contact form submission failed: {}", err);
                let error = self
                    .page
                    .query_in(form, &format!(".{}", FORM_ERROR))
                    .or_else(|| self.page.append_div(form, FORM_ERROR, &[]));
                if let Some(error) = error {
                    self.page.set_text(&error, &format!("Ошибка: {}", err));
                }
            }
        }
        true
    }

    /// Undoes what the manager put on the page.
    pub fn destroy(&mut self) {
        if self.modal_open {
            self.close_modal();
        }
        self.particles.clear(&self.page);
        log::info!("LandingManager destroyed");
    }
}
