use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, Window};
use yew::Callback;

use crate::config;
use crate::dom::DomPage;
use crate::effects::slideshow::SLIDE_INTERVAL_MS;
use crate::error::LandingError;
use crate::lead_form::{Field, Tariff};
use crate::manager::{KeyOutcome, LandingManager, LOADING_HIDE_DELAY_MS};
use crate::random::JsRandom;
use crate::selectors::{ElementKey, SelectorMap};
use crate::submission::{HttpSubmitter, LeadSubmitter, MockSubmitter};

type Shared = Rc<RefCell<LandingManager<DomPage>>>;

thread_local! {
    static ACTIVE: RefCell<Option<Landing>> = RefCell::new(None);
}

/// An event listener that detaches itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &impl AsRef<EventTarget>,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, LandingError> {
        let target: &EventTarget = target.as_ref();
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| LandingError::listener(event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Runs `handler` against the manager if it is still alive.
fn with_manager<F>(manager: &Shared, handler: F) -> impl FnMut(Event) + 'static
where
    F: Fn(&mut LandingManager<DomPage>, &Event) + 'static,
{
    let manager = Rc::downgrade(manager);
    move |event: Event| {
        if let Some(manager) = manager.upgrade() {
            let mut manager = manager.borrow_mut();
            handler(&mut *manager, &event);
        }
    }
}

fn now_ms() -> f64 {
    web_sys::js_sys::Date::now()
}

fn choose_submitter() -> Rc<dyn LeadSubmitter> {
    match config::get_lead_endpoint() {
        Some(endpoint) => {
            log::info!("submitting leads to {}", endpoint);
            Rc::new(HttpSubmitter::new(endpoint))
        }
        None => {
            log::info!("no lead endpoint configured, using the mock collaborator");
            Rc::new(MockSubmitter::new(Rc::new(JsRandom)))
        }
    }
}

/// The running landing page: the manager plus everything keeping it wired
/// to the document. Dropping it detaches every listener.
pub struct Landing {
    manager: Shared,
    listeners: Vec<Listener>,
    slideshow: Option<Interval>,
}

impl Landing {
    pub fn start(window: Window) -> Result<Self, LandingError> {
        let document = window.document().ok_or(LandingError::NoDocument)?;
        let submitter = choose_submitter();
        let page = DomPage::new(window, document, submitter.clone());
        let manager: Shared = Rc::new(RefCell::new(LandingManager::new(
            page,
            &SelectorMap::default(),
            Rc::new(JsRandom),
        )));

        {
            let weak = Rc::downgrade(&manager);
            manager
                .borrow()
                .page()
                .set_close_handler(Callback::from(move |_| {
                    let Some(manager) = weak.upgrade() else {
                        return;
                    };
                    let Ok(generation) = manager.try_borrow().map(|m| m.modal_generation()) else {
                        return;
                    };
                    // The modal app can't be torn down from inside its own handler.
                    let weak = weak.clone();
                    spawn_local(async move {
                        if let Some(manager) = weak.upgrade() {
                            manager.borrow_mut().close_modal_from(generation);
                        }
                    });
                }));
        }
        manager.borrow_mut().init();

        let mut landing = Landing {
            manager,
            listeners: Vec::new(),
            slideshow: None,
        };
        landing.wire_ctas()?;
        landing.wire_navigation()?;
        landing.wire_modal()?;
        landing.wire_contact_form(submitter)?;
        landing.wire_features()?;
        landing.wire_window()?;
        landing.start_slideshow();
        Ok(landing)
    }

    fn listen(
        &mut self,
        target: &impl AsRef<EventTarget>,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), LandingError> {
        self.listeners.push(Listener::attach(target, event, handler)?);
        Ok(())
    }

    fn element(&self, key: ElementKey) -> Option<Element> {
        self.manager.borrow().elements().get(key).cloned()
    }

    fn elements(&self, key: ElementKey) -> Vec<Element> {
        self.manager.borrow().elements().all(key).to_vec()
    }

    fn wire_ctas(&mut self) -> Result<(), LandingError> {
        let primary = [
            ElementKey::CtaMain,
            ElementKey::NavCta,
            ElementKey::EsimCta,
            ElementKey::StickyCtaButton,
        ];
        for key in primary {
            if let Some(cta) = self.element(key) {
                let handler = with_manager(&self.manager, |manager, event| {
                    event.prevent_default();
                    manager.open_modal(None);
                });
                self.listen(&cta, "click", handler)?;
            }
        }

        if let Some(cta) = self.element(ElementKey::NumbersCta) {
            let handler = with_manager(&self.manager, |manager, event| {
                event.prevent_default();
                manager.open_modal(Some(Tariff::Numbers));
            });
            self.listen(&cta, "click", handler)?;
        }

        if let Some(call) = self.element(ElementKey::AcceptCall) {
            let handler = with_manager(&self.manager, |manager, event| {
                event.prevent_default();
                event.stop_propagation();
                log::info!("Accept call button clicked - opening modal");
                manager.open_modal(None);
            });
            self.listen(&call, "click", handler)?;
        }

        for button in self.elements(ElementKey::TariffButtons) {
            let target = button.clone();
            let handler = with_manager(&self.manager, move |manager, event| {
                event.prevent_default();
                manager.open_for_tariff_button(&target);
            });
            self.listen(&button, "click", handler)?;
        }
        Ok(())
    }

    fn wire_navigation(&mut self) -> Result<(), LandingError> {
        if let Some(learn_more) = self.element(ElementKey::CtaLearnMore) {
            let handler = with_manager(&self.manager, |manager, event| {
                event.prevent_default();
                manager.scroll_to_features();
            });
            self.listen(&learn_more, "click", handler)?;
        }
        if let Some(arrow) = self.element(ElementKey::ScrollArrow) {
            let handler = with_manager(&self.manager, |manager, _| manager.scroll_to_features());
            self.listen(&arrow, "click", handler)?;
        }
        if let Some(toggle) = self.element(ElementKey::MobileMenuToggle) {
            let handler = with_manager(&self.manager, |manager, _| manager.toggle_mobile_menu());
            self.listen(&toggle, "click", handler)?;
        }
        Ok(())
    }

    fn wire_modal(&mut self) -> Result<(), LandingError> {
        for control in self.elements(ElementKey::ModalClose) {
            let handler = with_manager(&self.manager, |manager, _| manager.close_modal());
            self.listen(&control, "click", handler)?;
        }

        let document = self.manager.borrow().page().document().clone();
        let handler = with_manager(&self.manager, |manager, event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let outcome = manager.on_keydown(&key_event.key(), key_event.shift_key());
            if outcome == KeyOutcome::PreventDefault {
                event.prevent_default();
            }
        });
        self.listen(&document, "keydown", handler)
    }

    fn wire_contact_form(&mut self, submitter: Rc<dyn LeadSubmitter>) -> Result<(), LandingError> {
        let Some(form) = self.element(ElementKey::ContactForm) else {
            return Ok(());
        };

        let mask = with_manager(&self.manager, |manager, event| {
            let is_phone = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|field| field.get_attribute("name"))
                .map_or(false, |name| name == Field::Phone.input_name());
            if is_phone {
                manager.mask_contact_phone();
            }
        });
        self.listen(&form, "input", mask)?;

        let weak: Weak<RefCell<LandingManager<DomPage>>> = Rc::downgrade(&self.manager);
        let submit = move |event: Event| {
            event.prevent_default();
            let Some(manager) = weak.upgrade() else {
                return;
            };
            let pending = manager.borrow_mut().begin_contact_submit();
            let Some((attempt, payload)) = pending else {
                return;
            };
            let submitter = submitter.clone();
            let weak = weak.clone();
            spawn_local(async move {
                let outcome = submitter.submit(payload).await;
                if let Err(err) = &outcome {
                    log::error!("Form submission error: {}", err);
                }
                if let Some(manager) = weak.upgrade() {
                    manager.borrow_mut().finish_contact_submit(attempt, outcome);
                }
            });
        };
        self.listen(&form, "submit", submit)
    }

    fn wire_features(&mut self) -> Result<(), LandingError> {
        for item in self.elements(ElementKey::FeatureItems) {
            let target = item.clone();
            let enter = with_manager(&self.manager, move |manager, _| manager.feature_enter(&target));
            self.listen(&item, "mouseenter", enter)?;

            let target = item.clone();
            let leave = with_manager(&self.manager, move |manager, _| manager.feature_leave(&target));
            self.listen(&item, "mouseleave", leave)?;
        }
        Ok(())
    }

    fn wire_window(&mut self) -> Result<(), LandingError> {
        let window = self.manager.borrow().page().window().clone();

        let scroll = with_manager(&self.manager, |manager, _| {
            manager.on_scroll(now_ms());
        });
        self.listen(&window, "scroll", scroll)?;

        let weak = Rc::downgrade(&self.manager);
        let resize = move |_: Event| {
            let Some(manager) = weak.upgrade() else {
                return;
            };
            let (ticket, wait_ms) = {
                let mut manager = manager.borrow_mut();
                (manager.request_resize(), manager.resize_wait_ms())
            };
            let weak = weak.clone();
            Timeout::new(wait_ms, move || {
                if let Some(manager) = weak.upgrade() {
                    manager.borrow_mut().resize_settled(ticket);
                }
            })
            .forget();
        };
        self.listen(&window, "resize", resize)?;

        let already_loaded = window
            .document()
            .map_or(false, |document| document.ready_state() == "complete");
        if already_loaded {
            self.hide_loading_later();
        } else {
            let weak = Rc::downgrade(&self.manager);
            let load = move |_: Event| schedule_hide_loading(weak.clone());
            self.listen(&window, "load", load)?;
        }
        Ok(())
    }

    fn hide_loading_later(&self) {
        schedule_hide_loading(Rc::downgrade(&self.manager));
    }

    fn start_slideshow(&mut self) {
        if self.manager.borrow().elements().all(ElementKey::Slides).is_empty() {
            return;
        }
        let weak = Rc::downgrade(&self.manager);
        self.slideshow = Some(Interval::new(SLIDE_INTERVAL_MS, move || {
            if let Some(manager) = weak.upgrade() {
                manager.borrow_mut().advance_slide();
            }
        }));
    }

    pub fn destroy(self) {
        let Landing {
            manager,
            listeners,
            slideshow,
        } = self;
        drop(listeners);
        drop(slideshow);
        manager.borrow_mut().destroy();
    }
}

fn schedule_hide_loading(manager: Weak<RefCell<LandingManager<DomPage>>>) {
    Timeout::new(LOADING_HIDE_DELAY_MS, move || {
        if let Some(manager) = manager.upgrade() {
            manager.borrow().hide_loading();
        }
    })
    .forget();
}

fn boot(window: Window) {
    match Landing::start(window) {
        Ok(landing) => ACTIVE.with(|slot| *slot.borrow_mut() = Some(landing)),
        Err(err) => gloo_console::error!(format!("landing page failed to start: {}", err)),
    }
}

/// Starts the controller once the DOM is ready.
pub fn run() {
    let Some(window) = web_sys::window() else {
        log::error!("{}", LandingError::NoWindow);
        return;
    };
    let Some(document) = window.document() else {
        log::error!("{}", LandingError::NoDocument);
        return;
    };

    if document.ready_state() != "loading" {
        boot(window);
        return;
    }

    let on_ready: Closure<dyn FnMut()> = Closure::once(move || boot(window));
    match document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref()) {
        Ok(()) => on_ready.forget(),
        Err(err) => log::error!("{}", LandingError::listener("DOMContentLoaded", err)),
    }
}

/// Detaches the controller from the page.
#[wasm_bindgen(js_name = destroyLanding)]
pub fn destroy_landing() {
    if let Some(landing) = ACTIVE.with(|slot| slot.borrow_mut().take()) {
        landing.destroy();
    }
}
