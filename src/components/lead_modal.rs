use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::lead_form::{Field, FormPhase, LeadForm, LeadPayload, Tariff, INVALID_BORDER};
use crate::manager::{SUCCESS_TEXT, SUCCESS_TITLE};
use crate::phone::mask_phone;
use crate::submission::{LeadSubmitter, SubmitError, SubmitReceipt};

pub enum LeadAction {
    Name(String),
    Phone(String),
    Tariff(Tariff),
    Submit,
    Resolved {
        attempt: u64,
        outcome: Result<SubmitReceipt, SubmitError>,
    },
}

/// The form plus the payload waiting to be sent for the current attempt.
#[derive(Clone)]
struct ModalState {
    form: LeadForm,
    outbox: Option<(u64, LeadPayload)>,
}

impl Reducible for ModalState {
    type Action = LeadAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            LeadAction::Name(value) => next.form.set_name(&value),
            LeadAction::Phone(value) => next.form.set_phone(&value),
            LeadAction::Tariff(tariff) => next.form.set_tariff(tariff),
            LeadAction::Submit => {
                next.outbox = next.form.begin_submit();
                if next.outbox.is_none() {
                    log::debug!("lead form did not validate");
                }
            }
            LeadAction::Resolved { attempt, outcome } => {
                if !next.form.resolve(attempt, outcome) {
                    log::debug!("dropping result of stale attempt {}", attempt);
                    return self;
                }
                next.outbox = None;
            }
        }
        next.into()
    }
}

#[derive(Properties, Clone)]
pub struct LeadModalProps {
    pub default_tariff: Option<Tariff>,
    pub submitter: Rc<dyn LeadSubmitter>,
    pub on_close: Callback<()>,
}

impl PartialEq for LeadModalProps {
    fn eq(&self, other: &Self) -> bool {
        self.default_tariff == other.default_tariff
            && Rc::ptr_eq(&self.submitter, &other.submitter)
            && self.on_close == other.on_close
    }
}

fn border_style(form: &LeadForm, field: Field) -> String {
    if form.is_invalid(field) {
        format!("border-color: {};", INVALID_BORDER)
    } else {
        String::new()
    }
}

/// Body of the connection modal: the lead form, then the success message.
#[function_component(LeadModal)]
pub fn lead_modal(props: &LeadModalProps) -> Html {
    let default_tariff = props.default_tariff;
    let state = use_reducer(move || ModalState {
        form: LeadForm::new(default_tariff),
        outbox: None,
    });
    let name_ref = use_node_ref();

    // Focus lands on the first field when the modal opens.
    {
        let name_ref = name_ref.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(input) = name_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                }
                || ()
            },
            (),
        );
    }

    // A new attempt number means there is a payload to send.
    {
        let outbox = state.outbox.clone();
        let submitter = props.submitter.clone();
        let dispatcher = state.clone();
        use_effect_with_deps(
            move |attempt: &u64| {
                if let Some((pending, payload)) = outbox {
                    if pending == *attempt {
                        spawn_local(async move {
                            let outcome = submitter.submit(payload).await;
                            if let Err(err) = &outcome {
                                log::error!("Form submission error: {}", err);
                            }
                            dispatcher.dispatch(LeadAction::Resolved {
                                attempt: pending,
                                outcome,
                            });
                        });
                    }
                }
                || ()
            },
            state.form.attempt(),
        );
    }

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_close.emit(());
        })
    };

    if *state.form.phase() == FormPhase::Succeeded {
        return html! {
            <div class="success-state">
                <div class="success-icon">{"✓"}</div>
                <h4>{SUCCESS_TITLE}</h4>
                <p>{SUCCESS_TEXT}</p>
                <button class="success-close" onclick={close}>{"Закрыть"}</button>
            </div>
        };
    }

    let onsubmit = {
        let state = state.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            state.dispatch(LeadAction::Submit);
        })
    };
    let on_name = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            state.dispatch(LeadAction::Name(input.value()));
        })
    };
    let on_phone = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            // Write the mask back directly: when it comes out unchanged the
            // vdom has nothing to patch and the stray keystroke would stay.
            let masked = mask_phone(&input.value());
            input.set_value(&masked);
            state.dispatch(LeadAction::Phone(masked));
        })
    };
    let on_tariff = {
        let state = state.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<Tariff>() {
                Ok(tariff) => state.dispatch(LeadAction::Tariff(tariff)),
                Err(err) => log::warn!("{}", err),
            }
        })
    };

    let form = &state.form;
    let submitting = form.is_submitting();

    html! {
        <>
            <p class="modal-description">
                {"Оставьте заявку, и наш менеджер свяжется с вами в течение 15 минут"}
            </p>
            <form id="connection-form" class="connection-form" novalidate={true} onsubmit={onsubmit}>
                <div class="form-group">
                    <input
                        type="text"
                        name="name"
                        placeholder="Ваше имя"
                        required={true}
                        autocomplete="name"
                        ref={name_ref}
                        value={form.name().to_string()}
                        style={border_style(form, Field::Name)}
                        oninput={on_name}
                    />
                </div>
                <div class="form-group">
                    <input
                        type="tel"
                        name="phone"
                        placeholder="+7 (___) ___-__-__"
                        required={true}
                        autocomplete="tel"
                        value={form.phone().to_string()}
                        style={border_style(form, Field::Phone)}
                        oninput={on_phone}
                    />
                </div>
                <div class="form-group">
                    <select name="tariff" onchange={on_tariff}>
                        { for Tariff::ALL.iter().map(|tariff| html! {
                            <option value={tariff.as_str()} selected={*tariff == form.tariff()}>
                                {tariff.label()}
                            </option>
                        }) }
                    </select>
                </div>
                {
                    if let Some(error) = form.error() {
                        html! { <div class="form-error" role="alert">{error}</div> }
                    } else {
                        html! {}
                    }
                }
                <button
                    type="submit"
                    class={classes!("submit-button", "cta-gold-animation", submitting.then(|| "loading"))}
                    disabled={submitting}
                >
                    <span class="button-text">{"Отправить заявку"}</span>
                    <span class="button-loader"></span>
                </button>
            </form>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Rc<ModalState> {
        Rc::new(ModalState {
            form: LeadForm::new(Some(Tariff::Numbers)),
            outbox: None,
        })
    }

    #[test]
    fn invalid_submit_queues_nothing() {
        let next = state().reduce(LeadAction::Submit);
        assert!(next.outbox.is_none());
        assert!(next.form.is_invalid(Field::Name));
    }

    #[test]
    fn valid_submit_queues_the_payload() {
        let next = state()
            .reduce(LeadAction::Name("Ivan".into()))
            .reduce(LeadAction::Phone("71234567890".into()))
            .reduce(LeadAction::Submit);

        let (attempt, payload) = next.outbox.clone().expect("queued");
        assert_eq!(attempt, next.form.attempt());
        assert_eq!(payload.phone, "+7 (123) 456-78-90");
        assert_eq!(payload.tariff, Tariff::Numbers);

        let done = next.reduce(LeadAction::Resolved {
            attempt,
            outcome: Ok(SubmitReceipt::default()),
        });
        assert_eq!(done.form.phase(), &FormPhase::Succeeded);
        assert!(done.outbox.is_none());
    }

    #[test]
    fn stale_results_leave_state_untouched() {
        let submitted = state()
            .reduce(LeadAction::Name("Ivan".into()))
            .reduce(LeadAction::Phone("71234567890".into()))
            .reduce(LeadAction::Submit);

        let after = submitted.clone().reduce(LeadAction::Resolved {
            attempt: 99,
            outcome: Err(SubmitError::Network),
        });
        assert!(Rc::ptr_eq(&submitted, &after));
    }

    #[test]
    fn typing_while_in_flight_reaches_the_retry() {
        let submitted = state()
            .reduce(LeadAction::Name("Ivan".into()))
            .reduce(LeadAction::Phone("71234567890".into()))
            .reduce(LeadAction::Submit);
        let (attempt, _) = submitted.outbox.clone().expect("queued");

        let failed = submitted
            .reduce(LeadAction::Name("Ivan Petrov".into()))
            .reduce(LeadAction::Resolved {
                attempt,
                outcome: Err(SubmitError::Network),
            });
        assert_eq!(failed.form.name(), "Ivan Petrov");
        assert!(failed.form.error().is_some());

        let retried = failed.reduce(LeadAction::Submit);
        let (_, payload) = retried.outbox.clone().expect("retry queued");
        assert_eq!(payload.name, "Ivan Petrov");
        assert_eq!(payload.phone, "+7 (123) 456-78-90");
    }
}
