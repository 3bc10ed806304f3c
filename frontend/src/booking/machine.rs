//! Submission state machine for the booking form, independent of the DOM.

use std::cell::RefCell;

use super::relay::{classify, classify_transport, FormPayload, Outcome, Relay, SUCCESS_MESSAGE};
use super::validate::{validate, BookingFields, Field};

pub const SENDING_LABEL: &str = "Sending…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn class_suffix(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Sending,
    Success,
    Error(String),
}

/// Everything the machine needs from the form on screen.
pub trait FormView {
    fn fields(&self) -> BookingFields;
    fn payload(&self) -> FormPayload;
    fn clear_errors(&self);
    fn set_field_error(&self, field: Field, message: &str);
    /// Returns `false` when the field's control is not on the page.
    fn focus(&self, field: Field) -> bool;
    /// `None` empties the status line.
    fn set_status(&self, status: Option<(&str, StatusKind)>);
    fn submit_label(&self) -> String;
    fn set_busy(&self, busy: bool, label: &str);
    fn reset(&self);
}

/// Holds the submit control disabled until dropped.
struct BusyGuard<'a, V: FormView> {
    view: &'a V,
    label: String,
}

impl<'a, V: FormView> BusyGuard<'a, V> {
    fn engage(view: &'a V) -> Self {
        let label = view.submit_label();
        view.set_busy(true, SENDING_LABEL);
        Self { view, label }
    }
}

impl<V: FormView> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_busy(false, &self.label);
    }
}

pub struct BookingForm<V, R> {
    view: V,
    relay: R,
    state: RefCell<SubmitState>,
}

impl<V: FormView, R: Relay> BookingForm<V, R> {
    pub fn new(view: V, relay: R) -> Self {
        Self {
            view,
            relay,
            state: RefCell::new(SubmitState::Idle),
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    fn enter(&self, next: SubmitState) {
        log::debug!("booking form: {:?} -> {:?}", self.state.borrow(), next);
        *self.state.borrow_mut() = next;
    }

    /// Runs one submit attempt to completion and returns the final state.
    pub async fn submit(&self) -> SubmitState {
        if *self.state.borrow() == SubmitState::Sending {
            log::debug!("booking form: submit ignored, already sending");
            return SubmitState::Sending;
        }

        self.view.clear_errors();
        self.view.set_status(None);
        self.enter(SubmitState::Validating);

        if let Err(errors) = validate(&self.view.fields()) {
            for err in &errors {
                self.view.set_field_error(err.field, err.message);
            }
            // First invalid control that actually exists gets focus.
            let _ = errors.iter().any(|err| self.view.focus(err.field));
            self.enter(SubmitState::Idle);
            return self.state();
        }

        self.enter(SubmitState::Sending);
        let outcome = {
            let _busy = BusyGuard::engage(&self.view);
            match self.relay.send(&self.view.payload()).await {
                Ok(reply) => classify(&reply),
                Err(err) => {
                    log::warn!("booking form: relay unreachable: {}", err);
                    classify_transport(&err)
                }
            }
        };

        match outcome {
            Outcome::Delivered => {
                log::info!("booking form: request delivered");
                self.view.set_status(Some((SUCCESS_MESSAGE, StatusKind::Success)));
                self.view.reset();
                let _ = self.view.focus(Field::Name);
                self.enter(SubmitState::Success);
            }
            Outcome::Failed(message) => {
                log::warn!("booking form: request failed: {}", message);
                self.view.set_status(Some((message.as_str(), StatusKind::Error)));
                self.enter(SubmitState::Error(message));
            }
        }
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::join;

    use super::*;
    use crate::booking::relay::{RelayBody, RelayReply, FALLBACK_MESSAGE, NETWORK_MESSAGE};
    use crate::error::TransportError;

    #[derive(Default)]
    struct Screen {
        fields: BookingFields,
        errors: BTreeMap<&'static str, String>,
        focused: Option<Field>,
        missing: Vec<Field>,
        status: Option<(String, StatusKind)>,
        label: String,
        busy: bool,
        busy_changes: Vec<bool>,
        resets: usize,
    }

    #[derive(Clone)]
    struct FakeView(Rc<RefCell<Screen>>);

    impl FakeView {
        fn with(name: &str, email: &str, message: &str) -> Self {
            let screen = Screen {
                fields: BookingFields {
                    name: name.into(),
                    email: email.into(),
                    message: message.into(),
                },
                label: "Request appointment".into(),
                ..Screen::default()
            };
            Self(Rc::new(RefCell::new(screen)))
        }
    }

    impl FormView for FakeView {
        fn fields(&self) -> BookingFields {
            self.0.borrow().fields.clone()
        }

        fn payload(&self) -> FormPayload {
            let screen = self.0.borrow();
            let f = &screen.fields;
            FormPayload(vec![
                ("name".into(), f.name.clone()),
                ("email".into(), f.email.clone()),
                ("message".into(), f.message.clone()),
            ])
        }

        fn clear_errors(&self) {
            self.0.borrow_mut().errors.clear();
        }

        fn set_field_error(&self, field: Field, message: &str) {
            self.0
                .borrow_mut()
                .errors
                .insert(field.error_id(), message.to_string());
        }

        fn focus(&self, field: Field) -> bool {
            let mut screen = self.0.borrow_mut();
            if screen.missing.contains(&field) {
                return false;
            }
            screen.focused = Some(field);
            true
        }

        fn set_status(&self, status: Option<(&str, StatusKind)>) {
            self.0.borrow_mut().status = status.map(|(text, kind)| (text.to_string(), kind));
        }

        fn submit_label(&self) -> String {
            self.0.borrow().label.clone()
        }

        fn set_busy(&self, busy: bool, label: &str) {
            let mut screen = self.0.borrow_mut();
            screen.busy = busy;
            screen.busy_changes.push(busy);
            screen.label = label.to_string();
        }

        fn reset(&self) {
            let mut screen = self.0.borrow_mut();
            screen.fields = BookingFields::default();
            screen.resets += 1;
        }
    }

    /// Replies with a canned result and records what the form looked like
    /// while the request was in flight.
    struct FakeRelay {
        reply: Result<RelayReply, TransportError>,
        calls: Cell<usize>,
        screen: Rc<RefCell<Screen>>,
        seen_busy: Cell<Option<bool>>,
        seen_label: RefCell<Option<String>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeRelay {
        fn new(view: &FakeView, reply: Result<RelayReply, TransportError>) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
                screen: view.0.clone(),
                seen_busy: Cell::new(None),
                seen_label: RefCell::new(None),
                gate: RefCell::new(None),
            }
        }

        /// Holds the reply until `gate` is released.
        fn gated(self, gate: oneshot::Receiver<()>) -> Self {
            *self.gate.borrow_mut() = Some(gate);
            self
        }
    }

    #[async_trait(?Send)]
    impl Relay for FakeRelay {
        async fn send(&self, _payload: &FormPayload) -> Result<RelayReply, TransportError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let screen = self.screen.borrow();
            self.seen_busy.set(Some(screen.busy));
            *self.seen_label.borrow_mut() = Some(screen.label.clone());
            self.reply.clone()
        }
    }

    fn json_reply(ok: bool, status: u16, body: &str) -> Result<RelayReply, TransportError> {
        Ok(RelayReply {
            ok,
            status,
            body: RelayBody::parse(body),
        })
    }

    #[test]
    fn empty_form_flags_three_fields_without_sending() {
        let view = FakeView::with("", "", "");
        let relay = FakeRelay::new(&view, json_reply(true, 200, "{}"));
        let form = BookingForm::new(view.clone(), relay);

        assert_eq!(block_on(form.submit()), SubmitState::Idle);

        let screen = view.0.borrow();
        assert_eq!(screen.errors.len(), 3);
        assert_eq!(screen.focused, Some(Field::Name));
        assert!(screen.busy_changes.is_empty());
        assert_eq!(form.relay.calls.get(), 0);
    }

    #[test]
    fn bad_email_leaves_only_email_error() {
        let view = FakeView::with("", "", "");
        let relay = FakeRelay::new(&view, json_reply(true, 200, "{}"));
        let form = BookingForm::new(view.clone(), relay);
        block_on(form.submit());

        {
            let mut screen = view.0.borrow_mut();
            screen.fields = BookingFields {
                name: "Ada".into(),
                email: "abc".into(),
                message: "Checkup please".into(),
            };
        }
        block_on(form.submit());

        let screen = view.0.borrow();
        assert_eq!(screen.errors.len(), 1);
        assert_eq!(
            screen.errors.get("booking-email-error").map(String::as_str),
            Some("Please enter a valid email address.")
        );
        assert_eq!(screen.focused, Some(Field::Email));
        assert_eq!(form.relay.calls.get(), 0);
    }

    #[test]
    fn delivered_request_resets_and_refocuses_name() {
        let view = FakeView::with("Ada", "ada@example.com", "Checkup please");
        let relay = FakeRelay::new(&view, json_reply(true, 200, r#"{"ok":true}"#));
        let form = BookingForm::new(view.clone(), relay);

        assert_eq!(block_on(form.submit()), SubmitState::Success);

        let screen = view.0.borrow();
        assert_eq!(screen.resets, 1);
        assert_eq!(screen.fields, BookingFields::default());
        assert_eq!(screen.focused, Some(Field::Name));
        assert_eq!(
            screen.status,
            Some((SUCCESS_MESSAGE.to_string(), StatusKind::Success))
        );
    }

    #[test]
    fn server_error_message_is_shown_and_fields_kept() {
        let view = FakeView::with("Ada", "ada@example.com", "Checkup please");
        let relay = FakeRelay::new(&view, json_reply(false, 400, r#"{"error":"Form is disabled"}"#));
        let form = BookingForm::new(view.clone(), relay);

        assert_eq!(
            block_on(form.submit()),
            SubmitState::Error("Form is disabled".into())
        );

        let screen = view.0.borrow();
        assert_eq!(screen.resets, 0);
        assert_eq!(screen.fields.name, "Ada");
        assert_eq!(
            screen.status,
            Some(("Form is disabled".to_string(), StatusKind::Error))
        );
    }

    #[test]
    fn transport_failure_shows_network_message() {
        let view = FakeView::with("Ada", "ada@example.com", "Checkup please");
        let failure = Err(TransportError::Js {
            name: "TypeError".into(),
            message: "Failed to fetch".into(),
        });
        let relay = FakeRelay::new(&view, failure);
        let form = BookingForm::new(view.clone(), relay);

        assert_eq!(
            block_on(form.submit()),
            SubmitState::Error(NETWORK_MESSAGE.into())
        );
        let status = view.0.borrow().status.clone();
        assert_ne!(status.map(|(text, _)| text).as_deref(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn submit_control_is_disabled_only_while_sending() {
        for reply in [
            json_reply(true, 200, r#"{"ok":true}"#),
            json_reply(false, 500, ""),
            Err(TransportError::Other("aborted".into())),
        ] {
            let view = FakeView::with("Ada", "ada@example.com", "Checkup please");
            let relay = FakeRelay::new(&view, reply);
            let form = BookingForm::new(view.clone(), relay);
            block_on(form.submit());

            assert_eq!(form.relay.seen_busy.get(), Some(true));
            assert_eq!(form.relay.seen_label.borrow().as_deref(), Some(SENDING_LABEL));

            let screen = view.0.borrow();
            assert_eq!(screen.busy_changes, vec![true, false]);
            assert!(!screen.busy);
            assert_eq!(screen.label, "Request appointment");
        }
    }

    #[test]
    fn previous_status_is_cleared_on_new_attempt() {
        let view = FakeView::with("Ada", "ada@example.com", "Checkup please");
        let relay = FakeRelay::new(&view, json_reply(false, 500, ""));
        let form = BookingForm::new(view.clone(), relay);
        block_on(form.submit());
        assert!(view.0.borrow().status.is_some());

        view.0.borrow_mut().fields.name.clear();
        block_on(form.submit());
        assert_eq!(view.0.borrow().status, None);
    }

    #[test]
    fn focus_skips_invalid_fields_missing_from_page() {
        let view = FakeView::with("", "", "");
        view.0.borrow_mut().missing = vec![Field::Name];
        let relay = FakeRelay::new(&view, json_reply(true, 200, "{}"));
        let form = BookingForm::new(view.clone(), relay);

        block_on(form.submit());

        assert_eq!(view.0.borrow().focused, Some(Field::Email));
    }

    #[test]
    fn submit_while_sending_is_ignored() {
        let view = FakeView::with("Ada", "ada@example.com", "Checkup please");
        let (release, gate) = oneshot::channel();
        let relay = FakeRelay::new(&view, json_reply(true, 200, r#"{"ok":true}"#)).gated(gate);
        let form = BookingForm::new(view.clone(), relay);

        let repeat = async {
            let state = form.submit().await;
            let _ = release.send(());
            state
        };
        let (first, second) = block_on(join(form.submit(), repeat));

        assert_eq!(first, SubmitState::Success);
        assert_eq!(second, SubmitState::Sending);
        assert_eq!(form.relay.calls.get(), 1);
        assert_eq!(view.0.borrow().busy_changes, vec![true, false]);
    }
}
