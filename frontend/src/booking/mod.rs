//! Booking form: validation, relay submission, and the DOM glue between them.

pub mod machine;
pub mod relay;
pub mod validate;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    js_sys, Document, Element, Event, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement,
    HtmlInputElement, HtmlTextAreaElement,
};

use crate::config;
use crate::dom;
use crate::error::SiteError;
use machine::{BookingForm, FormView, StatusKind};
use relay::{FormPayload, HttpRelay};
use validate::{BookingFields, Field};

const FORM_ID: &str = "booking-form";
const STATUS_ID: &str = "booking-form-status";
const SUBMIT_ID: &str = "booking-submit";

/// Text-bearing form control.
enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl Control {
    fn find(doc: &Document, id: &str) -> Option<Self> {
        let el = doc.get_element_by_id(id)?;
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(Control::Input(input)),
            Err(el) => el.dyn_into::<HtmlTextAreaElement>().ok().map(Control::TextArea),
        }
    }

    fn value(&self) -> String {
        match self {
            Control::Input(el) => el.value(),
            Control::TextArea(el) => el.value(),
        }
    }

    fn element(&self) -> &HtmlElement {
        match self {
            Control::Input(el) => el,
            Control::TextArea(el) => el,
        }
    }
}

pub struct DomFormView {
    document: Document,
    form: HtmlFormElement,
    status: Option<Element>,
    submit: HtmlButtonElement,
    controls: Vec<(Field, Control)>,
}

impl DomFormView {
    /// `None` when the page has no booking form.
    pub fn attach(doc: &Document) -> Option<Self> {
        let form = dom::by_id::<HtmlFormElement>(doc, FORM_ID)?;
        let submit = dom::by_id::<HtmlButtonElement>(doc, SUBMIT_ID)?;
        Some(Self {
            document: doc.clone(),
            status: doc.get_element_by_id(STATUS_ID),
            controls: Field::ALL
                .iter()
                .filter_map(|&field| Control::find(doc, field.input_id()).map(|c| (field, c)))
                .collect(),
            form,
            submit,
        })
    }

    fn control(&self, field: Field) -> Option<&Control> {
        self.controls
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, control)| control)
    }

    fn value_of(&self, field: Field) -> String {
        self.control(field).map(Control::value).unwrap_or_default()
    }

    fn collect_payload(&self) -> Result<FormPayload, SiteError> {
        let data = FormData::new_with_form(&self.form)?;
        let mut entries = Vec::new();
        if let Some(iter) = js_sys::try_iter(&data)? {
            for pair in iter {
                let pair: js_sys::Array = pair?.dyn_into()?;
                // File inputs carry Blobs; the relay form only has text fields.
                if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                    entries.push((key, value));
                }
            }
        }
        Ok(FormPayload(entries))
    }
}

impl FormView for DomFormView {
    fn fields(&self) -> BookingFields {
        BookingFields {
            name: self.value_of(Field::Name),
            email: self.value_of(Field::Email),
            message: self.value_of(Field::Message),
        }
    }

    fn payload(&self) -> FormPayload {
        self.collect_payload().unwrap_or_else(|e| {
            log::warn!("could not serialise booking form: {}", e);
            FormPayload::default()
        })
    }

    fn clear_errors(&self) {
        for slot in dom::query_all_in::<Element>(&self.form, ".form-error") {
            slot.set_text_content(Some(""));
        }
        for el in dom::query_all_in::<Element>(&self.form, "[aria-invalid]") {
            let _ = el.set_attribute("aria-invalid", "false");
        }
    }

    fn set_field_error(&self, field: Field, message: &str) {
        if let Some(slot) = self.document.get_element_by_id(field.error_id()) {
            slot.set_text_content(Some(message));
        }
        if let Some(control) = self.control(field) {
            let invalid = if message.is_empty() { "false" } else { "true" };
            let _ = control.element().set_attribute("aria-invalid", invalid);
        }
    }

    fn focus(&self, field: Field) -> bool {
        match self.control(field) {
            Some(control) => control.element().focus().is_ok(),
            None => false,
        }
    }

    fn set_status(&self, status: Option<(&str, StatusKind)>) {
        let Some(el) = &self.status else {
            return;
        };
        match status {
            Some((text, kind)) => {
                el.set_text_content(Some(text));
                el.set_class_name(&format!("form-status {}", kind.class_suffix()));
            }
            None => {
                el.set_text_content(Some(""));
                el.set_class_name("form-status");
            }
        }
    }

    fn submit_label(&self) -> String {
        self.submit.text_content().unwrap_or_default()
    }

    fn set_busy(&self, busy: bool, label: &str) {
        self.submit.set_disabled(busy);
        self.submit.set_text_content(Some(label));
        let _ = self.form.class_list().toggle_with_force("loading", busy);
    }

    fn reset(&self) {
        self.form.reset();
    }
}

pub fn init(doc: &Document) -> Result<(), SiteError> {
    let Some(view) = DomFormView::attach(doc) else {
        log::debug!("no booking form on this page");
        return Ok(());
    };
    let form_el = view.form.clone();
    let booking = Rc::new(BookingForm::new(view, HttpRelay::new(config::get_form_endpoint())));

    dom::listen(&form_el, "submit", move |event: Event| {
        event.prevent_default();
        let booking = booking.clone();
        spawn_local(async move {
            booking.submit().await;
        });
    })?;
    log::debug!("booking form ready, relay {}", config::get_form_endpoint());
    Ok(())
}
