//! Form submits
//!
//! Forms post their inputs through `FormData` so field names stay the
//! same ones the portal parses with [`Action::from_form`].

use becas::portal::{Action, FormFields};
use wasm_bindgen::JsCast;
use web_sys::{FormData, HtmlFormElement, SubmitEvent};

use crate::state::{log_error, PortalState};

/// Named inputs of the submitted form
pub fn form_fields(ev: &SubmitEvent) -> Option<FormFields> {
    let form = ev.target()?.dyn_into::<HtmlFormElement>().ok()?;
    let data = FormData::new_with_form(&form).ok()?;

    let mut fields = FormFields::new();
    let entries = js_sys::try_iter(&data).ok()??;
    for entry in entries.flatten() {
        let pair: js_sys::Array = entry.unchecked_into();
        if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            fields.insert(key, value);
        }
    }
    Some(fields)
}

/// Keep the browser from navigating and dispatch the form as `name`
pub fn submit_form(state: PortalState, name: &str, ev: &SubmitEvent) {
    ev.prevent_default();
    let Some(fields) = form_fields(ev) else {
        log_error("Unreadable form", name);
        return;
    };
    match Action::from_form(name, &fields) {
        Some(action) => state.dispatch(action),
        None => log_error("Incomplete form", name),
    }
}
