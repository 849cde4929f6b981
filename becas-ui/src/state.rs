//! Portal State
//!
//! The portal lives in a `StoredValue`; pages read the composed screen and
//! the open modal through signals refreshed after every dispatch.

use becas::portal::{Action, DashboardView, Modal, Portal};
use leptos::*;

use crate::storage::LocalStorage;

pub type BrowserPortal = Portal<LocalStorage>;

/// Shared portal state provided to all components
#[derive(Clone, Copy)]
pub struct PortalState {
    portal: StoredValue<BrowserPortal>,
    /// Screen for the current session
    pub view: RwSignal<DashboardView>,
    /// Modal on top of the screen, if any
    pub modal: RwSignal<Option<Modal>>,
}

/// Wrap `portal` in signals and provide it as context
pub fn provide_portal_state(portal: BrowserPortal) {
    let state = PortalState {
        portal: store_value(portal),
        view: create_rw_signal(DashboardView::Anonymous),
        modal: create_rw_signal(None),
    };
    state.refresh();
    provide_context(state);
}

impl PortalState {
    /// Run one action, alert its notice, then recompose the screen
    pub fn dispatch(&self, action: Action) {
        let notice = self
            .portal
            .try_update_value(|p| {
                if let Err(e) = p.dispatch(action) {
                    log_error("Action failed", e);
                }
                p.take_notice()
            })
            .flatten();
        if let Some(notice) = notice {
            alert(&notice.message());
        }
        self.refresh();
    }

    fn refresh(&self) {
        let (view, modal) = self
            .portal
            .with_value(|p| (p.view(), p.modal().cloned()));
        match view {
            Ok(view) => self.view.set(view),
            Err(e) => log_error("Compose failed", e),
        }
        self.modal.set(modal);
    }
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn log_error(context: &str, err: impl std::fmt::Display) {
    web_sys::console::error_1(&format!("{}: {}", context, err).into());
}
