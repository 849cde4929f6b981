//! User actions
//!
//! Rendered markup carries `data-action="<name>"` (plus `data-id`) on
//! buttons and `data-form="<name>"` on forms. A shell reads those
//! attributes back through [`Action::from_click`] / [`Action::from_form`]
//! and hands the result to `Portal::dispatch`.

use crate::portal::forms::CallForm;
use crate::storage::{ApplicationStatus, AsEntityId, CallStatus, EntityId};
use std::collections::HashMap;

/// `data-action` values for buttons
pub mod click {
    pub const LOGOUT: &str = "logout";
    pub const NEW_CALL: &str = "new-call";
    pub const EDIT_CALL: &str = "edit-call";
    pub const DELETE_CALL: &str = "delete-call";
    pub const APPLY: &str = "apply";
    pub const EVALUATE: &str = "evaluate";
    pub const CLOSE_MODAL: &str = "close-modal";
}

/// `data-form` values for forms
pub mod form {
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const CALL: &str = "call";
    pub const APPLICATION: &str = "application";
    pub const EVALUATION: &str = "evaluation";
}

/// Submitted form fields by input name
pub type FormFields = HashMap<String, String>;

/// Everything a user can do on any screen
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login { email: String, password: String },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Logout,
    NewCall,
    EditCall(EntityId),
    DeleteCall(EntityId),
    ApplyToCall(EntityId),
    OpenEvaluation(EntityId),
    SubmitCall(CallForm),
    SubmitApplication { call_id: EntityId },
    SubmitEvaluation {
        application_id: EntityId,
        status: ApplicationStatus,
    },
    CloseModal,
}

impl Action {
    /// Parse a button click. `None` for unknown names or a missing/invalid
    /// id on actions that need one.
    pub fn from_click(name: &str, id: Option<&str>) -> Option<Action> {
        let target = || id.and_then(|raw| raw.as_entity_id());
        match name {
            click::LOGOUT => Some(Action::Logout),
            click::NEW_CALL => Some(Action::NewCall),
            click::CLOSE_MODAL => Some(Action::CloseModal),
            click::EDIT_CALL => target().map(Action::EditCall),
            click::DELETE_CALL => target().map(Action::DeleteCall),
            click::APPLY => target().map(Action::ApplyToCall),
            click::EVALUATE => target().map(Action::OpenEvaluation),
            _ => None,
        }
    }

    /// Parse a form submit. Missing text fields read as empty strings;
    /// missing or invalid ids make the submit unparseable.
    pub fn from_form(name: &str, fields: &FormFields) -> Option<Action> {
        let text = |key: &str| fields.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let id = |key: &str| fields.get(key).and_then(|v| v.as_entity_id());

        match name {
            form::LOGIN => Some(Action::Login {
                email: text("email"),
                // Passwords are compared verbatim
                password: fields.get("password").cloned().unwrap_or_default(),
            }),
            form::REGISTER => Some(Action::Register {
                name: text("nombre"),
                email: text("email"),
                password: fields.get("password").cloned().unwrap_or_default(),
            }),
            form::CALL => {
                let status = match text("estado") {
                    s if s.is_empty() => CallStatus::Open,
                    s => CallStatus::from(s),
                };
                Some(Action::SubmitCall(CallForm {
                    id: id("id"),
                    title: text("titulo"),
                    kind: text("tipo"),
                    closing_date: text("fechaCierre"),
                    description: text("descripcion"),
                    status,
                }))
            }
            form::APPLICATION => Some(Action::SubmitApplication {
                call_id: id("convocatoriaId")?,
            }),
            form::EVALUATION => {
                let status = text("estado");
                if status.is_empty() {
                    return None;
                }
                Some(Action::SubmitEvaluation {
                    application_id: id("id")?,
                    status: ApplicationStatus::from(status),
                })
            }
            _ => None,
        }
    }

    /// Short name for logs; never includes form contents
    pub fn label(&self) -> &'static str {
        match self {
            Action::Login { .. } => "login",
            Action::Register { .. } => "register",
            Action::Logout => click::LOGOUT,
            Action::NewCall => click::NEW_CALL,
            Action::EditCall(_) => click::EDIT_CALL,
            Action::DeleteCall(_) => click::DELETE_CALL,
            Action::ApplyToCall(_) => click::APPLY,
            Action::OpenEvaluation(_) => click::EVALUATE,
            Action::SubmitCall(_) => "submit-call",
            Action::SubmitApplication { .. } => "submit-application",
            Action::SubmitEvaluation { .. } => "submit-evaluation",
            Action::CloseModal => click::CLOSE_MODAL,
        }
    }
}
