//! Portal controller
//!
//! Owns the entity store plus the transient UI state (open modal, pending
//! notice) and routes every [`Action`] to the matching store operation.
//! Shells call [`Portal::dispatch`] and then [`Portal::render`]; the
//! screen is always rebuilt from scratch.

use crate::auth::{self, AuthError};
use crate::portal::action::{Action, FormFields};
use crate::portal::forms::{self, Modal, Notice, OpenOutcome};
use crate::portal::render;
use crate::portal::view::{self, DashboardKind, DashboardView};
use crate::seed::{self, SeedReport};
use crate::storage::{Call, EntityId, EntityStore, KvStorage, StorageError, User};
use chrono::Local;
use thiserror::Error;

/// Errors surfaced by the controller
#[derive(Error, Debug)]
pub enum PortalError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A shell sent an action name the portal does not know
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Result type for controller operations
pub type PortalResult<T> = Result<T, PortalError>;

/// Source of the date stamped on new applications
pub type TodayFn = fn() -> String;

fn local_today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// The portal's state machine
#[derive(Debug)]
pub struct Portal<S> {
    store: EntityStore<S>,
    modal: Option<Modal>,
    notice: Option<Notice>,
    today: TodayFn,
}

impl<S: KvStorage> Portal<S> {
    pub fn new(store: EntityStore<S>) -> Self {
        Self {
            store,
            modal: None,
            notice: None,
            today: local_today,
        }
    }

    /// Seed demo data (idempotent) and build the controller
    pub fn boot(mut store: EntityStore<S>) -> PortalResult<(Self, SeedReport)> {
        let report = seed::seed_system(&mut store)?;
        Ok((Self::new(store), report))
    }

    /// Builder: override the application date source
    pub fn with_today(mut self, today: TodayFn) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &EntityStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> EntityStore<S> {
        self.store
    }

    /// Logged-in user, if any
    pub fn session(&self) -> PortalResult<Option<User>> {
        Ok(auth::current_user(&self.store)?)
    }

    /// Current screen, recomputed from the store
    pub fn view(&self) -> PortalResult<DashboardView> {
        let session = self.session()?;
        Ok(view::compose(&self.store, session.as_ref())?)
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// Notice raised by the last action, if any
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Hand the pending notice to the shell, clearing it
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Markup for the current screen and modal
    pub fn render(&self) -> PortalResult<String> {
        let view = self.view()?;
        Ok(render::render_page(&view, self.modal.as_ref()))
    }

    /// Parse and dispatch a `data-action` click
    pub fn dispatch_click(&mut self, name: &str, id: Option<&str>) -> PortalResult<()> {
        let action = Action::from_click(name, id)
            .ok_or_else(|| PortalError::UnknownAction(name.to_string()))?;
        self.dispatch(action)
    }

    /// Parse and dispatch a `data-form` submit
    pub fn dispatch_form(&mut self, name: &str, fields: &FormFields) -> PortalResult<()> {
        let action = Action::from_form(name, fields)
            .ok_or_else(|| PortalError::UnknownAction(name.to_string()))?;
        self.dispatch(action)
    }

    /// Apply one user action
    pub fn dispatch(&mut self, action: Action) -> PortalResult<()> {
        tracing::debug!(action = action.label(), "Dispatching action");
        self.notice = None;

        match action {
            Action::Login { email, password } => {
                if auth::login(&mut self.store, &email, &password)?.is_none() {
                    self.notice = Some(Notice::AccessDenied);
                }
                self.modal = None;
            }
            Action::Register {
                name,
                email,
                password,
            } => match auth::register(&mut self.store, &name, &email, &password) {
                Ok(_) => self.notice = Some(Notice::Registered),
                Err(AuthError::DuplicateEmail(_)) => self.notice = Some(Notice::EmailTaken),
                Err(AuthError::MissingField(field)) => {
                    self.notice = Some(Notice::MissingField(field))
                }
                Err(AuthError::Storage(e)) => return Err(e.into()),
            },
            Action::Logout => {
                auth::logout(&mut self.store)?;
                self.modal = None;
            }
            Action::CloseModal => self.modal = None,

            Action::NewCall => {
                if self.require(DashboardKind::Admin)?.is_some() {
                    let outcome = forms::open_call_form(&self.store, None)?;
                    self.open(outcome);
                }
            }
            Action::EditCall(id) => {
                if self.require(DashboardKind::Admin)?.is_some() {
                    let outcome = forms::open_call_form(&self.store, Some(id))?;
                    self.open(outcome);
                }
            }
            Action::DeleteCall(id) => {
                if self.require(DashboardKind::Admin)?.is_some() && self.store.delete::<Call>(id)? {
                    tracing::info!(call_id = %id, "Call deleted");
                }
            }
            Action::SubmitCall(form) => {
                if self.require(DashboardKind::Admin)?.is_some() {
                    if let Some(call) = forms::submit_call(&mut self.store, form)? {
                        tracing::info!(call_id = %call.id, "Call saved");
                    }
                    self.modal = None;
                }
            }

            Action::ApplyToCall(call_id) => {
                if let Some(user) = self.require(DashboardKind::Applicant)? {
                    let outcome = forms::open_application_form(&self.store, &user, call_id)?;
                    self.open(outcome);
                }
            }
            Action::SubmitApplication { call_id } => {
                if let Some(user) = self.require(DashboardKind::Applicant)? {
                    self.submit_application(&user, call_id)?;
                }
            }

            Action::OpenEvaluation(id) => {
                if self.require_evaluator()?.is_some() {
                    let outcome = forms::open_evaluation_form(&self.store, id)?;
                    self.open(outcome);
                }
            }
            Action::SubmitEvaluation {
                application_id,
                status,
            } => {
                if self.require_evaluator()?.is_some() {
                    forms::submit_evaluation(&mut self.store, application_id, status)?;
                    self.modal = None;
                }
            }
        }

        Ok(())
    }

    fn submit_application(&mut self, user: &User, call_id: EntityId) -> PortalResult<()> {
        let today = (self.today)();
        if let Err(notice) = forms::submit_application(&mut self.store, user, call_id, &today)? {
            self.notice = Some(notice);
        }
        self.modal = None;
        Ok(())
    }

    fn open(&mut self, outcome: OpenOutcome) {
        match outcome {
            OpenOutcome::Opened(modal) => self.modal = Some(modal),
            OpenOutcome::Blocked(notice) => self.notice = Some(notice),
            OpenOutcome::NotFound => tracing::debug!("Modal target not found, ignoring"),
        }
    }

    /// Session user if their dashboard is `kind`; otherwise raise
    /// `NotAllowed` and return `None`
    fn require(&mut self, kind: DashboardKind) -> PortalResult<Option<User>> {
        let user = self
            .session()?
            .filter(|u| DashboardKind::for_role(&u.role) == kind);
        if user.is_none() {
            self.notice = Some(Notice::NotAllowed);
        }
        Ok(user)
    }

    /// Evaluators and admins may both move applications through review
    fn require_evaluator(&mut self) -> PortalResult<Option<User>> {
        let user = self.session()?.filter(|u| {
            matches!(
                DashboardKind::for_role(&u.role),
                DashboardKind::Evaluator | DashboardKind::Admin
            )
        });
        if user.is_none() {
            self.notice = Some(Notice::NotAllowed);
        }
        Ok(user)
    }
}
