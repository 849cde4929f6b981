//! Modal forms and their submit paths
//!
//! Opening a modal reads the store to pre-fill it; submitting writes back
//! through the entity store. The caller re-renders afterwards.

use crate::storage::{
    Application, ApplicationPatch, ApplicationStatus, AsEntityId, Call, CallPatch, CallStatus,
    EntityId, EntityStore, KvStorage, StorageResult, User,
};
use crate::portal::view::PLACEHOLDER;

/// Blocking message for the user (an `alert` in the browser)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Login failed
    AccessDenied,
    /// The user already applied to this call
    DuplicateApplication,
    /// The session's role may not perform the action
    NotAllowed,
    /// Registration with an email already on file
    EmailTaken,
    /// Registration with a blank field
    MissingField(&'static str),
    /// Registration went through
    Registered,
    /// The call is closed or no longer exists
    CallUnavailable,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::AccessDenied => "Acceso denegado.".to_string(),
            Notice::DuplicateApplication => "Ya posees una solicitud en curso.".to_string(),
            Notice::NotAllowed => "Acción no permitida para tu perfil.".to_string(),
            Notice::EmailTaken => "El correo ya está registrado.".to_string(),
            Notice::MissingField(field) => format!("Completa el campo '{}'.", field),
            Notice::Registered => "Registro exitoso. Ya puedes iniciar sesión.".to_string(),
            Notice::CallUnavailable => "La convocatoria no admite solicitudes.".to_string(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Create/edit form for a call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallForm {
    /// `None` creates a new call
    pub id: Option<EntityId>,
    pub title: String,
    pub kind: String,
    pub closing_date: String,
    pub description: String,
    pub status: CallStatus,
}

impl CallForm {
    /// Empty form for a new call
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form pre-filled from a stored call
    pub fn from_call(call: &Call) -> Self {
        Self {
            id: Some(call.id),
            title: call.title.clone(),
            kind: call.kind.clone(),
            closing_date: call.closing_date.clone(),
            description: call.description.clone(),
            status: call.status.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    fn into_patch(self) -> CallPatch {
        CallPatch {
            title: Some(self.title),
            kind: Some(self.kind),
            description: Some(self.description),
            closing_date: Some(self.closing_date),
            status: Some(self.status),
        }
    }

    fn into_call(self) -> Call {
        Call::new(self.title, self.kind, self.description, self.closing_date).status(self.status)
    }
}

/// The modal currently on screen
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Call(CallForm),
    /// Confirm applying to a call
    Application { call_id: EntityId, call_title: String },
    /// Pick a new state for an application
    Evaluation {
        application_id: EntityId,
        applicant_name: String,
        status: ApplicationStatus,
    },
}

/// Result of asking for a modal
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    Opened(Modal),
    /// Refused with a message; nothing opens
    Blocked(Notice),
    /// The referenced record does not exist; nothing opens
    NotFound,
}

/// Open the call form: blank for `None`, pre-filled for an existing id
pub fn open_call_form<S: KvStorage>(
    store: &EntityStore<S>,
    id: Option<EntityId>,
) -> StorageResult<OpenOutcome> {
    let Some(id) = id else {
        return Ok(OpenOutcome::Opened(Modal::Call(CallForm::blank())));
    };
    Ok(match store.get_by_id::<Call>(id)? {
        Some(call) => OpenOutcome::Opened(Modal::Call(CallForm::from_call(&call))),
        None => OpenOutcome::NotFound,
    })
}

/// Whether `user_id` already has an application against `call_id`
pub fn has_applied<S: KvStorage>(
    store: &EntityStore<S>,
    user_id: EntityId,
    call_id: EntityId,
) -> StorageResult<bool> {
    Ok(store
        .get_all::<Application>()?
        .iter()
        .any(|a| a.user_id == user_id && a.call_id == call_id))
}

/// Open the application form for an open call `user` has not applied to
pub fn open_application_form<S: KvStorage>(
    store: &EntityStore<S>,
    user: &User,
    call_id: impl AsEntityId,
) -> StorageResult<OpenOutcome> {
    let Some(call) = store.get_by_id::<Call>(call_id)? else {
        return Ok(OpenOutcome::NotFound);
    };
    if !call.is_open() {
        return Ok(OpenOutcome::Blocked(Notice::CallUnavailable));
    }
    if has_applied(store, user.id, call.id)? {
        return Ok(OpenOutcome::Blocked(Notice::DuplicateApplication));
    }
    Ok(OpenOutcome::Opened(Modal::Application {
        call_id: call.id,
        call_title: call.title,
    }))
}

/// Open the evaluation form showing the applicant's name
pub fn open_evaluation_form<S: KvStorage>(
    store: &EntityStore<S>,
    application_id: impl AsEntityId,
) -> StorageResult<OpenOutcome> {
    let Some(application) = store.get_by_id::<Application>(application_id)? else {
        return Ok(OpenOutcome::NotFound);
    };
    let applicant_name = match store.get_by_id::<User>(application.user_id)? {
        Some(user) => user.name,
        None => PLACEHOLDER.to_string(),
    };
    Ok(OpenOutcome::Opened(Modal::Evaluation {
        application_id: application.id,
        applicant_name,
        status: application.status,
    }))
}

/// Create or update a call from the form. `None` if editing a call that
/// has since been deleted.
pub fn submit_call<S: KvStorage>(
    store: &mut EntityStore<S>,
    form: CallForm,
) -> StorageResult<Option<Call>> {
    match form.id {
        Some(id) => store.update::<Call>(id, form.into_patch()),
        None => store.create(form.into_call()).map(Some),
    }
}

/// File a pending application dated `today`.
///
/// The call is looked up again, so a stale or hand-crafted submit is
/// refused with a notice when the call is missing or closed, or when
/// `user` already applied to it.
pub fn submit_application<S: KvStorage>(
    store: &mut EntityStore<S>,
    user: &User,
    call_id: EntityId,
    today: &str,
) -> StorageResult<Result<Application, Notice>> {
    let open = store
        .get_by_id::<Call>(call_id)?
        .is_some_and(|call| call.is_open());
    if !open {
        tracing::warn!(call_id = %call_id, "Application refused, call not open");
        return Ok(Err(Notice::CallUnavailable));
    }
    if has_applied(store, user.id, call_id)? {
        return Ok(Err(Notice::DuplicateApplication));
    }
    let application = store.create(Application::new(user.id, call_id, today))?;
    tracing::info!(
        application_id = %application.id,
        user_id = %user.id,
        call_id = %call_id,
        "Application filed"
    );
    Ok(Ok(application))
}

/// Move an application to `status`
pub fn submit_evaluation<S: KvStorage>(
    store: &mut EntityStore<S>,
    application_id: EntityId,
    status: ApplicationStatus,
) -> StorageResult<Option<Application>> {
    let updated = store.update::<Application>(application_id, ApplicationPatch::status(status))?;
    if let Some(app) = &updated {
        tracing::info!(application_id = %app.id, status = %app.status, "Application evaluated");
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{IdGenerator, MemoryStorage, Role};

    struct Fixture {
        store: EntityStore<MemoryStorage>,
        ana: User,
        call: Call,
    }

    fn fixture() -> Fixture {
        let mut store =
            EntityStore::with_id_generator(MemoryStorage::new(), IdGenerator::sequential());
        let ana = store
            .create(User::new("Ana", "ana@becas.org", "pw", Role::Applicant))
            .unwrap();
        let call = store
            .create(Call::new("Beca Andina", "Grado", "Matrícula", "2026-12-01"))
            .unwrap();
        Fixture { store, ana, call }
    }

    #[test]
    fn test_open_call_form_blank_and_prefilled() {
        let f = fixture();

        let blank = open_call_form(&f.store, None).unwrap();
        assert_eq!(blank, OpenOutcome::Opened(Modal::Call(CallForm::blank())));

        let OpenOutcome::Opened(Modal::Call(form)) = open_call_form(&f.store, Some(f.call.id)).unwrap()
        else {
            panic!("expected call form");
        };
        assert_eq!(form.id, Some(f.call.id));
        assert_eq!(form.title, "Beca Andina");
        assert_eq!(form.description, "Matrícula");
        assert!(form.is_edit());

        assert_eq!(
            open_call_form(&f.store, Some(EntityId(404))).unwrap(),
            OpenOutcome::NotFound
        );
    }

    #[test]
    fn test_submit_call_creates_then_updates() {
        let mut f = fixture();
        let form = CallForm {
            title: "Beca Costa".to_string(),
            kind: "Técnica".to_string(),
            closing_date: "2027-03-01".to_string(),
            ..CallForm::blank()
        };
        let created = submit_call(&mut f.store, form).unwrap().unwrap();
        assert!(created.is_open());

        let mut edit = CallForm::from_call(&created);
        edit.status = CallStatus::Closed;
        let updated = submit_call(&mut f.store, edit).unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Beca Costa");
        assert_eq!(updated.status, CallStatus::Closed);
        assert_eq!(f.store.count::<Call>().unwrap(), 2);
    }

    #[test]
    fn test_apply_twice_is_blocked() {
        let mut f = fixture();

        let opened = open_application_form(&f.store, &f.ana, f.call.id).unwrap();
        assert!(matches!(opened, OpenOutcome::Opened(Modal::Application { .. })));

        let first = submit_application(&mut f.store, &f.ana, f.call.id, "2026-04-01").unwrap();
        assert!(first.is_ok());

        assert_eq!(
            open_application_form(&f.store, &f.ana, f.call.id).unwrap(),
            OpenOutcome::Blocked(Notice::DuplicateApplication)
        );
        let second = submit_application(&mut f.store, &f.ana, f.call.id, "2026-04-02").unwrap();
        assert_eq!(second, Err(Notice::DuplicateApplication));
        assert_eq!(f.store.count::<Application>().unwrap(), 1);
    }

    #[test]
    fn test_application_form_for_missing_call() {
        let f = fixture();
        assert_eq!(
            open_application_form(&f.store, &f.ana, "77").unwrap(),
            OpenOutcome::NotFound
        );
    }

    #[test]
    fn test_closed_call_refuses_applications() {
        let mut f = fixture();
        let closed = f
            .store
            .create(Call::new("Beca Cerrada", "Grado", "", "2025-01-01").status(CallStatus::Closed))
            .unwrap();

        assert_eq!(
            open_application_form(&f.store, &f.ana, closed.id).unwrap(),
            OpenOutcome::Blocked(Notice::CallUnavailable)
        );
        assert_eq!(
            submit_application(&mut f.store, &f.ana, closed.id, "2026-04-01").unwrap(),
            Err(Notice::CallUnavailable)
        );
        assert_eq!(f.store.count::<Application>().unwrap(), 0);
    }

    #[test]
    fn test_submit_to_missing_call_creates_nothing() {
        let mut f = fixture();
        assert_eq!(
            submit_application(&mut f.store, &f.ana, EntityId(999), "2026-04-01").unwrap(),
            Err(Notice::CallUnavailable)
        );
        assert_eq!(f.store.count::<Application>().unwrap(), 0);
    }

    #[test]
    fn test_evaluation_form_and_submit() {
        let mut f = fixture();
        let app = submit_application(&mut f.store, &f.ana, f.call.id, "2026-04-01")
            .unwrap()
            .unwrap();

        let opened = open_evaluation_form(&f.store, app.id).unwrap();
        assert_eq!(
            opened,
            OpenOutcome::Opened(Modal::Evaluation {
                application_id: app.id,
                applicant_name: "Ana".to_string(),
                status: ApplicationStatus::Pending,
            })
        );

        let updated = submit_evaluation(&mut f.store, app.id, ApplicationStatus::Approved)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Approved);
        assert_eq!(updated.submitted_on, "2026-04-01");
    }

    #[test]
    fn test_evaluation_form_with_missing_applicant() {
        let mut f = fixture();
        let app = f
            .store
            .create(Application::new(EntityId(999), f.call.id, "2026-04-01"))
            .unwrap();
        let OpenOutcome::Opened(Modal::Evaluation { applicant_name, .. }) =
            open_evaluation_form(&f.store, app.id).unwrap()
        else {
            panic!("expected evaluation form");
        };
        assert_eq!(applicant_name, PLACEHOLDER);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::AccessDenied.to_string(), "Acceso denegado.");
        assert_eq!(
            Notice::DuplicateApplication.to_string(),
            "Ya posees una solicitud en curso."
        );
    }
}
