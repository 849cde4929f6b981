//! Session management over the `users` collection
//!
//! There is no real security here: passwords are stored and compared as
//! plain text, and the session is just the logged-in user's id kept in
//! the `currentUser` slot so it survives reloads.

use crate::storage::{EntityId, EntityStore, KvStorage, Role, StorageError, StorageResult, User};
use thiserror::Error;

/// Storage slot holding the logged-in user's id
pub const SESSION_KEY: &str = "currentUser";

/// Errors raised by self-service registration
#[derive(Error, Debug)]
pub enum AuthError {
    /// Another account already uses this email
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// A required registration field was blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Log in with exact email and password. Starts a session on success.
pub fn login<S: KvStorage>(
    store: &mut EntityStore<S>,
    email: &str,
    password: &str,
) -> StorageResult<Option<User>> {
    let user = store
        .get_all::<User>()?
        .into_iter()
        .find(|u| u.email == email && u.password == password);

    match &user {
        Some(user) => {
            store.write_value(SESSION_KEY, &user.id)?;
            tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");
        }
        None => tracing::warn!(email, "Login rejected"),
    }

    Ok(user)
}

/// End the current session, if any
pub fn logout<S: KvStorage>(store: &mut EntityStore<S>) -> StorageResult<()> {
    store.clear(SESSION_KEY)?;
    tracing::info!("Logged out");
    Ok(())
}

/// The logged-in user. A session pointing at a deleted user reads as none.
pub fn current_user<S: KvStorage>(store: &EntityStore<S>) -> StorageResult<Option<User>> {
    match store.read_value::<EntityId>(SESSION_KEY)? {
        Some(id) => store.get_by_id::<User>(id),
        None => Ok(None),
    }
}

/// Create a `Postulante` account. Does not log the new user in.
pub fn register<S: KvStorage>(
    store: &mut EntityStore<S>,
    name: &str,
    email: &str,
    password: &str,
) -> AuthResult<User> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err(AuthError::MissingField("nombre"));
    }
    if email.is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }

    let taken = store
        .get_all::<User>()?
        .iter()
        .any(|u| u.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(AuthError::DuplicateEmail(email.to_string()));
    }

    let user = store.create(User::new(name, email, password, Role::Applicant))?;
    tracing::info!(user_id = %user.id, "Registered new applicant");
    Ok(user)
}
