//! Core record types for the portal's entity store
//!
//! This module defines the three persisted collections and their helpers:
//! - `User`, `Call`, `Application`: flat records, one JSON object each
//! - `Role`, `CallStatus`, `ApplicationStatus`: open-ended string enums
//! - `EntityId` and `AsEntityId`: numeric ids with lenient coercion
//! - `Entity`: ties a record type to its collection key and patch type
//!
//! Field names on disk keep the Spanish keys the browser build writes
//! (`nombre`, `fechaCierre`, `usuarioId`, ...) so existing browser data
//! loads unchanged.

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Numeric record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

struct EntityIdVisitor;

impl<'de> Visitor<'de> for EntityIdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer id or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntityId, E> {
        Ok(EntityId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntityId, E> {
        v.as_entity_id()
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<EntityId, E> {
        // Browser-written ids may come back as floats (e.g. 1.7e12)
        if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Ok(EntityId(v as u64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityId, E> {
        v.as_entity_id()
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityIdVisitor)
    }
}

/// Anything that can be coerced to an [`EntityId`]
///
/// Lookups accept `5`, `"5"` and `" 5 "` as the same id. Strings that are
/// not a non-negative integer coerce to `None` and match no record.
pub trait AsEntityId {
    fn as_entity_id(&self) -> Option<EntityId>;
}

impl AsEntityId for EntityId {
    fn as_entity_id(&self) -> Option<EntityId> {
        Some(*self)
    }
}

impl AsEntityId for u64 {
    fn as_entity_id(&self) -> Option<EntityId> {
        Some(EntityId(*self))
    }
}

impl AsEntityId for u32 {
    fn as_entity_id(&self) -> Option<EntityId> {
        Some(EntityId(u64::from(*self)))
    }
}

impl AsEntityId for i64 {
    fn as_entity_id(&self) -> Option<EntityId> {
        u64::try_from(*self).ok().map(EntityId)
    }
}

impl AsEntityId for str {
    fn as_entity_id(&self) -> Option<EntityId> {
        self.trim().parse::<u64>().ok().map(EntityId)
    }
}

impl AsEntityId for String {
    fn as_entity_id(&self) -> Option<EntityId> {
        self.as_str().as_entity_id()
    }
}

impl<T: AsEntityId + ?Sized> AsEntityId for &T {
    fn as_entity_id(&self) -> Option<EntityId> {
        (**self).as_entity_id()
    }
}

/// Defines a string-backed enum with known variants plus `Other(String)`.
/// Unknown values survive a load/save cycle untouched.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this build does not know about
            Other(String),
        }

        impl $name {
            /// Stored string form
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $text, )+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $text => $name::$variant, )+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Portal role; decides which dashboard a session sees
    pub enum Role {
        /// Manages calls and sees reports
        Admin => "Admin",
        /// Works the evaluation queue
        Evaluator => "Evaluador",
        /// Applies to open calls
        Applicant => "Postulante",
    }
}

string_enum! {
    /// Lifecycle state of a call
    pub enum CallStatus {
        Open => "Abierta",
        Closed => "Cerrada",
    }
}

string_enum! {
    /// Evaluation state of an application
    pub enum ApplicationStatus {
        /// Submitted, not yet reviewed
        Pending => "Pendiente",
        /// Passed the eligibility screen, awaiting a decision
        Eligible => "Apta",
        Approved => "Aprobada",
        Rejected => "Rechazada",
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        CallStatus::Open
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Pending
    }
}

impl ApplicationStatus {
    /// Whether an evaluator still has to act on this application
    pub fn awaits_evaluation(&self) -> bool {
        matches!(self, ApplicationStatus::Pending | ApplicationStatus::Eligible)
    }

    /// States offered in the evaluation form
    pub fn evaluation_choices() -> &'static [ApplicationStatus] {
        &[
            ApplicationStatus::Eligible,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ]
    }
}

/// A record type persisted as one collection in the entity store
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Storage key holding the collection
    const COLLECTION: &'static str;

    /// Partial update accepted by `EntityStore::update`
    type Patch;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    /// Overwrite the fields set in `patch`, keep the rest
    fn apply(&mut self, patch: Self::Patch);
}

/// A portal account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: EntityId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    /// Compared verbatim at login
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
    /// Fields written by other tools, kept on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Create a user; the id is assigned by the store
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: EntityId::default(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
            extra: Map::new(),
        }
    }
}

/// Partial update for [`User`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    type Patch = UserPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// A scholarship or grant announcement (convocatoria)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Call {
    #[serde(default)]
    pub id: EntityId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Closing date as entered, usually `YYYY-MM-DD`
    #[serde(rename = "fechaCierre")]
    pub closing_date: String,
    #[serde(rename = "estado", default)]
    pub status: CallStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Call {
    /// Create an open call; the id is assigned by the store
    pub fn new(
        title: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        closing_date: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::default(),
            title: title.into(),
            kind: kind.into(),
            description: description.into(),
            closing_date: closing_date.into(),
            status: CallStatus::Open,
            extra: Map::new(),
        }
    }

    /// Builder: set status
    pub fn status(mut self, status: CallStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == CallStatus::Open
    }
}

/// Partial update for [`Call`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallPatch {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub closing_date: Option<String>,
    pub status: Option<CallStatus>,
}

impl Entity for Call {
    const COLLECTION: &'static str = "calls";
    type Patch = CallPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn apply(&mut self, patch: CallPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(closing_date) = patch.closing_date {
            self.closing_date = closing_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// A user's request against a call (postulación)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    #[serde(default)]
    pub id: EntityId,
    #[serde(rename = "usuarioId")]
    pub user_id: EntityId,
    #[serde(rename = "convocatoriaId")]
    pub call_id: EntityId,
    #[serde(rename = "fechaPostulacion")]
    pub submitted_on: String,
    #[serde(rename = "estado", default)]
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Application {
    /// Create a pending application; the id is assigned by the store
    pub fn new(user_id: EntityId, call_id: EntityId, submitted_on: impl Into<String>) -> Self {
        Self {
            id: EntityId::default(),
            user_id,
            call_id,
            submitted_on: submitted_on.into(),
            status: ApplicationStatus::Pending,
            extra: Map::new(),
        }
    }

    /// Builder: set status
    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update for [`Application`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub submitted_on: Option<String>,
}

impl ApplicationPatch {
    /// Patch that only moves the application to `status`
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Entity for Application {
    const COLLECTION: &'static str = "applications";
    type Patch = ApplicationPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn apply(&mut self, patch: ApplicationPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(submitted_on) = patch.submitted_on {
            self.submitted_on = submitted_on;
        }
    }
}
