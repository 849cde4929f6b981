//! Becas Storage Layer
//!
//! This module provides the portal's persistence:
//!
//! - **backend**: `KvStorage` slot trait with memory and file implementations
//! - **types**: Record types (User, Call, Application) and their patches
//! - **ids**: Monotonic id generator
//! - **store**: `EntityStore`, generic CRUD over named collections
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! "users"        → [{"id":1,"nombre":..,"email":..,"password":..,"rol":..}, ...]
//! "calls"        → [{"id":..,"titulo":..,"tipo":..,"descripcion":..,"fechaCierre":..,"estado":..}, ...]
//! "applications" → [{"id":..,"usuarioId":..,"convocatoriaId":..,"fechaPostulacion":..,"estado":..}, ...]
//! "currentUser"  → 1
//! ```
//!
//! # Example
//!
//! ```rust
//! use becas::storage::{Call, CallPatch, CallStatus, EntityStore, MemoryStorage};
//!
//! # fn main() -> Result<(), becas::storage::StorageError> {
//! let mut store = EntityStore::new(MemoryStorage::new());
//!
//! let call = store.create(Call::new("Beca Excelencia", "Grado", "Matrícula", "2026-12-01"))?;
//! store.update::<Call>(call.id, CallPatch {
//!     status: Some(CallStatus::Closed),
//!     ..Default::default()
//! })?;
//!
//! assert_eq!(store.get_by_id::<Call>(call.id)?.map(|c| c.status), Some(CallStatus::Closed));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod ids;
pub mod store;
pub mod types;

pub use backend::{FileStorage, KvStorage, MemoryStorage};
pub use error::{StorageError, StorageResult};
pub use ids::IdGenerator;
pub use store::{EntityStore, StoreStats};
pub use types::{
    Application, ApplicationPatch, ApplicationStatus, AsEntityId, Call, CallPatch, CallStatus,
    Entity, EntityId, Role, User, UserPatch,
};
