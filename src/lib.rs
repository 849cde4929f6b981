//! # Becas
//!
//! Scholarship and subsidy management portal. Users log in, see a
//! dashboard for their role, and act on calls for applications.
//!
//! ## Features
//!
//! - **Pluggable storage**: one JSON array per collection in any key-value store
//! - **Role dashboards**: Admin, Evaluador and Postulante screens
//! - **Demo data**: empty stores are seeded on first boot
//! - **Headless**: views are plain data, rendered to HTML on demand
//!
//! ## Modules
//!
//! - [`storage`]: Key-value backends and the typed entity store
//! - [`auth`]: Login, logout, registration and the current session
//! - [`seed`]: Demo records
//! - [`portal`]: Dashboards, modal forms and action dispatch
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use becas::portal::Portal;
//! use becas::storage::{EntityStore, MemoryStorage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (mut portal, seeded) = Portal::boot(EntityStore::new(MemoryStorage::new()))?;
//! assert_eq!(seeded.users, 4);
//!
//! portal.dispatch_form("login", &[
//!     ("email".to_string(), "admin@becas.org".to_string()),
//!     ("password".to_string(), "admin123".to_string()),
//! ].into_iter().collect())?;
//!
//! let html = portal.render()?;
//! assert!(html.contains("Administración Central"));
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod logging;
pub mod portal;
pub mod seed;
pub mod storage;

pub use auth::{AuthError, AuthResult};
pub use config::{ConfigError, LoadedConfig, PortalConfig};
pub use portal::{Action, Portal, PortalError, PortalResult};
pub use seed::{seed_system, SeedReport};
