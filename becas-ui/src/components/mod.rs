//! UI Components
//!
//! Pieces shared by the dashboard pages.

pub mod header;
pub mod modal;
pub mod status_badge;

pub use header::PanelHeader;
pub use modal::ModalDialog;
pub use status_badge::StatusBadge;
