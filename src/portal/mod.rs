//! Role-based portal
//!
//! - **view**: composes one of four screens from session + store
//! - **render**: HTML markup for screens and modals
//! - **forms**: modal forms, duplicate-application guard, submit paths
//! - **action**: the `Action` enum shells dispatch
//! - **controller**: `Portal`, tying the pieces together
//!
//! # Flow
//!
//! ```text
//! load → seed → session → compose view → render
//!          ↑                                │
//!          └──── dispatch(Action) ← user ───┘
//! ```

pub mod action;
pub mod controller;
pub mod forms;
pub mod render;
pub mod view;

pub use action::{Action, FormFields};
pub use controller::{Portal, PortalError, PortalResult};
pub use forms::{CallForm, Modal, Notice, OpenOutcome};
pub use render::{escape, render_modal, render_page, render_view};
pub use view::{
    approval_rate, compose, AdminDashboard, ApplicantDashboard, ApprovalReport, DashboardKind,
    DashboardView, EvaluatorDashboard, OwnApplicationRow, QueueRow, PLACEHOLDER,
};
