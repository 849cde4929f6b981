//! Pages
//!
//! One page per dashboard screen.

pub mod admin;
pub mod applicant;
pub mod evaluator;
pub mod login;

pub use admin::AdminDashboard;
pub use applicant::ApplicantPortal;
pub use evaluator::EvaluatorQueue;
pub use login::LoginPage;
