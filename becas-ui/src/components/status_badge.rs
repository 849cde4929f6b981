//! Application state badge

use becas::storage::ApplicationStatus;
use leptos::*;

#[component]
pub fn StatusBadge(status: ApplicationStatus) -> impl IntoView {
    let label = status.to_string();

    view! {
        <span class=format!("status-badge status-{}", label)>{label.clone()}</span>
    }
}
