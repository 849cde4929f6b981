//! Admin Page
//!
//! Report cards plus the call table with create, edit and delete.

use becas::portal::{self, Action};
use becas::storage::Call;
use leptos::*;

use crate::components::PanelHeader;
use crate::state::PortalState;

#[component]
pub fn AdminDashboard(dash: portal::AdminDashboard) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");
    let report = dash.report;

    view! {
        <PanelHeader
            title="Panel de Administrador"
            badge_class="badge-Admin"
            badge=format!("Admin: {}", dash.user_name)
        />

        <section id="reports">
            <div class="reports-grid">
                <div class="report-card">
                    <h4>"Total Postulaciones"</h4>
                    <p class="report-value" data-metric="total-applications">{report.total}</p>
                </div>
                <div class="report-card">
                    <h4>"Tasa de Aprobación"</h4>
                    <p class="report-value" data-metric="approved">
                        {report.approved}" aprobadas"
                    </p>
                    <div class="progress-container">
                        <div
                            class="progress-bar"
                            data-metric="approval-rate"
                            style=format!("width: {:.1}%", report.approval_rate())
                        ></div>
                    </div>
                </div>
            </div>
        </section>

        <section id="management">
            <div class="admin-actions">
                <h3>"Convocatorias Vigentes"</h3>
                <button class="btn-gold" on:click=move |_| state.dispatch(Action::NewCall)>
                    "+ Crear Nueva"
                </button>
            </div>
            <table>
                <thead>
                    <tr>
                        <th>"Título"</th>
                        <th>"Tipo"</th>
                        <th>"Cierre"</th>
                        <th>"Estado"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    {dash.calls.into_iter().map(|call| view! { <CallRow call=call /> }).collect_view()}
                </tbody>
            </table>
        </section>
    }
}

#[component]
fn CallRow(call: Call) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");
    let id = call.id;

    view! {
        <tr>
            <td>{call.title}</td>
            <td>{call.kind}</td>
            <td>{call.closing_date}</td>
            <td><strong>{call.status.to_string()}</strong></td>
            <td>
                <button
                    class="btn-small btn-edit"
                    on:click=move |_| state.dispatch(Action::EditCall(id))
                >
                    "Editar"
                </button>
                <button
                    class="btn-small btn-delete"
                    on:click=move |_| state.dispatch(Action::DeleteCall(id))
                >
                    "Borrar"
                </button>
            </td>
        </tr>
    }
}
