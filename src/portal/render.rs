//! Markup generation
//!
//! Turns composed views and modals into HTML fragments. Every interpolated
//! value goes through [`escape`]. Interactive elements carry
//! `data-action`/`data-form` attributes (see [`crate::portal::action`])
//! instead of inline handlers.

use crate::portal::action::{click, form};
use crate::portal::forms::{CallForm, Modal};
use crate::portal::view::{
    AdminDashboard, ApplicantDashboard, DashboardView, EvaluatorDashboard,
};
use crate::storage::{ApplicationStatus, CallStatus, EntityId};
use std::fmt::Write;

/// Placeholder for an applicant with no applications yet
pub const NO_APPLICATIONS: &str = "No has realizado solicitudes aún.";
/// Placeholder when no call is open
pub const NO_OPEN_CALLS: &str = "No hay servicios activos.";
/// Placeholder for an empty evaluator queue
pub const EMPTY_QUEUE: &str = "Bandeja vacía.";

/// Escape text for HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page body: the dashboard section plus the open modal, if any
pub fn render_page(view: &DashboardView, modal: Option<&Modal>) -> String {
    let mut html = format!(
        "<section id=\"dashboard-section\">{}</section>",
        render_view(view)
    );
    if let Some(modal) = modal {
        html.push_str(&render_modal(modal));
    }
    html
}

pub fn render_view(view: &DashboardView) -> String {
    match view {
        DashboardView::Anonymous => render_login(),
        DashboardView::Admin(dash) => render_admin(dash),
        DashboardView::Evaluator(dash) => render_evaluator(dash),
        DashboardView::Applicant(dash) => render_applicant(dash),
    }
}

fn button(class: &str, action: &str, id: Option<EntityId>, label: &str) -> String {
    match id {
        Some(id) => format!(
            "<button class=\"{}\" data-action=\"{}\" data-id=\"{}\">{}</button>",
            class, action, id, label
        ),
        None => format!(
            "<button class=\"{}\" data-action=\"{}\">{}</button>",
            class, action, label
        ),
    }
}

fn header(title: &str, badge_class: &str, badge: &str) -> String {
    format!(
        "<header class=\"admin-actions\"><div><h1>{}</h1>\
         <span class=\"user-badge {}\">{}</span></div>{}</header>",
        title,
        badge_class,
        escape(badge),
        button("btn-cancel", click::LOGOUT, None, "Cerrar Sesión")
    )
}

fn status_badge(status: &ApplicationStatus) -> String {
    let status = escape(status.as_str());
    format!(
        "<span class=\"status-badge status-{}\">{}</span>",
        status, status
    )
}

fn render_login() -> String {
    format!(
        "<section id=\"login-section\"><h2>Iniciar Sesión</h2>\
         <form data-form=\"{login}\">\
         <input type=\"email\" name=\"email\" placeholder=\"Correo\" required>\
         <input type=\"password\" name=\"password\" placeholder=\"Contraseña\" required>\
         <button type=\"submit\" class=\"btn-gold\">Ingresar</button></form></section>\
         <section id=\"register-section\"><h2>Crear Cuenta</h2>\
         <form data-form=\"{register}\">\
         <input type=\"text\" name=\"nombre\" placeholder=\"Nombre completo\" required>\
         <input type=\"email\" name=\"email\" placeholder=\"Correo\" required>\
         <input type=\"password\" name=\"password\" placeholder=\"Contraseña\" required>\
         <button type=\"submit\" class=\"btn-gold\">Registrarme</button></form></section>",
        login = form::LOGIN,
        register = form::REGISTER,
    )
}

fn render_admin(dash: &AdminDashboard) -> String {
    let mut html = header(
        "Panel de Administrador",
        "badge-Admin",
        &format!("Admin: {}", dash.user_name),
    );

    let _ = write!(
        html,
        "<section id=\"reports\"><div class=\"reports-grid\">\
         <div class=\"report-card\"><h4>Total Postulaciones</h4>\
         <p class=\"report-value\" data-metric=\"total-applications\">{total}</p></div>\
         <div class=\"report-card\"><h4>Tasa de Aprobación</h4>\
         <p class=\"report-value\" data-metric=\"approved\">{approved} aprobadas</p>\
         <div class=\"progress-container\">\
         <div class=\"progress-bar\" data-metric=\"approval-rate\" style=\"width: {rate:.1}%\"></div>\
         </div></div></div></section>",
        total = dash.report.total,
        approved = dash.report.approved,
        rate = dash.report.approval_rate(),
    );

    let _ = write!(
        html,
        "<section id=\"management\"><div class=\"admin-actions\">\
         <h3>Convocatorias Vigentes</h3>{}</div>\
         <table><thead><tr><th>Título</th><th>Tipo</th><th>Cierre</th><th>Estado</th>\
         <th>Acciones</th></tr></thead><tbody>",
        button("btn-gold", click::NEW_CALL, None, "+ Crear Nueva")
    );
    for call in &dash.calls {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td><strong>{}</strong></td><td>{}{}</td></tr>",
            escape(&call.title),
            escape(&call.kind),
            escape(&call.closing_date),
            escape(call.status.as_str()),
            button("btn-small btn-edit", click::EDIT_CALL, Some(call.id), "Editar"),
            button("btn-small btn-delete", click::DELETE_CALL, Some(call.id), "Borrar"),
        );
    }
    html.push_str("</tbody></table></section>");
    html
}

fn render_evaluator(dash: &EvaluatorDashboard) -> String {
    let mut html = header(
        "Panel Técnico de Evaluación",
        "badge-Evaluador",
        &dash.user_name,
    );
    html.push_str("<section id=\"evaluation-queue\"><h3>Casos por Resolver</h3>");

    if dash.queue.is_empty() {
        let _ = write!(html, "<p class=\"empty\">{}</p>", EMPTY_QUEUE);
    } else {
        html.push_str(
            "<table><thead><tr><th>Solicitante</th><th>Beca</th><th>Estado</th>\
             <th>Acciones</th></tr></thead><tbody>",
        );
        for row in &dash.queue {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.applicant_name),
                escape(&row.call_title),
                status_badge(&row.status),
                button(
                    "btn-small btn-edit",
                    click::EVALUATE,
                    Some(row.application_id),
                    "Calificar"
                ),
            );
        }
        html.push_str("</tbody></table>");
    }
    html.push_str("</section>");
    html
}

fn render_applicant(dash: &ApplicantDashboard) -> String {
    let mut html = header("Portal del Beneficiario", "badge-Postulante", &dash.user_name);

    html.push_str("<section id=\"my-applications\"><h3>Mis Gestiones</h3>");
    if dash.applications.is_empty() {
        let _ = write!(html, "<p class=\"empty\">{}</p>", NO_APPLICATIONS);
    } else {
        html.push_str(
            "<table><thead><tr><th>Beca</th><th>Fecha</th><th>Estado</th></tr></thead><tbody>",
        );
        for row in &dash.applications {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.call_title),
                escape(&row.submitted_on),
                status_badge(&row.status),
            );
        }
        html.push_str("</tbody></table>");
    }
    html.push_str("</section>");

    html.push_str(
        "<section id=\"available-scholarships\"><h3>Servicios Disponibles</h3>\
         <div class=\"cards-grid\">",
    );
    if dash.open_calls.is_empty() {
        let _ = write!(html, "<p class=\"empty\">{}</p>", NO_OPEN_CALLS);
    }
    for call in &dash.open_calls {
        let _ = write!(
            html,
            "<div class=\"scholarship-card\" data-call-id=\"{id}\"><div>\
             <span class=\"type-tag\">{kind}</span><h3>{title}</h3>\
             <p class=\"description\">{description}</p></div>\
             <div class=\"footer\"><span>Cierre: {closing}</span>{apply}</div></div>",
            id = call.id,
            kind = escape(&call.kind),
            title = escape(&call.title),
            description = escape(&call.description),
            closing = escape(&call.closing_date),
            apply = button("btn-gold", click::APPLY, Some(call.id), "Solicitar"),
        );
    }
    html.push_str("</div></section>");
    html
}

/// Render a modal dialog
pub fn render_modal(modal: &Modal) -> String {
    let (id, body) = match modal {
        Modal::Call(form) => ("convocatoria-modal", render_call_form(form)),
        Modal::Application {
            call_id,
            call_title,
        } => (
            "postulacion-modal",
            format!(
                "<h2>Solicitar Beca</h2><p>{}</p>\
                 <form data-form=\"{}\">\
                 <input type=\"hidden\" name=\"convocatoriaId\" value=\"{}\">\
                 <button type=\"submit\" class=\"btn-gold\">Enviar Solicitud</button></form>",
                escape(call_title),
                form::APPLICATION,
                call_id
            ),
        ),
        Modal::Evaluation {
            application_id,
            applicant_name,
            status,
        } => (
            "evaluacion-modal",
            render_evaluation_form(*application_id, applicant_name, status),
        ),
    };
    format!(
        "<div id=\"{}\" class=\"modal\"><div class=\"modal-content\">{}{}</div></div>",
        id,
        button("btn-close", click::CLOSE_MODAL, None, "&times;"),
        body
    )
}

fn render_call_form(call: &CallForm) -> String {
    let title = if call.is_edit() {
        "Editar Convocatoria"
    } else {
        "Nueva Convocatoria"
    };
    let hidden_id = call
        .id
        .map(|id| format!("<input type=\"hidden\" name=\"id\" value=\"{}\">", id))
        .unwrap_or_default();

    let mut options = String::new();
    for status in [CallStatus::Open, CallStatus::Closed] {
        let selected = if status == call.status { " selected" } else { "" };
        let _ = write!(
            options,
            "<option value=\"{0}\"{1}>{0}</option>",
            status.as_str(),
            selected
        );
    }
    if let CallStatus::Other(other) = &call.status {
        let _ = write!(
            options,
            "<option value=\"{0}\" selected>{0}</option>",
            escape(other)
        );
    }

    format!(
        "<h2>{title}</h2><form data-form=\"{form}\">{hidden_id}\
         <input type=\"text\" name=\"titulo\" value=\"{titulo}\" placeholder=\"Título\" required>\
         <input type=\"text\" name=\"tipo\" value=\"{tipo}\" placeholder=\"Tipo\" required>\
         <input type=\"date\" name=\"fechaCierre\" value=\"{fecha}\" required>\
         <textarea name=\"descripcion\" placeholder=\"Requisitos\">{descripcion}</textarea>\
         <select name=\"estado\">{options}</select>\
         <button type=\"submit\" class=\"btn-gold\">Guardar</button></form>",
        form = form::CALL,
        titulo = escape(&call.title),
        tipo = escape(&call.kind),
        fecha = escape(&call.closing_date),
        descripcion = escape(&call.description),
    )
}

fn render_evaluation_form(
    application_id: EntityId,
    applicant_name: &str,
    current: &ApplicationStatus,
) -> String {
    let mut options = String::new();
    for status in ApplicationStatus::evaluation_choices() {
        let selected = if status == current { " selected" } else { "" };
        let _ = write!(
            options,
            "<option value=\"{0}\"{1}>{0}</option>",
            status.as_str(),
            selected
        );
    }
    format!(
        "<h2>Calificar Postulación</h2>\
         <p>Solicitante: <strong id=\"eval-applicant-name\">{}</strong></p>\
         <form data-form=\"{}\"><input type=\"hidden\" name=\"id\" value=\"{}\">\
         <select name=\"estado\">{}</select>\
         <button type=\"submit\" class=\"btn-gold\">Guardar Dictamen</button></form>",
        escape(applicant_name),
        form::EVALUATION,
        application_id,
        options
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::view::{ApprovalReport, OwnApplicationRow, QueueRow};
    use crate::storage::Call;

    fn sample_call(id: u64, title: &str) -> Call {
        let mut call = Call::new(title, "Grado", "Requisitos", "2026-12-01");
        call.id = EntityId(id);
        call
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("Beca Ñandú"), "Beca Ñandú");
    }

    #[test]
    fn test_anonymous_shows_login_and_register() {
        let html = render_view(&DashboardView::Anonymous);
        assert!(html.contains("data-form=\"login\""));
        assert!(html.contains("data-form=\"register\""));
        assert!(!html.contains("data-action=\"logout\""));
    }

    #[test]
    fn test_admin_report_and_actions() {
        let html = render_view(&DashboardView::Admin(AdminDashboard {
            user_name: "Directora".to_string(),
            report: ApprovalReport {
                total: 4,
                approved: 1,
            },
            calls: vec![sample_call(7, "Beca <script>")],
        }));

        assert!(html.contains("data-metric=\"total-applications\">4</p>"));
        assert!(html.contains("1 aprobadas"));
        assert!(html.contains("width: 25.0%"));
        assert!(html.contains("data-action=\"edit-call\" data-id=\"7\""));
        assert!(html.contains("data-action=\"delete-call\" data-id=\"7\""));
        assert!(html.contains("Beca &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_evaluator_empty_and_rows() {
        let empty = render_view(&DashboardView::Evaluator(EvaluatorDashboard {
            user_name: "Eva".to_string(),
            queue: vec![],
        }));
        assert!(empty.contains(EMPTY_QUEUE));

        let html = render_view(&DashboardView::Evaluator(EvaluatorDashboard {
            user_name: "Eva".to_string(),
            queue: vec![QueueRow {
                application_id: EntityId(11),
                applicant_name: "Ana".to_string(),
                call_title: "Beca Norte".to_string(),
                status: ApplicationStatus::Eligible,
            }],
        }));
        assert!(html.contains("status-Apta"));
        assert!(html.contains("data-action=\"evaluate\" data-id=\"11\""));
        assert!(!html.contains(EMPTY_QUEUE));
    }

    #[test]
    fn test_applicant_placeholders() {
        let html = render_view(&DashboardView::Applicant(ApplicantDashboard {
            user_name: "Ana".to_string(),
            applications: vec![],
            open_calls: vec![],
        }));
        assert!(html.contains(NO_APPLICATIONS));
        assert!(html.contains(NO_OPEN_CALLS));

        let html = render_view(&DashboardView::Applicant(ApplicantDashboard {
            user_name: "Ana".to_string(),
            applications: vec![OwnApplicationRow {
                application_id: EntityId(1),
                call_title: "Beca Sur".to_string(),
                submitted_on: "2026-03-01".to_string(),
                status: ApplicationStatus::Pending,
            }],
            open_calls: vec![sample_call(2, "Beca Este")],
        }));
        assert!(!html.contains(NO_APPLICATIONS));
        assert!(html.contains("2026-03-01"));
        assert!(html.contains("data-action=\"apply\" data-id=\"2\""));
    }

    #[test]
    fn test_call_modal_prefilled() {
        let form = CallForm::from_call(&sample_call(5, "Beca \"Oro\""));
        let html = render_modal(&Modal::Call(form));
        assert!(html.contains("Editar Convocatoria"));
        assert!(html.contains("name=\"id\" value=\"5\""));
        assert!(html.contains("value=\"Beca &quot;Oro&quot;\""));
        assert!(html.contains("<option value=\"Abierta\" selected>"));
        assert!(html.contains("data-action=\"close-modal\""));

        let blank = render_modal(&Modal::Call(CallForm::blank()));
        assert!(blank.contains("Nueva Convocatoria"));
        assert!(!blank.contains("name=\"id\""));
    }

    #[test]
    fn test_evaluation_modal_shows_applicant() {
        let html = render_modal(&Modal::Evaluation {
            application_id: EntityId(3),
            applicant_name: "Ana <Admin>".to_string(),
            status: ApplicationStatus::Pending,
        });
        assert!(html.contains("Ana &lt;Admin&gt;"));
        assert!(html.contains("name=\"id\" value=\"3\""));
        assert!(html.contains("<option value=\"Aprobada\">"));
    }

    #[test]
    fn test_page_includes_modal() {
        let modal = Modal::Application {
            call_id: EntityId(2),
            call_title: "Beca Este".to_string(),
        };
        let html = render_page(&DashboardView::Anonymous, Some(&modal));
        assert!(html.starts_with("<section id=\"dashboard-section\">"));
        assert!(html.contains("postulacion-modal"));
        assert!(html.contains("name=\"convocatoriaId\" value=\"2\""));
    }
}
