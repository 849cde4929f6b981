//! Login and sign-up forms shown without a session

use becas::portal::action::form;
use leptos::*;

use crate::events::submit_form;
use crate::state::PortalState;

#[component]
pub fn LoginPage() -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");

    view! {
        <section id="login-section">
            <h2>"Iniciar Sesión"</h2>
            <form on:submit=move |ev| submit_form(state, form::LOGIN, &ev)>
                <input type="email" name="email" placeholder="Correo" required />
                <input type="password" name="password" placeholder="Contraseña" required />
                <button type="submit" class="btn-gold">"Ingresar"</button>
            </form>
        </section>
        <section id="register-section">
            <h2>"Crear Cuenta"</h2>
            <form on:submit=move |ev| submit_form(state, form::REGISTER, &ev)>
                <input type="text" name="nombre" placeholder="Nombre completo" required />
                <input type="email" name="email" placeholder="Correo" required />
                <input type="password" name="password" placeholder="Contraseña" required />
                <button type="submit" class="btn-gold">"Registrarme"</button>
            </form>
        </section>
    }
}
