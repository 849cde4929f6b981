//! Becas Portal
//!
//! Browser shell for the scholarship portal, built with Leptos (WASM).
//!
//! # Architecture
//!
//! All portal logic lives in the `becas` crate. This shell only:
//!
//! - backs the entity store with `localStorage`
//! - renders the composed screen and modal as Leptos pages
//! - dispatches button clicks and form submits as portal actions
//! - shows notices with `alert`

use leptos::*;

mod app;
mod components;
mod events;
mod pages;
mod state;
mod storage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
