//! SalesDesk browser front-end.
//!
//! Client-side rendered Leptos app. Table and dialog state live in the
//! `salesdesk` controllers, held here in signals; requests go through
//! [`api::GlooTransport`].

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(app::App);
}
