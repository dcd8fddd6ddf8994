//! App-wide state shared through Leptos context.

use leptos::*;

use crate::api;

/// Page sizes offered by the page-size selector
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

/// Initial page size of every table
pub const DEFAULT_PAGE_SIZE: usize = 10;

const SUCCESS_MILLIS: u32 = 3_000;
const ERROR_MILLIS: u32 = 5_000;

/// Backend URL plus the toast messages
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Mirrors the URL kept in local storage
    pub api_base: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub success: RwSignal<Option<String>>,
}

pub fn provide_global_state() {
    provide_context(GlobalState {
        api_base: create_rw_signal(api::get_api_base()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    });
}

/// Set `slot` and clear it again after `millis`, unless a newer message replaced it
fn flash(slot: RwSignal<Option<String>>, message: &str, millis: u32) {
    let message = message.to_string();
    slot.set(Some(message.clone()));

    gloo_timers::callback::Timeout::new(millis, move || {
        if slot.with_untracked(|current| current.as_deref() == Some(message.as_str())) {
            slot.set(None);
        }
    })
    .forget();
}

impl GlobalState {
    /// Persist a new backend URL; subsequent requests use it
    pub fn set_api_base(&self, url: &str) {
        api::set_api_base(url);
        self.api_base.set(api::get_api_base());
    }

    pub fn show_success(&self, message: &str) {
        flash(self.success, message, SUCCESS_MILLIS);
    }

    pub fn show_error(&self, message: &str) {
        flash(self.error, message, ERROR_MILLIS);
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }
}
