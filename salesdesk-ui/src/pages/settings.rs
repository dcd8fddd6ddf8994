//! Settings page: where the backend lives.

use leptos::*;

use salesdesk::models::PageRequest;

use crate::api;
use crate::state::global::GlobalState;

/// Settings page component
#[component]
pub fn Settings() -> impl IntoView {
    view! {
        <div class="space-y-8">
            <h1 class="text-3xl font-bold">"Settings"</h1>

            <ApiSettings />

            <p class="text-sm text-gray-500">"SalesDesk v"{env!("CARGO_PKG_VERSION")}</p>
        </div>
    }
}

/// API connection settings
#[component]
fn ApiSettings() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (api_url, set_api_url) = create_signal(api::get_api_base());
    let (testing, set_testing) = create_signal(false);
    let (test_result, set_test_result) = create_signal(None::<bool>);

    let test_connection = move |_| {
        set_testing.set(true);
        set_test_result.set(None);
        state.set_api_base(&api_url.get());

        spawn_local(async move {
            // Smallest request the backend serves
            match api::client().customers().page(PageRequest::new(1, 1)).await {
                Ok(_) => {
                    set_test_result.set(Some(true));
                    state.show_success("Connection successful!");
                }
                Err(e) => {
                    set_test_result.set(Some(false));
                    state.show_error(&format!("Connection failed: {}", e));
                }
            }
            set_testing.set(false);
        });
    };

    let save_url = move |_| {
        state.set_api_base(&api_url.get());
        state.show_success("API URL saved");
    };

    let reset_url = move |_| {
        state.set_api_base(api::DEFAULT_API_BASE);
        set_api_url.set(api::DEFAULT_API_BASE.to_string());
        state.show_success("API URL reset to default");
    };

    let status = move || match test_result.get() {
        Some(true) => ("text-green-400", "Connected"),
        Some(false) => ("text-red-400", "Unreachable"),
        None => ("text-gray-500", "Not tested"),
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-3">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">"Backend"</h2>
                <span class=move || format!("text-sm {}", status().0)>{move || status().1}</span>
            </div>

            <label class="block text-sm text-gray-400" for="api-url">"Base URL"</label>
            <input
                id="api-url"
                type="url"
                class="w-full bg-gray-700 rounded-lg px-4 py-3 font-mono border border-gray-600 focus:border-primary-500 focus:outline-none"
                prop:value=move || api_url.get()
                on:input=move |ev| set_api_url.set(event_target_value(&ev))
            />
            <p class="text-xs text-gray-500">
                "Include the /api prefix. A self-signed HTTPS certificate must be trusted by the browser first."
            </p>

            <div class="flex justify-end space-x-2 pt-2">
                <button class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg" on:click=reset_url>
                    "Reset"
                </button>
                <button
                    class="px-4 py-2 bg-gray-600 hover:bg-gray-500 disabled:opacity-50 rounded-lg"
                    disabled=move || testing.get()
                    on:click=test_connection
                >
                    {move || if testing.get() { "Testing..." } else { "Test connection" }}
                </button>
                <button class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium" on:click=save_url>
                    "Save"
                </button>
            </div>
        </section>
    }
}

