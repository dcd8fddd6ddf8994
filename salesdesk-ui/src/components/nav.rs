//! Navigation Bar
//!
//! Brand, page links and the backend the app is talking to.

use leptos::*;
use leptos_router::*;

use crate::state::global::GlobalState;

const LINKS: [(&str, &str); 2] = [("/customers", "Customers"), ("/settings", "Settings")];

/// Host part of a base URL, for the header badge
fn backend_host(base: &str) -> &str {
    let rest = base.split_once("://").map_or(base, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

/// Top navigation bar
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let host = move || state.api_base.with(|base| backend_host(base).to_string());

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4 flex items-center h-16 space-x-6">
                <A href="/" class="text-xl font-bold text-white">"SalesDesk"</A>

                <div class="flex-1 flex items-center space-x-1">
                    {LINKS.into_iter().map(|(href, label)| view! {
                        <A
                            href=href
                            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                            active_class="bg-gray-700 text-white"
                        >
                            {label}
                        </A>
                    }).collect_view()}
                </div>

                <A
                    href="/settings"
                    class="text-xs font-mono text-gray-400 bg-gray-900 rounded px-2 py-1 hover:text-white"
                >
                    {host}
                </A>
            </div>
        </nav>
    }
}
