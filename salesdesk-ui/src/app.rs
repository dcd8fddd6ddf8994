//! Application shell: router, navigation and toasts.

use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast};
use crate::pages::{Customers, Settings};
use crate::state::global::provide_global_state;

#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white">
                <Nav />

                <main class="container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Customers />
                        <Route path="/customers" view=Customers />
                        <Route path="/settings" view=Settings />
                        <Route path="/*any" view=|| view! { <Redirect path="/customers" /> } />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}
