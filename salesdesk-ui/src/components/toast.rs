//! Toast Notifications
//!
//! Transient success and error banners in the bottom-right corner.

use leptos::*;

use crate::state::global::GlobalState;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Failure,
}

impl Tone {
    fn classes(self) -> &'static str {
        match self {
            Tone::Success => "bg-green-600",
            Tone::Failure => "bg-red-600",
        }
    }

    fn role(self) -> &'static str {
        match self {
            Tone::Success => "status",
            Tone::Failure => "alert",
        }
    }
}

/// Renders whichever of the global success/error messages are set
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed bottom-16 right-4 z-50 flex flex-col items-end space-y-2">
            {move || state.success.get().map(|text| view! {
                <Banner text=text tone=Tone::Success on_dismiss=move |_: ()| state.success.set(None) />
            })}
            {move || state.error.get().map(|text| view! {
                <Banner text=text tone=Tone::Failure on_dismiss=move |_: ()| state.clear_error() />
            })}
        </div>
    }
}

#[component]
fn Banner(
    text: String,
    tone: Tone,
    #[prop(into)]
    on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <div
            role=tone.role()
            class=format!(
                "flex items-start max-w-md space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg animate-slide-in",
                tone.classes()
            )
        >
            <span class="flex-1 text-sm font-medium break-words">{text}</span>
            <button
                class="text-white/70 hover:text-white"
                title="Dismiss"
                on:click=move |_| on_dismiss.call(())
            >
                "×"
            </button>
        </div>
    }
}
