//! Loading Indicators

use leptos::*;

/// Centered spinner that replaces a table while it loads
#[component]
pub fn Loading(
    #[prop(optional)]
    label: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-3 text-gray-400">
            <div class="loading-spinner w-8 h-8" />
            {label.map(|text| view! { <span class="text-sm">{text}</span> })}
        </div>
    }
}

/// Small spinner followed by a caption, for use inside a dialog
#[component]
pub fn InlineLoading(label: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center space-x-2 text-gray-400">
            <span class="inline-block loading-spinner w-4 h-4" />
            <span>{label}</span>
        </div>
    }
}
