//! Table Controls
//!
//! Pager with page-size selector, and sortable column headers.

use leptos::*;

use salesdesk::listing::{Listing, SortDirection, Sortable};

use crate::state::PAGE_SIZE_OPTIONS;

/// Snapshot of a listing's page position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub page_size: usize,
}

impl PageInfo {
    pub fn of<T: Sortable + Clone>(listing: &Listing<T>) -> Self {
        Self {
            page: listing.current_page(),
            total_pages: listing.total_pages(),
            start: listing.start_item(),
            end: listing.end_item(),
            total: listing.total(),
            page_size: listing.page_size(),
        }
    }

    /// `"start-end of total"`
    pub fn summary(&self) -> String {
        format!("{}-{} of {}", self.start, self.end, self.total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Previous/next buttons, a range summary and a page-size select
#[component]
pub fn Pager(
    #[prop(into)]
    info: Signal<PageInfo>,
    #[prop(into)]
    on_page: Callback<usize>,
    #[prop(into)]
    on_page_size: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between mt-4 text-sm text-gray-400">
            <div class="flex items-center space-x-2">
                <span>"Rows per page"</span>
                <select
                    class="bg-gray-700 rounded px-2 py-1 border border-gray-600"
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                            on_page_size.call(size);
                        }
                    }
                >
                    {PAGE_SIZE_OPTIONS.into_iter().map(|size| view! {
                        <option value=size selected=move || info.get().page_size == size>
                            {size}
                        </option>
                    }).collect_view()}
                </select>
            </div>

            <div class="flex items-center space-x-4">
                <span>{move || info.get().summary()}</span>
                <button
                    class="px-3 py-1 rounded bg-gray-700 hover:bg-gray-600 disabled:opacity-40"
                    disabled=move || !info.get().has_previous()
                    on:click=move |_| on_page.call(info.get().page - 1)
                >
                    "‹"
                </button>
                <button
                    class="px-3 py-1 rounded bg-gray-700 hover:bg-gray-600 disabled:opacity-40"
                    disabled=move || !info.get().has_next()
                    on:click=move |_| on_page.call(info.get().page + 1)
                >
                    "›"
                </button>
            </div>
        </div>
    }
}

/// Clickable column header showing the active sort direction
#[component]
pub fn SortHeader(
    label: &'static str,
    #[prop(into)]
    direction: Signal<Option<SortDirection>>,
    #[prop(into)]
    on_sort: Callback<()>,
) -> impl IntoView {
    view! {
        <th
            class="px-4 py-3 text-left font-medium cursor-pointer select-none hover:text-white"
            on:click=move |_| on_sort.call(())
        >
            {label}
            <span class="ml-1 text-primary-400">
                {move || direction.get().map(SortDirection::arrow).unwrap_or("")}
            </span>
        </th>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesdesk::models::Customer;

    fn customer(n: i64) -> Customer {
        Customer {
            id: None,
            customer_id: n,
            customer_name: format!("Customer {}", n),
            last_order_date: None,
            next_predicted_order: None,
        }
    }

    #[test]
    fn test_page_info_summary() {
        let mut listing = Listing::new(10);
        let token = listing.begin_load();
        listing.finish_load(token, Ok((1..=23).map(customer).collect()));
        listing.page(3);

        let info = PageInfo::of(&listing);
        assert_eq!(info.summary(), "21-23 of 23");
        assert!(info.has_previous());
        assert!(!info.has_next());
    }

    #[test]
    fn test_empty_listing_summary() {
        let listing: Listing<Customer> = Listing::new(10);
        let info = PageInfo::of(&listing);

        assert_eq!(info.summary(), "0-0 of 0");
        assert!(!info.has_previous());
        assert!(!info.has_next());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use salesdesk::models::Customer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_page_info_in_browser() {
        let mut listing: Listing<Customer> = Listing::new(5);
        let token = listing.begin_load();
        listing.finish_load(token, Ok(Vec::new()));

        let info = PageInfo::of(&listing);
        assert_eq!(info.page_size, 5);
        assert_eq!(info.summary(), "0-0 of 0");
    }
}
