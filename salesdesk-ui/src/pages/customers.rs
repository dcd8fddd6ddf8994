//! Customers Page
//!
//! Searchable, sortable, paginated customer table with their predicted
//! next order. Each row opens the orders or new-order dialog.

use leptos::*;

use salesdesk::dialogs::{CustomerRef, NewOrderDialog, OrdersDialog};
use salesdesk::listing::{Listing, SearchPlan};
use salesdesk::models::{Customer, CustomerColumn};

use crate::api;
use crate::components::new_order_dialog::open_new_order;
use crate::components::orders_dialog::open_orders;
use crate::components::{format_date, Loading, NewOrderModal, OrdersModal, PageInfo, Pager, SortHeader};
use crate::state::DEFAULT_PAGE_SIZE;

/// Columns shown in the table, in display order
const COLUMNS: [CustomerColumn; 3] = [
    CustomerColumn::Name,
    CustomerColumn::LastOrderDate,
    CustomerColumn::NextPredictedOrder,
];

fn load(listing: RwSignal<Listing<Customer>>) {
    if let Some(token) = listing.try_update(Listing::begin_load) {
        spawn_local(async move {
            let result = api::client().customers().list().await;
            listing.update(|l| {
                l.finish_load(token, result);
            });
        });
    }
}

fn search(listing: RwSignal<Listing<Customer>>, term: String) {
    match listing.try_update(|l| l.begin_search(&term)) {
        Some(SearchPlan::Remote { token, term }) => spawn_local(async move {
            let result = api::client().customers().search_by_name(&term).await;
            listing.update(|l| {
                l.finish_search(token, result);
            });
        }),
        Some(SearchPlan::Load { token }) => spawn_local(async move {
            let result = api::client().customers().list().await;
            listing.update(|l| {
                l.finish_load(token, result);
            });
        }),
        Some(SearchPlan::Local) | None => {}
    }
}

/// Customers page component
#[component]
pub fn Customers() -> impl IntoView {
    let listing = create_rw_signal(Listing::<Customer>::new(DEFAULT_PAGE_SIZE));
    let orders = create_rw_signal(OrdersDialog::new(DEFAULT_PAGE_SIZE));
    let new_order = create_rw_signal(NewOrderDialog::new());
    let (term, set_term) = create_signal(String::new());

    // Fetch customers on mount
    load(listing);

    let info = Signal::derive(move || listing.with(PageInfo::of));

    view! {
        <div class="space-y-6">
            // Header
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Customers"</h1>
                    <p class="text-gray-400 mt-1">"Predicted next orders by customer"</p>
                </div>

                <div class="flex space-x-2">
                    <input
                        type="search"
                        placeholder="Search by name"
                        class="bg-gray-700 rounded-lg px-4 py-2 border border-gray-600 focus:border-primary-500 focus:outline-none"
                        prop:value=move || term.get()
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            // Clearing the box shows everything again at once
                            if value.trim().is_empty() {
                                search(listing, String::new());
                            }
                            set_term.set(value);
                        }
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                search(listing, term.get_untracked());
                            }
                        }
                    />
                    <button
                        class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                        on:click=move |_| search(listing, term.get_untracked())
                    >
                        "Search"
                    </button>
                </div>
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                {move || {
                    if listing.with(Listing::is_loading) {
                        return view! { <Loading label="Loading customers..." /> }.into_view();
                    }

                    if let Some(message) = listing.with(|l| l.error().map(str::to_string)) {
                        return view! {
                            <div class="bg-red-900/40 border border-red-700 rounded-lg p-4 flex items-center justify-between">
                                <span class="text-red-300">{message}</span>
                                <button
                                    class="px-4 py-2 bg-red-700 hover:bg-red-600 rounded-lg"
                                    on:click=move |_| load(listing)
                                >
                                    "Retry"
                                </button>
                            </div>
                        }.into_view();
                    }

                    view! {
                        <CustomerTable listing=listing orders=orders new_order=new_order />
                        <Pager
                            info=info
                            on_page=move |n: usize| listing.update(|l| {
                                l.page(n);
                            })
                            on_page_size=move |size: usize| listing.update(|l| l.set_page_size(size))
                        />
                    }.into_view()
                }}
            </section>

            <OrdersModal dialog=orders />
            <NewOrderModal dialog=new_order />
        </div>
    }
}

#[component]
fn CustomerTable(
    listing: RwSignal<Listing<Customer>>,
    orders: RwSignal<OrdersDialog>,
    new_order: RwSignal<NewOrderDialog>,
) -> impl IntoView {
    let rows = move || listing.with(|l| l.page_items().to_vec());

    view! {
        <table class="w-full text-sm">
            <thead class="text-gray-400 border-b border-gray-700">
                <tr>
                    {COLUMNS.into_iter().map(|column| view! {
                        <SortHeader
                            label=column.label()
                            direction=Signal::derive(move || listing.with(|l| {
                                l.sort_state()
                                    .filter(|s| s.column == column)
                                    .map(|s| s.direction)
                            }))
                            on_sort=move |_: ()| listing.update(|l| l.sort(column))
                        />
                    }).collect_view()}
                    <th />
                </tr>
            </thead>
            <tbody>
                {move || {
                    let rows = rows();
                    if rows.is_empty() {
                        view! {
                            <tr>
                                <td colspan="4" class="px-4 py-6 text-center text-gray-400">
                                    "No customers found."
                                </td>
                            </tr>
                        }.into_view()
                    } else {
                        rows.into_iter()
                            .map(|customer| view! {
                                <CustomerRow customer=customer orders=orders new_order=new_order />
                            })
                            .collect_view()
                    }
                }}
            </tbody>
        </table>
    }
}

#[component]
fn CustomerRow(
    customer: Customer,
    orders: RwSignal<OrdersDialog>,
    new_order: RwSignal<NewOrderDialog>,
) -> impl IntoView {
    let for_orders = CustomerRef::from(&customer);
    let for_new_order = for_orders.clone();

    view! {
        <tr class="border-b border-gray-700/50 hover:bg-gray-700/40">
            <td class="px-4 py-2 font-medium">{customer.customer_name}</td>
            <td class="px-4 py-2">{format_date(customer.last_order_date.as_deref())}</td>
            <td class="px-4 py-2">{format_date(customer.next_predicted_order.as_deref())}</td>
            <td class="px-4 py-2 text-right space-x-3">
                <button
                    class="text-primary-400 hover:text-primary-300"
                    on:click=move |_| open_orders(orders, for_orders.clone())
                >
                    "View Orders"
                </button>
                <button
                    class="text-green-400 hover:text-green-300"
                    on:click=move |_| open_new_order(new_order, for_new_order.clone())
                >
                    "New Order"
                </button>
            </td>
        </tr>
    }
}
