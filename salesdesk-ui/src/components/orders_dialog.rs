//! Orders Dialog
//!
//! A customer's order history with a detail pane for one order.

use leptos::*;

use salesdesk::dialogs::{CustomerRef, OrdersDialog};
use salesdesk::models::{Order, OrderSummary, OrderSummaryColumn};

use crate::api;
use crate::components::{format_date, InlineLoading, Loading, PageInfo, Pager, SortHeader};

/// Open the dialog for `customer` and fetch its orders
pub fn open_orders(dialog: RwSignal<OrdersDialog>, customer: CustomerRef) {
    let customer_id = customer.id;
    if let Some(token) = dialog.try_update(|d| d.open(customer)) {
        spawn_local(async move {
            let result = api::client().orders().customer_orders(customer_id).await;
            dialog.update(|d| {
                d.finish_open(token, result);
            });
        });
    }
}

fn retry(dialog: RwSignal<OrdersDialog>) {
    let Some(customer_id) = dialog.with_untracked(|d| d.customer().map(|c| c.id)) else {
        return;
    };
    if let Some(token) = dialog.try_update(|d| d.orders_mut().begin_load()) {
        spawn_local(async move {
            let result = api::client().orders().customer_orders(customer_id).await;
            dialog.update(|d| {
                d.finish_open(token, result);
            });
        });
    }
}

fn show_order(dialog: RwSignal<OrdersDialog>, order_id: i64) {
    if let Some(token) = dialog.try_update(|d| d.begin_show_order()) {
        spawn_local(async move {
            let result = api::client().orders().get(order_id).await;
            dialog.update(|d| {
                d.finish_show_order(token, result);
            });
        });
    }
}

/// Modal over the customers page; renders nothing while closed
#[component]
pub fn OrdersModal(dialog: RwSignal<OrdersDialog>) -> impl IntoView {
    let is_open = move || dialog.with(OrdersDialog::is_open);
    let title = move || {
        dialog.with(|d| {
            d.customer()
                .map(|c| format!("Orders for {}", c.name))
                .unwrap_or_default()
        })
    };

    view! {
        <Show when=is_open>
            <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40">
                <div class="bg-gray-800 rounded-xl w-full max-w-5xl max-h-[90vh] overflow-y-auto p-6">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-xl font-semibold">{title}</h2>
                        <button
                            class="text-gray-400 hover:text-white text-2xl"
                            on:click=move |_| dialog.update(OrdersDialog::close)
                        >
                            "×"
                        </button>
                    </div>

                    <OrdersBody dialog=dialog />
                    <OrderDetailPane dialog=dialog />
                </div>
            </div>
        </Show>
    }
}

#[component]
fn OrdersBody(dialog: RwSignal<OrdersDialog>) -> impl IntoView {
    let loading = move || dialog.with(|d| d.orders().is_loading());
    let error = move || dialog.with(|d| d.orders().error().map(str::to_string));
    let rows = move || dialog.with(|d| d.orders().page_items().to_vec());
    let info = Signal::derive(move || dialog.with(|d| PageInfo::of(d.orders())));

    view! {
        {move || {
            if loading() {
                return view! { <Loading label="Loading orders..." /> }.into_view();
            }

            if let Some(message) = error() {
                return view! {
                    <div class="bg-red-900/40 border border-red-700 rounded-lg p-4 flex items-center justify-between">
                        <span class="text-red-300">{message}</span>
                        <button
                            class="px-4 py-2 bg-red-700 hover:bg-red-600 rounded-lg"
                            on:click=move |_| retry(dialog)
                        >
                            "Retry"
                        </button>
                    </div>
                }.into_view();
            }

            view! {
                <table class="w-full text-sm">
                    <thead class="text-gray-400 border-b border-gray-700">
                        <tr>
                            {OrderSummaryColumn::ALL.into_iter().map(|column| view! {
                                <SortHeader
                                    label=column.label()
                                    direction=Signal::derive(move || dialog.with(|d| {
                                        d.orders()
                                            .sort_state()
                                            .filter(|s| s.column == column)
                                            .map(|s| s.direction)
                                    }))
                                    on_sort=move |_: ()| dialog.update(|d| d.orders_mut().sort(column))
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
                                        <td colspan="7" class="px-4 py-6 text-center text-gray-400">
                                            "No orders for this customer."
                                        </td>
                                    </tr>
                                }.into_view()
                            } else {
                                rows.into_iter()
                                    .map(|order| view! { <OrderRow order=order dialog=dialog /> })
                                    .collect_view()
                            }
                        }}
                    </tbody>
                </table>

                <Pager
                    info=info
                    on_page=move |n: usize| dialog.update(|d| {
                        d.orders_mut().page(n);
                    })
                    on_page_size=move |size: usize| dialog.update(|d| d.orders_mut().set_page_size(size))
                />
            }.into_view()
        }}
    }
}

#[component]
fn OrderRow(order: OrderSummary, dialog: RwSignal<OrdersDialog>) -> impl IntoView {
    let order_id = order.order_id;

    view! {
        <tr class="border-b border-gray-700/50 hover:bg-gray-700/40">
            <td class="px-4 py-2">{order.order_id}</td>
            <td class="px-4 py-2">{format_date(order.required_date.as_deref())}</td>
            <td class="px-4 py-2">{format_date(order.shipped_date.as_deref())}</td>
            <td class="px-4 py-2">{order.ship_name.unwrap_or_default()}</td>
            <td class="px-4 py-2">{order.ship_address.unwrap_or_default()}</td>
            <td class="px-4 py-2">{order.ship_city.unwrap_or_default()}</td>
            <td class="px-4 py-2 text-right">
                <button
                    class="text-primary-400 hover:text-primary-300"
                    on:click=move |_| show_order(dialog, order_id)
                >
                    "Details"
                </button>
            </td>
        </tr>
    }
}

#[component]
fn OrderDetailPane(dialog: RwSignal<OrdersDialog>) -> impl IntoView {
    view! {
        {move || {
            if dialog.with(OrdersDialog::is_detail_loading) {
                return view! {
                    <div class="mt-6">
                        <InlineLoading label="Loading order..." />
                    </div>
                }.into_view();
            }

            if let Some(message) = dialog.with(|d| d.detail_error().map(str::to_string)) {
                return view! { <p class="mt-6 text-red-300">{message}</p> }.into_view();
            }

            match dialog.with(|d| d.detail().cloned()) {
                Some(order) => view! { <OrderDetail order=order dialog=dialog /> }.into_view(),
                None => view! {}.into_view(),
            }
        }}
    }
}

#[component]
fn OrderDetail(order: Order, dialog: RwSignal<OrdersDialog>) -> impl IntoView {
    let lines_total: f64 = order
        .details
        .iter()
        .map(|d| d.unit_price * f64::from(d.qty) * (1.0 - d.discount / 100.0))
        .sum();
    let destination = [
        order.ship_name.as_deref(),
        order.ship_address.as_deref(),
        order.ship_city.as_deref(),
        order.ship_country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

    view! {
        <section class="mt-6 bg-gray-900 rounded-lg p-4">
            <div class="flex items-center justify-between mb-3">
                <h3 class="font-semibold">"Order #"{order.order_id}</h3>
                <button
                    class="text-gray-400 hover:text-white"
                    on:click=move |_| dialog.update(OrdersDialog::close_detail)
                >
                    "Close"
                </button>
            </div>

            <div class="grid grid-cols-2 md:grid-cols-4 gap-2 text-sm text-gray-300 mb-4">
                <span>"Ordered: "{format_date(order.order_date.as_deref())}</span>
                <span>"Required: "{format_date(order.required_date.as_deref())}</span>
                <span>"Shipped: "{format_date(order.shipped_date.as_deref())}</span>
                <span>"Freight: "{format!("{:.2}", order.freight)}</span>
                <span class="col-span-full">"Ship to: "{destination}</span>
            </div>

            <table class="w-full text-sm">
                <thead class="text-gray-400 border-b border-gray-700">
                    <tr>
                        <th class="px-2 py-2 text-left">"Product"</th>
                        <th class="px-2 py-2 text-right">"Unit Price"</th>
                        <th class="px-2 py-2 text-right">"Qty"</th>
                        <th class="px-2 py-2 text-right">"Discount"</th>
                    </tr>
                </thead>
                <tbody>
                    {order.details.into_iter().map(|line| view! {
                        <tr class="border-b border-gray-800">
                            <td class="px-2 py-1">
                                {line.product_name.unwrap_or_else(|| format!("#{}", line.product_id))}
                            </td>
                            <td class="px-2 py-1 text-right">{format!("{:.2}", line.unit_price)}</td>
                            <td class="px-2 py-1 text-right">{line.qty}</td>
                            <td class="px-2 py-1 text-right">{format!("{}%", line.discount)}</td>
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>

            <p class="mt-3 text-right font-medium">
                {format!("Total: {:.2}", lines_total + order.freight)}
            </p>
        </section>
    }
}
