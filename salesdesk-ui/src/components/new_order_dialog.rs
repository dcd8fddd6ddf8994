//! New Order Dialog
//!
//! Order form with employee/shipper/product selects, a line-item editor
//! and a live total.

use leptos::*;

use salesdesk::dialogs::{CustomerRef, NewOrderDialog};
use salesdesk::models::Lookup;

use crate::api;
use crate::components::InlineLoading;
use crate::state::GlobalState;

/// Open the form for `customer`, fetching lookup lists on first use
pub fn open_new_order(dialog: RwSignal<NewOrderDialog>, customer: CustomerRef) {
    dialog.update(|d| d.open(Some(customer), chrono::Local::now().date_naive()));

    if dialog.try_update(NewOrderDialog::begin_lookups).unwrap_or(false) {
        spawn_local(async move {
            let result = api::client().lookups().await;
            dialog.update(|d| d.finish_lookups(result));
        });
    }
}

fn submit(dialog: RwSignal<NewOrderDialog>, state: GlobalState) {
    let Some(Some((token, command))) = dialog.try_update(NewOrderDialog::begin_submission) else {
        return;
    };

    spawn_local(async move {
        let result = api::client().orders().create(&command).await;
        let created = dialog.try_update(|d| d.finish_submission(token, result)).flatten();
        if created.is_some() {
            state.show_success("Order created");
        }
    });
}

fn options<T: Lookup>(items: &[T]) -> Vec<(i64, String)> {
    items
        .iter()
        .map(|item| (item.id(), item.display_name().to_string()))
        .collect()
}

fn parse_or<T: std::str::FromStr>(raw: &str, fallback: T) -> T {
    raw.trim().parse().unwrap_or(fallback)
}

/// Modal form; renders nothing while closed
#[component]
pub fn NewOrderModal(dialog: RwSignal<NewOrderDialog>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let is_open = move || dialog.with(NewOrderDialog::is_open);
    let title = move || {
        dialog.with(|d| {
            d.customer()
                .map(|c| format!("New order for {}", c.name))
                .unwrap_or_else(|| "New order".to_string())
        })
    };

    let employees = create_memo(move |_| dialog.with(|d| options(d.employees())));
    let shippers = create_memo(move |_| dialog.with(|d| options(d.shippers())));
    let line_count = create_memo(move |_| dialog.with(|d| d.draft().line_items().len()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit(dialog, state);
    };

    view! {
        <Show when=is_open>
            <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40">
                <form
                    on:submit=on_submit
                    class="bg-gray-800 rounded-xl w-full max-w-4xl max-h-[90vh] overflow-y-auto p-6 space-y-4"
                >
                    <div class="flex items-center justify-between">
                        <h2 class="text-xl font-semibold">{title}</h2>
                        <button
                            type="button"
                            class="text-gray-400 hover:text-white text-2xl"
                            on:click=move |_| dialog.update(NewOrderDialog::close)
                        >
                            "×"
                        </button>
                    </div>

                    {move || dialog.with(|d| d.error().map(str::to_string)).map(|message| view! {
                        <div class="bg-red-900/40 border border-red-700 rounded-lg p-3 text-red-300">
                            {message}
                        </div>
                    })}

                    {move || dialog.with(NewOrderDialog::is_loading_lookups).then(|| view! {
                        <InlineLoading label="Loading form data..." />
                    })}

                    <div class="grid md:grid-cols-2 gap-4">
                        <LookupSelect
                            label="Employee"
                            items=employees
                            selected=Signal::derive(move || dialog.with(|d| d.draft().employee_id))
                            on_select=move |id: i64| dialog.update(|d| d.draft_mut().employee_id = id)
                        />
                        <LookupSelect
                            label="Shipper"
                            items=shippers
                            selected=Signal::derive(move || dialog.with(|d| d.draft().shipper_id))
                            on_select=move |id: i64| dialog.update(|d| d.draft_mut().shipper_id = id)
                        />
                    </div>

                    <ShippingFields dialog=dialog />

                    <section>
                        <div class="flex items-center justify-between mb-2">
                            <h3 class="font-semibold">"Line items"</h3>
                            <button
                                type="button"
                                class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
                                on:click=move |_| dialog.update(NewOrderDialog::add_line_item)
                            >
                                "+ Add line"
                            </button>
                        </div>
                        <div class="space-y-2">
                            {move || (0..line_count.get())
                                .map(|index| view! { <LineItemRow dialog=dialog index=index /> })
                                .collect_view()}
                        </div>
                    </section>

                    <div class="flex items-center justify-between pt-4 border-t border-gray-700">
                        <span class="text-lg font-semibold">
                            {move || format!("Total: {:.2}", dialog.with(NewOrderDialog::total))}
                        </span>
                        <div class="space-x-2">
                            <button
                                type="button"
                                class="px-4 py-2 bg-gray-600 hover:bg-gray-500 rounded-lg"
                                on:click=move |_| dialog.update(NewOrderDialog::close)
                            >
                                "Cancel"
                            </button>
                            <button
                                type="submit"
                                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700 rounded-lg font-medium"
                                disabled=move || dialog.with(|d| d.is_submitting() || !d.draft().is_form_valid())
                            >
                                {move || if dialog.with(NewOrderDialog::is_submitting) { "Saving..." } else { "Create order" }}
                            </button>
                        </div>
                    </div>
                </form>
            </div>
        </Show>
    }
}

#[component]
fn LookupSelect(
    label: &'static str,
    #[prop(into)]
    items: Signal<Vec<(i64, String)>>,
    #[prop(into)]
    selected: Signal<i64>,
    #[prop(into)]
    on_select: Callback<i64>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-400 mb-1">{label}</span>
            <select
                class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                on:change=move |ev| on_select.call(parse_or(&event_target_value(&ev), 0))
            >
                <option value="0" selected=move || selected.get() == 0>"Select..."</option>
                {move || items.get().into_iter().map(|(id, name)| view! {
                    <option value=id selected=move || selected.get() == id>{name}</option>
                }).collect_view()}
            </select>
        </label>
    }
}

#[component]
fn ShippingFields(dialog: RwSignal<NewOrderDialog>) -> impl IntoView {
    let text_field = move |label: &'static str, read: fn(&NewOrderDialog) -> String, write: fn(&mut NewOrderDialog, String)| {
        view! {
            <label class="block">
                <span class="block text-sm text-gray-400 mb-1">{label}</span>
                <input
                    type="text"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    prop:value=move || dialog.with(read)
                    on:input=move |ev| dialog.update(|d| write(d, event_target_value(&ev)))
                />
            </label>
        }
    };

    let date_field = move |label: &'static str, read: fn(&NewOrderDialog) -> String, write: fn(&mut NewOrderDialog, String)| {
        view! {
            <label class="block">
                <span class="block text-sm text-gray-400 mb-1">{label}</span>
                <input
                    type="date"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    prop:value=move || dialog.with(read)
                    on:change=move |ev| dialog.update(|d| write(d, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="grid md:grid-cols-2 gap-4">
            {text_field("Ship name", |d| d.draft().ship_name.clone(), |d, v| d.draft_mut().ship_name = v)}
            {text_field("Ship address", |d| d.draft().ship_address.clone(), |d, v| d.draft_mut().ship_address = v)}
            {text_field("Ship city", |d| d.draft().ship_city.clone(), |d, v| d.draft_mut().ship_city = v)}
            {text_field("Ship country", |d| d.draft().ship_country.clone(), |d, v| d.draft_mut().ship_country = v)}
        </div>
        <div class="grid md:grid-cols-4 gap-4">
            {date_field("Order date", |d| d.draft().order_date.clone(), |d, v| d.draft_mut().order_date = v)}
            {date_field("Required date", |d| d.draft().required_date.clone(), |d, v| d.draft_mut().required_date = v)}
            {date_field("Shipped date", |d| d.draft().shipped_date.clone(), |d, v| d.draft_mut().shipped_date = v)}
            <label class="block">
                <span class="block text-sm text-gray-400 mb-1">"Freight"</span>
                <input
                    type="number"
                    step="0.01"
                    min="0"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    prop:value=move || dialog.with(|d| d.draft().freight.to_string())
                    on:change=move |ev| {
                        let freight = parse_or(&event_target_value(&ev), 0.0);
                        dialog.update(|d| d.draft_mut().freight = freight)
                    }
                />
            </label>
        </div>
    }
}

#[component]
fn LineItemRow(dialog: RwSignal<NewOrderDialog>, index: usize) -> impl IntoView {
    let products = create_memo(move |_| dialog.with(|d| options(d.products())));
    let line = move || {
        dialog.with(|d| d.draft().line_items().get(index).cloned().unwrap_or_default())
    };

    let set = move |apply: fn(&mut salesdesk::LineItem, &str), raw: String| {
        dialog.update(|d| {
            if let Some(item) = d.draft_mut().line_item_mut(index) {
                apply(item, &raw);
            }
        })
    };

    view! {
        <div class="grid grid-cols-12 gap-2 items-center">
            <select
                class="col-span-5 bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                on:change=move |ev| {
                    let product_id = parse_or(&event_target_value(&ev), 0);
                    dialog.update(|d| d.select_product(index, product_id));
                }
            >
                <option value="0" selected=move || line().product_id == 0>"Select product..."</option>
                {move || products.get().into_iter().map(|(id, name)| view! {
                    <option value=id selected=move || line().product_id == id>{name}</option>
                }).collect_view()}
            </select>
            <input
                type="number"
                step="0.01"
                min="0"
                title="Unit price"
                class="col-span-2 bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                prop:value=move || line().unit_price.to_string()
                on:change=move |ev| set(|item, raw| item.unit_price = parse_or(raw, 0.0), event_target_value(&ev))
            />
            <input
                type="number"
                min="1"
                title="Quantity"
                class="col-span-1 bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                prop:value=move || line().qty.to_string()
                on:change=move |ev| set(|item, raw| item.qty = parse_or(raw, 0), event_target_value(&ev))
            />
            <input
                type="number"
                min="0"
                max="100"
                title="Discount %"
                class="col-span-1 bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                prop:value=move || line().discount.to_string()
                on:change=move |ev| set(|item, raw| item.discount = parse_or(raw, 0.0), event_target_value(&ev))
            />
            <span class="col-span-2 text-right">{move || format!("{:.2}", line().total())}</span>
            <button
                type="button"
                class="col-span-1 text-gray-400 hover:text-red-400 disabled:opacity-30"
                disabled=move || dialog.with(|d| d.draft().line_items().len() <= 1)
                on:click=move |_| {
                    dialog.update(|d| {
                        d.remove_line_item(index);
                    })
                }
            >
                "✕"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("12", 0), 12);
        assert_eq!(parse_or(" 2.5 ", 0.0), 2.5);
        assert_eq!(parse_or("", 1), 1);
        assert_eq!(parse_or("abc", 0.0), 0.0);
    }
}
