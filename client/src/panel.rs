use leptos::prelude::*;
use wasm_bindgen::JsCast;

use cathar_shared::{FilterGroup, FilterKind, FilterOption};

use crate::app::{ActiveSites, Filters, PanelVisible, Store};

/// Forward a filter click to the store. All filter state lives there; the
/// panel only renders the current groups and dispatches selections.
fn select(store: RwSignal<Option<cathar_shared::MapStore>>, group_id: String, option_id: String) {
    store.update(|s| {
        if let Some(s) = s {
            s.select_filter_option(&group_id, &option_id);
        }
    });
}

/// Tab sticking out of the panel's left edge. Kept clickable even while the
/// wrapper around the hidden panel ignores pointer events.
#[component]
pub fn PanelToggle() -> impl IntoView {
    let Store(store) = expect_context();
    let PanelVisible(panel_visible) = expect_context();

    let on_click = move |_| {
        store.update(|s| {
            if let Some(s) = s {
                s.toggle_panel();
            }
        });
    };

    view! {
        <button
            on:click=on_click
            title=move || if panel_visible.get() { "Hide filters (P)" } else { "Show filters (P)" }
            style="position: absolute; top: 14px; left: -34px; width: 34px; height: 44px; pointer-events: auto; background: #12141f; border: 1px solid #282c3e; border-right: none; border-radius: 6px 0 0 6px; color: #9a9590; font-family: 'JetBrains Mono', monospace; font-size: 0.8rem; cursor: pointer;"
        >
            {move || if panel_visible.get() { "\u{203a}" } else { "\u{2039}" }}
        </button>
    }
}

/// Filter panel: one section per filter group, radio groups rendered as a
/// segmented control and checkbox groups as toggle rows.
#[component]
pub fn FilterPanel() -> impl IntoView {
    let Filters(filters) = expect_context();
    let ActiveSites(active) = expect_context();
    let Store(store) = expect_context();

    view! {
        <div style="width: 100%; height: 100%; background: #12141f; border-left: 1px solid #282c3e; overflow-y: auto; padding: 14px; box-sizing: border-box; font-family: 'Inter', system-ui, sans-serif;">
            <div style="display: flex; align-items: baseline; justify-content: space-between; margin-bottom: 12px;">
                <span style="font-size: 0.95rem; color: #e2e0d8; font-weight: 600;">"Filters"</span>
                <span style="font-family: 'JetBrains Mono', monospace; font-size: 0.64rem; color: #7c829e;">
                    {move || format!("{} shown", active.with(|a| a.len()))}
                </span>
            </div>
            {move || {
                filters
                    .get()
                    .into_iter()
                    .map(|group| view! { <FilterGroupSection group=group store=store /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn FilterGroupSection(
    group: FilterGroup,
    store: RwSignal<Option<cathar_shared::MapStore>>,
) -> impl IntoView {
    let kind = group.kind;
    let group_id = group.id.clone();
    let options = group.options.clone();

    view! {
        <div style="margin-bottom: 16px;">
            <div style="font-size: 0.7rem; color: #9a9590; text-transform: uppercase; letter-spacing: 0.06em; margin-bottom: 6px;">
                {group.label.clone()}
            </div>
            {match kind {
                FilterKind::Radio => view! {
                    <SegmentedControl group_id=group_id options=options store=store />
                }.into_any(),
                FilterKind::Checkbox => view! {
                    <div>
                        {options
                            .into_iter()
                            .map(|opt| {
                                view! {
                                    <CheckboxRow group_id=group_id.clone() option=opt store=store />
                                }
                            })
                            .collect_view()}
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

/// Mutually exclusive options as adjoining buttons, selection highlighted.
#[component]
fn SegmentedControl(
    group_id: String,
    options: Vec<FilterOption>,
    store: RwSignal<Option<cathar_shared::MapStore>>,
) -> impl IntoView {
    view! {
        <div style="display: inline-flex; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; overflow: hidden;">
            {options
                .into_iter()
                .enumerate()
                .map(|(i, opt)| {
                    let active = opt.active;
                    let label = opt.label.clone();
                    let gid = group_id.clone();
                    let oid = opt.id.clone();
                    let border = if i == 0 { "" } else { "border-left: 1px solid #282c3e; " };
                    view! {
                        <button
                            style=format!(
                                "padding: 5px 14px; border: none; {}background: {}; color: {}; font-family: 'JetBrains Mono', monospace; font-size: 0.68rem; cursor: pointer;",
                                border,
                                if active { "rgba(245,197,66,0.12)" } else { "transparent" },
                                if active { "#f5c542" } else { "#7c829e" },
                            )
                            on:click=move |_| select(store, gid.clone(), oid.clone())
                        >
                            {label}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn CheckboxRow(
    group_id: String,
    option: FilterOption,
    store: RwSignal<Option<cathar_shared::MapStore>>,
) -> impl IntoView {
    let active = option.active;
    let label = option.label.clone();
    let gid = group_id;
    let oid = option.id.clone();

    view! {
        <div
            style="display: flex; align-items: center; justify-content: space-between; padding: 8px 10px; border-radius: 4px; cursor: pointer; transition: background 0.15s;"
            on:click=move |_| select(store, gid.clone(), oid.clone())
            on:mouseenter=|e| {
                if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                    el.style().set_property("background", "#232738").ok();
                }
            }
            on:mouseleave=|e| {
                if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                    el.style().set_property("background", "transparent").ok();
                }
            }
        >
            <span style="font-size: 0.85rem; color: #e2e0d8;">{label}</span>
            <span style=if active {
                "display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: #f5c542; box-shadow: 0 0 5px rgba(245,197,66,0.4); flex-shrink: 0;"
            } else {
                "display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: #3a3f5c; flex-shrink: 0;"
            } />
        </div>
    }
}
