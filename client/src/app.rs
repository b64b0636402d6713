use leptos::prelude::*;
use std::cell::RefCell;
use std::sync::Arc;
use wasm_bindgen::JsCast;

use cathar_shared::{FilterGroup, MapStore, Site};
use gloo_storage::Storage;

use crate::canvas::MapCanvas;
use crate::panel::{FilterPanel, PanelToggle};
use crate::welcome::{WelcomeButton, WelcomeDialog};

pub(crate) const PANEL_WIDTH: f64 = 320.0;

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

/// The single reactive observable holding the map store. `None` until the
/// dataset has been fetched and the store constructed with it.
#[derive(Clone, Copy)]
pub(crate) struct Store(pub RwSignal<Option<MapStore>>);

#[derive(Clone, Copy)]
pub(crate) struct LoadError(pub RwSignal<Option<String>>);

/// Site under the cursor, if any. The record itself is kept so two sites
/// sharing a name can never alias.
#[derive(Clone, Copy)]
pub(crate) struct Hovered(pub RwSignal<Option<Site>>);

/// Derived projections of the store, recomputed whenever it mutates.
#[derive(Clone, Copy)]
pub(crate) struct ActiveSites(pub Memo<Vec<Site>>);
#[derive(Clone, Copy)]
pub(crate) struct InactiveSites(pub Memo<Vec<Site>>);
#[derive(Clone, Copy)]
pub(crate) struct Filters(pub Memo<Vec<FilterGroup>>);
#[derive(Clone, Copy)]
pub(crate) struct PanelVisible(pub Memo<bool>);
#[derive(Clone, Copy)]
pub(crate) struct WelcomeVisible(pub Memo<bool>);

const SETTINGS_KEY: &str = "cathar_settings";

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub panel_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { panel_open: true }
    }
}

pub(crate) fn load_settings() -> Settings {
    gloo_storage::LocalStorage::get(SETTINGS_KEY).unwrap_or_default()
}

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

/// Root application component. Provides the store and its projections via context.
#[component]
pub fn App() -> impl IntoView {
    let store: RwSignal<Option<MapStore>> = RwSignal::new(None);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let hovered: RwSignal<Option<Site>> = RwSignal::new(None);

    let active = Memo::new(move |_| {
        store.with(|s| {
            s.as_ref()
                .map(|s| s.active().into_iter().cloned().collect::<Vec<Site>>())
                .unwrap_or_default()
        })
    });
    let inactive = Memo::new(move |_| {
        store.with(|s| {
            s.as_ref()
                .map(|s| s.inactive().into_iter().cloned().collect::<Vec<Site>>())
                .unwrap_or_default()
        })
    });
    let filters = Memo::new(move |_| {
        store.with(|s| s.as_ref().map(|s| s.filters()).unwrap_or_default())
    });
    let panel_visible = Memo::new(move |_| {
        store.with(|s| s.as_ref().is_none_or(|s| s.panel_visible()))
    });
    let welcome_visible = Memo::new(move |_| {
        store.with(|s| s.as_ref().is_some_and(|s| s.welcome_visible()))
    });

    provide_context(Store(store));
    provide_context(LoadError(load_error));
    provide_context(Hovered(hovered));
    provide_context(ActiveSites(active));
    provide_context(InactiveSites(inactive));
    provide_context(Filters(filters));
    provide_context(PanelVisible(panel_visible));
    provide_context(WelcomeVisible(welcome_visible));

    // Fetch the dataset and construct the store once it arrives.
    Effect::new(move || {
        crate::data::load_sites(store, load_error);
    });

    // Persist the panel preference to localStorage on any change.
    Effect::new(move || {
        if store.with(|s| s.is_none()) {
            return;
        }
        let settings = Settings {
            panel_open: panel_visible.get(),
        };
        let _ = gloo_storage::LocalStorage::set(SETTINGS_KEY, &settings);
    });

    // Global keyboard shortcuts.
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                match e.key().as_str() {
                    "Escape" => {
                        store.update(|s| {
                            if let Some(s) = s {
                                s.close_welcome();
                            }
                        });
                    }
                    "p" => {
                        store.update(|s| {
                            if let Some(s) = s {
                                s.toggle_panel();
                            }
                        });
                    }
                    "?" => {
                        store.update(|s| {
                            if let Some(s) = s {
                                s.open_welcome();
                            }
                        });
                    }
                    _ => {}
                }
            });

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative; overflow: hidden; background: #0c0e17;">
            {move || {
                if store.with(|s| s.is_some()) {
                    view! { <MapCanvas /> }.into_any()
                } else {
                    view! { <LoadingShell /> }.into_any()
                }
            }}
            <div
                class="panel-wrapper"
                style:width=format!("{PANEL_WIDTH}px")
                style="position: absolute; top: 0; right: 0; height: 100%; z-index: 10; transition: transform 0.2s ease;"
                style:transform=move || if panel_visible.get() { "translateX(0)" } else { "translateX(100%)" }
                style:pointer-events=move || if panel_visible.get() { "auto" } else { "none" }
            >
                <PanelToggle />
                <FilterPanel />
            </div>
            <WelcomeButton />
            <WelcomeDialog />
        </div>
    }
}

/// Placeholder shown until the dataset has loaded (or failed to).
#[component]
fn LoadingShell() -> impl IntoView {
    let LoadError(load_error) = expect_context();

    view! {
        <div style="width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; flex-direction: column; gap: 10px; color: #9a9590; font-family: 'Inter', system-ui, sans-serif;">
            {move || match load_error.get() {
                Some(err) => view! {
                    <span style="color: #d06050; font-size: 0.9rem;">"Failed to load the site dataset"</span>
                    <span style="font-size: 0.72rem; color: #5a5860; font-family: 'JetBrains Mono', monospace;">{err}</span>
                }.into_any(),
                None => view! {
                    <span style="font-size: 0.9rem;">"Loading sites\u{2026}"</span>
                }.into_any(),
            }}
        </div>
    }
}

/// Construct the store for a freshly fetched dataset, honoring the saved
/// panel preference. The store itself always starts with both visibility
/// flags on.
pub(crate) fn store_for_dataset(sites: Vec<Site>) -> MapStore {
    let mut store = MapStore::new(Arc::from(sites));
    if !load_settings().panel_open {
        store.toggle_panel();
    }
    store
}
