use leptos::prelude::*;

use crate::app::{Store, WelcomeVisible};

/// Floating help button in the bottom-left corner. Reopens the welcome
/// dialog after it has been dismissed.
#[component]
pub fn WelcomeButton() -> impl IntoView {
    let Store(store) = expect_context();
    let WelcomeVisible(welcome_visible) = expect_context();

    let on_click = move |_| {
        store.update(|s| {
            if let Some(s) = s {
                s.open_welcome();
            }
        });
    };

    view! {
        <button
            on:click=on_click
            title="About this map (?)"
            style="position: absolute; bottom: 14px; left: 14px; z-index: 10; width: 34px; height: 34px; background: #12141f; border: 1px solid #282c3e; border-radius: 50%; color: #9a9590; font-family: 'JetBrains Mono', monospace; font-size: 0.9rem; cursor: pointer;"
            style:display=move || if welcome_visible.get() { "none" } else { "block" }
        >
            "?"
        </button>
    }
}

/// Welcome overlay shown on first load. Dismissed by the close button, a
/// click on the backdrop, or Escape.
#[component]
pub fn WelcomeDialog() -> impl IntoView {
    let Store(store) = expect_context();
    let WelcomeVisible(welcome_visible) = expect_context();

    let close = move || {
        store.update(|s| {
            if let Some(s) = s {
                s.close_welcome();
            }
        });
    };

    view! {
        <div
            style="position: absolute; inset: 0; z-index: 20; display: flex; align-items: center; justify-content: center; background: rgba(6, 8, 14, 0.65);"
            style:display=move || if welcome_visible.get() { "flex" } else { "none" }
            on:click=move |_| close()
        >
            <div
                style="width: min(440px, calc(100% - 40px)); background: #12141f; border: 1px solid #282c3e; border-radius: 8px; padding: 22px 24px; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif;"
                on:click=|e| e.stop_propagation()
            >
                <div style="display: flex; align-items: baseline; justify-content: space-between; margin-bottom: 10px;">
                    <span style="font-size: 1.05rem; font-weight: 600;">"Cathar Country"</span>
                    <button
                        on:click=move |_| close()
                        style="background: transparent; border: none; color: #7c829e; font-family: 'JetBrains Mono', monospace; font-size: 1rem; cursor: pointer;"
                    >
                        "\u{2715}"
                    </button>
                </div>
                <p style="font-size: 0.85rem; line-height: 1.5; color: #b8b5ac; margin: 0 0 10px;">
                    "A map of sites tied to Catharism and the Albigensian Crusade "
                    "(1209\u{2013}1244) across the Languedoc: castles, towns, and "
                    "places of siege or refuge."
                </p>
                <p style="font-size: 0.8rem; line-height: 1.5; color: #9a9590; margin: 0 0 14px;">
                    "Use the filter panel to narrow sites by period. \"OR\" shows "
                    "sites matching any selected period, \"AND\" only those "
                    "matching all of them. Drag to pan, scroll to zoom."
                </p>
                <div style="font-family: 'JetBrains Mono', monospace; font-size: 0.64rem; color: #5a5f78;">
                    "P toggle panel \u{00b7} ? reopen this dialog \u{00b7} Esc close"
                </div>
            </div>
        </div>
    }
}
