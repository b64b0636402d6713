use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use cathar_shared::{MapStore, Site};

const FETCH_ATTEMPTS: u32 = 3;
const RETRY_BASE_MS: u32 = 1_500;

/// Fetch the site dataset and construct the store from it. Retries a couple
/// of times with a growing delay before surfacing the error.
pub fn load_sites(store: RwSignal<Option<MapStore>>, load_error: RwSignal<Option<String>>) {
    spawn_local(async move {
        let mut last_error = String::new();
        for attempt in 0..FETCH_ATTEMPTS {
            if attempt > 0 {
                gloo_timers::future::TimeoutFuture::new(RETRY_BASE_MS * attempt).await;
            }
            match fetch_sites().await {
                Ok(sites) => {
                    store.set(Some(crate::app::store_for_dataset(sites)));
                    return;
                }
                Err(e) => last_error = e,
            }
        }
        load_error.set(Some(last_error));
    });
}

async fn fetch_sites() -> Result<Vec<Site>, String> {
    let resp = gloo_net::http::Request::get("/api/sites")
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<Vec<Site>>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}
