use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::{self, FilterGroup, default_filters};
use crate::site::Site;

/// Default view over the Languedoc.
pub const DEFAULT_CENTER: [f64; 2] = [43.2, 2.0];
pub const DEFAULT_ZOOM: f64 = 9.0;

/// The map's visible region: center (lat, lon), zoom level, and bounding
/// extent. The extent is `[min_x, min_y, max_x, max_y]` once the map has
/// reported a move, empty before that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: f64,
    #[serde(default)]
    pub extent: Vec<f64>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            extent: Vec::new(),
        }
    }
}

/// State container backing the map UI: viewport, welcome/panel visibility,
/// and the filter configuration deriving the active/inactive partition of
/// the dataset.
///
/// The dataset is injected at construction and never mutated; every query
/// recomputes from current state, every action executes synchronously to
/// completion. All actions are total: unknown identifiers are silently
/// ignored.
#[derive(Debug, Clone)]
pub struct MapStore {
    view: MapView,
    welcome: bool,
    panel: bool,
    filters: Vec<FilterGroup>,
    data: Arc<[Site]>,
}

impl MapStore {
    pub fn new(data: Arc<[Site]>) -> Self {
        Self {
            view: MapView::default(),
            welcome: true,
            panel: true,
            filters: default_filters(),
            data,
        }
    }

    pub fn view(&self) -> MapView {
        self.view.clone()
    }

    pub fn panel_visible(&self) -> bool {
        self.panel
    }

    pub fn welcome_visible(&self) -> bool {
        self.welcome
    }

    pub fn filters(&self) -> Vec<FilterGroup> {
        self.filters.clone()
    }

    /// The subsequence of the dataset that can be placed on the map.
    pub fn geo_data(&self) -> Vec<&Site> {
        self.data.iter().filter(|s| s.has_geo()).collect()
    }

    pub fn is_active(&self, site: &Site) -> bool {
        filter::is_active(&self.filters, site)
    }

    /// Geo-tagged sites matching the current filter selection.
    pub fn active(&self) -> Vec<&Site> {
        self.geo_data()
            .into_iter()
            .filter(|s| self.is_active(s))
            .collect()
    }

    /// Geo-tagged sites excluded by the current filter selection.
    pub fn inactive(&self) -> Vec<&Site> {
        self.geo_data()
            .into_iter()
            .filter(|s| !self.is_active(s))
            .collect()
    }

    /// Replace the viewport wholesale; center, zoom, and extent always
    /// change together.
    pub fn move_map(&mut self, center: [f64; 2], zoom: f64, extent: Vec<f64>) {
        self.view = MapView {
            center,
            zoom,
            extent,
        };
    }

    pub fn toggle_panel(&mut self) {
        self.panel = !self.panel;
    }

    pub fn open_welcome(&mut self) {
        self.welcome = true;
    }

    pub fn close_welcome(&mut self) {
        self.welcome = false;
    }

    /// Apply a filter selection and swap in the rebuilt configuration.
    pub fn select_filter_option(&mut self, group_id: &str, option_id: &str) {
        let next = filter::select_option(&self.filters, group_id, option_id);
        if tracing::enabled!(tracing::Level::DEBUG)
            && let Ok(json) = serde_json::to_string(&next)
        {
            tracing::debug!(group_id, option_id, filters = %json, "filter selection applied");
        }
        self.filters = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{MODE_AND, NO_DATA_OPTION, PERIOD_MODE_GROUP, PERIOD_TIME_GROUP};
    use crate::site::GeoPoint;

    fn dataset() -> Arc<[Site]> {
        let mk = |name: &str, geo: bool, flags: [bool; 5]| Site {
            name: name.into(),
            place: None,
            geo: geo.then_some(GeoPoint { lat: 43.0, lon: 2.0 }),
            no_data: flags[0],
            until_1209: flags[1],
            p1210_1219: flags[2],
            p1220_1229: flags[3],
            p1230_1244: flags[4],
        };
        Arc::from(vec![
            mk("early", true, [false, true, false, false, false]),
            mk("both", true, [false, true, true, false, false]),
            mk("undated", true, [true, false, false, false, false]),
            mk("unlocated", false, [false, true, false, false, false]),
        ])
    }

    fn names(sites: Vec<&Site>) -> Vec<&str> {
        sites.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn construction_defaults() {
        let store = MapStore::new(dataset());
        assert!(store.welcome_visible());
        assert!(store.panel_visible());
        assert_eq!(store.view(), MapView::default());
        assert_eq!(store.filters(), default_filters());
    }

    #[test]
    fn geo_partition_is_exact() {
        let store = MapStore::new(dataset());
        let geo = store.geo_data();
        assert_eq!(geo.len(), 3);

        // Every geo-tagged site lands in exactly one half; non-geo in neither.
        let active = names(store.active());
        let inactive = names(store.inactive());
        assert_eq!(active.len() + inactive.len(), geo.len());
        for site in &geo {
            assert_ne!(
                active.contains(&site.name.as_str()),
                inactive.contains(&site.name.as_str())
            );
        }
        assert!(!active.contains(&"unlocated") && !inactive.contains(&"unlocated"));
    }

    #[test]
    fn all_defaults_everything_geo_is_active() {
        let store = MapStore::new(dataset());
        assert_eq!(names(store.active()), vec!["early", "both", "undated"]);
        assert!(store.inactive().is_empty());
    }

    #[test]
    fn and_mode_narrows_and_drops_undated() {
        let mut store = MapStore::new(dataset());
        store.select_filter_option(PERIOD_MODE_GROUP, MODE_AND);
        for id in ["1220–1229", "1230–1244"] {
            store.select_filter_option(PERIOD_TIME_GROUP, id);
        }
        // Active buckets: until 1209 AND 1210–1219.
        assert_eq!(names(store.active()), vec!["both"]);
        assert_eq!(names(store.inactive()), vec!["early", "undated"]);
    }

    #[test]
    fn empty_selection_shows_nothing() {
        let mut store = MapStore::new(dataset());
        for id in [
            "until 1209",
            "1210–1219",
            "1220–1229",
            "1230–1244",
            NO_DATA_OPTION,
        ] {
            store.select_filter_option(PERIOD_TIME_GROUP, id);
        }
        assert!(store.active().is_empty());
        assert_eq!(store.inactive().len(), 3);
    }

    #[test]
    fn move_map_replaces_viewport_atomically() {
        let mut store = MapStore::new(dataset());
        store.move_map([10.0, 20.0], 5.0, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(
            store.view(),
            MapView {
                center: [10.0, 20.0],
                zoom: 5.0,
                extent: vec![0.0, 0.0, 1.0, 1.0],
            }
        );
    }

    #[test]
    fn toggle_panel_is_an_involution() {
        let mut store = MapStore::new(dataset());
        let before = store.panel_visible();
        store.toggle_panel();
        assert_eq!(store.panel_visible(), !before);
        store.toggle_panel();
        assert_eq!(store.panel_visible(), before);
    }

    #[test]
    fn welcome_actions_are_idempotent() {
        let mut store = MapStore::new(dataset());
        store.close_welcome();
        store.close_welcome();
        assert!(!store.welcome_visible());
        store.open_welcome();
        store.open_welcome();
        assert!(store.welcome_visible());
    }

    #[test]
    fn unknown_selection_leaves_filters_deep_equal() {
        let mut store = MapStore::new(dataset());
        let before = store.filters();
        store.select_filter_option("nope", "nope");
        assert_eq!(store.filters(), before);
    }

    #[test]
    fn dataset_reference_is_never_mutated() {
        let data = dataset();
        let mut store = MapStore::new(Arc::clone(&data));
        store.select_filter_option(PERIOD_MODE_GROUP, MODE_AND);
        store.move_map([0.0, 0.0], 1.0, vec![]);

        // Actions only touch filter/viewport state; the shared dataset and
        // the geo subsequence derived from it are unchanged.
        assert_eq!(data.len(), 4);
        assert!(data.iter().any(|s| s.name == "unlocated"));
        assert_eq!(names(store.geo_data()), vec!["early", "both", "undated"]);
    }
}
