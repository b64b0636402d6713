use std::fmt;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use cathar_shared::Site;
use cathar_shared::etag::weak_etag;

/// Shared server state: the site dataset, parsed once at boot and kept
/// pre-serialized so `/api/sites` never re-serializes per request.
#[derive(Clone)]
pub struct AppState {
    pub sites: Arc<[Site]>,
    pub sites_json: Bytes,
    pub sites_etag: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "failed to read dataset: {e}"),
            DatasetError::Parse(e) => write!(f, "failed to parse dataset: {e}"),
        }
    }
}

impl std::error::Error for DatasetError {}

impl AppState {
    pub fn from_sites(sites: Vec<Site>) -> Self {
        let sites_json = serde_json::to_vec(&sites)
            .map(Bytes::from)
            .unwrap_or_else(|_| Bytes::from_static(b"[]"));
        let sites_etag = weak_etag(&sites_json);
        Self {
            sites: Arc::from(sites),
            sites_json,
            sites_etag,
            loaded_at: Utc::now(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read(path).map_err(DatasetError::Io)?;
        let sites: Vec<Site> = serde_json::from_slice(&raw).map_err(DatasetError::Parse)?;
        Ok(Self::from_sites(sites))
    }

    pub fn geo_count(&self) -> usize {
        self.sites.iter().filter(|s| s.has_geo()).count()
    }

    /// `Last-Modified` value for the dataset payload.
    pub fn last_modified(&self) -> String {
        self.loaded_at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;

    #[test]
    fn from_sites_preserializes_and_tags() {
        let sites = serde_json::from_str(
            r#"[
                { "name": "Béziers", "geo": { "lat": 43.34, "lon": 3.21 }, "period1": true },
                { "name": "Fragment" }
            ]"#,
        )
        .expect("sites json");
        let state = AppState::from_sites(sites);

        assert_eq!(state.sites.len(), 2);
        assert_eq!(state.geo_count(), 1);
        assert!(state.sites_etag.starts_with("W/\""));

        let roundtrip: Vec<cathar_shared::Site> =
            serde_json::from_slice(&state.sites_json).expect("payload parses back");
        assert_eq!(roundtrip.len(), 2);
    }

    #[test]
    fn last_modified_is_http_date_shaped() {
        let state = AppState::from_sites(Vec::new());
        let value = state.last_modified();
        assert!(value.ends_with(" GMT"));
        assert_eq!(value.split(' ').count(), 6);
    }
}
