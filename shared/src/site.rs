use serde::{Deserialize, Serialize};

/// One heritage site record from the dataset.
///
/// The period flags mirror the dataset's `period0..period4` keys: `period0`
/// marks "no data", the remaining four are time buckets of the Albigensian
/// Crusade (until 1209 through 1230–1244). A site may carry several flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Present iff the record can be placed on the map.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    #[serde(default, rename = "period0")]
    pub no_data: bool,
    #[serde(default, rename = "period1")]
    pub until_1209: bool,
    #[serde(default, rename = "period2")]
    pub p1210_1219: bool,
    #[serde(default, rename = "period3")]
    pub p1220_1229: bool,
    #[serde(default, rename = "period4")]
    pub p1230_1244: bool,
}

/// WGS84 coordinates, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl Site {
    pub fn has_geo(&self) -> bool {
        self.geo.is_some()
    }
}
