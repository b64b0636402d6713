pub mod etag;
pub mod filter;
pub mod site;
pub mod store;

pub use filter::{FilterGroup, FilterKind, FilterOption, PeriodBucket, default_filters};
pub use site::{GeoPoint, Site};
pub use store::{MapStore, MapView};
