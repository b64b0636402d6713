use serde::{Deserialize, Serialize};

use crate::site::Site;

/// Radio group selecting how active period buckets compose.
pub const PERIOD_MODE_GROUP: &str = "period-mode";
/// Checkbox group selecting which period buckets count.
pub const PERIOD_TIME_GROUP: &str = "period-time";

pub const MODE_OR: &str = "or";
pub const MODE_AND: &str = "and";
pub const NO_DATA_OPTION: &str = "nodata";

/// Time bucket a site may belong to. `NoData` is the catch-all for records
/// without period information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodBucket {
    NoData,
    Until1209,
    P1210To1219,
    P1220To1229,
    P1230To1244,
}

impl PeriodBucket {
    pub fn matches(self, site: &Site) -> bool {
        match self {
            PeriodBucket::NoData => site.no_data,
            PeriodBucket::Until1209 => site.until_1209,
            PeriodBucket::P1210To1219 => site.p1210_1219,
            PeriodBucket::P1220To1229 => site.p1220_1229,
            PeriodBucket::P1230To1244 => site.p1230_1244,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Options are mutually exclusive; selecting one deactivates the rest.
    Radio,
    /// Options toggle independently.
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
    pub active: bool,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<PeriodBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: String,
    pub label: String,
    pub kind: FilterKind,
    pub options: Vec<FilterOption>,
}

fn option(id: &str, label: &str, active: bool, bucket: Option<PeriodBucket>) -> FilterOption {
    FilterOption {
        id: id.into(),
        label: label.into(),
        active,
        bucket,
    }
}

/// The fixed default configuration: OR/AND mode radio (OR active) and the
/// five period checkboxes (all active).
pub fn default_filters() -> Vec<FilterGroup> {
    vec![
        FilterGroup {
            id: PERIOD_MODE_GROUP.into(),
            label: "Period – mode".into(),
            kind: FilterKind::Radio,
            options: vec![
                option(MODE_OR, "OR", true, None),
                option(MODE_AND, "AND", false, None),
            ],
        },
        FilterGroup {
            id: PERIOD_TIME_GROUP.into(),
            label: "Periods".into(),
            kind: FilterKind::Checkbox,
            options: vec![
                option("until 1209", "until 1209", true, Some(PeriodBucket::Until1209)),
                option("1210–1219", "1210–1219", true, Some(PeriodBucket::P1210To1219)),
                option("1220–1229", "1220–1229", true, Some(PeriodBucket::P1220To1229)),
                option("1230–1244", "1230–1244", true, Some(PeriodBucket::P1230To1244)),
                option(NO_DATA_OPTION, "no data", true, Some(PeriodBucket::NoData)),
            ],
        },
    ]
}

/// Whether `site` is active under the current filter configuration.
///
/// With no active period option the site is inactive regardless of anything
/// else (nothing selected shows nothing). Otherwise OR mode requires any
/// active bucket to match, AND mode requires all of them to.
pub fn is_active(groups: &[FilterGroup], site: &Site) -> bool {
    let use_or = groups
        .iter()
        .find(|g| g.id == PERIOD_MODE_GROUP)
        .and_then(|g| g.options.iter().find(|o| o.id == MODE_OR))
        .is_some_and(|o| o.active);

    let Some(time_group) = groups.iter().find(|g| g.id == PERIOD_TIME_GROUP) else {
        return false;
    };
    let active_buckets: Vec<PeriodBucket> = time_group
        .options
        .iter()
        .filter(|o| o.active)
        .filter_map(|o| o.bucket)
        .collect();
    if active_buckets.is_empty() {
        return false;
    }

    if use_or {
        active_buckets.iter().any(|b| b.matches(site))
    } else {
        active_buckets.iter().all(|b| b.matches(site))
    }
}

/// Build the replacement configuration after selecting `option_id` inside
/// `group_id`. The input is never mutated; callers swap the result in
/// wholesale.
///
/// Unknown group or option ids leave the configuration unchanged. Selecting
/// the `and` mode additionally deactivates the time group's `nodata`
/// option, so AND composition cannot be satisfied vacuously by records
/// lacking period data.
pub fn select_option(groups: &[FilterGroup], group_id: &str, option_id: &str) -> Vec<FilterGroup> {
    let mut next = groups.to_vec();

    if let Some(group) = next.iter_mut().find(|g| g.id == group_id)
        && let Some(idx) = group.options.iter().position(|o| o.id == option_id)
    {
        match group.kind {
            FilterKind::Checkbox => {
                let opt = &mut group.options[idx];
                opt.active = !opt.active;
            }
            FilterKind::Radio => {
                for opt in group.options.iter_mut() {
                    opt.active = false;
                }
                group.options[idx].active = true;
            }
        }
    }

    // Switching to AND clears "no data": a site without period tags can
    // never satisfy every selected period. Keyed on the option id alone.
    if option_id == MODE_AND
        && let Some(time_group) = next.iter_mut().find(|g| g.id == PERIOD_TIME_GROUP)
        && let Some(no_data) = time_group.options.iter_mut().find(|o| o.id == NO_DATA_OPTION)
    {
        no_data.active = false;
    }

    next
}
