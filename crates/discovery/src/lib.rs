#![deny(warnings)]

//! Discovery helpers: catalog search/filtering and related-race ranking.
//!
//! Every function here is a pure, single-pass transformation over the
//! in-memory catalog. Inputs are borrowed, outputs reference the input
//! slice, and relative catalog order is always preserved.

use catalog_core::{EraCategory, Race};
use std::collections::{BTreeSet, HashSet};

/// Maximum accepted search query length, in characters.
pub const MAX_QUERY_LEN: usize = 100;

/// Default number of related races returned by [`related_races`].
pub const DEFAULT_RELATED_RACES: usize = 3;

/// DLC-requirement facet applied after search and class filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DlcFilter {
    /// No DLC filtering.
    #[default]
    All,
    /// Only races playable without any DLC.
    BaseGame,
    /// Only races that require at least one DLC pack.
    DlcOnly,
}

impl DlcFilter {
    /// Look up a mode by its short label ("all", "base", "dlc").
    pub fn from_label(label: &str) -> Option<DlcFilter> {
        match label.trim().to_ascii_lowercase().as_str() {
            "all" => Some(DlcFilter::All),
            "base" => Some(DlcFilter::BaseGame),
            "dlc" => Some(DlcFilter::DlcOnly),
            _ => None,
        }
    }
}

/// Sanitize a raw search query: trim surrounding whitespace and cap the
/// length at [`MAX_QUERY_LEN`] characters. Never fails; whitespace-only
/// input sanitizes to the empty string, which downstream filters treat as
/// "no search".
///
/// Example:
/// assert_eq!(sanitize_query("  senna  "), "senna");
pub fn sanitize_query(raw: &str) -> String {
    let trimmed = raw.trim();
    let capped = match trimmed.char_indices().nth(MAX_QUERY_LEN) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    };
    // Truncation can expose trailing whitespace; trim again so the result
    // is a fixed point of this function.
    capped.trim_end().to_string()
}

/// Collect the distinct vehicle class names present in `races`, in
/// ascending lexicographic order. Blank class names are skipped.
pub fn available_classes(races: &[Race]) -> Vec<String> {
    let mut classes: BTreeSet<&str> = BTreeSet::new();
    for race in races {
        let name = race.setup.vehicle_class_name.as_str();
        if !name.trim().is_empty() {
            classes.insert(name);
        }
    }
    classes.into_iter().map(str::to_string).collect()
}

/// True iff the race requires at least one DLC pack.
pub fn has_dlc_requirement(race: &Race) -> bool {
    race.setup
        .required_dlc
        .as_ref()
        .is_some_and(|dlc| !dlc.is_empty())
}

/// Filter the catalog by free-text query, active class facets, and DLC
/// requirement, in that order. Each pass narrows the previous one (AND
/// between passes); within the search pass the query matches driver
/// (case-insensitive), year (case-sensitive, years are digits), or vehicle
/// class (case-insensitive), OR across the three fields. Class facets are
/// OR across the selected classes. Relative catalog order is preserved and
/// an empty result is not an error.
pub fn filter_races<'a>(
    races: &'a [Race],
    query: &str,
    active_classes: &HashSet<String>,
    dlc: DlcFilter,
) -> Vec<&'a Race> {
    let mut results: Vec<&Race> = races.iter().collect();

    let query = sanitize_query(query);
    if !query.is_empty() {
        let needle = query.to_lowercase();
        results.retain(|race| {
            race.driver.to_lowercase().contains(&needle)
                || race.year.contains(query.as_str())
                || race.setup.vehicle_class_name.to_lowercase().contains(&needle)
        });
    }

    if !active_classes.is_empty() {
        results.retain(|race| active_classes.contains(&race.setup.vehicle_class_name));
    }

    match dlc {
        DlcFilter::All => {}
        DlcFilter::BaseGame => results.retain(|race| !has_dlc_requirement(race)),
        DlcFilter::DlcOnly => results.retain(|race| has_dlc_requirement(race)),
    }

    results
}

/// Filter the catalog down to one era category. `All` passes every race
/// through unchanged. Otherwise a race is included exactly once if any of
/// its tags appears in the category's tag list (case-sensitive exact
/// match); untagged races are skipped regardless of category.
pub fn filter_by_era<'a>(races: &'a [Race], category: EraCategory) -> Vec<&'a Race> {
    if category == EraCategory::All {
        return races.iter().collect();
    }
    let wanted = category.matching_tags();
    races
        .iter()
        .filter(|race| {
            !race.tags.is_empty()
                && race.tags.iter().any(|tag| wanted.contains(&tag.as_str()))
        })
        .collect()
}

/// Defensively sanitize an untyped DLC list coming from editable data.
/// Keeps only array elements that are strings with non-empty trimmed
/// content; returns `None` for non-arrays or when nothing survives.
pub fn sanitize_dlc_list(value: &serde_json::Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    let cleaned: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Rank the catalog by tag overlap with `current` and return up to
/// `max_results` races, most similar first.
///
/// A candidate's score is the number of distinct tags it shares with the
/// current race (a tag repeated in the candidate's own list counts once);
/// candidates sharing no tags are excluded, as is the current race itself
/// (matched by id, so `current` need not be an element of `all_races`).
/// The sort is stable: equal scores keep catalog relative order. Tag
/// comparison is case-sensitive exact equality.
pub fn related_races<'a>(
    current: &Race,
    all_races: &'a [Race],
    max_results: usize,
) -> Vec<&'a Race> {
    if current.tags.is_empty() {
        return Vec::new();
    }
    let current_tags: HashSet<&str> = current.tags.iter().map(String::as_str).collect();

    let mut scored: Vec<(usize, &Race)> = Vec::new();
    for candidate in all_races {
        if candidate.id == current.id {
            continue;
        }
        if candidate.tags.is_empty() {
            continue;
        }
        let shared: HashSet<&str> = candidate
            .tags
            .iter()
            .map(String::as_str)
            .filter(|tag| current_tags.contains(tag))
            .collect();
        if !shared.is_empty() {
            scored.push((shared.len(), candidate));
        }
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(max_results)
        .map(|(_, race)| race)
        .collect()
}
