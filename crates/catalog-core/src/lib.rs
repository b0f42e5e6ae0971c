#![deny(warnings)]

//! Core domain models and invariants for the race catalog.
//!
//! This crate defines the serializable records that make up the curated
//! catalog (races, championships, setup blocks) together with validation
//! helpers that guarantee basic invariants at load time.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Livery pack reference attached to a race or championship.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveryPack {
    /// Pack display name.
    pub name: String,
    /// Pack author handle.
    pub author: String,
    /// Download page URL.
    pub url: String,
    /// Download count, when the source reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    /// Community rating, when the source reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// A single podium entry of the historical result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodiumResult {
    /// Finishing position (1-based).
    pub position: u32,
    pub driver: String,
    pub team: String,
    pub vehicle: String,
}

/// Narrative context around the historical race being recreated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceContext {
    /// Event name, e.g. "1993 European Grand Prix".
    pub event: String,
    pub circuit: String,
    /// Lap count of the original race.
    pub laps: u32,
    /// Human-readable race distance, e.g. "305.5 km".
    pub distance: String,
    /// Track/weather conditions summary.
    pub conditions: String,
    pub wikipedia_url: String,
    pub podium_results: Vec<PodiumResult>,
    pub key_moments: Vec<String>,
    /// Why this race matters historically.
    pub significance: String,
}

/// One slot of the ordered in-simulator weather program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSlot {
    /// Slot index (1-based, as the simulator numbers them).
    pub slot: u32,
    pub weather_id: u32,
    pub weather_name: String,
}

/// AI opponent distribution entry for multi-class grids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiClassDistribution {
    pub vehicle_class_id: u32,
    pub vehicle_class_name: String,
    /// Number of AI entries of this class.
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// In-simulator setup block with the identifiers needed to recreate the race.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSetup {
    pub track_id: u32,
    pub track_name: String,
    pub vehicle_class_id: u32,
    /// Equipment category, e.g. "F-Hitech_Gen2". Used as a filter facet.
    pub vehicle_class_name: String,
    pub vehicle_id: u32,
    pub vehicle_name: String,
    /// In-game session date, ISO `YYYY-MM-DD`. Kept as a string; validated
    /// to parse at load time.
    pub date: String,
    /// In-game session start time, `HH:MM`.
    pub time: String,
    /// AI opponent count.
    pub ai_count: u32,
    /// Race length, e.g. "20 laps" or "45 minutes".
    pub race_length: String,
    /// Ordered weather program.
    pub weather: Vec<WeatherSlot>,
    /// DLC packs the session requires, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_dlc: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_class: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_distribution: Option<Vec<AiClassDistribution>>,
}

/// An immutable catalog record describing one curated race recreation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    /// Unique key across the whole catalog.
    pub id: String,
    pub title: String,
    /// Featured driver, matched case-insensitively by free-text search.
    pub driver: String,
    pub team: String,
    /// Season year as a string, e.g. "1993". Not a parsed date.
    pub year: String,
    /// Free-form category labels, e.g. "F1", "Historic". Matched by exact
    /// string equality in era filtering and relatedness scoring.
    pub tags: Vec<String>,
    pub description: String,
    pub hero_image: String,
    /// CSS-style framing hint, e.g. "center center" or "60% 40%".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_offset_x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_offset_y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_scale: Option<f32>,
    pub youtube_id: String,
    pub race_context: RaceContext,
    pub setup: RaceSetup,
    /// Gallery visibility. Absent means shown; `Some(false)` hides the race
    /// from the gallery (championship-only entries).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_in_gallery: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livery_pack: Option<LiveryPack>,
}

impl Race {
    /// Whether the race should appear in the main gallery.
    pub fn in_gallery(&self) -> bool {
        self.show_in_gallery != Some(false)
    }
}

/// A curated ordered list of race ids with presentation metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Championship {
    /// Unique key across all championships.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ordered member races. Every id should resolve to a catalog race;
    /// dangling ids are tolerated at read time and omitted on resolution.
    pub race_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livery_pack: Option<LiveryPack>,
}

/// Fixed era groupings offered by the gallery, each backed by the list of
/// tags it matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EraCategory {
    All,
    #[serde(rename = "Formula 1")]
    FormulaOne,
    Endurance,
    Modern,
    Historic,
    Brazil,
}

impl EraCategory {
    /// Every category, in display order.
    pub const ALL: [EraCategory; 6] = [
        EraCategory::All,
        EraCategory::FormulaOne,
        EraCategory::Endurance,
        EraCategory::Modern,
        EraCategory::Historic,
        EraCategory::Brazil,
    ];

    /// Tags the category matches. `All` maps to an empty list, meaning no
    /// filtering. Matching is case-sensitive exact equality.
    pub fn matching_tags(self) -> &'static [&'static str] {
        match self {
            EraCategory::All => &[],
            EraCategory::FormulaOne => &["F1"],
            EraCategory::Endurance => &["Endurance", "Group C", "GT1", "LMDh"],
            EraCategory::Modern => &["Modern", "GT3", "V8"],
            EraCategory::Historic => &["Historic", "Vintage", "Group A"],
            EraCategory::Brazil => &["Brazil", "Stock Car", "Copa Truck"],
        }
    }

    /// Display label, e.g. "Formula 1".
    pub fn label(self) -> &'static str {
        match self {
            EraCategory::All => "All",
            EraCategory::FormulaOne => "Formula 1",
            EraCategory::Endurance => "Endurance",
            EraCategory::Modern => "Modern",
            EraCategory::Historic => "Historic",
            EraCategory::Brazil => "Brazil",
        }
    }

    /// Look up a category by display label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<EraCategory> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for EraCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation errors for catalog invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    #[error("race {id}: field `{field}` must not be empty")]
    EmptyField { id: String, field: &'static str },
    /// A race id occurs more than once in the catalog.
    #[error("duplicate race id: {0}")]
    DuplicateRaceId(String),
    /// A championship id occurs more than once.
    #[error("duplicate championship id: {0}")]
    DuplicateChampionshipId(String),
    /// A championship is missing its id or title.
    #[error("championship {id}: field `{field}` must not be empty")]
    EmptyChampionshipField { id: String, field: &'static str },
    /// Setup date string does not parse as `YYYY-MM-DD`.
    #[error("race {id}: setup date `{value}` is not a valid YYYY-MM-DD date")]
    InvalidSetupDate { id: String, value: String },
    /// Setup time string does not parse as `HH:MM`.
    #[error("race {id}: setup time `{value}` is not a valid HH:MM time")]
    InvalidSetupTime { id: String, value: String },
}

fn require_text(id: &str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}

/// Validate a single race record.
pub fn validate_race(race: &Race) -> Result<(), ValidationError> {
    if race.id.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            id: String::new(),
            field: "id",
        });
    }
    require_text(&race.id, "title", &race.title)?;
    require_text(&race.id, "driver", &race.driver)?;
    require_text(&race.id, "year", &race.year)?;
    if NaiveDate::parse_from_str(&race.setup.date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::InvalidSetupDate {
            id: race.id.clone(),
            value: race.setup.date.clone(),
        });
    }
    if NaiveTime::parse_from_str(&race.setup.time, "%H:%M").is_err() {
        return Err(ValidationError::InvalidSetupTime {
            id: race.id.clone(),
            value: race.setup.time.clone(),
        });
    }
    Ok(())
}

/// Validate a single championship record.
pub fn validate_championship(ch: &Championship) -> Result<(), ValidationError> {
    if ch.id.trim().is_empty() {
        return Err(ValidationError::EmptyChampionshipField {
            id: String::new(),
            field: "id",
        });
    }
    if ch.title.trim().is_empty() {
        return Err(ValidationError::EmptyChampionshipField {
            id: ch.id.clone(),
            field: "title",
        });
    }
    Ok(())
}

/// Validate the whole catalog, including id uniqueness across records.
///
/// Dangling championship race ids are deliberately NOT an error here; they
/// are tolerated at read time and surfaced by the loader as warnings.
pub fn validate_catalog(
    races: &[Race],
    championships: &[Championship],
) -> Result<(), ValidationError> {
    let mut race_ids: BTreeSet<&str> = BTreeSet::new();
    for race in races {
        validate_race(race)?;
        if !race_ids.insert(&race.id) {
            return Err(ValidationError::DuplicateRaceId(race.id.clone()));
        }
    }
    let mut champ_ids: BTreeSet<&str> = BTreeSet::new();
    for ch in championships {
        validate_championship(ch)?;
        if !champ_ids.insert(&ch.id) {
            return Err(ValidationError::DuplicateChampionshipId(ch.id.clone()));
        }
    }
    Ok(())
}
