#![deny(warnings)]

//! Static catalog loading: reads the race and championship JSON files,
//! validates every record, and exposes read-only lookup accessors.
//!
//! The catalog is loaded once at startup and never mutated afterwards.
//! A malformed record anywhere in the data refuses the whole catalog;
//! dangling championship race references are tolerated (resolution omits
//! them) but logged as data-quality warnings.

use catalog_core::{validate_catalog, Championship, Race, ValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while loading the catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// The validated, immutable catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    races: Vec<Race>,
    championships: Vec<Championship>,
}

impl Catalog {
    /// Build a catalog from already-deserialized records, running full
    /// validation. Dangling championship references are warned about but
    /// admitted.
    pub fn new(
        races: Vec<Race>,
        championships: Vec<Championship>,
    ) -> Result<Catalog, ValidationError> {
        validate_catalog(&races, &championships)?;
        for ch in &championships {
            for race_id in &ch.race_ids {
                if !races.iter().any(|r| &r.id == race_id) {
                    warn!(
                        championship = %ch.id,
                        race_id = %race_id,
                        "championship references unknown race"
                    );
                }
            }
        }
        Ok(Catalog {
            races,
            championships,
        })
    }

    /// Every race, in catalog order.
    pub fn races(&self) -> &[Race] {
        &self.races
    }

    /// Races shown in the main gallery (skips championship-only entries).
    pub fn gallery_races(&self) -> Vec<&Race> {
        self.races.iter().filter(|r| r.in_gallery()).collect()
    }

    pub fn race_by_id(&self, id: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }

    pub fn races_by_class(&self, class_name: &str) -> Vec<&Race> {
        self.races
            .iter()
            .filter(|r| r.setup.vehicle_class_name == class_name)
            .collect()
    }

    /// Distinct vehicle class names across the whole catalog, sorted.
    pub fn vehicle_classes(&self) -> Vec<String> {
        discoverable_classes(&self.races)
    }

    /// Every championship, in catalog order.
    pub fn championships(&self) -> &[Championship] {
        &self.championships
    }

    pub fn championship_by_id(&self, id: &str) -> Option<&Championship> {
        self.championships.iter().find(|c| c.id == id)
    }

    /// Resolve a championship's member races in list order, omitting ids
    /// that do not exist in the catalog.
    pub fn championship_races(&self, championship: &Championship) -> Vec<&Race> {
        championship
            .race_ids
            .iter()
            .filter_map(|id| self.race_by_id(id))
            .collect()
    }
}

fn discoverable_classes(races: &[Race]) -> Vec<String> {
    let mut classes: Vec<String> = races
        .iter()
        .map(|r| r.setup.vehicle_class_name.clone())
        .filter(|c| !c.trim().is_empty())
        .collect();
    classes.sort();
    classes.dedup();
    classes
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate the catalog from a directory.
///
/// Expects `<dir>/races/*.json`, each file holding a JSON array of races,
/// concatenated in lexicographic filename order so the catalog order is
/// deterministic, plus an optional `<dir>/championships.json`.
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Result<Catalog, CatalogError> {
    let dir = dir.as_ref();
    let races_dir = dir.join("races");
    let entries = fs::read_dir(&races_dir).map_err(|source| CatalogError::Io {
        path: races_dir.clone(),
        source,
    })?;

    let mut race_files: Vec<PathBuf> = entries
        .filter_map(|ent| ent.ok())
        .map(|ent| ent.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    race_files.sort();

    let mut races: Vec<Race> = Vec::new();
    for path in &race_files {
        let batch: Vec<Race> = read_json(path)?;
        races.extend(batch);
    }

    let championships_path = dir.join("championships.json");
    let championships: Vec<Championship> = if championships_path.exists() {
        read_json(&championships_path)?
    } else {
        Vec::new()
    };

    info!(
        races = races.len(),
        championships = championships.len(),
        files = race_files.len(),
        "catalog loaded"
    );
    Ok(Catalog::new(races, championships)?)
}
