#![deny(warnings)]

//! Headless CLI for loading the race catalog and exercising discovery and
//! progression queries against it.

use anyhow::{Context, Result};
use catalog_core::EraCategory;
use discovery::DlcFilter;
use progression::UserProgress;
use std::collections::HashSet;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Args {
    catalog: Option<String>,
    query: Option<String>,
    classes: Vec<String>,
    era: Option<String>,
    dlc: Option<String>,
    related: Option<String>,
    profile: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--catalog" => args.catalog = it.next(),
            "--query" => args.query = it.next(),
            "--class" => {
                if let Some(class) = it.next() {
                    args.classes.push(class);
                }
            }
            "--era" => args.era = it.next(),
            "--dlc" => args.dlc = it.next(),
            "--related" => args.related = it.next(),
            "--profile" => args.profile = it.next(),
            _ => {}
        }
    }
    args
}

fn print_races(races: &[&catalog_core::Race]) {
    for race in races {
        println!(
            "  {} | {} | {} | {}",
            race.id, race.year, race.driver, race.setup.vehicle_class_name
        );
    }
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    let catalog_dir = args.catalog.as_deref().unwrap_or("assets/catalog");
    info!(catalog_dir, "starting CLI");

    let catalog = catalog_data::load_catalog(catalog_dir)
        .with_context(|| format!("loading catalog from {catalog_dir}"))?;

    println!(
        "Catalog OK | races: {} | gallery: {} | championships: {} | classes: {}",
        catalog.races().len(),
        catalog.gallery_races().len(),
        catalog.championships().len(),
        catalog.vehicle_classes().len()
    );

    if let Some(era_label) = &args.era {
        let era = match EraCategory::from_label(era_label) {
            Some(era) => era,
            None => {
                warn!(label = %era_label, "unknown era category, showing all");
                EraCategory::All
            }
        };
        let hits = discovery::filter_by_era(catalog.races(), era);
        println!("Era {} | matches: {}", era, hits.len());
        print_races(&hits);
    }

    if args.query.is_some() || !args.classes.is_empty() || args.dlc.is_some() {
        let dlc = args
            .dlc
            .as_deref()
            .and_then(DlcFilter::from_label)
            .unwrap_or_default();
        let active_classes: HashSet<String> = args.classes.iter().cloned().collect();
        let query = args.query.as_deref().unwrap_or("");
        let hits = discovery::filter_races(catalog.races(), query, &active_classes, dlc);
        println!(
            "Filter | query: {:?} | classes: {} | dlc: {:?} | matches: {}",
            discovery::sanitize_query(query),
            active_classes.len(),
            dlc,
            hits.len()
        );
        print_races(&hits);
    }

    if let Some(race_id) = &args.related {
        let current = catalog
            .race_by_id(race_id)
            .with_context(|| format!("no race with id {race_id}"))?;
        let related =
            discovery::related_races(current, catalog.races(), discovery::DEFAULT_RELATED_RACES);
        println!("Related to {} | matches: {}", current.id, related.len());
        print_races(&related);
    }

    if let Some(profile_path) = &args.profile {
        let text = std::fs::read_to_string(profile_path)
            .with_context(|| format!("reading profile {profile_path}"))?;
        let doc: serde_json::Value =
            serde_json::from_str(&text).with_context(|| format!("parsing {profile_path}"))?;
        let progress = UserProgress::from_document(&doc);
        println!(
            "Profile | XP: {} | races done: {} | championships done: {}",
            progress.experience_points,
            progress.completed_races.len(),
            progress.completed_championships.len()
        );
        for ch in catalog.championships() {
            let p = progression::championship_progress(ch, &progress.completed_races);
            let done = progression::is_championship_completed(ch, &progress.completed_races);
            println!(
                "  {} | {}/{} races | {}%{}",
                ch.id,
                p.completed,
                p.total,
                p.percentage,
                if done { " | complete" } else { "" }
            );
        }
    }

    Ok(())
}
