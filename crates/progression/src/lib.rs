#![deny(warnings)]

//! Progression bookkeeping: championship completion, progress percentages,
//! and the experience-point policy.
//!
//! Everything here is a pure computation over a snapshot of the user's
//! progress state. Persisting the results (atomic increments, array
//! union/remove on the profile document) is the account store's job; this
//! crate only decides *what* should change and derives display values.

use catalog_core::Championship;
use serde::{Deserialize, Serialize};

/// XP awarded for completing a race from the main gallery.
pub const GALLERY_RACE_XP: i64 = 200;
/// XP awarded for completing a race reached through a championship.
pub const CHAMPIONSHIP_RACE_XP: i64 = 100;
/// One-off bonus for completing every race in a championship, revoked
/// symmetrically when a member race is un-completed.
pub const CHAMPIONSHIP_BONUS_XP: i64 = 500;

/// Where a race completion was triggered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionContext {
    Gallery,
    Championship,
}

/// XP value of a single race completion in the given context. Negate when
/// a completion is revoked.
pub fn race_completion_xp(context: CompletionContext) -> i64 {
    match context {
        CompletionContext::Gallery => GALLERY_RACE_XP,
        CompletionContext::Championship => CHAMPIONSHIP_RACE_XP,
    }
}

/// Derived completion counts for one championship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChampionshipProgress {
    /// Member races the user has completed.
    pub completed: usize,
    /// Total member races.
    pub total: usize,
    /// Half-up rounded percentage in [0, 100]. A championship with no
    /// races reports 0, never a division error.
    pub percentage: u32,
}

/// Compute completion counts and percentage for one championship.
pub fn championship_progress(
    championship: &Championship,
    completed_race_ids: &[String],
) -> ChampionshipProgress {
    let total = championship.race_ids.len();
    let completed = championship
        .race_ids
        .iter()
        .filter(|id| completed_race_ids.contains(id))
        .count();
    let percentage = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };
    ChampionshipProgress {
        completed,
        total,
        percentage,
    }
}

/// True iff every member race is in `completed_race_ids`.
///
/// A championship with an empty race list is vacuously complete; callers
/// that need "never complete when empty" must check `race_ids.is_empty()`
/// themselves.
pub fn is_championship_completed(
    championship: &Championship,
    completed_race_ids: &[String],
) -> bool {
    championship
        .race_ids
        .iter()
        .all(|id| completed_race_ids.contains(id))
}

/// All championships the user has fully completed, in catalog order.
pub fn completed_championships<'a>(
    championships: &'a [Championship],
    completed_race_ids: &[String],
) -> Vec<&'a Championship> {
    championships
        .iter()
        .filter(|ch| is_championship_completed(ch, completed_race_ids))
        .collect()
}

/// Championships that flipped state because one race's completion changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompletionTransition<'a> {
    /// Now complete, not previously recorded as such. The store should
    /// record each and award [`CHAMPIONSHIP_BONUS_XP`].
    pub newly_completed: Vec<&'a Championship>,
    /// Previously recorded as complete, no longer satisfied. The store
    /// should un-record each and revoke [`CHAMPIONSHIP_BONUS_XP`].
    pub newly_incomplete: Vec<&'a Championship>,
}

/// Given that `race_id`'s completion state just changed and
/// `completed_race_ids` is the post-change snapshot, determine which
/// championships containing that race flipped complete/incomplete relative
/// to `completed_championship_ids` (the previously recorded set).
pub fn completion_transition<'a>(
    championships: &'a [Championship],
    race_id: &str,
    completed_race_ids: &[String],
    completed_championship_ids: &[String],
) -> CompletionTransition<'a> {
    let mut transition = CompletionTransition::default();
    for ch in championships {
        if !ch.race_ids.iter().any(|id| id.as_str() == race_id) {
            continue;
        }
        let satisfied = is_championship_completed(ch, completed_race_ids);
        let recorded = completed_championship_ids.contains(&ch.id);
        if satisfied && !recorded {
            transition.newly_completed.push(ch);
        } else if !satisfied && recorded {
            transition.newly_incomplete.push(ch);
        }
    }
    transition
}

/// Net championship-bonus XP implied by a transition.
pub fn transition_xp_delta(transition: &CompletionTransition<'_>) -> i64 {
    let granted = transition.newly_completed.len() as i64;
    let revoked = transition.newly_incomplete.len() as i64;
    (granted - revoked) * CHAMPIONSHIP_BONUS_XP
}

/// Snapshot of a user's progress as stored in the external account store.
///
/// Profile documents are user-scoped and effectively untyped on the wire;
/// decode them through [`UserProgress::from_document`] rather than trusting
/// field types.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub completed_races: Vec<String>,
    pub completed_championships: Vec<String>,
    pub experience_points: i64,
}

fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl UserProgress {
    /// Decode an untyped profile document, defaulting every missing or
    /// mistyped field (lists default to empty, points to zero; list
    /// entries that are not non-empty strings are dropped).
    pub fn from_document(doc: &serde_json::Value) -> UserProgress {
        UserProgress {
            completed_races: string_list(doc.get("completedRaces")),
            completed_championships: string_list(doc.get("completedChampionships")),
            experience_points: doc
                .get("experiencePoints")
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn champ(id: &str, race_ids: &[&str]) -> Championship {
        Championship {
            id: id.to_string(),
            title: format!("Championship {id}"),
            description: "desc".to_string(),
            race_ids: race_ids.iter().map(|r| r.to_string()).collect(),
            image_url: None,
            livery_pack: None,
        }
    }

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn progress_counts_and_rounds_half_up() {
        let ch = champ("c", &["a", "b", "c"]);
        let p = championship_progress(&ch, &owned(&["a", "x"]));
        assert_eq!(p, ChampionshipProgress { completed: 1, total: 3, percentage: 33 });
        let p = championship_progress(&ch, &owned(&["a", "b"]));
        assert_eq!(p.percentage, 67);
        // 1/8 = 12.5% rounds up.
        let ch8 = champ("c8", &["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(championship_progress(&ch8, &owned(&["a"])).percentage, 13);
    }

    #[test]
    fn empty_championship_reports_zero_percent() {
        let ch = champ("empty", &[]);
        assert_eq!(
            championship_progress(&ch, &owned(&["a"])),
            ChampionshipProgress { completed: 0, total: 0, percentage: 0 }
        );
    }

    #[test]
    fn empty_championship_is_vacuously_complete() {
        let ch = champ("empty", &[]);
        assert!(is_championship_completed(&ch, &[]));
    }

    #[test]
    fn completion_flips_with_last_race() {
        let ch = champ("c", &["a", "b", "c"]);
        let all = owned(&["a", "b", "c"]);
        assert!(is_championship_completed(&ch, &all));
        let minus_one = owned(&["a", "c"]);
        assert!(!is_championship_completed(&ch, &minus_one));
    }

    #[test]
    fn completed_championships_in_catalog_order() {
        let championships = vec![
            champ("one", &["a"]),
            champ("two", &["a", "b"]),
            champ("three", &["z"]),
        ];
        let done = completed_championships(&championships, &owned(&["a", "b"]));
        let ids: Vec<&str> = done.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["one", "two"]);
    }

    #[test]
    fn transition_detects_newly_completed() {
        let championships = vec![champ("c", &["a", "b"]), champ("other", &["z"])];
        let t = completion_transition(&championships, "b", &owned(&["a", "b"]), &[]);
        assert_eq!(t.newly_completed.len(), 1);
        assert_eq!(t.newly_completed[0].id, "c");
        assert!(t.newly_incomplete.is_empty());
        assert_eq!(transition_xp_delta(&t), CHAMPIONSHIP_BONUS_XP);
    }

    #[test]
    fn transition_detects_newly_incomplete() {
        let championships = vec![champ("c", &["a", "b"])];
        let t = completion_transition(
            &championships,
            "b",
            &owned(&["a"]),
            &owned(&["c"]),
        );
        assert!(t.newly_completed.is_empty());
        assert_eq!(t.newly_incomplete.len(), 1);
        assert_eq!(transition_xp_delta(&t), -CHAMPIONSHIP_BONUS_XP);
    }

    #[test]
    fn transition_ignores_unrelated_championships() {
        // "other" is fully completed but does not contain the toggled race,
        // so it must not appear in the transition.
        let championships = vec![champ("c", &["a", "b"]), champ("other", &["x"])];
        let t = completion_transition(
            &championships,
            "a",
            &owned(&["a", "b", "x"]),
            &[],
        );
        let ids: Vec<&str> = t.newly_completed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c"]);
    }

    #[test]
    fn transition_is_noop_when_state_already_recorded() {
        let championships = vec![champ("c", &["a", "b"])];
        let t = completion_transition(
            &championships,
            "a",
            &owned(&["a", "b"]),
            &owned(&["c"]),
        );
        assert_eq!(t, CompletionTransition::default());
        assert_eq!(transition_xp_delta(&t), 0);
    }

    #[test]
    fn xp_policy_values() {
        assert_eq!(race_completion_xp(CompletionContext::Gallery), 200);
        assert_eq!(race_completion_xp(CompletionContext::Championship), 100);
        assert!(race_completion_xp(CompletionContext::Gallery)
            > race_completion_xp(CompletionContext::Championship));
    }

    #[test]
    fn document_decoding_defaults_missing_fields() {
        let doc = serde_json::json!({});
        assert_eq!(UserProgress::from_document(&doc), UserProgress::default());
    }

    #[test]
    fn document_decoding_drops_mistyped_entries() {
        let doc = serde_json::json!({
            "completedRaces": ["donington-93", 42, null, "  ", "spa-98 "],
            "completedChampionships": "not-a-list",
            "experiencePoints": "700",
        });
        let progress = UserProgress::from_document(&doc);
        assert_eq!(progress.completed_races, vec!["donington-93", "spa-98"]);
        assert!(progress.completed_championships.is_empty());
        assert_eq!(progress.experience_points, 0);
    }

    proptest! {
        #[test]
        fn percentage_is_bounded(
            race_ids in proptest::collection::vec("[a-z]{1,6}", 0..12),
            completed in proptest::collection::vec("[a-z]{1,6}", 0..12),
        ) {
            let ch = champ("c", &race_ids.iter().map(String::as_str).collect::<Vec<_>>());
            let p = championship_progress(&ch, &completed);
            prop_assert!(p.percentage <= 100);
            prop_assert!(p.completed <= p.total);
        }

        #[test]
        fn full_completion_always_detected(
            race_ids in proptest::collection::vec("[a-z]{1,6}", 1..10),
        ) {
            let ch = champ("c", &race_ids.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert!(is_championship_completed(&ch, &race_ids));
            prop_assert_eq!(championship_progress(&ch, &race_ids).percentage, 100);
        }
    }
}
