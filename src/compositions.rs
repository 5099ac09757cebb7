//! Composition rules: validation, the wolf-count heuristic, stats, and a
//! curated preset library.
//!
//! These rules gate game creation: a session only starts once
//! [`validate_composition`] reports `ok`. The advisory balance stats never
//! block anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::RoleCatalog;
use crate::roles::{self, Camp};

/// Advisory wolf count for a table size.
///
/// 6-7 players: 1 wolf, 8-11: 2, 12-15: 3, 16+: 4.
#[must_use]
pub const fn recommended_wolf_count(n_players: usize) -> usize {
    if n_players <= 7 {
        1
    } else if n_players <= 11 {
        2
    } else if n_players <= 15 {
        3
    } else {
        4
    }
}

/// Replace each pack role by its required number of copies.
#[must_use]
pub fn expand_packs(role_names: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(role_names.len());
    for name in role_names {
        match roles::pack_size(name) {
            Some(size) => out.extend(std::iter::repeat_n(name.clone(), size)),
            None => out.push(name.clone()),
        }
    }
    out
}

/// Count occurrences of each role name, in first-seen order of names.
#[must_use]
pub fn count_roles(role_names: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for name in role_names {
        *counts.entry(name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Outcome of validating a composition against a player count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionCheck {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Validate a role multiset against a player count.
///
/// Checks card count, exact pack sizes, and uniqueness of non-duplicable
/// roles. Errors are human-readable strings for the moderator.
#[must_use]
pub fn validate_composition(role_names: &[String], n_players: usize) -> CompositionCheck {
    let mut errors = Vec::new();

    if role_names.len() != n_players {
        errors.push(format!(
            "La composition contient {} cartes mais il faut {} joueurs.",
            role_names.len(),
            n_players
        ));
    }

    let counts = count_roles(role_names);

    for (name, count) in &counts {
        if let Some(pack_size) = roles::pack_size(name)
            && *count != pack_size
        {
            errors.push(format!(
                "Le rôle « {name} » doit être présent en {pack_size} exemplaires (actuel: {count})."
            ));
        }
    }

    for (name, count) in &counts {
        if *count <= 1 || roles::pack_size(name).is_some() || roles::is_duplicable(name) {
            continue;
        }
        errors.push(format!("Le rôle « {name} » est unique (doublon: {count})."));
    }

    CompositionCheck {
        ok: errors.is_empty(),
        errors,
    }
}

/// Advisory balance stats for a composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompositionStats {
    pub balance: i32,
    pub camps: BTreeMap<Camp, usize>,
}

/// Sum balance and tally camps over a composition. Roles missing from the
/// catalog land in the `Inconnu` camp and contribute zero balance.
#[must_use]
pub fn compute_stats(role_names: &[String], catalog: &RoleCatalog) -> CompositionStats {
    let mut stats = CompositionStats::default();
    for name in role_names {
        let info = catalog.lookup(name);
        stats.balance += info.balance;
        *stats.camps.entry(info.camp).or_insert(0) += 1;
    }
    stats
}

/// One curated composition preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub id: String,
    pub title: String,
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Composition {
    fn new(id: &str, title: &str, roles: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            roles: roles.iter().map(ToString::to_string).collect(),
            note: None,
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Curated presets for a table size. Pack roles are already expanded so the
/// lists map one-to-one onto seats. Empty for sizes with no preset.
#[must_use]
pub fn preset_compositions(n_players: usize) -> Vec<Composition> {
    match n_players {
        6 => vec![Composition::new(
            "6-a",
            "Simple & nerveux",
            &[
                "Voyante",
                "Salvateur",
                "Bouc Émissaire",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Loup-Garou",
            ],
        )],
        8 => vec![
            Composition::new(
                "8-a",
                "Classique",
                &[
                    "Voyante",
                    "Salvateur",
                    "Chasseur",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Loup-Garou",
                    "Simple Loup-Garou",
                ],
            ),
            Composition::new(
                "8-b",
                "Plus de bluff",
                &[
                    "Renard",
                    "Corbeau",
                    "Comédien",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Loup-Garou",
                    "Simple Loup-Garou",
                ],
            ),
        ],
        10 => vec![
            Composition::new(
                "10-a",
                "Équilibré (classique)",
                &[
                    "Voyante",
                    "Sorcière",
                    "Corbeau",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Loup-Garou",
                    "Simple Loup-Garou",
                ],
            ),
            Composition::new(
                "10-b",
                "Variable maîtrisable",
                &[
                    "Chien-Loup",
                    "Salvateur",
                    "Renard",
                    "Chasseur",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Villageois",
                    "Simple Loup-Garou",
                    "Simple Loup-Garou",
                    "Simple Villageois",
                ],
            )
            .with_note("Conseil MJ : rappeler que le Chien-Loup choisit son camp la 1ère nuit."),
        ],
        12 => vec![Composition::new(
            "12-a",
            "Standard (3 loups)",
            &[
                "Voyante",
                "Sorcière",
                "Salvateur",
                "Chasseur",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
            ],
        )],
        15 => vec![Composition::new(
            "15-a",
            "Trois Frères + 3 loups",
            &[
                "Trois Frères",
                "Trois Frères",
                "Trois Frères",
                "Voyante",
                "Salvateur",
                "Chasseur",
                "Juge Bègue",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
                "Simple Villageois",
            ],
        )],
        18 => vec![Composition::new(
            "18-b",
            "Avec Joueur de Flûte",
            &[
                "Joueur de Flûte",
                "Voyante",
                "Sorcière",
                "Salvateur",
                "Montreur d'Ours",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Villageois",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
            ],
        )],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleRecord;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn wolf_count_brackets() {
        assert_eq!(recommended_wolf_count(6), 1);
        assert_eq!(recommended_wolf_count(7), 1);
        assert_eq!(recommended_wolf_count(8), 2);
        assert_eq!(recommended_wolf_count(11), 2);
        assert_eq!(recommended_wolf_count(12), 3);
        assert_eq!(recommended_wolf_count(15), 3);
        assert_eq!(recommended_wolf_count(16), 4);
    }

    #[test]
    fn packs_expand_to_required_size() {
        let expanded = expand_packs(&names(&["Deux Sœurs", "Voyante", "Trois Frères"]));
        assert_eq!(
            expanded,
            names(&[
                "Deux Sœurs",
                "Deux Sœurs",
                "Voyante",
                "Trois Frères",
                "Trois Frères",
                "Trois Frères",
            ])
        );
    }

    #[test]
    fn card_count_mismatch_is_reported() {
        let check = validate_composition(&names(&["Voyante", "Simple Loup-Garou"]), 3);
        assert!(!check.ok);
        assert_eq!(check.errors.len(), 1);
        assert!(check.errors[0].contains("2 cartes"));
    }

    #[test]
    fn wrong_pack_size_is_reported() {
        let check = validate_composition(
            &names(&["Deux Sœurs", "Voyante", "Simple Loup-Garou"]),
            3,
        );
        assert!(!check.ok);
        assert!(check.errors.iter().any(|e| e.contains("Deux Sœurs")));
    }

    #[test]
    fn duplicate_unique_role_is_reported() {
        let check = validate_composition(
            &names(&["Voyante", "Voyante", "Simple Loup-Garou"]),
            3,
        );
        assert!(!check.ok);
        assert!(check.errors.iter().any(|e| e.contains("doublon")));
    }

    #[test]
    fn duplicable_fillers_pass() {
        let check = validate_composition(
            &names(&[
                "Simple Villageois",
                "Simple Villageois",
                "Simple Loup-Garou",
                "Simple Loup-Garou",
            ]),
            4,
        );
        assert!(check.ok, "errors: {:?}", check.errors);
    }

    #[test]
    fn stats_count_unknown_roles_separately() {
        let catalog = RoleCatalog::from_records(vec![
            RoleRecord {
                name: "Voyante".into(),
                origin: "Base".into(),
                camp: Camp::Village,
                balance: 3,
            },
            RoleRecord {
                name: "Simple Loup-Garou".into(),
                origin: "Base".into(),
                camp: Camp::Loup,
                balance: -4,
            },
        ]);
        let stats = compute_stats(
            &names(&["Voyante", "Simple Loup-Garou", "Mystère"]),
            &catalog,
        );
        assert_eq!(stats.balance, -1);
        assert_eq!(stats.camps[&Camp::Village], 1);
        assert_eq!(stats.camps[&Camp::Loup], 1);
        assert_eq!(stats.camps[&Camp::Inconnu], 1);
    }

    #[test]
    fn presets_match_their_table_size() {
        for n in [6, 8, 10, 12, 15, 18] {
            for preset in preset_compositions(n) {
                assert_eq!(preset.roles.len(), n, "preset {}", preset.id);
                assert!(validate_composition(&preset.roles, n).ok, "preset {}", preset.id);
            }
        }
        assert!(preset_compositions(5).is_empty());
    }
}
