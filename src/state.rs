//! The authoritative in-memory record of one game in progress.
//!
//! One `GameState` per session, mutated synchronously by moderator actions.
//! Every mutator is a defensive no-op on invalid input (unknown id, empty
//! name, consumed potion) so the moderator flow never faults mid-game.
//! Persistent fields (couple, charmed set, last protected id) survive night
//! resolution; the `night` slots do not.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::roles::RoleTraits;

/// Stable seat identifier, assigned `"1"`..`"N"` at game creation.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Role assigned at creation; never changes afterwards.
    pub role: String,
    /// Capability tags resolved from the role name at creation.
    pub traits: RoleTraits,
    pub alive: bool,
    pub note: String,
}

/// Witch potion availability. Monotonic in normal flow; flipping one back on
/// is a moderator correction, not a game event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorcierePotions {
    pub heal: bool,
    pub kill: bool,
}

impl Default for SorcierePotions {
    fn default() -> Self {
        Self {
            heal: true,
            kill: true,
        }
    }
}

/// Which of the witch's two potions an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Potion {
    Heal,
    Kill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SalvateurState {
    /// Last protected player, kept for display; the "not two nights in a
    /// row" rule stays advisory and is never enforced here.
    pub last_protected_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmlState {
    /// True until the first wolf death of the game; never reverts.
    pub no_wolf_dead_yet: bool,
}

impl Default for GmlState {
    fn default() -> Self {
        Self {
            no_wolf_dead_yet: true,
        }
    }
}

/// Transient per-night target slots, cleared by night resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NightChoices {
    pub salvateur_protect_id: Option<PlayerId>,
    pub wolves_target_id: Option<PlayerId>,
    pub gml_extra_target_id: Option<PlayerId>,
    pub sorciere_save_id: Option<PlayerId>,
    pub sorciere_kill_id: Option<PlayerId>,
    /// Cleared at end of turn, not at resolution (the +2 votes apply to the
    /// day following the night it was chosen).
    pub corbeau_target_id: Option<PlayerId>,
    pub noctambule_target_id: Option<PlayerId>,
}

/// Addressable night slots for the generic choice setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NightSlot {
    SalvateurProtect,
    WolvesTarget,
    GmlExtraTarget,
    SorciereSave,
    SorciereKill,
    CorbeauTarget,
    NoctambuleTarget,
}

/// Relationships that persist across turns until explicitly changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Relationships {
    /// Lovers designated by Cupidon.
    pub couple: Option<(PlayerId, PlayerId)>,
    /// Players charmed by the Joueur de Flûte.
    pub charmed_ids: BTreeSet<PlayerId>,
}

/// Derived counts for the state panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    pub alive: usize,
    pub dead: usize,
    pub turn: u32,
    pub is_first_night: bool,
}

/// A target option offered to the moderator when picking a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOption {
    pub id: PlayerId,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u32,
    pub is_first_night: bool,
    pub game_note: String,
    pub turn_notes: BTreeMap<u32, String>,
    /// Seat order, fixed for the game's lifetime. Dead players stay in the
    /// roster.
    pub players: Vec<Player>,
    pub sorciere: SorcierePotions,
    pub salvateur: SalvateurState,
    pub gml: GmlState,
    pub night: NightChoices,
    pub relationships: Relationships,
}

impl GameState {
    /// Seat `player_count` players with `role_names[i]` at seat `i`.
    ///
    /// Composition validity is the caller's responsibility; an absent role
    /// name falls back to a placeholder so the roster length always matches
    /// the configured player count.
    #[must_use]
    pub fn new(role_names: &[String], player_count: usize) -> Self {
        let players = (0..player_count)
            .map(|i| {
                let role = role_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| "(inconnu)".to_string());
                Player {
                    id: PlayerId::new((i + 1).to_string()),
                    name: format!("Joueur {}", i + 1),
                    traits: RoleTraits::of(&role),
                    role,
                    alive: true,
                    note: String::new(),
                }
            })
            .collect();

        Self {
            turn: 1,
            is_first_night: true,
            game_note: String::new(),
            turn_notes: BTreeMap::new(),
            players,
            sorciere: SorcierePotions::default(),
            salvateur: SalvateurState::default(),
            gml: GmlState::default(),
            night: NightChoices::default(),
            relationships: Relationships::default(),
        }
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.player(id).is_some_and(|p| p.alive)
    }

    /// Living players holding `role_name`, in seat order.
    pub fn alive_with_role<'a>(&'a self, role_name: &'a str) -> impl Iterator<Item = &'a Player> {
        self.players
            .iter()
            .filter(move |p| p.alive && p.role == role_name)
    }

    #[must_use]
    pub fn has_any_alive(&self, role_name: &str) -> bool {
        self.alive_with_role(role_name).next().is_some()
    }

    /// Total holders of `role_name`, dead or alive (pack-size checks).
    #[must_use]
    pub fn count_with_role(&self, role_name: &str) -> usize {
        self.players.iter().filter(|p| p.role == role_name).count()
    }

    /// Living wolves, in seat order.
    pub fn alive_wolves(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive && p.traits.is_wolf)
    }

    /// Mark a player dead. Idempotent: unknown ids and already-dead players
    /// are left untouched. The first wolf death permanently disarms the
    /// Grand-Méchant-Loup's second-kill condition.
    pub fn mark_dead(&mut self, id: &PlayerId) {
        let mut wolf_died = false;
        if let Some(player) = self.player_mut(id)
            && player.alive
        {
            player.alive = false;
            wolf_died = player.traits.is_wolf;
        }
        if wolf_died {
            self.gml.no_wolf_dead_yet = false;
        }
    }

    /// Moderator correction: bring a player back. Does not restore
    /// `no_wolf_dead_yet`, which is monotonic for the whole game.
    pub fn revive(&mut self, id: &PlayerId) {
        if let Some(player) = self.player_mut(id) {
            player.alive = true;
        }
    }

    /// Rename a player. Blank names (after trimming) keep the old name.
    pub fn rename_player(&mut self, id: &PlayerId, new_name: &str) {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(player) = self.player_mut(id) {
            player.name = trimmed.to_string();
        }
    }

    pub fn set_player_note(&mut self, id: &PlayerId, note: &str) {
        if let Some(player) = self.player_mut(id) {
            player.note = note.to_string();
        }
    }

    pub fn set_game_note(&mut self, note: &str) {
        self.game_note = note.to_string();
    }

    pub fn set_turn_note(&mut self, turn: u32, note: &str) {
        if note.trim().is_empty() {
            self.turn_notes.remove(&turn);
        } else {
            self.turn_notes.insert(turn, note.to_string());
        }
    }

    /// Record the couple designated by Cupidon. Empty or identical ids are
    /// ignored.
    pub fn set_couple(&mut self, lover_a: PlayerId, lover_b: PlayerId) {
        if lover_a.is_empty() || lover_b.is_empty() || lover_a == lover_b {
            return;
        }
        self.relationships.couple = Some((lover_a, lover_b));
    }

    /// Add or remove a player from the charmed set.
    pub fn toggle_charmed(&mut self, id: &PlayerId, charmed: bool) {
        if id.is_empty() {
            return;
        }
        if charmed {
            self.relationships.charmed_ids.insert(id.clone());
        } else {
            self.relationships.charmed_ids.remove(id);
        }
    }

    /// Mark one of the witch's potions as spent.
    pub fn set_potion_used(&mut self, which: Potion) {
        self.set_potion_available(which, false);
    }

    /// Set a potion's availability. Turning a potion off also clears its
    /// pending target so the night cannot apply a potion that no longer
    /// exists.
    pub fn set_potion_available(&mut self, which: Potion, available: bool) {
        match which {
            Potion::Heal => {
                self.sorciere.heal = available;
                if !available {
                    self.night.sorciere_save_id = None;
                }
            }
            Potion::Kill => {
                self.sorciere.kill = available;
                if !available {
                    self.night.sorciere_kill_id = None;
                }
            }
        }
    }

    /// Generic night-slot setter. Writes to the witch's save/kill slots are
    /// silently ignored while the matching potion is unavailable.
    pub fn set_night_choice(&mut self, slot: NightSlot, value: Option<PlayerId>) {
        match slot {
            NightSlot::SorciereSave if !self.sorciere.heal => {}
            NightSlot::SorciereKill if !self.sorciere.kill => {}
            NightSlot::SalvateurProtect => self.night.salvateur_protect_id = value,
            NightSlot::WolvesTarget => self.night.wolves_target_id = value,
            NightSlot::GmlExtraTarget => self.night.gml_extra_target_id = value,
            NightSlot::SorciereSave => self.night.sorciere_save_id = value,
            NightSlot::SorciereKill => self.night.sorciere_kill_id = value,
            NightSlot::CorbeauTarget => self.night.corbeau_target_id = value,
            NightSlot::NoctambuleTarget => self.night.noctambule_target_id = value,
        }
    }

    /// Record the protector's pick, mirrored into `salvateur` for display.
    pub fn set_salvateur_protected(&mut self, id: Option<PlayerId>) {
        self.night.salvateur_protect_id = id.clone();
        self.salvateur.last_protected_id = id;
    }

    pub fn set_wolves_target(&mut self, id: Option<PlayerId>) {
        self.night.wolves_target_id = id;
    }

    pub fn set_gml_target(&mut self, id: Option<PlayerId>) {
        self.night.gml_extra_target_id = id;
    }

    /// Target options over living players, in seat order, reflecting alive
    /// status at call time.
    #[must_use]
    pub fn alive_player_options(&self) -> Vec<PlayerOption> {
        self.players
            .iter()
            .filter(|p| p.alive)
            .map(|p| PlayerOption {
                id: p.id.clone(),
                name: p.name.clone(),
                role: p.role.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> StateSummary {
        let alive = self.players.iter().filter(|p| p.alive).count();
        StateSummary {
            alive,
            dead: self.players.len() - alive,
            turn: self.turn,
            is_first_night: self.is_first_night,
        }
    }
}
