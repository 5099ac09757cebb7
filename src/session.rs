//! Moderator session: one game's state, script, cursor, and undo history
//! under a single owner.
//!
//! The session is the only mutable handle the frontend needs. Advancing
//! snapshots the whole (state, script, cursor) triple first, so undo always
//! lands exactly one moderator action back, arbitrarily deep. Snapshots are
//! full clones; mutating the live state never reaches a stored snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compositions::validate_composition;
use crate::resolve::apply_step_effect;
use crate::script::{Step, StepKind, build_turn_script};
use crate::state::GameState;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid composition: {}", .0.join(" / "))]
    InvalidComposition(Vec<String>),
}

/// Deep copy of everything `advance` can touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub state: GameState,
    pub script: Vec<Step>,
    pub cursor: usize,
}

/// A running game: authoritative state plus the script being walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MjSession {
    state: GameState,
    script: Vec<Step>,
    cursor: usize,
    #[serde(default)]
    history: Vec<HistorySnapshot>,
}

impl MjSession {
    /// Start a session from a composition, gated on composition validity.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::InvalidComposition`] with the human-readable
    /// error list when the composition does not fit the player count.
    pub fn start(role_names: &[String], n_players: usize) -> Result<Self, StartError> {
        let check = validate_composition(role_names, n_players);
        if !check.ok {
            return Err(StartError::InvalidComposition(check.errors));
        }
        Ok(Self::from_state(GameState::new(role_names, n_players)))
    }

    /// Build a session around an existing state, rebuilding the script for
    /// its current turn. Used when rehydrating an exported session.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        let script = build_turn_script(&state);
        Self {
            state,
            script,
            cursor: 0,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for moderator inputs (targets, potions, votes).
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Apply a closure to the mutable game state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub fn script(&self) -> &[Step] {
        &self.script
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.script.get(self.cursor)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    fn snapshot(&mut self) {
        if self.script.is_empty() {
            return;
        }
        self.history.push(HistorySnapshot {
            state: self.state.clone(),
            script: self.script.clone(),
            cursor: self.cursor,
        });
    }

    /// Advance past the current step: snapshot, apply its effect, splice any
    /// produced steps right after it, and move the cursor. An `EndTurn` step
    /// discards the script and rebuilds it for the new turn's night.
    pub fn advance(&mut self) {
        self.snapshot();

        let Some(step) = self.script.get(self.cursor).cloned() else {
            return;
        };

        let effect = apply_step_effect(&mut self.state, &step);
        if !effect.insert_steps.is_empty() {
            let at = self.cursor + 1;
            self.script.splice(at..at, effect.insert_steps);
        }

        if step.kind == StepKind::EndTurn {
            self.script = build_turn_script(&self.state);
            self.cursor = 0;
            return;
        }

        self.cursor += 1;
        if self.cursor >= self.script.len() {
            self.cursor = 0;
        }
    }

    /// Restore the snapshot taken before the last advance. Returns false
    /// (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.state = snapshot.state;
        self.script = snapshot.script;
        self.cursor = snapshot.cursor;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles;
    use crate::state::PlayerId;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn start_small() -> MjSession {
        MjSession::start(
            &names(&[
                roles::VOYANTE,
                roles::SORCIERE,
                roles::SIMPLE_VILLAGEOIS,
                roles::SIMPLE_LOUP_GAROU,
            ]),
            4,
        )
        .expect("valid composition")
    }

    #[test]
    fn start_rejects_invalid_compositions() {
        let err = MjSession::start(&names(&[roles::VOYANTE]), 3).unwrap_err();
        let StartError::InvalidComposition(errors) = err;
        assert!(!errors.is_empty());
    }

    #[test]
    fn start_builds_first_night_script_at_cursor_zero() {
        let session = start_small();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.current_step().map(|s| s.kind), Some(StepKind::Setup));
        assert!(!session.can_undo());
    }

    #[test]
    fn advance_moves_through_inert_steps() {
        let mut session = start_small();
        session.advance();
        assert_eq!(session.cursor(), 1);
        assert!(session.can_undo());
    }

    #[test]
    fn resolution_splices_dawn_steps_in_place() {
        let mut session = start_small();
        let resolve_at = session
            .script()
            .iter()
            .position(|s| s.kind == StepKind::ResolveNight)
            .expect("resolution step");
        while session.cursor() < resolve_at {
            session.advance();
        }
        let len_before = session.script().len();
        session.advance();
        assert_eq!(session.script().len(), len_before + 4);
        assert_eq!(
            session.current_step().map(|s| s.kind),
            Some(StepKind::AnnounceDeaths)
        );
    }

    #[test]
    fn end_turn_rebuilds_the_script() {
        let mut session = start_small();
        // Walk through the whole first turn.
        while session.current_step().is_some_and(|s| s.kind != StepKind::EndTurn) {
            session.advance();
        }
        assert_eq!(session.state().turn, 1);
        session.advance();
        assert_eq!(session.state().turn, 2);
        assert_eq!(session.cursor(), 0);
        let first = session.current_step().expect("night start");
        assert_eq!(first.kind, StepKind::Info);
        assert_eq!(first.id, "night-start-2");
        assert!(session.script().iter().all(|s| s.kind != StepKind::Setup));
    }

    #[test]
    fn undo_restores_the_prior_triple_by_value() {
        let mut session = start_small();
        session.advance();
        let before = (
            session.state().clone(),
            session.script().to_vec(),
            session.cursor(),
        );
        session.advance();
        assert!(session.undo());
        assert_eq!(session.state(), &before.0);
        assert_eq!(session.script(), before.1.as_slice());
        assert_eq!(session.cursor(), before.2);
    }

    #[test]
    fn undo_on_empty_history_is_a_noop() {
        let mut session = start_small();
        assert!(!session.undo());
        session.advance();
        assert!(session.undo());
        assert!(!session.undo());
    }

    #[test]
    fn snapshots_are_independent_of_live_mutation() {
        let mut session = start_small();
        session.advance();
        session
            .state_mut()
            .rename_player(&PlayerId::from("1"), "Margot");
        assert!(session.undo());
        assert_eq!(session.state().players[0].name, "Joueur 1");
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = start_small();
        session.advance();
        session.advance();
        let json = serde_json::to_string(&session).expect("serialize");
        let back: MjSession = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, session);
    }
}
