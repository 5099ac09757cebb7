//! Step effect resolver: state transitions triggered by advancing past a
//! step, and the night resolution itself.
//!
//! Only two step kinds carry effects. `ResolveNight` computes the night's
//! deaths and hands back the dawn/day steps to splice in; `EndTurn` bumps
//! the turn counter and clears the raven slot, after which the caller must
//! rebuild the script. Everything else is inert here: target picks and
//! potion toggles go through the [`GameState`](crate::state::GameState)
//! setters directly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::script::{Step, StepKind, dawn_steps};
use crate::state::{GameState, PlayerId};

/// A player killed during night resolution, as announced at dawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casualty {
    pub id: PlayerId,
    pub name: String,
    pub role: String,
}

/// Result of applying a step's effect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepEffect {
    /// Steps to splice into the script immediately after the applied step.
    pub insert_steps: Vec<Step>,
}

/// Apply the state transition for advancing past `step`.
pub fn apply_step_effect(state: &mut GameState, step: &Step) -> StepEffect {
    match step.kind {
        StepKind::ResolveNight => {
            let killed = resolve_night(state);
            let named = killed
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect::<Vec<_>>();
            let dawn = dawn_steps(state, &named);
            if state.is_first_night {
                state.is_first_night = false;
            }
            StepEffect { insert_steps: dawn }
        }
        StepKind::EndTurn => {
            state.turn += 1;
            // The raven's +2 votes lapse with the day; everything else in
            // the night slots was already cleared at resolution.
            state.night.corbeau_target_id = None;
            StepEffect::default()
        }
        _ => StepEffect::default(),
    }
}

fn push_unique(ids: &mut SmallVec<[PlayerId; 4]>, id: &PlayerId) {
    if !ids.contains(id) {
        ids.push(id.clone());
    }
}

/// Compute and apply the night's deaths, then clear the transient slots.
///
/// Lethal targets (witch kill, wolves, Grand-Méchant-Loup extra) go into a
/// death list; the witch's heal and the protector's shield pull targets out
/// of it — a save always beats any number of kills. The couple chain then
/// runs once: if exactly one lover is slated to die and the other still
/// lives, both die. Already-dead players are never re-processed. Running
/// this against a cleared night state is inert.
pub fn resolve_night(state: &mut GameState) -> Vec<Casualty> {
    let mut deaths: SmallVec<[PlayerId; 4]> = SmallVec::new();
    let mut saved: SmallVec<[PlayerId; 4]> = SmallVec::new();

    if let Some(id) = &state.night.sorciere_save_id {
        push_unique(&mut saved, id);
    }
    if let Some(id) = &state.night.sorciere_kill_id {
        push_unique(&mut deaths, id);
    }
    if let Some(id) = &state.night.wolves_target_id {
        push_unique(&mut deaths, id);
    }
    if let Some(id) = &state.night.gml_extra_target_id {
        push_unique(&mut deaths, id);
    }

    // Protection overrides any kill, regardless of source.
    if let Some(id) = state.night.salvateur_protect_id.clone()
        && deaths.contains(&id)
    {
        deaths.retain(|d| *d != id);
        push_unique(&mut saved, &id);
    }

    deaths.retain(|id| !saved.contains(id));

    // Couple chain: lovers die together. Runs once, on the deaths as of
    // this point; no further cascade exists.
    if let Some((a, b)) = state.relationships.couple.clone() {
        if deaths.contains(&a) && state.is_alive(&b) {
            push_unique(&mut deaths, &b);
        }
        if deaths.contains(&b) && state.is_alive(&a) {
            push_unique(&mut deaths, &a);
        }
    }

    let mut killed = Vec::new();
    for id in &deaths {
        let Some(player) = state.player(id) else {
            continue;
        };
        if !player.alive {
            continue;
        }
        let casualty = Casualty {
            id: player.id.clone(),
            name: player.name.clone(),
            role: player.role.clone(),
        };
        state.mark_dead(id);
        killed.push(casualty);
    }

    // Transient slots are spent; persistent effects (couple, charmed set,
    // last protected id) carry over.
    state.night.salvateur_protect_id = None;
    state.night.wolves_target_id = None;
    state.night.gml_extra_target_id = None;
    state.night.sorciere_save_id = None;
    state.night.sorciere_kill_id = None;
    state.night.noctambule_target_id = None;

    killed
}
