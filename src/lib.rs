//! Garou Game Engine
//!
//! Platform-agnostic core logic for the Garou werewolf companion: role
//! catalog, composition rules, and the moderator turn-state engine (game
//! state, turn script, night resolution, undo history). This crate provides
//! all game mechanics without UI or platform-specific dependencies; the web
//! frontend drives it one moderator action at a time.

pub mod catalog;
pub mod compositions;
pub mod resolve;
pub mod roles;
pub mod script;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use catalog::{CatalogError, RoleCatalog, RoleInfo, RoleRecord, RoleSource, parse_roles_markdown};
pub use compositions::{
    Composition, CompositionCheck, CompositionStats, compute_stats, count_roles, expand_packs,
    preset_compositions, recommended_wolf_count, validate_composition,
};
pub use resolve::{Casualty, StepEffect, apply_step_effect, resolve_night};
pub use roles::{Camp, RoleTraits};
pub use script::{Step, StepKind, StepPayload, build_turn_script, dawn_steps};
pub use session::{HistorySnapshot, MjSession, StartError};
pub use state::{
    GameState, GmlState, NightChoices, NightSlot, Player, PlayerId, PlayerOption, Potion,
    Relationships, SalvateurState, SorcierePotions, StateSummary,
};

/// Engine facade binding a role source to session creation.
///
/// The frontend constructs one engine with its platform loader, loads the
/// catalog once, and starts gated sessions from it.
pub struct MjEngine<S>
where
    S: RoleSource,
{
    source: S,
}

impl<S> MjEngine<S>
where
    S: RoleSource,
{
    /// Create an engine over the provided role source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Load and index the role catalog from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the role table cannot be loaded.
    pub fn load_catalog(&self) -> Result<RoleCatalog, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let records = self.source.load_roles().map_err(Into::into)?;
        Ok(RoleCatalog::from_records(records))
    }

    /// Start a moderator session for a composition, gated on validity.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::InvalidComposition`] when the composition does
    /// not fit the player count.
    pub fn start_session(
        &self,
        role_names: &[String],
        n_players: usize,
    ) -> Result<MjSession, StartError> {
        MjSession::start(role_names, n_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureSource;

    impl RoleSource for FixtureSource {
        type Error = Infallible;

        fn load_roles(&self) -> Result<Vec<RoleRecord>, Self::Error> {
            Ok(vec![
                RoleRecord {
                    name: roles::VOYANTE.into(),
                    origin: "Base".into(),
                    camp: Camp::Village,
                    balance: 3,
                },
                RoleRecord {
                    name: roles::SIMPLE_LOUP_GAROU.into(),
                    origin: "Base".into(),
                    camp: Camp::Loup,
                    balance: -4,
                },
            ])
        }
    }

    #[test]
    fn engine_loads_catalog_and_starts_sessions() {
        let engine = MjEngine::new(FixtureSource);
        let catalog = engine.load_catalog().expect("fixture loads");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup(roles::VOYANTE).camp, Camp::Village);

        let roles_list: Vec<String> = vec![
            roles::VOYANTE.into(),
            roles::SIMPLE_VILLAGEOIS.into(),
            roles::SIMPLE_LOUP_GAROU.into(),
        ];
        let session = engine.start_session(&roles_list, 3).expect("valid");
        assert_eq!(session.state().players.len(), 3);

        let err = engine.start_session(&roles_list, 5).unwrap_err();
        let StartError::InvalidComposition(errors) = err;
        assert!(!errors.is_empty());
    }
}
