//! Role vocabulary: camps, canonical role names, and capability tags.
//!
//! Role names are the French display strings from the printed card set; the
//! engine never localizes them. Capability tags are resolved once per name so
//! the rest of the crate never re-derives behavior from substrings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CUPIDON: &str = "Cupidon";
pub const DEUX_SOEURS: &str = "Deux Sœurs";
pub const TROIS_FRERES: &str = "Trois Frères";
pub const ENFANT_SAUVAGE: &str = "Enfant Sauvage";
pub const VOLEUR: &str = "Voleur";
pub const CHIEN_LOUP: &str = "Chien-Loup";
pub const SALVATEUR: &str = "Salvateur";
pub const VOYANTE: &str = "Voyante";
pub const VOYANTE_AURA: &str = "Voyante d'Aura";
pub const RENARD: &str = "Renard";
pub const NOCTAMBULE: &str = "Noctambule";
pub const CORBEAU: &str = "Corbeau";
pub const JOUEUR_DE_FLUTE: &str = "Joueur de Flûte";
pub const LOUPS_GAROUS: &str = "Loups-Garous";
pub const GRAND_MECHANT_LOUP: &str = "Grand-Méchant-Loup";
pub const INFECT_PERE_DES_LOUPS: &str = "Infect Père des Loups";
pub const SORCIERE: &str = "Sorcière";
pub const SERVANTE_DEVOUEE: &str = "Servante Dévouée";
pub const SIMPLE_LOUP_GAROU: &str = "Simple Loup-Garou";
pub const SIMPLE_VILLAGEOIS: &str = "Simple Villageois";
pub const VILLAGEOIS_VILLAGEOIS: &str = "Villageois-Villageois";

/// Roles that wake only during the first night.
const FIRST_NIGHT_ONLY: [&str; 6] = [
    CUPIDON,
    DEUX_SOEURS,
    TROIS_FRERES,
    ENFANT_SAUVAGE,
    VOLEUR,
    CHIEN_LOUP,
];

/// Roles that may legally appear more than once in a composition.
const DUPLICABLES: [&str; 3] = [SIMPLE_VILLAGEOIS, VILLAGEOIS_VILLAGEOIS, SIMPLE_LOUP_GAROU];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Camp {
    #[default]
    Village,
    Loup,
    Neutre,
    Variable,
    Inconnu,
}

impl Camp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Village => "village",
            Self::Loup => "loup",
            Self::Neutre => "neutre",
            Self::Variable => "variable",
            Self::Inconnu => "inconnu",
        }
    }

    /// Normalize a free-text camp cell from the role table.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("loup") {
            Self::Loup
        } else if lower.contains("neutre") {
            Self::Neutre
        } else if lower.contains("variable") {
            Self::Variable
        } else {
            Self::Village
        }
    }
}

impl fmt::Display for Camp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Camp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "village" => Ok(Self::Village),
            "loup" => Ok(Self::Loup),
            "neutre" => Ok(Self::Neutre),
            "variable" => Ok(Self::Variable),
            "inconnu" => Ok(Self::Inconnu),
            _ => Err(()),
        }
    }
}

/// Capability tags for one role name, resolved once at composition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoleTraits {
    /// Counts as a wolf for death tracking and the wolves' group call.
    pub is_wolf: bool,
    /// Wakes only during the first night.
    pub first_night_only: bool,
    /// Required number of copies when the role is a pack (sisters, brothers).
    pub pack_size: Option<usize>,
}

impl RoleTraits {
    /// Resolve the tags for a role display name.
    #[must_use]
    pub fn of(role_name: &str) -> Self {
        Self {
            is_wolf: role_name.contains("Loup") || role_name == SIMPLE_LOUP_GAROU,
            first_night_only: FIRST_NIGHT_ONLY.contains(&role_name),
            pack_size: pack_size(role_name),
        }
    }
}

/// Required copy count for pack roles, `None` for everything else.
#[must_use]
pub fn pack_size(role_name: &str) -> Option<usize> {
    match role_name {
        DEUX_SOEURS => Some(2),
        TROIS_FRERES => Some(3),
        _ => None,
    }
}

/// Whether a role may appear more than once in a composition outside packs.
#[must_use]
pub fn is_duplicable(role_name: &str) -> bool {
    DUPLICABLES.contains(&role_name)
}
