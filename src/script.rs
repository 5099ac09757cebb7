//! Turn script builder: the ordered list of instruction steps the moderator
//! walks through for one turn.
//!
//! The script covers setup (first turn only), the night calls in their fixed
//! order, and a final resolution step. Dawn and day steps are not
//! precomputed; the resolver splices them in once the night's deaths are
//! known (see [`crate::resolve`]). The whole script is rebuilt from scratch
//! after every end-of-turn.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::roles;
use crate::state::{GameState, PlayerId};

/// Closed set of step kinds. The kind tells the frontend which interaction
/// to render and tells the resolver which effect to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Setup,
    Info,
    PickCouple,
    PickMentor,
    ChooseSide,
    PickSalvateur,
    PickSeer,
    PickAura,
    PickNoctambule,
    PickCorbeau,
    PickPiper,
    PickWolves,
    PickGml,
    Witch,
    ResolveNight,
    AnnounceDeaths,
    Vote,
    EndTurn,
}

impl StepKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Info => "info",
            Self::PickCouple => "pick-couple",
            Self::PickMentor => "pick-mentor",
            Self::ChooseSide => "choose-side",
            Self::PickSalvateur => "pick-salvateur",
            Self::PickSeer => "pick-seer",
            Self::PickAura => "pick-aura",
            Self::PickNoctambule => "pick-noctambule",
            Self::PickCorbeau => "pick-corbeau",
            Self::PickPiper => "pick-piper",
            Self::PickWolves => "pick-wolves",
            Self::PickGml => "pick-gml",
            Self::Witch => "witch",
            Self::ResolveNight => "resolve-night",
            Self::AnnounceDeaths => "announce-deaths",
            Self::Vote => "vote",
            Self::EndTurn => "end-turn",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary data attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepPayload {
    /// Players who died during the night, for the dawn announcement.
    KilledIds(Vec<PlayerId>),
}

/// One discrete instruction/interaction unit in the moderator's script.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub checklist: SmallVec<[String; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<StepPayload>,
}

impl Step {
    fn new(id: impl Into<String>, kind: StepKind, title: impl Into<String>, body: &str) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            body: body.to_string(),
            checklist: SmallVec::new(),
            payload: None,
        }
    }

    fn with_checklist<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checklist = items.into_iter().map(Into::into).collect();
        self
    }
}

/// Night call order. Protection first, then information roles, then lethal
/// roles, then the witch, who must hear the wolves' victim before acting.
/// The resolver depends on the witch being last; keep this order fixed.
const NIGHT_ORDER: [&str; 12] = [
    roles::SALVATEUR,
    roles::VOYANTE,
    roles::VOYANTE_AURA,
    roles::RENARD,
    roles::NOCTAMBULE,
    roles::CORBEAU,
    roles::JOUEUR_DE_FLUTE,
    roles::LOUPS_GAROUS,
    roles::GRAND_MECHANT_LOUP,
    roles::INFECT_PERE_DES_LOUPS,
    roles::SORCIERE,
    roles::SERVANTE_DEVOUEE,
];

/// Whether the pack role either is absent or is present in exactly its
/// required count (dead or alive).
fn pack_is_correct(state: &GameState, role_name: &str) -> bool {
    roles::pack_size(role_name)
        .is_none_or(|needed| state.count_with_role(role_name) == needed)
}

fn first_night_steps(state: &GameState) -> Vec<Step> {
    let mut steps = Vec::new();

    if state.has_any_alive(roles::CUPIDON) {
        steps.push(
            Step::new(
                "first-cupidon",
                StepKind::PickCouple,
                "Première nuit — Cupidon",
                "Réveille Cupidon (s'il est vivant). Il désigne 2 amoureux, puis tu réveilles \
                 les amoureux pour qu'ils se reconnaissent.",
            )
            .with_checklist(["Noter le couple", "Réveiller les amoureux", "Rendormir"]),
        );
    }

    if state.has_any_alive(roles::DEUX_SOEURS) && pack_is_correct(state, roles::DEUX_SOEURS) {
        steps.push(Step::new(
            "first-sisters",
            StepKind::Info,
            "Première nuit — Deux Sœurs",
            "Réveille les Deux Sœurs vivantes : elles se reconnaissent silencieusement.",
        ));
    }

    if state.has_any_alive(roles::TROIS_FRERES) && pack_is_correct(state, roles::TROIS_FRERES) {
        steps.push(Step::new(
            "first-brothers",
            StepKind::Info,
            "Première nuit — Trois Frères",
            "Réveille les Trois Frères vivants : ils se reconnaissent silencieusement.",
        ));
    }

    if state.has_any_alive(roles::ENFANT_SAUVAGE) {
        steps.push(Step::new(
            "first-wildchild",
            StepKind::PickMentor,
            "Première nuit — Enfant Sauvage",
            "Réveille l'Enfant Sauvage (vivant). Il désigne un mentor. Note-le secrètement.",
        ));
    }

    if state.has_any_alive(roles::VOLEUR) {
        steps.push(Step::new(
            "first-thief",
            StepKind::Info,
            "Première nuit — Voleur",
            "Si tu joues avec le Voleur, prévois 2 cartes supplémentaires. Réveille-le : il \
             peut échanger sa carte.",
        ));
    }

    if state.has_any_alive(roles::CHIEN_LOUP) {
        steps.push(Step::new(
            "first-dogwolf",
            StepKind::ChooseSide,
            "Première nuit — Chien-Loup",
            "Réveille le Chien-Loup (vivant). Il choisit définitivement son camp (Villageois \
             ou Loup) pour la partie.",
        ));
    }

    steps
}

fn night_role_step(state: &GameState, role: &str) -> Option<Step> {
    let turn = state.turn;
    match role {
        roles::SALVATEUR if state.has_any_alive(roles::SALVATEUR) => Some(Step::new(
            format!("night-salvateur-{turn}"),
            StepKind::PickSalvateur,
            format!("Nuit {turn} — Salvateur"),
            "Réveille le Salvateur (vivant). Il désigne une personne vivante à protéger (pas \
             deux nuits de suite).",
        )),
        roles::VOYANTE if state.has_any_alive(roles::VOYANTE) => Some(Step::new(
            format!("night-seer-{turn}"),
            StepKind::PickSeer,
            format!("Nuit {turn} — Voyante"),
            "Réveille la Voyante (vivante). Elle désigne un joueur vivant. Indique-lui son \
             rôle/camp selon ta règle.",
        )),
        roles::VOYANTE_AURA if state.has_any_alive(roles::VOYANTE_AURA) => Some(Step::new(
            format!("night-aura-{turn}"),
            StepKind::PickAura,
            format!("Nuit {turn} — Voyante d'Aura"),
            "Réveille la Voyante d'Aura (vivante). Elle désigne un joueur vivant. Réponds \
             « aura obscure » si le rôle peut tuer, sinon « aura claire ».",
        )),
        roles::RENARD if state.has_any_alive(roles::RENARD) => Some(Step::new(
            format!("night-fox-{turn}"),
            StepKind::Info,
            format!("Nuit {turn} — Renard"),
            "Réveille le Renard (vivant). Il désigne 3 joueurs. Dis « oui » s'il y a au moins \
             un loup parmi eux, sinon « non ».",
        )),
        roles::NOCTAMBULE if state.has_any_alive(roles::NOCTAMBULE) => Some(Step::new(
            format!("night-noctambule-{turn}"),
            StepKind::PickNoctambule,
            format!("Nuit {turn} — Noctambule"),
            "Réveille le Noctambule (vivant). Il choisit un joueur vivant chez qui dormir (ce \
             joueur perd son pouvoir cette nuit).",
        )),
        roles::CORBEAU if state.has_any_alive(roles::CORBEAU) => Some(Step::new(
            format!("night-raven-{turn}"),
            StepKind::PickCorbeau,
            format!("Nuit {turn} — Corbeau"),
            "Réveille le Corbeau (vivant). Il désigne un joueur vivant. Au prochain vote, ce \
             joueur prendra +2 voix.",
        )),
        roles::JOUEUR_DE_FLUTE if state.has_any_alive(roles::JOUEUR_DE_FLUTE) => Some(Step::new(
            format!("night-piper-{turn}"),
            StepKind::PickPiper,
            format!("Nuit {turn} — Joueur de Flûte"),
            "Réveille le Joueur de Flûte (vivant). Il charme des joueurs vivants (souvent 2) \
             jusqu'à ce que tous soient charmés.",
        )),
        roles::LOUPS_GAROUS if state.alive_wolves().next().is_some() => Some(Step::new(
            format!("night-wolves-{turn}"),
            StepKind::PickWolves,
            format!("Nuit {turn} — Loups-Garous"),
            "Réveille les Loups-Garous vivants. Ils se mettent d'accord sur une victime \
             (joueur vivant).",
        )),
        roles::GRAND_MECHANT_LOUP if state.has_any_alive(roles::GRAND_MECHANT_LOUP) => {
            // Display-only branch; the resolver never gates on this text.
            let body = if state.gml.no_wolf_dead_yet {
                "Si aucun loup n'est mort, le Grand-Méchant-Loup vivant peut choisir une 2e \
                 victime."
            } else {
                "Un loup est déjà mort : le pouvoir du Grand-Méchant-Loup ne s'applique plus."
            };
            Some(Step::new(
                format!("night-gml-{turn}"),
                StepKind::PickGml,
                format!("Nuit {turn} — Grand-Méchant-Loup"),
                body,
            ))
        }
        roles::INFECT_PERE_DES_LOUPS if state.has_any_alive(roles::INFECT_PERE_DES_LOUPS) => {
            Some(Step::new(
                format!("night-infect-{turn}"),
                StepKind::Info,
                format!("Nuit {turn} — Infect Père des Loups"),
                "Rappel: 1 fois par partie, il peut transformer la victime des loups au lieu \
                 de la tuer (variant non simulé ici).",
            ))
        }
        roles::SORCIERE if state.has_any_alive(roles::SORCIERE) => Some(
            Step::new(
                format!("night-witch-{turn}"),
                StepKind::Witch,
                format!("Nuit {turn} — Sorcière"),
                "Annonce à la Sorcière la victime des loups (si elle existe). Elle peut \
                 utiliser une potion de soin et/ou une potion de mort (si disponibles).",
            )
            .with_checklist([
                if state.sorciere.heal {
                    "Potion de soin disponible"
                } else {
                    "Potion de soin déjà utilisée"
                },
                if state.sorciere.kill {
                    "Potion de mort disponible"
                } else {
                    "Potion de mort déjà utilisée"
                },
            ]),
        ),
        roles::SERVANTE_DEVOUEE if state.has_any_alive(roles::SERVANTE_DEVOUEE) => {
            Some(Step::new(
                format!("night-maid-{turn}"),
                StepKind::Info,
                format!("Nuit {turn} — Servante Dévouée"),
                "En fin de nuit, la Servante peut échanger son rôle avec une victime de la \
                 nuit (variant non simulé ici).",
            ))
        }
        _ => None,
    }
}

fn night_steps(state: &GameState) -> Vec<Step> {
    let turn = state.turn;
    let mut steps = vec![Step::new(
        format!("night-start-{turn}"),
        StepKind::Info,
        format!("Nuit {turn} — Début"),
        "Tout le village s'endort. Annonce la nuit et rappelle le silence.",
    )];

    for role in NIGHT_ORDER {
        if roles::RoleTraits::of(role).first_night_only {
            continue;
        }
        if let Some(step) = night_role_step(state, role) {
            steps.push(step);
        }
    }

    steps.push(Step::new(
        format!("night-resolve-{turn}"),
        StepKind::ResolveNight,
        format!("Nuit {turn} — Résolution"),
        "Applique protections et potions, puis détermine les morts (sans les annoncer \
         encore).",
    ));

    steps
}

/// Dawn and day steps for the players killed this night, spliced in by the
/// resolver right after the resolution step.
#[must_use]
pub fn dawn_steps(state: &GameState, killed: &[(PlayerId, String)]) -> Vec<Step> {
    let turn = state.turn;
    let mut announce = Step::new(
        format!("dawn-{turn}"),
        StepKind::AnnounceDeaths,
        format!("Aube — Nuit {turn}"),
        if killed.is_empty() {
            "Réveille le village. Annonce qu'il n'y a eu aucun mort cette nuit."
        } else {
            "Réveille le village. Annonce les morts de la nuit (sans révéler les rôles, sauf \
             effet)."
        },
    );
    announce.payload = Some(StepPayload::KilledIds(
        killed.iter().map(|(id, _)| id.clone()).collect(),
    ));
    if !killed.is_empty() {
        let dead_names = killed
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        announce = announce.with_checklist([
            format!("Morts: {dead_names}"),
            "Gérer les pouvoirs à la mort (Chasseur, etc.)".to_string(),
        ]);
    }

    vec![
        announce,
        Step::new(
            format!("day-debate-{turn}"),
            StepKind::Info,
            format!("Jour {turn} — Débat"),
            "Laisse les joueurs discuter.",
        ),
        Step::new(
            format!("day-vote-{turn}"),
            StepKind::Vote,
            format!("Jour {turn} — Vote"),
            "Organise le vote d'exécution. Après le vote, marque le joueur exécuté comme mort \
             dans l'état.",
        ),
        Step::new(
            format!("end-turn-{turn}"),
            StepKind::EndTurn,
            format!("Fin du tour {turn}"),
            "Si la partie n'est pas terminée, passe au tour suivant (Nuit suivante).",
        ),
    ]
}

/// Build the full script for the current turn: setup and first-night calls
/// when applicable, then the night sequence through its resolution step.
#[must_use]
pub fn build_turn_script(state: &GameState) -> Vec<Step> {
    let mut steps = Vec::new();

    if state.is_first_night {
        steps.push(Step::new(
            "setup",
            StepKind::Setup,
            "Mise en place",
            "Distribue les cartes, puis utilise le panneau 'Joueurs' pour nommer les joueurs \
             et suivre vivants/morts.",
        ));
        steps.extend(first_night_steps(state));
    }

    steps.extend(night_steps(state));
    steps
}
