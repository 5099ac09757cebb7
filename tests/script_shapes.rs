//! Shape checks for the script and exported session data: step tags, id
//! scheme, and lossless round-trips of snapshots.

use garou_game::{
    GameState, MjSession, PlayerId, Step, StepKind, StepPayload, build_turn_script, roles,
};
use serde_json::Value;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn full_table() -> GameState {
    GameState::new(
        &names(&[
            roles::CUPIDON,
            roles::SALVATEUR,
            roles::VOYANTE,
            roles::CORBEAU,
            roles::SORCIERE,
            roles::GRAND_MECHANT_LOUP,
            roles::SIMPLE_LOUP_GAROU,
            roles::SIMPLE_VILLAGEOIS,
        ]),
        8,
    )
}

#[test]
fn step_ids_follow_the_turn_scheme() {
    let state = full_table();
    let script = build_turn_script(&state);

    let ids: Vec<&str> = script.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "setup",
            "first-cupidon",
            "night-start-1",
            "night-salvateur-1",
            "night-seer-1",
            "night-raven-1",
            "night-wolves-1",
            "night-gml-1",
            "night-witch-1",
            "night-resolve-1",
        ]
    );
}

#[test]
fn step_kinds_serialize_to_the_frontend_tags() {
    let state = full_table();
    let script = build_turn_script(&state);
    let json: Value = serde_json::to_value(&script).expect("serialize script");

    let tags: Vec<&str> = json
        .as_array()
        .expect("script is an array")
        .iter()
        .map(|step| step["kind"].as_str().expect("kind is a string"))
        .collect();
    assert_eq!(
        tags,
        vec![
            "setup",
            "pick-couple",
            "info",
            "pick-salvateur",
            "pick-seer",
            "pick-corbeau",
            "pick-wolves",
            "pick-gml",
            "witch",
            "resolve-night",
        ]
    );
}

#[test]
fn steps_round_trip_through_json() {
    let state = full_table();
    for step in build_turn_script(&state) {
        let json = serde_json::to_string(&step).expect("serialize step");
        let back: Step = serde_json::from_str(&json).expect("deserialize step");
        assert_eq!(back, step);
    }
}

#[test]
fn empty_checklist_and_payload_are_omitted_from_export() {
    let state = full_table();
    let script = build_turn_script(&state);
    let setup = serde_json::to_value(&script[0]).expect("serialize setup");
    assert!(setup.get("checklist").is_none());
    assert!(setup.get("payload").is_none());

    let witch = script
        .iter()
        .find(|s| s.kind == StepKind::Witch)
        .expect("witch step");
    let witch_json = serde_json::to_value(witch).expect("serialize witch");
    assert_eq!(witch_json["checklist"].as_array().map(Vec::len), Some(2));
}

#[test]
fn dawn_payload_lists_killed_ids() {
    let mut session = MjSession::start(
        &names(&[
            roles::VOYANTE,
            roles::SIMPLE_VILLAGEOIS,
            roles::SIMPLE_LOUP_GAROU,
        ]),
        3,
    )
    .expect("valid composition");

    session.with_state_mut(|state| state.set_wolves_target(Some(PlayerId::from("2"))));
    while session
        .current_step()
        .is_some_and(|s| s.kind != StepKind::ResolveNight)
    {
        session.advance();
    }
    session.advance();

    let dawn = session.current_step().expect("dawn step");
    assert_eq!(
        dawn.payload,
        Some(StepPayload::KilledIds(vec![PlayerId::from("2")]))
    );

    let json = serde_json::to_value(dawn).expect("serialize dawn");
    assert_eq!(json["payload"]["killed-ids"][0], "2");
}

#[test]
fn whole_session_export_round_trips_losslessly() {
    let mut session = MjSession::start(
        &names(&[
            roles::VOYANTE,
            roles::SORCIERE,
            roles::SIMPLE_VILLAGEOIS,
            roles::SIMPLE_LOUP_GAROU,
        ]),
        4,
    )
    .expect("valid composition");

    session.advance();
    session.with_state_mut(|state| {
        state.rename_player(&PlayerId::from("1"), "Margot");
        state.set_couple(PlayerId::from("1"), PlayerId::from("3"));
        state.toggle_charmed(&PlayerId::from("4"), true);
        state.set_turn_note(1, "première nuit calme");
    });
    session.advance();

    let exported = serde_json::to_string(&session).expect("serialize session");
    let restored: MjSession = serde_json::from_str(&exported).expect("deserialize session");
    assert_eq!(restored, session);
    assert_eq!(restored.state().players[0].name, "Margot");
    assert_eq!(restored.cursor(), session.cursor());
}
