use std::collections::BTreeSet;

use priv_core::achievements::{self, EvalContext};
use priv_core::form::Record;
use priv_core::header::{CHUNK_PLOT, CHUNK_SCORE, CHUNK_SHIP};
use priv_core::savedata::{GameVariant, Savedata};
use priv_core::tables;

mod common;

fn sample() -> Savedata {
    Savedata::parse(&common::sample_bytes(0)).unwrap()
}

fn result<'a>(
    results: &'a [achievements::RuleResult],
    id: &str,
) -> &'a achievements::RuleResult {
    results
        .iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| panic!("no rule {id}"))
}

fn eval(save: &Savedata, visited: &BTreeSet<u8>, secrets: u8) -> Vec<achievements::RuleResult> {
    let ctx = EvalContext {
        save,
        visited,
        secrets,
    };
    achievements::evaluate_all(GameVariant::Privateer, &ctx)
}

#[test]
fn kill_thresholds_compare_against_the_score_form() {
    let mut save = sample();
    let visited = BTreeSet::new();
    assert!(!result(&eval(&save, &visited, 0), "retro_crusade").unlocked);

    let form = save.forms.get_mut(&CHUNK_SCORE).unwrap();
    *form.get_mut(&["KILL"]).unwrap() = common::kill_record(&[0, 0, 0, 0, 0, 0, 0, 150]);
    assert!(result(&eval(&save, &visited, 0), "retro_crusade").unlocked);
}

#[test]
fn plot_rules_track_the_stage_id() {
    let mut save = sample();
    let visited = BTreeSet::new();

    // Fixture sits at s2mb: started, Oxford chain not yet done.
    let results = eval(&save, &visited, 0);
    assert!(result(&results, "plot_started").unlocked);
    assert!(!result(&results, "plot_oxford").unlocked);
    assert!(!result(&results, "plot_finished").unlocked);

    save.blobs.get_mut(&CHUNK_PLOT).unwrap()[..5].copy_from_slice(b"s7mb\0");
    let results = eval(&save, &visited, 0);
    assert!(result(&results, "plot_finished").unlocked);
    assert!(result(&results, "tarsus_endgame").unlocked);
}

#[test]
fn failed_plot_unlocks_only_the_failure_rule() {
    let mut save = sample();
    let plot = save.blobs.get_mut(&CHUNK_PLOT).unwrap();
    plot[..9].copy_from_slice(b"FFFFFFFF\0");
    plot[9] = 0;
    let visited = BTreeSet::new();
    let results = eval(&save, &visited, 0);
    assert!(result(&results, "plot_failed").unlocked);
    assert!(!result(&results, "plot_started").unlocked);
}

#[test]
fn visit_rules_report_progress_while_locked() {
    let save = sample();
    let mut visited = BTreeSet::new();
    visited.insert(tables::BASE_OAKHAM);
    let results = eval(&save, &visited, 0);
    let tour = result(&results, "pirate_tour");
    assert!(!tour.unlocked);
    assert_eq!(tour.progress.as_deref(), Some("1/2"));

    visited.insert(tables::BASE_TUCKS);
    let results = eval(&save, &visited, 0);
    let tour = result(&results, "pirate_tour");
    assert!(tour.unlocked);
    assert_eq!(tour.progress.as_deref(), Some("2/2"));
}

#[test]
fn broken_rule_data_downgrades_to_locked_with_an_error() {
    let mut save = sample();
    let form = save.forms.get_mut(&CHUNK_SCORE).unwrap();
    form.records.retain(|r| r.name != "KILL");

    let visited = BTreeSet::new();
    let results = eval(&save, &visited, 0);
    let r = result(&results, "retro_crusade");
    assert!(!r.unlocked);
    assert!(r.error.is_some());
    // Rules that do not touch kill counts are unaffected.
    assert!(result(&results, "plot_started").unlocked);
    assert!(result(&results, "plot_started").error.is_none());
}

#[test]
fn discoveries_accumulate_plot_implied_stops() {
    let save = sample(); // plot at s2mb, docked at Hector
    let mut visited = BTreeSet::new();
    let mut secrets = 0u8;
    achievements::update_discoveries(&save, &mut visited, &mut secrets);

    assert!(visited.contains(&tables::BASE_HECTOR));
    assert!(visited.contains(&tables::BASE_NEW_DETROIT)); // s0ma
    assert!(visited.contains(&tables::BASE_OAKHAM)); // s1mb
    assert!(visited.contains(&tables::BASE_NEW_CONSTANTINOPLE)); // s1md
    assert!(!visited.contains(&tables::BASE_OXFORD)); // s3ma is later
}

#[test]
fn steltek_gun_implies_the_derelict() {
    let mut save = sample();
    let mut visited = BTreeSet::new();
    let mut secrets = 0u8;
    achievements::update_discoveries(&save, &mut visited, &mut secrets);
    assert!(!visited.contains(&tables::BASE_DERELICT));

    save.equipment_mut()
        .unwrap()
        .get_mut(&["FITE", "WEAP", "GUNS"])
        .unwrap()
        .data = vec![2, tables::GUN_STELTEK];
    achievements::update_discoveries(&save, &mut visited, &mut secrets);
    assert!(visited.contains(&tables::BASE_DERELICT));
}

#[test]
fn secret_compartment_bit_sticks_per_hull() {
    let mut save = sample();
    save.equipment_mut()
        .unwrap()
        .get_mut(&["FITE", "CRGO", "CRGI"])
        .unwrap()
        .data[6] = 1;

    let mut visited = BTreeSet::new();
    let mut secrets = 0u8;
    achievements::update_discoveries(&save, &mut visited, &mut secrets);
    assert_eq!(secrets, 1 << tables::SHIP_TARSUS);

    // Changing hulls keeps the old bit.
    save.blobs.get_mut(&CHUNK_SHIP).unwrap()[0] = tables::SHIP_GALAXY;
    achievements::update_discoveries(&save, &mut visited, &mut secrets);
    assert_eq!(
        secrets,
        1 << tables::SHIP_TARSUS | 1 << tables::SHIP_GALAXY
    );
}

#[test]
fn rf_rules_join_in_for_expansion_saves() {
    let mut save = sample();
    save.equipment_mut()
        .unwrap()
        .get_mut(&["FITE", "CRGO", "CRGI"])
        .unwrap()
        .data[5] = 1;
    assert_eq!(save.detected_game(), GameVariant::RighteousFire);

    for flag in [
        tables::RF_FLAG_TAYLA_1_DONE,
        tables::RF_FLAG_TAYLA_2_DONE,
        tables::RF_FLAG_TAYLA_3_DONE,
        tables::RF_FLAG_TAYLA_4_DONE,
    ] {
        save.blobs.get_mut(&4).unwrap()[11 + flag] = 1;
    }

    let visited = BTreeSet::new();
    let ctx = EvalContext {
        save: &save,
        visited: &visited,
        secrets: 0,
    };
    let base = achievements::evaluate_all(GameVariant::Privateer, &ctx);
    assert!(!base.iter().any(|r| r.id == "rf_tayla"));

    let rf = achievements::evaluate_all(GameVariant::RighteousFire, &ctx);
    assert!(result(&rf, "rf_tayla").unlocked);
    assert!(!result(&rf, "rf_murphy").unlocked);
}
