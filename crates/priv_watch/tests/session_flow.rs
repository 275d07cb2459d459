use std::fs;

use priv_core::form::{Form, Record};
use priv_core::header::{CHUNK_EQUIPMENT, CHUNK_SCORE};
use priv_core::savedata::{PaddedString, Savedata};
use priv_watch::{AchState, Session};

fn sample_save() -> Savedata {
    let mut save = Savedata::new();
    save.blobs.insert(0, vec![0, 0, 15, 0]);
    let mut plot = b"s2mb\0".to_vec();
    plot.resize(9, 0);
    plot.push(1);
    save.blobs.insert(1, plot);
    save.blobs.insert(2, vec![0, 0]);
    save.blobs.insert(4, vec![0; 200]);

    let mut score = Form::new("PLAY");
    let mut kills = vec![3i16, 0, 0, 12, 0, 0, 0, 0]
        .into_iter()
        .flat_map(|k: i16| k.to_le_bytes())
        .collect::<Vec<u8>>();
    kills.resize(16, 0);
    score.push_record(Record::new("KILL", kills));
    save.forms.insert(CHUNK_SCORE, score);
    save.forms.insert(5, Form::new("SSSS"));

    let mut crgo = Form::new("CRGO");
    crgo.push_record(Record::new("CRGI", vec![0x20, 0x4E, 0, 0, 50, 0, 0, 0]));
    let mut fite = Form::new("FITE");
    fite.push_subform(crgo);
    save.forms.insert(CHUNK_EQUIPMENT, fite);

    save.strings.insert(7, PaddedString { value: "Burrows".into(), slot_len: 16 });
    save.strings.insert(8, PaddedString { value: "Ace".into(), slot_len: 15 });
    save
}

#[test]
fn achievements_unlock_once_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("PRIV0.SAV");
    fs::write(&save_path, sample_save().write().unwrap()).unwrap();
    let state_path = dir.path().join("pracst.json");

    let mut session = Session::new(state_path.clone());
    let earned = session.handle_file(&save_path);
    assert!(earned.iter().any(|u| u.id == "plot_started"), "{earned:?}");

    // Same file again: nothing new.
    assert!(session.handle_file(&save_path).is_empty());

    // The state survived on disk and a fresh session honors it.
    let reloaded = AchState::load(&state_path);
    assert!(reloaded.is_unlocked("Burrows:Ace", "plot_started"));
    let mut fresh = Session::new(state_path);
    assert!(fresh.handle_file(&save_path).is_empty());
}

#[test]
fn discoveries_accumulate_in_the_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("PRIV0.SAV");
    fs::write(&save_path, sample_save().write().unwrap()).unwrap();
    let state_path = dir.path().join("pracst.json");

    let mut session = Session::new(state_path);
    session.handle_file(&save_path);
    let visited = &session.state().visited["Burrows:Ace"];
    assert!(visited.contains(&priv_core::tables::BASE_HECTOR));
    assert!(visited.contains(&priv_core::tables::BASE_NEW_DETROIT));
}

#[test]
fn unparseable_files_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("JUNK.SAV");
    fs::write(&bad, [0u8; 10]).unwrap();
    let good = dir.path().join("PRIV0.SAV");
    fs::write(&good, sample_save().write().unwrap()).unwrap();
    let state_path = dir.path().join("pracst.json");

    let mut session = Session::new(state_path);
    assert!(session.handle_file(&bad).is_empty());
    // The session keeps working afterwards.
    assert!(!session.handle_file(&good).is_empty());
}

#[test]
fn corrupt_state_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("pracst.json");
    fs::write(&state_path, b"not json").unwrap();
    assert_eq!(AchState::load(&state_path), AchState::default());
}

#[test]
fn prs_extension_selects_the_expansion_rules() {
    let mut save = sample_save();
    // Mark the content as Righteous Fire and set the Tayla chain done.
    save.forms
        .get_mut(&CHUNK_EQUIPMENT)
        .unwrap()
        .get_mut(&["FITE", "CRGO", "CRGI"])
        .unwrap()
        .data[5] = 1;
    for flag in [
        priv_core::tables::RF_FLAG_TAYLA_1_DONE,
        priv_core::tables::RF_FLAG_TAYLA_2_DONE,
        priv_core::tables::RF_FLAG_TAYLA_3_DONE,
        priv_core::tables::RF_FLAG_TAYLA_4_DONE,
    ] {
        save.blobs.get_mut(&4).unwrap()[11 + flag] = 1;
    }

    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("PRIV0.PRS");
    fs::write(&save_path, save.write().unwrap()).unwrap();

    let mut session = Session::new(dir.path().join("pracst.json"));
    let earned = session.handle_file(&save_path);
    assert!(earned.iter().any(|u| u.id == "rf_tayla"), "{earned:?}");
}
