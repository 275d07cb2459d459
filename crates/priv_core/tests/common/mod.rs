use priv_core::form::{Form, Record};
use priv_core::header::{CHUNK_MISSION_BASE, CHUNK_SCORE};
use priv_core::savedata::{PaddedString, Savedata};

// Synthetic save construction shared by the integration tests. The values
// are arbitrary but stable; tests assert against them.

pub fn kill_record(counts: &[i16]) -> Record {
    let mut data = Vec::new();
    for c in counts {
        data.extend_from_slice(&c.to_le_bytes());
    }
    Record::new("KILL", data)
}

fn score_form() -> Form {
    let mut form = Form::new("PLAY");
    form.push_record(Record::new("SCOR", vec![10, 0, 0, 0]));
    form.push_record(kill_record(&[3, 0, 0, 12, 0, 7, 0, 25]));
    form.push_record(Record::new("ORIG", vec![0; 16]));
    form
}

fn jumps_form() -> Form {
    let mut form = Form::new("SSSS");
    form.push_record(Record::new("JUMP", vec![0, 1]));
    form
}

pub fn equipment_form() -> Form {
    let mut weap = Form::new("WEAP");
    weap.push_record(Record::new("GUNS", vec![2, 5, 3, 5]));
    weap.push_record(Record::new("LNCH", vec![50, 5]));

    let mut crgo = Form::new("CRGO");
    // credits 20000 LE, capacity, unknown, game byte, secret, expanded
    crgo.push_record(Record::new("CRGI", vec![0x20, 0x4E, 0, 0, 50, 0, 0, 0]));
    crgo.push_record(Record::new("DATA", vec![27, 0, 5, 0]));

    let mut shld = Form::new("SHLD");
    let mut shield_info = b"SHIELDS\0".to_vec();
    shield_info.push(89 + 2);
    shld.push_record(Record::new("INFO", shield_info));
    shld.push_record(Record::new("ARMR", vec![0; 8]));

    // "TARGETNG" carries no terminator; the scanner id byte follows it.
    let mut trgt = Form::new("TRGT");
    let mut trgt_info = b"TARGETNG".to_vec();
    trgt_info.push(60 + 2);
    trgt.push_record(Record::new("INFO", trgt_info));

    let mut ener = Form::new("ENER");
    ener.push_record(Record::new("INFO", b"ENERGY\0\0Mk2\0".to_vec()));

    let mut fite = Form::new("FITE");
    fite.push_record(Record::new("AFTB", vec![1, 0]));
    fite.push_subform(weap);
    fite.push_subform(crgo);
    fite.push_subform(shld);
    fite.push_subform(trgt);
    fite.push_subform(ener);
    fite
}

fn mission_form() -> Form {
    let mut scrp = Form::new("SCRP");
    scrp.push_record(Record::new("PROG", vec![1, 0]));
    let mut mssn = Form::new("MSSN");
    mssn.push_subform(scrp);
    mssn.push_record(Record::new("CARG", vec![49, 0, 10, 0]));
    mssn
}

/// A complete well-formed save with the given number of active missions.
pub fn sample_save(missions: usize) -> Savedata {
    let mut save = Savedata::new();

    // ship 0 (Tarsus); byte 1 always zero; docked at base 15 (Hector)
    save.blobs.insert(0, vec![0, 0, 15, 0]);
    let mut plot = b"s2mb\0".to_vec();
    plot.resize(9, 0);
    plot.push(1);
    save.blobs.insert(1, plot);
    save.blobs
        .insert(2, (missions as i16).to_le_bytes().to_vec());
    save.blobs.insert(4, vec![0; 11 + 200]);

    save.forms.insert(CHUNK_SCORE, score_form());
    save.forms.insert(5, jumps_form());
    save.forms.insert(6, equipment_form());

    save.strings.insert(7, PaddedString {
        value: "Burrows".to_string(),
        slot_len: 16,
    });
    save.strings.insert(8, PaddedString {
        value: "Ace".to_string(),
        slot_len: 15,
    });

    for n in 0..missions {
        save.strings.insert(CHUNK_MISSION_BASE + 2 * n, PaddedString {
            value: format!("mission{n}"),
            slot_len: 12,
        });
        save.forms
            .insert(CHUNK_MISSION_BASE + 2 * n + 1, mission_form());
    }
    save
}

pub fn sample_bytes(missions: usize) -> Vec<u8> {
    sample_save(missions)
        .write()
        .unwrap_or_else(|e| panic!("sample save must encode: {e}"))
}
