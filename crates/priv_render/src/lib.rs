//! Human-readable rendering of decoded saves: an annotated text dump of
//! every chunk (unknown bytes shown as hex, never dropped) and a structural
//! JSON view of the container tree.

use priv_core::form::{Form, Record};
use priv_core::header::{
    CHUNK_EQUIPMENT, CHUNK_FLAGS, CHUNK_JUMPS, CHUNK_MISSION_BASE, CHUNK_SCORE,
};
use priv_core::reader;
use priv_core::savedata::{GameVariant, Savedata};
use priv_core::tables;
use serde_json::{Value, json};

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn push(out: &mut Vec<String>, indent: usize, line: impl Into<String>) {
    out.push(format!("{}{}", "  ".repeat(indent), line.into()));
}

fn name_or_id(table: &[(u8, &'static str)], id: u8, what: &str) -> String {
    tables::lookup(table, id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{what} {id}"))
}

/// Per-faction i16 pairs, used by both kill counts and reputation.
fn faction_pairs(data: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, name) in tables::FACTIONS.iter().enumerate() {
        if let Some(v) = reader::i16_le_at(data, 2 * i) {
            lines.push(format!("{name}: {v}"));
        }
    }
    lines
}

/// One record, interpreted by name (and, for the INFO records, by the
/// subform it sits in).
fn render_record(out: &mut Vec<String>, indent: usize, parent: &str, record: &Record, game: GameVariant) {
    let data = &record.data;
    match record.name.as_str() {
        "SCOR" => {
            let score = reader::u32_le_at(data, 0).unwrap_or(0);
            push(out, indent, format!("SCOR score: {score}"));
        }
        "KILL" => {
            push(out, indent, "KILL kills:");
            for line in faction_pairs(data) {
                push(out, indent + 1, line);
            }
        }
        "ORIG" => {
            push(out, indent, "ORIG reputation:");
            for line in faction_pairs(data) {
                push(out, indent + 1, line);
            }
        }
        "GUNS" => {
            push(out, indent, "GUNS:");
            for pair in data.chunks_exact(2) {
                push(
                    out,
                    indent + 1,
                    format!(
                        "{}: {}",
                        name_or_id(tables::GUN_MOUNTS, pair[0], "mount"),
                        tables::gun_name(game, pair[1])
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("gun {}", pair[1])),
                    ),
                );
            }
        }
        "LNCH" => {
            push(out, indent, "LNCH:");
            for pair in data.chunks_exact(2) {
                push(
                    out,
                    indent + 1,
                    format!(
                        "{} on {}",
                        name_or_id(tables::LAUNCHERS, pair[0], "launcher"),
                        name_or_id(tables::GUN_MOUNTS, pair[1], "mount"),
                    ),
                );
            }
        }
        "MISL" => {
            push(out, indent, "MISL:");
            for pair in data.chunks_exact(2) {
                push(
                    out,
                    indent + 1,
                    format!("{} x{}", name_or_id(tables::MISSILES, pair[0], "missile"), pair[1]),
                );
            }
        }
        "TRRT" => {
            push(out, indent, "TRRT:");
            for &id in data {
                push(out, indent + 1, name_or_id(tables::TURRETS, id, "turret"));
            }
        }
        "CRGI" => {
            let credits = reader::u32_le_at(data, 0).unwrap_or(0);
            push(out, indent, format!("CRGI credits: {credits}"));
            if let Some(&cap) = data.get(4) {
                push(out, indent + 1, format!("capacity: {cap}"));
            }
            if let Some(&secret) = data.get(6) {
                push(out, indent + 1, format!("secret compartment: {}", secret & 1 != 0));
            }
            if let Some(&expanded) = data.get(7) {
                push(out, indent + 1, format!("expanded hold: {}", expanded & 1 != 0));
            }
        }
        "DATA" if parent == "CRGO" => {
            push(out, indent, "DATA cargo:");
            for entry in data.chunks_exact(4) {
                push(
                    out,
                    indent + 1,
                    format!("{} x{}", name_or_id(tables::CARGO, entry[0], "cargo"), entry[2]),
                );
            }
        }
        "ARMR" => {
            push(out, indent, "ARMR armor:");
            for (quad, i) in ["front", "rear", "left", "right"].iter().zip(0..) {
                if let Some(v) = reader::i16_le_at(data, 2 * i) {
                    push(out, indent + 1, format!("{quad}: {v}"));
                }
            }
        }
        "INFO" if parent == "SHLD" => {
            let level = data
                .get(8)
                .map(|&b| b.wrapping_sub(tables::SHIELD_BASE))
                .unwrap_or(0);
            push(out, indent, format!("INFO shields: level {level}"));
        }
        "INFO" if parent == "TRGT" => {
            // The "TARGETNG" tag is 8 bytes with no terminator.
            let scanner = data
                .get(8)
                .map(|&b| b.wrapping_sub(tables::SCANNER_BASE))
                .unwrap_or(0);
            push(
                out,
                indent,
                format!("INFO scanner: {}", name_or_id(tables::SCANNERS, scanner, "scanner")),
            );
        }
        "INFO" if parent == "ENER" => {
            let descriptor = data.get(8..).unwrap_or_default();
            push(
                out,
                indent,
                format!("INFO engine: {}", reader::cstring_at(descriptor)),
            );
        }
        "NAVQ" => {
            let held = data.first().copied().unwrap_or(0);
            push(out, indent, "NAVQ quadrant maps:");
            if held == 15 {
                push(out, indent + 1, "All");
            } else {
                for &(bit, name) in tables::QUADRANTS {
                    if held & (1 << bit) != 0 {
                        push(out, indent + 1, name);
                    }
                }
            }
        }
        "REPR" => {
            let droid = match reader::i16_le_at(data, 0) {
                Some(id) => tables::REPAIR_DROIDS
                    .iter()
                    .find(|&&(k, _)| k == id)
                    .map(|&(_, name)| name.to_string())
                    .unwrap_or_else(|| format!("droid {id}")),
                None => format!("[{} bytes] {}", data.len(), hex(data)),
            };
            push(out, indent, format!("REPR repair droid: {droid}"));
        }
        "CARG" => {
            let dest = data.first().copied().unwrap_or(0);
            let dest = tables::base_name(game, dest).unwrap_or_else(|| format!("base {dest}"));
            push(out, indent, format!("CARG mission cargo for {dest}"));
        }
        "PAYS" => {
            let pay = reader::u32_le_at(data, 0).unwrap_or(0);
            push(out, indent, format!("PAYS payment: {pay}"));
        }
        "TEXT" => {
            push(out, indent, format!("TEXT {:?}", reader::cstring_at(data)));
        }
        "AFTB" => push(out, indent, "AFTB afterburner fitted"),
        "ECMS" => {
            let level = data.first().copied().unwrap_or(0);
            push(out, indent, format!("ECMS ecm: {level}%"));
        }
        _ => {
            push(
                out,
                indent,
                format!("{} [{} bytes] {}", record.name, data.len(), hex(data)),
            );
        }
    }
}

pub fn render_form(out: &mut Vec<String>, indent: usize, form: &Form, game: GameVariant) {
    push(out, indent, format!("FORM {}", form.name));
    let mut subforms = form.subforms.iter();
    for record in &form.records {
        if record.name == "FORM" {
            if let Some(sub) = subforms.next() {
                render_form(out, indent + 1, sub, game);
                continue;
            }
        }
        render_record(out, indent + 1, &form.name, record, game);
    }
    if !form.footer.is_empty() {
        push(out, indent + 1, format!("footer [{} bytes] {}", form.footer.len(), hex(&form.footer)));
    }
}

fn render_flags(out: &mut Vec<String>, save: &Savedata, game: GameVariant) {
    let Some(blob) = save.blobs.get(&CHUNK_FLAGS) else {
        return;
    };
    push(out, 0, format!("FLAGS [{} bytes], set:", blob.len()));
    for (i, &v) in blob.iter().enumerate().skip(11) {
        if v != 0 {
            let n = i - 11;
            let label = tables::flag_name(game, n).unwrap_or_else(|| format!("flag {n}"));
            push(out, 1, label);
        }
    }
}

/// The full annotated dump of a save.
pub fn render_savedata(save: &Savedata, game: GameVariant) -> String {
    let mut out = Vec::new();

    push(&mut out, 0, format!("Identity: {}", save.identity()));
    if let Some(ship) = save.ship() {
        push(
            &mut out,
            0,
            format!("Ship: {}", name_or_id(tables::SHIPS, ship, "ship")),
        );
    }
    if let Some(location) = save.location() {
        let name = tables::base_name(game, location).unwrap_or_else(|| format!("base {location}"));
        push(&mut out, 0, format!("Location: {name}"));
    }
    if let Some(plot) = save.plot_info() {
        let status = if plot.failed() {
            "failed".to_string()
        } else if !plot.started() {
            "not started".to_string()
        } else if plot.completed() {
            format!("{} (completed)", plot.mission)
        } else {
            plot.mission.clone()
        };
        push(&mut out, 0, format!("Plot: {status}"));
    }
    if let Some(n) = save.mission_count() {
        push(&mut out, 0, format!("Missions flown: {n}"));
    }

    if let Some(form) = save.forms.get(&CHUNK_SCORE) {
        render_form(&mut out, 0, form, game);
    }
    render_flags(&mut out, save, game);
    if let Some(form) = save.forms.get(&CHUNK_JUMPS) {
        render_form(&mut out, 0, form, game);
    }
    if let Some(form) = save.forms.get(&CHUNK_EQUIPMENT) {
        render_form(&mut out, 0, form, game);
    }
    for n in 0..save.missions() {
        if let Some(s) = save.strings.get(&(CHUNK_MISSION_BASE + 2 * n)) {
            push(&mut out, 0, format!("Mission {n}: {:?}", s.value));
        }
        if let Some(form) = save.mission_form(n) {
            render_form(&mut out, 1, form, game);
        }
    }

    out.join("\n")
}

/// Structural JSON view of one form, record payloads as hex.
pub fn form_to_json(form: &Form) -> Value {
    let mut subforms = form.subforms.iter();
    let records: Vec<Value> = form
        .records
        .iter()
        .map(|record| {
            if record.name == "FORM" {
                if let Some(sub) = subforms.next() {
                    return form_to_json(sub);
                }
            }
            json!({
                "name": record.name,
                "len": record.data.len(),
                "data": hex(&record.data),
            })
        })
        .collect();
    json!({
        "form": form.name,
        "records": records,
        "footer": hex(&form.footer),
    })
}

pub fn savedata_to_json(save: &Savedata, game: GameVariant) -> Value {
    let forms: Vec<Value> = save.forms.values().map(form_to_json).collect();
    json!({
        "identity": save.identity(),
        "game": game.to_string(),
        "missions": save.missions(),
        "forms": forms,
        "blobs": save
            .blobs
            .iter()
            .map(|(k, v)| json!({"chunk": k, "data": hex(v)}))
            .collect::<Vec<Value>>(),
    })
}
