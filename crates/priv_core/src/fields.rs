use std::fmt;

use crate::error::{FieldError, FieldErrorCode};
use crate::fuzzy::{self, MatchError};
use crate::header::{CHUNK_CALLSIGN, CHUNK_MISSIONS, CHUNK_NAME, CHUNK_SHIP};
use crate::reader;
use crate::savedata::{GameVariant, Savedata};
use crate::tables;

/// Value read from a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Str(String),
    /// Equipment lists, e.g. (mount, gun) pairs rendered symbolically.
    Pairs(Vec<(String, String)>),
    /// The query was well-formed but the backing record is not in this save.
    Nonexistent,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Str(s) => write!(f, "{s}"),
            FieldValue::Pairs(pairs) => {
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                Ok(())
            }
            FieldValue::Nonexistent => write!(f, "Nonexistent"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Location {
    BlobByte { chunk: usize, offset: usize },
    BlobI16 { chunk: usize, offset: usize },
    FormU32 { path: &'static [&'static str], offset: usize },
    FormByte { path: &'static [&'static str], offset: usize, bias: u8 },
    FormString { path: &'static [&'static str], offset: usize },
    ChunkString { chunk: usize },
    GunList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Legend {
    None,
    Ships,
    Bases,
    Scanners,
}

struct FieldSpec {
    name: &'static str,
    loc: Location,
    legend: Legend,
}

const EQ_CRGI: &[&str] = &["FITE", "CRGO", "CRGI"];
const EQ_SHIELDS: &[&str] = &["FITE", "SHLD", "INFO"];
const EQ_SCANNER: &[&str] = &["FITE", "TRGT", "INFO"];
const EQ_ENGINE: &[&str] = &["FITE", "ENER", "INFO"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "ship",
        loc: Location::BlobByte { chunk: CHUNK_SHIP, offset: 0 },
        legend: Legend::Ships,
    },
    FieldSpec {
        name: "location",
        loc: Location::BlobByte { chunk: CHUNK_SHIP, offset: 2 },
        legend: Legend::Bases,
    },
    FieldSpec {
        name: "credits",
        loc: Location::FormU32 { path: EQ_CRGI, offset: 0 },
        legend: Legend::None,
    },
    FieldSpec {
        name: "cargo capacity",
        loc: Location::FormByte { path: EQ_CRGI, offset: 4, bias: 0 },
        legend: Legend::None,
    },
    FieldSpec {
        name: "shields",
        loc: Location::FormByte { path: EQ_SHIELDS, offset: 8, bias: tables::SHIELD_BASE },
        legend: Legend::None,
    },
    FieldSpec {
        // Right after the 8-byte "TARGETNG" tag, which carries no NUL.
        name: "scanner",
        loc: Location::FormByte { path: EQ_SCANNER, offset: 8, bias: tables::SCANNER_BASE },
        legend: Legend::Scanners,
    },
    FieldSpec {
        // The descriptor sits past the 8-byte "ENERGY" type tag.
        name: "engine",
        loc: Location::FormString { path: EQ_ENGINE, offset: 8 },
        legend: Legend::None,
    },
    FieldSpec {
        name: "name",
        loc: Location::ChunkString { chunk: CHUNK_NAME },
        legend: Legend::None,
    },
    FieldSpec {
        name: "callsign",
        loc: Location::ChunkString { chunk: CHUNK_CALLSIGN },
        legend: Legend::None,
    },
    FieldSpec {
        name: "mission count",
        loc: Location::BlobI16 { chunk: CHUNK_MISSIONS, offset: 0 },
        legend: Legend::None,
    },
    FieldSpec {
        name: "guns",
        loc: Location::GunList,
        legend: Legend::None,
    },
];

pub fn field_names() -> Vec<&'static str> {
    FIELDS.iter().map(|f| f.name).collect()
}

fn field_error(code: FieldErrorCode, message: impl Into<String>) -> FieldError {
    FieldError::new(code, message)
}

fn from_match_error(err: MatchError, missing: FieldErrorCode) -> FieldError {
    match err {
        MatchError::NotFound { .. } => field_error(missing, err.to_string()),
        MatchError::Ambiguous { .. } => {
            field_error(FieldErrorCode::AmbiguousMatch, err.to_string())
        }
    }
}

fn find_field(name: &str) -> Result<&'static FieldSpec, FieldError> {
    let candidates: Vec<(String, usize)> = FIELDS
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name.to_string(), i))
        .collect();
    let index = fuzzy::resolve(name, &candidates)
        .map_err(|e| from_match_error(e, FieldErrorCode::NoSuchField))?;
    Ok(&FIELDS[index])
}

fn legend_table(legend: Legend) -> Option<Vec<(String, u8)>> {
    match legend {
        Legend::None => None,
        Legend::Ships => Some(
            tables::SHIPS
                .iter()
                .map(|&(id, name)| (name.to_string(), id))
                .collect(),
        ),
        Legend::Bases => Some(
            tables::BASES
                .iter()
                .map(|b| (b.name.to_string(), b.id))
                .collect(),
        ),
        Legend::Scanners => Some(
            tables::SCANNERS
                .iter()
                .map(|&(id, name)| (name.to_string(), id))
                .collect(),
        ),
    }
}

fn legend_name(legend: Legend, id: u8) -> Option<String> {
    let table = legend_table(legend)?;
    table
        .into_iter()
        .find(|&(_, v)| v == id)
        .map(|(name, _)| name)
}

/// Read a field. Absent backing data reads as `Nonexistent`, not an error.
pub fn get(save: &Savedata, field: &str) -> Result<FieldValue, FieldError> {
    let spec = find_field(field)?;
    let value = match spec.loc {
        Location::BlobByte { chunk, offset } => {
            match save.blobs.get(&chunk).and_then(|b| b.get(offset)) {
                Some(&v) => match legend_name(spec.legend, v) {
                    Some(name) => FieldValue::Str(name),
                    None => FieldValue::Int(v as i64),
                },
                None => FieldValue::Nonexistent,
            }
        }
        Location::BlobI16 { chunk, offset } => {
            match save
                .blobs
                .get(&chunk)
                .and_then(|b| reader::i16_le_at(b, offset))
            {
                Some(v) => FieldValue::Int(v as i64),
                None => FieldValue::Nonexistent,
            }
        }
        Location::FormU32 { path, offset } => {
            match save
                .equipment()
                .and_then(|f| f.get(path))
                .and_then(|r| reader::u32_le_at(&r.data, offset))
            {
                Some(v) => FieldValue::Int(v as i64),
                None => FieldValue::Nonexistent,
            }
        }
        Location::FormByte { path, offset, bias } => {
            match save
                .equipment()
                .and_then(|f| f.get(path))
                .and_then(|r| r.data.get(offset).copied())
            {
                Some(raw) => {
                    let v = raw.wrapping_sub(bias);
                    match legend_name(spec.legend, v) {
                        Some(name) => FieldValue::Str(name),
                        None => FieldValue::Int(v as i64),
                    }
                }
                None => FieldValue::Nonexistent,
            }
        }
        Location::FormString { path, offset } => {
            match save.equipment().and_then(|f| f.get(path)) {
                Some(r) if r.data.len() > offset => {
                    FieldValue::Str(reader::cstring_at(&r.data[offset..]))
                }
                _ => FieldValue::Nonexistent,
            }
        }
        Location::ChunkString { chunk } => match save.strings.get(&chunk) {
            Some(s) => FieldValue::Str(s.value.clone()),
            None => FieldValue::Nonexistent,
        },
        Location::GunList => {
            let game = save.detected_game();
            let pairs = save
                .guns()
                .into_iter()
                .map(|(mount, gun)| {
                    let mount_name = tables::lookup(tables::GUN_MOUNTS, mount)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("mount {mount}"));
                    let gun_name = tables::gun_name(game, gun)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("gun {gun}"));
                    (mount_name, gun_name)
                })
                .collect();
            FieldValue::Pairs(pairs)
        }
    };
    Ok(value)
}

fn parse_int(value: &str) -> Result<i64, FieldError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| field_error(FieldErrorCode::BadValue, format!("{value:?} is not a number")))
}

fn resolve_value(spec: &FieldSpec, value: &str) -> Result<i64, FieldError> {
    if let Some(table) = legend_table(spec.legend) {
        if let Ok(id) = fuzzy::resolve(value, &table) {
            return Ok(id as i64);
        }
    }
    parse_int(value)
}

fn check_range(v: i64, min: i64, max: i64) -> Result<(), FieldError> {
    if v < min || v > max {
        return Err(field_error(
            FieldErrorCode::BadValue,
            format!("{v} is out of range {min}..={max}"),
        ));
    }
    Ok(())
}

/// Records the accessor may create when absent. Everything else that is
/// missing is a `FieldNotFound` error on write.
const SYNTHESIZABLE: &[&str] = &["GUNS", "LNCH", "TRRT"];

fn record_data_mut<'a>(
    save: &'a mut Savedata,
    path: &[&str],
    min_len: usize,
) -> Result<&'a mut Vec<u8>, FieldError> {
    let not_found = || {
        field_error(
            FieldErrorCode::FieldNotFound,
            format!("no {} record in this save", path.join("/")),
        )
    };
    let form = save.equipment_mut().ok_or_else(not_found)?;

    if form.get(path).is_none() {
        let leaf = *path.last().ok_or_else(not_found)?;
        if !SYNTHESIZABLE.contains(&leaf) {
            return Err(not_found());
        }
        let parent = form.parent_form_mut(path).ok_or_else(not_found)?;
        parent.push_record(crate::form::Record::new(leaf, Vec::new()));
    }

    let record = form.get_mut(path).ok_or_else(not_found)?;
    if record.data.len() < min_len {
        return Err(field_error(
            FieldErrorCode::FieldNotFound,
            format!("{} record is too short to hold this field", path.join("/")),
        ));
    }
    Ok(&mut record.data)
}

/// Write a field. Symbolic values resolve through the same legends that
/// `get` prints, so `set ship Centurion` and `set ship 2` are equivalent.
pub fn set(save: &mut Savedata, field: &str, value: &str) -> Result<(), FieldError> {
    let spec = find_field(field)?;
    match spec.loc {
        Location::BlobByte { chunk, offset } => {
            let v = resolve_value(spec, value)?;
            check_range(v, 0, u8::MAX as i64)?;
            let blob = save.blobs.get_mut(&chunk).ok_or_else(|| {
                field_error(FieldErrorCode::FieldNotFound, "chunk missing from save")
            })?;
            match blob.get_mut(offset) {
                Some(slot) => *slot = v as u8,
                None => {
                    return Err(field_error(
                        FieldErrorCode::FieldNotFound,
                        "chunk too short for this field",
                    ));
                }
            }
        }
        Location::BlobI16 { chunk, offset } => {
            let v = parse_int(value)?;
            check_range(v, i16::MIN as i64, i16::MAX as i64)?;
            let blob = save.blobs.get_mut(&chunk).ok_or_else(|| {
                field_error(FieldErrorCode::FieldNotFound, "chunk missing from save")
            })?;
            if blob.len() < offset + 2 {
                return Err(field_error(
                    FieldErrorCode::FieldNotFound,
                    "chunk too short for this field",
                ));
            }
            blob[offset..offset + 2].copy_from_slice(&(v as i16).to_le_bytes());
        }
        Location::FormU32 { path, offset } => {
            let v = parse_int(value)?;
            check_range(v, 0, u32::MAX as i64)?;
            let data = record_data_mut(save, path, offset + 4)?;
            data[offset..offset + 4].copy_from_slice(&(v as u32).to_le_bytes());
        }
        Location::FormByte { path, offset, bias } => {
            let v = resolve_value(spec, value)?;
            check_range(v, 0, (u8::MAX - bias) as i64)?;
            let data = record_data_mut(save, path, offset + 1)?;
            data[offset] = (v as u8).wrapping_add(bias);
        }
        Location::FormString { path, offset } => {
            let data = record_data_mut(save, path, offset)?;
            if offset + value.len() + 1 > data.len() {
                return Err(field_error(
                    FieldErrorCode::TooLong,
                    format!("{value:?} does not fit this record"),
                ));
            }
            data[offset..offset + value.len()].copy_from_slice(value.as_bytes());
            for b in &mut data[offset + value.len()..] {
                *b = 0;
            }
        }
        Location::ChunkString { chunk } => {
            let slot = save.strings.get_mut(&chunk).ok_or_else(|| {
                field_error(FieldErrorCode::FieldNotFound, "chunk missing from save")
            })?;
            if value.len() + 1 > slot.slot_len {
                return Err(field_error(
                    FieldErrorCode::TooLong,
                    format!("{value:?} does not fit a {}-byte slot", slot.slot_len),
                ));
            }
            slot.value = value.to_string();
        }
        Location::GunList => set_gun(save, value)?,
    }
    Ok(())
}

/// `set guns "mount:gun"` updates or adds a mount; `mount:empty` clears it.
fn set_gun(save: &mut Savedata, value: &str) -> Result<(), FieldError> {
    let (mount_str, gun_str) = value.split_once(':').ok_or_else(|| {
        field_error(
            FieldErrorCode::BadValue,
            format!("{value:?} is not mount:gun"),
        )
    })?;

    let mount = fuzzy::resolve_id(mount_str.trim(), tables::GUN_MOUNTS)
        .map_err(|e| from_match_error(e, FieldErrorCode::BadValue))?;

    let gun_str = gun_str.trim();
    let clear = gun_str.eq_ignore_ascii_case("empty") || gun_str == "-";
    let gun = if clear {
        0
    } else {
        let game = save.detected_game();
        let mut table: Vec<(u8, &str)> = tables::GUNS.to_vec();
        table.extend(match game {
            GameVariant::Privateer => tables::GUNS_PRIV,
            GameVariant::RighteousFire => tables::GUNS_RF,
        });
        fuzzy::resolve_id(gun_str, &table)
            .map_err(|e| from_match_error(e, FieldErrorCode::BadValue))?
    };

    let data = record_data_mut(save, &["FITE", "WEAP", "GUNS"], 0)?;
    let slot = data
        .chunks_exact(2)
        .position(|pair| pair[0] == mount)
        .map(|i| 2 * i);
    match (slot, clear) {
        (Some(i), true) => {
            data.drain(i..i + 2);
        }
        (Some(i), false) => data[i + 1] = gun,
        (None, true) => {}
        (None, false) => {
            data.push(mount);
            data.push(gun);
        }
    }
    Ok(())
}

/// Gun mounts each hull actually has. Saves edited by other tools sometimes
/// carry guns on mounts the ship lacks, which crashes the game's hangar.
fn valid_mounts(ship: u8) -> &'static [u8] {
    match ship {
        tables::SHIP_TARSUS => &[2, 3, 5],
        tables::SHIP_ORION => &[2, 3, 5, 7],
        tables::SHIP_CENTURION => &[1, 2, 3, 4, 5, 7],
        tables::SHIP_GALAXY => &[2, 3, 8, 10],
        _ => &[],
    }
}

/// Drop gun entries on mounts the current ship does not have. Returns a
/// description of each repair made.
pub fn sanity_fix(save: &mut Savedata) -> Vec<String> {
    let Some(ship) = save.ship() else {
        return Vec::new();
    };
    let allowed = valid_mounts(ship);
    if allowed.is_empty() {
        return Vec::new();
    }

    let mut repairs = Vec::new();
    if let Some(record) = save
        .equipment_mut()
        .and_then(|f| f.get_mut(&["FITE", "WEAP", "GUNS"]))
    {
        let mut fixed = Vec::with_capacity(record.data.len());
        for pair in record.data.chunks_exact(2) {
            if allowed.contains(&pair[0]) {
                fixed.extend_from_slice(pair);
            } else {
                repairs.push(format!(
                    "removed gun {} from invalid mount {}",
                    pair[1], pair[0]
                ));
            }
        }
        record.data = fixed;
    }
    repairs
}
