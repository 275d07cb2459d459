use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use priv_core::fields;
use priv_core::savedata::{GameVariant, Savedata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(name = "privedit", version, about = "Dump and edit Privateer save files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Session stash file used by load/show/edit/save.
    #[arg(long, value_name = "PATH", default_value = "privedit.stash.json", global = true)]
    stash: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the annotated dump of a save.
    Dump { file: PathBuf },
    /// Print the structural JSON view of a save.
    Json { file: PathBuf },
    /// Read one field.
    Get { file: PathBuf, field: String },
    /// Write one field in place, keeping a .old backup.
    Set {
        file: PathBuf,
        field: String,
        value: String,
    },
    /// Repair known save corruption (guns on impossible mounts) in place.
    Fix { file: PathBuf },
    /// List the editable field names.
    Fields,
    /// Parse a save into the session stash for repeated edits.
    Load { file: PathBuf },
    /// Dump the stashed save.
    Show,
    /// Edit one field of the stashed save.
    Edit { field: String, value: String },
    /// Re-encode the stashed save, to its original path or somewhere else.
    Save { output: Option<PathBuf> },
}

/// What `load` parks on disk between invocations.
#[derive(Debug, Serialize, Deserialize)]
struct Stash {
    filename: PathBuf,
    save: Savedata,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

fn read_save(path: &Path) -> Savedata {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => fail(format_args!("reading {}: {e}", path.display())),
    };
    match Savedata::parse(&bytes) {
        Ok(save) => save,
        Err(e) => fail(format_args!("parsing {}: {e}", path.display())),
    }
}

/// Extension wins for display and rule purposes, but a save whose content
/// disagrees with its extension gets a warning.
fn game_for(path: &Path, save: &Savedata) -> GameVariant {
    let detected = save.detected_game();
    match GameVariant::from_extension(path) {
        Some(ext) => {
            if ext != detected {
                eprintln!(
                    "Warning: {} looks like a {detected} save despite its extension",
                    path.display()
                );
            }
            ext
        }
        None => detected,
    }
}

fn write_save(path: &Path, save: &Savedata, backup: bool) {
    let bytes = match save.write() {
        Ok(b) => b,
        Err(e) => fail(e),
    };
    if backup && path.exists() {
        // PRIV0.SAV backs up as PRIV0.old, replacing the extension.
        let old = path.with_extension("old");
        if let Err(e) = fs::rename(path, &old) {
            fail(format_args!("backing up to {}: {e}", old.display()));
        }
    }
    if let Err(e) = fs::write(path, bytes) {
        fail(format_args!("writing {}: {e}", path.display()));
    }
}

fn load_stash(path: &Path) -> Stash {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => fail(format_args!(
            "no session stash at {} ({e}); run load first",
            path.display()
        )),
    };
    match serde_json::from_slice(&bytes) {
        Ok(stash) => stash,
        Err(e) => fail(format_args!("corrupt stash {}: {e}", path.display())),
    }
}

fn store_stash(path: &Path, stash: &Stash) {
    let json = match serde_json::to_vec_pretty(stash) {
        Ok(j) => j,
        Err(e) => fail(e),
    };
    if let Err(e) = fs::write(path, json) {
        fail(format_args!("writing {}: {e}", path.display()));
    }
}

fn get_field(save: &Savedata, field: &str) {
    match fields::get(save, field) {
        Ok(value) => println!("{value}"),
        Err(e) => fail(e),
    }
}

fn set_field(save: &mut Savedata, field: &str, value: &str) {
    if let Err(e) = fields::set(save, field, value) {
        fail(e);
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Dump { file } => {
            let save = read_save(&file);
            let game = game_for(&file, &save);
            println!("{}", priv_render::render_savedata(&save, game));
        }
        Command::Json { file } => {
            let save = read_save(&file);
            let game = game_for(&file, &save);
            let value = priv_render::savedata_to_json(&save, game);
            match serde_json::to_string_pretty(&value) {
                Ok(json) => println!("{json}"),
                Err(e) => fail(e),
            }
        }
        Command::Get { file, field } => {
            let save = read_save(&file);
            get_field(&save, &field);
        }
        Command::Set { file, field, value } => {
            let mut save = read_save(&file);
            set_field(&mut save, &field, &value);
            write_save(&file, &save, true);
        }
        Command::Fix { file } => {
            let mut save = read_save(&file);
            let repairs = fields::sanity_fix(&mut save);
            if repairs.is_empty() {
                println!("Nothing to fix");
            } else {
                for repair in &repairs {
                    println!("{repair}");
                }
                write_save(&file, &save, true);
            }
        }
        Command::Fields => {
            for name in fields::field_names() {
                println!("{name}");
            }
        }
        Command::Load { file } => {
            let save = read_save(&file);
            store_stash(&cli.stash, &Stash {
                filename: file,
                save,
            });
        }
        Command::Show => {
            let stash = load_stash(&cli.stash);
            let game = game_for(&stash.filename, &stash.save);
            println!("{}", priv_render::render_savedata(&stash.save, game));
        }
        Command::Edit { field, value } => {
            let mut stash = load_stash(&cli.stash);
            set_field(&mut stash.save, &field, &value);
            store_stash(&cli.stash, &stash);
        }
        Command::Save { output } => {
            let stash = load_stash(&cli.stash);
            let target = output.unwrap_or_else(|| stash.filename.clone());
            write_save(&target, &stash.save, true);
        }
    }
}
