use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use notify::{EventKind, RecursiveMode, Watcher, recommended_watcher};
use priv_watch::Session;

#[derive(Debug, Parser)]
#[command(name = "priv-ach", version, about = "Watch a save directory and award achievements")]
struct Cli {
    /// Directory the game writes its saves into.
    dir: PathBuf,
    /// State file; relative paths land inside the watched directory.
    #[arg(long, default_value = "pracst.json")]
    state: PathBuf,
    /// Seconds to wait after a write before reading, so the game can finish.
    #[arg(long, default_value_t = 5)]
    settle: u64,
}

fn is_save_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("SAV") || ext.eq_ignore_ascii_case("PRS")
    )
}

fn announce(unlocked: &[priv_watch::Unlocked]) {
    for cheev in unlocked {
        println!();
        println!("*** Achievement unlocked: {} ***", cheev.name);
        println!("    [{}] {}", cheev.category, cheev.desc);
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.dir.is_dir() {
        eprintln!("Error: {} is not a directory", cli.dir.display());
        process::exit(2);
    }
    let state_path = if cli.state.is_relative() {
        cli.dir.join(&cli.state)
    } else {
        cli.state.clone()
    };

    let mut session = Session::new(state_path);

    let (tx, rx) = mpsc::channel();
    let mut watcher = match recommended_watcher(tx) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: could not create watcher: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = watcher.watch(&cli.dir, RecursiveMode::NonRecursive) {
        eprintln!("Error: could not watch {}: {e}", cli.dir.display());
        process::exit(1);
    }
    log::info!("watching {}", cli.dir.display());

    for event in rx {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                log::warn!("watch error: {e}");
                continue;
            }
        };
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }
        for path in event.paths.into_iter().filter(|p| is_save_file(p)) {
            // The game is usually still writing when the event fires.
            thread::sleep(Duration::from_secs(cli.settle));
            announce(&session.handle_file(&path));
        }
    }
}
