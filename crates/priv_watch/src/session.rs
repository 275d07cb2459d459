use std::fs;
use std::path::{Path, PathBuf};

use priv_core::achievements::{self, EvalContext};
use priv_core::savedata::{GameVariant, Savedata};

use crate::state::AchState;

/// An achievement earned while processing one save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlocked {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub category: String,
}

/// Owns the persisted state and evaluates save files against it, one at a
/// time. Decode failures are logged and skipped; the session outlives any
/// single bad file.
pub struct Session {
    state_path: PathBuf,
    state: AchState,
    last_identity: Option<String>,
}

impl Session {
    pub fn new(state_path: PathBuf) -> Session {
        let state = AchState::load(&state_path);
        Session {
            state_path,
            state,
            last_identity: None,
        }
    }

    pub fn state(&self) -> &AchState {
        &self.state
    }

    /// Parse one save file, fold its discoveries into the state, evaluate
    /// every rule, and return the achievements newly earned by it.
    pub fn handle_file(&mut self, path: &Path) -> Vec<Unlocked> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return Vec::new();
            }
        };
        let save = match Savedata::parse(&bytes) {
            Ok(save) => save,
            Err(e) => {
                log::warn!("could not parse {}: {e}", path.display());
                return Vec::new();
            }
        };

        let detected = save.detected_game();
        let game = match GameVariant::from_extension(path) {
            Some(ext) => {
                if ext != detected {
                    log::warn!(
                        "{} looks like a {detected} save despite its extension",
                        path.display()
                    );
                }
                ext
            }
            None => detected,
        };

        let identity = save.identity();
        if self.last_identity.as_deref() != Some(identity.as_str()) {
            log::info!("tracking {identity}");
            self.last_identity = Some(identity.clone());
        }

        {
            let visited = self.state.visited.entry(identity.clone()).or_default();
            let secrets = self.state.secrets.entry(identity.clone()).or_default();
            achievements::update_discoveries(&save, visited, secrets);
        }
        let visited = self.state.visited[&identity].clone();
        let secrets = self.state.secrets[&identity];

        let ctx = EvalContext {
            save: &save,
            visited: &visited,
            secrets,
        };
        let mut earned = Vec::new();
        for result in achievements::evaluate_all(game, &ctx) {
            if let Some(error) = &result.error {
                log::warn!("rule {} could not run: {error}", result.id);
                continue;
            }
            if result.unlocked && !self.state.is_unlocked(&identity, result.id) {
                self.state.mark_unlocked(&identity, result.id);
                earned.push(Unlocked {
                    id: result.id.to_string(),
                    name: result.name.to_string(),
                    desc: result.desc.to_string(),
                    category: result.category.to_string(),
                });
            } else if let Some(progress) = &result.progress {
                log::debug!("{}: {progress}", result.id);
            }
        }

        if let Err(e) = self.state.store(&self.state_path) {
            log::warn!("could not persist state to {}: {e}", self.state_path.display());
        }
        earned
    }
}
