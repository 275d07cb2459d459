use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Everything the watcher remembers between runs, keyed by the
/// `name:callsign` identity. Serialized as JSON next to the saves.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchState {
    #[serde(default)]
    pub unlocked: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub visited: BTreeMap<String, BTreeSet<u8>>,
    #[serde(default)]
    pub secrets: BTreeMap<String, u8>,
}

impl AchState {
    /// A missing or unreadable state file starts fresh rather than failing.
    pub fn load(path: &Path) -> AchState {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return AchState::default(),
            Err(e) => {
                log::warn!("could not read state file {}: {e}", path.display());
                return AchState::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("corrupt state file {}, starting fresh: {e}", path.display());
                AchState::default()
            }
        }
    }

    /// Write-then-rename so a crash mid-save leaves the old file intact.
    pub fn store(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)
    }

    pub fn is_unlocked(&self, identity: &str, id: &str) -> bool {
        self.unlocked
            .get(identity)
            .map(|set| set.contains(id))
            .unwrap_or(false)
    }

    pub fn mark_unlocked(&mut self, identity: &str, id: &str) {
        self.unlocked
            .entry(identity.to_string())
            .or_default()
            .insert(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_state_file_starts_fresh() {
        let state = AchState::load(Path::new("/nonexistent/pracst.json"));
        assert_eq!(state, AchState::default());
    }

    #[test]
    fn unknown_identities_are_locked() {
        let state = AchState::default();
        assert!(!state.is_unlocked("Burrows:Ace", "plot_started"));
    }
}
