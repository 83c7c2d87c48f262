use super::super::state::App;
use super::Effect;
use std::path::PathBuf;
use tracing::{info, warn};

impl App {
    pub(super) fn handle_load_script_requested(&mut self, effects: &mut Vec<Effect>) {
        let raw = self.script_path_input.trim();
        if raw.is_empty() {
            self.set_status("Enter a script path to load");
            return;
        }
        let path = PathBuf::from(raw);
        self.load_script(path);
        effects.push(Effect::ScrollScript(self.script.offset()));
    }

    pub(super) fn handle_save_script_requested(&mut self, effects: &mut Vec<Effect>) {
        let raw = self.script_path_input.trim();
        let path = if raw.is_empty() {
            self.script.path().map(PathBuf::from)
        } else {
            Some(PathBuf::from(raw))
        };
        match path {
            Some(path) => effects.push(Effect::SaveScript(path)),
            None => self.set_status("Enter a path to save the script to"),
        }
    }

    pub(super) fn push_script_scroll(&self, changed: bool, effects: &mut Vec<Effect>) {
        if changed {
            effects.push(Effect::ScrollScript(self.script.offset()));
        }
    }

    pub(super) fn save_script(&mut self, path: PathBuf) {
        match self.script.save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Saved speaker script");
                self.set_status(format!("Script saved: {}", path.display()));
            }
            Err(err) => {
                warn!(path = %path.display(), "Failed to save script: {err}");
                self.set_status(err.to_string());
            }
        }
    }
}
