//! Speaker script panel state.
//!
//! The text is kept exactly as read from disk. Scrolling is modelled as a
//! vertical pixel offset that the GUI feeds into its scrollable; the GUI also
//! reports how far the content can scroll through [`ScriptState::set_max_offset`].

use crate::error::{Result, ViewerError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MIN_SCROLL_SPEED: u32 = 1;
pub const MAX_SCROLL_SPEED: u32 = 10;
pub const DEFAULT_SCROLL_SPEED: u32 = 1;
/// Distance moved by the manual up/down controls.
pub const SCROLL_STEP: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct ScriptState {
    text: String,
    path: Option<PathBuf>,
    dirty: bool,
    auto_scroll: bool,
    speed: u32,
    offset: f32,
    max_offset: f32,
}

impl Default for ScriptState {
    fn default() -> Self {
        ScriptState::new(true, DEFAULT_SCROLL_SPEED)
    }
}

impl ScriptState {
    pub fn new(auto_scroll: bool, speed: u32) -> Self {
        ScriptState {
            text: String::new(),
            path: None,
            dirty: false,
            auto_scroll,
            speed: speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED),
            offset: 0.0,
            max_offset: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)
            .map_err(|err| ViewerError::io(format!("reading script {}", path.display()), err))?;
        info!(path = %path.display(), chars = text.len(), "Loaded speaker script");
        self.text = text;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        self.offset = 0.0;
        self.max_offset = 0.0;
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| ViewerError::io(format!("creating {}", parent.display()), err))?;
        }
        fs::write(path, &self.text)
            .map_err(|err| ViewerError::io(format!("writing script {}", path.display()), err))?;
        info!(path = %path.display(), "Saved speaker script");
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// One auto-scroll step. Returns `true` when the offset changed.
    pub fn tick(&mut self) -> bool {
        if !self.auto_scroll {
            return false;
        }
        self.set_offset(self.offset + self.speed as f32)
    }

    pub fn scroll_up(&mut self) -> bool {
        self.set_offset(self.offset - SCROLL_STEP)
    }

    pub fn scroll_down(&mut self) -> bool {
        self.set_offset(self.offset + SCROLL_STEP)
    }

    pub fn reset_to_top(&mut self) -> bool {
        self.set_offset(0.0)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        self.set_offset(self.max_offset)
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED);
        debug!(speed = self.speed, "Script scroll speed changed");
    }

    pub fn toggle_auto_scroll(&mut self) -> bool {
        self.auto_scroll = !self.auto_scroll;
        debug!(enabled = self.auto_scroll, "Script auto-scroll toggled");
        self.auto_scroll
    }

    /// Content height minus visible height, as measured by the GUI.
    pub fn set_max_offset(&mut self, max_offset: f32) {
        self.max_offset = if max_offset.is_finite() {
            max_offset.max(0.0)
        } else {
            0.0
        };
        self.offset = self.offset.min(self.max_offset);
    }

    /// Record a scroll made directly in the widget.
    pub fn sync_offset(&mut self, offset: f32) {
        self.set_offset(offset);
    }

    fn set_offset(&mut self, offset: f32) -> bool {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.max_offset)
        } else {
            0.0
        };
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }
}
