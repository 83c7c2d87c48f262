use super::super::state::App;
use podium_core::recording::RecordingNotice;
use tracing::{info, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

impl App {
    pub(super) fn start_recording(&mut self) {
        if self.recording.is_recording() {
            return;
        }
        let Some(region) = self.capture_region() else {
            self.handle_recording_notices(vec![RecordingNotice::Failed(
                "window position is unknown; cannot place the capture region".to_string(),
            )]);
            return;
        };
        info!(?region, "Starting screen recording");
        if !self.recording.start(region) {
            // Setup failures are reported through the next poll.
            let notices = self.recording.poll();
            self.handle_recording_notices(notices);
        }
    }

    pub(super) fn stop_recording(&mut self) {
        if !self.recording.is_recording() {
            return;
        }
        let notices = self.recording.stop();
        self.handle_recording_notices(notices);
    }

    pub(super) fn handle_recording_notices(&mut self, notices: Vec<RecordingNotice>) {
        for notice in notices {
            match notice {
                RecordingNotice::Started { path, backend } => {
                    info!(%backend, path = %path.display(), "Recording started");
                    self.set_status(format!("Recording to {} ({backend})", path.display()));
                }
                RecordingNotice::Finished { path, size_bytes } => {
                    let size_mb = size_bytes as f64 / BYTES_PER_MB;
                    info!(path = %path.display(), size_bytes, "Recording saved");
                    self.set_status(format!(
                        "Recording saved: {} ({size_mb:.1} MB)",
                        path.display()
                    ));
                }
                RecordingNotice::Failed(message) => {
                    warn!("Recording failed: {message}");
                    self.set_status(message);
                }
            }
        }
    }

    pub(in crate::app) fn recording_label(&self) -> String {
        match self.recording.elapsed() {
            Some(elapsed) if self.recording.is_recording() => {
                let secs = elapsed.as_secs();
                format!("REC {:02}:{:02}", secs / 60, secs % 60)
            }
            _ => String::new(),
        }
    }
}
