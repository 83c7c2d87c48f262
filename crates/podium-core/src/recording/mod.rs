//! Screen recording session.
//!
//! `Idle -> Recording -> Stopping -> Idle`, with `Failed` as a detour that is
//! reported once and then cleared. The capture process itself lives on a
//! background worker; the session only sends commands and drains events, so
//! nothing here blocks except the bounded wait inside [`RecordingSession::stop`].

mod backend;
mod worker;

pub use backend::{CaptureBackend, CaptureRegion, CaptureRequest, FfmpegBackend, GStreamerBackend};

use crate::config::AppConfig;
use crate::error::ViewerError;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use worker::{WorkerCommand, WorkerEvent, WorkerHandle, spawn_worker};

/// Extra time granted on top of the worker's own stop timeout.
const STOP_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct RecordingSettings {
    pub output_dir: PathBuf,
    pub fps: u32,
    pub quality: u32,
    pub display: String,
    pub capture_audio: bool,
    pub stop_timeout: Duration,
    pub fallback_max_secs: u64,
}

impl RecordingSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        RecordingSettings {
            output_dir: PathBuf::from(&config.recording_output_dir),
            fps: config.recording_fps,
            quality: config.recording_quality,
            display: config.recording_display.clone(),
            capture_audio: config.recording_capture_audio,
            stop_timeout: Duration::from_secs(config.recording_stop_timeout_secs),
            fallback_max_secs: config.recording_fallback_max_secs,
        }
    }
}

impl Default for RecordingSettings {
    fn default() -> Self {
        RecordingSettings::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Stopping,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingNotice {
    Started { path: PathBuf, backend: String },
    Finished { path: PathBuf, size_bytes: u64 },
    Failed(String),
}

/// `<dir>/presentation_recording_<YYYYmmdd_HHMMSS>.mp4`
pub fn output_path(dir: &Path, at: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "presentation_recording_{}.mp4",
        at.format("%Y%m%d_%H%M%S")
    ))
}

pub struct RecordingSession {
    settings: RecordingSettings,
    backends: Vec<Arc<dyn CaptureBackend>>,
    state: RecordingState,
    output: Option<PathBuf>,
    worker: Option<WorkerHandle>,
    pending: Vec<RecordingNotice>,
    failure_reported: bool,
    started_at: Option<Instant>,
}

impl RecordingSession {
    /// Session with ffmpeg as the primary backend and GStreamer as fallback.
    pub fn new(settings: RecordingSettings) -> Self {
        RecordingSession::with_backends(
            settings,
            vec![
                Arc::new(FfmpegBackend::default()),
                Arc::new(GStreamerBackend::default()),
            ],
        )
    }

    pub fn with_backends(
        settings: RecordingSettings,
        backends: Vec<Arc<dyn CaptureBackend>>,
    ) -> Self {
        RecordingSession {
            settings,
            backends,
            state: RecordingState::Idle,
            output: None,
            worker: None,
            pending: Vec::new(),
            failure_reported: false,
            started_at: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|at| at.elapsed())
    }

    /// Begin capturing `region`. Returns `false` when not idle or when the
    /// session could not be set up; the reason arrives through [`poll`].
    ///
    /// [`poll`]: RecordingSession::poll
    pub fn start(&mut self, region: CaptureRegion) -> bool {
        if self.state != RecordingState::Idle {
            debug!(state = ?self.state, "Ignoring start request");
            return false;
        }

        let output = output_path(
            &self.settings.output_dir,
            chrono::Local::now().naive_local(),
        );
        if let Err(err) = fs::create_dir_all(&self.settings.output_dir) {
            let err = ViewerError::io(
                format!("creating {}", self.settings.output_dir.display()),
                err,
            );
            self.fail(ViewerError::RecordingLaunchFailure(err.to_string()).to_string());
            return false;
        }

        let request = CaptureRequest {
            output: output.clone(),
            region,
            fps: self.settings.fps,
            quality: self.settings.quality,
            display: self.settings.display.clone(),
            capture_audio: self.settings.capture_audio,
            max_secs: self.settings.fallback_max_secs,
        };
        match spawn_worker(self.backends.clone(), request, self.settings.stop_timeout) {
            Ok(worker) => {
                info!(output = %output.display(), ?region, "Recording requested");
                self.worker = Some(worker);
                self.output = Some(output);
                self.started_at = Some(Instant::now());
                self.state = RecordingState::Recording;
                true
            }
            Err(err) => {
                self.fail(
                    ViewerError::RecordingLaunchFailure(format!("worker thread: {err}"))
                        .to_string(),
                );
                false
            }
        }
    }

    /// Stop an active recording, waiting a bounded time for the capture to
    /// finalise. Always ends in `Idle`.
    pub fn stop(&mut self) -> Vec<RecordingNotice> {
        if self.state != RecordingState::Recording {
            debug!(state = ?self.state, "Ignoring stop request");
            return Vec::new();
        }
        self.state = RecordingState::Stopping;
        let mut notices = std::mem::take(&mut self.pending);

        let Some(mut worker) = self.worker.take() else {
            self.state = RecordingState::Idle;
            return notices;
        };
        let _ = worker.commands.send(WorkerCommand::Stop);

        let deadline = Instant::now() + self.settings.stop_timeout + STOP_GRACE;
        let mut finished = false;
        while !finished {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match worker.events.recv_timeout(remaining) {
                Ok(event) => finished = self.handle_event(event, &mut notices),
                Err(RecvTimeoutError::Timeout) => {
                    warn!("Recording worker did not confirm stop in time");
                    notices.push(RecordingNotice::Failed(
                        "recording did not stop in time".to_string(),
                    ));
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    finished = true;
                }
            }
        }
        if finished {
            worker.join();
        }

        self.state = RecordingState::Idle;
        self.failure_reported = false;
        self.started_at = None;
        notices
    }

    /// Drain worker events without blocking.
    pub fn poll(&mut self) -> Vec<RecordingNotice> {
        if self.state == RecordingState::Failed && self.failure_reported {
            self.state = RecordingState::Idle;
            self.failure_reported = false;
        }
        let mut notices = std::mem::take(&mut self.pending);

        let mut done = false;
        if let Some(worker) = self.worker.as_mut() {
            let mut events = Vec::new();
            loop {
                match worker.events.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        done = true;
                        break;
                    }
                }
            }
            for event in events {
                done |= self.handle_event(event, &mut notices);
            }
        }

        if done {
            if let Some(mut worker) = self.worker.take() {
                worker.join();
            }
            if self.state == RecordingState::Recording {
                self.state = RecordingState::Idle;
                self.started_at = None;
            }
        }

        if self.state == RecordingState::Failed {
            self.failure_reported = true;
        }
        notices
    }

    /// Returns `true` when the worker is done.
    fn handle_event(&mut self, event: WorkerEvent, notices: &mut Vec<RecordingNotice>) -> bool {
        match event {
            WorkerEvent::Started { backend } => {
                if let Some(path) = self.output.clone() {
                    notices.push(RecordingNotice::Started { path, backend });
                }
                false
            }
            WorkerEvent::Failed(message) => {
                let message = ViewerError::RecordingLaunchFailure(message).to_string();
                self.state = RecordingState::Failed;
                self.failure_reported = false;
                self.started_at = None;
                notices.push(RecordingNotice::Failed(message));
                true
            }
            WorkerEvent::Exited { code, forced } => {
                debug!(?code, forced, "Recording worker finished");
                if self.state == RecordingState::Recording {
                    self.state = RecordingState::Idle;
                }
                self.started_at = None;
                notices.push(self.finished_notice(code));
                true
            }
        }
    }

    fn finished_notice(&self, code: Option<i32>) -> RecordingNotice {
        let Some(path) = self.output.clone() else {
            return RecordingNotice::Failed("recording finished without an output path".into());
        };
        match fs::metadata(&path) {
            Ok(meta) if meta.len() > 0 => {
                info!(path = %path.display(), bytes = meta.len(), "Recording saved");
                RecordingNotice::Finished {
                    path,
                    size_bytes: meta.len(),
                }
            }
            _ => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                warn!(path = %path.display(), %code, "Capture produced no output");
                RecordingNotice::Failed(format!(
                    "capture process produced no output (exit: {code})"
                ))
            }
        }
    }

    fn fail(&mut self, message: String) {
        warn!("{message}");
        self.state = RecordingState::Failed;
        self.failure_reported = false;
        self.pending.push(RecordingNotice::Failed(message));
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        if self.state == RecordingState::Recording {
            let _ = self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    /// Runs an arbitrary program in place of a real screen grabber.
    struct StandIn {
        name: &'static str,
        program: &'static str,
        script: &'static str,
    }

    impl CaptureBackend for StandIn {
        fn name(&self) -> &str {
            self.name
        }

        fn command(&self, request: &CaptureRequest) -> Command {
            let mut cmd = Command::new(self.program);
            cmd.arg("-c")
                .arg(self.script)
                .arg(&request.output)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            cmd
        }
    }

    fn backend(
        name: &'static str,
        program: &'static str,
        script: &'static str,
    ) -> Arc<dyn CaptureBackend> {
        Arc::new(StandIn {
            name,
            program,
            script,
        })
    }

    fn settings(dir: &Path) -> RecordingSettings {
        RecordingSettings {
            output_dir: dir.join("recordings"),
            stop_timeout: Duration::from_millis(300),
            ..RecordingSettings::default()
        }
    }

    fn region() -> CaptureRegion {
        CaptureRegion::new(0, 0, 640, 480)
    }

    fn poll_until_notice(session: &mut RecordingSession) -> Vec<RecordingNotice> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let notices = session.poll();
            if !notices.is_empty() {
                return notices;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        Vec::new()
    }

    #[test]
    fn output_name_carries_timestamp() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .expect("valid timestamp");
        assert_eq!(
            output_path(Path::new("recordings"), at),
            PathBuf::from("recordings/presentation_recording_20240102_030405.mp4")
        );
    }

    #[test]
    fn start_then_stop_reports_finished_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = RecordingSession::with_backends(
            settings(dir.path()),
            vec![backend("stand-in", "sh", "printf frames > \"$0\"; exec cat")],
        );
        assert!(session.start(region()));
        assert_eq!(session.state(), RecordingState::Recording);
        assert!(!session.start(region()));

        let started = poll_until_notice(&mut session);
        assert!(matches!(
            started.as_slice(),
            [RecordingNotice::Started { backend, .. }] if backend == "stand-in"
        ));

        let notices = session.stop();
        assert_eq!(session.state(), RecordingState::Idle);
        assert!(notices
            .iter()
            .any(|n| matches!(n, RecordingNotice::Finished { size_bytes: 6, .. })));
        assert!(session.stop().is_empty());
    }

    #[test]
    fn missing_programs_fail_once_then_return_to_idle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = RecordingSession::with_backends(
            settings(dir.path()),
            vec![backend("ghost", "podium-test-missing-capture", "")],
        );
        assert!(session.start(region()));
        let notices = poll_until_notice(&mut session);
        assert!(matches!(notices.as_slice(), [RecordingNotice::Failed(msg)] if msg.contains("ghost")));
        assert_eq!(session.state(), RecordingState::Failed);
        assert!(!session.start(region()));
        assert!(session.poll().is_empty());
        assert_eq!(session.state(), RecordingState::Idle);
    }

    #[test]
    fn missing_primary_falls_back_to_secondary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = RecordingSession::with_backends(
            settings(dir.path()),
            vec![
                backend("ghost", "podium-test-missing-capture", ""),
                backend("fallback", "sh", "exec cat"),
            ],
        );
        assert!(session.start(region()));
        let notices = poll_until_notice(&mut session);
        assert!(matches!(
            notices.as_slice(),
            [RecordingNotice::Started { backend, .. }] if backend == "fallback"
        ));
        session.stop();
        assert_eq!(session.state(), RecordingState::Idle);
    }

    #[test]
    fn capture_exiting_on_its_own_returns_to_idle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = RecordingSession::with_backends(
            settings(dir.path()),
            vec![backend("short", "sh", "printf x > \"$0\"")],
        );
        assert!(session.start(region()));
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while session.state() == RecordingState::Recording && Instant::now() < deadline {
            seen.extend(session.poll());
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(session.state(), RecordingState::Idle);
        assert!(seen
            .iter()
            .any(|n| matches!(n, RecordingNotice::Finished { size_bytes: 1, .. })));
    }

    #[test]
    fn unresponsive_capture_is_killed_within_bound() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = RecordingSession::with_backends(
            settings(dir.path()),
            vec![backend("stubborn", "sh", "trap '' INT TERM; exec sleep 30")],
        );
        assert!(session.start(region()));
        poll_until_notice(&mut session);
        let began = Instant::now();
        let notices = session.stop();
        assert!(began.elapsed() < Duration::from_secs(5));
        assert_eq!(session.state(), RecordingState::Idle);
        assert!(!notices.is_empty());
    }

    #[test]
    fn unwritable_output_dir_fails_without_spawning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").expect("write blocker");
        let mut session = RecordingSession::with_backends(
            RecordingSettings {
                output_dir: blocker.join("nested"),
                ..settings(dir.path())
            },
            vec![backend("stand-in", "sh", "exec cat")],
        );
        assert!(!session.start(region()));
        assert_eq!(session.state(), RecordingState::Failed);
        assert!(matches!(session.poll().as_slice(), [RecordingNotice::Failed(_)]));
        assert!(session.poll().is_empty());
        assert_eq!(session.state(), RecordingState::Idle);
    }
}
