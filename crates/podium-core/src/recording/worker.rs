//! Background thread that owns the capture process.
//!
//! The session talks to it over two channels: commands in, events out. The
//! worker is the only place that touches the `Child`, so stopping, waiting and
//! killing never race with the UI thread.

use super::backend::{CaptureBackend, CaptureRequest};
use std::io;
use std::process::{Child, ExitStatus};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerCommand {
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkerEvent {
    Started { backend: String },
    Failed(String),
    Exited {
        code: Option<i32>,
        forced: bool,
    },
}

pub(crate) struct WorkerHandle {
    pub(crate) commands: Sender<WorkerCommand>,
    pub(crate) events: Receiver<WorkerEvent>,
    pub(crate) thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("Recording worker panicked");
            }
        }
    }
}

pub(crate) fn spawn_worker(
    backends: Vec<Arc<dyn CaptureBackend>>,
    request: CaptureRequest,
    stop_timeout: Duration,
) -> io::Result<WorkerHandle> {
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let thread = thread::Builder::new()
        .name("podium-recorder".to_string())
        .spawn(move || run(backends, request, stop_timeout, command_rx, event_tx))?;
    Ok(WorkerHandle {
        commands: command_tx,
        events: event_rx,
        thread: Some(thread),
    })
}

fn run(
    backends: Vec<Arc<dyn CaptureBackend>>,
    request: CaptureRequest,
    stop_timeout: Duration,
    commands: Receiver<WorkerCommand>,
    events: Sender<WorkerEvent>,
) {
    let (mut child, backend) = match launch(&backends, &request) {
        Ok(launched) => launched,
        Err(message) => {
            warn!("{message}");
            let _ = events.send(WorkerEvent::Failed(message));
            return;
        }
    };
    info!(
        backend = backend.name(),
        pid = child.id(),
        output = %request.output.display(),
        "Screen capture started"
    );
    let _ = events.send(WorkerEvent::Started {
        backend: backend.name().to_string(),
    });

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                info!(code = ?status.code(), "Capture process exited on its own");
                let _ = events.send(WorkerEvent::Exited {
                    code: status.code(),
                    forced: false,
                });
                return;
            }
            Ok(None) => {}
            Err(err) => warn!("Failed to poll capture process: {err}"),
        }

        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(WorkerCommand::Stop) | Err(RecvTimeoutError::Disconnected) => {
                let (status, forced) = finish(&mut child, backend.as_ref(), stop_timeout);
                let _ = events.send(WorkerEvent::Exited {
                    code: status.and_then(|s| s.code()),
                    forced,
                });
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

/// Start the first backend whose program exists.
fn launch(
    backends: &[Arc<dyn CaptureBackend>],
    request: &CaptureRequest,
) -> Result<(Child, Arc<dyn CaptureBackend>), String> {
    let mut missing = Vec::new();
    for backend in backends {
        match backend.command(request).spawn() {
            Ok(child) => return Ok((child, Arc::clone(backend))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(backend = backend.name(), "Capture program not installed");
                missing.push(backend.name().to_string());
            }
            Err(err) => return Err(format!("{} failed to start: {err}", backend.name())),
        }
    }
    if missing.is_empty() {
        Err("no screen capture backend configured".to_string())
    } else {
        Err(format!(
            "ffmpeg or GStreamer (gst-launch-1.0) is required; tried {}",
            missing.join(", ")
        ))
    }
}

/// Ask for a graceful stop, then kill once `stop_timeout` runs out.
fn finish(
    child: &mut Child,
    backend: &dyn CaptureBackend,
    stop_timeout: Duration,
) -> (Option<ExitStatus>, bool) {
    if let Err(err) = backend.request_stop(child) {
        warn!(backend = backend.name(), "Graceful stop request failed: {err}");
    }
    let deadline = Instant::now() + stop_timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                info!(code = ?status.code(), "Screen capture stopped");
                return (Some(status), false);
            }
            Ok(None) if Instant::now() < deadline => thread::sleep(EXIT_POLL_INTERVAL),
            Ok(None) => break,
            Err(err) => {
                warn!("Failed to poll capture process: {err}");
                break;
            }
        }
    }
    warn!(
        timeout_ms = stop_timeout.as_millis() as u64,
        "Capture process ignored stop request; killing it"
    );
    if let Err(err) = child.kill() {
        warn!("Failed to kill capture process: {err}");
    }
    (child.wait().ok(), true)
}
