//! External screen-capture programs.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// Screen rectangle to capture, in X11 root-window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        CaptureRegion {
            x,
            y,
            width,
            height,
        }
    }

    /// H.264 with yuv420p needs even dimensions.
    pub fn even(self) -> Self {
        CaptureRegion {
            width: (self.width & !1).max(2),
            height: (self.height & !1).max(2),
            ..self
        }
    }
}

/// Everything a backend needs to build its command line.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub output: PathBuf,
    pub region: CaptureRegion,
    pub fps: u32,
    pub quality: u32,
    pub display: String,
    pub capture_audio: bool,
    pub max_secs: u64,
}

impl CaptureRequest {
    /// Map the 1..=100 quality setting onto x264's CRF scale (lower is better).
    pub fn crf(&self) -> u32 {
        let quality = self.quality.clamp(1, 100) as f32;
        (51.0 - quality * 0.35).round().clamp(0.0, 51.0) as u32
    }
}

pub trait CaptureBackend: Send + Sync {
    fn name(&self) -> &str;

    fn command(&self, request: &CaptureRequest) -> Command;

    /// Ask a running capture to finalise its output. The worker force-kills the
    /// process if it is still alive after the stop timeout.
    fn request_stop(&self, child: &mut Child) -> io::Result<()> {
        drop(child.stdin.take());
        Ok(())
    }
}

/// `ffmpeg -f x11grab`, stopped by typing `q` on its stdin.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    program: String,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        FfmpegBackend::new("ffmpeg")
    }
}

impl FfmpegBackend {
    pub fn new(program: impl Into<String>) -> Self {
        FfmpegBackend {
            program: program.into(),
        }
    }
}

impl CaptureBackend for FfmpegBackend {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn command(&self, request: &CaptureRequest) -> Command {
        let region = request.region.even();
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner")
            .args(["-loglevel", "error"])
            .args(["-f", "x11grab"])
            .args(["-framerate", &request.fps.to_string()])
            .args(["-video_size", &format!("{}x{}", region.width, region.height)])
            .args([
                "-i",
                &format!("{}+{},{}", request.display, region.x, region.y),
            ]);
        if request.capture_audio {
            cmd.args(["-f", "alsa", "-i", "default", "-c:a", "aac"]);
        }
        cmd.args(["-c:v", "libx264", "-preset", "ultrafast"])
            .args(["-crf", &request.crf().to_string()])
            .args(["-pix_fmt", "yuv420p"])
            .arg("-y")
            .arg(&request.output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        debug!(?cmd, "Built ffmpeg capture command");
        cmd
    }

    fn request_stop(&self, child: &mut Child) -> io::Result<()> {
        if let Some(mut stdin) = child.stdin.take() {
            // A closed pipe means ffmpeg is already gone, which is fine.
            match stdin.write_all(b"q") {
                Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err),
                _ => {}
            }
        }
        Ok(())
    }
}

/// GStreamer `ximagesrc` pipeline. It records at most `max_secs` of footage
/// and finalises the MP4 on SIGINT thanks to `-e`.
#[derive(Debug, Clone)]
pub struct GStreamerBackend {
    program: String,
}

impl Default for GStreamerBackend {
    fn default() -> Self {
        GStreamerBackend::new("gst-launch-1.0")
    }
}

impl GStreamerBackend {
    pub fn new(program: impl Into<String>) -> Self {
        GStreamerBackend {
            program: program.into(),
        }
    }
}

impl CaptureBackend for GStreamerBackend {
    fn name(&self) -> &str {
        "gstreamer"
    }

    fn command(&self, request: &CaptureRequest) -> Command {
        let region = request.region.even();
        let end_x = region.x + region.width as i32 - 1;
        let end_y = region.y + region.height as i32 - 1;
        let frames = request.max_secs.saturating_mul(request.fps as u64);
        let mut cmd = Command::new(&self.program);
        cmd.arg("-e")
            .arg("ximagesrc")
            .arg(format!("display-name={}", request.display))
            .arg(format!("startx={}", region.x))
            .arg(format!("starty={}", region.y))
            .arg(format!("endx={end_x}"))
            .arg(format!("endy={end_y}"))
            .arg("use-damage=false")
            .arg(format!("num-buffers={frames}"))
            .args(["!", &format!("video/x-raw,framerate={}/1", request.fps)])
            .args(["!", "videoconvert"])
            .args(["!", "x264enc", "tune=zerolatency", "speed-preset=ultrafast"])
            .arg(format!("quantizer={}", request.crf()))
            .args(["!", "mp4mux", "fragment-duration=1000"])
            .args(["!", "filesink"])
            .arg(format!("location={}", request.output.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        debug!(?cmd, "Built GStreamer capture command");
        cmd
    }

    fn request_stop(&self, child: &mut Child) -> io::Result<()> {
        let status = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("kill -INT exited with {status}")))
        }
    }
}
