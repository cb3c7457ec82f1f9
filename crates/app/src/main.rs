//! Cabin Sentry - Main Entry Point

use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use alerting::AlarmTrigger;
use anyhow::Result;
use app::{init_logging, AppConfig, FrameSink, JpegPreview, Pipeline};
use camera_capture::{FrameSource, V4l2Camera};
use tracing::{debug, error, info, warn};
use vision::{FaceMesh, PhoneDetector};

fn main() -> Result<()> {
    init_logging();

    info!("=== Cabin Sentry v{} ===", env!("CARGO_PKG_VERSION"));
    let config = AppConfig::default();

    let mut camera = V4l2Camera::open(&config.camera)?;
    let face = FaceMesh::new(&config.vision)?;
    let phone = PhoneDetector::new(&config.vision)?;
    let alarm = AlarmTrigger::new(&config.alarm_file);
    let mut preview = config.preview_path.as_ref().map(JpegPreview::new);

    let mut pipeline = Pipeline::new(&config, face, phone, alarm);
    let quit = spawn_quit_watcher();

    info!("monitoring started; press 'q' then Enter to stop");
    loop {
        if quit.try_recv().is_ok() {
            info!("quit requested");
            break;
        }

        // Dropped frames are skipped; a streaming error ends the run.
        let mut frame = match camera.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                error!(error = %e, "camera failed, stopping");
                break;
            }
        };

        let report = pipeline.process(&mut frame);
        debug!(status = ?report.status, ear = report.ear, "frame processed");

        if let Some(sink) = &mut preview {
            if let Err(e) = sink.present(&frame) {
                warn!(error = %e, "preview write failed");
            }
        }
    }

    // In-flight alarm audio is fire-and-forget; the report is what must
    // land before exit.
    let incidents = pipeline.into_incidents();
    if incidents.flush(&config.results_dir)?.is_some() {
        info!("last recorded incidents:");
        for incident in incidents.entries().iter().rev().take(5).rev() {
            info!(
                "  {} {} {}",
                incident.date,
                incident.time,
                incident.kind.label()
            );
        }
    }

    Ok(())
}

/// Watch stdin for the quit keystroke on a detached thread.
fn spawn_quit_watcher() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) if l.trim().eq_ignore_ascii_case("q") => {
                    let _ = tx.send(());
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
    rx
}
