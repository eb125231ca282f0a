//! A terminal spinner shown while an analysis is in flight.

use std::io::Write;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const INTERVAL: Duration = Duration::from_millis(80);

/// Spinner line with the elapsed time, e.g. `⠙ evaluating (1.2s)`.
fn frame_line(tick: usize, label: &str, elapsed: Duration) -> String {
    let frame = FRAMES[tick % FRAMES.len()];
    format!("{frame} {label} ({:.1}s)", elapsed.as_secs_f32())
}

/// Runs on a background task and draws to stderr, so stdout stays clean.
pub struct Spinner {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

impl Spinner {
    pub fn start(label: &str) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let label = label.to_string();
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            let mut tick = 0;
            loop {
                // \x1b[2K clears the line, \r returns to column 0
                eprint!("\x1b[2K\r{}", frame_line(tick, &label, started.elapsed()));
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = stop_rx.changed() => break,
                }
                tick += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            stop: stop_tx,
        }
    }

    /// Stop and clear the line.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}
