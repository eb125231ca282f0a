//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");

/// Evaluation service base URL when neither flag nor env var is set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the evaluation service base URL.
pub const API_URL_ENV: &str = "EVALUATION_API_URL";

/// Path appended to the base URL for story evaluation.
pub const EVALUATE_PATH: &str = "/evaluate";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Capacity of the view's render event channel.
pub const EVENT_CAPACITY: usize = 64;

/// Shorten `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
