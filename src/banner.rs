//! Startup banner and session summary.

use std::time::Duration;

use crate::config::UrlSource;
use crate::consts::{AUTHOR, HOMEPAGE};
use crate::view::Stats;

/// Session configuration shown at startup.
pub struct BannerInfo<'a> {
    pub endpoint: &'a str,
    pub source: UrlSource,
    pub timeout: Duration,
}

fn source_label(source: UrlSource) -> &'static str {
    match source {
        UrlSource::Flag => "--api-url",
        UrlSource::Env => crate::consts::API_URL_ENV,
        UrlSource::Default => "default",
    }
}

pub fn banner_text(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║         S T O R Y C H E C K           ║
   ║   user story quality, one line away   ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   endpoint  {} ({})
   timeout   {}s

   type a story description and press enter, /help for commands
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        info.endpoint,
        source_label(info.source),
        info.timeout.as_secs(),
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}

/// One line of outcome counts, or `None` if nothing was analyzed.
pub fn summary_line(stats: Stats) -> Option<String> {
    if stats.total() == 0 {
        return None;
    }
    Some(format!(
        "session: {} analyzed, {} failed, {} cancelled",
        stats.completed, stats.failed, stats.cancelled
    ))
}

pub fn print_session_summary(stats: Stats) {
    if let Some(line) = summary_line(stats) {
        println!("{line}");
    }
    println!("goodbye.");
}
