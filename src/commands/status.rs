use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::view::{Stats, Status};

pub struct StatusCommand;

pub(crate) fn status_lines(endpoint: &str, status: Status, stats: Stats) -> String {
    let state = match status {
        Status::Idle => "idle".to_string(),
        Status::Awaiting { in_flight } => format!("awaiting {in_flight} response(s)"),
    };
    format!(
        "  endpoint  {endpoint}\n  state     {state}\n  results   {} ok, {} failed, {} cancelled\n",
        stats.completed, stats.failed, stats.cancelled
    )
}

#[async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &str {
        "/status"
    }

    fn description(&self) -> &str {
        "show endpoint, request state and counts"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        let view = info.view;
        print!("{}", status_lines(view.endpoint(), view.status(), view.stats()));
        CommandResult::Handled
    }
}
