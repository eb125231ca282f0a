use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::render::render;

pub struct ShowCommand;

#[async_trait]
impl Command for ShowCommand {
    fn name(&self) -> &str {
        "/show"
    }

    fn aliases(&self) -> &[&str] {
        &["/s"]
    }

    fn description(&self) -> &str {
        "show the last result again"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        let state = info.view.snapshot();
        if !state.text_input.is_empty() {
            println!("  story     {}", crate::consts::truncate(&state.text_input, 60));
        }
        print!("{}", render(&state));
        CommandResult::Handled
    }
}
