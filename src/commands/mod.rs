//! REPL commands prefixed with `/`.
//!
//! Commands implement [`Command`] and live in a [`CommandRegistry`], which
//! handles dispatch, aliases and help text. Anything that is not a command
//! is a story description.

mod help;
mod quit;
mod show;
mod status;

use async_trait::async_trait;
use std::sync::Arc;

use crate::view::StoryQualityView;

/// What commands get to look at.
pub struct SessionInfo<'a> {
    pub view: &'a StoryQualityView,
}

/// What the REPL should do after a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a command: analyze the input.
    NotACommand,
    Handled,
    Quit,
}

#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/show"`.
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult;
}

pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(show::ShowCommand),
            Arc::new(status::StatusCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    #[cfg(test)]
    fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Run the matching command, or return `NotACommand`.
    pub async fn dispatch(&self, input: &str, info: &SessionInfo<'_>) -> CommandResult {
        let cmd = input.trim();

        for command in &self.commands {
            if cmd == command.name() || command.aliases().contains(&cmd) {
                // /help needs the registry itself
                if command.name() == "/help" {
                    print!("{}", self.help_text());
                    return CommandResult::Handled;
                }
                return command.execute(info).await;
            }
        }

        if cmd.starts_with('/') {
            println!("unknown command: {cmd}");
            println!("type /help for available commands");
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    #[cfg(test)]
    fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    #[cfg(test)]
    fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, aliases: &[&str]) -> String {
    if aliases.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, aliases.join(", "))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Config;
    use crate::evaluation::EvaluationClient;
    use crate::transport::mock::MockTransport;

    pub(crate) fn test_view() -> StoryQualityView {
        let client = EvaluationClient::new(Arc::new(MockTransport::new()), &Config::default());
        StoryQualityView::new(Arc::new(client))
    }

    #[test]
    fn all_builtins_registered() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.names(), ["/help", "/show", "/status", "/quit"]);
    }

    #[test]
    fn no_duplicate_triggers() {
        let reg = CommandRegistry::new();
        let mut seen = Vec::new();
        for t in reg.all_triggers() {
            assert!(!seen.contains(&t), "duplicate trigger: {t}");
            seen.push(t);
        }
    }

    #[test]
    fn help_text_includes_commands_and_aliases() {
        let reg = CommandRegistry::new();
        let text = reg.help_text();
        for name in reg.names() {
            assert!(text.contains(name), "help missing: {name}");
        }
        assert!(text.contains("/h"));
        assert!(text.contains("exit"));
    }

    #[tokio::test]
    async fn unknown_slash_command_is_handled() {
        let view = test_view();
        let reg = CommandRegistry::new();
        assert_eq!(
            reg.dispatch("/foobar", &SessionInfo { view: &view }).await,
            CommandResult::Handled
        );
    }

    #[tokio::test]
    async fn story_text_passes_through() {
        let view = test_view();
        let reg = CommandRegistry::new();
        let info = SessionInfo { view: &view };
        assert_eq!(
            reg.dispatch("As a user I want to log in", &info).await,
            CommandResult::NotACommand
        );
        assert_eq!(reg.dispatch("  ", &info).await, CommandResult::NotACommand);
    }

    #[tokio::test]
    async fn registered_command_dispatches() {
        struct PingCommand;

        #[async_trait]
        impl Command for PingCommand {
            fn name(&self) -> &str {
                "/ping"
            }
            fn description(&self) -> &str {
                "pong"
            }
            async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
                CommandResult::Handled
            }
        }

        let view = test_view();
        let mut reg = CommandRegistry::new();
        reg.register(Arc::new(PingCommand));
        assert_eq!(
            reg.dispatch("/ping", &SessionInfo { view: &view }).await,
            CommandResult::Handled
        );
        assert!(reg.help_text().contains("/ping"));
    }

    #[test]
    fn format_label_variants() {
        assert_eq!(format_label("/show", &[]), "/show");
        assert_eq!(format_label("/help", &["/h", "/?"]), "/help (/h, /?)");
    }
}
