//! One-time notification permission request, asked on the plain terminal
//! before the TUI takes over the screen.

use std::io;

use crate::{domain::notification::NotificationPermission, infra::contracts::PermissionStore};

const PROMPT_ATTEMPTS: usize = 3;
const PERMISSION_SAVE_FAILED: &str = "PERMISSION_SAVE_FAILED";

pub trait PromptTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl PromptTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use std::io::Write;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }
}

/// Returns the effective permission, asking the user first when it has
/// never been decided. An answer is persisted; end of input leaves the
/// permission undecided so the question comes back on the next start.
pub fn ensure_permission(
    current: NotificationPermission,
    terminal: &mut dyn PromptTerminal,
    store: &dyn PermissionStore,
) -> io::Result<NotificationPermission> {
    if !current.needs_request() {
        return Ok(current);
    }

    let Some(answer) = collect_answer(terminal)? else {
        return Ok(current);
    };

    if let Err(error) = store.save_permission(answer) {
        tracing::warn!(
            code = PERMISSION_SAVE_FAILED,
            error = %error,
            "notification permission will be asked again next start"
        );
    }
    tracing::info!(permission = answer.as_str(), "notification permission decided");

    Ok(answer)
}

fn collect_answer(terminal: &mut dyn PromptTerminal) -> io::Result<Option<NotificationPermission>> {
    for _ in 0..PROMPT_ATTEMPTS {
        let Some(line) = terminal.prompt_line("Show notifications for new messages? [y/n]: ")?
        else {
            return Ok(None);
        };

        match parse_answer(&line) {
            Some(permission) => return Ok(Some(permission)),
            None => terminal.print_line("Please answer y or n.")?,
        }
    }

    Ok(None)
}

fn parse_answer(line: &str) -> Option<NotificationPermission> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(NotificationPermission::Granted),
        "n" | "no" => Some(NotificationPermission::Denied),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::infra::stubs::MemoryPermissionStore;

    struct FakeTerminal {
        inputs: VecDeque<Option<String>>,
        output: Vec<String>,
        prompts: usize,
    }

    impl FakeTerminal {
        fn new(inputs: Vec<Option<&str>>) -> Self {
            Self {
                inputs: inputs
                    .into_iter()
                    .map(|item| item.map(|value| value.to_owned()))
                    .collect(),
                output: Vec::new(),
                prompts: 0,
            }
        }
    }

    impl PromptTerminal for FakeTerminal {
        fn print_line(&mut self, line: &str) -> io::Result<()> {
            self.output.push(line.to_owned());
            Ok(())
        }

        fn prompt_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            self.prompts += 1;
            Ok(self.inputs.pop_front().flatten())
        }
    }

    #[test]
    fn decided_permission_is_not_asked_again() {
        let mut terminal = FakeTerminal::new(vec![Some("y")]);
        let store = MemoryPermissionStore::default();

        let permission =
            ensure_permission(NotificationPermission::Denied, &mut terminal, &store).unwrap();

        assert_eq!(permission, NotificationPermission::Denied);
        assert_eq!(terminal.prompts, 0);
        assert_eq!(*store.saved.borrow(), None);
    }

    #[test]
    fn yes_grants_and_persists() {
        let mut terminal = FakeTerminal::new(vec![Some("Yes")]);
        let store = MemoryPermissionStore::default();

        let permission =
            ensure_permission(NotificationPermission::Default, &mut terminal, &store).unwrap();

        assert_eq!(permission, NotificationPermission::Granted);
        assert_eq!(*store.saved.borrow(), Some(NotificationPermission::Granted));
    }

    #[test]
    fn invalid_answer_is_retried() {
        let mut terminal = FakeTerminal::new(vec![Some("maybe"), Some("n")]);
        let store = MemoryPermissionStore::default();

        let permission =
            ensure_permission(NotificationPermission::Default, &mut terminal, &store).unwrap();

        assert_eq!(permission, NotificationPermission::Denied);
        assert_eq!(terminal.output, vec!["Please answer y or n.".to_owned()]);
    }

    #[test]
    fn end_of_input_leaves_permission_undecided() {
        let mut terminal = FakeTerminal::new(vec![None]);
        let store = MemoryPermissionStore::default();

        let permission =
            ensure_permission(NotificationPermission::Default, &mut terminal, &store).unwrap();

        assert_eq!(permission, NotificationPermission::Default);
        assert_eq!(*store.saved.borrow(), None);
    }
}
