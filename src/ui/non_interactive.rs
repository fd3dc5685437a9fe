//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::{parse_bool_answer, OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "MODKEEPER_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `MODKEEPER_PROMPT_<KEY>` when set, otherwise
/// from the prompt's default. Spinners are replaced by plain lines.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn env_key(prompt_key: &str) -> String {
        format!(
            "{}{}",
            PROMPT_ENV_PREFIX,
            prompt_key.to_uppercase().replace('-', "_")
        )
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let env_key = Self::env_key(&prompt.key);
        if let Some(value) = self.env_overrides.get(&env_key) {
            match parse_bool_answer(value) {
                Some(answer) => return Ok(answer),
                None => tracing::warn!("Ignoring {}={:?}: expected yes or no", env_key, value),
            }
        }
        tracing::debug!(
            "Answering '{}' with default ({})",
            prompt.key,
            prompt.default
        );
        Ok(prompt.default)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("{}", message);
        }
        Box::new(PlainSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints only the final line.
struct PlainSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for PlainSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_uses_default_without_override() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());
        assert!(ui.confirm(&Prompt::confirm("install", "Install?", true)).unwrap());
        assert!(!ui.confirm(&Prompt::confirm("update", "Update?", false)).unwrap());
    }

    #[test]
    fn confirm_uses_env_override() {
        let mut overrides = HashMap::new();
        overrides.insert("MODKEEPER_PROMPT_UPDATE".to_string(), "yes".to_string());
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, overrides);

        assert!(ui.confirm(&Prompt::confirm("update", "Update?", false)).unwrap());
    }

    #[test]
    fn override_key_is_uppercased_with_underscores() {
        assert_eq!(
            NonInteractiveUI::env_key("remove-old"),
            "MODKEEPER_PROMPT_REMOVE_OLD"
        );
    }

    #[test]
    fn invalid_override_falls_back_to_default() {
        let mut overrides = HashMap::new();
        overrides.insert("MODKEEPER_PROMPT_FIX".to_string(), "sure".to_string());
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, overrides);

        assert!(!ui.confirm(&Prompt::confirm("fix", "Fix?", false)).unwrap());
    }

    #[test]
    fn is_never_interactive() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert!(!ui.is_interactive());
    }

    #[test]
    fn silent_spinner_finishes_quietly() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());
        let mut spinner = ui.start_spinner("Installing Az");
        spinner.set_message("still going");
        spinner.finish_success("Installed Az");
    }
}
