//! Infrastructure implementation of the `Interaction` port on `dialoguer`.
//!
//! Prompts render on stderr. In non-interactive mode (CI, `--yes`,
//! `FLEETJOIN_YES`) nothing is shown: confirmations take their default, text
//! questions take a valid default, and anything else is an error.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};

use crate::application::ports::{Interaction, TextValidator};

pub struct TerminalPrompt {
    non_interactive: bool,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }
}

impl Interaction for TerminalPrompt {
    fn select_one(&self, prompt: &str, options: &[String]) -> Result<usize> {
        anyhow::ensure!(
            !self.non_interactive,
            "'{prompt}' needs an answer, but prompts are disabled (--yes)"
        );
        Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()
            .with_context(|| format!("prompt '{prompt}'"))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .with_context(|| format!("prompt '{prompt}'"))
    }

    fn ask_text(
        &self,
        prompt: &str,
        default: Option<&str>,
        validate: TextValidator<'_>,
    ) -> Result<String> {
        if self.non_interactive {
            let value = default.with_context(|| {
                format!("'{prompt}' needs an answer, but prompts are disabled (--yes)")
            })?;
            validate(value).map_err(|msg| anyhow::anyhow!("default for '{prompt}' rejected: {msg}"))?;
            return Ok(value.to_string());
        }

        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .validate_with(|s: &String| validate(s));
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        input
            .interact_text()
            .with_context(|| format!("prompt '{prompt}'"))
    }
}
