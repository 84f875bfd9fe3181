//! Terminal prompts backed by dialoguer.

use std::io::ErrorKind;

use anyhow::{Context, Result};
use dialoguer::{MultiSelect, Select};
use template_sync::{ChangedFilePrompt, PromptError, RemoteFile, Selection};

/// Asks which locally modified files to overwrite.
pub struct DialoguerPrompt;

impl ChangedFilePrompt for DialoguerPrompt {
    fn select(&self, changed: &[&RemoteFile], defaults: &[bool]) -> Result<Selection, PromptError> {
        let items: Vec<&str> = changed.iter().map(|f| f.relative_path.as_str()).collect();

        let answer = MultiSelect::new()
            .with_prompt("These files differ locally. Overwrite (space to toggle, enter to confirm, esc to cancel)")
            .items(&items)
            .defaults(defaults)
            .interact_opt();

        match cancel_on_interrupt(answer).map_err(|e| PromptError(e.to_string()))? {
            Some(indices) => Ok(Selection::Chosen(indices)),
            None => Ok(Selection::Cancelled),
        }
    }
}

/// Pick one entry; `None` when the operator backs out.
pub fn choose_one(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    let answer = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt();

    cancel_on_interrupt(answer).context("selection prompt failed")
}

/// Ctrl-C in raw mode surfaces as an interrupted read; that is a cancel.
fn cancel_on_interrupt<T>(
    answer: Result<Option<T>, dialoguer::Error>,
) -> Result<Option<T>, dialoguer::Error> {
    match answer {
        Err(dialoguer::Error::IO(e)) if e.kind() == ErrorKind::Interrupted => Ok(None),
        other => other,
    }
}
