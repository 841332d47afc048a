//! Interactive questions asked while saving a project

use anstyle::{AnsiColor, Reset, Style};
use inquire::error::InquireError;
use inquire::{Confirm, Select, Text};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("prompt failed: {0}")]
pub struct PromptError(String);

impl From<InquireError> for PromptError {
    fn from(e: InquireError) -> Self {
        PromptError(e.to_string())
    }
}

/// Asks the user for values. `Ok(None)` means the prompt was dismissed, which
/// is different from an empty answer.
pub trait Prompter {
    /// Ask for free text, pre-filled with `default` when given.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the prompt cannot be shown.
    fn input(&mut self, message: &str, default: Option<&str>)
    -> Result<Option<String>, PromptError>;

    /// Ask a yes/no question. Dismissal counts as "no".
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the prompt cannot be shown.
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError>;

    /// Pick one of `options`, returning its index.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the prompt cannot be shown.
    fn choose(&mut self, message: &str, options: &[&str]) -> Result<Option<usize>, PromptError>;

    fn warn(&mut self, message: &str);

    fn info(&mut self, message: &str);
}

const WARN_STYLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));
const INFO_STYLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)));

/// Escape cancels a prompt; treat that as a dismissal rather than an error.
fn skippable<T>(result: Result<T, InquireError>) -> Result<Option<T>, PromptError> {
    match result {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// [`Prompter`] backed by `inquire` on the controlling terminal
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn input(
        &mut self,
        message: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, PromptError> {
        let mut text = Text::new(message);
        if let Some(default) = default {
            text = text.with_initial_value(default);
        }
        Ok(text.prompt_skippable()?)
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        Ok(Confirm::new(message)
            .with_default(false)
            .prompt_skippable()?
            .unwrap_or(false))
    }

    fn choose(&mut self, message: &str, options: &[&str]) -> Result<Option<usize>, PromptError> {
        let answer = skippable(Select::new(message, options.to_vec()).raw_prompt())?;
        Ok(answer.map(|option| option.index))
    }

    fn warn(&mut self, message: &str) {
        eprintln!("{WARN_STYLE}!{Reset} {message}");
    }

    fn info(&mut self, message: &str) {
        eprintln!("{INFO_STYLE}✓{Reset} {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skippable_answer() {
        assert_eq!(skippable(Ok::<_, InquireError>(2)).unwrap(), Some(2));
    }

    #[test]
    fn test_skippable_cancel_is_dismissal() {
        let result = skippable(Err::<usize, _>(InquireError::OperationCanceled));
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_skippable_interrupt_is_error() {
        let result = skippable(Err::<usize, _>(InquireError::OperationInterrupted));
        assert!(result.is_err());
    }
}
