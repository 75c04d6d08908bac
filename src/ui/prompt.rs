//! Thin wrappers over inquire prompts.
//!
//! `Esc` and `Ctrl-C` surface as [`WizardError::UserCancelled`](crate::error::WizardError::UserCancelled)
//! through the `From<InquireError>` conversion.

use std::fmt::Display;

use inquire::validator::Validation;
use inquire::{Confirm, MultiSelect, Select, Text};

use crate::constants::commit::MAX_EDITED_MESSAGE_LENGTH;
use crate::error::Result;

/// Yes/no question.
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new(message).with_default(default).prompt()?)
}

/// Single choice from `options`.
pub fn select<T: Display>(message: &str, options: Vec<T>) -> Result<T> {
    Ok(Select::new(message, options).prompt()?)
}

/// Single choice, returning the position of the chosen option.
pub fn select_index(message: &str, options: Vec<String>) -> Result<usize> {
    Ok(Select::new(message, options).raw_prompt()?.index)
}

/// Multiple choice with nothing preselected.
pub fn pick_many(message: &str, options: Vec<String>) -> Result<Vec<String>> {
    Ok(MultiSelect::new(message, options).prompt()?)
}

/// Multiple choice; every option starts selected.
pub fn multi_select<T: Display>(message: &str, options: Vec<T>) -> Result<Vec<T>> {
    Ok(MultiSelect::new(message, options)
        .with_all_selected_by_default()
        .prompt()?)
}

/// Free text with an optional initial value; blank input is rejected.
pub fn text(message: &str, initial: &str) -> Result<String> {
    let answer = Text::new(message)
        .with_initial_value(initial)
        .with_validator(|input: &str| {
            Ok(if input.trim().is_empty() {
                Validation::Invalid("Value cannot be empty".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()?;
    Ok(answer.trim().to_string())
}

/// Checks a hand-edited commit message: non-empty and at most
/// [`MAX_EDITED_MESSAGE_LENGTH`] characters once trimmed.
pub fn validate_commit_message(input: &str) -> std::result::Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Commit message cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_EDITED_MESSAGE_LENGTH {
        return Err(format!(
            "Commit message must be at most {} characters",
            MAX_EDITED_MESSAGE_LENGTH
        ));
    }
    Ok(trimmed.to_string())
}

/// Text prompt for a commit message, validated with [`validate_commit_message`].
pub fn commit_message_input(initial: &str) -> Result<String> {
    let answer = Text::new("Edit the commit message:")
        .with_initial_value(initial)
        .with_validator(|input: &str| {
            Ok(match validate_commit_message(input) {
                Ok(_) => Validation::Valid,
                Err(msg) => Validation::Invalid(msg.into()),
            })
        })
        .prompt()?;
    Ok(answer.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_commit_message_trims() {
        assert_eq!(
            validate_commit_message("  feat: add login \n"),
            Ok("feat: add login".to_string())
        );
    }

    #[test]
    fn test_validate_commit_message_rejects_blank() {
        assert!(validate_commit_message("   ").is_err());
    }

    #[test]
    fn test_validate_commit_message_length_bound() {
        let exact = "x".repeat(MAX_EDITED_MESSAGE_LENGTH);
        assert!(validate_commit_message(&exact).is_ok());
        assert!(validate_commit_message(&format!("{exact}y")).is_err());
        // the bound applies after trimming
        assert!(validate_commit_message(&format!("  {exact}  ")).is_ok());
    }
}
