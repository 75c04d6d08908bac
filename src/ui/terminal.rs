use colored::Colorize;

use super::clipboard::{Clipboard, SystemClipboard};
use super::presenter::{CommitReport, MessageAction, Notice, Presenter, SplitChoice};
use super::spinner::Spinner;
use super::{colors, prompt};
use crate::error::{Result, WizardError};
use crate::llm::CommitSuggestion;
use crate::split::{EditCommand, EditorState, FileGroup, GroupEditor};

/// [`Presenter`] backed by inquire prompts on the current terminal.
pub struct TerminalPresenter {
    colored: bool,
    silent: bool,
    clipboard: Box<dyn Clipboard>,
}

impl TerminalPresenter {
    pub fn new(colored: bool, silent: bool) -> Self {
        Self {
            colored,
            silent,
            clipboard: Box::new(SystemClipboard::default()),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    fn render_message(&self, message: &str) {
        let rule = "─".repeat(60);
        if self.colored {
            println!("\n{}", rule.bright_black());
            println!("{}", message.cyan());
            println!("{}\n", rule.bright_black());
        } else {
            println!("\n{}\n{}\n{}\n", rule, message, rule);
        }
    }

    fn group_label(group: &FileGroup) -> String {
        let count = group.files.len();
        format!(
            "{} ({} file{})",
            group.name,
            count,
            if count == 1 { "" } else { "s" }
        )
    }

    /// One step of the group editor; `Ok(false)` once the user is done.
    fn editor_step(&mut self, editor: &mut GroupEditor) -> Result<bool> {
        let state = editor.state().clone();
        let command = match state {
            EditorState::Idle => {
                let groups = editor.groups();
                let mut options: Vec<String> = groups.iter().map(Self::group_label).collect();
                options.push("+ Create a new group".to_string());
                options.push("✓ Done".to_string());
                let choice = prompt::select_index("Select a group to edit:", options)?;
                match choice {
                    i if i < groups.len() => EditCommand::Select(groups[i].id.clone()),
                    i if i == groups.len() => EditCommand::BeginCreate,
                    _ => return Ok(false),
                }
            }
            EditorState::Editing(id) => {
                let Some(group) = editor.group(&id) else {
                    editor.apply(EditCommand::Back)?;
                    return Ok(true);
                };
                let title = format!("Editing '{}':", group.name);
                let options = vec![
                    "Rename".to_string(),
                    "Move a file to another group".to_string(),
                    "Merge into another group".to_string(),
                    "Delete group (files go to another group)".to_string(),
                    "Back".to_string(),
                ];
                match prompt::select_index(&title, options)? {
                    0 => EditCommand::Rename(prompt::text("New name:", &group.name)?),
                    1 => {
                        let file = prompt::select("File to move:", group.files.clone())?;
                        let targets: Vec<&FileGroup> =
                            editor.groups().iter().filter(|g| g.id != id).collect();
                        if targets.is_empty() {
                            colors::warning("There is no other group.", self.colored);
                            return Ok(true);
                        }
                        let labels = targets.iter().map(|g| Self::group_label(g)).collect();
                        let idx = prompt::select_index("Move to:", labels)?;
                        EditCommand::MoveFile {
                            file,
                            to: targets[idx].id.clone(),
                        }
                    }
                    2 => EditCommand::BeginMerge,
                    3 => {
                        if !prompt::confirm("Delete this group?", false)? {
                            return Ok(true);
                        }
                        EditCommand::Delete
                    }
                    _ => EditCommand::Back,
                }
            }
            EditorState::Merging(id) => {
                let targets: Vec<&FileGroup> =
                    editor.groups().iter().filter(|g| g.id != id).collect();
                let mut labels: Vec<String> = targets.iter().map(|g| Self::group_label(g)).collect();
                labels.push("Back".to_string());
                let idx = prompt::select_index("Merge into:", labels)?;
                match targets.get(idx) {
                    Some(target) => EditCommand::MergeInto(target.id.clone()),
                    None => EditCommand::Back,
                }
            }
            EditorState::Creating => {
                let name = prompt::text("Name of the new group:", "")?;
                let all_files: Vec<String> = editor
                    .groups()
                    .iter()
                    .flat_map(|g| g.files.iter().cloned())
                    .collect();
                let files = prompt::pick_many("Files for the new group:", all_files)?;
                EditCommand::Create { name, files }
            }
        };

        let creating = matches!(editor.state(), EditorState::Creating);
        if let Err(e) = editor.apply(command) {
            colors::warning(&e.to_string(), self.colored);
            if creating {
                editor.apply(EditCommand::Back)?;
            }
        }
        Ok(true)
    }
}

impl Presenter for TerminalPresenter {
    fn show_groups(&mut self, groups: &[FileGroup], confidence_threshold: f64) {
        println!();
        for (idx, group) in groups.iter().enumerate() {
            let header = format!("{}. {}", idx + 1, Self::group_label(group));
            let low = group.is_low_confidence(confidence_threshold);
            let confidence = format!("confidence {:.0}%", group.confidence * 100.0);
            if self.colored {
                let confidence = if low {
                    format!("{} (low)", confidence).yellow()
                } else {
                    confidence.bright_black()
                };
                println!("{} {}", header.bold(), confidence);
                println!("   {}", group.description.bright_black());
            } else {
                let flag = if low { " (low)" } else { "" };
                println!("{} {}{}", header, confidence, flag);
                println!("   {}", group.description);
            }
            for file in &group.files {
                println!("   - {}", file);
            }
        }
        println!();
    }

    fn choose_split_mode(&mut self, _groups: &[FileGroup]) -> Result<SplitChoice> {
        let options = vec![
            "Commit these groups".to_string(),
            "Edit groups".to_string(),
            "Choose files manually instead".to_string(),
            "Cancel".to_string(),
        ];
        Ok(match prompt::select_index("How do you want to proceed?", options)? {
            0 => SplitChoice::Proceed,
            1 => SplitChoice::Edit,
            2 => SplitChoice::Manual,
            _ => SplitChoice::Cancel,
        })
    }

    fn edit_groups(&mut self, groups: Vec<FileGroup>) -> Result<Vec<FileGroup>> {
        let mut editor = GroupEditor::new(groups);
        loop {
            match self.editor_step(&mut editor) {
                Ok(true) => {}
                Ok(false) => break,
                // Esc steps back instead of aborting the run
                Err(WizardError::UserCancelled) => {
                    if matches!(editor.state(), EditorState::Idle) {
                        break;
                    }
                    editor.apply(EditCommand::Back)?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(editor.into_groups())
    }

    fn select_files(&mut self, files: &[String]) -> Result<Vec<String>> {
        prompt::multi_select("Select the files for this commit:", files.to_vec())
    }

    fn review_message(&mut self, scope: &str, suggestion: &CommitSuggestion) -> Result<MessageAction> {
        colors::step(
            suggestion.commit_type.as_str(),
            &format!("Suggested message for {}", scope),
            self.colored,
        );
        self.render_message(&suggestion.message);

        let options = vec![
            "Commit".to_string(),
            "Edit message".to_string(),
            "Copy message".to_string(),
            "Cancel".to_string(),
        ];
        Ok(match prompt::select_index("What do you want to do?", options)? {
            0 => MessageAction::Commit,
            1 => MessageAction::Edit,
            2 => MessageAction::Copy,
            _ => MessageAction::Cancel,
        })
    }

    fn edit_message(&mut self, original: &str) -> Result<Option<String>> {
        let edited = match prompt::commit_message_input(original) {
            Ok(edited) => edited,
            Err(WizardError::UserCancelled) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.render_message(&edited);
        match prompt::confirm("Commit with this message?", true) {
            Ok(true) => Ok(Some(edited)),
            Ok(false) | Err(WizardError::UserCancelled) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn copy_message(&mut self, message: &str) -> Result<bool> {
        match self.clipboard.set_text(message) {
            Ok(()) => {
                self.notify(Notice::Success, "Message copied to the clipboard.");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Could not copy to the clipboard: {}", e);
                colors::warning(
                    &format!("Could not copy to the clipboard ({}). Copy the message below:", e),
                    self.colored,
                );
                self.render_message(message);
                Ok(false)
            }
        }
    }

    fn confirm_continue(&mut self, remaining: usize) -> Result<bool> {
        prompt::confirm(
            &format!("Continue with the next commit? ({} remaining)", remaining),
            true,
        )
    }

    fn show_dry_run(&mut self, scope: &str, suggestion: &CommitSuggestion) {
        colors::info(&format!("[dry-run] {}", scope), self.colored);
        self.render_message(&suggestion.message);
    }

    fn show_commit_result(&mut self, scope: &str, report: CommitReport<'_>) {
        match report {
            CommitReport::Committed { hash, message } => {
                if !self.silent {
                    let short = hash.get(..7).unwrap_or(hash);
                    colors::success(&format!("[{}] {}", short, message), self.colored);
                }
            }
            CommitReport::Failed { error } => {
                colors::error(&format!("Commit failed for {}: {}", scope, error), self.colored);
            }
        }
    }

    fn notify(&mut self, level: Notice, message: &str) {
        match level {
            Notice::Error => colors::error(message, self.colored),
            _ if self.silent => {}
            Notice::Info => colors::info(message, self.colored),
            Notice::Success => colors::success(message, self.colored),
            Notice::Warning => colors::warning(message, self.colored),
        }
    }

    fn progress(&mut self, message: &str) -> Option<Spinner> {
        if self.silent {
            None
        } else {
            Some(Spinner::new(message, self.colored))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::clipboard::MockClipboard;

    #[test]
    fn test_copy_message_uses_clipboard() {
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_set_text()
            .withf(|text| text == "feat: add login")
            .times(1)
            .returning(|_| Ok(()));
        let mut presenter = TerminalPresenter::new(false, true).with_clipboard(Box::new(clipboard));

        assert!(presenter.copy_message("feat: add login").unwrap());
    }

    #[test]
    fn test_copy_message_falls_back_to_printing() {
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_set_text()
            .times(1)
            .returning(|_| Err(WizardError::Clipboard(arboard::Error::ClipboardNotSupported)));
        let mut presenter = TerminalPresenter::new(false, false).with_clipboard(Box::new(clipboard));

        // printed instead, and not an error for the run
        assert!(!presenter.copy_message("fix: handle empty input").unwrap());
    }

    #[test]
    fn test_group_label_pluralises() {
        let one = FileGroup::new("a", "Docs", vec!["README.md".to_string()]);
        let two = FileGroup::new("b", "Core", vec!["a.rs".to_string(), "b.rs".to_string()]);
        assert_eq!(TerminalPresenter::group_label(&one), "Docs (1 file)");
        assert_eq!(TerminalPresenter::group_label(&two), "Core (2 files)");
    }
}
