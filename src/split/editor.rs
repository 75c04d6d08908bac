//! Group editing as an explicit state machine.
//!
//! ```text
//! Idle ──Select──▶ Editing(g) ──BeginMerge──▶ Merging(g) ──MergeInto──▶ Idle
//!  │  ▲             │  Rename / MoveFile (stay)    │
//!  │  └──Back/Delete┘                              └──Back──▶ Editing(g)
//!  └──BeginCreate──▶ Creating ──Create──▶ Idle
//!                        └──Back──▶ Idle
//! ```
//!
//! Every transition keeps the groups a partition of the same file set:
//! files only ever move between groups, and a group left without files is
//! removed.

use super::{FileGroup, GroupIdAllocator};
use crate::error::{Result, WizardError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Editing(String),
    Merging(String),
    Creating,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Idle → Editing(group)
    Select(String),
    /// Editing: new display name
    Rename(String),
    /// Editing: move one file of the edited group into another group
    MoveFile { file: String, to: String },
    /// Editing → Merging
    BeginMerge,
    /// Merging → Idle: the edited group is folded into `target`
    MergeInto(String),
    /// Editing → Idle: files go to the first remaining group
    Delete,
    /// Idle → Creating
    BeginCreate,
    /// Creating → Idle: a new group takes `files` from their current groups
    Create { name: String, files: Vec<String> },
    /// One step back
    Back,
}

/// Applies [`EditCommand`]s to a partition.
#[derive(Debug)]
pub struct GroupEditor {
    groups: Vec<FileGroup>,
    state: EditorState,
    ids: GroupIdAllocator,
}

fn invalid(msg: impl Into<String>) -> WizardError {
    WizardError::InvalidInput(msg.into())
}

impl GroupEditor {
    pub fn new(groups: Vec<FileGroup>) -> Self {
        let ids = GroupIdAllocator::with_taken(groups.iter().map(|g| g.id.as_str()));
        Self {
            groups,
            state: EditorState::Idle,
            ids,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn groups(&self) -> &[FileGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&FileGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn into_groups(self) -> Vec<FileGroup> {
        self.groups
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| invalid(format!("unknown group '{}'", id)))
    }

    /// Edits move files around, so any reconstructed diff is stale.
    fn touch(&mut self, idx: usize) {
        self.groups[idx].diff.clear();
    }

    fn drop_empty_groups(&mut self) {
        self.groups.retain(|g| !g.files.is_empty());
    }

    /// Applies one command.
    ///
    /// # Errors
    /// [`WizardError::InvalidInput`] when the command does not fit the
    /// current state or names an unknown group or file. The editor is left
    /// unchanged in that case.
    pub fn apply(&mut self, command: EditCommand) -> Result<()> {
        let state = self.state.clone();
        match (state, command) {
            (EditorState::Idle, EditCommand::Select(id)) => {
                self.index_of(&id)?;
                self.state = EditorState::Editing(id);
            }
            (EditorState::Idle, EditCommand::BeginCreate) => {
                self.state = EditorState::Creating;
            }

            (EditorState::Editing(id), EditCommand::Rename(name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(invalid("group name cannot be empty"));
                }
                let idx = self.index_of(&id)?;
                self.groups[idx].name = name.to_string();
            }
            (EditorState::Editing(id), EditCommand::MoveFile { file, to }) => {
                self.move_file(&id, &file, &to)?;
            }
            (EditorState::Editing(id), EditCommand::BeginMerge) => {
                if self.groups.len() < 2 {
                    return Err(invalid("there is no other group to merge into"));
                }
                self.state = EditorState::Merging(id);
            }
            (EditorState::Editing(id), EditCommand::Delete) => {
                self.delete(&id)?;
                self.state = EditorState::Idle;
            }
            (EditorState::Editing(_), EditCommand::Back) => {
                self.state = EditorState::Idle;
            }

            (EditorState::Merging(id), EditCommand::MergeInto(target)) => {
                self.merge(&id, &target)?;
                self.state = EditorState::Idle;
            }
            (EditorState::Merging(id), EditCommand::Back) => {
                self.state = EditorState::Editing(id);
            }

            (EditorState::Creating, EditCommand::Create { name, files }) => {
                self.create(&name, files)?;
                self.state = EditorState::Idle;
            }
            (EditorState::Creating, EditCommand::Back) => {
                self.state = EditorState::Idle;
            }

            (state, command) => {
                return Err(invalid(format!(
                    "{:?} is not possible while {:?}",
                    command, state
                )));
            }
        }
        Ok(())
    }

    fn move_file(&mut self, from: &str, file: &str, to: &str) -> Result<()> {
        if from == to {
            return Err(invalid("file is already in that group"));
        }
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        let pos = self.groups[from_idx]
            .files
            .iter()
            .position(|f| f == file)
            .ok_or_else(|| invalid(format!("'{}' is not in group '{}'", file, from)))?;

        let moved = self.groups[from_idx].files.remove(pos);
        self.groups[to_idx].files.push(moved);
        self.touch(from_idx);
        self.touch(to_idx);

        if self.groups[from_idx].files.is_empty() {
            // the edited group vanished with its last file
            self.groups.remove(from_idx);
            self.state = EditorState::Idle;
        }
        Ok(())
    }

    fn merge(&mut self, source: &str, target: &str) -> Result<()> {
        if source == target {
            return Err(invalid("cannot merge a group into itself"));
        }
        let target_idx = self.index_of(target)?;
        let source_idx = self.index_of(source)?;

        let donor = self.groups[source_idx].clone();
        let receiver = &mut self.groups[target_idx];
        receiver.files.extend(donor.files);
        receiver.confidence = receiver.confidence.min(donor.confidence);
        self.touch(target_idx);
        self.groups.remove(source_idx);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let heir = (0..self.groups.len())
            .find(|&i| i != idx)
            .ok_or_else(|| invalid("cannot delete the only group"))?;

        let files = std::mem::take(&mut self.groups[idx].files);
        self.groups[heir].files.extend(files);
        self.touch(heir);
        self.groups.remove(idx);
        Ok(())
    }

    fn create(&mut self, name: &str, files: Vec<String>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("group name cannot be empty"));
        }
        let files = super::dedup_paths(&files);
        if files.is_empty() {
            return Err(invalid("a new group needs at least one file"));
        }
        if let Some(unknown) = files
            .iter()
            .find(|f| !self.groups.iter().any(|g| g.files.contains(f)))
        {
            return Err(invalid(format!("'{}' is not part of any group", unknown)));
        }

        for idx in 0..self.groups.len() {
            let before = self.groups[idx].files.len();
            self.groups[idx].files.retain(|f| !files.contains(f));
            if self.groups[idx].files.len() != before {
                self.touch(idx);
            }
        }
        self.drop_empty_groups();

        let mut group = FileGroup::new(self.ids.next_id(), name, files);
        group.description = "Created manually".to_string();
        self.groups.push(group);
        Ok(())
    }
}
