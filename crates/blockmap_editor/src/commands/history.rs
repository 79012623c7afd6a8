//! Undo/redo stack with a clean (saved) checkpoint

use super::EditCommand;
use crate::render::RenderSink;
use blockmap_core::Layouts;

/// Ordered stack of edit commands with an undo/redo position.
///
/// Commands before `index` have been applied; commands from `index` on
/// form the redo branch. The clean index marks the position that matches
/// what is saved on disk, and is lost once that position can no longer
/// be reached.
#[derive(Debug)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct EditHistory {
    commands: Vec<EditCommand>,
    index: usize,
    clean_index: Option<usize>,
    /// Maximum number of commands kept (0 = unlimited)
    undo_limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// An empty, clean history
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: 0,
            clean_index: Some(0),
            undo_limit: 0,
        }
    }

    /// An empty, clean history that keeps at most `undo_limit` commands
    pub fn with_undo_limit(undo_limit: usize) -> Self {
        Self {
            undo_limit,
            ..Self::new()
        }
    }

    /// Apply `command` and record it.
    ///
    /// The redo branch is discarded. If the command can merge with the one
    /// on top of the stack it is folded into it instead of being appended,
    /// unless the top is the clean checkpoint. A merge that cancels out
    /// removes the top command entirely.
    pub fn push(&mut self, command: EditCommand, layouts: &mut Layouts, sink: &mut dyn RenderSink) {
        command.apply(layouts, sink);

        if self.index < self.commands.len() {
            if self.clean_index.is_some_and(|clean| clean > self.index) {
                self.clean_index = None;
            }
            self.commands.truncate(self.index);
        }

        if self.index > 0 && self.clean_index != Some(self.index) {
            if let Some(top) = self.commands.last_mut() {
                if top.try_merge(&command) {
                    tracing::debug!(command = top.text(), "Merged edit into previous command");
                    if top.is_noop() {
                        self.commands.pop();
                        self.index -= 1;
                    }
                    return;
                }
            }
        }

        tracing::debug!(command = command.text(), index = self.index, "Pushed edit");
        self.commands.push(command);
        self.index += 1;
        self.enforce_undo_limit();
    }

    /// Revert the most recent applied command. Returns false at the bottom.
    pub fn undo(&mut self, layouts: &mut Layouts, sink: &mut dyn RenderSink) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        let command = &self.commands[self.index];
        tracing::debug!(command = command.text(), index = self.index, "Undo");
        command.revert(layouts, sink);
        true
    }

    /// Re-apply the next command of the redo branch. Returns false at the top.
    pub fn redo(&mut self, layouts: &mut Layouts, sink: &mut dyn RenderSink) -> bool {
        let Some(command) = self.commands.get(self.index) else {
            return false;
        };
        tracing::debug!(command = command.text(), index = self.index, "Redo");
        command.apply(layouts, sink);
        self.index += 1;
        true
    }

    /// Mark the current position as saved
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }

    pub fn clean_index(&self) -> Option<usize> {
        self.clean_index
    }

    /// Drop every command; the empty history counts as clean
    pub fn clear(&mut self) {
        self.commands.clear();
        self.index = 0;
        self.clean_index = Some(0);
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.commands.len()
    }

    /// Label of the command `undo` would revert
    pub fn undo_text(&self) -> Option<&'static str> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.commands.get(index))
            .map(EditCommand::text)
    }

    /// Label of the command `redo` would apply
    pub fn redo_text(&self) -> Option<&'static str> {
        self.commands.get(self.index).map(EditCommand::text)
    }

    /// Current position: the number of applied commands
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[EditCommand] {
        &self.commands
    }

    pub fn undo_limit(&self) -> usize {
        self.undo_limit
    }

    /// Change the limit, dropping the oldest applied commands if needed
    pub fn set_undo_limit(&mut self, undo_limit: usize) {
        self.undo_limit = undo_limit;
        self.enforce_undo_limit();
    }

    fn enforce_undo_limit(&mut self) {
        if self.undo_limit == 0 || self.commands.len() <= self.undo_limit {
            return;
        }
        let excess = (self.commands.len() - self.undo_limit).min(self.index);
        self.commands.drain(..excess);
        self.index -= excess;
        self.clean_index = self.clean_index.and_then(|clean| clean.checked_sub(excess));
        tracing::debug!(dropped = excess, "Undo limit reached");
    }
}
