//! Reversible edit commands and the undo history that owns them
//!
//! Every grid mutation in the editor is an [`EditCommand`] holding deep
//! copies of the grid before and after the edit. Applying a command writes
//! its after-snapshot into the live grid, reverting writes the
//! before-snapshot back.

mod history;

pub use history::EditHistory;

use crate::render::{GridChange, RenderSink};
use blockmap_core::{GridError, GridRef, GridTarget, LayoutId, Layouts, Snapshot};

/// Groups low-level edits into one user-visible undo step.
///
/// A new id is issued for every mouse press; every edit made while the
/// button is held shares it.
pub type ActionId = u32;

/// Discriminator for [`EditCommand`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    PaintMetatiles,
    PaintBorder,
    BucketFill,
    MagicFill,
    Shift,
    Resize,
    ScriptEdit,
}

impl CommandKind {
    /// Label shown in undo/redo menus
    pub fn text(self) -> &'static str {
        match self {
            CommandKind::PaintMetatiles => "Paint Metatiles",
            CommandKind::PaintBorder => "Paint Border",
            CommandKind::BucketFill => "Bucket Fill Metatiles",
            CommandKind::MagicFill => "Magic Fill Metatiles",
            CommandKind::Shift => "Shift Metatiles",
            CommandKind::Resize => "Resize Map",
            CommandKind::ScriptEdit => "Script Edit",
        }
    }

    /// Whether consecutive commands of this kind can collapse into one
    pub fn is_mergeable(self) -> bool {
        !matches!(self, CommandKind::PaintBorder | CommandKind::Resize)
    }

    fn target(self) -> GridTarget {
        match self {
            CommandKind::PaintBorder => GridTarget::Border,
            _ => GridTarget::Blockdata,
        }
    }

    fn full_redraw(self) -> bool {
        matches!(self, CommandKind::Shift | CommandKind::Resize)
    }
}

/// Before/after snapshots of one grid
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEdit {
    pub layout: LayoutId,
    pub action_id: ActionId,
    before: Snapshot,
    after: Snapshot,
}

impl SnapshotEdit {
    /// Both snapshots must have the same dimensions
    pub fn new(
        layout: LayoutId,
        before: Snapshot,
        after: Snapshot,
        action_id: ActionId,
    ) -> Result<Self, GridError> {
        if !before.same_dimensions(&after) {
            return Err(GridError::DimensionMismatch {
                expected: before.dimensions(),
                found: after.dimensions(),
            });
        }
        Ok(Self {
            layout,
            action_id,
            before,
            after,
        })
    }

    pub fn before(&self) -> &Snapshot {
        &self.before
    }

    pub fn after(&self) -> &Snapshot {
        &self.after
    }

    fn write(
        &self,
        target: GridTarget,
        snapshot: &Snapshot,
        full_redraw: bool,
        layouts: &mut Layouts,
        sink: &mut dyn RenderSink,
    ) {
        let grid_ref = GridRef {
            layout: self.layout,
            target,
        };
        let Some(grid) = layouts.grid_mut(grid_ref) else {
            tracing::debug!(layout = %self.layout, "Edit target no longer exists, skipping");
            return;
        };
        if let Err(e) = grid.copy_from(snapshot.grid()) {
            tracing::warn!(layout = %self.layout, "Could not restore grid: {}", e);
            return;
        }
        sink.notify_changed(GridChange {
            grid: grid_ref,
            full_redraw,
        });
    }
}

/// Old and new states of both grids of a resized layout
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeEdit {
    pub layout: LayoutId,
    old_blockdata: Snapshot,
    new_blockdata: Snapshot,
    old_border: Snapshot,
    new_border: Snapshot,
}

impl ResizeEdit {
    pub fn new(
        layout: LayoutId,
        old_blockdata: Snapshot,
        new_blockdata: Snapshot,
        old_border: Snapshot,
        new_border: Snapshot,
    ) -> Self {
        Self {
            layout,
            old_blockdata,
            new_blockdata,
            old_border,
            new_border,
        }
    }

    pub fn old_dimensions(&self) -> (u32, u32) {
        self.old_blockdata.dimensions()
    }

    pub fn new_dimensions(&self) -> (u32, u32) {
        self.new_blockdata.dimensions()
    }

    pub fn old_border_dimensions(&self) -> (u32, u32) {
        self.old_border.dimensions()
    }

    pub fn new_border_dimensions(&self) -> (u32, u32) {
        self.new_border.dimensions()
    }

    fn write(&self, forward: bool, layouts: &mut Layouts, sink: &mut dyn RenderSink) {
        let Some(layout) = layouts.get_mut(self.layout) else {
            tracing::debug!(layout = %self.layout, "Resize target no longer exists, skipping");
            return;
        };
        let (blockdata, border) = if forward {
            (&self.new_blockdata, &self.new_border)
        } else {
            (&self.old_blockdata, &self.old_border)
        };
        layout.blockdata.restore(blockdata);
        layout.border.restore(border);

        for grid in [GridRef::blockdata(self.layout), GridRef::border(self.layout)] {
            sink.notify_changed(GridChange {
                grid,
                full_redraw: true,
            });
        }
    }
}

/// A reversible edit of one layout
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    PaintMetatiles(SnapshotEdit),
    PaintBorder(SnapshotEdit),
    BucketFill(SnapshotEdit),
    MagicFill(SnapshotEdit),
    Shift(SnapshotEdit),
    /// Edits made by scripts, coalesced per script batch
    ScriptEdit(SnapshotEdit),
    Resize(ResizeEdit),
}

impl EditCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            EditCommand::PaintMetatiles(_) => CommandKind::PaintMetatiles,
            EditCommand::PaintBorder(_) => CommandKind::PaintBorder,
            EditCommand::BucketFill(_) => CommandKind::BucketFill,
            EditCommand::MagicFill(_) => CommandKind::MagicFill,
            EditCommand::Shift(_) => CommandKind::Shift,
            EditCommand::ScriptEdit(_) => CommandKind::ScriptEdit,
            EditCommand::Resize(_) => CommandKind::Resize,
        }
    }

    pub fn text(&self) -> &'static str {
        self.kind().text()
    }

    /// The layout this command edits
    pub fn layout(&self) -> LayoutId {
        match self {
            EditCommand::PaintMetatiles(edit)
            | EditCommand::PaintBorder(edit)
            | EditCommand::BucketFill(edit)
            | EditCommand::MagicFill(edit)
            | EditCommand::Shift(edit)
            | EditCommand::ScriptEdit(edit) => edit.layout,
            EditCommand::Resize(edit) => edit.layout,
        }
    }

    /// Action id, for kinds that carry one
    pub fn action_id(&self) -> Option<ActionId> {
        self.snapshot_edit().map(|edit| edit.action_id)
    }

    /// The snapshot payload of every kind except Resize
    pub fn snapshot_edit(&self) -> Option<&SnapshotEdit> {
        match self {
            EditCommand::PaintMetatiles(edit)
            | EditCommand::PaintBorder(edit)
            | EditCommand::BucketFill(edit)
            | EditCommand::MagicFill(edit)
            | EditCommand::Shift(edit)
            | EditCommand::ScriptEdit(edit) => Some(edit),
            EditCommand::Resize(_) => None,
        }
    }

    fn snapshot_edit_mut(&mut self) -> Option<&mut SnapshotEdit> {
        match self {
            EditCommand::PaintMetatiles(edit)
            | EditCommand::PaintBorder(edit)
            | EditCommand::BucketFill(edit)
            | EditCommand::MagicFill(edit)
            | EditCommand::Shift(edit)
            | EditCommand::ScriptEdit(edit) => Some(edit),
            EditCommand::Resize(_) => None,
        }
    }

    /// Redo: write the after state into the target grid
    pub fn apply(&self, layouts: &mut Layouts, sink: &mut dyn RenderSink) {
        self.write(true, layouts, sink);
    }

    /// Undo: write the before state back into the target grid
    pub fn revert(&self, layouts: &mut Layouts, sink: &mut dyn RenderSink) {
        self.write(false, layouts, sink);
    }

    fn write(&self, forward: bool, layouts: &mut Layouts, sink: &mut dyn RenderSink) {
        let kind = self.kind();
        match self {
            EditCommand::Resize(edit) => edit.write(forward, layouts, sink),
            _ => {
                if let Some(edit) = self.snapshot_edit() {
                    let snapshot = if forward { &edit.after } else { &edit.before };
                    edit.write(kind.target(), snapshot, kind.full_redraw(), layouts, sink);
                }
            }
        }
    }

    /// Fold `next` into this command.
    ///
    /// Succeeds only for two mergeable commands of the same kind, on the same
    /// layout, sharing an action id. The merged command keeps this command's
    /// before state and takes `next`'s after state.
    pub fn try_merge(&mut self, next: &EditCommand) -> bool {
        let kind = self.kind();
        if kind != next.kind() || !kind.is_mergeable() {
            return false;
        }
        let (Some(edit), Some(other)) = (self.snapshot_edit_mut(), next.snapshot_edit()) else {
            return false;
        };
        if edit.layout != other.layout || edit.action_id != other.action_id {
            return false;
        }
        if !edit.after.same_dimensions(&other.after) {
            return false;
        }
        edit.after = other.after.clone();
        true
    }

    /// Whether applying and reverting are the same thing
    pub fn is_noop(&self) -> bool {
        match self {
            EditCommand::Resize(edit) => {
                edit.old_blockdata == edit.new_blockdata && edit.old_border == edit.new_border
            }
            _ => self
                .snapshot_edit()
                .is_some_and(|edit| edit.before == edit.after),
        }
    }
}
