//! Editor session: the glue between tools, commands and histories
//!
//! The session owns every open layout together with one [`EditHistory`]
//! per layout. Tools run on a working copy of the target grid; when they
//! change something the before/after snapshots become an [`EditCommand`]
//! that the layout's history applies to the live grid.

use crate::commands::{ActionId, CommandKind, EditCommand, EditHistory, ResizeEdit, SnapshotEdit};
use crate::preferences::EditorPreferences;
use crate::render::{GridChange, ObserverId, RenderObservers, RenderSink, RenderState};
use crate::tools;
use blockmap_core::{
    validate_pattern, GridBuffer, GridError, GridTarget, Layout, LayoutError, LayoutId, Layouts,
    PatternError, SelectionPattern,
};
use std::collections::HashMap;

/// Who initiated an edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EditSource {
    /// Interactive edits, grouped per stroke
    #[default]
    User,
    /// Script edits, grouped per script batch into one undo step
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    UnknownLayout(LayoutId),
    Pattern(PatternError),
    Grid(GridError),
    Layout(LayoutError),
    /// Smart path tools need a 3x3 brush
    NotSmartPathPattern { width: u32, height: u32 },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::UnknownLayout(id) => write!(f, "Unknown layout {}", id),
            EditorError::Pattern(e) => write!(f, "Invalid brush: {}", e),
            EditorError::Grid(e) => write!(f, "Grid error: {}", e),
            EditorError::Layout(e) => write!(f, "Invalid layout: {}", e),
            EditorError::NotSmartPathPattern { width, height } => write!(
                f,
                "Smart path needs a 3x3 selection, got {}x{}",
                width, height
            ),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Pattern(e) => Some(e),
            EditorError::Grid(e) => Some(e),
            EditorError::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PatternError> for EditorError {
    fn from(e: PatternError) -> Self {
        EditorError::Pattern(e)
    }
}

impl From<GridError> for EditorError {
    fn from(e: GridError) -> Self {
        EditorError::Grid(e)
    }
}

impl From<LayoutError> for EditorError {
    fn from(e: LayoutError) -> Self {
        EditorError::Layout(e)
    }
}

/// An in-progress mouse stroke
#[derive(Debug, Clone, Copy)]
struct Stroke {
    action_id: ActionId,
    origin: (i32, i32),
}

/// Forwards every change to the dirty set and the registered observers
struct Fanout<'a> {
    state: &'a mut RenderState,
    observers: &'a mut RenderObservers,
}

impl RenderSink for Fanout<'_> {
    fn notify_changed(&mut self, change: GridChange) {
        self.state.notify_changed(change);
        self.observers.notify_changed(change);
    }
}

/// Editing state for a set of open layouts
#[derive(Debug, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct Editor {
    layouts: Layouts,
    histories: HashMap<LayoutId, EditHistory>,
    preferences: EditorPreferences,
    brush: SelectionPattern,
    last_action_id: ActionId,
    stroke: Option<Stroke>,
    script_action: Option<ActionId>,
    render_state: RenderState,
    observers: RenderObservers,
}

impl Editor {
    pub fn new(preferences: EditorPreferences) -> Self {
        Self {
            preferences,
            ..Default::default()
        }
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.preferences
    }

    /// Replace the preferences; the undo limit applies to every open history
    pub fn set_preferences(&mut self, preferences: EditorPreferences) {
        for history in self.histories.values_mut() {
            history.set_undo_limit(preferences.undo_limit);
        }
        self.preferences = preferences;
    }

    pub fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    pub fn layout(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(id)
    }

    pub fn history(&self, id: LayoutId) -> Option<&EditHistory> {
        self.histories.get(&id)
    }

    /// Create a layout using the new-layout defaults from the preferences
    pub fn create_layout(&mut self, name: impl Into<String>) -> Result<LayoutId, EditorError> {
        let settings = &self.preferences.new_layout;
        let (width, height) = (settings.width, settings.height);
        let (border_width, border_height) = (settings.border_width, settings.border_height);
        self.create_layout_with_size(name, width, height, border_width, border_height)
    }

    pub fn create_layout_with_size(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        border_width: u32,
        border_height: u32,
    ) -> Result<LayoutId, EditorError> {
        self.preferences
            .check_dimensions(width, height, border_width, border_height)?;
        let settings = &self.preferences.new_layout;
        let layout = Layout::new(
            name.into(),
            width,
            height,
            border_width,
            border_height,
            settings.fill_block(),
            settings.tilesets.clone(),
        );
        Ok(self.add_layout(layout))
    }

    /// Start tracking an existing layout with a fresh, clean history
    pub fn add_layout(&mut self, layout: Layout) -> LayoutId {
        tracing::info!(layout = %layout.id, name = %layout.name, "Opened layout");
        let id = self.layouts.insert(layout);
        self.histories
            .insert(id, EditHistory::with_undo_limit(self.preferences.undo_limit));
        id
    }

    /// Close a layout, dropping its history
    pub fn remove_layout(&mut self, id: LayoutId) -> Option<Layout> {
        self.histories.remove(&id);
        self.layouts.remove(id)
    }

    pub fn brush(&self) -> &SelectionPattern {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: SelectionPattern) {
        self.brush = brush;
    }

    /// Start a mouse stroke at (x, y). Edits until [`Editor::end_stroke`]
    /// share one action id, and paint positions snap to the brush size
    /// relative to the stroke origin.
    pub fn begin_stroke(&mut self, x: i32, y: i32) {
        let action_id = self.next_action_id();
        self.stroke = Some(Stroke {
            action_id,
            origin: (x, y),
        });
    }

    pub fn end_stroke(&mut self) {
        self.stroke = None;
    }

    /// Start grouping script edits into a single undo step
    pub fn begin_script_batch(&mut self) {
        self.script_action = Some(self.next_action_id());
    }

    pub fn end_script_batch(&mut self) {
        self.script_action = None;
    }

    /// Stamp the brush with its top-left corner at (x, y)
    pub fn paint(
        &mut self,
        id: LayoutId,
        x: i32,
        y: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        self.validate_brush(id)?;
        let (x, y) = self.snapped(x, y, source);
        let brush = self.brush.clone();
        self.edit(id, CommandKind::PaintMetatiles, source, |grid| {
            tools::paint(grid, x, y, &brush)
        })
    }

    /// Stamp the brush into the border grid
    pub fn paint_border(
        &mut self,
        id: LayoutId,
        x: i32,
        y: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        self.validate_brush(id)?;
        let brush = self.brush.clone();
        self.edit(id, CommandKind::PaintBorder, source, |grid| {
            tools::paint(grid, x, y, &brush)
        })
    }

    pub fn flood_fill(
        &mut self,
        id: LayoutId,
        x: i32,
        y: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        self.validate_brush(id)?;
        let brush = self.brush.clone();
        self.edit(id, CommandKind::BucketFill, source, |grid| {
            tools::flood_fill(grid, x, y, &brush)
        })
    }

    pub fn magic_fill(
        &mut self,
        id: LayoutId,
        x: i32,
        y: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        self.validate_brush(id)?;
        let brush = self.brush.clone();
        self.edit(id, CommandKind::MagicFill, source, |grid| {
            tools::magic_fill(grid, x, y, &brush)
        })
    }

    pub fn paint_smart_path(
        &mut self,
        id: LayoutId,
        x: i32,
        y: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        self.validate_smart_path_brush(id)?;
        let brush = self.brush.clone();
        self.edit(id, CommandKind::PaintMetatiles, source, |grid| {
            tools::paint_smart_path(grid, x, y, &brush)
        })
    }

    pub fn flood_fill_smart_path(
        &mut self,
        id: LayoutId,
        x: i32,
        y: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        self.validate_smart_path_brush(id)?;
        let brush = self.brush.clone();
        self.edit(id, CommandKind::BucketFill, source, |grid| {
            tools::flood_fill_smart_path(grid, x, y, &brush)
        })
    }

    /// Shift the whole blockdata grid using the configured edge policy
    pub fn shift(
        &mut self,
        id: LayoutId,
        dx: i32,
        dy: i32,
        source: EditSource,
    ) -> Result<bool, EditorError> {
        let edge = self.preferences.shift_edge;
        self.edit(id, CommandKind::Shift, source, |grid| {
            tools::shift(grid, dx, dy, edge)
        })
    }

    /// Resize both grids of a layout; new cells get the new-layout fill block
    pub fn resize(
        &mut self,
        id: LayoutId,
        width: u32,
        height: u32,
        border_width: u32,
        border_height: u32,
    ) -> Result<bool, EditorError> {
        self.preferences
            .check_dimensions(width, height, border_width, border_height)?;
        let fill = self.preferences.new_layout.fill_block();
        let layout = self.layouts.get(id).ok_or(EditorError::UnknownLayout(id))?;

        let command = EditCommand::Resize(ResizeEdit::new(
            id,
            layout.blockdata.snapshot(),
            tools::resized(&layout.blockdata, width, height, fill).snapshot(),
            layout.border.snapshot(),
            tools::resized(&layout.border, border_width, border_height, fill).snapshot(),
        ));
        if command.is_noop() {
            return Ok(false);
        }
        self.push(id, command);
        Ok(true)
    }

    pub fn undo(&mut self, id: LayoutId) -> Result<bool, EditorError> {
        let history = self
            .histories
            .get_mut(&id)
            .ok_or(EditorError::UnknownLayout(id))?;
        let mut sink = Fanout {
            state: &mut self.render_state,
            observers: &mut self.observers,
        };
        Ok(history.undo(&mut self.layouts, &mut sink))
    }

    pub fn redo(&mut self, id: LayoutId) -> Result<bool, EditorError> {
        let history = self
            .histories
            .get_mut(&id)
            .ok_or(EditorError::UnknownLayout(id))?;
        let mut sink = Fanout {
            state: &mut self.render_state,
            observers: &mut self.observers,
        };
        Ok(history.redo(&mut self.layouts, &mut sink))
    }

    /// Mark a layout's current state as saved
    pub fn set_clean(&mut self, id: LayoutId) -> Result<(), EditorError> {
        self.histories
            .get_mut(&id)
            .ok_or(EditorError::UnknownLayout(id))?
            .set_clean();
        Ok(())
    }

    /// Whether the layout differs from its last saved state
    pub fn has_unsaved_changes(&self, id: LayoutId) -> bool {
        self.histories.get(&id).is_some_and(|history| !history.is_clean())
    }

    /// Register a callback invoked on every grid change
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&GridChange) + Send + Sync + 'static,
    ) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Grids changed since the last call, one entry per grid
    pub fn take_dirty(&mut self) -> Vec<GridChange> {
        self.render_state.take_dirty()
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    fn next_action_id(&mut self) -> ActionId {
        self.last_action_id = self.last_action_id.wrapping_add(1);
        self.last_action_id
    }

    /// Action id grouping an edit from `source`.
    ///
    /// Outside a stroke or batch every edit is its own undo step.
    fn action_id(&mut self, source: EditSource) -> ActionId {
        let grouped = match source {
            EditSource::User => self.stroke.map(|stroke| stroke.action_id),
            EditSource::Script => self.script_action,
        };
        match grouped {
            Some(action_id) => action_id,
            None => self.next_action_id(),
        }
    }

    fn snapped(&self, x: i32, y: i32, source: EditSource) -> (i32, i32) {
        match (source, self.stroke) {
            (EditSource::User, Some(stroke)) => {
                tools::snap_to_pattern(stroke.origin, (x, y), self.brush.dimensions())
            }
            _ => (x, y),
        }
    }

    fn validate_brush(&self, id: LayoutId) -> Result<(), EditorError> {
        let layout = self.layouts.get(id).ok_or(EditorError::UnknownLayout(id))?;
        validate_pattern(&self.brush, &layout.tilesets)?;
        Ok(())
    }

    fn validate_smart_path_brush(&self, id: LayoutId) -> Result<(), EditorError> {
        if !tools::is_smart_path_pattern(&self.brush) {
            let (width, height) = self.brush.dimensions();
            return Err(EditorError::NotSmartPathPattern { width, height });
        }
        self.validate_brush(id)
    }

    /// Run `op` on a working copy of the grid `kind` targets and record the
    /// result. Returns whether anything changed.
    fn edit(
        &mut self,
        id: LayoutId,
        kind: CommandKind,
        source: EditSource,
        op: impl FnOnce(&mut GridBuffer) -> bool,
    ) -> Result<bool, EditorError> {
        let target = match kind {
            CommandKind::PaintBorder => GridTarget::Border,
            _ => GridTarget::Blockdata,
        };
        let layout = self.layouts.get(id).ok_or(EditorError::UnknownLayout(id))?;
        let mut working = layout.grid(target).clone();
        let before = working.snapshot();
        if !op(&mut working) {
            return Ok(false);
        }
        let after = working.snapshot();
        if before == after {
            return Ok(false);
        }

        let action_id = self.action_id(source);
        let edit = SnapshotEdit::new(id, before, after, action_id)?;
        let command = match (source, kind) {
            (EditSource::Script, kind) if kind != CommandKind::PaintBorder => {
                EditCommand::ScriptEdit(edit)
            }
            (_, CommandKind::PaintBorder) => EditCommand::PaintBorder(edit),
            (_, CommandKind::BucketFill) => EditCommand::BucketFill(edit),
            (_, CommandKind::MagicFill) => EditCommand::MagicFill(edit),
            (_, CommandKind::Shift) => EditCommand::Shift(edit),
            (_, CommandKind::ScriptEdit) => EditCommand::ScriptEdit(edit),
            _ => EditCommand::PaintMetatiles(edit),
        };
        self.push(id, command);
        Ok(true)
    }

    fn push(&mut self, id: LayoutId, command: EditCommand) {
        let undo_limit = self.preferences.undo_limit;
        let history = self
            .histories
            .entry(id)
            .or_insert_with(|| EditHistory::with_undo_limit(undo_limit));
        let mut sink = Fanout {
            state: &mut self.render_state,
            observers: &mut self.observers,
        };
        history.push(command, &mut self.layouts, &mut sink);
    }
}
