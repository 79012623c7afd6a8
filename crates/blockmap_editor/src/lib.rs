//! blockmap_editor - Editing core for metatile maps
//!
//! This crate provides everything between a user's click and a changed grid:
//! - Paint, flood fill, magic fill and smart-path tools
//! - Shift and resize of whole layouts
//! - Reversible, mergeable edit commands
//! - Per-layout undo/redo history with a saved checkpoint
//! - Render change notifications for a host renderer
//!
//! # Usage
//!
//! ```rust,ignore
//! use blockmap_editor::{EditSource, Editor, EditorPreferences};
//! use blockmap_editor::blockmap_core::SelectionPattern;
//!
//! let mut editor = Editor::new(EditorPreferences::load());
//! let layout = editor.create_layout("Route 101")?;
//!
//! editor.set_brush(SelectionPattern::single(0x01));
//! editor.flood_fill(layout, 0, 0, EditSource::User)?;
//! editor.undo(layout)?;
//! ```

pub mod commands;
pub mod preferences;
pub mod render;
pub mod tools;

#[cfg(feature = "bevy")]
mod plugin;
mod session;

pub use blockmap_core;

pub use commands::{ActionId, CommandKind, EditCommand, EditHistory, ResizeEdit, SnapshotEdit};
#[cfg(feature = "bevy")]
pub use plugin::BlockmapEditorPlugin;
pub use preferences::{EditorPreferences, NewLayoutSettings, PreferencesError};
pub use render::{GridChange, NullSink, ObserverId, RenderObservers, RenderSink, RenderState};
pub use session::{EditSource, Editor, EditorError};
pub use tools::ShiftEdge;
