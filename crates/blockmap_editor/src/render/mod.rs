//! Render notifications
//!
//! Commands never draw anything themselves. After writing a grid they tell
//! a [`RenderSink`] which grid changed; the host decides when to redraw.
//! Sinks only receive [`GridChange`] values, never a handle back into the
//! history, so a redraw can't re-enter an undo or redo in progress.

use blockmap_core::GridRef;
use std::collections::HashMap;

/// A grid whose contents were just replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridChange {
    pub grid: GridRef,
    /// Cached imagery for the grid can't be reused (shift, resize)
    pub full_redraw: bool,
}

/// Receives change notifications from edit commands
pub trait RenderSink {
    fn notify_changed(&mut self, change: GridChange);
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn notify_changed(&mut self, _change: GridChange) {}
}

/// Records every notification in order
impl RenderSink for Vec<GridChange> {
    fn notify_changed(&mut self, change: GridChange) {
        self.push(change);
    }
}

/// Tracks which grids need to be rebuilt before the next frame
#[derive(Debug, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct RenderState {
    /// Dirty grids and whether their cache must be dropped
    dirty: HashMap<GridRef, bool>,
}

impl RenderState {
    /// Whether any grid needs a rebuild
    pub fn needs_rebuild(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_dirty(&self, grid: GridRef) -> bool {
        self.dirty.contains_key(&grid)
    }

    /// Drain the pending changes, one per grid
    pub fn take_dirty(&mut self) -> Vec<GridChange> {
        self.dirty
            .drain()
            .map(|(grid, full_redraw)| GridChange { grid, full_redraw })
            .collect()
    }
}

impl RenderSink for RenderState {
    fn notify_changed(&mut self, change: GridChange) {
        let full_redraw = self.dirty.entry(change.grid).or_insert(false);
        *full_redraw |= change.full_redraw;
    }
}

/// Handle returned by [`RenderObservers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&GridChange) + Send + Sync>;

/// Callbacks invoked synchronously, in subscription order, on every change
#[derive(Default)]
pub struct RenderObservers {
    observers: Vec<(ObserverId, Observer)>,
    next_id: u64,
}

impl RenderObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&GridChange) + Send + Sync + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for RenderObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderObservers")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl RenderSink for RenderObservers {
    fn notify_changed(&mut self, change: GridChange) {
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }
}
