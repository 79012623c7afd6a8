use crate::preferences::EditorPreferences;
use crate::session::Editor;
use bevy::prelude::*;

/// Inserts an [`Editor`] resource configured from the saved preferences
#[derive(Default)]
pub struct BlockmapEditorPlugin;

impl Plugin for BlockmapEditorPlugin {
    fn build(&self, app: &mut App) {
        let preferences = EditorPreferences::load();
        tracing::info!("Loaded editor preferences");

        app.insert_resource(Editor::new(preferences.clone()))
            .insert_resource(preferences);
    }
}
