//! Pure script edits.
//!
//! Every function takes a script by value and returns the edited script.
//! Unknown scene or dialogue ids leave the script unchanged. Relative order
//! of untouched scenes and dialogues is always preserved.

use crate::script::{Dialogue, DialogueId, Scene, SceneId, Script};

/// Editable dialogue fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueField {
    Character,
    Line,
}

/// Appends an empty scene and returns its id.
pub fn add_scene(mut script: Script) -> (Script, SceneId) {
    let scene = Scene::empty();
    let id = scene.id.clone();
    script.scenes.push(scene);
    (script, id)
}

pub fn delete_scene(mut script: Script, scene_id: &SceneId) -> Script {
    script.scenes.retain(|s| &s.id != scene_id);
    script
}

pub fn set_scene_content(script: Script, scene_id: &SceneId, content: &str) -> Script {
    with_scene(script, scene_id, |scene| scene.content = content.to_string())
}

/// Appends an empty dialogue to a scene. Returns `None` when the scene
/// does not exist.
pub fn add_dialogue(mut script: Script, scene_id: &SceneId) -> (Script, Option<DialogueId>) {
    let Some(scene) = script.scenes.iter_mut().find(|s| &s.id == scene_id) else {
        return (script, None);
    };
    let dialogue = Dialogue::empty();
    let id = dialogue.id.clone();
    scene.dialogues.push(dialogue);
    (script, Some(id))
}

pub fn delete_dialogue(script: Script, scene_id: &SceneId, dialogue_id: &DialogueId) -> Script {
    with_scene(script, scene_id, |scene| {
        scene.dialogues.retain(|d| &d.id != dialogue_id);
    })
}

/// Updates one dialogue field. Character names are upper-cased on entry.
pub fn set_dialogue_field(
    script: Script,
    scene_id: &SceneId,
    dialogue_id: &DialogueId,
    field: DialogueField,
    value: &str,
) -> Script {
    with_scene(script, scene_id, |scene| {
        let Some(dialogue) = scene.dialogues.iter_mut().find(|d| &d.id == dialogue_id) else {
            return;
        };
        match field {
            DialogueField::Character => dialogue.character = value.to_uppercase(),
            DialogueField::Line => dialogue.line = value.to_string(),
        }
    })
}

/// Replaces the entire script, typically with parser output.
#[allow(clippy::needless_pass_by_value)]
pub fn replace_script(_script: Script, replacement: Script) -> Script {
    replacement
}

/// Appends recognized speech to a scene's content, space-joined with any
/// existing text. Blank input is ignored.
pub fn append_transcript(script: Script, scene_id: &SceneId, text: &str) -> Script {
    let text = text.trim();
    if text.is_empty() {
        return script;
    }
    with_scene(script, scene_id, |scene| {
        if !scene.content.is_empty() {
            scene.content.push(' ');
        }
        scene.content.push_str(text);
    })
}

pub fn set_listening(script: Script, scene_id: &SceneId, listening: bool) -> Script {
    with_scene(script, scene_id, |scene| scene.listening = listening)
}

fn with_scene(mut script: Script, scene_id: &SceneId, edit: impl FnOnce(&mut Scene)) -> Script {
    if let Some(scene) = script.scenes.iter_mut().find(|s| &s.id == scene_id) {
        edit(scene);
    }
    script
}
