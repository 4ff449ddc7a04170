//! Scene and dialogue references.
//!
//! A reference is either a 1-based position or an id. Positions win when a
//! reference parses as a number in range.

use anyhow::{Result, bail};
use roteiro_core::script::{DialogueId, Scene, SceneId, Script};

pub fn scene(script: &Script, reference: &str) -> Result<SceneId> {
    let reference = reference.trim();
    if let Some(scene) = reference
        .parse::<usize>()
        .ok()
        .and_then(|pos| script.scene_at(pos))
    {
        return Ok(scene.id.clone());
    }

    let id = SceneId::from(reference);
    if script.scene(&id).is_some() {
        return Ok(id);
    }

    if script.is_empty() {
        bail!("No scene '{reference}': the script is empty");
    }
    bail!(
        "No scene '{reference}' (use a position 1-{} or a scene id)",
        script.len()
    )
}

pub fn dialogue(scene: &Scene, reference: &str) -> Result<DialogueId> {
    let reference = reference.trim();
    if let Some(dialogue) = reference
        .parse::<usize>()
        .ok()
        .and_then(|pos| pos.checked_sub(1))
        .and_then(|i| scene.dialogues.get(i))
    {
        return Ok(dialogue.id.clone());
    }

    let id = DialogueId::from(reference);
    if scene.dialogue(&id).is_some() {
        return Ok(id);
    }

    if scene.dialogues.is_empty() {
        bail!("No dialogue '{reference}': the scene has no dialogues");
    }
    bail!(
        "No dialogue '{reference}' (use a position 1-{} or a dialogue id)",
        scene.dialogues.len()
    )
}
