//! `roteiro dialogue` handlers.

use anyhow::{Context, Result};
use roteiro_core::edits::DialogueField;
use roteiro_core::script::{DialogueId, SceneId};
use roteiro_core::session::SessionEvent;

use crate::cli::resolve;
use crate::runtime::Runtime;

pub async fn add(
    runtime: &mut Runtime,
    scene_ref: &str,
    character: Option<&str>,
    line: Option<&str>,
) -> Result<()> {
    let scene_id = resolve::scene(&runtime.session().script, scene_ref)?;

    runtime
        .dispatch(SessionEvent::AddDialogue {
            scene_id: scene_id.clone(),
        })
        .await?;

    let scene = runtime
        .session()
        .script
        .scene(&scene_id)
        .context("scene disappeared while adding a dialogue")?;
    let count = scene.dialogues.len();
    let dialogue_id = scene
        .dialogues
        .last()
        .map(|d| d.id.clone())
        .context("dialogue was not added")?;

    set_fields(runtime, &scene_id, &dialogue_id, character, line).await?;

    let position = runtime.session().script.position(&scene_id).unwrap_or_default();
    println!("Added dialogue {count} to scene {position} ({dialogue_id})");
    Ok(())
}

pub async fn remove(runtime: &mut Runtime, scene_ref: &str, dialogue_ref: &str) -> Result<()> {
    let (scene_id, dialogue_id) = resolve_both(runtime, scene_ref, dialogue_ref)?;

    runtime
        .dispatch(SessionEvent::DeleteDialogue {
            scene_id,
            dialogue_id: dialogue_id.clone(),
        })
        .await?;
    println!("Removed dialogue {dialogue_id}");
    Ok(())
}

pub async fn set(
    runtime: &mut Runtime,
    scene_ref: &str,
    dialogue_ref: &str,
    character: Option<&str>,
    line: Option<&str>,
) -> Result<()> {
    let (scene_id, dialogue_id) = resolve_both(runtime, scene_ref, dialogue_ref)?;

    set_fields(runtime, &scene_id, &dialogue_id, character, line).await?;
    println!("Updated dialogue {dialogue_id}");
    Ok(())
}

fn resolve_both(
    runtime: &Runtime,
    scene_ref: &str,
    dialogue_ref: &str,
) -> Result<(SceneId, DialogueId)> {
    let script = &runtime.session().script;
    let scene_id = resolve::scene(script, scene_ref)?;
    let scene = script
        .scene(&scene_id)
        .context("resolved scene is missing")?;
    let dialogue_id = resolve::dialogue(scene, dialogue_ref)?;
    Ok((scene_id, dialogue_id))
}

async fn set_fields(
    runtime: &mut Runtime,
    scene_id: &SceneId,
    dialogue_id: &DialogueId,
    character: Option<&str>,
    line: Option<&str>,
) -> Result<()> {
    let fields = [
        (DialogueField::Character, character),
        (DialogueField::Line, line),
    ];
    for (field, value) in fields {
        let Some(value) = value else {
            continue;
        };
        runtime
            .dispatch(SessionEvent::SetDialogueField {
                scene_id: scene_id.clone(),
                dialogue_id: dialogue_id.clone(),
                field,
                value: value.to_string(),
            })
            .await?;
    }
    Ok(())
}
