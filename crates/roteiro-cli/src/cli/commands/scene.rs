//! `roteiro scene` handlers.

use anyhow::{Context, Result};
use roteiro_core::session::SessionEvent;

use crate::cli::resolve;
use crate::runtime::Runtime;

pub async fn add(runtime: &mut Runtime) -> Result<()> {
    runtime.dispatch(SessionEvent::AddScene).await?;

    let script = &runtime.session().script;
    let scene = script.scenes.last().context("scene was not added")?;
    println!("Added scene {} ({})", script.len(), scene.id);
    Ok(())
}

pub async fn remove(runtime: &mut Runtime, reference: &str) -> Result<()> {
    let scene_id = resolve::scene(&runtime.session().script, reference)?;
    let position = runtime.session().script.position(&scene_id).unwrap_or_default();

    runtime
        .dispatch(SessionEvent::DeleteScene { scene_id })
        .await?;
    println!("Removed scene {position}");
    Ok(())
}

pub async fn set(runtime: &mut Runtime, reference: &str, content: &str) -> Result<()> {
    let scene_id = resolve::scene(&runtime.session().script, reference)?;
    let position = runtime.session().script.position(&scene_id).unwrap_or_default();

    runtime
        .dispatch(SessionEvent::SetSceneContent {
            scene_id,
            content: content.to_string(),
        })
        .await?;
    println!("Updated scene {position}");
    Ok(())
}

pub fn list(runtime: &Runtime) {
    let script = &runtime.session().script;
    if script.is_empty() {
        println!("No scenes yet.");
        return;
    }

    for (i, scene) in script.scenes.iter().enumerate() {
        let content = scene.content.trim();
        let content = if content.is_empty() { "(empty)" } else { content };
        let dialogues = match scene.dialogues.len() {
            1 => "1 dialogue".to_string(),
            n => format!("{n} dialogues"),
        };
        println!("{}  {}  {}  [{}]", i + 1, scene.id, content, dialogues);
    }
}
