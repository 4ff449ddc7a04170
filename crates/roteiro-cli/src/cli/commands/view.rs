//! Views of the script: show, edit, copy and stats.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use roteiro_core::format::ScriptView;
use roteiro_core::session::SessionEvent;

use crate::runtime::Runtime;

pub fn show(runtime: &Runtime, view: ScriptView) {
    print!("{}", runtime.session().view(view));
}

/// Rebuilds the script from full-view text read from `file` or stdin.
pub async fn edit(runtime: &mut Runtime, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("read stdin")?,
    };

    runtime
        .dispatch(SessionEvent::ReplaceFromText { text })
        .await?;

    let stats = runtime.session().script.stats();
    println!(
        "Script now has {} scene(s) and {} dialogue(s)",
        stats.scenes, stats.dialogues
    );
    Ok(())
}

/// Copies a view, or the last translation when `view` is `None`.
pub async fn copy(runtime: &mut Runtime, view: Option<ScriptView>) -> Result<()> {
    let Some(view) = view else {
        if runtime.session().translation.text.is_empty() {
            println!("Nothing to copy: run `roteiro translate` first.");
            return Ok(());
        }
        runtime.dispatch(SessionEvent::CopyTranslation).await?;
        println!("Copied translation to clipboard");
        return Ok(());
    };

    runtime.dispatch(SessionEvent::CopyView { view }).await?;
    println!("Copied {view} view to clipboard");
    Ok(())
}

pub fn stats(runtime: &Runtime) {
    let stats = runtime.session().script.stats();
    println!("Scenes: {}", stats.scenes);
    println!("Dialogues: {}", stats.dialogues);
}
