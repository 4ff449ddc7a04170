//! `roteiro listen` handler.

use anyhow::Result;

use crate::cli::resolve;
use crate::runtime::Runtime;

pub async fn run(runtime: &mut Runtime, reference: &str) -> Result<()> {
    let scene_id = resolve::scene(&runtime.session().script, reference)?;
    let position = runtime.session().script.position(&scene_id).unwrap_or_default();

    eprintln!("Listening into scene {position} (Ctrl+C to stop)");
    let notices = runtime
        .listen(scene_id.clone(), |text| println!("{text}"))
        .await?;
    for notice in notices {
        eprintln!("{notice}");
    }

    if let Some(scene) = runtime.session().script.scene(&scene_id) {
        eprintln!("Scene {position}: {}", scene.content.trim());
    }
    Ok(())
}
