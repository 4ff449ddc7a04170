//! `roteiro translate` handler.

use anyhow::{Result, bail};
use roteiro_core::session::SessionEvent;

use crate::runtime::Runtime;

pub async fn run(runtime: &mut Runtime, copy: bool) -> Result<()> {
    let notices = runtime.dispatch(SessionEvent::RequestTranslation).await?;
    if !notices.is_empty() {
        bail!("{}", notices.join("\n"));
    }

    println!("{}", runtime.session().translation.text);

    if copy {
        runtime.dispatch(SessionEvent::CopyTranslation).await?;
        eprintln!("Copied translation to clipboard");
    }
    Ok(())
}
