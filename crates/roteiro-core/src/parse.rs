//! Full-view parser.
//!
//! Rebuilds a script from user-edited full-view text. Each line is classified
//! in order, first match wins:
//!
//! 1. Starts with digits: begins a new scene. `N - text` sets the content.
//! 2. Non-empty, not starting with `-` in column one, already upper-case: a
//!    character name that opens a new dialogue in the current scene.
//! 3. Starts with `-` (after trimming): the spoken line of the last dialogue.
//! 4. Anything else is ignored.
//!
//! Lines with nothing to attach to are dropped. Parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::script::{Dialogue, Scene, Script};

static SCENE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+").expect("valid scene start pattern"));

static SCENE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\s*-\s*(.*)$").expect("valid scene header pattern")
});

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    SceneHeader { content: Option<&'a str> },
    Character(&'a str),
    Spoken(&'a str),
    Other,
}

fn classify(line: &str) -> LineKind<'_> {
    if SCENE_START.is_match(line) {
        let content = SCENE_HEADER
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        return LineKind::SceneHeader { content };
    }

    let trimmed = line.trim();
    if !trimmed.is_empty() && !line.starts_with('-') && trimmed.to_uppercase() == trimmed {
        return LineKind::Character(trimmed);
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        return LineKind::Spoken(rest.trim());
    }

    LineKind::Other
}

/// Parses full-view text into a fresh script with newly generated ids.
pub fn parse_full(text: &str) -> Script {
    let mut scenes = Vec::new();
    let mut current: Option<Scene> = None;

    for line in text.lines() {
        match classify(line) {
            LineKind::SceneHeader { content } => {
                if let Some(done) = current.take() {
                    scenes.push(done);
                }
                current = Some(Scene::with_content(content.unwrap_or_default()));
            }
            LineKind::Character(name) => {
                if let Some(scene) = current.as_mut() {
                    scene.dialogues.push(Dialogue::new(name, ""));
                }
            }
            LineKind::Spoken(text) => {
                if let Some(last) = current.as_mut().and_then(|s| s.dialogues.last_mut()) {
                    last.line = text.to_string();
                }
            }
            LineKind::Other => {}
        }
    }

    if let Some(done) = current {
        scenes.push(done);
    }

    tracing::debug!(scenes = scenes.len(), "parsed full view");
    Script::new(scenes)
}
