//! Plain-text views of a script.
//!
//! All three views are pure projections: the same script always yields the
//! same text. Character names are upper-cased, content and lines are trimmed,
//! and empty fields are omitted.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::script::{Dialogue, Scene, Script};

/// Selects one of the formatted views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptView {
    /// Scene headers interleaved with dialogue. The only editable view.
    #[default]
    Full,
    /// Scene headers only.
    Scenes,
    /// Dialogue blocks only, skipping scenes without dialogue.
    Dialogues,
}

impl ScriptView {
    pub fn all() -> &'static [ScriptView] {
        &[ScriptView::Full, ScriptView::Scenes, ScriptView::Dialogues]
    }

    pub fn name(self) -> &'static str {
        match self {
            ScriptView::Full => "full",
            ScriptView::Scenes => "scenes",
            ScriptView::Dialogues => "dialogues",
        }
    }

    /// Renders this view of the script.
    pub fn render(self, script: &Script) -> String {
        match self {
            ScriptView::Full => format_full(script),
            ScriptView::Scenes => format_scenes_only(script),
            ScriptView::Dialogues => format_dialogues_only(script),
        }
    }
}

impl fmt::Display for ScriptView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScriptView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ScriptView::all()
            .iter()
            .copied()
            .find(|view| view.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = ScriptView::all()
                    .iter()
                    .copied()
                    .map(ScriptView::name)
                    .collect();
                format!(
                    "unknown view '{wanted}' (expected one of: {})",
                    names.join(", ")
                )
            })
    }
}

/// Formats the full view: every scene header followed by its dialogue,
/// each scene block terminated by a blank line.
pub fn format_full(script: &Script) -> String {
    let mut out = String::new();
    for (index, scene) in script.scenes.iter().enumerate() {
        out.push_str(&scene_header(index + 1, scene));
        out.push('\n');
        push_dialogues(&mut out, &scene.dialogues);
        out.push('\n');
    }
    out
}

/// Formats scene headers only, separated by a blank line.
pub fn format_scenes_only(script: &Script) -> String {
    script
        .scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| scene_header(index + 1, scene))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Formats dialogue blocks only. Scenes with no dialogue are left out but
/// keep their position in the numbering.
pub fn format_dialogues_only(script: &Script) -> String {
    let mut out = String::new();
    for (index, scene) in script.scenes.iter().enumerate() {
        if scene.dialogues.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", index + 1);
        push_dialogues(&mut out, &scene.dialogues);
        out.push('\n');
    }
    out
}

fn scene_header(number: usize, scene: &Scene) -> String {
    let content = scene.content.trim();
    if content.is_empty() {
        number.to_string()
    } else {
        format!("{number} - {content}")
    }
}

fn push_dialogues(out: &mut String, dialogues: &[Dialogue]) {
    for dialogue in dialogues {
        let character = dialogue.character.trim();
        if !character.is_empty() {
            out.push_str(&character.to_uppercase());
            out.push('\n');
        }
        let line = dialogue.line.trim();
        if !line.is_empty() {
            let _ = writeln!(out, "- {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Dialogue, Scene};

    fn scene(content: &str, dialogues: &[(&str, &str)]) -> Scene {
        let mut scene = Scene::with_content(content);
        scene.dialogues = dialogues
            .iter()
            .map(|(character, line)| Dialogue::new(*character, *line))
            .collect();
        scene
    }

    #[test]
    fn test_full_view_uppercases_character_and_trims() {
        let script = Script::new(vec![scene("INT. HOUSE", &[("joão", "olá")])]);
        assert_eq!(format_full(&script), "1 - INT. HOUSE\nJOÃO\n- olá\n\n");
    }

    #[test]
    fn test_full_view_omits_empty_fields() {
        let script = Script::new(vec![
            scene("   ", &[("", "only line"), ("ana", "   ")]),
            scene("  rua  deserta ", &[]),
        ]);
        assert_eq!(
            format_full(&script),
            "1\n- only line\nANA\n\n2 - rua  deserta\n\n"
        );
    }

    #[test]
    fn test_scenes_only_joins_with_blank_line() {
        let script = Script::new(vec![
            scene("kitchen", &[("maria", "hi")]),
            scene("", &[]),
            scene("garden", &[]),
        ]);
        assert_eq!(format_scenes_only(&script), "1 - kitchen\n\n2\n\n3 - garden");
    }

    #[test]
    fn test_empty_scene_views() {
        let script = Script::new(vec![scene("", &[])]);
        assert_eq!(format_scenes_only(&script), "1");
        assert_eq!(format_dialogues_only(&script), "");
        assert_eq!(format_full(&script), "1\n\n");
    }

    #[test]
    fn test_dialogues_only_skips_scenes_without_dialogue() {
        let script = Script::new(vec![
            scene("a", &[]),
            scene("b", &[("pedro", "tchau")]),
            scene("c", &[]),
            scene("d", &[("", "")]),
        ]);
        assert_eq!(format_dialogues_only(&script), "2\nPEDRO\n- tchau\n\n4\n\n");
    }

    #[test]
    fn test_empty_script_renders_empty_views() {
        let script = Script::default();
        for view in ScriptView::all() {
            assert_eq!(view.render(&script), "");
        }
    }

    #[test]
    fn test_views_are_deterministic() {
        let script = Script::new(vec![scene("x", &[("a", "b")]), scene("y", &[])]);
        for view in ScriptView::all() {
            assert_eq!(view.render(&script), view.render(&script));
        }
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("Full".parse::<ScriptView>(), Ok(ScriptView::Full));
        assert_eq!("dialogues".parse::<ScriptView>(), Ok(ScriptView::Dialogues));
        assert_eq!(" Scenes ".parse::<ScriptView>(), Ok(ScriptView::Scenes));
        let err = "translation".parse::<ScriptView>().unwrap_err();
        assert!(err.contains("full, scenes, dialogues"), "{err}");
    }
}
