//! Script model: scenes and their dialogues.
//!
//! Pure data. Scene numbering is positional (1-based) and never stored.
//!
//! ## Persisted shape
//!
//! ```json
//! [
//!   { "id": "…", "content": "INT. HOUSE", "dialogues": [
//!       { "id": "…", "character": "MARIA", "line": "olá" }
//!   ] }
//! ]
//! ```
//!
//! The transient `listening` flag is skipped on write and ignored on read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque scene identifier, unique for the session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

/// Opaque dialogue identifier, unique for the session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueId(String);

macro_rules! impl_id {
    ($ty:ident) => {
        impl $ty {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_id!(SceneId);
impl_id!(DialogueId);

/// One character-name/spoken-line pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub id: DialogueId,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub line: String,
}

impl Dialogue {
    /// Creates an empty dialogue with a fresh id.
    pub fn empty() -> Self {
        Self::new(String::new(), String::new())
    }

    pub fn new(character: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            id: DialogueId::generate(),
            character: character.into(),
            line: line.into(),
        }
    }
}

/// One unit of the screenplay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,
    /// Whether speech capture is active for this scene. Never persisted.
    #[serde(skip)]
    pub listening: bool,
}

impl Scene {
    /// Creates an empty scene with a fresh id.
    pub fn empty() -> Self {
        Self::with_content(String::new())
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            id: SceneId::generate(),
            content: content.into(),
            dialogues: Vec::new(),
            listening: false,
        }
    }

    pub fn dialogue(&self, id: &DialogueId) -> Option<&Dialogue> {
        self.dialogues.iter().find(|d| &d.id == id)
    }
}

/// Scene and dialogue totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptStats {
    pub scenes: usize,
    pub dialogues: usize,
}

/// The full ordered sequence of scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub scenes: Vec<Scene>,
}

impl Script {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == id)
    }

    /// Returns the 1-based position of a scene.
    pub fn position(&self, id: &SceneId) -> Option<usize> {
        self.scenes.iter().position(|s| &s.id == id).map(|i| i + 1)
    }

    /// Returns the scene at a 1-based position.
    pub fn scene_at(&self, position: usize) -> Option<&Scene> {
        position.checked_sub(1).and_then(|i| self.scenes.get(i))
    }

    pub fn stats(&self) -> ScriptStats {
        ScriptStats {
            scenes: self.scenes.len(),
            dialogues: self.scenes.iter().map(|s| s.dialogues.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SceneId::generate();
        let b = SceneId::generate();
        assert_ne!(a, b);
        assert_ne!(DialogueId::generate(), DialogueId::generate());
    }

    #[test]
    fn test_listening_is_not_serialized() {
        let mut scene = Scene::with_content("INT. HOUSE");
        scene.listening = true;
        let json = serde_json::to_string(&Script::new(vec![scene])).unwrap();
        assert!(!json.contains("listening"));
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_deserializes_stored_shape_with_listening_flag() {
        let json = r#"[{"id":"17","content":"rua","dialogues":[{"id":"18","character":"ANA","line":"oi"}],"listening":true}]"#;
        let script: Script = serde_json::from_str(json).unwrap();
        assert_eq!(script.len(), 1);
        let scene = &script.scenes[0];
        assert_eq!(scene.id.as_str(), "17");
        assert!(!scene.listening);
        assert_eq!(scene.dialogues[0].character, "ANA");
    }

    #[test]
    fn test_positions_are_one_based() {
        let script = Script::new(vec![Scene::empty(), Scene::with_content("b")]);
        let second = script.scenes[1].id.clone();
        assert_eq!(script.position(&second), Some(2));
        assert_eq!(script.scene_at(2).map(|s| s.content.as_str()), Some("b"));
        assert!(script.scene_at(0).is_none());
        assert!(script.scene_at(3).is_none());
    }

    #[test]
    fn test_stats_counts_dialogues_across_scenes() {
        let mut a = Scene::empty();
        a.dialogues.push(Dialogue::new("A", "1"));
        let mut b = Scene::empty();
        b.dialogues.push(Dialogue::new("B", "2"));
        b.dialogues.push(Dialogue::empty());
        let script = Script::new(vec![a, b, Scene::empty()]);
        assert_eq!(
            script.stats(),
            ScriptStats {
                scenes: 3,
                dialogues: 3
            }
        );
    }
}
