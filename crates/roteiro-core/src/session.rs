//! Session controller.
//!
//! The session owns the current script, the single active-capture slot and
//! the translated-text display field. All state changes go through
//! [`update`], which mutates the session and returns effects for a runtime
//! to execute (persistence, speech capture, translation, clipboard, notices).
//!
//! The reducer never performs I/O. Completions of asynchronous work come
//! back in as events and are applied one at a time.

use std::fmt;

use crate::edits::{self, DialogueField};
use crate::format::{ScriptView, format_dialogues_only};
use crate::parse::parse_full;
use crate::script::{DialogueId, SceneId, Script};

/// Identifies one translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The scene currently bound to the speech stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCapture {
    pub scene_id: SceneId,
}

/// Display-only translated text plus request bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct TranslationState {
    /// Last successfully translated dialogue text.
    pub text: String,
    next_request: u64,
}

impl TranslationState {
    fn start(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request = self.next_request.wrapping_add(1);
        id
    }
}

/// Events fed into the reducer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    AddScene,
    DeleteScene {
        scene_id: SceneId,
    },
    SetSceneContent {
        scene_id: SceneId,
        content: String,
    },
    AddDialogue {
        scene_id: SceneId,
    },
    DeleteDialogue {
        scene_id: SceneId,
        dialogue_id: DialogueId,
    },
    SetDialogueField {
        scene_id: SceneId,
        dialogue_id: DialogueId,
        field: DialogueField,
        value: String,
    },
    /// The user edited the full view; rebuild the script from text.
    ReplaceFromText {
        text: String,
    },

    StartCapture {
        scene_id: SceneId,
    },
    StopCapture {
        scene_id: SceneId,
    },
    /// A finalized utterance from the speech stream.
    CaptureResult {
        scene_id: SceneId,
        text: String,
    },
    CaptureEnded {
        scene_id: SceneId,
    },
    CaptureFailed {
        scene_id: SceneId,
        error: String,
    },
    /// The host has no speech capability.
    CaptureUnavailable {
        scene_id: SceneId,
    },

    RequestTranslation,
    TranslationCompleted {
        request: RequestId,
        text: String,
    },
    TranslationFailed {
        request: RequestId,
        error: String,
    },

    CopyView {
        view: ScriptView,
    },
    CopyTranslation,
}

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Write the script to the store.
    Persist { script: Script },
    /// Open a speech stream bound to a scene.
    StartCapture { scene_id: SceneId },
    /// Close the speech stream bound to a scene.
    StopCapture { scene_id: SceneId },
    /// Send dialogue text to the translation service.
    Translate { request: RequestId, text: String },
    CopyToClipboard { text: String },
    /// Show a message to the user.
    Notify { message: String },
}

/// Session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub script: Script,
    pub capture: Option<ActiveCapture>,
    pub translation: TranslationState,
}

impl Session {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    /// Returns the scene bound to the speech stream, if any.
    pub fn capturing(&self) -> Option<&SceneId> {
        self.capture.as_ref().map(|c| &c.scene_id)
    }

    /// Renders one of the text views of the current script.
    pub fn view(&self, view: ScriptView) -> String {
        view.render(&self.script)
    }

    fn edit(&mut self, f: impl FnOnce(Script) -> Script) -> Vec<SessionEffect> {
        let before = self.script.clone();
        self.script = f(std::mem::take(&mut self.script));
        if self.script == before {
            Vec::new()
        } else {
            vec![SessionEffect::Persist {
                script: self.script.clone(),
            }]
        }
    }

    fn set_listening(&mut self, scene_id: &SceneId, listening: bool) {
        self.script = edits::set_listening(std::mem::take(&mut self.script), scene_id, listening);
    }

    /// Releases the capture slot and returns the scene it was bound to.
    fn release_capture(&mut self) -> Option<SceneId> {
        let active = self.capture.take()?;
        self.set_listening(&active.scene_id, false);
        Some(active.scene_id)
    }

    /// Releases the capture slot only when it is bound to `scene_id`.
    fn release_capture_for(&mut self, scene_id: &SceneId) -> bool {
        if self.capturing() == Some(scene_id) {
            self.release_capture();
            true
        } else {
            self.set_listening(scene_id, false);
            false
        }
    }
}

/// The session reducer.
///
/// Mutates the session for one event and returns the effects to execute.
pub fn update(session: &mut Session, event: SessionEvent) -> Vec<SessionEffect> {
    match event {
        SessionEvent::AddScene => session.edit(|script| edits::add_scene(script).0),
        SessionEvent::DeleteScene { scene_id } => {
            let mut effects = Vec::new();
            if session.release_capture_for(&scene_id) {
                effects.push(SessionEffect::StopCapture {
                    scene_id: scene_id.clone(),
                });
            }
            effects.extend(session.edit(|script| edits::delete_scene(script, &scene_id)));
            effects
        }
        SessionEvent::SetSceneContent { scene_id, content } => {
            session.edit(|script| edits::set_scene_content(script, &scene_id, &content))
        }
        SessionEvent::AddDialogue { scene_id } => {
            session.edit(|script| edits::add_dialogue(script, &scene_id).0)
        }
        SessionEvent::DeleteDialogue {
            scene_id,
            dialogue_id,
        } => session.edit(|script| edits::delete_dialogue(script, &scene_id, &dialogue_id)),
        SessionEvent::SetDialogueField {
            scene_id,
            dialogue_id,
            field,
            value,
        } => session.edit(|script| {
            edits::set_dialogue_field(script, &scene_id, &dialogue_id, field, &value)
        }),
        SessionEvent::ReplaceFromText { text } => {
            let mut effects = Vec::new();
            // Parsed scenes get fresh ids, so no scene can stay bound.
            if let Some(scene_id) = session.release_capture() {
                effects.push(SessionEffect::StopCapture { scene_id });
            }
            let parsed = parse_full(&text);
            effects.extend(session.edit(|script| edits::replace_script(script, parsed)));
            effects
        }

        SessionEvent::StartCapture { scene_id } => start_capture(session, scene_id),
        SessionEvent::StopCapture { scene_id } => {
            if session.release_capture_for(&scene_id) {
                vec![SessionEffect::StopCapture { scene_id }]
            } else {
                Vec::new()
            }
        }
        SessionEvent::CaptureResult { scene_id, text } => {
            session.edit(|script| edits::append_transcript(script, &scene_id, &text))
        }
        SessionEvent::CaptureEnded { scene_id } => {
            session.release_capture_for(&scene_id);
            tracing::info!(scene = %scene_id, "speech capture ended");
            Vec::new()
        }
        SessionEvent::CaptureFailed { scene_id, error } => {
            session.release_capture_for(&scene_id);
            tracing::warn!(scene = %scene_id, %error, "speech capture failed");
            vec![SessionEffect::Notify {
                message: format!("Could not capture speech: {error}"),
            }]
        }
        SessionEvent::CaptureUnavailable { scene_id } => {
            session.release_capture_for(&scene_id);
            vec![SessionEffect::Notify {
                message: "Speech recognition is not available on this system".to_string(),
            }]
        }

        SessionEvent::RequestTranslation => {
            let request = session.translation.start();
            tracing::info!(%request, "translation requested");
            vec![SessionEffect::Translate {
                request,
                text: format_dialogues_only(&session.script),
            }]
        }
        SessionEvent::TranslationCompleted { request, text } => {
            // No ordering guard: whichever request resolves last wins.
            session.translation.text = text;
            tracing::info!(%request, "translation completed");
            Vec::new()
        }
        SessionEvent::TranslationFailed { request, error } => {
            tracing::warn!(%request, %error, "translation failed");
            vec![SessionEffect::Notify {
                message: format!("Translation failed: {error}"),
            }]
        }

        SessionEvent::CopyView { view } => vec![SessionEffect::CopyToClipboard {
            text: session.view(view),
        }],
        SessionEvent::CopyTranslation => {
            if session.translation.text.is_empty() {
                Vec::new()
            } else {
                vec![SessionEffect::CopyToClipboard {
                    text: session.translation.text.clone(),
                }]
            }
        }
    }
}

fn start_capture(session: &mut Session, scene_id: SceneId) -> Vec<SessionEffect> {
    if session.script.scene(&scene_id).is_none() {
        return Vec::new();
    }

    let mut effects = Vec::new();
    if let Some(previous) = session.release_capture() {
        effects.push(SessionEffect::StopCapture { scene_id: previous });
    }

    session.set_listening(&scene_id, true);
    session.capture = Some(ActiveCapture {
        scene_id: scene_id.clone(),
    });
    tracing::info!(scene = %scene_id, "speech capture started");
    effects.push(SessionEffect::StartCapture { scene_id });
    effects
}
