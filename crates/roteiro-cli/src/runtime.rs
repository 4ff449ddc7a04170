//! Session runtime: applies events and executes effects.
//!
//! The reducer in `roteiro_core::session` stays pure. Everything with a side
//! effect (store writes, clipboard, HTTP, speech processes) happens here, and
//! asynchronous results are fed back into the reducer as events.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use roteiro_core::config::Config;
use roteiro_core::script::SceneId;
use roteiro_core::session::{self, Session, SessionEffect, SessionEvent};
use roteiro_core::speech::{
    CaptureEvent, CaptureStream, CommandRecognizer, SpeechError, SpeechRecognizer,
};
use roteiro_core::store::{self, FileStore, KeyValueStore};
use roteiro_core::translate::{TranslationClient, TranslationClientConfig};

use crate::clipboard::Clipboard;

/// Owns the session plus the collaborators its effects need.
pub struct Runtime {
    session: Session,
    config: Config,
    store: Box<dyn KeyValueStore>,
    recognizer: Box<dyn SpeechRecognizer>,
    capture: Option<CaptureStream>,
    translator: Option<TranslationClient>,
}

impl Runtime {
    pub fn new(
        config: Config,
        store: Box<dyn KeyValueStore>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        let mut session = Session::new(store::load_script(store.as_ref()));
        session.translation.text = store::load_translation(store.as_ref());
        Self {
            session,
            config,
            store,
            recognizer,
            capture: None,
            translator: None,
        }
    }

    /// Builds a runtime on the configured file store and speech command.
    pub fn from_config(config: Config) -> Self {
        let store = FileStore::new(config.store_path());
        tracing::debug!(path = %store.path().display(), "opening script store");
        let recognizer = CommandRecognizer::from_config(&config.speech);
        Self::new(config, Box::new(store), Box::new(recognizer))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Applies an event and every event its effects produce, in order.
    ///
    /// Returns the user notices raised along the way.
    pub async fn dispatch(&mut self, event: SessionEvent) -> Result<Vec<String>> {
        let mut notices = Vec::new();
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in session::update(&mut self.session, event) {
                if let Some(next) = self.execute(effect, &mut notices).await? {
                    queue.push_back(next);
                }
            }
        }
        Ok(notices)
    }

    async fn execute(
        &mut self,
        effect: SessionEffect,
        notices: &mut Vec<String>,
    ) -> Result<Option<SessionEvent>> {
        match effect {
            SessionEffect::Persist { script } => {
                store::save_script(self.store.as_ref(), &script).context("save script")?;
                Ok(None)
            }
            SessionEffect::Notify { message } => {
                notices.push(message);
                Ok(None)
            }
            SessionEffect::CopyToClipboard { text } => {
                Clipboard::copy(&text).context("copy to clipboard")?;
                Ok(None)
            }
            SessionEffect::Translate { request, text } => {
                let client = self.translator()?;
                match client.translate(&text).await {
                    Ok(translated) => {
                        store::save_translation(self.store.as_ref(), &translated)
                            .context("save translation")?;
                        Ok(Some(SessionEvent::TranslationCompleted {
                            request,
                            text: translated,
                        }))
                    }
                    Err(err) => Ok(Some(SessionEvent::TranslationFailed {
                        request,
                        error: err.to_string(),
                    })),
                }
            }
            SessionEffect::StartCapture { scene_id } => {
                if let Some(previous) = self.capture.take() {
                    previous.stop();
                }
                match self
                    .recognizer
                    .start(&scene_id, &self.config.speech.locale)
                {
                    Ok(stream) => {
                        self.capture = Some(stream);
                        Ok(None)
                    }
                    Err(SpeechError::Unavailable) => {
                        Ok(Some(SessionEvent::CaptureUnavailable { scene_id }))
                    }
                    Err(err @ SpeechError::Start(_)) => Ok(Some(SessionEvent::CaptureFailed {
                        scene_id,
                        error: err.to_string(),
                    })),
                }
            }
            SessionEffect::StopCapture { scene_id } => {
                if let Some(stream) = self.capture.take() {
                    stream.stop();
                    tracing::debug!(scene = %scene_id, "capture stream stopped");
                }
                Ok(None)
            }
        }
    }

    fn translator(&mut self) -> Result<&TranslationClient> {
        if self.translator.is_none() {
            let config = TranslationClientConfig::from_config(&self.config.translation)?;
            self.translator = Some(TranslationClient::new(config)?);
        }
        self.translator
            .as_ref()
            .context("translation client not initialized")
    }

    /// Captures speech into a scene until the stream ends or Ctrl+C.
    ///
    /// `on_utterance` sees every finalized utterance as it is appended.
    /// Returns the user notices raised during the capture.
    pub async fn listen(
        &mut self,
        scene_id: SceneId,
        mut on_utterance: impl FnMut(&str),
    ) -> Result<Vec<String>> {
        let mut notices = self
            .dispatch(SessionEvent::StartCapture { scene_id })
            .await?;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        while let Some(scene_id) = self.session.capturing().cloned() {
            let Some(stream) = self.capture.as_mut() else {
                break;
            };
            let event = tokio::select! {
                _ = &mut shutdown => SessionEvent::StopCapture { scene_id },
                event = stream.next() => match event {
                    Some(CaptureEvent::Final(text)) => {
                        on_utterance(&text);
                        SessionEvent::CaptureResult { scene_id, text }
                    }
                    Some(CaptureEvent::Failed(error)) => {
                        SessionEvent::CaptureFailed { scene_id, error }
                    }
                    Some(CaptureEvent::Ended) | None => SessionEvent::CaptureEnded { scene_id },
                },
            };
            notices.extend(self.dispatch(event).await?);
        }

        self.capture = None;
        Ok(notices)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use roteiro_core::parse::parse_full;
    use roteiro_core::store::MemoryStore;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::*;

    /// Replays a fixed list of events for every capture.
    struct ScriptedRecognizer {
        events: Vec<CaptureEvent>,
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn start(&self, _scene_id: &SceneId, _locale: &str) -> Result<CaptureStream, SpeechError> {
            let (tx, rx) = mpsc::channel(self.events.len().max(1));
            for event in &self.events {
                tx.try_send(event.clone()).unwrap();
            }
            Ok(CaptureStream::new(rx, CancellationToken::new()))
        }
    }

    struct SharedStore(Arc<MemoryStore>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.set(key, value)
        }
    }

    fn runtime_with(
        store: &Arc<MemoryStore>,
        recognizer: impl SpeechRecognizer + 'static,
    ) -> Runtime {
        Runtime::new(
            Config::default(),
            Box::new(SharedStore(Arc::clone(store))),
            Box::new(recognizer),
        )
    }

    fn seeded_store(text: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store::save_script(store.as_ref(), &parse_full(text)).unwrap();
        store
    }

    #[tokio::test]
    async fn test_edits_are_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut runtime = runtime_with(&store, CommandRecognizer::default());

        runtime.dispatch(SessionEvent::AddScene).await.unwrap();

        assert_eq!(store::load_script(store.as_ref()).len(), 1);
    }

    #[tokio::test]
    async fn test_listen_appends_utterances_and_persists() {
        let store = seeded_store("1 - praia\n");
        let recognizer = ScriptedRecognizer {
            events: vec![
                CaptureEvent::Final("o sol".to_string()),
                CaptureEvent::Final("nasce".to_string()),
                CaptureEvent::Ended,
            ],
        };
        let mut runtime = runtime_with(&store, recognizer);
        let scene_id = runtime.session().script.scenes[0].id.clone();

        let mut heard = Vec::new();
        runtime
            .listen(scene_id, |text| heard.push(text.to_string()))
            .await
            .unwrap();

        assert_eq!(heard, ["o sol", "nasce"]);
        assert!(runtime.session().capturing().is_none());
        let saved = store::load_script(store.as_ref());
        assert_eq!(saved.scenes[0].content, "praia o sol nasce");
        assert!(!saved.scenes[0].listening);
    }

    #[tokio::test]
    async fn test_listen_without_recognizer_is_a_noop() {
        let store = seeded_store("1 - praia\n");
        let mut runtime = runtime_with(&store, CommandRecognizer::default());
        let scene_id = runtime.session().script.scenes[0].id.clone();

        let notices = runtime.listen(scene_id, |_| {}).await.unwrap();

        assert_eq!(
            notices,
            ["Speech recognition is not available on this system"]
        );
        assert!(runtime.session().capturing().is_none());
        assert_eq!(runtime.session().script.scenes[0].content, "praia");
    }

    #[tokio::test]
    async fn test_capture_failure_keeps_earlier_text() {
        let store = seeded_store("1 - rua\n");
        let recognizer = ScriptedRecognizer {
            events: vec![
                CaptureEvent::Final("chove".to_string()),
                CaptureEvent::Failed("microphone lost".to_string()),
            ],
        };
        let mut runtime = runtime_with(&store, recognizer);
        let scene_id = runtime.session().script.scenes[0].id.clone();

        let notices = runtime.listen(scene_id, |_| {}).await.unwrap();

        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("microphone lost"));
        assert_eq!(
            store::load_script(store.as_ref()).scenes[0].content,
            "rua chove"
        );
    }

    #[tokio::test]
    async fn test_saved_translation_is_loaded() {
        let store = Arc::new(MemoryStore::new());
        store::save_translation(store.as_ref(), "hola").unwrap();

        let runtime = runtime_with(&store, CommandRecognizer::default());

        assert_eq!(runtime.session().translation.text, "hola");
    }
}
