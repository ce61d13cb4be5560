// src/controller.rs

use crate::api::ChatClient;
use crate::constants::GENERIC_ERROR_TEXT;
use crate::conversation::Conversation;
use crate::errors::ParlanceError;
use crate::models::Message;
use crate::render::Renderer;
use crate::store::Store;
use log::warn;
use tokio::sync::mpsc;

/// Requests sent from the UI into the controller task.
#[derive(Debug, Clone)]
pub enum ControllerCommand {
    Send(String),
    /// Issued only after the user confirmed the clear dialog.
    Clear,
}

/// Updates sent back to the UI.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    Transcript(Vec<Message>),
    Busy(bool),
}

/// Wires user input to the chat backend and manages the transcript plus its
/// persisted copy. Renderer and Store are injected so tests can substitute
/// them.
pub struct ChatController<S: Store, R: Renderer> {
    conversation: Conversation,
    client: ChatClient,
    store: S,
    renderer: R,
    bot_name: String,
    in_flight: bool,
}

impl<S: Store, R: Renderer> ChatController<S, R> {
    pub fn new(client: ChatClient, store: S, renderer: R, bot_name: impl Into<String>) -> Self {
        let bot_name = bot_name.into();
        ChatController {
            conversation: Conversation::new(&bot_name),
            client,
            store,
            renderer,
            bot_name,
            in_flight: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// True while a request is in flight; doubles as the single-slot guard
    /// preventing overlapping sends.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Validates the input, appends the user message and takes the send
    /// slot. Returns the trimmed text to forward, or `None` when the input
    /// is empty or a send is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.conversation.push(Message::user(text));
        Some(text.to_string())
    }

    /// Issues the backend request for a message accepted by `begin_send`.
    /// Every outcome appends exactly one bot message, releases the send
    /// slot and persists the transcript.
    pub async fn complete_send(&mut self, text: &str) {
        let reply = match self.client.send_message(text).await {
            Ok(content) => Message::bot(self.renderer.render(&content)),
            Err(ParlanceError::Server(msg)) => Message::bot_error(format!("Error: {}", msg)),
            Err(_) => Message::bot_error(GENERIC_ERROR_TEXT),
        };
        self.conversation.push(reply);
        self.in_flight = false;
        self.save_history();
    }

    /// Full send lifecycle. Returns false on empty input or while another
    /// send is in flight, in which case nothing is appended and no request
    /// is issued.
    pub async fn send_message(&mut self, text: &str) -> bool {
        match self.begin_send(text) {
            Some(text) => {
                self.complete_send(&text).await;
                true
            }
            None => false,
        }
    }

    /// Resets the transcript to the welcome message and removes persisted
    /// state. Confirmation happens in the UI before this is called.
    pub fn clear_chat(&mut self) {
        self.conversation.clear();
        if let Err(e) = self.store.clear() {
            warn!("failed to clear chat history: {}", e);
        }
    }

    /// Loads persisted history, falling back to the default welcome
    /// transcript when the store is absent or unreadable.
    pub fn load_history(&mut self) {
        match self.store.load() {
            Ok(Some(records)) => {
                self.conversation = Conversation::from_persisted(&self.bot_name, &records);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("failed to load chat history: {}", e);
                self.conversation = Conversation::new(&self.bot_name);
            }
        }
    }

    pub fn save_history(&self) {
        if let Err(e) = self.store.save(&self.conversation.to_persisted()) {
            warn!("failed to persist chat history: {}", e);
        }
    }
}

/// Runs the controller in its own task, returning the command and event
/// channel endpoints for the UI.
pub fn spawn_controller<S, R>(
    mut controller: ChatController<S, R>,
) -> (
    mpsc::Sender<ControllerCommand>,
    mpsc::Receiver<ControllerEvent>,
)
where
    S: Store + Send + 'static,
    R: Renderer + Send + 'static,
{
    let (command_tx, mut command_rx) = mpsc::channel::<ControllerCommand>(100);
    let (event_tx, event_rx) = mpsc::channel::<ControllerEvent>(100);

    tokio::spawn(async move {
        controller.load_history();
        let _ = event_tx
            .send(ControllerEvent::Transcript(controller.messages().to_vec()))
            .await;

        while let Some(command) = command_rx.recv().await {
            match command {
                ControllerCommand::Send(text) => {
                    let Some(text) = controller.begin_send(&text) else {
                        continue;
                    };
                    // Show the user message and typing placeholder before
                    // the request completes.
                    let _ = event_tx
                        .send(ControllerEvent::Transcript(controller.messages().to_vec()))
                        .await;
                    let _ = event_tx.send(ControllerEvent::Busy(true)).await;

                    controller.complete_send(&text).await;

                    let _ = event_tx.send(ControllerEvent::Busy(false)).await;
                    let _ = event_tx
                        .send(ControllerEvent::Transcript(controller.messages().to_vec()))
                        .await;
                }
                ControllerCommand::Clear => {
                    controller.clear_chat();
                    let _ = event_tx
                        .send(ControllerEvent::Transcript(controller.messages().to_vec()))
                        .await;
                }
            }
        }
    });

    (command_tx, event_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::welcome_text;
    use crate::models::{PersistedMessage, Sender};
    use crate::render::MarkdownRenderer;
    use crate::store::FileStore;
    use std::sync::Mutex;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// In-memory store test double.
    #[derive(Debug, Default)]
    struct MemoryStore {
        saved: Mutex<Option<Vec<PersistedMessage>>>,
    }

    impl Store for MemoryStore {
        fn load(&self) -> crate::errors::ParlanceResult<Option<Vec<PersistedMessage>>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        fn save(&self, messages: &[PersistedMessage]) -> crate::errors::ParlanceResult<()> {
            *self.saved.lock().unwrap() = Some(messages.to_vec());
            Ok(())
        }

        fn clear(&self) -> crate::errors::ParlanceResult<()> {
            *self.saved.lock().unwrap() = None;
            Ok(())
        }
    }

    fn controller_for(uri: &str) -> ChatController<MemoryStore, MarkdownRenderer> {
        let client = ChatClient::new(uri, 5).unwrap();
        ChatController::new(client, MemoryStore::default(), MarkdownRenderer::new(), "Parlance")
    }

    #[tokio::test]
    async fn test_empty_input_appends_nothing_and_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server.uri());
        assert!(!controller.send_message("").await);
        assert!(!controller.send_message("   \n\t").await);
        assert_eq!(controller.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_send_appends_user_then_bot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "response": "Hi there!"
            })))
            .mount(&server)
            .await;

        let mut controller = controller_for(&server.uri());
        assert!(controller.send_message("Hello").await);

        let messages = controller.messages();
        assert_eq!(messages.len(), 3); // welcome + user + bot
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert_eq!(messages[2].content, "Hi there!");
        assert!(!messages[2].is_error);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_server_error_appends_error_bubble_with_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "error": "rate limited"
            })))
            .mount(&server)
            .await;

        let mut controller = controller_for(&server.uri());
        assert!(controller.send_message("Hello").await);

        let last = controller.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert!(last.is_error);
        assert!(last.content.contains("rate limited"));
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_transport_failure_appends_generic_error_bubble() {
        let mut controller = controller_for("http://127.0.0.1:9");
        assert!(controller.send_message("Hello").await);

        let last = controller.messages().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.content, GENERIC_ERROR_TEXT);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_send_persists_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "response": "Hi there!"
            })))
            .mount(&server)
            .await;

        let mut controller = controller_for(&server.uri());
        controller.send_message("Hello").await;

        let saved = controller.store.saved.lock().unwrap().clone().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[1].content, "Hello");
        assert_eq!(saved[2].content, "Hi there!");
    }

    #[tokio::test]
    async fn test_second_send_while_in_flight_is_rejected() {
        let mut controller = controller_for("http://127.0.0.1:9");
        let accepted = controller.begin_send("first");
        assert_eq!(accepted.as_deref(), Some("first"));
        assert!(controller.is_busy());
        assert!(controller.begin_send("second").is_none());

        controller.complete_send("first").await;
        assert!(!controller.is_busy());
        assert!(controller.begin_send("third").is_some());
    }

    #[tokio::test]
    async fn test_clear_chat_resets_transcript_and_store() {
        let mut controller = controller_for("http://127.0.0.1:9");
        controller.send_message("Hello").await;
        assert!(controller.store.saved.lock().unwrap().is_some());

        controller.clear_chat();
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].content, welcome_text("Parlance"));
        assert!(controller.store.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_history_replays_saved_messages() {
        let store = MemoryStore::default();
        store
            .save(&[
                PersistedMessage {
                    sender: Sender::Bot,
                    content: welcome_text("Parlance"),
                    time: "09:00".to_string(),
                },
                PersistedMessage {
                    sender: Sender::User,
                    content: "Hello".to_string(),
                    time: "09:01".to_string(),
                },
                PersistedMessage {
                    sender: Sender::Bot,
                    content: "Hi there!".to_string(),
                    time: "09:01".to_string(),
                },
            ])
            .unwrap();

        let client = ChatClient::new("http://127.0.0.1:9", 5).unwrap();
        let mut controller =
            ChatController::new(client, store, MarkdownRenderer::new(), "Parlance");
        controller.load_history();

        // fresh welcome, then history minus the stale banner
        let messages = controller.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, welcome_text("Parlance"));
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(messages[2].content, "Hi there!");
    }

    #[tokio::test]
    async fn test_load_history_with_corrupt_store_defaults_to_welcome() {
        let dir = tempdir().unwrap();
        let history_path = dir.path().join("history.json");
        std::fs::write(&history_path, "{definitely not json").unwrap();

        let client = ChatClient::new("http://127.0.0.1:9", 5).unwrap();
        let mut controller = ChatController::new(
            client,
            FileStore::new(history_path),
            MarkdownRenderer::new(),
            "Parlance",
        );
        controller.load_history();

        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].content, welcome_text("Parlance"));
    }

    #[tokio::test]
    async fn test_bot_reply_is_rendered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "response": "sure \u{1F600}, use **bold**"
            })))
            .mount(&server)
            .await;

        let mut controller = controller_for(&server.uri());
        controller.send_message("how?").await;

        let last = controller.messages().last().unwrap();
        assert!(!last.content.contains('\u{1F600}'));
        assert!(!last.content.contains("**"));
        assert!(last.content.contains("bold"));
    }
}
