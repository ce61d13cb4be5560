// src/conversation.rs

use crate::models::{Message, PersistedMessage, Sender};

/// Ordered transcript for the session. Always opens with a welcome message;
/// the welcome is recreated on clear and on every load.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    bot_name: String,
}

impl Conversation {
    pub fn new(bot_name: impl Into<String>) -> Self {
        let bot_name = bot_name.into();
        let welcome = Message::bot(welcome_text(&bot_name));
        Conversation {
            messages: vec![welcome],
            bot_name,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Resets the transcript to a single fresh welcome message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.messages.push(Message::bot(welcome_text(&self.bot_name)));
    }

    /// Rebuilds a transcript from persisted records. A fresh welcome message
    /// is synthesized first; persisted bot greetings are skipped so old
    /// history files don't replay a second welcome banner.
    pub fn from_persisted(bot_name: impl Into<String>, records: &[PersistedMessage]) -> Self {
        let mut conversation = Conversation::new(bot_name);
        for record in records {
            if record.sender == Sender::Bot && is_stale_welcome(&record.content) {
                continue;
            }
            conversation.push(Message {
                sender: record.sender,
                content: record.content.clone(),
                timestamp: record.time.clone(),
                is_error: false,
            });
        }
        conversation
    }

    pub fn to_persisted(&self) -> Vec<PersistedMessage> {
        self.messages
            .iter()
            .map(|msg| PersistedMessage {
                sender: msg.sender,
                content: msg.content.clone(),
                time: msg.timestamp.clone(),
            })
            .collect()
    }
}

pub fn welcome_text(bot_name: &str) -> String {
    format!(
        "Hello! I'm {}, your terminal chat assistant. How can I help you today?",
        bot_name
    )
}

/// Recognizes welcome banners saved by earlier runs, including the old
/// wave-emoji variant, without pinning the exact wording of the current one.
fn is_stale_welcome(content: &str) -> bool {
    let trimmed = content.trim_start();
    trimmed.starts_with("Hello! I'm") || trimmed.contains('\u{1F44B}')
}
