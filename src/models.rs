// src/models.rs

use crate::constants::TIME_FORMAT;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One chat turn. Immutable once appended to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    pub timestamp: String,
    pub is_error: bool,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Message {
            sender,
            content: content.into(),
            timestamp: Local::now().format(TIME_FORMAT).to_string(),
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::new(Sender::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Message::new(Sender::Bot, content)
    }

    pub fn bot_error(content: impl Into<String>) -> Self {
        Message {
            is_error: true,
            ..Message::new(Sender::Bot, content)
        }
    }
}

/// On-disk form of a message, one entry in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMessage {
    pub sender: Sender,
    pub content: String,
    pub time: String,
}
