use crate::controller::{ControllerCommand, ControllerEvent};
use crate::models::Message;
use crate::status_indicator::StatusIndicator;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Chat,
    ClearConfirm,
    QuitConfirm,
    Quit,
}

/// UI state. The transcript itself lives in the controller task; the app
/// keeps the latest snapshot received over the event channel.
pub struct App {
    pub state: AppState,
    pub messages: Vec<Message>,
    pub input: String,
    pub scroll: u16,
    pub is_processing: bool,
    pub processing_frame: usize,
    pub last_frame_update: Instant,
    pub status_indicator: StatusIndicator,
    pub command_tx: mpsc::Sender<ControllerCommand>,
    pub event_rx: mpsc::Receiver<ControllerEvent>,
}

impl App {
    pub fn new(
        command_tx: mpsc::Sender<ControllerCommand>,
        event_rx: mpsc::Receiver<ControllerEvent>,
    ) -> App {
        App {
            state: AppState::Chat,
            messages: Vec::new(),
            input: String::new(),
            scroll: 0,
            is_processing: false,
            processing_frame: 0,
            last_frame_update: Instant::now(),
            status_indicator: StatusIndicator::new(),
            command_tx,
            event_rx,
        }
    }

    pub fn scroll_up(&mut self) {
        if self.scroll > 0 {
            self.scroll -= 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn update_processing_animation(&mut self) {
        if self.is_processing
            && self.last_frame_update.elapsed() >= std::time::Duration::from_millis(80)
        {
            self.processing_frame = (self.processing_frame + 1) % 10;
            self.status_indicator.update_spinner();
            self.last_frame_update = Instant::now();
        }
    }

    /// Applies any pending controller events to the UI state.
    pub fn drain_controller_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                ControllerEvent::Transcript(messages) => {
                    self.messages = messages;
                    // snap to the bottom; the draw pass clamps this
                    self.scroll = u16::MAX;
                }
                ControllerEvent::Busy(busy) => {
                    self.is_processing = busy;
                    self.status_indicator.set_typing(busy);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    fn app_with_events(events: Vec<ControllerEvent>) -> App {
        let (command_tx, _command_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(8);
        for event in events {
            event_tx.try_send(event).unwrap();
        }
        App::new(command_tx, event_rx)
    }

    #[test]
    fn test_drain_updates_transcript_snapshot() {
        let mut app = app_with_events(vec![ControllerEvent::Transcript(vec![
            Message::bot("welcome"),
            Message::user("hi"),
        ])]);
        app.drain_controller_events();
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.scroll, u16::MAX);
    }

    #[test]
    fn test_drain_tracks_busy_flag() {
        let mut app = app_with_events(vec![ControllerEvent::Busy(true)]);
        app.drain_controller_events();
        assert!(app.is_processing);

        let mut app = app_with_events(vec![
            ControllerEvent::Busy(true),
            ControllerEvent::Busy(false),
        ]);
        app.drain_controller_events();
        assert!(!app.is_processing);
    }
}
