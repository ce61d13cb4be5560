use crate::app::{App, AppState};
use crate::controller::ControllerCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::error::Error;

pub async fn handle_chat_input(
    key: KeyEvent,
    app: &mut App,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::QuitConfirm;
        }
        KeyCode::Enter => {
            // The pending-reply gate: no new send while one is in flight.
            if app.is_processing {
                return Ok(());
            }
            if app.input.trim().is_empty() {
                return Ok(());
            }
            let text = app.input.drain(..).collect::<String>();
            app.command_tx.send(ControllerCommand::Send(text)).await?;
        }
        KeyCode::PageUp => app.scroll_up(),
        KeyCode::PageDown => app.scroll_down(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.state = AppState::QuitConfirm,
                    'l' => app.state = AppState::ClearConfirm,
                    'u' => app.scroll_up(),
                    'd' => app.scroll_down(),
                    _ => {}
                }
            } else {
                app.input.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

pub async fn handle_clear_confirm_input(
    key: KeyEvent,
    app: &mut App,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.command_tx.send(ControllerCommand::Clear).await?;
            app.state = AppState::Chat;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.state = AppState::Chat;
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.state = AppState::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.state = AppState::Chat;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    fn test_app() -> (App, mpsc::Receiver<ControllerCommand>) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (_event_tx, event_rx) = mpsc::channel(8);
        (App::new(command_tx, event_rx), command_rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_enter_sends_input_and_clears_it() {
        let (mut app, mut command_rx) = test_app();
        app.input = "Hello".to_string();

        handle_chat_input(key(KeyCode::Enter), &mut app).await.unwrap();

        assert!(app.input.is_empty());
        match command_rx.try_recv().unwrap() {
            ControllerCommand::Send(text) => assert_eq!(text, "Hello"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_enter_with_whitespace_input_sends_nothing() {
        let (mut app, mut command_rx) = test_app();
        app.input = "   ".to_string();

        handle_chat_input(key(KeyCode::Enter), &mut app).await.unwrap();

        // nothing sent, and the buffer is left as typed
        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(app.input, "   ");
    }

    #[tokio::test]
    async fn test_enter_while_processing_is_ignored() {
        let (mut app, mut command_rx) = test_app();
        app.is_processing = true;
        app.input = "Hello".to_string();

        handle_chat_input(key(KeyCode::Enter), &mut app).await.unwrap();

        assert_eq!(app.input, "Hello");
        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_ctrl_l_opens_clear_confirm() {
        let (mut app, _command_rx) = test_app();
        handle_chat_input(
            KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
            &mut app,
        )
        .await
        .unwrap();
        assert_eq!(app.state, AppState::ClearConfirm);
    }

    #[tokio::test]
    async fn test_clear_confirm_accept_issues_clear() {
        let (mut app, mut command_rx) = test_app();
        app.state = AppState::ClearConfirm;

        handle_clear_confirm_input(key(KeyCode::Char('y')), &mut app)
            .await
            .unwrap();

        assert_eq!(app.state, AppState::Chat);
        assert!(matches!(
            command_rx.try_recv().unwrap(),
            ControllerCommand::Clear
        ));
    }

    #[tokio::test]
    async fn test_clear_confirm_decline_leaves_chat_untouched() {
        let (mut app, mut command_rx) = test_app();
        app.state = AppState::ClearConfirm;

        handle_clear_confirm_input(key(KeyCode::Char('n')), &mut app)
            .await
            .unwrap();

        assert_eq!(app.state, AppState::Chat);
        assert!(matches!(command_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_quit_confirm_keys() {
        let (mut app, _command_rx) = test_app();
        app.state = AppState::QuitConfirm;
        handle_quit_confirm_input(key(KeyCode::Char('n')), &mut app);
        assert_eq!(app.state, AppState::Chat);

        app.state = AppState::QuitConfirm;
        handle_quit_confirm_input(key(KeyCode::Char('y')), &mut app);
        assert_eq!(app.state, AppState::Quit);
    }
}
