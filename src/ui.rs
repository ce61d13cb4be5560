// src/ui.rs

use crate::app::{App, AppState};
use crate::chat_view::draw_chat;
use crate::controller::{ControllerCommand, ControllerEvent};
use crate::key_handlers::{handle_chat_input, handle_clear_confirm_input, handle_quit_confirm_input};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Runs the terminal UI against an already-spawned controller task.
pub async fn run_ui(
    command_tx: mpsc::Sender<ControllerCommand>,
    event_rx: mpsc::Receiver<ControllerEvent>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(command_tx, event_rx);
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

enum Event {
    Input(CEvent),
    Tick,
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Input reader task: poll with timeout, tick every 250ms.
    tokio::spawn(async move {
        let mut last_tick = Instant::now();
        loop {
            let timeout = Duration::from_millis(100);
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(event) = event::read() {
                    if tx.send(Event::Input(event)).await.is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(250) {
                if tx.send(Event::Tick).await.is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        app.drain_controller_events();
        app.update_processing_animation();
        terminal.draw(|f| ui(f, &mut app))?;

        tokio::select! {
            Some(event) = rx.recv() => {
                if let Event::Input(CEvent::Key(key)) = event {
                    match app.state {
                        AppState::Chat => handle_chat_input(key, &mut app).await?,
                        AppState::ClearConfirm => handle_clear_confirm_input(key, &mut app).await?,
                        AppState::QuitConfirm => handle_quit_confirm_input(key, &mut app),
                        AppState::Quit => {}
                    }
                }
            }
            else => break,
        }

        if app.state == AppState::Quit {
            break;
        }
    }

    Ok(())
}

/// Renders the current screen.
pub fn ui(f: &mut Frame, app: &mut App) {
    draw_chat(f, app);

    match app.state {
        AppState::ClearConfirm => draw_confirm_dialog(
            f,
            "Confirm Clear",
            "Are you sure you want to clear the chat?\n\nPress 'y' to confirm or 'n' to cancel.",
        ),
        AppState::QuitConfirm => draw_confirm_dialog(
            f,
            "Confirm Quit",
            "Are you sure you want to quit?\n\nPress 'y' to confirm or 'n' to cancel.",
        ),
        _ => {}
    }
}

fn draw_confirm_dialog(f: &mut Frame, title: &str, text: &str) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().fg(Color::LightYellow).bg(Color::Black));
    f.render_widget(block, area);

    let paragraph = Paragraph::new(text.to_string())
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, inset(area));
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 2,
        y: area.y + 2,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(3),
    }
}
