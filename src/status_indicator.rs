use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Spinner line shown between the transcript and the input while a reply
/// is pending.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    typing: bool,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    fn line(&self) -> Line<'static> {
        if !self.typing {
            return Line::from("");
        }
        let frame = SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()];
        Line::from(vec![
            Span::styled(frame.to_string(), Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(
                "Waiting for reply...",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Paragraph::new(self.line()).alignment(ratatui::layout::Alignment::Left),
            Rect {
                x: area.x,
                y: area.y + 1,
                width: area.width,
                height: 1,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_line_blank_when_idle() {
        let indicator = StatusIndicator::new();
        assert_eq!(line_text(&indicator.line()), "");
    }

    #[test]
    fn test_line_shows_spinner_and_text_while_typing() {
        let mut indicator = StatusIndicator::new();
        indicator.set_typing(true);
        let text = line_text(&indicator.line());
        assert!(text.contains("Waiting for reply..."));
        assert!(text.starts_with(SPINNER_FRAMES[0]));

        indicator.update_spinner();
        assert!(line_text(&indicator.line()).starts_with(SPINNER_FRAMES[1]));
    }
}
