use crate::models::{Message, Sender};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

/// Renders one message as a bordered bubble: timestamp header, wrapped
/// body with fenced code styled separately, closing footer.
pub fn render_message(message: &Message, area: Rect) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let style = base_style(message);
    let indent = indent_for(message.sender);

    render_header(message, &mut lines, style, indent);
    render_content(message, &mut lines, area, style, indent);
    render_footer(&mut lines, style, indent);

    lines
}

/// Animated three-dot bubble shown while a reply is pending.
pub fn render_typing_bubble(frame_idx: usize) -> Vec<Line<'static>> {
    let style = Style::default().fg(Color::Rgb(144, 238, 144));
    let visible = frame_idx % 3 + 1;
    let dots: String = std::iter::repeat("● ").take(visible).collect();

    vec![
        Line::from(Span::styled("┌─".to_string(), style)),
        Line::from(vec![
            Span::styled("│ ".to_string(), style),
            Span::styled(dots, style.add_modifier(Modifier::DIM)),
        ]),
        Line::from(Span::styled("╰─".to_string(), style)),
    ]
}

fn base_style(message: &Message) -> Style {
    if message.is_error {
        return Style::default().fg(Color::Rgb(248, 113, 113));
    }
    Style::default().fg(match message.sender {
        Sender::User => Color::Rgb(255, 223, 128),
        Sender::Bot => Color::Rgb(144, 238, 144),
    })
}

fn indent_for(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "  ",
        Sender::Bot => "",
    }
}

fn render_header(message: &Message, lines: &mut Vec<Line<'static>>, style: Style, indent: &str) {
    let mut spans = vec![
        Span::styled(indent.to_string(), style),
        Span::styled("┌─".to_string(), style),
        Span::styled(
            message.timestamp.clone(),
            style.add_modifier(Modifier::DIM),
        ),
    ];
    if message.is_error {
        spans.push(Span::styled(" ✗".to_string(), style));
    }
    lines.push(Line::from(spans));
}

fn render_content(
    message: &Message,
    lines: &mut Vec<Line<'static>>,
    area: Rect,
    style: Style,
    indent: &str,
) {
    let mut in_code_block = false;
    let mut code_buffer = String::new();
    let mut text_buffer = String::new();

    for line in message.content.lines() {
        if line.trim_start().starts_with("```") {
            flush_text_buffer(lines, &text_buffer, area, style, indent);
            flush_code_buffer(lines, &code_buffer, style, indent);
            text_buffer.clear();
            code_buffer.clear();
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            code_buffer.push_str(line);
            code_buffer.push('\n');
        } else {
            text_buffer.push_str(line);
            text_buffer.push('\n');
        }
    }

    flush_text_buffer(lines, &text_buffer, area, style, indent);
    flush_code_buffer(lines, &code_buffer, style, indent);
}

fn flush_text_buffer(
    lines: &mut Vec<Line<'static>>,
    buffer: &str,
    area: Rect,
    style: Style,
    indent: &str,
) {
    if buffer.trim().is_empty() {
        return;
    }

    let wrap_width = (area.width as usize).saturating_sub(4).max(1);
    for wrapped_line in wrap(buffer, wrap_width) {
        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled(wrapped_line.to_string(), style),
        ]));
    }
}

fn flush_code_buffer(lines: &mut Vec<Line<'static>>, buffer: &str, style: Style, indent: &str) {
    if buffer.is_empty() {
        return;
    }

    let code_style = Style::default()
        .fg(Color::Rgb(209, 154, 102))
        .add_modifier(Modifier::BOLD);

    for code_line in buffer.lines() {
        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled("▎".to_string(), Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {}", code_line), code_style),
        ]));
    }
}

fn render_footer(lines: &mut Vec<Line<'static>>, style: Style, indent: &str) {
    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("╰─".to_string(), style),
    ]));
}
