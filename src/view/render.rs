//! Drawing a composed [`Screen`] with ratatui

use super::compose::{Emphasis, HelpOverlay, Screen, ScreenLine};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Width of the help dialog in characters
const HELP_WIDTH: u16 = 76;

pub fn style_for(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Normal => Style::default(),
        Emphasis::Selected => Style::default().add_modifier(Modifier::REVERSED),
        Emphasis::Editing => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Emphasis::Heading => Style::default().add_modifier(Modifier::BOLD),
        Emphasis::Muted => Style::default().fg(Color::DarkGray),
        Emphasis::ActiveTab => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Emphasis::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Emphasis::Notice => Style::default().fg(Color::Green),
    }
}

fn to_line(line: &ScreenLine) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .segments
        .iter()
        .map(|s| Span::styled(s.text.clone(), style_for(s.emphasis)))
        .collect();
    Line::from(spans)
}

/// Keep the end of `text` (where typing happens) within `width` columns
fn tail_to_width(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut start = 0;
    for (i, _) in text.char_indices() {
        if text[i..].width() <= width {
            start = i;
            break;
        }
        start = text.len();
    }
    &text[start..]
}

/// Draw the whole screen. `cursor_on` is the blink phase of the input cursor.
pub fn draw(frame: &mut Frame, screen: &Screen, cursor_on: bool) {
    let area = frame.area();
    let [tabs_area, body_area, message_area, input_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(to_line(&screen.tabs)), tabs_area);

    let body: Vec<Line> = screen.body.iter().map(to_line).collect();
    let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    frame.render_widget(Paragraph::new(body).block(block), body_area);

    if let Some(message) = &screen.message {
        frame.render_widget(Paragraph::new(to_line(message)), message_area);
    }

    render_input(frame, input_area, screen, cursor_on);

    frame.render_widget(
        Paragraph::new(Line::styled(screen.hint.clone(), style_for(Emphasis::Muted))),
        hint_area,
    );

    if let Some(help) = &screen.help {
        render_help(frame, area, help);
    }
}

fn render_input(frame: &mut Frame, area: Rect, screen: &Screen, cursor_on: bool) {
    let prompt = format!("{}: ", screen.prompt);
    let room = (area.width as usize).saturating_sub(prompt.width() + 1);
    let visible = tail_to_width(&screen.input, room);

    let mut spans = vec![
        Span::styled(prompt, style_for(Emphasis::Heading)),
        Span::raw(visible.to_string()),
    ];
    if cursor_on {
        spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame, area: Rect, help: &HelpOverlay) {
    let height = (help.lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = HELP_WIDTH.min(area.width.saturating_sub(4));
    let dialog = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(help.title.clone())
        .borders(Borders::ALL)
        .border_style(style_for(Emphasis::ActiveTab));
    let lines: Vec<Line> = help.lines.iter().map(to_line).collect();
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        dialog,
    );
}
