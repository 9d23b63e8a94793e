use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::tui::app::App;
use crate::util::unicode::display_width;
use crate::widget::Focus;

/// Render the status row (bottom of screen): the live announcement or the
/// last save error on the left, key hints on the right.
pub fn render_status_row<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = match app.widget.save_error() {
        Some(err) => vec![Span::styled(
            format!("save failed: {err}"),
            Style::default().fg(app.theme.red).bg(bg),
        )],
        None => vec![Span::styled(
            app.widget.announcement(),
            Style::default().fg(app.theme.text).bg(bg),
        )],
    };

    if app.show_key_hints {
        let hint = key_hint(app);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hint<S: Storage>(app: &App<S>) -> &'static str {
    if app.widget.editing().is_some() {
        return "Enter save  Esc cancel";
    }
    match app.widget.focus() {
        Focus::Input => "Enter add  Tab list  ^C quit",
        Focus::Row(_) => "Space toggle  e edit  Del remove  1-3 filter  q quit",
    }
}
