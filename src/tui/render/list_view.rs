use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::model::Filter;
use crate::tui::app::App;
use crate::tui::layout::{CHECKBOX_WIDTH, INPUT_PROMPT, REMOVE_WIDTH};
use crate::util::unicode::{grapheme_at, truncate_to_width};
use crate::widget::Focus;

use super::{field_spans, pad_to};

const PLACEHOLDER: &str = "What needs to be done?";

/// Render the new-entry input line
pub fn render_input_line<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let focused = app.widget.focus() == Focus::Input && app.widget.editing().is_none();
    let input = app.widget.input();

    let prompt_color = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let mut spans: Vec<Span> = vec![Span::styled(
        INPUT_PROMPT,
        Style::default().fg(prompt_color).bg(bg),
    )];

    if input.text().is_empty() {
        let dim = Style::default().fg(app.theme.dim).bg(bg);
        if focused {
            // Cursor sits on the first placeholder cell
            let first = grapheme_at(PLACEHOLDER, 0);
            spans.push(Span::styled(
                first,
                Style::default().fg(bg).bg(app.theme.text_bright),
            ));
            spans.push(Span::styled(&PLACEHOLDER[first.len()..], dim));
        } else {
            spans.push(Span::styled(PLACEHOLDER, dim));
        }
    } else {
        let style = Style::default().fg(app.theme.text_bright).bg(bg);
        spans.extend(field_spans(input, style, &app.theme, focused));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Render the visible rows laid out in `app.layout`
pub fn render_list_view<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;

    if app.layout.rows.is_empty() {
        let message = match app.widget.filter() {
            Filter::All => " Nothing to do",
            Filter::Active => " No active tasks",
            Filter::Completed => " No completed tasks",
        };
        let empty = Paragraph::new(message).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width as usize;
    let room = area.width.saturating_sub(CHECKBOX_WIDTH + REMOVE_WIDTH) as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(app.layout.rows.len());

    for slot in &app.layout.rows {
        let Some(item) = app.widget.list().get(slot.id) else {
            continue;
        };
        let is_focused = app.widget.focus() == Focus::Row(slot.id);
        let row_bg = if is_focused {
            app.theme.selection_bg
        } else {
            bg
        };
        let base = Style::default().bg(row_bg);

        let check = if item.done { "[x]" } else { "[ ]" };
        let check_color = if item.done {
            app.theme.green
        } else {
            app.theme.text
        };
        let mut spans: Vec<Span> = vec![
            Span::styled("  ", base),
            Span::styled(check, base.fg(check_color)),
            Span::styled(" ", base),
        ];

        if let Some(session) = app.widget.edit_session().filter(|s| s.item == slot.id) {
            let style = base.fg(app.theme.text_bright).add_modifier(Modifier::UNDERLINED);
            spans.extend(field_spans(&session.field, style, &app.theme, true));
            pad_to(&mut spans, width, base);
        } else {
            let label_style = if item.done {
                base.fg(app.theme.done).add_modifier(Modifier::CROSSED_OUT)
            } else if is_focused {
                base.fg(app.theme.text_bright).add_modifier(Modifier::BOLD)
            } else {
                base.fg(app.theme.text_bright)
            };
            spans.push(Span::styled(truncate_to_width(&item.text, room), label_style));
            pad_to(&mut spans, width.saturating_sub(REMOVE_WIDTH as usize), base);

            let remove_color = if is_focused {
                app.theme.red
            } else {
                app.theme.dim
            };
            spans.push(Span::styled(" \u{2715} ", base.fg(remove_color)));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
