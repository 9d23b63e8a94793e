pub mod filter_bar;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};

use crate::io::store::Storage;
use crate::util::unicode::grapheme_at;
use crate::widget::TextField;

use super::app::App;
use super::layout::ListLayout;
use super::theme::Theme;

/// Main render function: lays out the frame, then dispatches to sub-renderers
pub fn render<S: Storage>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    app.layout = ListLayout::build(area, &app.widget, app.layout.scroll);
    let areas = app.layout.areas;

    filter_bar::render_filter_bar(frame, app, areas.filter_bar);
    list_view::render_input_line(frame, app, areas.input);

    let separator = "\u{2500}".repeat(areas.separator.width as usize);
    frame.render_widget(
        Paragraph::new(separator).style(Style::default().fg(app.theme.dim).bg(app.theme.background)),
        areas.separator,
    );

    list_view::render_list_view(frame, app, areas.list);
    status_row::render_status_row(frame, app, areas.status);
}

/// Spans for a text field: the selection highlighted, and when `with_cursor`
/// is set the grapheme under the caret drawn as a block cursor.
pub(super) fn field_spans(
    field: &TextField,
    style: Style,
    theme: &Theme,
    with_cursor: bool,
) -> Vec<Span<'static>> {
    let buf = field.text();
    let cursor_style = Style::default().fg(theme.background).bg(theme.text_bright);
    let selection_style = Style::default().fg(theme.text_bright).bg(theme.blue);
    let mut spans = Vec::new();

    if let Some((sel_start, sel_end)) = field.selection() {
        if sel_start > 0 {
            spans.push(Span::styled(buf[..sel_start].to_string(), style));
        }
        spans.push(Span::styled(buf[sel_start..sel_end].to_string(), selection_style));
        if sel_end < buf.len() {
            spans.push(Span::styled(buf[sel_end..].to_string(), style));
        }
        if with_cursor && field.cursor() >= buf.len() {
            spans.push(Span::styled(" ".to_string(), cursor_style));
        }
        return spans;
    }

    if !with_cursor {
        spans.push(Span::styled(buf.to_string(), style));
        return spans;
    }

    let cursor = field.cursor().min(buf.len());
    let before = &buf[..cursor];
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), style));
    }
    let under = grapheme_at(buf, cursor);
    if under.is_empty() {
        spans.push(Span::styled(" ".to_string(), cursor_style));
    } else {
        spans.push(Span::styled(under.to_string(), cursor_style));
        let after = &buf[cursor + under.len()..];
        if !after.is_empty() {
            spans.push(Span::styled(after.to_string(), style));
        }
    }
    spans
}

/// Spans padded with background cells up to `width`
pub(super) fn pad_to(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used: usize = spans
        .iter()
        .map(|s| crate::util::unicode::display_width(&s.content))
        .sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn full_frame() {
        let mut app = app_with(
            r#"[{"text":"Buy milk","done":true},{"text":"Walk dog","done":false}]"#,
        );
        app.show_key_hints = false;
        let out = render_to_string(44, 6, |frame, _| render(frame, &mut app));
        assert_snapshot!(out, @r"
         [1] All  [2] Active  [3] Completed  1 left
         ❯ What needs to be done?
        ────────────────────────────────────────────
          [x] Buy milk                            ✕
          [ ] Walk dog                            ✕
        All: 2 tasks
        ");
    }

    #[test]
    fn field_spans_mark_selection_and_cursor() {
        let theme = Theme::default();
        let field = TextField::with_text_selected("milk");
        let spans = field_spans(&field, Style::default(), &theme, true);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["milk", " "]);

        let mut field = TextField::new();
        field.insert_str("milk");
        field.move_left();
        let spans = field_spans(&field, Style::default(), &theme, true);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["mil", "k"]);
    }
}
