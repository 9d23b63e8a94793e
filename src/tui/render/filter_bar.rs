use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::ops::list_ops;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the filter tabs, with the number of active items on the right
pub fn render_filter_bar<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let current = app.widget.filter();

    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, tab) in app.layout.tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
        }
        let style = if tab.filter == current {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        spans.push(Span::styled(tab.text.clone(), style));
    }

    let (active, _) = list_ops::counts(app.widget.list());
    let left = format!("{active} left");
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let left_width = display_width(&left);
    if used + left_width + 2 <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - left_width - 1),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(left, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
