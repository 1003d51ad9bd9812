use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Tabs};

use crate::ui::{AppState, View};

pub const VIEWS: [View; 2] = [View::Profile, View::SignUp];

/// Maps F1/F2 to a screen.
pub fn view_for_function_key(n: u8) -> Option<View> {
    VIEWS.get(usize::from(n).checked_sub(1)?).copied()
}

pub fn next_view(current: View) -> View {
    match current {
        View::Profile => View::SignUp,
        View::SignUp => View::Profile,
    }
}

pub fn draw_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let current = VIEWS.iter().position(|v| *v == state.view).unwrap_or(0);
    let titles: Vec<Line> = VIEWS
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let (key_style, text_style) = if i == current {
                (
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .fg(theme.selected)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (
                    Style::default().fg(theme.muted),
                    Style::default().fg(theme.muted),
                )
            };
            Line::from(vec![
                Span::styled("[", Style::default().fg(theme.frame)),
                Span::styled(format!("F{}", i + 1), key_style),
                Span::styled("]", Style::default().fg(theme.frame)),
                Span::raw(" "),
                Span::styled(view.as_str(), text_style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current)
        .style(Style::default().fg(theme.fg))
        .divider(Span::styled(" │ ", Style::default().fg(theme.frame)));
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .title_top(
            Line::from(Span::styled(
                state.config.title.clone(),
                Style::default().fg(theme.accent),
            ))
            .right_aligned(),
        )
        .border_style(Style::default().fg(theme.frame));
    f.render_widget(tabs.block(block), area);
}
