use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

const SPINNER: [&str; 6] = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];

fn toast_tag(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Success => "[OK]",
        ToastLevel::Error => "[ERROR]",
        ToastLevel::Info => "[INFO]",
    }
}

pub fn footer_spans<'a>(state: &'a AppState, help_text: &'a str) -> Vec<Span<'a>> {
    let mut spans: Vec<Span> = Vec::new();
    if let Some(msg) = &state.status_text {
        let spinner = SPINNER[state.tick as usize % SPINNER.len()];
        spans.push(Span::raw(format!(" {spinner} {msg}")));
        spans.push(Span::raw("  |  "));
    }
    if let Some(t) = &state.toast {
        let color = state.theme.toast_color(t.level);
        spans.push(Span::styled(
            format!("{} ", toast_tag(t.level)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}  |  ", t.text),
            Style::default().fg(color),
        ));
    }
    if state.form.view.editing {
        spans.push(Span::styled(
            "editing  |  ",
            Style::default().fg(Color::Magenta),
        ));
    }
    spans.push(Span::styled(help_text, Style::default().fg(Color::DarkGray)));
    spans
}

pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState, help_text: &str) {
    let p = Paragraph::new(Line::from(footer_spans(state, help_text)));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppConfig;
    use crate::ui::Toast;

    #[test]
    fn footer_shows_status_toast_and_help() {
        let mut st = AppState::new(AppConfig::default()).unwrap();
        st.status_text = Some("Submitting".into());
        st.toast = Some(Toast {
            text: "Form is successfully sent".into(),
            level: ToastLevel::Success,
            expires_at_tick: 10,
        });
        let text: String = footer_spans(&st, "q quit")
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(text.contains("Submitting"));
        assert!(text.contains("[OK] Form is successfully sent"));
        assert!(text.ends_with("q quit"));
    }
}
