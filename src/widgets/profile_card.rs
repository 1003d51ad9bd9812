use crate::app::Effect;
use crate::services::profile::User;
use crate::widgets::chrome::panel_block;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const EMPTY_TEXT: &str = "User is empty";

#[derive(Debug, Default)]
pub struct ProfileCard {
    pub user: Option<User>,
    pub loading: bool,
}

impl ProfileCard {
    /// Marks the card as loading and asks for a fetch, unless one is in flight.
    pub fn begin_refresh(&mut self) -> Vec<Effect> {
        if self.loading {
            return Vec::new();
        }
        self.loading = true;
        vec![Effect::FetchProfile]
    }

    /// A failed fetch leaves the card empty; the error text is kept by the app.
    pub fn finish(&mut self, user: Option<User>) {
        self.loading = false;
        self.user = user;
    }

    pub fn copy_text(&self) -> String {
        match &self.user {
            Some(u) => u
                .card_rows()
                .into_iter()
                .map(|(l, v)| format!("{l}: {v}"))
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        }
    }
}

pub fn draw_profile(f: &mut Frame, area: Rect, card: &ProfileCard, highlight: bool) {
    let mut lines: Vec<Line> = Vec::new();
    match &card.user {
        Some(user) => {
            if let Some(url) = user.avatar_url() {
                lines.push(Line::from(Span::styled(
                    format!("avatar: {url}"),
                    crate::theme::text_muted(),
                )));
                lines.push(Line::from(""));
            }
            for (label, value) in user.card_rows() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label}: "), crate::theme::text_active_bold()),
                    Span::raw(value),
                ]));
            }
        }
        None if card.loading => {
            lines.push(Line::from(Span::styled(
                "Loading...",
                crate::theme::text_muted(),
            )));
        }
        None => {
            lines.push(Line::from(EMPTY_TEXT));
        }
    }
    let title = if card.loading && card.user.is_some() {
        "Profile — refreshing"
    } else {
        "Profile"
    };
    let p = Paragraph::new(lines)
        .block(panel_block(title, highlight))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

// Refresh goes through `AppMsg::RefreshProfile`, so there are no card keys.
impl crate::widgets::Widget for ProfileCard {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, _tick: u64) {
        draw_profile(f, area, self, focused);
    }
}
