pub mod chrome;
pub mod form;
pub mod form_widget;
pub mod profile_card;
pub mod status_bar;
pub mod tabs;

use crate::app::Effect;
use crossterm::event::KeyCode;
use ratatui::prelude::*;

/// A screen body that draws itself and turns key presses into effects.
pub trait Widget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64);
    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let _ = key;
        Vec::new()
    }
}
