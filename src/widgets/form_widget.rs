use crate::app::Effect;
use crate::forms::{FieldKind, Form, Schema, SubmitEvent};
use crate::widgets::form::{draw_form, FormView, OPTIONS_VISIBLE};
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitTrigger {
    Button,
    Shortcut,
}

/// Submit event produced by the sign-up screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSubmit {
    pub trigger: SubmitTrigger,
    pub default_prevented: bool,
}

impl FormSubmit {
    pub fn new(trigger: SubmitTrigger) -> Self {
        Self {
            trigger,
            default_prevented: false,
        }
    }
}

impl SubmitEvent for FormSubmit {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

pub struct FormWidget {
    pub form: Form<FormSubmit>,
    pub view: FormView,
}

impl FormWidget {
    pub fn new<F>(title: impl Into<String>, schema: Arc<Schema>, on_submit: F) -> Self
    where
        F: FnMut(FormSubmit) + Send + 'static,
    {
        Self {
            form: Form::new(schema, on_submit),
            view: FormView::new(title),
        }
    }

    fn field_count(&self) -> usize {
        self.form.schema().len()
    }

    fn selected_field(&self) -> Option<(String, FieldKind)> {
        self.form
            .schema()
            .fields()
            .get(self.view.selected)
            .map(|d| (d.name.clone(), d.kind.clone()))
    }

    /// Validates through the engine. A rejection becomes an error toast; an
    /// accepted form reaches the app through the submit handler.
    pub fn submit(&mut self, trigger: SubmitTrigger) -> Vec<Effect> {
        if self.view.loading {
            return Vec::new();
        }
        self.view.editing = false;
        match self.form.submit(FormSubmit::new(trigger)) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Effect::ShowToast {
                text: e.to_string(),
                level: crate::ui::ToastLevel::Error,
                seconds: 3,
            }],
        }
    }

    /// Resets values after a finished submission or a Clear press.
    pub fn clear(&mut self) {
        self.form.clear();
        self.view.editing = false;
        self.view.cursor = 0;
        self.view.offset = 0;
    }

    /// Replaces the field list. A different `Arc` discards every value.
    pub fn set_schema(&mut self, schema: Arc<Schema>) {
        self.form.set_schema(schema);
        self.view.selected = 0;
        self.view.editing = false;
        self.view.cursor = 0;
        self.view.offset = 0;
    }

    /// Form values as text; passwords are masked.
    pub fn copy_text(&self) -> String {
        self.form
            .values()
            .into_iter()
            .map(|(name, v)| {
                let v = v.unwrap_or("");
                let secret = self
                    .form
                    .field(name)
                    .is_some_and(|st| st.kind == FieldKind::Password);
                let shown = if secret {
                    crate::widgets::form::mask(v)
                } else {
                    v.to_string()
                };
                format!("{name}: {shown}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn open_select(&mut self, options: &[String], current: Option<&str>) {
        self.view.cursor = current
            .and_then(|c| options.iter().position(|o| o == c))
            .unwrap_or(0);
        self.view.offset = self.view.cursor.saturating_sub(OPTIONS_VISIBLE - 1);
        self.view.editing = true;
    }

    fn choose(&mut self, name: &str, value: Option<String>) {
        if let Err(e) = self.form.on_change(name, value) {
            tracing::warn!(error = %e, "change dispatch failed");
        }
    }

    fn cycle_option(&mut self, name: &str, options: &[String], forward: bool) {
        if options.is_empty() {
            return;
        }
        let cur = self
            .form
            .value(name)
            .and_then(|v| options.iter().position(|o| o == v));
        let next = match (cur, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        self.choose(name, Some(options[next].clone()));
    }
}

impl crate::widgets::Widget for FormWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64) {
        let cursor_on = tick % 2 == 0;
        draw_form(f, area, &self.form, &self.view, focused, cursor_on);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        let count = self.field_count();
        let submit_idx = FormView::submit_idx(count);
        let clear_idx = FormView::clear_idx(count);
        match key {
            KeyCode::Up => {
                if self.view.editing {
                    if let Some((_, FieldKind::Select { .. })) = self.selected_field() {
                        if self.view.cursor > 0 {
                            self.view.cursor -= 1;
                        }
                        if self.view.cursor < self.view.offset {
                            self.view.offset = self.view.cursor;
                        }
                    }
                } else if self.view.selected > 0 {
                    self.view.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.view.editing {
                    if let Some((_, FieldKind::Select { options })) = self.selected_field() {
                        if self.view.cursor + 1 < options.len() {
                            self.view.cursor += 1;
                        }
                        if self.view.cursor >= self.view.offset + OPTIONS_VISIBLE {
                            self.view.offset = self.view.cursor + 1 - OPTIONS_VISIBLE;
                        }
                    }
                } else if self.view.selected < clear_idx {
                    self.view.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key == KeyCode::Right;
                match self.selected_field() {
                    Some((name, kind)) if !kind.is_text_like() => {
                        let options = kind.options();
                        if self.view.editing {
                            let pick = options.get(self.view.cursor).cloned();
                            self.choose(&name, pick);
                            self.view.editing = false;
                        } else {
                            self.cycle_option(&name, options, forward);
                        }
                    }
                    Some(_) => {}
                    None => {
                        self.view.selected = if forward { clear_idx } else { submit_idx };
                    }
                }
            }
            KeyCode::Enter => {
                if self.view.selected == submit_idx {
                    effects.extend(self.submit(SubmitTrigger::Button));
                } else if self.view.selected == clear_idx {
                    self.clear();
                    effects.push(Effect::ShowToast {
                        text: "Cleared".into(),
                        level: crate::ui::ToastLevel::Info,
                        seconds: 2,
                    });
                } else if let Some((name, kind)) = self.selected_field() {
                    match kind {
                        FieldKind::Select { options } => {
                            if self.view.editing {
                                let pick = options.get(self.view.cursor).cloned();
                                self.choose(&name, pick);
                                self.view.editing = false;
                            } else {
                                let current = self.form.value(&name).map(str::to_string);
                                self.open_select(&options, current.as_deref());
                            }
                        }
                        _ => {
                            self.view.editing = !self.view.editing;
                        }
                    }
                }
            }
            KeyCode::Backspace => {
                if self.view.editing {
                    if let Some((name, kind)) = self.selected_field() {
                        if kind.is_text_like() {
                            let mut s = self.form.value(&name).unwrap_or("").to_string();
                            if s.pop().is_some() {
                                self.choose(&name, Some(s));
                            }
                        }
                    }
                }
            }
            KeyCode::Delete => {
                // Delete on a closed select drops the choice
                if !self.view.editing {
                    if let Some((name, FieldKind::Select { .. })) = self.selected_field() {
                        self.choose(&name, None);
                    }
                }
            }
            KeyCode::Esc => {
                self.view.editing = false;
            }
            KeyCode::Char(c) => {
                if self.view.editing {
                    let desc = self.form.schema().fields().get(self.view.selected).cloned();
                    if let Some(desc) = desc.filter(|d| d.kind.is_text_like()) {
                        let mut s = self.form.value(&desc.name).unwrap_or("").to_string();
                        if desc.accepts_more(&s) {
                            s.push(c);
                            self.choose(&desc.name, Some(s));
                        }
                    }
                }
            }
            _ => {}
        }
        effects
    }
}
