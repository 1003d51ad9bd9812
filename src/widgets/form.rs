use crate::forms::{FieldKind, FieldState, Form, SubmitEvent};
use crate::widgets::chrome::panel_block;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const OPTIONS_VISIBLE: usize = 8;
const SELECT_PLACEHOLDER: &str = "Choose...";

/// Cursor and edit state of the form screen. Field values live in the form
/// engine, not here.
#[derive(Clone, Debug, Default)]
pub struct FormView {
    pub title: String,
    pub selected: usize,
    pub editing: bool,
    // option list cursor while a select is open
    pub cursor: usize,
    pub offset: usize,
    pub loading: bool,
}

impl FormView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn submit_idx(field_count: usize) -> usize {
        field_count
    }

    pub fn clear_idx(field_count: usize) -> usize {
        field_count + 1
    }
}

pub fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

/// Text shown for a field value; `None` means "show the placeholder".
pub fn display_value(st: &FieldState) -> Option<String> {
    match (&st.kind, st.value.as_deref()) {
        (_, None) | (_, Some("")) => None,
        (FieldKind::Password, Some(v)) => Some(mask(v)),
        (_, Some(v)) => Some(v.to_string()),
    }
}

fn placeholder_for(st: &FieldState) -> String {
    match &st.kind {
        FieldKind::Select { .. } => SELECT_PLACEHOLDER.to_string(),
        _ => st.placeholder.clone().unwrap_or_default(),
    }
}

pub fn draw_form<E: SubmitEvent>(
    f: &mut Frame,
    area: Rect,
    form: &Form<E>,
    view: &FormView,
    highlight: bool,
    cursor_on: bool,
) {
    let mut lines: Vec<Line> = Vec::new();
    let field_count = form.schema().len();
    for (i, (desc, st)) in form.fields().enumerate() {
        let sel = if i == view.selected { '›' } else { ' ' };
        let req = if st.required { "*" } else { "" };
        let editing_this = view.editing && i == view.selected;
        let value_style = if editing_this {
            crate::theme::text_editing_bold()
        } else if i == view.selected {
            crate::theme::text_active_bold()
        } else {
            Style::default()
        };
        let mut spans = vec![Span::raw(format!("{sel} {}{req}: ", st.label))];
        match display_value(st) {
            Some(mut text) => {
                if editing_this && cursor_on && st.kind.is_text_like() {
                    text.push('▏');
                }
                spans.push(Span::styled(text, value_style));
            }
            None => {
                if editing_this && cursor_on && st.kind.is_text_like() {
                    spans.push(Span::styled("▏", value_style));
                }
                spans.push(Span::styled(placeholder_for(st), crate::theme::text_muted()));
            }
        }
        lines.push(Line::from(spans));
        if let FieldKind::Select { options } = &desc.kind {
            if editing_this {
                let start = view.offset.min(options.len());
                let end = (start + OPTIONS_VISIBLE).min(options.len());
                for (oi, opt) in options.iter().enumerate().take(end).skip(start) {
                    let mark = if st.value.as_deref() == Some(opt.as_str()) {
                        "(•)"
                    } else {
                        "( )"
                    };
                    let cur = if oi == view.cursor { '›' } else { ' ' };
                    let style = if oi == view.cursor {
                        crate::theme::list_cursor_style()
                    } else {
                        crate::theme::text_muted()
                    };
                    lines.push(Line::from(Span::styled(
                        format!("  {cur} {mark} {opt}"),
                        style,
                    )));
                }
            }
        }
    }
    if !form.schema().is_empty() {
        lines.push(Line::from(""));
    }
    let submit_label = if view.loading {
        "[ Loading... ]"
    } else {
        "[ Sign Up ]"
    };
    let mut submit_style = if view.loading {
        crate::theme::text_muted()
    } else if !form.is_submittable() {
        crate::theme::text_error().add_modifier(Modifier::BOLD)
    } else {
        crate::theme::text_active_bold()
    };
    let mut clear_style = Style::default().fg(crate::theme::ACTIVE);
    if view.selected == FormView::submit_idx(field_count) {
        submit_style = if view.loading {
            Style::default()
                .fg(crate::theme::MUTED)
                .bg(crate::theme::ACCENT)
        } else {
            crate::theme::list_cursor_style()
        };
    }
    if view.selected == FormView::clear_idx(field_count) {
        clear_style = crate::theme::list_cursor_style();
    }
    lines.push(Line::from(vec![
        Span::styled(format!("  {submit_label}  "), submit_style),
        Span::styled("Clear", clear_style),
    ]));
    if !form.is_submittable() {
        if let Some(err) = form.error() {
            lines.push(Line::from(Span::styled(
                err.to_string(),
                crate::theme::text_error(),
            )));
        }
    }
    let title = if view.editing {
        format!("{} — editing", view.title)
    } else {
        view.title.clone()
    };
    let block = panel_block(&title, highlight);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}
