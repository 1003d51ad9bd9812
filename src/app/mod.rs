use crate::forms::FormEvent;
use crate::model::AppConfig;
use crate::services::profile::User;
use crate::ui::{AppState, LoadMsg, ToastLevel, View};
use crate::widgets::form_widget::FormSubmit;
use std::time::Duration;

pub const SUBMIT_SUCCESS_TEXT: &str = "Form is successfully sent";

pub enum AppMsg {
    SwitchView(View),
    RefreshProfile,
    ProfileLoaded(Result<User, String>),
    SubmitRequested(FormSubmit),
    SubmitFinished(Result<(), String>),
    FormChanged(FormEvent),
    CopyRequested,
    ConfigLoaded(Result<AppConfig, String>),
}

impl From<LoadMsg> for AppMsg {
    fn from(msg: LoadMsg) -> Self {
        match msg {
            LoadMsg::Profile(outcome) => AppMsg::ProfileLoaded(outcome),
            LoadMsg::SubmitRequested(ev) => AppMsg::SubmitRequested(ev),
            LoadMsg::SubmitFinished(outcome) => AppMsg::SubmitFinished(outcome),
            LoadMsg::FormChanged(ev) => AppMsg::FormChanged(ev),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    FetchProfile,
    ReloadConfig,
    StartSubmit {
        delay: Duration,
    },
    CopyToClipboard {
        text: String,
    },
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        SwitchView(view) => {
            if state.view != view {
                state.dbg(format!("view -> {}", view.as_str()));
                state.view = view;
                // leaving the form drops any half-finished edit
                state.form.view.editing = false;
            }
        }
        RefreshProfile => {
            let effs = state.profile.begin_refresh();
            if !effs.is_empty() {
                state.status_text = Some("Loading profile".to_string());
            }
            effects.extend(effs);
        }
        ProfileLoaded(outcome) => {
            state.status_text = None;
            match &outcome {
                Ok(user) => {
                    state.dbg(format!("profile loaded: {} {}", user.name.first, user.name.last));
                    state.last_error = None;
                }
                Err(e) => {
                    state.dbg(format!("profile failed: {e}"));
                    state.last_error = Some(e.clone());
                    effects.push(Effect::ShowToast {
                        text: format!("Profile fetch failed: {e}"),
                        level: ToastLevel::Error,
                        seconds: 3,
                    });
                }
            }
            state.profile.finish(outcome.ok());
        }
        SubmitRequested(ev) => {
            if state.form.view.loading {
                state.dbg("submit ignored: already in flight");
                return effects;
            }
            state.dbg(format!("submit accepted ({:?})", ev.trigger));
            state.form.view.loading = true;
            state.status_text = Some("Submitting".to_string());
            effects.push(Effect::StartSubmit {
                delay: state.submit_delay,
            });
        }
        SubmitFinished(outcome) => {
            state.form.view.loading = false;
            state.status_text = None;
            match outcome {
                Ok(()) => {
                    state.form.clear();
                    state.submitted += 1;
                    state.dbg("submission sent");
                    effects.push(Effect::ShowToast {
                        text: SUBMIT_SUCCESS_TEXT.to_string(),
                        level: ToastLevel::Success,
                        seconds: 3,
                    });
                }
                Err(e) => {
                    state.dbg(format!("submission failed: {e}"));
                    effects.push(Effect::ShowToast {
                        text: e,
                        level: ToastLevel::Error,
                        seconds: 3,
                    });
                }
            }
        }
        FormChanged(ev) => {
            let what = match ev {
                FormEvent::ValueChanged { name } => format!("{name} changed"),
                FormEvent::SchemaReset => "schema reset".to_string(),
                FormEvent::Cleared => "cleared".to_string(),
                FormEvent::ErrorChanged { error: Some(e) } => e.to_string(),
                FormEvent::ErrorChanged { error: None } => "valid".to_string(),
            };
            // revision is read at drain time, so it can run ahead of the event
            let rev = state.form.form.revision();
            state.dbg(format!("form: {what} (rev {rev})"));
        }
        ConfigLoaded(Err(e)) => {
            state.dbg(format!("config reload failed: {e}"));
            effects.push(Effect::ShowToast {
                text: format!("Config reload failed: {e}"),
                level: ToastLevel::Error,
                seconds: 3,
            });
        }
        ConfigLoaded(Ok(cfg)) => {
            if let Err(e) = apply_config(state, cfg) {
                state.dbg(format!("config rejected: {e}"));
                effects.push(Effect::ShowToast {
                    text: format!("Config rejected: {e}"),
                    level: ToastLevel::Error,
                    seconds: 3,
                });
            } else {
                effects.push(Effect::ShowToast {
                    text: "Config reloaded".to_string(),
                    level: ToastLevel::Info,
                    seconds: 2,
                });
            }
        }
        CopyRequested => {
            let text = match state.view {
                View::Profile => state.profile.copy_text(),
                View::SignUp => state.form.copy_text(),
            };
            if text.is_empty() {
                effects.push(Effect::ShowToast {
                    text: "Nothing to copy".to_string(),
                    level: ToastLevel::Info,
                    seconds: 2,
                });
            } else {
                effects.push(Effect::CopyToClipboard { text });
            }
        }
    }
    effects
}

/// Swaps in a reloaded config. The form is rebuilt only when its field list
/// changed, so unchanged fields keep what the user typed. Nothing is applied
/// if the new fields or profile source are invalid.
fn apply_config(state: &mut AppState, cfg: AppConfig) -> anyhow::Result<()> {
    let schema = if cfg.form.fields.as_slice() != state.form.form.schema().fields() {
        Some(cfg.form.schema()?)
    } else {
        None
    };
    let source = if cfg.profile.source != state.config.profile.source {
        Some(crate::services::profile::source_from_config(&cfg.profile.source)?)
    } else {
        None
    };
    if let Some(schema) = schema {
        state.dbg(format!("form fields reloaded ({})", schema.len()));
        state.form.set_schema(schema);
    }
    if let Some(source) = source {
        state.dbg(format!("profile source -> {}", source.describe()));
        state.source = Some(source);
    }
    state.form.view.title = cfg.form.title.clone();
    state.submit_delay = Duration::from_millis(cfg.form.submit_delay_ms);
    state.config = cfg;
    Ok(())
}
