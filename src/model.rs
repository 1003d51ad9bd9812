use crate::forms::{FieldDescriptor, Schema, SchemaError};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            profile: ProfileConfig::default(),
            form: FormConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_title() -> String {
    "Sign Up TUI".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProfileConfig {
    #[serde(default)]
    pub source: SourceConfig,
}

/// Where the profile screen gets its random user from.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Http {
        #[serde(default = "default_url")]
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    // Local command printing the same JSON envelope on stdout
    Command { cmdline: String },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "https://randomuser.me/api/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct FormConfig {
    #[serde(default = "default_form_title")]
    pub title: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: default_form_title(),
            fields: default_fields(),
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

impl FormConfig {
    pub fn schema(&self) -> Result<Arc<Schema>, SchemaError> {
        Schema::new(self.fields.clone()).map(Arc::new)
    }
}

fn default_form_title() -> String {
    "Sign Up".to_string()
}

fn default_submit_delay_ms() -> u64 {
    3000
}

pub fn default_fields() -> Vec<FieldDescriptor> {
    const PLACEHOLDER: &str = "Enter...";
    vec![
        FieldDescriptor::text("name", "Name")
            .required()
            .placeholder(PLACEHOLDER),
        FieldDescriptor::email("email", "Email")
            .required()
            .placeholder(PLACEHOLDER),
        FieldDescriptor::password("password", "Password")
            .required()
            .placeholder(PLACEHOLDER),
        FieldDescriptor::select("gender", "Gender", ["male", "female"])
            .required()
            .placeholder(PLACEHOLDER),
    ]
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    // Relative paths resolve against the config directory
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}
