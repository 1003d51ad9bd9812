//! Random user records and the sources that produce them.
//!
//! Both sources speak the randomuser.me envelope: `{"results": [user], "info": {..}}`.
//! Only the first result is used.

use crate::model::SourceConfig;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

// Only the fields the card shows are decoded; serde skips the rest.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct User {
    pub gender: String,
    pub name: Name,
    #[serde(default)]
    pub location: Location,
    pub email: String,
    #[serde(default)]
    pub cell: String,
    #[serde(default)]
    pub picture: Option<Picture>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Name {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Location {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Picture {
    pub large: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RandomUserEnvelope {
    pub results: Vec<User>,
}

impl RandomUserEnvelope {
    pub fn into_first(self) -> Result<User> {
        self.results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("response contained no users"))
    }
}

impl User {
    pub fn gender_label(&self) -> &'static str {
        if self.gender == "male" {
            "Male"
        } else {
            "Female"
        }
    }

    /// Label/value pairs shown on the profile card, in display order.
    pub fn card_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Gender", self.gender_label().to_string()),
            ("Country", self.location.country.clone()),
            ("Last name", self.name.last.clone()),
            ("First name", self.name.first.clone()),
            ("Email", self.email.clone()),
            ("Phone", self.cell.clone()),
        ]
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.picture.as_ref().map(|p| p.large.as_str())
    }
}

pub fn parse_envelope(v: JsonValue) -> Result<User> {
    let env: RandomUserEnvelope =
        serde_json::from_value(v).context("decoding random user envelope")?;
    env.into_first()
}

pub trait ProfileSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<User>;
}

pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl ProfileSource for HttpSource {
    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }

    fn fetch(&self) -> Result<User> {
        let env: RandomUserEnvelope = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("requesting {}", self.url))?
            .error_for_status()?
            .json()
            .context("decoding random user envelope")?;
        env.into_first()
    }
}

pub struct CommandSource {
    cmdline: String,
}

impl CommandSource {
    pub fn new(cmdline: impl Into<String>) -> Self {
        Self {
            cmdline: cmdline.into(),
        }
    }
}

impl ProfileSource for CommandSource {
    fn describe(&self) -> String {
        format!("$ {}", self.cmdline)
    }

    fn fetch(&self) -> Result<User> {
        let v = crate::services::cli_runner::run_cmdline_to_json(&self.cmdline)?;
        parse_envelope(v)
    }
}

pub fn source_from_config(cfg: &SourceConfig) -> Result<Arc<dyn ProfileSource>> {
    match cfg {
        SourceConfig::Http { url, timeout_secs } => Ok(Arc::new(HttpSource::new(
            url.clone(),
            Duration::from_secs(*timeout_secs),
        )?)),
        SourceConfig::Command { cmdline } => Ok(Arc::new(CommandSource::new(cmdline.clone()))),
    }
}

#[cfg(test)]
pub(crate) fn sample_user() -> User {
    parse_envelope(sample_envelope()).expect("sample envelope decodes")
}

#[cfg(test)]
pub(crate) fn sample_envelope() -> JsonValue {
    serde_json::json!({
        "results": [{
            "gender": "female",
            "name": {"title": "Ms", "first": "Ann", "last": "Lee"},
            "location": {
                "street": {"number": 12, "name": "Main St"},
                "city": "Oslo",
                "state": "Oslo",
                "country": "Norway",
                "postcode": 1234,
                "coordinates": {"latitude": "0", "longitude": "0"},
                "timezone": {"offset": "+1:00", "description": "CET"}
            },
            "email": "ann.lee@example.com",
            "login": {"uuid": "u", "username": "annlee", "password": "p",
                      "salt": "s", "md5": "m", "sha1": "s1", "sha256": "s2"},
            "dob": {"date": "1990-01-01T00:00:00.000Z", "age": 35},
            "registered": {"date": "2010-01-01T00:00:00.000Z", "age": 15},
            "phone": "11-22",
            "cell": "33-44",
            "id": {"name": "FN", "value": "1"},
            "picture": {"large": "https://example.com/l.jpg",
                        "medium": "https://example.com/m.jpg",
                        "thumbnail": "https://example.com/t.jpg"},
            "nat": "NO"
        }],
        "info": {"seed": "abc", "results": 1, "page": 1, "version": "1.4"}
    })
}
