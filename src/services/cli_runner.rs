use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::process::Command;
use std::sync::OnceLock;
use std::{collections::HashMap, env};

static ENV_REF: OnceLock<Regex> = OnceLock::new();

fn env_ref() -> Result<&'static Regex> {
    if let Some(re) = ENV_REF.get() {
        return Ok(re);
    }
    let re = Regex::new(r"\$\{([A-Za-z0-9_]+)\}").context("compiling env pattern")?;
    Ok(ENV_REF.get_or_init(|| re))
}

/// Expands `${VAR}` references from the given environment. Unknown
/// variables expand to an empty string; values with whitespace are quoted so
/// they stay a single argument after `shlex::split`.
pub fn expand_env_with(text: &str, env_map: &HashMap<String, String>) -> Result<String> {
    let re = env_ref()?;
    Ok(re
        .replace_all(text, |caps: &regex::Captures| {
            let v = env_map.get(&caps[1]).cloned().unwrap_or_default();
            if v.chars().any(|c| c.is_whitespace()) {
                format!("\"{}\"", v.replace('"', "\\\""))
            } else {
                v
            }
        })
        .to_string())
}

pub fn expand_env(text: &str) -> Result<String> {
    let env_map: HashMap<String, String> = env::vars().collect();
    expand_env_with(text, &env_map)
}

pub fn run_cmdline_to_json(cmdline: &str) -> Result<JsonValue> {
    let expanded = expand_env(cmdline)?;
    let parts = shlex::split(&expanded).ok_or_else(|| anyhow!("Failed to parse command line"))?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| anyhow!("Empty command line"))?;
    tracing::debug!(%program, "running profile command");
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("spawning {expanded}"))?;
    if !output.status.success() {
        let err = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(anyhow!("Command failed: {}\n{}", cmdline, err));
    }
    let text = String::from_utf8_lossy(&output.stdout).to_string();
    let v: JsonValue = serde_json::from_str(&text).with_context(|| "parsing command JSON")?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn expands_known_and_blanks_unknown() {
        let m = env(&[("DIR", "/tmp/fx")]);
        let out = expand_env_with("cat ${DIR}/user.json ${NOPE}", &m).unwrap();
        assert_eq!(out, "cat /tmp/fx/user.json ");
    }

    #[test]
    fn quotes_values_with_spaces() {
        let m = env(&[("DIR", "/my dir")]);
        let out = expand_env_with("cat ${DIR}", &m).unwrap();
        assert_eq!(out, "cat \"/my dir\"");
        assert_eq!(shlex::split(&out).unwrap(), vec!["cat", "/my dir"]);
    }

    #[test]
    fn empty_command_is_an_error() {
        let err = run_cmdline_to_json("   ").unwrap_err();
        assert!(err.to_string().contains("Empty command line"));
    }
}
