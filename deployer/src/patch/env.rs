//! Key-aware rewriting of `.env` files.
//!
//! Lines that are not `KEY=value` assignments (comments, blanks, anything
//! unusual) are kept byte for byte.

use std::fmt;

use consensus_core::config::Params;
use consensus_core::network::NetworkType;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum EnvLine {
    /// `head` is everything up to and including the `=`
    Assignment { head: String, key: String, value: String },
    Verbatim(String),
}

impl EnvLine {
    fn parse(line: &str) -> Self {
        let Some((head, value)) = line.split_once('=') else {
            return EnvLine::Verbatim(line.to_string());
        };
        let trimmed = head.trim_start();
        let key = trimmed.strip_prefix("export ").unwrap_or(trimmed).trim();
        let valid = key.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if trimmed.starts_with('#') || !valid {
            return EnvLine::Verbatim(line.to_string());
        }
        EnvLine::Assignment { head: format!("{head}="), key: key.to_string(), value: value.to_string() }
    }

    fn key(&self) -> Option<&str> {
        match self {
            EnvLine::Assignment { key, .. } => Some(key.as_str()),
            EnvLine::Verbatim(_) => None,
        }
    }
}

impl fmt::Display for EnvLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvLine::Assignment { head, value, .. } => write!(f, "{head}{value}"),
            EnvLine::Verbatim(line) => f.write_str(line),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    entry: EnvLine,
    /// `"\n"`, `"\r\n"`, or empty on an unterminated last line
    ending: &'static str,
}

/// Parsed env file that renders back to the identical text when unchanged.
///
/// Line endings are kept per line, so CRLF files stay CRLF and inserted
/// entries follow the file's own convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<Line>,
}

impl EnvFile {
    pub fn parse(text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|raw| {
                let (body, ending) = if let Some(body) = raw.strip_suffix("\r\n") {
                    (body, "\r\n")
                } else if let Some(body) = raw.strip_suffix('\n') {
                    (body, "\n")
                } else {
                    (raw, "")
                };
                Line { entry: EnvLine::parse(body), ending }
            })
            .collect();
        Self { lines }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match &line.entry {
            EnvLine::Assignment { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Sets every assignment of `key` to `value`. A missing key is inserted
    /// after the last line assigning `anchor`, or appended when the anchor is
    /// absent too. Returns whether the file changed.
    pub fn set(&mut self, key: &str, value: &str, anchor: Option<&str>) -> bool {
        let mut found = false;
        let mut changed = false;
        for line in &mut self.lines {
            if let EnvLine::Assignment { key: k, value: v, .. } = &mut line.entry {
                if *k == key {
                    found = true;
                    if *v != value {
                        *v = value.to_string();
                        changed = true;
                    }
                }
            }
        }
        if found {
            return changed;
        }

        let entry = EnvLine::Assignment { head: format!("{key}="), key: key.to_string(), value: value.to_string() };
        let position = anchor.and_then(|anchor| self.lines.iter().rposition(|l| l.entry.key() == Some(anchor)));
        let at = match position {
            Some(index) => index + 1,
            // keep a trailing blank line last
            None => match self.lines.last() {
                Some(Line { entry: EnvLine::Verbatim(last), .. }) if last.is_empty() => self.lines.len() - 1,
                _ => self.lines.len(),
            },
        };
        self.insert(at, entry);
        true
    }

    pub fn apply(&mut self, rules: &[EnvRule]) {
        for rule in rules {
            if self.set(&rule.key, &rule.value, rule.anchor.as_deref()) {
                debug!(key = %rule.key, "updated env entry");
            }
        }
    }

    fn newline(&self) -> &'static str {
        self.lines.iter().map(|l| l.ending).find(|e| !e.is_empty()).unwrap_or("\n")
    }

    fn insert(&mut self, at: usize, entry: EnvLine) {
        let newline = self.newline();
        let ending = if at < self.lines.len() {
            newline
        } else {
            // appending: an unterminated last line gets terminated instead
            match at.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
                Some(prev) if prev.ending.is_empty() => {
                    prev.ending = newline;
                    ""
                }
                Some(_) => newline,
                None => "",
            }
        };
        self.lines.insert(at, Line { entry, ending });
    }
}

impl fmt::Display for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(f, "{}{}", line.entry, line.ending)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRule {
    pub key: String,
    pub value: String,
    pub anchor: Option<String>,
}

impl EnvRule {
    pub fn new(key: &str, value: impl ToString, anchor: Option<&str>) -> Self {
        Self { key: key.to_string(), value: value.to_string(), anchor: anchor.map(str::to_string) }
    }
}

/// Env entries derived from the parameters, in application order
pub fn env_rules(params: &Params) -> Vec<EnvRule> {
    let db = &params.database;
    let bindings = &params.bindings;
    let mut rules = vec![
        EnvRule::new("CORE_DB_HOST", &db.host, None),
        EnvRule::new("CORE_DB_PORT", db.port, Some("CORE_DB_HOST")),
        EnvRule::new("CORE_DB_USERNAME", &db.username, Some("CORE_DB_PORT")),
        EnvRule::new("CORE_DB_PASSWORD", &db.password, Some("CORE_DB_USERNAME")),
        EnvRule::new("CORE_DB_DATABASE", &db.name, Some("CORE_DB_PASSWORD")),
        EnvRule::new("CORE_P2P_PORT", bindings.p2p_port, Some("CORE_P2P_HOST")),
        EnvRule::new("CORE_API_PORT", bindings.api_port, Some("CORE_API_HOST")),
        EnvRule::new("CORE_WEBHOOKS_PORT", bindings.webhook_port, Some("CORE_WEBHOOKS_HOST")),
        EnvRule::new("CORE_EXCHANGE_JSON_RPC_PORT", bindings.json_rpc_port, Some("CORE_EXCHANGE_JSON_RPC_HOST")),
        EnvRule::new("CORE_TOKEN", &params.token, None),
        EnvRule::new("CORE_NETWORK_NAME", &params.name, Some("CORE_TOKEN")),
    ];
    if params.network == NetworkType::Testnet {
        rules.push(EnvRule::new("CORE_P2P_MINIMUM_NETWORK_REACH", 1, Some("CORE_P2P_PORT")));
    }
    rules
}

pub fn patch_env_text(text: &str, params: &Params) -> String {
    let mut env = EnvFile::parse(text);
    env.apply(&env_rules(params));
    env.to_string()
}
