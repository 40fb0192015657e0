//! In-place patching of the copied runtime templates.
//!
//! The plugin file is JavaScript, so it is rewritten with an ordered list of
//! regex rules. The env file is parsed into lines and rewritten by key.

pub mod env;
pub mod plugins;

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::errors::{DeployError, DeployResult};

pub use env::{env_rules, patch_env_text, EnvFile, EnvRule};
pub use plugins::{patch_plugins_text, plugin_rules};

/// A single textual substitution. `replacement` may refer to capture groups
/// of `matcher` with `${n}`.
#[derive(Debug, Clone)]
pub struct PatchRule {
    pub name: String,
    pub matcher: Regex,
    pub replacement: String,
    /// Misses on optional rules are expected and only logged at debug level
    pub optional: bool,
}

impl PatchRule {
    pub fn new(name: impl Into<String>, pattern: &str, replacement: impl Into<String>) -> DeployResult<Self> {
        let name = name.into();
        let matcher = Regex::new(pattern).map_err(|source| DeployError::Patch { name: name.clone(), source })?;
        Ok(Self { name, matcher, replacement: replacement.into(), optional: false })
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// Result of a patch pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    /// Names of rules whose matcher found nothing
    pub missed: Vec<String>,
}

/// Applies `rules` in declared order, each over the output of the previous one.
/// Rules are not commutative; later rules may depend on earlier substitutions.
pub fn apply_rules(text: &str, rules: &[PatchRule]) -> Patched {
    let mut current = text.to_string();
    let mut missed = Vec::new();

    for rule in rules {
        if rule.matcher.is_match(&current) {
            current = rule.matcher.replace_all(&current, rule.replacement.as_str()).into_owned();
            debug!(rule = %rule.name, "applied patch rule");
        } else {
            if rule.optional {
                debug!(rule = %rule.name, "optional patch rule did not match");
            } else {
                warn!(rule = %rule.name, "patch rule did not match, template left unchanged");
            }
            missed.push(rule.name.clone());
        }
    }

    Patched { text: current, missed }
}

/// Reads `path`, transforms it and writes it back only if something changed
pub fn patch_file(path: &Path, transform: impl FnOnce(&str) -> DeployResult<String>) -> DeployResult<bool> {
    let original = fs::read_to_string(path).map_err(|e| DeployError::io(path, e))?;
    let patched = transform(&original)?;
    if patched == original {
        debug!(path = %path.display(), "template already up to date");
        return Ok(false);
    }
    fs::write(path, patched).map_err(|e| DeployError::io(path, e))?;
    debug!(path = %path.display(), "patched template");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_apply_in_order() {
        let rules = vec![
            PatchRule::new("flag", r"(enabled: )true", "${1}false").unwrap(),
            PatchRule::new("drop", r"(enabled: false), limit: \d+", "${1}").unwrap(),
        ];
        let patched = apply_rules("{ enabled: true, limit: 10 }", &rules);
        assert_eq!(patched.text, "{ enabled: false }");
        assert!(patched.missed.is_empty());

        // reversed, the second rule no longer sees its precondition
        let reversed: Vec<PatchRule> = rules.into_iter().rev().collect();
        let patched = apply_rules("{ enabled: true, limit: 10 }", &reversed);
        assert_eq!(patched.text, "{ enabled: false, limit: 10 }");
        assert_eq!(patched.missed, vec!["drop".to_string()]);
    }

    #[test]
    fn test_miss_leaves_text_untouched() {
        let rules = vec![PatchRule::new("port", r"(port: )\d+", "${1}1").unwrap().optional(true)];
        let text = "no ports here\r\n\ttabs stay\n";
        let patched = apply_rules(text, &rules);
        assert_eq!(patched.text, text);
        assert_eq!(patched.missed.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PatchRule::new("broken", "(unclosed", "").unwrap_err();
        assert!(matches!(err, DeployError::Patch { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_patch_file_skips_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "value: 1\n").unwrap();
        assert!(!patch_file(&path, |text| Ok(text.to_string())).unwrap());
        assert!(patch_file(&path, |text| Ok(text.replace('1', "2"))).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "value: 2\n");
    }
}
