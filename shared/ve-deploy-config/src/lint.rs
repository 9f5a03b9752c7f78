//! Solidity lint rule table, rendered as `.solhint.json`.
//!
//! The rules are only data here; solhint interprets them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleSetting {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleSetting {
    pub fn level(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with(severity: Severity, option: Value) -> Self {
        Self {
            severity,
            options: vec![option],
        }
    }

    /// solhint accepts a bare severity, or `[severity, ...options]`.
    fn to_json(&self) -> Value {
        if self.options.is_empty() {
            return json!(self.severity);
        }
        let mut entry = vec![json!(self.severity)];
        entry.extend(self.options.iter().cloned());
        Value::Array(entry)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LintPolicy {
    pub extends: String,
    pub plugins: Vec<String>,
    pub rules: BTreeMap<String, RuleSetting>,
}

impl LintPolicy {
    /// Ruleset applied to the escrow contracts.
    pub fn standard() -> Self {
        use Severity::*;

        let rules = [
            ("avoid-low-level-calls", RuleSetting::level(Off)),
            ("code-complexity", RuleSetting::with(Warn, json!(8))),
            ("compiler-version", RuleSetting::with(Error, json!("^0.8.0"))),
            ("const-name-snakecase", RuleSetting::level(Warn)),
            (
                "func-visibility",
                RuleSetting::with(Warn, json!({ "ignoreConstructors": true })),
            ),
            ("func-name-mixedcase", RuleSetting::level(Off)),
            ("max-line-length", RuleSetting::with(Warn, json!(120))),
            ("no-empty-blocks", RuleSetting::level(Off)),
            ("no-inline-assembly", RuleSetting::level(Off)),
            ("not-rely-on-time", RuleSetting::level(Off)),
            ("ordering", RuleSetting::level(Warn)),
            (
                "private-vars-leading-underscore",
                RuleSetting::with(Warn, json!({ "strict": false })),
            ),
            ("quotes", RuleSetting::with(Error, json!("double"))),
            ("reason-string", RuleSetting::with(Warn, json!({ "maxLength": 64 }))),
            ("var-name-mixedcase", RuleSetting::level(Off)),
        ]
        .into_iter()
        .map(|(name, setting)| (name.to_string(), setting))
        .collect();

        Self {
            extends: "solhint:recommended".to_string(),
            plugins: Vec::new(),
            rules,
        }
    }

    pub fn severity_of(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).map(|r| r.severity)
    }

    pub fn to_solhint_json(&self) -> Value {
        let rules: serde_json::Map<String, Value> = self
            .rules
            .iter()
            .map(|(name, setting)| (name.clone(), setting.to_json()))
            .collect();
        json!({
            "extends": self.extends,
            "plugins": self.plugins,
            "rules": rules,
        })
    }
}
