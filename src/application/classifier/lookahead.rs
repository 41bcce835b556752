//! Static lookahead-bias scan over strategy source text.
//!
//! The scan is a heuristic. Each [`LookaheadRule`] is a named predicate over
//! the whole source; the scanner applies its rules in order and reports the
//! name of every rule that fired.

use regex::Regex;

use crate::error::Result;

/// A named predicate over strategy source text.
pub trait LookaheadRule: Send + Sync {
    /// Name recorded in `lookahead_issues` when the rule fires.
    fn name(&self) -> &str;

    fn matches(&self, source: &str) -> bool;
}

/// A rule that fires when any of its patterns matches, unless a guard
/// pattern also appears somewhere in the source.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    patterns: Vec<Regex>,
    unless: Option<Regex>,
}

impl PatternRule {
    pub fn new(name: impl Into<String>, patterns: &[&str]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.into(),
            patterns,
            unless: None,
        })
    }

    /// Suppress the rule for sources that contain `guard`.
    pub fn unless(mut self, guard: &str) -> Result<Self> {
        self.unless = Some(Regex::new(guard)?);
        Ok(self)
    }
}

impl LookaheadRule for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, source: &str) -> bool {
        if self.unless.as_ref().is_some_and(|guard| guard.is_match(source)) {
            return false;
        }
        self.patterns.iter().any(|p| p.is_match(source))
    }
}

/// Outcome of scanning one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookaheadReport {
    /// Names of the rules that fired, in rule order.
    pub issues: Vec<String>,
}

impl LookaheadReport {
    #[must_use]
    pub fn has_bias(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Ordered list of lookahead rules.
pub struct LookaheadScanner {
    rules: Vec<Box<dyn LookaheadRule>>,
}

impl LookaheadScanner {
    /// A scanner with no rules; never reports bias.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rule set.
    ///
    /// - `IAT`: reads the last element with `.iat[-1]`
    /// - `FUTURE_SHIFT`: shifts a series by a negative offset
    /// - `WHOLE_DATAFRAME`: whole-series `.min()`, `.max()` or `.mean()` in a
    ///   source that never windows with `.rolling` or `.ewm`
    /// - `TA_PERIOD_1`: an indicator period literally equal to 1
    /// - `BLACKLIST_PATTERN`: `dataframe.iloc[-1]` or assigning a column from
    ///   a negatively shifted column
    pub fn standard() -> Result<Self> {
        Ok(Self::empty()
            .with_rule(PatternRule::new("IAT", &[r"\.iat\s*\[\s*-\s*1\s*\]"])?)
            .with_rule(PatternRule::new(
                "FUTURE_SHIFT",
                &[r"\.shift\s*\(\s*-\s*\d+\s*\)"],
            )?)
            .with_rule(
                PatternRule::new(
                    "WHOLE_DATAFRAME",
                    &[r"\.min\s*\(\s*\)", r"\.max\s*\(\s*\)", r"\.mean\s*\(\s*\)"],
                )?
                .unless(r"\.rolling|\.ewm")?,
            )
            .with_rule(PatternRule::new("TA_PERIOD_1", &[r"period\s*=\s*1[,\s)]"])?)
            .with_rule(PatternRule::new(
                "BLACKLIST_PATTERN",
                &[
                    r"dataframe\[.*\]\s*=\s*dataframe\[.*\]\.shift\(-1\)",
                    r"dataframe\.iloc\[-1\]",
                ],
            )?))
    }

    /// Append a rule; it runs after every rule already present.
    #[must_use]
    pub fn with_rule(mut self, rule: impl LookaheadRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Scan `source`. A strategy without source text has no detectable bias.
    #[must_use]
    pub fn scan(&self, source: Option<&str>) -> LookaheadReport {
        let Some(source) = source else {
            return LookaheadReport::default();
        };
        LookaheadReport {
            issues: self
                .rules
                .iter()
                .filter(|rule| rule.matches(source))
                .map(|rule| rule.name().to_string())
                .collect(),
        }
    }
}

impl std::fmt::Debug for LookaheadScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookaheadScanner")
            .field("rules", &self.rule_names())
            .finish()
    }
}
