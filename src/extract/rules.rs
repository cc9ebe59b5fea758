//! Declarative field rules.
//!
//! A [`RuleCatalogue`] is an ordered list of [`FieldRule`] objects. Each rule
//! knows which fields it can fill and how to read them from one line (and
//! its neighbours). The scanning loop in [`FieldMatcher`](super::FieldMatcher)
//! never changes when a transcript variant needs another rule: the variant
//! registers it instead.

use std::fmt;

use regex::Regex;

use crate::error::Result;

/// A metadata field a rule can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    /// Student full name
    Name,
    /// Student number
    StudentId,
    /// National student identifier
    NationalId,
    /// Birth date phrase
    BirthDate,
    /// Birth place
    BirthPlace,
}

/// A rule that extracts field values from a sequence of lines.
pub trait FieldRule: Send + Sync + fmt::Debug {
    /// Fields this rule can resolve.
    fn targets(&self) -> &[FieldTarget];

    /// Try the rule on the line at `index`.
    ///
    /// Returns the values found on that line; an empty vector means no match.
    /// The rule may look at other lines (e.g. the line following an anchor).
    fn apply(&self, lines: &[String], index: usize) -> Vec<(FieldTarget, String)>;

    /// Stop scanning after the first matching line, even when some targets
    /// stayed unresolved. Values of one match then always come from the same
    /// line.
    fn stops_at_first_match(&self) -> bool {
        false
    }
}

/// Reads the first non-blank line after a line containing a literal anchor.
#[derive(Debug, Clone)]
pub struct AnchoredLineRule {
    anchor: String,
    target: [FieldTarget; 1],
}

impl AnchoredLineRule {
    /// Create a rule for `target` triggered by `anchor`.
    pub fn new(anchor: impl Into<String>, target: FieldTarget) -> Self {
        Self {
            anchor: anchor.into(),
            target: [target],
        }
    }
}

impl FieldRule for AnchoredLineRule {
    fn targets(&self) -> &[FieldTarget] {
        &self.target
    }

    fn apply(&self, lines: &[String], index: usize) -> Vec<(FieldTarget, String)> {
        if !lines[index].contains(self.anchor.as_str()) {
            return Vec::new();
        }

        lines[index + 1..]
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .map(|value| vec![(self.target[0], value.to_string())])
            .unwrap_or_default()
    }
}

/// Matches a regular expression against a trimmed line.
///
/// Capture group `i + 1` feeds `targets[i]`; optional groups that did not
/// participate leave their target untouched.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    targets: Vec<FieldTarget>,
    single_match: bool,
}

impl PatternRule {
    /// Compile a rule. Fails with [`Error::InvalidPattern`](crate::Error::InvalidPattern).
    pub fn new(pattern: &str, targets: impl Into<Vec<FieldTarget>>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            targets: targets.into(),
            single_match: false,
        })
    }

    /// Only use the first matching line (builder style).
    pub fn first_match_only(mut self) -> Self {
        self.single_match = true;
        self
    }

    fn builtin(pattern: &str, targets: &[FieldTarget]) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("built-in field pattern"),
            targets: targets.to_vec(),
            single_match: false,
        }
    }
}

impl FieldRule for PatternRule {
    fn targets(&self) -> &[FieldTarget] {
        &self.targets
    }

    fn apply(&self, lines: &[String], index: usize) -> Vec<(FieldTarget, String)> {
        let Some(caps) = self.pattern.captures(lines[index].trim()) else {
            return Vec::new();
        };

        self.targets
            .iter()
            .enumerate()
            .filter_map(|(i, target)| {
                let value = caps.get(i + 1)?.as_str().trim();
                (!value.is_empty()).then(|| (*target, value.to_string()))
            })
            .collect()
    }

    fn stops_at_first_match(&self) -> bool {
        self.single_match
    }
}

/// Student number: "N° Etudiant : 12345".
pub const STUDENT_ID_PATTERN: &str = r"N[°º]\s*[EÉ]tudiant\s*[:\-]?\s*(\d+)";

/// National identifier: "INE : 1234567890A".
pub const NATIONAL_ID_PATTERN: &str = r"\bINE\b\s*[:\-]?\s*([A-Z0-9]+)";

/// Birth line: "Née le 1 janvier 2000 à Lyon", place optional.
pub const BIRTH_PATTERN: &str =
    r"(?i)N[ée]e?\s+le\s*:?\s*(\d{1,2}(?:er)?\s+[^\d]+?\s+\d{4})(?:\s+à\s*:?\s*(.+))?";

/// Stray place line: "à : Lyon".
pub const PLACE_FALLBACK_PATTERN: &str = r"^à\s*:?\s*(.+)";

/// Literal anchor preceding the student name.
pub const NAME_ANCHOR: &str = "Session unique";

/// Ordered set of field rules. Earlier rules take priority.
#[derive(Debug, Default)]
pub struct RuleCatalogue {
    rules: Vec<Box<dyn FieldRule>>,
}

impl RuleCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules for the standard transcript layout.
    pub fn transcript() -> Self {
        use FieldTarget::*;

        let mut catalogue = Self::new();
        catalogue.register(AnchoredLineRule::new(NAME_ANCHOR, Name));
        catalogue.register(PatternRule::builtin(STUDENT_ID_PATTERN, &[StudentId]));
        catalogue.register(PatternRule::builtin(NATIONAL_ID_PATTERN, &[NationalId]));
        catalogue.register(
            PatternRule::builtin(BIRTH_PATTERN, &[BirthDate, BirthPlace]).first_match_only(),
        );
        catalogue.register(PatternRule::builtin(PLACE_FALLBACK_PATTERN, &[BirthPlace]));
        catalogue
    }

    /// Append a rule with the lowest priority.
    pub fn register(&mut self, rule: impl FieldRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Iterate over the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FieldRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Get the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
