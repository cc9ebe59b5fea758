//! Metadata field matching over page lines.

use std::collections::HashMap;

use crate::model::{BirthInfo, Field, Identity, PageText};

use super::rules::{FieldTarget, RuleCatalogue};

/// Fields resolved from one page-text sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedFields {
    /// Name, student id and national id
    pub identity: Identity,
    /// Birth date and place
    pub birth: BirthInfo,
}

/// Applies a [`RuleCatalogue`] to text lines.
///
/// Rules are tried in catalogue order and each rule scans the lines top to
/// bottom. A field keeps the first value it receives; later matches, from
/// the same rule or from lower-priority rules, never overwrite it. A rule
/// that stops at its first match (the birth line) fills its fields from one
/// line only.
///
/// The matcher carries no state between calls, so a fallback value found on
/// one page can never leak into another page or another document.
#[derive(Debug)]
pub struct FieldMatcher {
    catalogue: RuleCatalogue,
}

impl FieldMatcher {
    /// Create a matcher with the standard transcript rules.
    pub fn new() -> Self {
        Self::with_catalogue(RuleCatalogue::transcript())
    }

    /// Create a matcher with a custom rule catalogue.
    pub fn with_catalogue(catalogue: RuleCatalogue) -> Self {
        Self { catalogue }
    }

    /// Get the rule catalogue.
    pub fn catalogue(&self) -> &RuleCatalogue {
        &self.catalogue
    }

    /// Resolve every field from one page.
    pub fn match_page(&self, page: &PageText) -> MatchedFields {
        self.match_lines(page.lines())
    }

    /// Resolve only the identity fields from one page.
    pub fn identity(&self, page: &PageText) -> Identity {
        self.match_page(page).identity
    }

    /// Resolve every field from a sequence of lines.
    pub fn match_lines(&self, lines: &[String]) -> MatchedFields {
        let mut resolved: HashMap<FieldTarget, String> = HashMap::new();

        for rule in self.catalogue.iter() {
            if rule.targets().iter().all(|t| resolved.contains_key(t)) {
                continue;
            }

            for index in 0..lines.len() {
                let values = rule.apply(lines, index);
                let matched = !values.is_empty();
                for (target, value) in values {
                    resolved.entry(target).or_insert(value);
                }
                if (matched && rule.stops_at_first_match())
                    || rule.targets().iter().all(|t| resolved.contains_key(t))
                {
                    break;
                }
            }
        }

        let mut take = |target: FieldTarget| Field::from(resolved.remove(&target));
        MatchedFields {
            identity: Identity {
                name: take(FieldTarget::Name),
                student_id: take(FieldTarget::StudentId),
                national_id: take(FieldTarget::NationalId),
            },
            birth: BirthInfo {
                date: take(FieldTarget::BirthDate),
                place: take(FieldTarget::BirthPlace),
            },
        }
    }
}

impl Default for FieldMatcher {
    fn default() -> Self {
        Self::new()
    }
}
