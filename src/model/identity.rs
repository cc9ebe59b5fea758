//! Student identity and birth metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text written in place of a field that no rule could resolve.
pub const UNKNOWN_SENTINEL: &str = "Inconnu";

/// A single-valued metadata field.
///
/// Unresolved fields are an explicit value rather than an error, and they
/// compare equal to each other: two pages that both lack a national id carry
/// the same signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Field {
    /// A value matched by a field rule
    Known(String),
    /// No rule matched
    #[default]
    Unknown,
}

impl Field {
    /// Create a known field.
    pub fn known(value: impl Into<String>) -> Self {
        Field::Known(value.into())
    }

    /// Check if the field was resolved.
    pub fn is_known(&self) -> bool {
        matches!(self, Field::Known(_))
    }

    /// Get the resolved value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Field::Known(v) => Some(v),
            Field::Unknown => None,
        }
    }

    /// Get the value or the [`UNKNOWN_SENTINEL`].
    pub fn as_str(&self) -> &str {
        self.value().unwrap_or(UNKNOWN_SENTINEL)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        value.map(Field::Known).unwrap_or(Field::Unknown)
    }
}

impl From<Field> for Option<String> {
    fn from(field: Field) -> Self {
        match field {
            Field::Known(v) => Some(v),
            Field::Unknown => None,
        }
    }
}

/// Identity fields of one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Full name ("Nom et Prénom")
    pub name: Field,

    /// Student number ("N° Etudiant")
    pub student_id: Field,

    /// National student identifier ("INE")
    pub national_id: Field,
}

impl Identity {
    /// Check whether two identities belong to the same student.
    ///
    /// Only the national id is compared.
    pub fn same_signature(&self, other: &Identity) -> bool {
        self.national_id == other.national_id
    }

    /// Check if no field was resolved.
    pub fn is_unknown(&self) -> bool {
        !self.name.is_known() && !self.student_id.is_known() && !self.national_id.is_known()
    }
}

/// Birth date and place, extracted independently of [`Identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInfo {
    /// Date phrase as printed, e.g. "1 janvier 2000"
    pub date: Field,

    /// Place of birth
    pub place: Field,
}

impl BirthInfo {
    /// Interpret the printed French date phrase.
    ///
    /// Returns `None` when the date is unknown or not of the form
    /// `<day>[er] <month name> <year>`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_french_date(self.date.value()?)
    }
}

fn parse_french_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day = parts.next()?;
    let day: u32 = day.strip_suffix("er").unwrap_or(day).parse().ok()?;
    let month = french_month(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn french_month(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().trim_end_matches('.') {
        "janvier" | "janv" => 1,
        "février" | "fevrier" | "févr" | "fevr" => 2,
        "mars" => 3,
        "avril" | "avr" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" | "juil" => 7,
        "août" | "aout" => 8,
        "septembre" | "sept" => 9,
        "octobre" | "oct" => 10,
        "novembre" | "nov" => 11,
        "décembre" | "decembre" | "déc" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
