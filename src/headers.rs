//! Header Canonicalizer.
//!
//! Raw column titles are matched against a keyword rule chain. Rules are tried
//! in order and the first hit wins, so "Employee ID Name" is an `id` column,
//! never a `profile` column.

use std::fmt;

use serde::Serialize;

use crate::record::CanonicalField;

/// Keyword rules in priority order.
pub const HEADER_RULES: &[(&[&str], CanonicalField)] = &[
    (&["id"], CanonicalField::Id),
    (&["name", "first", "last", "profile"], CanonicalField::Profile),
    (&["email"], CanonicalField::Email),
    (&["role"], CanonicalField::Role),
    (&["status"], CanonicalField::Status),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum HeaderSlot {
    Canonical(CanonicalField),
    /// Lowercased raw header with no canonical home; its cells are dropped.
    Unrecognized(String),
}

impl HeaderSlot {
    pub fn field(&self) -> Option<CanonicalField> {
        match self {
            HeaderSlot::Canonical(field) => Some(*field),
            HeaderSlot::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for HeaderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderSlot::Canonical(field) => write!(f, "{field}"),
            HeaderSlot::Unrecognized(raw) => write!(f, "{raw} (ignored)"),
        }
    }
}

/// Positional header translation, one slot per raw header.
pub type HeaderMapping = Vec<HeaderSlot>;

pub fn canonicalize_header(raw: &str) -> HeaderSlot {
    let lowered = raw.to_lowercase();
    HEADER_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, field)| HeaderSlot::Canonical(*field))
        .unwrap_or(HeaderSlot::Unrecognized(lowered))
}

pub fn canonicalize_headers<S: AsRef<str>>(headers: &[S]) -> HeaderMapping {
    headers
        .iter()
        .map(|header| canonicalize_header(header.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(raw: &str) -> Option<CanonicalField> {
        canonicalize_header(raw).field()
    }

    #[test]
    fn id_rule_matches_any_position_and_case() {
        assert_eq!(field("ID"), Some(CanonicalField::Id));
        assert_eq!(field("Employee Id"), Some(CanonicalField::Id));
        assert_eq!(field("staffidentifier"), Some(CanonicalField::Id));
    }

    #[test]
    fn profile_rule_accepts_each_keyword() {
        for raw in ["Full Name", "First", "LAST", "Profile"] {
            assert_eq!(field(raw), Some(CanonicalField::Profile), "{raw}");
        }
    }

    #[test]
    fn remaining_rules_match_their_keyword() {
        assert_eq!(field("Work Email"), Some(CanonicalField::Email));
        assert_eq!(field("Job Role"), Some(CanonicalField::Role));
        assert_eq!(field("Employment Status"), Some(CanonicalField::Status));
    }

    #[test]
    fn earlier_rules_shadow_later_ones() {
        // "id" beats "name"
        assert_eq!(field("Name ID"), Some(CanonicalField::Id));
        // "name" beats "email"
        assert_eq!(field("Email Username"), Some(CanonicalField::Profile));
        // "id" hides inside "Residential Status"
        assert_eq!(field("Residential Status"), Some(CanonicalField::Id));
        // "role" beats "status"
        assert_eq!(field("Role Status"), Some(CanonicalField::Role));
    }

    #[test]
    fn unmatched_headers_keep_lowercased_text() {
        assert_eq!(
            canonicalize_header("Department"),
            HeaderSlot::Unrecognized("department".to_string())
        );
        assert_eq!(canonicalize_header(""), HeaderSlot::Unrecognized(String::new()));
    }

    #[test]
    fn mapping_preserves_length_and_order() {
        let mapping = canonicalize_headers(&[
            "Employee ID",
            "Full Name",
            "Work Email",
            "Job Role",
            "Employment Status",
            "Team",
        ]);
        let fields = mapping.iter().map(HeaderSlot::field).collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                Some(CanonicalField::Id),
                Some(CanonicalField::Profile),
                Some(CanonicalField::Email),
                Some(CanonicalField::Role),
                Some(CanonicalField::Status),
                None,
            ]
        );
    }
}
