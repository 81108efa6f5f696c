//! Canonical record model.
//!
//! Every imported row becomes an [`EmployeeRecord`] carrying exactly the five
//! [`CanonicalField`]s, whatever the source file called its columns.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Id,
    Profile,
    Email,
    Role,
    Status,
}

impl CanonicalField {
    /// All fields in declaration order, which is also the display column order.
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Id,
        CanonicalField::Profile,
        CanonicalField::Email,
        CanonicalField::Role,
        CanonicalField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Id => "id",
            CanonicalField::Profile => "profile",
            CanonicalField::Email => "email",
            CanonicalField::Role => "role",
            CanonicalField::Status => "status",
        }
    }

    /// Column caption used by the table renderer ("Id", "Profile", ...).
    pub fn title(&self) -> &'static str {
        match self {
            CanonicalField::Id => "Id",
            CanonicalField::Profile => "Profile",
            CanonicalField::Email => "Email",
            CanonicalField::Role => "Role",
            CanonicalField::Status => "Status",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!("Unknown field '{trimmed}' (expected one of id, profile, email, role, status)")
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub profile: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

impl EmployeeRecord {
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Id => &self.id,
            CanonicalField::Profile => &self.profile,
            CanonicalField::Email => &self.email,
            CanonicalField::Role => &self.role,
            CanonicalField::Status => &self.status,
        }
    }

    pub fn set(&mut self, field: CanonicalField, value: String) {
        let slot = match field {
            CanonicalField::Id => &mut self.id,
            CanonicalField::Profile => &mut self.profile,
            CanonicalField::Email => &mut self.email,
            CanonicalField::Role => &mut self.role,
            CanonicalField::Status => &mut self.status,
        };
        *slot = value;
    }

    /// Field values in [`CanonicalField::ALL`] order.
    pub fn values(&self) -> [&str; 5] {
        CanonicalField::ALL.map(|field| self.get(field))
    }
}
