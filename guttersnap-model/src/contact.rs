use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// A non-file form field supplied by the homeowner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContactField {
    Email,
    Phone,
    Address,
    Notes,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Email,
        ContactField::Phone,
        ContactField::Address,
        ContactField::Notes,
    ];

    /// Fields that must be non-empty after trimming.
    pub const REQUIRED: [ContactField; 3] =
        [ContactField::Email, ContactField::Phone, ContactField::Address];

    pub const fn as_str(self) -> &'static str {
        match self {
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Address => "address",
            ContactField::Notes => "notes",
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, ContactField::Notes)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// Contact details as currently entered (display values, untrimmed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactFields {
    pub email: String,
    pub phone: String,
    pub address: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub notes: String,
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Address => &self.address,
            ContactField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let slot = match field {
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Address => &mut self.address,
            ContactField::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    /// Required fields whose trimmed value is empty, in form order.
    pub fn missing_required(&self) -> Vec<ContactField> {
        ContactField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}
