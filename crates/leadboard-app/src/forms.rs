// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{LeadStatus, LeadUpdate};

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Email,
    Status,
}

impl EditableField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Status => "status",
        }
    }
}

/// A pending single-field edit on the selected lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadFieldEdit {
    Email(String),
    Status(LeadStatus),
}

impl LeadFieldEdit {
    pub fn field(&self) -> EditableField {
        match self {
            Self::Email(_) => EditableField::Email,
            Self::Status(_) => EditableField::Status,
        }
    }

    /// Blank edits are dropped without touching the store.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Email(value) => value.is_empty(),
            Self::Status(_) => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Email(value) => {
                if !is_valid_email(value) {
                    bail!(INVALID_EMAIL_MESSAGE);
                }
                Ok(())
            }
            // the status picker only offers valid values
            Self::Status(_) => Ok(()),
        }
    }

    pub fn to_update(&self) -> LeadUpdate {
        match self {
            Self::Email(value) => LeadUpdate::email(value.clone()),
            Self::Status(status) => LeadUpdate::status(*status),
        }
    }
}

/// Accepts `local@domain.tld` shapes: no whitespace, a single `@`, and a dot
/// inside the domain with text on both sides.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::{EditableField, INVALID_EMAIL_MESSAGE, LeadFieldEdit, is_valid_email};
    use crate::{LeadStatus, LeadUpdate};

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("john@acme.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));
        assert!(!is_valid_email("john@acme"));
        assert!(!is_valid_email("john@.com"));
        assert!(!is_valid_email("john@acme."));
        assert!(!is_valid_email("@acme.com"));
        assert!(!is_valid_email("jo hn@acme.com"));
        assert!(!is_valid_email("john@@acme.com"));
        assert!(!is_valid_email("john"));
    }

    #[test]
    fn invalid_email_edit_reports_message() {
        let error = LeadFieldEdit::Email("nope".to_owned())
            .validate()
            .expect_err("invalid email should fail");
        assert_eq!(error.to_string(), INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn status_edit_always_validates() {
        assert!(
            LeadFieldEdit::Status(LeadStatus::Unqualified)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn blank_email_is_blank() {
        assert!(LeadFieldEdit::Email(String::new()).is_blank());
        assert!(!LeadFieldEdit::Status(LeadStatus::New).is_blank());
    }

    #[test]
    fn edits_touch_only_their_field() {
        let email = LeadFieldEdit::Email("john@acme.com".to_owned());
        assert_eq!(email.field(), EditableField::Email);
        assert_eq!(email.to_update(), LeadUpdate::email("john@acme.com"));

        let status = LeadFieldEdit::Status(LeadStatus::Qualified);
        assert_eq!(status.field().as_str(), "status");
        assert_eq!(status.to_update(), LeadUpdate::status(LeadStatus::Qualified));
    }
}
