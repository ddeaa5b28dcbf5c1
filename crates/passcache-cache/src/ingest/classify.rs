//! Row classification.
//!
//! Priority:
//! 1. An explicit type column, matched case-insensitively against
//!    [`TYPE_LABELS`]. When no type column carries a recognized label, the
//!    `category` column is tried against the same table.
//! 2. Field presence: card fields, then credential fields, then a note field
//!    with no password and no username.
//! 3. [`RecordKind::Credential`].
//!
//! Card fields outrank credential fields so a card row that also carries a
//! password or name is never filed as a login.

use serde::{Deserialize, Serialize};

use super::fields::{Field, SourceRow, CARD_INDICATORS, CREDENTIAL_INDICATORS};

/// The entity a source row becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Credential,
    PaymentCard,
    SecureNote,
}

/// Recognized values of the type column, lowercase.
const TYPE_LABELS: &[(&str, RecordKind)] = &[
    ("password", RecordKind::Credential),
    ("login", RecordKind::Credential),
    ("creditcard", RecordKind::PaymentCard),
    ("credit_card", RecordKind::PaymentCard),
    ("card", RecordKind::PaymentCard),
    ("note", RecordKind::SecureNote),
    ("securenote", RecordKind::SecureNote),
    ("secure_note", RecordKind::SecureNote),
];

/// Column that doubles as a folder name and a type label.
const CATEGORY_COLUMN: &str = "category";

impl RecordKind {
    /// Map a type-column value. Unrecognized labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        TYPE_LABELS
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, kind)| *kind)
    }
}

/// Decide which entity `row` becomes.
pub fn classify(row: &SourceRow) -> RecordKind {
    let labeled = row
        .get(Field::Kind)
        .and_then(RecordKind::from_label)
        .or_else(|| row.column(CATEGORY_COLUMN).and_then(RecordKind::from_label));
    if let Some(kind) = labeled {
        return kind;
    }

    if row.has_any(CARD_INDICATORS) {
        return RecordKind::PaymentCard;
    }

    if row.has_any(CREDENTIAL_INDICATORS) {
        return RecordKind::Credential;
    }

    if row.has(Field::Notes) && !row.has(Field::Password) && !row.has(Field::Username) {
        return RecordKind::SecureNote;
    }

    RecordKind::Credential
}
