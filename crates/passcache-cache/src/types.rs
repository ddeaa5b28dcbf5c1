//! Record types and the persisted snapshot.
//!
//! Field names serialize in camelCase so the snapshot document reads
//! `{ credentials, cards, notes, lastUpdated, sourceFingerprint }`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A website or application login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Empty when the export row had no password.
    #[serde(default)]
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// A payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCard {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl PaymentCard {
    /// Last four digits of the card number, for display.
    pub fn last_four(&self) -> Option<&str> {
        let number = self.card_number.as_deref()?.trim();
        let start = number
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| i)
            .unwrap_or(0);
        Some(&number[start..])
    }
}

/// A free-form secure note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureNote {
    pub name: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// The full result of one ingestion run.
///
/// Only consistent with the exact source bytes that produced
/// `source_fingerprint`; a different live fingerprint means it is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub credentials: Vec<Credential>,

    #[serde(default)]
    pub cards: Vec<PaymentCard>,

    #[serde(default)]
    pub notes: Vec<SecureNote>,

    /// Build time in Unix milliseconds.
    #[serde(default)]
    pub last_updated: i64,

    /// Fingerprint of the source bytes this snapshot was built from.
    #[serde(default)]
    pub source_fingerprint: String,
}

impl Snapshot {
    /// Assemble a snapshot stamped with the current time.
    pub fn new(
        credentials: Vec<Credential>,
        cards: Vec<PaymentCard>,
        notes: Vec<SecureNote>,
        source_fingerprint: String,
    ) -> Self {
        Self {
            credentials,
            cards,
            notes,
            last_updated: Utc::now().timestamp_millis(),
            source_fingerprint,
        }
    }

    /// Whether this snapshot must be rebuilt for a source with `fingerprint`.
    pub fn is_stale_for(&self, fingerprint: &str) -> bool {
        self.source_fingerprint != fingerprint
    }

    /// Total number of records across all kinds.
    pub fn total(&self) -> usize {
        self.credentials.len() + self.cards.len() + self.notes.len()
    }

    /// Build time as a UTC timestamp.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.last_updated).single()
    }
}
