//! Logical fields and the column spellings that map to them.
//!
//! Exports from different password managers name the same column
//! differently. Each logical [`Field`] has an ordered list of accepted
//! spellings; the first one present in a row wins. Values are never merged.

use std::collections::HashMap;

/// A logical column of a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Kind,
    Name,
    Url,
    Username,
    Password,
    Notes,
    Folder,
    CardNumber,
    Expiry,
    Cvv,
    Holder,
}

/// Accepted spellings per field, lowercase, in priority order.
const SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Kind, &["type", "item_type", "itemtype", "record_type", "kind"]),
    (Field::Name, &["name", "title"]),
    (Field::Url, &["url", "website", "login_uri", "uri"]),
    (Field::Username, &["username", "login_username", "user", "email"]),
    (Field::Password, &["password", "login_password", "pass"]),
    (Field::Notes, &["notes", "note", "extra", "comments"]),
    (Field::Folder, &["folder", "category", "group", "grouping"]),
    (Field::CardNumber, &["cardnumber", "card_number", "cc_number", "card_no"]),
    (
        Field::Expiry,
        &["expirydate", "expiry_date", "expiry", "expiration", "expirationdate", "exp_date"],
    ),
    (
        Field::Cvv,
        &["cvv", "cvc", "securitycode", "security_code", "verification_code"],
    ),
    (
        Field::Holder,
        &["cardholdername", "cardholder_name", "cardholder", "nameoncard", "name_on_card", "holder"],
    ),
];

impl Field {
    /// Accepted column spellings for this field.
    pub fn synonyms(self) -> &'static [&'static str] {
        SYNONYMS
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }
}

/// Fields whose presence marks a row as a payment card.
pub const CARD_INDICATORS: &[Field] = &[Field::CardNumber, Field::Expiry, Field::Cvv, Field::Holder];

/// Fields whose presence marks a row as a credential.
pub const CREDENTIAL_INDICATORS: &[Field] = &[Field::Password, Field::Username, Field::Url];

/// One data line of the source file: column name to value.
///
/// Column names are trimmed and lowercased. Blank values are not stored, so
/// "present" always means "present with content".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    values: HashMap<String, String>,
}

impl SourceRow {
    /// Build a row from `(column, value)` pairs. The first occurrence of a
    /// duplicated column wins.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = HashMap::new();
        for (column, value) in pairs {
            let column = column.trim().to_lowercase();
            if column.is_empty() || value.trim().is_empty() {
                continue;
            }
            values.entry(column).or_insert_with(|| value.to_string());
        }
        Self { values }
    }

    /// Value of the first accepted spelling of `field` present in this row.
    pub fn get(&self, field: Field) -> Option<&str> {
        field
            .synonyms()
            .iter()
            .find_map(|name| self.values.get(*name))
            .map(String::as_str)
    }

    /// Owned copy of [`SourceRow::get`].
    pub fn get_owned(&self, field: Field) -> Option<String> {
        self.get(field).map(str::to_string)
    }

    /// Whether any spelling of `field` is present.
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Whether any of `fields` is present.
    pub fn has_any(&self, fields: &[Field]) -> bool {
        fields.iter().any(|f| self.has(*f))
    }

    /// Value of one exact column, ignoring synonyms.
    pub fn column(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// True when no column carried content.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
