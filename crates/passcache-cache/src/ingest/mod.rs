//! Ingestion pipeline: delimited export file to typed records.
//!
//! Parsing is tolerant. Ragged rows keep whatever columns they have, odd
//! quoting is read as-is, and a record the reader cannot recover is skipped
//! with a warning. Only input that is not text at all fails the whole parse.

mod classify;
mod fields;

pub use classify::{classify, RecordKind};
pub use fields::{Field, SourceRow};

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::error::{CacheError, Result};
use crate::types::{Credential, PaymentCard, SecureNote};

/// Name used when a row has no name or title column.
pub const UNTITLED: &str = "Untitled";

/// Records produced by one ingestion run, in source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub credentials: Vec<Credential>,
    pub cards: Vec<PaymentCard>,
    pub notes: Vec<SecureNote>,
    /// Rows the reader could not recover.
    pub skipped_rows: usize,
}

impl IngestReport {
    /// Total number of records produced.
    pub fn total(&self) -> usize {
        self.credentials.len() + self.cards.len() + self.notes.len()
    }

    fn push(&mut self, row: &SourceRow) {
        match classify(row) {
            RecordKind::Credential => self.credentials.push(to_credential(row)),
            RecordKind::PaymentCard => self.cards.push(to_card(row)),
            RecordKind::SecureNote => self.notes.push(to_note(row)),
        }
    }
}

/// Read and parse the export at `path`.
pub async fn parse_source(
    path: &Path,
) -> Result<(Vec<Credential>, Vec<PaymentCard>, Vec<SecureNote>)> {
    let report = parse_source_with_report(path).await?;
    Ok((report.credentials, report.cards, report.notes))
}

/// Read and parse the export at `path`, keeping skip counts.
pub async fn parse_source_with_report(path: &Path) -> Result<IngestReport> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CacheError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    parse_bytes(&bytes, path)
}

/// Parse export bytes. `origin` is only used in error messages and logs.
pub fn parse_bytes(bytes: &[u8], origin: &Path) -> Result<IngestReport> {
    let text = std::str::from_utf8(bytes).map_err(|e| CacheError::SourceFormat {
        path: origin.to_path_buf(),
        message: format!("not valid UTF-8 text: {e}"),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let delimiter = detect_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CacheError::SourceFormat {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut report = IngestReport::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                warn!(path = %origin.display(), line, "skipping unreadable row: {e}");
                report.skipped_rows += 1;
                continue;
            }
        };

        // Extra cells beyond the header have no column name and are dropped.
        let row = SourceRow::from_pairs(headers.iter().map(String::as_str).zip(record.iter()));
        if row.is_empty() {
            trace!(line = ?record.position().map(|p| p.line()), "skipping blank row");
            continue;
        }
        report.push(&row);
    }

    debug!(
        path = %origin.display(),
        credentials = report.credentials.len(),
        cards = report.cards.len(),
        notes = report.notes.len(),
        skipped = report.skipped_rows,
        "parsed source file"
    );
    Ok(report)
}

/// Pick the delimiter that occurs most often in the header line. Commas win
/// ties and headers with no candidate at all.
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    [b',', b'\t', b';']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|b| *b == d).count()))
        .fold((b',', 0), |best, cur| if cur.1 > best.1 { cur } else { best })
        .0
}

fn name_of(row: &SourceRow) -> String {
    row.get_owned(Field::Name)
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn to_credential(row: &SourceRow) -> Credential {
    Credential {
        name: name_of(row),
        url: row.get_owned(Field::Url),
        username: row.get_owned(Field::Username),
        password: row.get_owned(Field::Password).unwrap_or_default(),
        notes: row.get_owned(Field::Notes),
        folder: row.get_owned(Field::Folder),
    }
}

fn to_card(row: &SourceRow) -> PaymentCard {
    PaymentCard {
        name: name_of(row),
        cardholder_name: row.get_owned(Field::Holder),
        card_number: row.get_owned(Field::CardNumber),
        expiry_date: row.get_owned(Field::Expiry),
        cvv: row.get_owned(Field::Cvv),
        notes: row.get_owned(Field::Notes),
        folder: row.get_owned(Field::Folder),
    }
}

fn to_note(row: &SourceRow) -> SecureNote {
    SecureNote {
        name: name_of(row),
        notes: row.get_owned(Field::Notes).unwrap_or_default(),
        folder: row.get_owned(Field::Folder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(text: &str) -> IngestReport {
        parse_bytes(text.as_bytes(), Path::new("export.csv")).unwrap()
    }

    #[test]
    fn test_single_credential() {
        let report = parse("name,username,password,url\nExample,alice,s3cr3t,https://example.com\n");
        assert_eq!(
            report.credentials,
            vec![Credential {
                name: "Example".into(),
                url: Some("https://example.com".into()),
                username: Some("alice".into()),
                password: "s3cr3t".into(),
                notes: None,
                folder: None,
            }]
        );
        assert!(report.cards.is_empty());
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_single_card() {
        let report = parse("name,cardNumber,expiryDate,cvv\nVisa,4111111111111111,12/27,123\n");
        assert_eq!(report.cards.len(), 1);
        let card = &report.cards[0];
        assert_eq!(card.name, "Visa");
        assert_eq!(card.card_number.as_deref(), Some("4111111111111111"));
        assert_eq!(card.expiry_date.as_deref(), Some("12/27"));
        assert_eq!(card.cvv.as_deref(), Some("123"));
        assert!(report.credentials.is_empty());
    }

    #[test]
    fn test_heterogeneous_rows_keep_order() {
        let text = "\
type,title,login_username,login_password,website,notes,folder,card_number
login,Mail,me@example.com,pw1,https://mail.example.com,,Personal,
note,Wifi,,,,hunter2,Home,
card,Debit,,,,,Finance,5500000000000004
,Forum,bob,pw2,,,,
";
        let report = parse(text);
        let names: Vec<&str> = report.credentials.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Mail", "Forum"]);
        assert_eq!(report.credentials[0].url.as_deref(), Some("https://mail.example.com"));
        assert_eq!(report.credentials[0].folder.as_deref(), Some("Personal"));
        assert_eq!(report.notes[0].notes, "hunter2");
        assert_eq!(report.cards[0].card_number.as_deref(), Some("5500000000000004"));
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_ragged_rows_do_not_abort() {
        let text = "name,username,password\nShort,bob\nLong,carol,pw,extra,cells\nOk,dave,pw3\n";
        let report = parse(text);
        assert_eq!(report.credentials.len(), 3);
        assert_eq!(report.credentials[0].password, "");
        assert_eq!(report.credentials[1].password, "pw");
        assert_eq!(report.skipped_rows, 0);
    }

    #[test]
    fn test_odd_quoting_is_recovered() {
        let text = "name,password,notes\n\"Quoted, name\",pw,\"multi\nline\"\nBare\"quote,pw2,x\n";
        let report = parse(text);
        assert_eq!(report.credentials.len(), 2);
        assert_eq!(report.credentials[0].name, "Quoted, name");
        assert_eq!(report.credentials[0].notes.as_deref(), Some("multi\nline"));
    }

    #[test]
    fn test_missing_name_and_blank_rows() {
        let report = parse("name,password\n,pw\n,\n\n");
        assert_eq!(report.credentials.len(), 1);
        assert_eq!(report.credentials[0].name, UNTITLED);
    }

    #[test]
    fn test_bom_and_semicolon_delimiter() {
        let report = parse("\u{feff}name;password;url\nBank;pw;https://bank.example\n");
        assert_eq!(report.credentials.len(), 1);
        assert_eq!(report.credentials[0].name, "Bank");
        assert_eq!(report.credentials[0].url.as_deref(), Some("https://bank.example"));
    }

    #[test]
    fn test_tab_delimiter() {
        let report = parse("name\tnotes\nRecovery codes\t1234 5678\n");
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].notes, "1234 5678");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), IngestReport::default());
        assert_eq!(parse("name,password\n").total(), 0);
    }

    #[test]
    fn test_non_text_is_format_error() {
        let result = parse_bytes(&[0xff, 0xfe, 0xfd, b',', 0x80], Path::new("bad.csv"));
        match result {
            Err(CacheError::SourceFormat { path, message }) => {
                assert_eq!(path, Path::new("bad.csv"));
                assert!(message.contains("UTF-8"));
            }
            other => panic!("expected SourceFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b;c,d"), b',');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb"), b'\t');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[tokio::test]
    async fn test_parse_source_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("export.csv");
        tokio::fs::write(&path, "name,notes\nPlan,Buy milk\n").await.unwrap();

        let (credentials, cards, notes) = parse_source(&path).await.unwrap();
        assert!(credentials.is_empty());
        assert!(cards.is_empty());
        assert_eq!(notes[0].name, "Plan");
    }

    #[tokio::test]
    async fn test_parse_source_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = parse_source(&tmp.path().join("absent.csv")).await;
        assert!(matches!(result, Err(CacheError::SourceUnavailable { .. })));
    }
}
