//! Terminal rendering utilities.
//!
//! Secrets are masked unless the caller explicitly asks to reveal them.

use chrono::{DateTime, Local, Utc};
use console::style;
use passcache_cache::{Credential, PaymentCard, SecureNote, Snapshot};

/// Placeholder shown instead of a secret.
pub const MASK: &str = "••••••••";

/// Mask a secret value, keeping emptiness visible.
pub fn mask(value: &str, reveal: bool) -> String {
    if reveal || value.is_empty() {
        value.to_string()
    } else {
        MASK.to_string()
    }
}

/// Mask a card number down to its last four digits.
pub fn mask_card_number(card: &PaymentCard, reveal: bool) -> String {
    match (&card.card_number, reveal) {
        (Some(number), true) => number.clone(),
        (Some(_), false) => format!("•••• {}", card.last_four().unwrap_or_default()),
        (None, _) => String::new(),
    }
}

/// Format a snapshot build time in local time.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "unknown".to_string(),
    }
}

/// Print credentials as a table (no secrets).
pub fn render_credentials(items: &[&Credential]) {
    println!("{}", style(format!("Credentials ({})", items.len())).bold());
    if items.is_empty() {
        println!("  {}", style("none").dim());
        return;
    }
    println!("  {:<28} {:<28} {}", "NAME", "USERNAME", "URL");
    for c in items {
        println!(
            "  {:<28} {:<28} {}",
            truncate(&c.name, 28),
            truncate(c.username.as_deref().unwrap_or("-"), 28),
            style(c.url.as_deref().unwrap_or("-")).dim()
        );
    }
}

/// Print payment cards as a table (last four digits only).
pub fn render_cards(items: &[&PaymentCard]) {
    println!("{}", style(format!("Cards ({})", items.len())).bold());
    if items.is_empty() {
        println!("  {}", style("none").dim());
        return;
    }
    println!("  {:<28} {:<24} {:<10} {}", "NAME", "HOLDER", "EXPIRES", "NUMBER");
    for c in items {
        println!(
            "  {:<28} {:<24} {:<10} {}",
            truncate(&c.name, 28),
            truncate(c.cardholder_name.as_deref().unwrap_or("-"), 24),
            c.expiry_date.as_deref().unwrap_or("-"),
            mask_card_number(c, false)
        );
    }
}

/// Print secure note names (bodies are never listed).
pub fn render_notes(items: &[&SecureNote]) {
    println!("{}", style(format!("Notes ({})", items.len())).bold());
    if items.is_empty() {
        println!("  {}", style("none").dim());
        return;
    }
    println!("  {:<28} {}", "NAME", "FOLDER");
    for n in items {
        println!(
            "  {:<28} {}",
            truncate(&n.name, 28),
            style(n.folder.as_deref().unwrap_or("-")).dim()
        );
    }
}

/// One-line summary of a snapshot.
pub fn render_summary(snapshot: &Snapshot) {
    eprintln!(
        "{} {} credentials, {} cards, {} notes (built {})",
        style("*").green(),
        style(snapshot.credentials.len()).cyan(),
        style(snapshot.cards.len()).cyan(),
        style(snapshot.notes.len()).cyan(),
        format_timestamp(snapshot.last_updated_at()),
    );
}

/// Print a labelled field, skipping empty values.
pub fn render_field(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        println!("  {:<12} {}", style(label).dim(), value);
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
