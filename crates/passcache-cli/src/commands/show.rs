//! Single-record detail view.

use clap::Args;
use console::style;
use passcache_cache::{Credential, PaymentCard, SecureNote, Snapshot};

use crate::render::{self, mask, mask_card_number, render_field};
use crate::Context;

/// Show command arguments.
#[derive(Args)]
pub struct ShowArgs {
    /// Record name (case-insensitive)
    pub name: String,

    /// Print passwords, card numbers, CVVs, and note bodies in clear
    #[arg(long)]
    pub reveal: bool,
}

/// A record looked up by name.
#[derive(Debug, PartialEq)]
enum Found<'a> {
    Credential(&'a Credential),
    Card(&'a PaymentCard),
    Note(&'a SecureNote),
}

/// First record named `name`, searching credentials, then cards, then notes.
fn find<'a>(snapshot: &'a Snapshot, name: &str) -> Option<Found<'a>> {
    let name = name.trim();
    snapshot
        .credentials
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(Found::Credential)
        .or_else(|| {
            snapshot
                .cards
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .map(Found::Card)
        })
        .or_else(|| {
            snapshot
                .notes
                .iter()
                .find(|n| n.name.eq_ignore_ascii_case(name))
                .map(Found::Note)
        })
}

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let snapshot = manager.get(false).await?;

    let Some(found) = find(&snapshot, &args.name) else {
        anyhow::bail!("No record named '{}'", args.name);
    };

    match found {
        Found::Credential(c) => {
            println!("{} {}", style("Credential").bold(), style(&c.name).cyan());
            render_field("URL", c.url.as_deref());
            render_field("Username", c.username.as_deref());
            render_field("Password", Some(mask(&c.password, args.reveal).as_str()));
            render_field("Folder", c.folder.as_deref());
            render_field("Notes", c.notes.as_deref());
        }
        Found::Card(c) => {
            println!("{} {}", style("Card").bold(), style(&c.name).cyan());
            render_field("Holder", c.cardholder_name.as_deref());
            render_field("Number", Some(mask_card_number(c, args.reveal).as_str()));
            render_field("Expires", c.expiry_date.as_deref());
            render_field(
                "CVV",
                c.cvv.as_deref().map(|cvv| mask(cvv, args.reveal)).as_deref(),
            );
            render_field("Folder", c.folder.as_deref());
            render_field("Notes", c.notes.as_deref());
        }
        Found::Note(n) => {
            println!("{} {}", style("Note").bold(), style(&n.name).cyan());
            render_field("Folder", n.folder.as_deref());
            render_field("Body", Some(mask(&n.notes, args.reveal).as_str()));
        }
    }

    if !args.reveal {
        eprintln!("{}", style("Secrets hidden; pass --reveal to print them.").dim());
    }
    render::render_summary(&snapshot);
    Ok(())
}
