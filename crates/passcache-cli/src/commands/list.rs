//! Record listing.

use clap::{Args, ValueEnum};
use passcache_cache::{Credential, PaymentCard, SecureNote, Snapshot};

use crate::render;
use crate::Context;

/// Which record kinds to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    #[default]
    All,
    Credentials,
    Cards,
    Notes,
}

/// List command arguments.
#[derive(Args)]
pub struct ListArgs {
    /// Record kind to list
    #[arg(value_enum, default_value_t = KindFilter::All)]
    pub kind: KindFilter,

    /// Case-insensitive filter on name, username, URL, and folder
    #[arg(short, long)]
    pub query: Option<String>,

    /// Rebuild the cache before listing
    #[arg(long)]
    pub refresh: bool,
}

/// Run the list command.
pub async fn run(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let snapshot = manager.get(args.refresh).await?;
    let query = args.query.as_deref().map(str::to_lowercase);
    let query = query.as_deref();

    let matches = Matches::collect(&snapshot, query);
    let show = |kind: KindFilter| args.kind == KindFilter::All || args.kind == kind;

    if show(KindFilter::Credentials) {
        render::render_credentials(&matches.credentials);
    }
    if show(KindFilter::Cards) {
        if show(KindFilter::Credentials) {
            println!();
        }
        render::render_cards(&matches.cards);
    }
    if show(KindFilter::Notes) {
        if args.kind == KindFilter::All {
            println!();
        }
        render::render_notes(&matches.notes);
    }

    render::render_summary(&snapshot);
    Ok(())
}

/// Records from a snapshot that pass the query.
struct Matches<'a> {
    credentials: Vec<&'a Credential>,
    cards: Vec<&'a PaymentCard>,
    notes: Vec<&'a SecureNote>,
}

impl<'a> Matches<'a> {
    fn collect(snapshot: &'a Snapshot, query: Option<&str>) -> Self {
        Self {
            credentials: snapshot
                .credentials
                .iter()
                .filter(|c| {
                    matches_any(
                        query,
                        [
                            Some(c.name.as_str()),
                            c.username.as_deref(),
                            c.url.as_deref(),
                            c.folder.as_deref(),
                        ],
                    )
                })
                .collect(),
            cards: snapshot
                .cards
                .iter()
                .filter(|c| {
                    matches_any(
                        query,
                        [Some(c.name.as_str()), c.cardholder_name.as_deref(), c.folder.as_deref()],
                    )
                })
                .collect(),
            notes: snapshot
                .notes
                .iter()
                .filter(|n| matches_any(query, [Some(n.name.as_str()), n.folder.as_deref()]))
                .collect(),
        }
    }
}

/// True when there is no query or any present field contains it.
/// `query` must already be lowercase.
fn matches_any<const N: usize>(query: Option<&str>, fields: [Option<&str>; N]) -> bool {
    match query {
        None => true,
        Some(q) => fields
            .iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(q)),
    }
}
