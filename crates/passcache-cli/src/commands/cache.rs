//! Cache maintenance commands.

use console::{style, Emoji, StyledObject};
use passcache_cache::{CacheError, CacheState};

use crate::render;
use crate::Context;

static CHECK: Emoji = Emoji("✓", "+");
static CROSS: Emoji = Emoji("✗", "x");
static WARN: Emoji = Emoji("⚠", "!");

/// Rebuild the cache from the source file.
pub async fn refresh(ctx: &Context) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    let snapshot = manager.refresh().await?;

    println!(
        "{} Rebuilt cache at {}",
        style(CHECK).green(),
        manager.cache_path().display()
    );
    render::render_summary(&snapshot);
    Ok(())
}

/// Delete the cache file.
pub async fn clear(ctx: &Context) -> anyhow::Result<()> {
    let manager = ctx.manager()?;
    manager.clear().await;
    println!("Cache cleared.");
    Ok(())
}

/// Show resolved paths and the cache state.
pub async fn status(ctx: &Context) -> anyhow::Result<()> {
    println!("passcache status\n");

    println!("  {:<10} {}", "Config", ctx.config_path.display());
    match &ctx.paths.source {
        Some(source) if source.is_file() => {
            println!("  {:<10} {}", "Source", source.display());
        }
        Some(source) => {
            println!(
                "  {:<10} {} {}",
                "Source",
                source.display(),
                style("(missing)").yellow()
            );
        }
        None => println!("  {:<10} {}", "Source", style("not configured").yellow()),
    }
    println!("  {:<10} {}", "Cache", ctx.paths.cache_file.display());
    println!(
        "  {:<10} {}",
        "Encrypt",
        if ctx.paths.encrypt { "yes" } else { "no" }
    );
    println!();

    let manager = ctx.manager()?;
    match manager.status().await {
        Ok(state) => {
            let (icon, hint) = describe(state);
            println!("  {} Cache is {}", icon, state);
            if let Some(hint) = hint {
                println!("    {}", hint);
            }
        }
        Err(CacheError::SourceNotConfigured) => {
            println!("  {} No source file configured", style(CROSS).red());
            println!("    Run 'passcache config set-source <FILE>' to set one");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Icon and follow-up hint for a cache state.
fn describe(state: CacheState) -> (StyledObject<Emoji<'static, 'static>>, Option<&'static str>) {
    match state {
        CacheState::Fresh => (style(CHECK).green(), None),
        CacheState::Empty => (
            style(WARN).yellow(),
            Some("It will be built on the next read"),
        ),
        CacheState::Stale => (
            style(WARN).yellow(),
            Some("The source changed; it will be rebuilt on the next read"),
        ),
        CacheState::Corrupt => (
            style(CROSS).red(),
            Some("It will be discarded and rebuilt on the next read"),
        ),
    }
}
