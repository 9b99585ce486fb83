use chrono_tz::Tz;

use crate::app::{AlmanacError, AppContext, Result};
use crate::domain::{WisdomItem, WisdomSource};
use crate::providers::CatalogOrigin;

/// Render an item as a short block of text: header, body, citation.
pub fn format_item(item: &WisdomItem) -> String {
    let mut out = format!("[{}] {}\n\n", item.source, item.display_title());
    for line in item.text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    if let Some(citation) = item.citation() {
        out.push_str(&format!("\n  — {}\n", citation));
    }
    out
}

fn save_if_requested(ctx: &AppContext, item: &WisdomItem, save: bool) -> Result<()> {
    if !save {
        return Ok(());
    }
    if ctx.saved.save(item)? {
        println!("Saved {}", item.id);
    } else {
        println!("Already saved: {}", item.id);
    }
    Ok(())
}

pub async fn today(ctx: &AppContext, tz: Tz, save: bool) -> Result<()> {
    let view = ctx.engine.daily_view(tz).await?;
    print!("{}", format_item(&view.today));

    if !view.weekly_koans.is_empty() {
        println!("\nKoans this week:");
        for koan in &view.weekly_koans {
            println!("  {}: {}", koan.display_title(), koan.text);
        }
    }

    save_if_requested(ctx, &view.today, save)
}

pub async fn refresh(ctx: &AppContext, save: bool) -> Result<()> {
    let item = ctx.engine.refresh().await?;
    print!("{}", format_item(&item));
    save_if_requested(ctx, &item, save)
}

pub fn week(ctx: &AppContext, tz: Tz, all: bool) -> Result<()> {
    let log = ctx.engine.current_week(tz);
    let items = if all {
        log.items
    } else {
        log.items_from(WisdomSource::Koan)
    };

    if items.is_empty() {
        println!("Nothing shown this week");
        return Ok(());
    }

    println!("Week {}", log.iso_week_key);
    for item in items {
        println!("  [{}] {}", item.source, item.display_title());
    }
    Ok(())
}

pub fn list_sources(ctx: &AppContext) -> Result<()> {
    let settings = ctx.settings.load();
    for source in WisdomSource::ALL {
        let mark = if settings.is_enabled(source) { "x" } else { " " };
        println!("[{}] {}", mark, source);
    }
    Ok(())
}

pub fn set_source(ctx: &AppContext, source: WisdomSource, enabled: bool) -> Result<()> {
    let settings = ctx.settings.set_enabled(source, enabled)?;
    println!(
        "{} {}",
        if enabled { "Enabled" } else { "Disabled" },
        source
    );

    if settings.enabled_sources().is_empty() {
        eprintln!("Warning: no sources enabled; daily wisdom is unavailable");
    }
    Ok(())
}

pub async fn catalog(ctx: &AppContext, source: WisdomSource) -> Result<()> {
    let outcome = ctx.providers.load(source).await;
    let origin = match outcome.origin {
        CatalogOrigin::Bundled => "bundled",
        CatalogOrigin::Cached => "cache",
        CatalogOrigin::Fetched => "network + bundled",
        CatalogOrigin::Fallback => "bundled (network unavailable)",
    };
    println!("{}: {} items from {}", source, outcome.items.len(), origin);
    Ok(())
}

pub fn list_saved(ctx: &AppContext) -> Result<()> {
    let saved = ctx.saved.list();
    if saved.is_empty() {
        println!("No saved items");
        return Ok(());
    }

    for entry in saved {
        println!(
            "{}  {}  {}",
            entry.saved_at.format("%Y-%m-%d"),
            entry.item.id,
            entry.item.display_title()
        );
    }
    Ok(())
}

pub fn unsave(ctx: &AppContext, id: &str) -> Result<()> {
    if !ctx.saved.unsave(id)? {
        return Err(AlmanacError::Other(format!("Not saved: {}", id)));
    }
    println!("Removed {}", id);
    Ok(())
}
