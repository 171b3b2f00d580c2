use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use memeforge::{Config, Session, Source, SourceFilter, ViewState};

use super::default_aggregator;

pub async fn cmd_browse(query: Option<&str>, source: &str, page: usize, json: bool) -> Result<()> {
    let filter = parse_source_filter(source)?;
    let config = Config::load()?;
    let mut session = Session::new(Arc::new(default_aggregator(&config)?));

    if let Some(query) = query {
        session.set_query(query);
    }
    session.set_source_filter(filter);

    let start = Instant::now();
    session.refresh().await;
    let elapsed = start.elapsed();
    session.go_to_page(page);

    let state = session.render();

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    if let Some(q) = session.view().search_header(session.store()) {
        println!("🔎 Search results for: \"{q}\"");
    }

    match state {
        ViewState::Loading { .. } => println!("⏳ Still loading"),
        ViewState::Failed { message } => {
            println!("❌ Could not load the catalog: {message}");
            println!("   Run the command again to retry.");
        }
        ViewState::NoResults { .. } => {
            println!("No memes found");
            println!("Try adjusting your search terms");
        }
        ViewState::Grid {
            items,
            page,
            total_pages,
            ..
        } => {
            println!(
                "📚 {} items from {} in {:.0}ms",
                session.view().visible_items(session.store()).len(),
                filter,
                elapsed.as_secs_f64() * 1000.0
            );
            for item in &items {
                let kind = if item.is_animated { "GIF" } else { "   " };
                println!(
                    "  {kind} [{:<7}] {:<40} {}x{}  {}",
                    item.source,
                    truncate(&item.name, 40),
                    item.width,
                    item.height,
                    item.url
                );
            }
            if total_pages > 1 {
                println!("\nPage {page} of {total_pages}");
            }
        }
    }

    Ok(())
}

fn parse_source_filter(source: &str) -> Result<SourceFilter> {
    if source.trim().eq_ignore_ascii_case("all") {
        return Ok(SourceFilter::All);
    }
    Ok(SourceFilter::Only(source.parse::<Source>()?))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
