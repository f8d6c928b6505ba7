use std::path::Path;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::domain::NewsItem;
use crate::fetcher::FeedReader;
use crate::pipeline::supervisor;
use crate::store::Store;

pub async fn serve(ctx: AppContext) -> Result<()> {
    supervisor::run(ctx).await
}

pub fn init_config(path: &Path, force: bool) -> Result<()> {
    Config::write_default(path, force)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub async fn fetch_feed(ctx: &AppContext, url: &str) -> Result<()> {
    let items = ctx.reader.read(url).await?;

    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    println!("Fetched {} items", items.len());
    print_items(&items);
    Ok(())
}

pub fn list_recent(ctx: &AppContext, count: i64) -> Result<()> {
    let items = ctx.store.recent_items(count)?;

    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    print_items(&items);
    Ok(())
}

fn print_items(items: &[NewsItem]) {
    for item in items {
        let date = item
            .published_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".into());
        println!("{}  {}", date, item.title);
        if let Some(link) = &item.link {
            println!("            {}", link);
        }
    }
}
