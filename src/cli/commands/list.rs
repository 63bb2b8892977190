//! List command implementation
//!
//! Prints one page of the catalog and a page bar.

use super::{connect, load_runtime_config, EXIT_CONNECTION, EXIT_FAILED, EXIT_OK};
use crate::core::catalog::{CatalogQuery, PageLink, FETCH_FAILED};
use crate::core::notify::ConsoleNotifier;
use clap::Args;
use std::sync::Arc;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Products per page (defaults to `[catalog] page_size`)
    #[arg(short, long)]
    pub size: Option<usize>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let client = match connect(&config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let page_size = self.size.unwrap_or(config.catalog.page_size);
        let mut query = CatalogQuery::new(Arc::new(client), Arc::new(ConsoleNotifier), page_size);

        query.load().await;
        if query.page().is_none() {
            return Ok(report_failure(&query));
        }

        let wanted = self.page.saturating_sub(1);
        if wanted != query.current_page() && !query.go_to_page(wanted).await {
            println!(
                "❌ Page {} does not exist ({} page(s))",
                self.page,
                query.total_pages()
            );
            return Ok(EXIT_FAILED);
        }
        if query.error().is_some() {
            return Ok(report_failure(&query));
        }

        print_page(&query);
        Ok(EXIT_OK)
    }
}

/// Exit code for a failed fetch; transport failures were already notified
fn report_failure(query: &CatalogQuery) -> i32 {
    match query.error() {
        Some(FETCH_FAILED) => EXIT_CONNECTION,
        Some(message) => {
            println!("❌ {message}");
            EXIT_FAILED
        }
        None => EXIT_FAILED,
    }
}

fn print_page(query: &CatalogQuery) {
    let Some(page) = query.page() else {
        return;
    };

    if page.items.is_empty() {
        println!("No products yet.");
        return;
    }

    println!(
        "{:<38} {:<28} {:>10} {:<16} {:<10}",
        "ID", "Name", "Price", "Category", "Created"
    );
    println!("{}", "-".repeat(106));
    for product in &page.items {
        let created = product
            .created_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:<38} {:<28} {:>10} {:<16} {:<10}",
            product.id.as_str(),
            product.name,
            product.formatted_price(),
            product.category,
            created
        );
    }
    println!();
    println!(
        "Page {} of {} ({} products)",
        page.page_index + 1,
        page.total_pages,
        page.total_elements
    );

    let bar = render_page_bar(query.current_page(), &query.page_links());
    if !bar.is_empty() {
        let prev = if query.has_previous() { "«" } else { " " };
        let next = if query.has_next() { "»" } else { " " };
        println!("{prev} {bar} {next}");
    }
}

/// Render page links as `1 … 4 [5] 6 … 10`
pub fn render_page_bar(current: usize, links: &[PageLink]) -> String {
    links
        .iter()
        .map(|link| match link {
            PageLink::Page(n) if *n == current => format!("[{}]", n + 1),
            PageLink::Page(n) => (n + 1).to_string(),
            PageLink::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
