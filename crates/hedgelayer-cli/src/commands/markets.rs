use anyhow::Result;
use chrono::DateTime;
use clap::Subcommand;
use hedgelayer_client::{MarketSearchResponse, OrderbookResponse};

use crate::output;
use crate::Ctx;

#[derive(Subcommand)]
pub enum MarketsCommand {
    /// Search for markets by keyword
    Search {
        query: String,
        /// Max results
        #[arg(short = 'l', long, default_value_t = 10)]
        limit: u32,
    },
    /// Show orderbook spread and depth for a CLOB token
    Orderbook {
        token_id: String,
        /// Size for slippage calculation
        #[arg(short = 's', long)]
        size: Option<f64>,
    },
}

pub async fn run(command: MarketsCommand, ctx: &Ctx) -> Result<()> {
    match command {
        MarketsCommand::Search { query, limit } => search(&query, limit, ctx).await,
        MarketsCommand::Orderbook { token_id, size } => orderbook(&token_id, size, ctx).await,
    }
}

async fn search(query: &str, limit: u32, ctx: &Ctx) -> Result<()> {
    let client = ctx.client()?;
    let limit = limit.to_string();
    let data: MarketSearchResponse = client
        .get("/api/markets", &[("q", query), ("limit", &limit)])
        .await?;

    if ctx.json {
        output::json(&serde_json::json!({
            "markets": data.markets,
            "total": data.total,
        }));
        return Ok(());
    }

    if data.markets.is_empty() {
        output::warn(&format!("No markets found for \"{query}\""));
        return Ok(());
    }

    output::heading(&format!(
        "Markets matching \"{query}\" ({} total)",
        data.total
    ));

    let rows: Vec<Vec<String>> = data
        .markets
        .iter()
        .map(|m| {
            let yes = m
                .parsed_outcome_prices()
                .map(|(yes, _)| output::percent(yes))
                .unwrap_or_else(|| "—".to_string());
            let status = if m.closed {
                output::red("closed")
            } else {
                output::green("active")
            };
            vec![
                output::truncate(&m.question, 50),
                yes,
                format_volume(&m.volume),
                format_date(&m.end_date),
                status,
            ]
        })
        .collect();

    output::table(&rows, Some(&["Market", "YES", "Volume", "Ends", "Status"]));
    Ok(())
}

async fn orderbook(token_id: &str, size: Option<f64>, ctx: &Ctx) -> Result<()> {
    let client = ctx.client()?;
    let size = size.map(|s| s.to_string()).unwrap_or_default();
    let data: OrderbookResponse = client
        .get("/api/orderbook", &[("tokenId", token_id), ("size", &size)])
        .await?;

    if ctx.json {
        output::json(&serde_json::json!({
            "book": data.book,
            "spread": data.spread,
            "askDepth": data.ask_depth,
            "slippage": data.slippage,
        }));
        return Ok(());
    }

    output::heading("Orderbook");

    match &data.spread {
        Some(spread) => output::table(
            &[
                vec!["Best Bid".into(), format!("{:.4}", spread.bid)],
                vec!["Best Ask".into(), format!("{:.4}", spread.ask)],
                vec!["Spread".into(), output::percent(spread.spread)],
                vec!["Ask Depth".into(), output::currency(data.ask_depth)],
            ],
            None,
        ),
        None => output::warn("No spread data available (empty orderbook)"),
    }

    if let Some(slippage) = &data.slippage {
        println!();
        output::table(
            &[
                vec!["Avg Fill Price".into(), format!("{:.4}", slippage.avg_price)],
                vec!["Worst Price".into(), format!("{:.4}", slippage.worst_price)],
                vec!["Slippage".into(), output::percent(slippage.slippage)],
                vec![
                    "Fillable Size".into(),
                    output::currency(slippage.fillable_size),
                ],
            ],
            None,
        );
    }

    if !data.book.asks.is_empty() {
        println!("\n{}", output::dim("  Top 5 asks:"));
        let rows: Vec<Vec<String>> = data
            .book
            .asks
            .iter()
            .take(5)
            .map(|l| vec![l.price.clone(), l.size.clone()])
            .collect();
        output::table(&rows, Some(&["Price", "Size"]));
    }

    if !data.book.bids.is_empty() {
        println!("\n{}", output::dim("  Top 5 bids:"));
        let rows: Vec<Vec<String>> = data
            .book
            .bids
            .iter()
            .take(5)
            .map(|l| vec![l.price.clone(), l.size.clone()])
            .collect();
        output::table(&rows, Some(&["Price", "Size"]));
    }

    Ok(())
}

fn format_volume(volume: &str) -> String {
    let Ok(n) = volume.parse::<f64>() else {
        return volume.to_string();
    };
    if n >= 1_000_000.0 {
        format!("${:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("${:.1}K", n / 1_000.0)
    } else {
        format!("${n:.0}")
    }
}

fn format_date(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => "—".to_string(),
    }
}
