//! Plain-text rendering for terminal output

use std::fmt::Write;

use blockchair_core::TransactionSummary;

use super::card::ChainCard;
use super::format::{PLACEHOLDER, format_number, format_usd};

/// Render cards as aligned text blocks
pub fn render_cards(cards: &[ChainCard]) -> String {
    if cards.is_empty() {
        return "No chain statistics available.\n".to_string();
    }

    let mut out = String::new();
    for card in cards {
        let symbol = if card.meta.symbol.is_empty() {
            String::new()
        } else {
            format!(" ({})", card.meta.symbol)
        };
        let _ = writeln!(out, "{} {}{}", card.meta.icon, card.meta.name, symbol);
        let _ = writeln!(out, "   Price:        {} ({} 24h)", card.price, card.price_change_24h);
        let _ = writeln!(out, "   Market cap:   {}", card.market_cap);
        match &card.block_age {
            Some(age) => {
                let _ = writeln!(out, "   Latest block: {} · {age}", card.latest_block);
            }
            None => {
                let _ = writeln!(out, "   Latest block: {}", card.latest_block);
            }
        }
        let _ = writeln!(out, "   Mempool:      {}", card.mempool);
        let _ = writeln!(out, "   Average fee:  {}", card.average_fee);
        out.push('\n');
    }
    out
}

/// Render recent transactions, one per line
pub fn render_transactions(transactions: &[TransactionSummary]) -> String {
    if transactions.is_empty() {
        return "No recent transactions.\n".to_string();
    }

    let mut out = String::new();
    for tx in transactions {
        let block = match tx.block_id {
            Some(id) if id >= 0 => format_number(u64::try_from(id).ok()),
            Some(_) => "mempool".to_string(),
            None => PLACEHOLDER.to_string(),
        };
        let _ = writeln!(
            out,
            "{}  block {}  {}  out {}  fee {}",
            tx.hash.as_deref().unwrap_or(PLACEHOLDER),
            block,
            tx.time.as_deref().unwrap_or(PLACEHOLDER),
            format_usd(tx.output_total_usd),
            format_usd(tx.fee_usd),
        );
    }
    out
}
