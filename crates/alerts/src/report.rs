//! Daily report message template.

use rates_core::RateSnapshot;

/// Telegram parse mode matching the emphasis syntax used below.
pub const PARSE_MODE: &str = "Markdown";

/// Format the daily report. Values are embedded as-is, sentinels included.
pub fn format_report(snapshot: &RateSnapshot) -> String {
    format!(
        "☀️ *Daily rates digest*\n\n\
         🇷🇺 *US dollar to ruble (USD/RUB):* {} ₽\n\n\
         📈 *Crypto:*\n\
         💰 *Bitcoin (BTC/USD):* ${}\n\
         💎 *Ethereum (ETH/USD):* ${}",
        snapshot.usd_rub, snapshot.btc_usd, snapshot.eth_usd
    )
}
