use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MarketOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const DEFAULT_PAIR: &str = "USD/JPY";
pub const DEFAULT_TIMEFRAME: &str = "1H";

pub const CURRENCY_PAIRS: &[MarketOption] = &[
    MarketOption { value: "USD/JPY", label: "USD/JPY (Dollar/Yen)" },
    MarketOption { value: "EUR/USD", label: "EUR/USD (Euro/Dollar)" },
    MarketOption { value: "GBP/USD", label: "GBP/USD (Cable)" },
    MarketOption { value: "EUR/JPY", label: "EUR/JPY (Euro/Yen)" },
    MarketOption { value: "GBP/JPY", label: "GBP/JPY (Pound/Yen)" },
    MarketOption { value: "AUD/USD", label: "AUD/USD (Aussie)" },
    MarketOption { value: "AUD/JPY", label: "AUD/JPY (Aussie/Yen)" },
    MarketOption { value: "NZD/USD", label: "NZD/USD (Kiwi)" },
    MarketOption { value: "USD/CHF", label: "USD/CHF (Swissie)" },
    MarketOption { value: "USD/CAD", label: "USD/CAD (Loonie)" },
    MarketOption { value: "EUR/GBP", label: "EUR/GBP (Euro/Pound)" },
    MarketOption { value: "EUR/AUD", label: "EUR/AUD (Euro/Aussie)" },
];

pub const TIMEFRAMES: &[MarketOption] = &[
    MarketOption { value: "1M", label: "1 minute" },
    MarketOption { value: "5M", label: "5 minutes" },
    MarketOption { value: "15M", label: "15 minutes" },
    MarketOption { value: "30M", label: "30 minutes" },
    MarketOption { value: "1H", label: "1 hour" },
    MarketOption { value: "4H", label: "4 hours" },
    MarketOption { value: "1D", label: "Daily" },
    MarketOption { value: "1W", label: "Weekly" },
    MarketOption { value: "1MO", label: "Monthly" },
];

/// Look up a currency pair, case-insensitive. Returns the canonical entry.
pub fn find_pair(value: &str) -> Option<&'static MarketOption> {
    CURRENCY_PAIRS.iter().find(|p| p.value.eq_ignore_ascii_case(value.trim()))
}

/// Look up a timeframe, case-insensitive. Returns the canonical entry.
pub fn find_timeframe(value: &str) -> Option<&'static MarketOption> {
    TIMEFRAMES.iter().find(|t| t.value.eq_ignore_ascii_case(value.trim()))
}

/// Split "EUR/USD" into ("EUR", "USD"). A token without '/' has an empty quote.
pub fn split_pair(pair: &str) -> (&str, &str) {
    match pair.split_once('/') {
        Some((base, quote)) => (base, quote),
        None => (pair, ""),
    }
}
