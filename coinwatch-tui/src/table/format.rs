use rust_decimal::{Decimal, RoundingStrategy};

/// Horizontal alignment of a cell within its column.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

/// Pad `text` to `width` characters, then truncate it to exactly `width` characters.
pub fn fit(text: &str, width: usize, align: Align) -> String {
    let padded = match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    };
    padded.chars().take(width).collect()
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub fn rank(rank: Option<u32>) -> String {
    rank.map_or_else(|| "-".to_string(), |rank| rank.to_string())
}

/// Price in BTC, 9 decimals.
pub fn btc_price(price: Decimal) -> String {
    format!("{:.9}", round(price, 9))
}

/// Fiat price, 2 decimals with a leading `$`.
pub fn fiat_price(price: Decimal) -> String {
    format!("${:.2}", round(price, 2))
}

pub fn percent(change: Decimal) -> String {
    format!("{:.2}%", round(change, 2))
}

/// Market capitalisation, whole dollars with thousands separators.
pub fn market_cap(cap: Decimal) -> String {
    let whole = round(cap, 0).trunc();
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&whole.abs().to_string()))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
