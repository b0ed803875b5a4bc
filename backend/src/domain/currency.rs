//! Currency display helpers.

/// Format `amount` with two decimals and Indian digit grouping
/// (`₹1,23,456.50`). Negative amounts get a leading `-`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = format!("{:.2}", amount.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let sign = if amount < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, group_indian(whole), fraction)
}

/// Last three digits form one group, everything before is grouped in pairs
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push(',');
    grouped.push_str(tail);
    grouped
}
