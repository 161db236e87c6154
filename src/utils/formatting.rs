//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Money with thousands separators and two decimals: `1,234.50`.
pub fn money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative && cents > 0 {
        format!("-{}.{:02}", grouped, frac)
    } else {
        format!("{}.{:02}", grouped, frac)
    }
}

/// Money prefixed by the configured currency symbol.
pub fn money_with(symbol: &str, value: f64) -> String {
    let m = money(value);
    match m.strip_prefix('-') {
        Some(rest) => format!("-{symbol}{rest}"),
        None => format!("{symbol}{m}"),
    }
}

/// Optional numbers print as an empty cell.
pub fn opt_number(v: Option<f64>) -> String {
    match v {
        Some(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}

/// Shorten a value for one table cell.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
