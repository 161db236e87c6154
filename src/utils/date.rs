//! Date helpers. Records store dates as `DD-MM-YYYY`; the CLI accepts
//! both that and ISO `YYYY-MM-DD`.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Local, NaiveDate};

pub const STORE_FORMAT: &str = "%d-%m-%Y";
pub const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, STORE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, ISO_FORMAT))
        .ok()
}

/// Like [`parse_date`] but returns a typed error.
pub fn require_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Format a date the way the store keeps it.
pub fn format_date(d: &NaiveDate) -> String {
    d.format(STORE_FORMAT).to_string()
}

/// Normalize any accepted input into the store format.
pub fn normalize(s: &str) -> AppResult<String> {
    require_date(s).map(|d| format_date(&d))
}

/// `true` when `d` is inside `[from, to]` (inclusive on both ends).
pub fn in_range(d: &NaiveDate, from: &NaiveDate, to: &NaiveDate) -> bool {
    d >= from && d <= to
}

/// Optional range filter over a stored date string. Unparseable dates
/// never match a bounded range.
pub fn matches_range(raw: Option<&str>, bounds: Option<(NaiveDate, NaiveDate)>) -> bool {
    match bounds {
        None => true,
        Some((from, to)) => raw
            .and_then(parse_date)
            .map(|d| in_range(&d, &from, &to))
            .unwrap_or(false),
    }
}

pub fn month_name(m: u32) -> &'static str {
    match m {
        1 => "Enero",
        2 => "Febrero",
        3 => "Marzo",
        4 => "Abril",
        5 => "Mayo",
        6 => "Junio",
        7 => "Julio",
        8 => "Agosto",
        9 => "Septiembre",
        10 => "Octubre",
        11 => "Noviembre",
        12 => "Diciembre",
        _ => "",
    }
}

pub fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}

/// Parse a period filter into inclusive bounds.
///
/// Supported:
/// - `YYYY`
/// - `YYYY-MM` / `MM-YYYY`
/// - a single date (`DD-MM-YYYY` or `YYYY-MM-DD`)
/// - `FROM:TO` where both sides use any of the forms above
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = p.split_once(':') {
        let (from, _) = parse_single_period(start_raw.trim())?;
        let (_, to) = parse_single_period(end_raw.trim())?;
        if from > to {
            return Err(AppError::InvalidRange(format!(
                "{} is after {}",
                format_date(&from),
                format_date(&to)
            )));
        }
        return Ok((from, to));
    }
    parse_single_period(p.trim())
}

fn parse_single_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY
    if p.len() == 4
        && let Ok(y) = p.parse::<i32>()
    {
        let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| AppError::InvalidDate(p.into()))?;
        let d2 =
            NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| AppError::InvalidDate(p.into()))?;
        return Ok((d1, d2));
    }

    // YYYY-MM or MM-YYYY
    if p.len() == 7 {
        let (y, m) = if p.as_bytes()[4] == b'-' {
            (p[0..4].parse::<i32>().ok(), p[5..7].parse::<u32>().ok())
        } else {
            (p[3..7].parse::<i32>().ok(), p[0..2].parse::<u32>().ok())
        };

        if let (Some(y), Some(m)) = (y, m) {
            let last = month_last_day(y, m).ok_or_else(|| AppError::InvalidDate(p.into()))?;
            let d1 =
                NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| AppError::InvalidDate(p.into()))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last)
                .ok_or_else(|| AppError::InvalidDate(p.into()))?;
            return Ok((d1, d2));
        }
    }

    Err(AppError::InvalidDate(p.to_string()))
}

/// Human title for a period, used in PDF headers.
pub fn describe_period(bounds: Option<(NaiveDate, NaiveDate)>) -> String {
    match bounds {
        None => "todas las fechas".to_string(),
        Some((from, to)) if from == to => format_date(&from),
        Some((from, to))
            if from.day() == 1
                && from.month() == to.month()
                && from.year() == to.year()
                && Some(to.day()) == month_last_day(to.year(), to.month()) =>
        {
            format!("{} {}", month_name(from.month()), from.year())
        }
        Some((from, to)) => format!("{} a {}", format_date(&from), format_date(&to)),
    }
}
