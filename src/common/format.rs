// src/common/format.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}

/// `₺1.234,56`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = rounded.abs().to_string();

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text.clone(), String::new()),
    };
    let frac = format!("{:0<2}", frac_part);

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}₺{grouped},{frac}")
}

/// Duração em minutos no formato curto usado nos relatórios (`2 sa 5 dk`).
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{m} dk"),
        (h, 0) => format!("{h} sa"),
        (h, m) => format!("{h} sa {m} dk"),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.2} KB", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.2} MB", b / (KB * KB))
    } else {
        format!("{:.2} GB", b / (KB * KB * KB))
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn bytes_to_mb(bytes: i64) -> f64 {
    round2(bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn currency_uses_turkish_grouping() {
        assert_eq!(format_currency(Decimal::from_str("1234.56").unwrap()), "₺1.234,56");
        assert_eq!(format_currency(Decimal::from_str("1234567").unwrap()), "₺1.234.567,00");
        assert_eq!(format_currency(Decimal::from_str("0.5").unwrap()), "₺0,50");
        assert_eq!(format_currency(Decimal::from_str("-999.999").unwrap()), "-₺1.000,00");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(45), "45 dk");
        assert_eq!(format_duration(120), "2 sa");
        assert_eq!(format_duration(125), "2 sa 5 dk");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(d), "07.03.2024");
    }

    #[test]
    fn megabytes_are_rounded_to_two_decimals() {
        assert_eq!(bytes_to_mb(1_572_864), 1.5);
        assert_eq!(bytes_to_mb(1_000_000), 0.95);
    }
}
