// src/common/format.rs
// Formatação no padrão brasileiro (pt-BR) e normalização de documentos.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Remove tudo que não for dígito ("123.456.789-01" -> "12345678901").
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// dd/mm/aaaa, ou "-" quando não há data.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// R$ 1.234,56
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

pub fn format_optional_currency(value: Option<Decimal>) -> String {
    value.map(format_currency).unwrap_or_else(|| "-".to_string())
}

/// Texto ou "-" quando vazio.
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Filtro de texto das listas: vazio não filtra, senão "contém" sem
/// diferenciar maiúsculas.
pub fn contains_ci(value: Option<&str>, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => value
            .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

/// Igualdade exata; vazio não filtra.
pub fn equals_if_set(value: &str, wanted: Option<&str>) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => value == wanted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn strips_punctuation_from_documents() {
        assert_eq!(digits_only("123.456.789-01"), "12345678901");
        assert_eq!(digits_only("01310-100"), "01310100");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn formats_dates_in_brazilian_order() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(Some(date)), "07/03/2025");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn formats_currency_with_thousand_groups() {
        assert_eq!(format_currency(Decimal::from_str("1234.5").unwrap()), "R$ 1.234,50");
        assert_eq!(format_currency(Decimal::from_str("1234567.891").unwrap()), "R$ 1.234.567,89");
        assert_eq!(format_currency(Decimal::from_str("0").unwrap()), "R$ 0,00");
        assert_eq!(format_currency(Decimal::from_str("999").unwrap()), "R$ 999,00");
        assert_eq!(format_currency(Decimal::from_str("-50.125").unwrap()), "-R$ 50,13");
    }

    #[test]
    fn dash_for_blank_text() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("   ")), "-");
        assert_eq!(or_dash(Some("Centro")), "Centro");
    }

    #[test]
    fn blank_needles_never_filter() {
        assert!(contains_ci(None, None));
        assert!(contains_ci(None, Some("  ")));
        assert!(contains_ci(Some("Maria Souza"), Some("souza")));
        assert!(!contains_ci(None, Some("souza")));
        assert!(equals_if_set("Ativo", Some("")));
        assert!(equals_if_set("Ativo", Some("Ativo")));
        assert!(!equals_if_set("Ativo", Some("ativo")));
    }
}
