use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1,234.50`
    Prefix,
    /// `1.234,50 €`
    Suffix,
}

/// Locale-dependent formatting for one render, plus the injected "today".
///
/// Only text formatting reads this; layout never depends on it except through
/// the widths of the strings it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattingContext {
    pub locale: String,
    pub currency_symbol: String,
    pub symbol_position: SymbolPosition,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// chrono `strftime` pattern.
    pub date_format: String,
    pub today: NaiveDate,
}

pub const SUPPORTED_LOCALES: [&str; 5] = ["en-US", "en-GB", "de-DE", "fr-FR", "pt-BR"];

impl FormattingContext {
    /// Preset for a BCP 47 style tag, matched case-insensitively.
    pub fn for_locale(tag: &str, today: NaiveDate) -> Option<Self> {
        let (locale, symbol, position, decimal, grouping, date) =
            match tag.to_ascii_lowercase().replace('_', "-").as_str() {
                "en-us" => ("en-US", "$", SymbolPosition::Prefix, '.', ',', "%b %d, %Y"),
                "en-gb" => ("en-GB", "\u{a3}", SymbolPosition::Prefix, '.', ',', "%d %b %Y"),
                "de-de" => ("de-DE", "\u{20ac}", SymbolPosition::Suffix, ',', '.', "%d.%m.%Y"),
                "fr-fr" => ("fr-FR", "\u{20ac}", SymbolPosition::Suffix, ',', ' ', "%d/%m/%Y"),
                "pt-br" => ("pt-BR", "R$", SymbolPosition::Prefix, ',', '.', "%d/%m/%Y"),
                _ => return None,
            };
        Some(Self {
            locale: locale.to_string(),
            currency_symbol: symbol.to_string(),
            symbol_position: position,
            decimal_separator: decimal,
            grouping_separator: grouping,
            date_format: date.to_string(),
            today,
        })
    }

    pub fn en_us(today: NaiveDate) -> Self {
        Self {
            locale: "en-US".to_string(),
            currency_symbol: "$".to_string(),
            symbol_position: SymbolPosition::Prefix,
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: "%b %d, %Y".to_string(),
            today,
        }
    }

    /// Two decimal places, half away from zero, grouped by thousands.
    pub fn format_currency(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let plain = format!("{:.2}", rounded.abs());
        let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        let number = format!(
            "{}{}{}",
            group_digits(whole, self.grouping_separator),
            self.decimal_separator,
            frac
        );
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        match self.symbol_position {
            SymbolPosition::Prefix => format!("{sign}{}{number}", self.currency_symbol),
            SymbolPosition::Suffix => format!("{sign}{number} {}", self.currency_symbol),
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// Quantities are plain integers, never grouped.
    pub fn format_quantity(&self, quantity: u32) -> String {
        quantity.to_string()
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn formats_us_currency() {
        let ctx = FormattingContext::en_us(today());
        assert_eq!(ctx.format_currency(Decimal::new(21250, 2)), "$212.50");
        assert_eq!(ctx.format_currency(Decimal::new(123456789, 2)), "$1,234,567.89");
        assert_eq!(ctx.format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(ctx.format_currency(Decimal::new(-5, 0)), "-$5.00");
        assert_eq!(ctx.format_currency(Decimal::new(1005, 3)), "$1.01");
    }

    #[test]
    fn formats_suffix_locales() {
        let de = FormattingContext::for_locale("de-DE", today()).unwrap();
        assert_eq!(de.format_currency(Decimal::new(123450, 2)), "1.234,50 \u{20ac}");
        let fr = FormattingContext::for_locale("fr_fr", today()).unwrap();
        assert_eq!(fr.format_currency(Decimal::new(123450, 2)), "1 234,50 \u{20ac}");
    }

    #[test]
    fn unknown_locale_has_no_preset() {
        assert!(FormattingContext::for_locale("xx-YY", today()).is_none());
    }

    #[test]
    fn formats_dates_with_locale_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(FormattingContext::en_us(today()).format_date(date), "Mar 07, 2026");
        let de = FormattingContext::for_locale("de-DE", today()).unwrap();
        assert_eq!(de.format_date(date), "07.03.2026");
    }

    #[test]
    fn quantity_has_no_separators() {
        assert_eq!(FormattingContext::en_us(today()).format_quantity(12345), "12345");
    }
}
