//! Price extraction from assistant replies and rouble amount formatting.

use crate::types::PaymentProposal;
use once_cell::sync::Lazy;
use regex::Regex;

/// Description used when no service was selected for the conversation.
pub const DEFAULT_DESCRIPTION: &str = "Юридическая услуга";

/// Digit groups separated by a single (regular, no-break or narrow no-break) space,
/// optional whitespace, then the rouble sign.
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+(?:[ \u{00A0}\u{202F}][0-9]+)*\s*₽").expect("price pattern is valid")
});

/// Find the first rouble price in `reply` and turn it into a payment proposal.
///
/// A match directly preceded by `,` or `.` belongs to a decimal or
/// comma-grouped number and disqualifies the whole reply.
pub fn extract_price(reply: &str, service: Option<&str>) -> Option<PaymentProposal> {
    let m = PRICE_RE.find(reply)?;
    if matches!(reply[..m.start()].chars().next_back(), Some(',') | Some('.')) {
        return None;
    }

    let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
    let amount = digits.parse::<u64>().ok().filter(|a| *a > 0)?;

    let description = service
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string();

    Some(PaymentProposal {
        amount,
        description,
    })
}

/// Group thousands with spaces: `12450` → `12 450`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Option<u64> {
        extract_price(text, None).map(|p| p.amount)
    }

    #[test]
    fn grouped_amounts_are_parsed() {
        assert_eq!(amount("Стоимость: 5 000 ₽"), Some(5000));
        assert_eq!(amount("Итого 12 450 ₽ за работу"), Some(12450));
        assert_eq!(amount("**Стоимость: 20000₽**"), Some(20000));
        assert_eq!(amount("Цена\u{00A0}—\u{00A0}3\u{00A0}000\u{00A0}₽"), Some(3000));
    }

    #[test]
    fn text_without_rouble_sign_has_no_proposal() {
        assert_eq!(amount("Стоимость будет рассчитана после анализа"), None);
        assert_eq!(amount("Стоимость 5 000 руб."), None);
    }

    #[test]
    fn decimal_and_comma_grouped_numbers_are_not_matched() {
        assert_eq!(amount("Цена 3,500 ₽"), None);
        assert_eq!(amount("Цена 3.500 ₽"), None);
        assert_eq!(amount("Итого 1 200.50 ₽"), None);
    }

    #[test]
    fn only_first_match_is_used() {
        assert_eq!(amount("от 1 000 ₽ до 2 000 ₽"), Some(1000));
        assert_eq!(amount("3,5 ₽ или 7 000 ₽"), None);
    }

    #[test]
    fn zero_and_overflowing_amounts_are_ignored() {
        assert_eq!(amount("0 ₽"), None);
        assert_eq!(amount("99999999999999999999999 ₽"), None);
    }

    #[test]
    fn description_comes_from_service_or_default() {
        let p = extract_price("5 000 ₽", Some("Анализ договора")).unwrap();
        assert_eq!(p.description, "Анализ договора");

        let p = extract_price("5 000 ₽", None).unwrap();
        assert_eq!(p.description, DEFAULT_DESCRIPTION);

        let p = extract_price("5 000 ₽", Some("  ")).unwrap();
        assert_eq!(p.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(5000), "5 000");
        assert_eq!(format_amount(12450), "12 450");
        assert_eq!(format_amount(1234567), "1 234 567");
    }
}
