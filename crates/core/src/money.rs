//! Currency unit.
//!
//! All amounts are integer paise (smallest rupee unit). Arithmetic on `i64`
//! keeps the ledger exact; display formatting is the caller's concern and only
//! the report rendering uses [`display_rupees`].

/// Amount in paise (1/100 rupee).
pub type Paise = i64;

/// Render an amount as rupees with two decimal places, e.g. `"1234.50"`.
///
/// Negative amounts keep a single leading minus sign.
pub fn display_rupees(amount: Paise) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_and_fractional_rupees() {
        assert_eq!(display_rupees(0), "0.00");
        assert_eq!(display_rupees(5), "0.05");
        assert_eq!(display_rupees(123_450), "1234.50");
    }

    #[test]
    fn negative_amounts_carry_one_sign() {
        assert_eq!(display_rupees(-7), "-0.07");
        assert_eq!(display_rupees(-123_400), "-1234.00");
    }
}
