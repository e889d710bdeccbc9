//! Double-entry balancing for vouchers in progress.
//!
//! Pure computation over user-entered lines. Callers (the entry form, the
//! voucher aggregate) recompute on every edit and again at submit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estatebooks_core::AccountId;

use crate::amount::BALANCE_TOLERANCE;
use crate::line::Line;
use crate::voucher_type::{Side, VoucherType};

/// Counter-line the system derives on the primary bank/cash account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLine {
    pub account_id: AccountId,
    pub side: Side,
    pub amount: Decimal,
}

/// Aggregate figures for a voucher in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub voucher_type: VoucherType,
    pub primary_account_id: AccountId,
    pub user_debit: Decimal,
    pub user_credit: Decimal,
    pub system_debit: Decimal,
    pub system_credit: Decimal,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// Absolute difference between total debit and total credit.
    pub balance: Decimal,
    pub is_balanced: bool,
}

impl Totals {
    /// The derived counter-line, if this voucher type has one and it
    /// carries a non-zero amount.
    pub fn system_line(&self) -> Option<SystemLine> {
        let side = self.voucher_type.system_side()?;
        let amount = match side {
            Side::Debit => self.system_debit,
            Side::Credit => self.system_credit,
        };
        if amount.is_zero() {
            return None;
        }
        Some(SystemLine {
            account_id: self.primary_account_id.clone(),
            side,
            amount,
        })
    }
}

/// Whether `line` counts as a user line for a voucher with this primary
/// account.
///
/// Lines targeting the primary account are stale or accidental system
/// lines and are ignored. While the primary account is unset that includes
/// lines with no account yet. Journals have no primary account at all.
pub fn is_user_line(voucher_type: VoucherType, primary_account_id: &AccountId, line: &Line) -> bool {
    voucher_type.is_journal() || line.account_id() != primary_account_id
}

/// Add `amount` to `sum`, saturating at `Decimal::MAX` and raising
/// `overflowed` instead of panicking.
fn accumulate(sum: Decimal, amount: Decimal, overflowed: &mut bool) -> Decimal {
    sum.checked_add(amount).unwrap_or_else(|| {
        *overflowed = true;
        Decimal::MAX
    })
}

/// Compute the system line and totals for a voucher.
///
/// Total over its input: never fails and never panics. Sums that exceed
/// the decimal range saturate and the voucher is reported unbalanced.
pub fn compute_totals(
    voucher_type: VoucherType,
    primary_account_id: &AccountId,
    lines: &[Line],
) -> Totals {
    let mut overflowed = false;
    let mut user_debit = Decimal::ZERO;
    let mut user_credit = Decimal::ZERO;
    for line in lines
        .iter()
        .filter(|line| is_user_line(voucher_type, primary_account_id, line))
    {
        user_debit = accumulate(user_debit, line.debit_amount(), &mut overflowed);
        user_credit = accumulate(user_credit, line.credit_amount(), &mut overflowed);
    }

    let (system_debit, system_credit) = match voucher_type.system_side() {
        Some(Side::Credit) => (Decimal::ZERO, user_debit),
        Some(Side::Debit) => (user_credit, Decimal::ZERO),
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let total_debit = accumulate(user_debit, system_debit, &mut overflowed);
    let total_credit = accumulate(user_credit, system_credit, &mut overflowed);
    // Both totals are non-negative, so the difference stays in range.
    let balance = (total_debit - total_credit).abs();

    let is_balanced = if overflowed {
        tracing::warn!(voucher_type = voucher_type.as_str(), "voucher totals overflowed");
        false
    } else if voucher_type.is_journal() {
        user_debit == user_credit
    } else {
        balance < BALANCE_TOLERANCE
    };

    tracing::debug!(
        voucher_type = voucher_type.as_str(),
        %user_debit,
        %user_credit,
        %balance,
        is_balanced,
        "computed voucher totals"
    );

    Totals {
        voucher_type,
        primary_account_id: if voucher_type.is_journal() {
            AccountId::unset()
        } else {
            primary_account_id.clone()
        },
        user_debit,
        user_credit,
        system_debit,
        system_credit,
        total_debit,
        total_credit,
        balance,
        is_balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn acct(id: &str) -> AccountId {
        AccountId::new(id)
    }

    #[test]
    fn bank_payment_derives_matching_credit() {
        let lines = vec![Line::debit("EXP1", dec!(500))];
        let t = compute_totals(VoucherType::BankPayment, &acct("BANK1"), &lines);

        assert_eq!(t.user_debit, dec!(500));
        assert_eq!(t.system_credit, dec!(500));
        assert_eq!(t.system_debit, Decimal::ZERO);
        assert_eq!(t.total_debit, dec!(500));
        assert_eq!(t.total_credit, dec!(500));
        assert!(t.is_balanced);
        assert_eq!(
            t.system_line(),
            Some(SystemLine {
                account_id: acct("BANK1"),
                side: Side::Credit,
                amount: dec!(500),
            })
        );
    }

    #[test]
    fn cash_receipt_derives_matching_debit() {
        let lines = vec![Line::credit("REV1", dec!(1000))];
        let t = compute_totals(VoucherType::CashReceipt, &acct("CASH1"), &lines);

        assert_eq!(t.user_credit, dec!(1000));
        assert_eq!(t.system_debit, dec!(1000));
        assert_eq!(t.system_credit, Decimal::ZERO);
        assert!(t.is_balanced);
    }

    #[test]
    fn manual_credit_in_payment_unbalances_totals() {
        let lines = vec![
            Line::debit("EXP1", dec!(500)),
            Line::credit("EXP2", dec!(100)),
        ];
        let t = compute_totals(VoucherType::BankPayment, &acct("BANK1"), &lines);

        assert_eq!(t.total_debit, dec!(500));
        assert_eq!(t.total_credit, dec!(600));
        assert_eq!(t.balance, dec!(100));
        assert!(!t.is_balanced);
    }

    #[test]
    fn unbalanced_journal_reports_difference() {
        let lines = vec![Line::debit("A", dec!(300)), Line::credit("B", dec!(250))];
        let t = compute_totals(VoucherType::Journal, &AccountId::unset(), &lines);

        assert!(!t.is_balanced);
        assert_eq!(t.balance, dec!(50));
        assert_eq!(t.system_line(), None);
    }

    #[test]
    fn journal_requires_exact_equality() {
        let lines = vec![Line::debit("A", dec!(300.004)), Line::credit("B", dec!(300))];
        let t = compute_totals(VoucherType::Journal, &AccountId::unset(), &lines);
        assert!(t.balance < BALANCE_TOLERANCE);
        assert!(!t.is_balanced);
    }

    #[test]
    fn lines_on_primary_account_are_ignored() {
        let lines = vec![
            Line::debit("EXP1", dec!(200)),
            Line::credit("BANK1", dec!(200)),
        ];
        let t = compute_totals(VoucherType::BankPayment, &acct("BANK1"), &lines);
        assert_eq!(t.user_debit, dec!(200));
        assert_eq!(t.user_credit, Decimal::ZERO);
        assert!(t.is_balanced);
    }

    #[test]
    fn journal_ignores_primary_account() {
        let lines = vec![Line::debit("BANK1", dec!(80)), Line::credit("B", dec!(80))];
        let t = compute_totals(VoucherType::Journal, &acct("BANK1"), &lines);
        assert_eq!(t.user_debit, dec!(80));
        assert!(t.is_balanced);
        assert!(t.primary_account_id.is_unset());
    }

    #[test]
    fn unset_primary_excludes_lines_without_an_account() {
        let mut unassigned = Line::blank();
        unassigned.set_debit(dec!(10));
        let lines = vec![unassigned, Line::debit("EXP1", dec!(4))];
        let t = compute_totals(VoucherType::BankPayment, &AccountId::unset(), &lines);
        assert_eq!(t.user_debit, dec!(4));
        assert_eq!(t.system_credit, dec!(4));
    }

    #[test]
    fn journal_with_unset_primary_counts_unassigned_lines() {
        let mut unassigned = Line::blank();
        unassigned.set_debit(dec!(10));
        let t = compute_totals(VoucherType::Journal, &AccountId::unset(), &[unassigned]);
        assert_eq!(t.user_debit, dec!(10));
    }

    #[test]
    fn sums_past_decimal_range_saturate_and_stay_unbalanced() {
        let mut lines = vec![Line::blank(), Line::blank()];
        for (i, line) in lines.iter_mut().enumerate() {
            line.set_account(format!("A{i}"));
            line.set_debit_input("79228162514264337593543950335");
        }
        let t = compute_totals(VoucherType::Journal, &AccountId::unset(), &lines);
        assert_eq!(t.user_debit, Decimal::MAX);
        assert!(!t.is_balanced);

        let t = compute_totals(VoucherType::BankPayment, &acct("BANK1"), &lines);
        assert_eq!(t.total_debit, Decimal::MAX);
        assert_eq!(t.total_credit, Decimal::MAX);
        assert!(!t.is_balanced);
    }

    #[test]
    fn empty_voucher_is_trivially_balanced() {
        let t = compute_totals(VoucherType::BankReceipt, &acct("BANK1"), &[]);
        assert_eq!(t.balance, Decimal::ZERO);
        assert!(t.is_balanced);
        assert_eq!(t.system_line(), None);
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    fn account() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("EXP1".to_string()),
            Just("EXP2".to_string()),
            Just("REV1".to_string()),
            Just("BANK1".to_string()),
        ]
    }

    fn line() -> impl Strategy<Value = Line> {
        (account(), amount(), any::<bool>()).prop_map(|(acct, amt, is_debit)| {
            if is_debit {
                Line::debit(acct, amt)
            } else {
                Line::credit(acct, amt)
            }
        })
    }

    fn voucher_type() -> impl Strategy<Value = VoucherType> {
        prop::sample::select(VoucherType::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn payment_system_credit_equals_user_debit(
            lines in prop::collection::vec(line(), 0..12),
            cash in any::<bool>(),
        ) {
            let t = if cash { VoucherType::CashPayment } else { VoucherType::BankPayment };
            let totals = compute_totals(t, &acct("BANK1"), &lines);
            prop_assert_eq!(totals.system_credit, totals.user_debit);
            prop_assert_eq!(totals.system_debit, Decimal::ZERO);
        }

        #[test]
        fn receipt_system_debit_equals_user_credit(
            lines in prop::collection::vec(line(), 0..12),
            cash in any::<bool>(),
        ) {
            let t = if cash { VoucherType::CashReceipt } else { VoucherType::BankReceipt };
            let totals = compute_totals(t, &acct("BANK1"), &lines);
            prop_assert_eq!(totals.system_debit, totals.user_credit);
            prop_assert_eq!(totals.system_credit, Decimal::ZERO);
        }

        #[test]
        fn recomputing_is_idempotent(
            t in voucher_type(),
            lines in prop::collection::vec(line(), 0..12),
        ) {
            let first = compute_totals(t, &acct("BANK1"), &lines);
            let second = compute_totals(t, &acct("BANK1"), &lines);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn primary_account_lines_contribute_nothing(
            t in voucher_type().prop_filter("needs a primary account", |t| !t.is_journal()),
            lines in prop::collection::vec(line(), 0..12),
        ) {
            let without: Vec<Line> = lines
                .iter()
                .filter(|l| l.account_id().as_str() != "BANK1")
                .cloned()
                .collect();
            let with_all = compute_totals(t, &acct("BANK1"), &lines);
            let filtered = compute_totals(t, &acct("BANK1"), &without);
            prop_assert_eq!(with_all.user_debit, filtered.user_debit);
            prop_assert_eq!(with_all.user_credit, filtered.user_credit);
        }

        #[test]
        fn journal_balanced_iff_sides_equal(lines in prop::collection::vec(line(), 0..12)) {
            let totals = compute_totals(VoucherType::Journal, &AccountId::unset(), &lines);
            prop_assert_eq!(totals.is_balanced, totals.user_debit == totals.user_credit);
            prop_assert_eq!(totals.system_debit, Decimal::ZERO);
            prop_assert_eq!(totals.system_credit, Decimal::ZERO);
        }

        #[test]
        fn single_sided_payment_always_balances(
            amounts in prop::collection::vec(amount(), 1..12),
        ) {
            let lines: Vec<Line> = amounts.into_iter().map(|a| Line::debit("EXP1", a)).collect();
            let totals = compute_totals(VoucherType::BankPayment, &acct("BANK1"), &lines);
            prop_assert!(totals.is_balanced);
            prop_assert_eq!(totals.total_debit, totals.total_credit);
        }
    }
}
