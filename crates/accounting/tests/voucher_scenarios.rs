use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use estatebooks_accounting::posting::net;
use estatebooks_accounting::{
    Line, Side, TransitionVoucher, Voucher, VoucherAction, VoucherCommand, VoucherDraft,
    VoucherEvent, VoucherId, VoucherIssue, VoucherStatus, VoucherType, compute_totals,
    validate_for_submit,
};
use estatebooks_core::{AccountId, Aggregate, AggregateId, TenantId, UserId};
use estatebooks_events::Event;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 19).unwrap()
}

#[test]
fn bank_payment_single_expense_line() {
    let lines = vec![Line::debit("EXP1", dec!(500))];
    let t = compute_totals(VoucherType::BankPayment, &AccountId::new("BANK1"), &lines);

    assert_eq!(t.user_debit, dec!(500));
    assert_eq!(t.system_credit, dec!(500));
    assert_eq!(t.total_debit, dec!(500));
    assert_eq!(t.total_credit, dec!(500));
    assert!(t.is_balanced);
}

#[test]
fn bank_payment_with_manual_credit_is_rejected() {
    let lines = vec![
        Line::debit("EXP1", dec!(500)),
        Line::credit("EXP2", dec!(100)),
    ];
    let report =
        validate_for_submit(VoucherType::BankPayment, &AccountId::new("BANK1"), &lines).unwrap_err();

    assert!(report.issues.iter().any(|i| matches!(
        i,
        VoucherIssue::ManualEntryNotAllowed { side: Side::Credit, .. }
    )));
}

#[test]
fn journal_off_by_fifty() {
    let lines = vec![Line::debit("A", dec!(300)), Line::credit("B", dec!(250))];
    let t = compute_totals(VoucherType::Journal, &AccountId::unset(), &lines);

    assert!(!t.is_balanced);
    assert_eq!(t.balance, dec!(50));
}

#[test]
fn cash_receipt_single_revenue_line() {
    let lines = vec![Line::credit("REV1", dec!(1000))];
    let t = compute_totals(VoucherType::CashReceipt, &AccountId::new("CASH1"), &lines);

    assert_eq!(t.user_credit, dec!(1000));
    assert_eq!(t.system_debit, dec!(1000));
    assert!(t.is_balanced);
}

#[test]
fn oversized_amounts_do_not_panic() {
    let mut lines = vec![Line::blank(), Line::blank()];
    for (i, line) in lines.iter_mut().enumerate() {
        line.set_account(format!("EXP{i}"));
        line.set_debit_input("79228162514264337593543950335");
    }
    let t = compute_totals(VoucherType::CashPayment, &AccountId::new("CASH1"), &lines);
    assert_eq!(t.user_debit, Decimal::MAX);
    assert!(!t.is_balanced);

    let report =
        validate_for_submit(VoucherType::CashPayment, &AccountId::new("CASH1"), &lines).unwrap_err();
    assert!(report.has_imbalance());
}

#[test]
fn rent_receipt_from_entry_form_to_reversal() {
    let tenant_id = TenantId::new();
    let voucher_id = VoucherId::new(AggregateId::new());
    let clerk = UserId::new();

    let mut draft = VoucherDraft::new(VoucherType::BankReceipt, date());
    draft.set_primary_account("BANK1");
    draft.narration = Some("November rent, tower A".to_string());
    draft.set_line_account(0, "RENT-INCOME").unwrap();
    draft.set_line_credit(0, "45000").unwrap();
    let idx = draft.add_line();
    draft.set_line_account(idx, "SERVICE-CHARGES").unwrap();
    draft.set_line_credit(idx, "5000.00").unwrap();

    let mut voucher = Voucher::empty(voucher_id);
    let create = draft
        .into_create_command(tenant_id, voucher_id, clerk, Utc::now())
        .unwrap();
    voucher
        .execute(&VoucherCommand::CreateVoucher(create))
        .unwrap();

    let mut posted = None;
    for action in [VoucherAction::Submit, VoucherAction::Approve, VoucherAction::Post] {
        let events = voucher
            .execute(&VoucherCommand::TransitionVoucher(TransitionVoucher {
                tenant_id,
                voucher_id,
                action,
                actor: clerk,
                reason: None,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        if let VoucherEvent::VoucherPosted(e) = &events[0] {
            posted = Some(e.posting_lines.clone());
        }
    }

    let posted = posted.expect("post emits posting lines");
    assert_eq!(posted.len(), 3);
    let system = posted.iter().find(|l| l.system).unwrap();
    assert_eq!(system.account_id, AccountId::new("BANK1"));
    assert_eq!(system.side, Side::Debit);
    assert_eq!(system.amount, dec!(50000));
    assert_eq!(system.description, "November rent, tower A");
    assert_eq!(net(&posted), Decimal::ZERO);

    let events = voucher
        .execute(&VoucherCommand::TransitionVoucher(TransitionVoucher {
            tenant_id,
            voucher_id,
            action: VoucherAction::Reverse,
            actor: clerk,
            reason: Some("posted to wrong bank".to_string()),
            occurred_at: Utc::now(),
        }))
        .unwrap();
    assert_eq!(events[0].event_type(), "accounting.voucher.reversed");
    match &events[0] {
        VoucherEvent::VoucherReversed(e) => {
            let mut combined = posted.clone();
            combined.extend(e.reversal_lines.iter().cloned());
            assert_eq!(net(&e.reversal_lines), Decimal::ZERO);
            assert_eq!(combined.len(), 6);
        }
        _ => panic!("Expected VoucherReversed"),
    }
    assert_eq!(voucher.status(), VoucherStatus::Reversed);
    assert!(voucher.available_actions().is_empty());
}

#[test]
fn voucher_events_round_trip_through_json() {
    let tenant_id = TenantId::new();
    let voucher_id = VoucherId::new(AggregateId::new());
    let mut draft = VoucherDraft::new(VoucherType::CashPayment, date());
    draft.set_primary_account("CASH1");
    draft.set_line_account(0, "UTIL").unwrap();
    draft.set_line_debit(0, "1234.56").unwrap();

    let mut voucher = Voucher::empty(voucher_id);
    let create = draft
        .into_create_command(tenant_id, voucher_id, UserId::new(), Utc::now())
        .unwrap();
    let events = voucher
        .execute(&VoucherCommand::CreateVoucher(create))
        .unwrap();

    let json = serde_json::to_string(&events).unwrap();
    let decoded: Vec<VoucherEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, events);

    let mut rebuilt = Voucher::empty(voucher_id);
    assert!(!rebuilt.is_created());
    rebuilt.replay(&decoded);
    assert!(rebuilt.is_created());
    assert_eq!(rebuilt.id_typed(), voucher_id);
    assert_eq!(rebuilt.tenant_id(), Some(tenant_id));
    assert_eq!(rebuilt.totals(), voucher.totals());
}
