use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use estatebooks_accounting::{Line, VoucherDraft, VoucherType, compute_totals, validate_for_submit};
use estatebooks_core::AccountId;

fn payment_lines(n: usize) -> Vec<Line> {
    (0..n)
        .map(|i| Line::debit(format!("EXP{}", i % 17), Decimal::new(1_000 + i as i64, 2)))
        .collect()
}

fn bench_compute_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_totals");
    let bank = AccountId::new("BANK1");

    for size in [1usize, 10, 100, 1_000] {
        let lines = payment_lines(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| compute_totals(black_box(VoucherType::BankPayment), &bank, black_box(lines)));
        });
    }

    group.finish();
}

fn bench_validate_for_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_for_submit");
    let bank = AccountId::new("BANK1");
    let lines = payment_lines(100);

    group.bench_function("balanced_payment_100_lines", |b| {
        b.iter(|| validate_for_submit(VoucherType::BankPayment, &bank, black_box(&lines)));
    });

    group.finish();
}

/// One keystroke in the entry form: coerce the field, recompute totals.
fn bench_keystroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("draft_keystroke");

    group.bench_function("set_debit_and_recompute", |b| {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
        let mut draft = VoucherDraft::new(VoucherType::CashPayment, date);
        draft.set_primary_account("CASH1");
        for _ in 0..20 {
            draft.push_line(Line::debit("EXP1", Decimal::ONE));
        }
        b.iter(|| {
            draft.set_line_debit(10, black_box("1234.50")).unwrap();
            black_box(draft.totals());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compute_totals, bench_validate_for_submit, bench_keystroke);
criterion_main!(benches);
