use core::str::FromStr;

use serde::{Deserialize, Serialize};

use estatebooks_core::DomainError;

/// Debit or credit side of a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Debit => "debit",
            Side::Credit => "credit",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument the primary account of a bank/cash voucher represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Bank,
    Cash,
}

impl core::fmt::Display for Instrument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Instrument::Bank => "bank",
            Instrument::Cash => "cash",
        })
    }
}

/// Kind of voucher being entered.
///
/// Payment and receipt vouchers carry a primary bank/cash account that the
/// system balances automatically; journal vouchers are balanced by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    BankPayment,
    BankReceipt,
    CashPayment,
    CashReceipt,
    Journal,
}

impl VoucherType {
    pub const ALL: [VoucherType; 5] = [
        VoucherType::BankPayment,
        VoucherType::BankReceipt,
        VoucherType::CashPayment,
        VoucherType::CashReceipt,
        VoucherType::Journal,
    ];

    pub fn is_payment(self) -> bool {
        matches!(self, VoucherType::BankPayment | VoucherType::CashPayment)
    }

    pub fn is_receipt(self) -> bool {
        matches!(self, VoucherType::BankReceipt | VoucherType::CashReceipt)
    }

    pub fn is_journal(self) -> bool {
        matches!(self, VoucherType::Journal)
    }

    /// Instrument behind the primary account; `None` for journals.
    pub fn instrument(self) -> Option<Instrument> {
        match self {
            VoucherType::BankPayment | VoucherType::BankReceipt => Some(Instrument::Bank),
            VoucherType::CashPayment | VoucherType::CashReceipt => Some(Instrument::Cash),
            VoucherType::Journal => None,
        }
    }

    /// Side the user is allowed to enter on; `None` means both (journal).
    pub fn entry_side(self) -> Option<Side> {
        if self.is_payment() {
            Some(Side::Debit)
        } else if self.is_receipt() {
            Some(Side::Credit)
        } else {
            None
        }
    }

    /// Side the system line takes on the primary account.
    pub fn system_side(self) -> Option<Side> {
        self.entry_side().map(Side::opposite)
    }

    /// Short code used in voucher references.
    pub fn code(self) -> &'static str {
        match self {
            VoucherType::BankPayment => "BPV",
            VoucherType::BankReceipt => "BRV",
            VoucherType::CashPayment => "CPV",
            VoucherType::CashReceipt => "CRV",
            VoucherType::Journal => "JV",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoucherType::BankPayment => "bank_payment",
            VoucherType::BankReceipt => "bank_receipt",
            VoucherType::CashPayment => "cash_payment",
            VoucherType::CashReceipt => "cash_receipt",
            VoucherType::Journal => "journal",
        }
    }

    /// Human label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            VoucherType::BankPayment => "bank payment",
            VoucherType::BankReceipt => "bank receipt",
            VoucherType::CashPayment => "cash payment",
            VoucherType::CashReceipt => "cash receipt",
            VoucherType::Journal => "journal",
        }
    }
}

impl core::fmt::Display for VoucherType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VoucherType {
    type Err = DomainError;

    /// Accepts the snake_case name, the kebab-case name or the short code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        VoucherType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted || t.code().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| DomainError::validation(format!("unknown voucher type: {s}")))
    }
}
