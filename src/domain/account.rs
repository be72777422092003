use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{common::StoredCode, time_period::TimePeriod};

/// Top-level account classification, persisted in the `Type` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountType {
    Income = 0,
    Expense = 1,
    Asset = 2,
}

impl StoredCode for AccountType {
    const ALL: &'static [Self] = &[Self::Income, Self::Expense, Self::Asset];

    fn code(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
            AccountType::Asset => "Asset",
        };
        f.write_str(label)
    }
}

/// Asset sub-classification, persisted in the `SubType` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetAccountType {
    Cash = 0,
    Credit = 1,
    Savings = 2,
}

impl StoredCode for AssetAccountType {
    const ALL: &'static [Self] = &[Self::Cash, Self::Credit, Self::Savings];

    fn code(self) -> i64 {
        self as i64
    }
}

/// Fields specific to a credit line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditTerms {
    pub credit_line: Decimal,
    pub interest_rate: Decimal,
    /// Owned statement schedule; `None` until one is attached and inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_time_period: Option<TimePeriod>,
}

impl CreditTerms {
    pub fn credit_used(&self, balance: Decimal) -> Decimal {
        self.credit_line - balance
    }
}

/// Fields specific to an interest-bearing savings account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsTerms {
    pub interest_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_time_period: Option<TimePeriod>,
}

/// Variant payload of an asset account. The sub-type tag is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AssetAccountKind {
    Cash,
    Credit(CreditTerms),
    Savings(SavingsTerms),
}

/// An account that holds a balance: cash on hand, a credit line, or savings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetAccount {
    /// Assigned by the store on insert; zero for accounts not yet saved.
    pub id: i64,
    pub name: String,
    pub balance: Decimal,
    pub kind: AssetAccountKind,
}

impl AssetAccount {
    pub fn cash(name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: 0,
            name: name.into(),
            balance,
            kind: AssetAccountKind::Cash,
        }
    }

    pub fn credit(
        name: impl Into<String>,
        balance: Decimal,
        credit_line: Decimal,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            balance,
            kind: AssetAccountKind::Credit(CreditTerms {
                credit_line,
                interest_rate,
                statement_time_period: None,
            }),
        }
    }

    pub fn savings(name: impl Into<String>, balance: Decimal, interest_rate: Decimal) -> Self {
        Self {
            id: 0,
            name: name.into(),
            balance,
            kind: AssetAccountKind::Savings(SavingsTerms {
                interest_rate,
                statement_time_period: None,
            }),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Attaches a statement schedule. Cash accounts carry none, so this is a
    /// no-op for them.
    pub fn with_statement_time_period(mut self, time_period: TimePeriod) -> Self {
        if let Some(slot) = self.statement_slot_mut() {
            *slot = Some(time_period);
        }
        self
    }

    pub fn account_type(&self) -> AccountType {
        AccountType::Asset
    }

    pub fn asset_account_type(&self) -> AssetAccountType {
        match self.kind {
            AssetAccountKind::Cash => AssetAccountType::Cash,
            AssetAccountKind::Credit(_) => AssetAccountType::Credit,
            AssetAccountKind::Savings(_) => AssetAccountType::Savings,
        }
    }

    pub fn interest_rate(&self) -> Option<Decimal> {
        match &self.kind {
            AssetAccountKind::Cash => None,
            AssetAccountKind::Credit(terms) => Some(terms.interest_rate),
            AssetAccountKind::Savings(terms) => Some(terms.interest_rate),
        }
    }

    /// Portion of the credit line in use. Only credit accounts have one.
    pub fn credit_used(&self) -> Option<Decimal> {
        match &self.kind {
            AssetAccountKind::Credit(terms) => Some(terms.credit_used(self.balance)),
            _ => None,
        }
    }

    pub fn statement_time_period(&self) -> Option<&TimePeriod> {
        match &self.kind {
            AssetAccountKind::Cash => None,
            AssetAccountKind::Credit(terms) => terms.statement_time_period.as_ref(),
            AssetAccountKind::Savings(terms) => terms.statement_time_period.as_ref(),
        }
    }

    pub(crate) fn statement_slot_mut(&mut self) -> Option<&mut Option<TimePeriod>> {
        match &mut self.kind {
            AssetAccountKind::Cash => None,
            AssetAccountKind::Credit(terms) => Some(&mut terms.statement_time_period),
            AssetAccountKind::Savings(terms) => Some(&mut terms.statement_time_period),
        }
    }
}
