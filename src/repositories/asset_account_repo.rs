use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    domain::{
        common::StoredCode, AccountType, AssetAccount, AssetAccountKind, AssetAccountType,
        CreditTerms, SavingsTerms, TimePeriod,
    },
    errors::{RepoError, Result},
    storage::{
        AccountColumn, CriteriaStore, LinkColumn, Record, Table, TimePeriodColumn, ValueMap,
    },
};

use super::{AccountRepository, TimePeriodRepository, TimePeriodStore};

/// [`AccountRepository`] for cash, credit, and savings accounts.
///
/// Credit and savings accounts may own a statement [`TimePeriod`]; its
/// lifecycle is delegated to the injected [`TimePeriodRepository`].
pub struct AssetAccountStore {
    store: Arc<dyn CriteriaStore>,
    time_periods: Arc<dyn TimePeriodRepository>,
}

impl AssetAccountStore {
    pub fn new(store: Arc<dyn CriteriaStore>) -> Self {
        let time_periods = Arc::new(TimePeriodStore::new(Arc::clone(&store)));
        Self {
            store,
            time_periods,
        }
    }

    pub fn with_time_period_repository(
        store: Arc<dyn CriteriaStore>,
        time_periods: Arc<dyn TimePeriodRepository>,
    ) -> Self {
        Self {
            store,
            time_periods,
        }
    }

    fn build_from_record(&self, record: &Record) -> Result<AssetAccount> {
        let id = record.integer(AccountColumn::Id)?;
        let account_type: AccountType = record.code(AccountColumn::AccountType)?;
        if account_type != AccountType::Asset {
            debug!(account = id, %account_type, "row is not an asset account");
            return Err(not_found(id));
        }

        let sub_type: AssetAccountType = record.code(AccountColumn::AssetAccountType)?;
        let kind = match sub_type {
            AssetAccountType::Cash => AssetAccountKind::Cash,
            AssetAccountType::Credit => AssetAccountKind::Credit(CreditTerms {
                credit_line: record.decimal(AccountColumn::CreditLine)?,
                interest_rate: record.decimal(AccountColumn::InterestRate)?,
                statement_time_period: self.owned_time_period(id)?,
            }),
            AssetAccountType::Savings => AssetAccountKind::Savings(SavingsTerms {
                interest_rate: record.decimal(AccountColumn::InterestRate)?,
                statement_time_period: self.owned_time_period(id)?,
            }),
        };

        Ok(AssetAccount {
            id,
            name: record.text(AccountColumn::Name)?,
            balance: record.decimal(AccountColumn::Balance)?,
            kind,
        })
    }

    fn owned_time_period(&self, account_id: i64) -> Result<Option<TimePeriod>> {
        let criteria = ValueMap::new().with(TimePeriodColumn::OwnerAccountId, account_id);
        let rows = self.store.get_many(Table::TimePeriod, &criteria)?;
        match rows.first() {
            Some(row) => {
                let time_period_id = row.integer(TimePeriodColumn::Id)?;
                Ok(Some(self.time_periods.get_time_period(time_period_id)?))
            }
            None => Ok(None),
        }
    }
}

impl AccountRepository for AssetAccountStore {
    type Account = AssetAccount;

    fn get_account(&self, account_id: i64) -> Result<AssetAccount> {
        let rows = self.store.get_one(Table::Account, account_id)?;
        let record = rows.first().ok_or_else(|| not_found(account_id))?;
        self.build_from_record(record)
    }

    /// Inserts the account row, then the attached statement period (if any)
    /// with its owner set to the new account id.
    fn insert_account(&self, mut account: AssetAccount) -> Result<AssetAccount> {
        let rows = self
            .store
            .insert_one(Table::Account, &insert_values(&account))?;
        let record = rows.first().ok_or_else(|| RepoError::AccountInsertFailed {
            name: account.name.clone(),
        })?;
        let account_id = record.integer(AccountColumn::Id)?;
        info!(
            account = account_id,
            kind = ?account.asset_account_type(),
            "inserted asset account"
        );

        if let Some(mut statement) = account.statement_slot_mut().and_then(Option::take) {
            statement.owner_account_id = account_id;
            self.time_periods.insert_time_period(&statement)?;
        }

        self.build_from_record(record)
    }

    /// Writes the mutable columns only. The statement period is left alone.
    fn update_account(&self, account: &AssetAccount) -> Result<AssetAccount> {
        let rows = self
            .store
            .update_one(Table::Account, &update_values(account), account.id)?;
        let record = rows.first().ok_or_else(|| not_found(account.id))?;
        self.build_from_record(record)
    }

    /// Removes the account's link rows, its statement period, and the
    /// account row, in that order.
    ///
    /// The statement period is only deleted when it is attached to `account`.
    /// Pass an account obtained from [`AccountRepository::get_account`] so an
    /// owned period is not left behind.
    fn delete_account(&self, account: &AssetAccount) -> Result<()> {
        if account.asset_account_type() != AssetAccountType::Cash {
            let criteria = ValueMap::new().with(LinkColumn::AccountId, account.id);
            self.store
                .delete_many(Table::AccountToTimePeriodLink, &criteria)?;
        }
        if let Some(statement) = account.statement_time_period() {
            self.time_periods.delete_time_period(statement.id)?;
        }
        self.store.delete_one(Table::Account, account.id)?;
        info!(account = account.id, "deleted asset account");
        Ok(())
    }
}

fn not_found(account_id: i64) -> RepoError {
    RepoError::AccountNotFound {
        id: account_id,
        account_type: AccountType::Asset,
    }
}

fn insert_values(account: &AssetAccount) -> ValueMap {
    let mut values = ValueMap::new()
        .with(AccountColumn::Name, account.name.as_str())
        .with(AccountColumn::AccountType, AccountType::Asset.code())
        .with(AccountColumn::Balance, account.balance);
    match &account.kind {
        AssetAccountKind::Cash => {}
        AssetAccountKind::Credit(terms) => {
            values.set(AccountColumn::CreditLine, terms.credit_line);
            values.set(AccountColumn::InterestRate, terms.interest_rate);
        }
        AssetAccountKind::Savings(terms) => {
            values.set(AccountColumn::InterestRate, terms.interest_rate);
        }
    }
    values.with(
        AccountColumn::AssetAccountType,
        account.asset_account_type().code(),
    )
}

fn update_values(account: &AssetAccount) -> ValueMap {
    let mut values = ValueMap::new()
        .with(AccountColumn::Name, account.name.as_str())
        .with(AccountColumn::Balance, account.balance);
    match &account.kind {
        AssetAccountKind::Cash => {}
        AssetAccountKind::Credit(terms) => {
            values.set(AccountColumn::InterestRate, terms.interest_rate);
            values.set(AccountColumn::CreditLine, terms.credit_line);
        }
        AssetAccountKind::Savings(terms) => {
            values.set(AccountColumn::InterestRate, terms.interest_rate);
        }
    }
    values
}
