//! Database row types and their mapping into domain values.

use sqlx::FromRow;

use rates_types::{Currency, CurrencyCode, ProviderDescriptor, RepoError};

/// Provider row from database.
#[derive(FromRow)]
pub struct DbProvider {
    pub id: i64,
    pub name: String,
    pub priority: i64,
    pub is_active: i64,
}

impl DbProvider {
    /// Convert database row to a descriptor; the row id is the insertion position.
    pub fn into_domain(self) -> Result<ProviderDescriptor, RepoError> {
        let priority = i32::try_from(self.priority)
            .map_err(|_| RepoError::Database(format!("priority out of range: {}", self.priority)))?;

        Ok(ProviderDescriptor::new(self.name, priority, self.is_active != 0).at_position(self.id))
    }
}

/// Currency row from database.
#[derive(FromRow)]
pub struct DbCurrency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub is_default: i64,
}

impl DbCurrency {
    pub fn into_domain(self) -> Result<Currency, RepoError> {
        let code = CurrencyCode::parse(&self.code)?;
        let currency = Currency::new(code, self.name, self.symbol);

        Ok(if self.is_default != 0 {
            currency.as_default()
        } else {
            currency
        })
    }
}
