//! Persistence boundary for the Sale aggregate.
//!
//! The repository stores whole aggregates (header + items). It never stores
//! pending domain events: those belong to the unit of work that produced them.

pub mod in_memory;
pub mod query;

use std::sync::Arc;

use thiserror::Error;

use salesdesk_core::{ExpectedVersion, SaleId};
use salesdesk_sales::Sale;

pub use in_memory::InMemorySaleRepository;
pub use query::{PageRequest, SaleFilter, SalePage, SortDirection, SortField, SortKey, SortOrder};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("sale {0} already exists")]
    AlreadyExists(SaleId),
    #[error("sale {0} not found")]
    NotFound(SaleId),
    #[error("concurrency conflict: {0}")]
    Concurrency(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Storage gateway for sales.
pub trait SaleRepository: Send + Sync {
    fn get(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError>;

    /// Store a new sale. Fails with `AlreadyExists` if the id is taken.
    fn insert(&self, sale: &Sale) -> Result<(), RepositoryError>;

    /// Overwrite an existing sale, items included.
    ///
    /// `expected` is checked against the version currently stored.
    fn update(&self, sale: &Sale, expected: ExpectedVersion) -> Result<(), RepositoryError>;

    /// Remove a sale. Returns `false` if there was nothing to remove.
    fn delete(&self, id: SaleId) -> Result<bool, RepositoryError>;

    /// Filtered, sorted, paginated listing.
    fn list(
        &self,
        filter: &SaleFilter,
        order: &SortOrder,
        page: PageRequest,
    ) -> Result<SalePage, RepositoryError>;
}

impl<R> SaleRepository for Arc<R>
where
    R: SaleRepository + ?Sized,
{
    fn get(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
        (**self).get(id)
    }

    fn insert(&self, sale: &Sale) -> Result<(), RepositoryError> {
        (**self).insert(sale)
    }

    fn update(&self, sale: &Sale, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).update(sale, expected)
    }

    fn delete(&self, id: SaleId) -> Result<bool, RepositoryError> {
        (**self).delete(id)
    }

    fn list(
        &self,
        filter: &SaleFilter,
        order: &SortOrder,
        page: PageRequest,
    ) -> Result<SalePage, RepositoryError> {
        (**self).list(filter, order, page)
    }
}
