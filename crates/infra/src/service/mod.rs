//! Application service for sales.
//!
//! Each operation is one unit of work:
//!
//! ```text
//! validate → load → aggregate operation → repository write → dispatch events
//! ```
//!
//! Events go out only after the write succeeded. A publish failure after a
//! successful write surfaces as `ServiceError::Publish`; the stored state is
//! not rolled back.

pub mod dto;
pub mod validation;

use chrono::Utc;
use thiserror::Error;

use salesdesk_core::{AggregateRoot, DomainError, ExpectedVersion, SaleId};
use salesdesk_events::{EventPublisher, PublishError};
use salesdesk_sales::{Sale, SaleEvent};

use crate::config::ListingConfig;
use crate::dispatcher::DomainEventsDispatcher;
use crate::repository::{RepositoryError, SaleRepository};

pub use dto::{
    CreateSaleRequest, ListSalesRequest, SaleItemRequest, SaleItemView, SaleListPage, SaleSummary,
    SaleView, UpdateSaleRequest,
};
pub use validation::ListQuery;

/// Cancellation reason recorded when a sale is removed through the service.
pub const DELETE_REASON: &str = "Deleted via API";

pub type CreateSaleResult = SaleView;
pub type UpdateSaleResult = SaleView;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("business rule violated: {0}")]
    BusinessRule(String),
    #[error("sale {0} not found")]
    NotFound(SaleId),
    /// Stale version or duplicate id.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(String),
    /// The write succeeded but its events were not all published.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::BusinessRule(msg) => ServiceError::BusinessRule(msg),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::NotFound => ServiceError::Storage("unexpected not found".to_string()),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            RepositoryError::AlreadyExists(_) | RepositoryError::Concurrency(_) => {
                ServiceError::Conflict(value.to_string())
            }
            RepositoryError::Poisoned => ServiceError::Storage(value.to_string()),
        }
    }
}

pub struct SalesService<R, P> {
    repository: R,
    dispatcher: DomainEventsDispatcher<P>,
    config: ListingConfig,
}

impl<R, P> SalesService<R, P>
where
    R: SaleRepository,
    P: EventPublisher<SaleEvent>,
{
    pub fn new(repository: R, publisher: P, config: ListingConfig) -> Self {
        Self {
            repository,
            dispatcher: DomainEventsDispatcher::new(publisher),
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn publisher(&self) -> &P {
        self.dispatcher.publisher()
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn create_sale(&self, req: CreateSaleRequest) -> Result<CreateSaleResult, ServiceError> {
        validation::validate_create(&req)?;
        let (details, items) = req.into_parts();

        let mut sale = Sale::create(details, &items, Utc::now())?;
        self.repository.insert(&sale)?;
        tracing::info!(
            sale_id = %sale.id_typed(),
            sale_number = sale.sale_number(),
            total_amount = %sale.total_amount(),
            "sale created"
        );

        self.dispatcher.dispatch(&mut sale)?;
        Ok(SaleView::from(&sale))
    }

    pub fn update_sale(
        &self,
        id: SaleId,
        req: UpdateSaleRequest,
    ) -> Result<UpdateSaleResult, ServiceError> {
        validation::validate_update(&req)?;
        let (details, items) = req.into_parts();

        let mut sale = self.load(id)?;
        let loaded_version = sale.version();

        sale.update(details, &items, Utc::now())?;
        self.repository
            .update(&sale, ExpectedVersion::Exact(loaded_version))?;
        tracing::info!(
            sale_id = %id,
            version = sale.version(),
            total_amount = %sale.total_amount(),
            "sale updated"
        );

        self.dispatcher.dispatch(&mut sale)?;
        Ok(SaleView::from(&sale))
    }

    /// Cancel and remove a sale; subscribers see one `SaleCancelled`.
    pub fn delete_sale(&self, id: SaleId) -> Result<(), ServiceError> {
        let mut sale = self.load(id)?;
        sale.cancel_with_reason(DELETE_REASON, Utc::now());

        if !self.repository.delete(id)? {
            return Err(ServiceError::NotFound(id));
        }
        tracing::info!(sale_id = %id, "sale deleted");

        self.dispatcher.dispatch(&mut sale)?;
        Ok(())
    }

    /// Cancelled sales are reported as not found.
    pub fn get_sale(&self, id: SaleId) -> Result<SaleView, ServiceError> {
        let sale = self.load(id)?;
        if sale.is_cancelled() {
            tracing::debug!(sale_id = %id, "sale is cancelled; hiding it");
            return Err(ServiceError::NotFound(id));
        }
        Ok(SaleView::from(&sale))
    }

    pub fn list_sales(&self, req: ListSalesRequest) -> Result<SaleListPage, ServiceError> {
        let query = validation::validate_list(&req, &self.config, Utc::now())?;
        let page = self.repository.list(&query.filter, &query.order, query.page)?;
        tracing::debug!(
            page = page.current_page,
            returned = page.sales.len(),
            total_items = page.total_items,
            "sales listed"
        );

        Ok(SaleListPage {
            data: page.sales.iter().map(SaleSummary::from).collect(),
            total_items: page.total_items,
            current_page: page.current_page,
            total_pages: page.total_pages,
        })
    }

    fn load(&self, id: SaleId) -> Result<Sale, ServiceError> {
        self.repository.get(id)?.ok_or(ServiceError::NotFound(id))
    }
}

impl<R, P> core::fmt::Debug for SalesService<R, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SalesService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_service_errors() {
        let id = SaleId::new();
        assert_eq!(
            ServiceError::from(RepositoryError::NotFound(id)),
            ServiceError::NotFound(id)
        );
        assert!(matches!(
            ServiceError::from(RepositoryError::Concurrency("stale".into())),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Poisoned),
            ServiceError::Storage(_)
        ));
    }

    #[test]
    fn invalid_ids_are_validation_failures() {
        assert_eq!(
            ServiceError::from(DomainError::invalid_id("SaleId: bad")),
            ServiceError::Validation("SaleId: bad".to_string())
        );
    }
}
