use std::collections::HashMap;
use std::sync::RwLock;

use salesdesk_core::{AggregateRoot, ExpectedVersion, HasDomainEvents, SaleId};
use salesdesk_sales::Sale;

use super::query::{PageRequest, SaleFilter, SalePage, SortOrder};
use super::{RepositoryError, SaleRepository};

/// In-memory sale repository.
///
/// Intended for tests/dev. Listing is a full scan.
#[derive(Debug, Default)]
pub struct InMemorySaleRepository {
    sales: RwLock<HashMap<SaleId, Sale>>,
}

impl InMemorySaleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let sales = self.sales.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(sales.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    fn snapshot(sale: &Sale) -> Sale {
        let mut stored = sale.clone();
        stored.clear_domain_events();
        stored
    }
}

impl SaleRepository for InMemorySaleRepository {
    fn get(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
        let sales = self.sales.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(sales.get(&id).cloned())
    }

    fn insert(&self, sale: &Sale) -> Result<(), RepositoryError> {
        let mut sales = self.sales.write().map_err(|_| RepositoryError::Poisoned)?;
        let id = sale.id_typed();
        if sales.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists(id));
        }
        sales.insert(id, Self::snapshot(sale));
        Ok(())
    }

    fn update(&self, sale: &Sale, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut sales = self.sales.write().map_err(|_| RepositoryError::Poisoned)?;
        let id = sale.id_typed();
        let stored = sales.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;

        expected
            .check(stored.version())
            .map_err(|e| RepositoryError::Concurrency(e.to_string()))?;

        *stored = Self::snapshot(sale);
        Ok(())
    }

    fn delete(&self, id: SaleId) -> Result<bool, RepositoryError> {
        let mut sales = self.sales.write().map_err(|_| RepositoryError::Poisoned)?;
        Ok(sales.remove(&id).is_some())
    }

    fn list(
        &self,
        filter: &SaleFilter,
        order: &SortOrder,
        page: PageRequest,
    ) -> Result<SalePage, RepositoryError> {
        let sales = self.sales.read().map_err(|_| RepositoryError::Poisoned)?;

        let mut matching: Vec<&Sale> = sales.values().filter(|s| filter.matches(s)).collect();
        matching.sort_by(|a, b| order.compare(a, b));

        let total_items = matching.len() as u64;
        let rows = matching
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(SalePage::new(rows, total_items, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use salesdesk_core::{CustomerId, ProductId};
    use salesdesk_sales::{SaleDetails, SaleItemInput};

    use crate::repository::query::{SortDirection, SortField, SortKey};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn sale(number: u32, branch: &str, date: DateTime<Utc>, unit_price: u32) -> Sale {
        Sale::create(
            SaleDetails {
                sale_number: number,
                sale_date: date,
                customer_id: CustomerId::new(),
                customer_name: format!("customer {number}"),
                branch: branch.to_string(),
            },
            &[SaleItemInput::new(ProductId::new(), "Guarana 2L", 1, Decimal::from(unit_price))],
            date,
        )
        .unwrap()
    }

    fn numbers(page: &SalePage) -> Vec<u32> {
        page.sales.iter().map(Sale::sale_number).collect()
    }

    #[test]
    fn stored_sales_carry_no_pending_events() {
        let repo = InMemorySaleRepository::new();
        let s = sale(1, "Centro", day(0), 10);
        assert_eq!(s.domain_events().len(), 1);

        repo.insert(&s).unwrap();

        let loaded = repo.get(s.id_typed()).unwrap().unwrap();
        assert!(loaded.domain_events().is_empty());
        assert_eq!(loaded.total_amount(), s.total_amount());
    }

    #[test]
    fn insert_twice_is_rejected() {
        let repo = InMemorySaleRepository::new();
        let s = sale(1, "Centro", day(0), 10);
        repo.insert(&s).unwrap();

        assert_eq!(repo.insert(&s), Err(RepositoryError::AlreadyExists(s.id_typed())));
    }

    #[test]
    fn update_checks_expected_version() {
        let repo = InMemorySaleRepository::new();
        let mut s = sale(1, "Centro", day(0), 10);
        repo.insert(&s).unwrap();

        s.cancel(day(1));
        repo.update(&s, ExpectedVersion::Exact(1)).unwrap();
        assert!(repo.get(s.id_typed()).unwrap().unwrap().is_cancelled());

        // Stored version is now 2; a writer still expecting 1 lost the race.
        let err = repo.update(&s, ExpectedVersion::Exact(1)).unwrap_err();
        assert!(matches!(err, RepositoryError::Concurrency(_)));
    }

    #[test]
    fn update_of_unknown_sale_is_not_found() {
        let repo = InMemorySaleRepository::new();
        let s = sale(1, "Centro", day(0), 10);

        assert_eq!(
            repo.update(&s, ExpectedVersion::Any),
            Err(RepositoryError::NotFound(s.id_typed()))
        );
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let repo = InMemorySaleRepository::new();
        let s = sale(1, "Centro", day(0), 10);
        repo.insert(&s).unwrap();

        assert!(repo.delete(s.id_typed()).unwrap());
        assert!(!repo.delete(s.id_typed()).unwrap());
        assert_eq!(repo.is_empty(), Ok(true));
    }

    #[test]
    fn poisoned_store_reports_an_error_instead_of_looking_empty() {
        let repo = std::sync::Arc::new(InMemorySaleRepository::new());
        repo.insert(&sale(1, "Centro", day(0), 10)).unwrap();

        let writer = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.sales.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(repo.len(), Err(RepositoryError::Poisoned));
        assert_eq!(repo.is_empty(), Err(RepositoryError::Poisoned));
        assert_eq!(repo.get(SaleId::new()), Err(RepositoryError::Poisoned));
    }

    #[test]
    fn list_defaults_to_newest_first_and_paginates() {
        let repo = InMemorySaleRepository::new();
        for n in 1..=5 {
            repo.insert(&sale(n, "Centro", day(i64::from(n)), 10)).unwrap();
        }

        let first = repo
            .list(&SaleFilter::default(), &SortOrder::default(), PageRequest::new(1, 2))
            .unwrap();
        assert_eq!(numbers(&first), vec![5, 4]);
        assert_eq!(first.total_items, 5);
        assert_eq!(first.total_pages, 3);

        let last = repo
            .list(&SaleFilter::default(), &SortOrder::default(), PageRequest::new(3, 2))
            .unwrap();
        assert_eq!(numbers(&last), vec![1]);
        assert_eq!(last.current_page, 3);
    }

    #[test]
    fn list_filters_by_branch_substring_and_date_range() {
        let repo = InMemorySaleRepository::new();
        repo.insert(&sale(1, "Centro", day(1), 10)).unwrap();
        repo.insert(&sale(2, "Centro Norte", day(2), 10)).unwrap();
        repo.insert(&sale(3, "Sul", day(3), 10)).unwrap();
        repo.insert(&sale(4, "Centro", day(9), 10)).unwrap();

        let filter = SaleFilter {
            branch: Some("Centro".to_string()),
            min_date: Some(day(1)),
            max_date: Some(day(5)),
        };
        let page = repo
            .list(&filter, &"SaleNumber asc".parse().unwrap(), PageRequest::new(1, 10))
            .unwrap();

        assert_eq!(numbers(&page), vec![1, 2]);
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn list_applies_secondary_sort_keys() {
        let repo = InMemorySaleRepository::new();
        repo.insert(&sale(1, "Sul", day(1), 30)).unwrap();
        repo.insert(&sale(2, "Centro", day(2), 10)).unwrap();
        repo.insert(&sale(3, "Sul", day(3), 20)).unwrap();

        let order = SortOrder::new(vec![
            SortKey::new(SortField::Branch, SortDirection::Asc),
            SortKey::new(SortField::TotalAmount, SortDirection::Desc),
        ]);
        let page = repo
            .list(&SaleFilter::default(), &order, PageRequest::new(1, 10))
            .unwrap();

        assert_eq!(numbers(&page), vec![2, 1, 3]);
    }
}
