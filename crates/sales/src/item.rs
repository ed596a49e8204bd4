use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salesdesk_core::{DomainError, DomainResult, Entity, ProductId, SaleId, SaleItemId, ValueObject};

/// Upper bound on identical units of one product in a single sale.
pub const MAX_IDENTICAL_ITEMS: u32 = 20;

/// Quantity-based discount tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    NoDiscount,
    TenPercent,
    TwentyPercent,
}

impl ValueObject for DiscountTier {}

impl DiscountTier {
    /// Tier for a line of `quantity` identical units.
    ///
    /// Does not enforce the quantity cap; quantities above it map to no discount.
    pub fn for_quantity(quantity: u32) -> Self {
        match quantity {
            10..=MAX_IDENTICAL_ITEMS => DiscountTier::TwentyPercent,
            4..=9 => DiscountTier::TenPercent,
            _ => DiscountTier::NoDiscount,
        }
    }

    /// Whole-number percentage (0, 10 or 20).
    pub fn percentage(self) -> Decimal {
        match self {
            DiscountTier::NoDiscount => Decimal::ZERO,
            DiscountTier::TenPercent => Decimal::TEN,
            DiscountTier::TwentyPercent => Decimal::from(20u32),
        }
    }
}

/// `quantity * unit_price` minus `discount_percentage` percent of it.
///
/// Fails with `BusinessRule` when the amount does not fit in a `Decimal`.
pub fn line_total(
    quantity: u32,
    unit_price: Decimal,
    discount_percentage: Decimal,
) -> DomainResult<Decimal> {
    let overflow = || DomainError::business_rule("sale line amount overflow");

    let gross = Decimal::from(quantity)
        .checked_mul(unit_price)
        .ok_or_else(overflow)?;
    let discount = gross
        .checked_mul(discount_percentage)
        .and_then(|d| d.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)?;
    gross.checked_sub(discount).ok_or_else(overflow)
}

/// Caller-supplied data for one line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemInput {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl SaleItemInput {
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }
}

/// A priced line of a sale. Only the owning [`crate::Sale`] creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    id: SaleItemId,
    sale_id: SaleId,
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Decimal,
    discount_percentage: Decimal,
    total_item_amount: Decimal,
    is_cancelled: bool,
}

impl SaleItem {
    /// Apply the quantity cap and discount tiers to `input`.
    pub(crate) fn priced(sale_id: SaleId, input: &SaleItemInput) -> DomainResult<Self> {
        if input.quantity > MAX_IDENTICAL_ITEMS {
            return Err(DomainError::business_rule(format!(
                "cannot sell more than {MAX_IDENTICAL_ITEMS} identical items of one product (product {}, quantity {})",
                input.product_id, input.quantity
            )));
        }

        let discount_percentage = DiscountTier::for_quantity(input.quantity).percentage();
        let total_item_amount = line_total(input.quantity, input.unit_price, discount_percentage)?;

        Ok(Self {
            id: SaleItemId::new(),
            sale_id,
            product_id: input.product_id,
            product_name: input.product_name.clone(),
            quantity: input.quantity,
            unit_price: input.unit_price,
            discount_percentage,
            total_item_amount,
            is_cancelled: false,
        })
    }

    pub fn id_typed(&self) -> SaleItemId {
        self.id
    }

    pub fn sale_id(&self) -> SaleId {
        self.sale_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn discount_percentage(&self) -> Decimal {
        self.discount_percentage
    }

    pub fn total_item_amount(&self) -> Decimal {
        self.total_item_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }
}

impl Entity for SaleItem {
    type Id = SaleItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(quantity: u32, unit_price: Decimal) -> SaleItemInput {
        SaleItemInput::new(ProductId::new(), "Pilsen 600ml", quantity, unit_price)
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(DiscountTier::for_quantity(1), DiscountTier::NoDiscount);
        assert_eq!(DiscountTier::for_quantity(3), DiscountTier::NoDiscount);
        assert_eq!(DiscountTier::for_quantity(4), DiscountTier::TenPercent);
        assert_eq!(DiscountTier::for_quantity(9), DiscountTier::TenPercent);
        assert_eq!(DiscountTier::for_quantity(10), DiscountTier::TwentyPercent);
        assert_eq!(DiscountTier::for_quantity(20), DiscountTier::TwentyPercent);
    }

    #[test]
    fn line_total_divides_whole_percentage_by_hundred() {
        assert_eq!(line_total(5, Decimal::TEN, Decimal::TEN), Ok(Decimal::from(45u32)));
        assert_eq!(
            line_total(15, Decimal::TEN, Decimal::from(20u32)),
            Ok(Decimal::from(120u32))
        );
        // 4 * 2.50 = 10.00, minus 10% = 9.00
        assert_eq!(line_total(4, Decimal::new(250, 2), Decimal::TEN), Ok(Decimal::new(900, 2)));
    }

    #[test]
    fn line_amount_overflow_is_a_business_rule_violation() {
        let err = SaleItem::priced(SaleId::new(), &input(2, Decimal::MAX)).unwrap_err();
        match err {
            DomainError::BusinessRule(msg) => assert!(msg.contains("overflow")),
            other => panic!("expected BusinessRule, got {other:?}"),
        }

        // The discount step overflows even though the gross amount fits.
        assert!(line_total(10, Decimal::MAX / Decimal::TEN, Decimal::from(20u32)).is_err());
    }

    #[test]
    fn priced_item_starts_active_with_fresh_id() {
        let sale_id = SaleId::new();
        let a = SaleItem::priced(sale_id, &input(2, Decimal::TEN)).unwrap();
        let b = SaleItem::priced(sale_id, &input(2, Decimal::TEN)).unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.sale_id(), sale_id);
        assert!(!a.is_cancelled());
        assert_eq!(a.discount_percentage(), Decimal::ZERO);
        assert_eq!(a.total_item_amount(), Decimal::from(20u32));
    }

    #[test]
    fn quantity_above_cap_is_a_business_rule_violation() {
        let err = SaleItem::priced(SaleId::new(), &input(21, Decimal::TEN)).unwrap_err();
        match err {
            DomainError::BusinessRule(msg) => assert!(msg.contains("more than 20")),
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn discount_matches_tier_table(quantity in 0u32..=MAX_IDENTICAL_ITEMS) {
            let expected = if (10..=20).contains(&quantity) {
                20u32
            } else if (4..10).contains(&quantity) {
                10
            } else {
                0
            };
            prop_assert_eq!(DiscountTier::for_quantity(quantity).percentage(), Decimal::from(expected));
        }

        #[test]
        fn discount_never_decreases_within_cap(quantity in 1u32..MAX_IDENTICAL_ITEMS) {
            let here = DiscountTier::for_quantity(quantity).percentage();
            let next = DiscountTier::for_quantity(quantity + 1).percentage();
            prop_assert!(next >= here);
        }

        #[test]
        fn every_quantity_over_cap_is_rejected(quantity in (MAX_IDENTICAL_ITEMS + 1)..10_000u32) {
            prop_assert!(SaleItem::priced(SaleId::new(), &input(quantity, Decimal::ONE)).is_err());
        }
    }
}
