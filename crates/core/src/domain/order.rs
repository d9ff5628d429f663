use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::menu::{MenuCategory, MenuItem, MenuItemId};
use crate::errors::DomainError;

/// Snapshot of a menu item at the moment it was added to the order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub ingredients: Vec<String>,
    pub removed_ingredients: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Name,
    Street,
    Number,
    Neighborhood,
}

impl AddressField {
    /// The field collected after this one, `None` once the address is complete.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Name => Some(Self::Street),
            Self::Street => Some(Self::Number),
            Self::Number => Some(Self::Neighborhood),
            Self::Neighborhood => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
}

impl CustomerInfo {
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::Name => self.name = value,
            AddressField::Street => self.street = value,
            AddressField::Number => self.number = value,
            AddressField::Neighborhood => self.neighborhood = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        [&self.name, &self.street, &self.number, &self.neighborhood]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Open,
    Closed,
}

/// Append-only order with an incrementally maintained total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    lines: Vec<OrderLine>,
    pub customer: CustomerInfo,
    total: Decimal,
    status: OrderStatus,
}

/// Wire shape of [`Order`]; only accepted when the total matches its lines.
#[derive(Deserialize)]
struct OrderRecord {
    lines: Vec<OrderLine>,
    #[serde(default)]
    customer: CustomerInfo,
    total: Decimal,
    #[serde(default)]
    status: OrderStatus,
}

impl TryFrom<OrderRecord> for Order {
    type Error = DomainError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let expected: Decimal = record
            .lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum();
        if expected != record.total {
            return Err(DomainError::InvariantViolation(format!(
                "order total {} does not match the sum of its lines {expected}",
                record.total
            )));
        }
        Ok(Self {
            lines: record.lines,
            customer: record.customer,
            total: record.total,
            status: record.status,
        })
    }
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn last_line(&self) -> Option<&OrderLine> {
        self.lines.last()
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.status == OrderStatus::Closed
    }

    /// Appends one unit of `item` and returns the new total.
    ///
    /// The line price is `price_override` when given, otherwise the item's
    /// regular price. The total is advanced by exactly that amount.
    pub fn add_line(
        &mut self,
        item: &MenuItem,
        price_override: Option<Decimal>,
    ) -> Result<Decimal, DomainError> {
        if self.is_closed() {
            return Err(DomainError::OrderClosed);
        }
        let unit_price = price_override.unwrap_or(item.price);
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(DomainError::NegativePrice { item: item.id.clone(), price: unit_price });
        }
        let total = self.total.checked_add(unit_price).ok_or_else(|| {
            DomainError::InvariantViolation("order total overflowed".to_string())
        })?;

        self.lines.push(OrderLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category,
            unit_price,
            quantity: 1,
            ingredients: item.ingredients.clone(),
            removed_ingredients: Vec::new(),
        });
        self.total = total;
        Ok(total)
    }

    /// Records that `ingredient` should be left out of the most recent line.
    ///
    /// Metadata only: the price is not recomputed. Returns `false` when there
    /// is no line or the ingredient was already removed.
    pub fn remove_ingredient_from_last(&mut self, ingredient: &str) -> Result<bool, DomainError> {
        if self.is_closed() {
            return Err(DomainError::OrderClosed);
        }
        let Some(line) = self.lines.last_mut() else {
            return Ok(false);
        };
        if line.removed_ingredients.iter().any(|removed| removed == ingredient) {
            return Ok(false);
        }
        line.removed_ingredients.push(ingredient.to_string());
        Ok(true)
    }

    pub fn set_customer_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        if self.is_closed() {
            return Err(DomainError::OrderClosed);
        }
        self.customer.set(field, value);
        Ok(())
    }

    /// Freezes the order. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.status = OrderStatus::Closed;
    }
}
