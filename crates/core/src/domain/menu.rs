use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuItemId(pub String);

impl MenuItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Pizza,
    #[serde(alias = "bebida")]
    Beverage,
    #[serde(alias = "entrada")]
    Side,
    #[serde(alias = "sobremesa")]
    Dessert,
}

impl MenuCategory {
    /// Rendering order of the menu sections.
    pub const ALL: [MenuCategory; 4] = [Self::Pizza, Self::Side, Self::Beverage, Self::Dessert];
}

fn default_available() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, alias = "priceSmall", skip_serializing_if = "Option::is_none")]
    pub price_small: Option<Decimal>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub category: MenuCategory,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        category: MenuCategory,
    ) -> Self {
        Self {
            id: MenuItemId::new(id),
            name: name.into(),
            price,
            price_small: None,
            ingredients: Vec::new(),
            category,
            available: true,
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_small_price(mut self, price_small: Decimal) -> Self {
        self.price_small = Some(price_small);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn is_pizza(&self) -> bool {
        self.category == MenuCategory::Pizza
    }

    /// Prices must be non-negative, including the small-size variant.
    pub fn validate(&self) -> Result<(), DomainError> {
        for price in std::iter::once(self.price).chain(self.price_small) {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(DomainError::NegativePrice { item: self.id.clone(), price });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{MenuCategory, MenuItem, MenuItemId};
    use crate::errors::DomainError;

    #[test]
    fn deserializes_portuguese_categories_and_optional_fields() {
        let raw = r#"[
            {"id": "29", "name": "Coca Cola 350ml", "price": "5.50", "category": "bebida"},
            {"id": "22", "name": "Borda Catupiry", "price": "8.00", "ingredients": ["catupiry"],
             "category": "entrada", "available": false},
            {"id": "1", "name": "Pizza Margherita", "price": "50.00", "priceSmall": "32.00",
             "category": "pizza"}
        ]"#;

        let items: Vec<MenuItem> = serde_json::from_str(raw).expect("menu items should parse");
        assert_eq!(items[0].category, MenuCategory::Beverage);
        assert!(items[0].available, "availability defaults to true");
        assert!(items[0].ingredients.is_empty());
        assert_eq!(items[1].category, MenuCategory::Side);
        assert!(!items[1].available);
        assert_eq!(items[2].price_small, Some(Decimal::new(3200, 2)));
        assert_eq!(items[2].id, MenuItemId::new("1"));
    }

    #[test]
    fn negative_prices_fail_validation() {
        let item = MenuItem::new("x", "Broken", Decimal::new(-1, 0), MenuCategory::Side);
        assert!(matches!(item.validate(), Err(DomainError::NegativePrice { .. })));

        let small = MenuItem::new("y", "Broken Small", Decimal::new(10, 0), MenuCategory::Pizza)
            .with_small_price(Decimal::new(-5, 0));
        assert!(small.validate().is_err());

        let free = MenuItem::new("z", "Water", Decimal::ZERO, MenuCategory::Beverage);
        assert!(free.validate().is_ok());
    }
}
