//! The menu catalog consumed by the dialogue engine.
//!
//! The engine only ever reads a catalog. Edits (`add_item`, `toggle_availability`,
//! ...) belong to the admin collaborator and happen between turns.

pub mod fixtures;
pub mod provider;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::menu::{MenuCategory, MenuItem, MenuItemId};
use crate::errors::DomainError;

pub use provider::{JsonFileMenuProvider, MenuProvider, StaticMenuProvider};

pub const DEFAULT_ESTIMATED_DELIVERY_MINUTES: u32 = 45;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    estimated_delivery_minutes: u32,
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self { items: Vec::new(), estimated_delivery_minutes: DEFAULT_ESTIMATED_DELIVERY_MINUTES }
    }
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items, ..Self::default() }
    }

    pub fn with_estimated_delivery_minutes(mut self, minutes: u32) -> Self {
        self.estimated_delivery_minutes = minutes;
        self
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Available items, in catalog order.
    pub fn available(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|item| item.available)
    }

    pub fn available_in(&self, category: MenuCategory) -> impl Iterator<Item = &MenuItem> {
        self.available().filter(move |item| item.category == category)
    }

    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    pub fn find(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Looks up an item that can still be sold.
    pub fn find_available(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.find(id).filter(|item| item.available)
    }

    pub fn estimated_delivery_minutes(&self) -> u32 {
        self.estimated_delivery_minutes
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add_item(&mut self, item: MenuItem) -> Result<(), DomainError> {
        item.validate()?;
        if self.find(&item.id).is_some() {
            return Err(DomainError::DuplicateMenuItem(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, id: &MenuItemId) -> Result<MenuItem, DomainError> {
        let index = self.position(id)?;
        Ok(self.items.remove(index))
    }

    /// Flips availability and returns the new flag.
    pub fn toggle_availability(&mut self, id: &MenuItemId) -> Result<bool, DomainError> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        item.available = !item.available;
        Ok(item.available)
    }

    pub fn update_price(&mut self, id: &MenuItemId, price: Decimal) -> Result<(), DomainError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(DomainError::NegativePrice { item: id.clone(), price });
        }
        let index = self.position(id)?;
        self.items[index].price = price;
        Ok(())
    }

    /// Drops an ingredient from an item's recipe. Returns whether it was present.
    pub fn remove_ingredient(
        &mut self,
        id: &MenuItemId,
        ingredient: &str,
    ) -> Result<bool, DomainError> {
        let index = self.position(id)?;
        let ingredients = &mut self.items[index].ingredients;
        let before = ingredients.len();
        ingredients.retain(|existing| existing != ingredient);
        Ok(ingredients.len() != before)
    }

    pub fn set_estimated_delivery_minutes(&mut self, minutes: u32) -> Result<(), DomainError> {
        if minutes == 0 {
            return Err(DomainError::InvariantViolation(
                "estimated delivery time must be at least one minute".to_string(),
            ));
        }
        self.estimated_delivery_minutes = minutes;
        Ok(())
    }

    fn position(&self, id: &MenuItemId) -> Result<usize, DomainError> {
        self.items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| DomainError::UnknownMenuItem(id.clone()))
    }
}
