use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::menu::MenuItemId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("order is closed and cannot be modified")]
    OrderClosed,
    #[error("menu item {item:?} has a negative price {price}")]
    NegativePrice { item: MenuItemId, price: Decimal },
    #[error("menu item {0:?} already exists")]
    DuplicateMenuItem(MenuItemId),
    #[error("menu item {0:?} does not exist")]
    UnknownMenuItem(MenuItemId),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("menu source failure: {0}")]
    MenuSource(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Short, stable classifier used in structured logs and CLI payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::MenuSource(_) => "menu_source",
            Self::Integration(_) => "integration",
            Self::Configuration(_) => "config_validation",
        }
    }
}
