//! Short-term conversational memory.

use serde::{Deserialize, Serialize};

use crate::catalog::MenuCatalog;
use crate::domain::menu::{MenuItem, MenuItemId};
use crate::domain::order::AddressField;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastAction {
    Price,
    Ingredients,
    Menu,
    OfferExtras,
}

/// Anaphora state consulted by the dialogue engine on every turn.
///
/// The last discussed item is held by id and looked up again in the current
/// catalog whenever it is used, so a price change or an availability toggle
/// made between turns is always observed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub last_item: Option<MenuItemId>,
    pub last_action: Option<LastAction>,
    pub pending_address_field: Option<AddressField>,
    pub awaiting_extras: bool,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, item: &MenuItem, action: Option<LastAction>) {
        self.last_item = Some(item.id.clone());
        self.last_action = action;
    }

    pub fn forget_item(&mut self) {
        self.last_item = None;
    }

    /// The remembered item, if it is still on the menu and available.
    pub fn recalled_item<'m>(&self, catalog: &'m MenuCatalog) -> Option<&'m MenuItem> {
        self.last_item.as_ref().and_then(|id| catalog.find_available(id))
    }
}
