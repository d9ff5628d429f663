use serde::{Deserialize, Serialize};

use crate::domain::conversation::{ChatMessage, ConversationId, MessageId, Sender};
use crate::domain::order::Order;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    #[default]
    Greeting,
    Ordering,
    Address,
    Confirmation,
    HumanHandoff,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Ordering => "ordering",
            Self::Address => "address",
            Self::Confirmation => "confirmation",
            Self::HumanHandoff => "human-handoff",
        }
    }

    /// Stages the automated flow never leaves on its own.
    pub fn is_absorbing(self) -> bool {
        matches!(self, Self::Confirmation | Self::HumanHandoff)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a conversation owns between turns, except the context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub conversation_id: ConversationId,
    pub stage: Stage,
    pub order: Order,
    pub messages: Vec<ChatMessage>,
    pub awaiting_human: bool,
}

impl DialogueState {
    pub fn new(greeting: impl Into<String>) -> Self {
        let mut state = Self {
            conversation_id: ConversationId::new(),
            stage: Stage::Greeting,
            order: Order::new(),
            messages: Vec::new(),
            awaiting_human: false,
        };
        state.push_message(greeting, Sender::Bot);
        state
    }

    pub fn push_message(&mut self, text: impl Into<String>, sender: Sender) -> &ChatMessage {
        let id = MessageId(self.messages.len() as u64 + 1);
        self.messages.push(ChatMessage::new(id, text, sender));
        &self.messages[self.messages.len() - 1]
    }

    /// Texts of the last `count` messages, oldest first.
    pub fn recent_texts(&self, count: usize) -> Vec<&str> {
        let start = self.messages.len().saturating_sub(count);
        self.messages[start..].iter().map(|message| message.text.as_str()).collect()
    }
}

/// Which priority rule answered a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRule {
    HumanRequest,
    AwaitingHuman,
    OrderConfirmed,
    UpsellResponse,
    AddressCollection,
    Finalize,
    ContinueOrder,
    IngredientRemoval,
    IngredientQuery,
    PriceQuery,
    ItemMention,
    AddToOrder,
    DeliveryTime,
    ShowMenu,
    OrderStart,
    Delegation,
    Fallback,
}

impl TurnRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HumanRequest => "human_request",
            Self::AwaitingHuman => "awaiting_human",
            Self::OrderConfirmed => "order_confirmed",
            Self::UpsellResponse => "upsell_response",
            Self::AddressCollection => "address_collection",
            Self::Finalize => "finalize",
            Self::ContinueOrder => "continue_order",
            Self::IngredientRemoval => "ingredient_removal",
            Self::IngredientQuery => "ingredient_query",
            Self::PriceQuery => "price_query",
            Self::ItemMention => "item_mention",
            Self::AddToOrder => "add_to_order",
            Self::DeliveryTime => "delivery_time",
            Self::ShowMenu => "show_menu",
            Self::OrderStart => "order_start",
            Self::Delegation => "delegation",
            Self::Fallback => "fallback",
        }
    }
}

/// An off-topic message handed to the text-completion collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRequest {
    pub message: String,
    pub context: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub state: DialogueState,
    pub context: crate::context::ConversationContext,
    /// Bot replies already appended to `state.messages`, in order.
    pub replies: Vec<String>,
    pub rule: TurnRule,
    /// Set when the turn must be answered by the completion collaborator;
    /// `replies` is then empty.
    pub delegation: Option<DelegationRequest>,
}
