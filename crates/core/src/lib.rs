//! Deterministic core of the Frajola pizzeria assistant.
//!
//! Every decision about prices, order contents and conversation stages is
//! made here by plain rules. The only nondeterministic collaborator, the
//! text-completion service for off-topic chat, lives in `frajola-agent`.

pub mod catalog;
pub mod config;
pub mod context;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod resolver;
pub mod router;
pub mod text;

pub use catalog::{
    JsonFileMenuProvider, MenuCatalog, MenuProvider, StaticMenuProvider,
    DEFAULT_ESTIMATED_DELIVERY_MINUTES,
};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use context::{ConversationContext, LastAction};
pub use domain::conversation::{ChatMessage, ConversationId, MessageId, Sender};
pub use domain::menu::{MenuCategory, MenuItem, MenuItemId};
pub use domain::order::{AddressField, CustomerInfo, Order, OrderLine, OrderStatus};
pub use errors::{ApplicationError, DomainError};
pub use flows::{
    DelegationRequest, DialogueConfig, DialogueEngine, DialogueState, Stage, TurnOutcome,
    TurnRule, UpsellOffer,
};
pub use resolver::{MatchKind, MenuResolver, Resolution, ResolutionSource, ResolverSettings};
pub use router::IntentRouter;
pub use text::{normalize, similarity};
