pub mod engine;
pub mod intents;
pub mod replies;
pub mod states;
pub mod upsell;

pub use engine::{DialogueConfig, DialogueEngine};
pub use states::{DelegationRequest, DialogueState, Stage, TurnOutcome, TurnRule};
pub use upsell::UpsellOffer;
