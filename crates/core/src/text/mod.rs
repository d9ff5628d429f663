//! Text helpers shared by the resolver, the intent tables and the router.
//!
//! Everything downstream compares *normalized* text: lower-case, accents
//! stripped, punctuation folded to single spaces. Phrase tables in the rest of
//! the crate are therefore written already normalized (`cardapio`, `preco`).

pub mod normalize;
pub mod similarity;

pub use normalize::{contains_phrase, normalize, words};
pub use similarity::similarity;
