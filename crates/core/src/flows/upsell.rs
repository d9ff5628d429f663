//! Fixed add-ons offered right after a pizza is added to the order.

use rust_decimal::Decimal;

use crate::domain::menu::{MenuCategory, MenuItem};
use crate::flows::intents::{NEGATIONS, UPSELL_ACCEPT, UPSELL_DECLINE};
use crate::text::words;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpsellOffer {
    pub item: MenuItem,
    /// Normalized single words that name this add-on in a reply.
    pub keywords: Vec<&'static str>,
}

impl UpsellOffer {
    pub fn new(item: MenuItem, keywords: &[&'static str]) -> Self {
        Self { item, keywords: keywords.to_vec() }
    }
}

pub fn default_offers() -> Vec<UpsellOffer> {
    vec![
        UpsellOffer::new(
            MenuItem::new(
                "extra-borda-catupiry",
                "Borda Recheada de Catupiry",
                Decimal::new(800, 2),
                MenuCategory::Side,
            ),
            &["borda", "bordas"],
        ),
        UpsellOffer::new(
            MenuItem::new(
                "extra-refrigerante",
                "Refrigerante 350ml",
                Decimal::new(550, 2),
                MenuCategory::Beverage,
            ),
            &["refri", "refrigerante", "coca", "guarana", "bebida"],
        ),
    ]
}

/// Which offers a reply accepts.
///
/// Offers named explicitly win, unless the mention is negated ("sem borda").
/// When every named offer is negated, the rest of the reply decides about the
/// offers it did not name ("sim, mas sem refri" takes the borda). Without a
/// named offer a decline cue declines everything, an accept cue accepts
/// everything, and anything else counts as a decline.
pub fn accepted_offers<'o>(normalized: &str, offers: &'o [UpsellOffer]) -> Vec<&'o UpsellOffer> {
    let tokens: Vec<&str> = words(normalized).collect();
    let mut consumed = vec![false; tokens.len()];
    let mut declined: Vec<&UpsellOffer> = Vec::new();
    let mut accepted = Vec::new();

    for offer in offers {
        let mut named = false;
        let mut positive = false;
        for (index, token) in tokens.iter().enumerate() {
            if !offer.keywords.iter().any(|keyword| keyword == token) {
                continue;
            }
            named = true;
            consumed[index] = true;
            let start = index.saturating_sub(2);
            let negation = tokens[start..index]
                .iter()
                .rposition(|previous| NEGATIONS.matches(previous))
                .map(|offset| start + offset);
            match negation {
                Some(from) => consumed[from..index].iter_mut().for_each(|flag| *flag = true),
                None => positive = true,
            }
        }
        if positive {
            accepted.push(offer);
        } else if named {
            declined.push(offer);
        }
    }

    if !accepted.is_empty() {
        return accepted;
    }

    let remainder = tokens
        .iter()
        .zip(&consumed)
        .filter(|(_, consumed)| !**consumed)
        .map(|(token, _)| *token)
        .collect::<Vec<_>>()
        .join(" ");
    if UPSELL_DECLINE.matches(&remainder) {
        return Vec::new();
    }
    if UPSELL_ACCEPT.matches(&remainder) {
        return offers.iter().filter(|offer| !declined.contains(offer)).collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::{accepted_offers, default_offers};
    use crate::text::normalize;

    fn accepted_names(reply: &str) -> Vec<String> {
        let offers = default_offers();
        accepted_offers(&normalize(reply), &offers)
            .into_iter()
            .map(|offer| offer.item.name.clone())
            .collect()
    }

    #[test]
    fn generic_yes_accepts_every_offer() {
        assert_eq!(accepted_names("Sim!"), vec!["Borda Recheada de Catupiry", "Refrigerante 350ml"]);
        assert_eq!(accepted_names("quero os dois").len(), 2);
    }

    #[test]
    fn named_offers_are_accepted_alone() {
        assert_eq!(accepted_names("só a borda"), vec!["Borda Recheada de Catupiry"]);
        assert_eq!(accepted_names("não, só uma coca"), vec!["Refrigerante 350ml"]);
    }

    #[test]
    fn negated_or_declined_offers_are_not_accepted() {
        assert!(accepted_names("não quero borda").is_empty());
        assert!(accepted_names("não, obrigado").is_empty());
        assert!(accepted_names("só a pizza mesmo").is_empty());
        assert!(accepted_names("hmm").is_empty());
        assert_eq!(accepted_names("sem borda, mas manda o refri"), vec!["Refrigerante 350ml"]);
        assert!(accepted_names("sem borda e sem refri, obrigado").is_empty());
    }

    #[test]
    fn yes_with_a_declined_offer_accepts_the_others() {
        assert_eq!(accepted_names("sim, mas sem refri"), vec!["Borda Recheada de Catupiry"]);
        assert_eq!(
            accepted_names("quero sim, só não quero refrigerante"),
            vec!["Borda Recheada de Catupiry"]
        );
        assert_eq!(accepted_names("pode ser, sem borda"), vec!["Refrigerante 350ml"]);
    }
}
