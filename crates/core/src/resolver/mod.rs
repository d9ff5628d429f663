//! Free text → menu item.
//!
//! Resolution runs four strategies in a fixed order and the first hit wins:
//! exact containment, alias table, keyword groups, fuzzy scoring. Only
//! available items are ever returned and ties go to the first item in
//! catalog order.

pub mod tables;

use std::collections::BTreeSet;

use crate::catalog::MenuCatalog;
use crate::context::ConversationContext;
use crate::domain::menu::MenuItem;
use crate::text::similarity::normalized_similarity;
use crate::text::{contains_phrase, normalize, words};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolverSettings {
    pub min_query_chars: usize,
    pub keyword_threshold: f64,
    pub name_threshold: f64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self { min_query_chars: 3, keyword_threshold: 0.7, name_threshold: 0.6 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatchKind {
    Exact,
    Alias,
    KeywordGroup,
    Fuzzy { score: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResolutionSource {
    Direct(MatchKind),
    /// Recalled from the last item discussed.
    Context,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<'m> {
    pub item: &'m MenuItem,
    pub source: ResolutionSource,
}

#[derive(Clone, Debug)]
struct Alias {
    key: String,
    canonical: String,
}

#[derive(Clone, Debug)]
pub struct MenuResolver {
    settings: ResolverSettings,
    aliases: Vec<Alias>,
    keyword_groups: Vec<Vec<String>>,
    stop_words: BTreeSet<String>,
}

impl Default for MenuResolver {
    fn default() -> Self {
        Self::new(ResolverSettings::default())
    }
}

struct Candidate<'m> {
    item: &'m MenuItem,
    name: String,
}

impl MenuResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self::with_tables(settings, tables::ALIASES, tables::KEYWORD_GROUPS, tables::STOP_WORDS)
    }

    pub fn with_tables(
        settings: ResolverSettings,
        aliases: &[(&str, &str)],
        keyword_groups: &[&[&str]],
        stop_words: &[&str],
    ) -> Self {
        Self {
            settings,
            aliases: aliases
                .iter()
                .map(|(key, canonical)| Alias { key: normalize(key), canonical: normalize(canonical) })
                .collect(),
            keyword_groups: keyword_groups
                .iter()
                .map(|group| group.iter().map(|word| normalize(word)).collect())
                .collect(),
            stop_words: stop_words.iter().map(|word| normalize(word)).collect(),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn resolve<'m>(&self, query: &str, menu: &'m [MenuItem]) -> Option<&'m MenuItem> {
        self.resolve_match(query, menu).map(|(item, _)| item)
    }

    /// Direct resolution, falling back to the item remembered in `context`
    /// when the text itself names nothing.
    pub fn resolve_in_context<'m>(
        &self,
        query: &str,
        catalog: &'m MenuCatalog,
        context: &ConversationContext,
    ) -> Option<Resolution<'m>> {
        if let Some((item, kind)) = self.resolve_match(query, catalog.items()) {
            return Some(Resolution { item, source: ResolutionSource::Direct(kind) });
        }
        context
            .recalled_item(catalog)
            .map(|item| Resolution { item, source: ResolutionSource::Context })
    }

    pub fn resolve_match<'m>(
        &self,
        query: &str,
        menu: &'m [MenuItem],
    ) -> Option<(&'m MenuItem, MatchKind)> {
        let query = normalize(query);
        if query.chars().count() < self.settings.min_query_chars {
            return None;
        }
        if words(&query).all(|word| self.is_stop_word(word)) {
            return None;
        }

        let candidates: Vec<Candidate<'m>> = menu
            .iter()
            .filter(|item| item.available)
            .map(|item| Candidate { item, name: normalize(&item.name) })
            .collect();
        if candidates.is_empty() {
            return None;
        }

        if let Some(item) = exact_match(&query, &candidates) {
            return Some((item, MatchKind::Exact));
        }
        if let Some(item) = self.alias_match(&query, &candidates) {
            return Some((item, MatchKind::Alias));
        }
        if let Some(item) = self.keyword_group_match(&query, &candidates) {
            return Some((item, MatchKind::KeywordGroup));
        }
        self.fuzzy_match(&query, &candidates).map(|(item, score)| (item, MatchKind::Fuzzy { score }))
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn alias_match<'m>(&self, query: &str, candidates: &[Candidate<'m>]) -> Option<&'m MenuItem> {
        self.aliases
            .iter()
            .filter(|alias| contains_phrase(query, &alias.key))
            .find_map(|alias| {
                candidates
                    .iter()
                    .find(|candidate| {
                        candidate.name == alias.canonical
                            || contains_phrase(&candidate.name, &alias.canonical)
                    })
                    .map(|candidate| candidate.item)
            })
    }

    fn keyword_group_match<'m>(
        &self,
        query: &str,
        candidates: &[Candidate<'m>],
    ) -> Option<&'m MenuItem> {
        self.keyword_groups
            .iter()
            .filter(|group| group.iter().all(|word| contains_phrase(query, word)))
            .find_map(|group| {
                candidates
                    .iter()
                    .find(|candidate| group.iter().all(|word| contains_phrase(&candidate.name, word)))
                    .map(|candidate| candidate.item)
            })
    }

    fn fuzzy_match<'m>(
        &self,
        query: &str,
        candidates: &[Candidate<'m>],
    ) -> Option<(&'m MenuItem, f64)> {
        let query_words: Vec<&str> = self.significant_words(query).collect();
        let mut best: Option<(&'m MenuItem, f64)> = None;

        for candidate in candidates {
            let mut score = None;

            let name_score = normalized_similarity(query, &candidate.name);
            if name_score >= self.settings.name_threshold {
                score = Some(name_score);
            }

            for query_word in &query_words {
                for name_word in self.significant_words(&candidate.name) {
                    let word_score = normalized_similarity(query_word, name_word);
                    if word_score >= self.settings.keyword_threshold
                        && score.map_or(true, |current| word_score > current)
                    {
                        score = Some(word_score);
                    }
                }
            }

            if let Some(score) = score {
                // strictly greater keeps the first-listed item on ties
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((candidate.item, score));
                }
            }
        }

        best
    }

    fn significant_words<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        words(text).filter(move |word| word.chars().count() > 2 && !self.is_stop_word(word))
    }
}

fn exact_match<'m>(query: &str, candidates: &[Candidate<'m>]) -> Option<&'m MenuItem> {
    candidates
        .iter()
        .find(|candidate| candidate.name == query)
        .or_else(|| candidates.iter().find(|candidate| candidate.name.contains(query)))
        .map(|candidate| candidate.item)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{MatchKind, MenuResolver, ResolutionSource, ResolverSettings};
    use crate::catalog::fixtures::demo_menu;
    use crate::catalog::MenuCatalog;
    use crate::context::ConversationContext;
    use crate::domain::menu::{MenuCategory, MenuItem, MenuItemId};

    fn small_menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new("1", "Pizza Margherita", Decimal::new(3590, 2), MenuCategory::Pizza)
                .with_ingredients(["mussarela", "manjericao", "tomate"]),
            MenuItem::new("2", "Pizza Calabresa", Decimal::new(5500, 2), MenuCategory::Pizza),
            MenuItem::new("3", "Pizza Frango com Catupiry", Decimal::new(5500, 2), MenuCategory::Pizza),
            MenuItem::new("4", "Pizza Frango Especial", Decimal::new(6300, 2), MenuCategory::Pizza),
            MenuItem::new("5", "Pizza Portuguesa", Decimal::new(6000, 2), MenuCategory::Pizza)
                .unavailable(),
            MenuItem::new("6", "Borda Catupiry", Decimal::new(800, 2), MenuCategory::Side),
            MenuItem::new("7", "Borda Catupiry com Bacon", Decimal::new(1200, 2), MenuCategory::Side),
            MenuItem::new("8", "Coca Cola 350ml", Decimal::new(550, 2), MenuCategory::Beverage),
        ]
    }

    fn name_of(item: Option<&MenuItem>) -> Option<&str> {
        item.map(|item| item.name.as_str())
    }

    #[test]
    fn every_available_item_resolves_by_its_exact_name() {
        let resolver = MenuResolver::default();
        let catalog = demo_menu();
        for item in catalog.available() {
            let resolved = resolver.resolve(&item.name, catalog.items());
            assert_eq!(name_of(resolved), Some(item.name.as_str()), "{} did not resolve", item.name);
        }

        let menu = small_menu();
        for item in menu.iter().filter(|item| item.available) {
            assert_eq!(resolver.resolve(&item.name, &menu).map(|found| &found.id), Some(&item.id));
        }
    }

    #[test]
    fn short_queries_never_resolve() {
        let resolver = MenuResolver::default();
        let menu = small_menu();
        for query in ["", "a", "ca", "!!", " p ", "é"] {
            assert!(resolver.resolve(query, &menu).is_none(), "{query:?} resolved");
        }
    }

    #[test]
    fn generic_phrases_never_resolve() {
        let resolver = MenuResolver::default();
        let menu = small_menu();
        for query in ["quero", "oi, tudo bem?", "cardápio", "quero uma pizza", "quanto custa"] {
            assert!(resolver.resolve(query, &menu).is_none(), "{query:?} resolved");
        }
    }

    #[test]
    fn strategies_run_in_priority_order() {
        let resolver = MenuResolver::default();
        let menu = small_menu();

        let (item, kind) = resolver.resolve_match("margherita", &menu).expect("exact hit");
        assert_eq!(item.name, "Pizza Margherita");
        assert_eq!(kind, MatchKind::Exact);

        let (item, kind) =
            resolver.resolve_match("quanto custa a marguerita?", &menu).expect("alias hit");
        assert_eq!(item.name, "Pizza Margherita");
        assert_eq!(kind, MatchKind::Alias);

        let (item, kind) =
            resolver.resolve_match("me fala da borda de catupiry com bacon", &menu).expect("group");
        assert_eq!(item.name, "Borda Catupiry com Bacon");
        assert_eq!(kind, MatchKind::KeywordGroup);

        let (item, kind) =
            resolver.resolve_match("tem frango especial?", &menu).expect("keyword group hit");
        assert_eq!(item.name, "Pizza Frango Especial");
        assert_eq!(kind, MatchKind::KeywordGroup);

        let (item, kind) = resolver.resolve_match("calabreza", &menu).expect("alias hit");
        assert_eq!(item.name, "Pizza Calabresa");
        assert_eq!(kind, MatchKind::Alias);
    }

    #[test]
    fn fuzzy_fallback_handles_typos_and_prefers_catalog_order_on_ties() {
        let resolver = MenuResolver::with_tables(ResolverSettings::default(), &[], &[], &["pizza"]);
        let menu = small_menu();

        let (item, kind) = resolver.resolve_match("margeritha", &menu).expect("fuzzy hit");
        assert_eq!(item.name, "Pizza Margherita");
        assert!(matches!(kind, MatchKind::Fuzzy { score } if score >= 0.7));

        // both frango pizzas share the word, the first listed wins
        let (item, _) = resolver.resolve_match("frango", &menu).expect("fuzzy hit");
        assert_eq!(item.id, MenuItemId::new("3"));
    }

    #[test]
    fn unavailable_items_are_never_returned() {
        let resolver = MenuResolver::default();
        let menu = small_menu();
        assert!(resolver.resolve("Pizza Portuguesa", &menu).is_none());
        assert!(resolver.resolve("quanto custa a portuguesa", &menu).is_none());
    }

    #[test]
    fn empty_menu_resolves_nothing() {
        let resolver = MenuResolver::default();
        assert!(resolver.resolve("margherita", &[]).is_none());
    }

    #[test]
    fn thresholds_are_configurable() {
        let strict = MenuResolver::with_tables(
            ResolverSettings { min_query_chars: 3, keyword_threshold: 0.95, name_threshold: 0.95 },
            &[],
            &[],
            &[],
        );
        let menu = small_menu();
        assert!(strict.resolve("calabreza", &menu).is_none());

        let loose = MenuResolver::with_tables(ResolverSettings::default(), &[], &[], &[]);
        assert_eq!(name_of(loose.resolve("calabreza", &menu)), Some("Pizza Calabresa"));
    }

    #[test]
    fn alias_wins_over_fuzzy_candidates() {
        let resolver = MenuResolver::with_tables(
            ResolverSettings::default(),
            &[("coquinha", "coca cola")],
            &[],
            &[],
        );
        let menu = small_menu();
        let (item, kind) = resolver.resolve_match("uma coquinha gelada", &menu).expect("alias");
        assert_eq!(item.name, "Coca Cola 350ml");
        assert_eq!(kind, MatchKind::Alias);
    }

    #[test]
    fn context_fallback_recalls_last_item() {
        let resolver = MenuResolver::default();
        let catalog = MenuCatalog::new(small_menu());
        let mut context = ConversationContext::default();

        assert!(resolver.resolve_in_context("quanto custa?", &catalog, &context).is_none());

        context.last_item = Some(MenuItemId::new("2"));
        let resolution =
            resolver.resolve_in_context("quanto custa?", &catalog, &context).expect("recalled");
        assert_eq!(resolution.item.name, "Pizza Calabresa");
        assert_eq!(resolution.source, ResolutionSource::Context);

        let resolution = resolver
            .resolve_in_context("e a margherita?", &catalog, &context)
            .expect("direct beats context");
        assert_eq!(resolution.item.name, "Pizza Margherita");
        assert!(matches!(resolution.source, ResolutionSource::Direct(_)));
    }
}
