use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize free text for comparison.
///
/// Lower-cases, decomposes accented characters and drops the combining marks,
/// replaces every non-alphanumeric character with a space, then collapses
/// whitespace runs and trims. Idempotent.
///
/// ```
/// use frajola_core::text::normalize;
///
/// assert_eq!(normalize("Calábrésa!!"), "calabresa");
/// assert_eq!(normalize("  Coca-Cola   350ml "), "coca cola 350ml");
/// ```
pub fn normalize(text: &str) -> String {
    // Lower-case before decomposing: some lower-case mappings introduce
    // combining marks that must be stripped in the same pass.
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|character| !is_combining_mark(*character))
        .map(|character| if character.is_alphanumeric() { character } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split already-normalized text into words.
pub fn words(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}

/// Whole-word phrase containment over normalized text.
///
/// `contains_phrase("quero uma coca", "coca")` is true, while
/// `contains_phrase("coca cola", "ola")` is not.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let haystack = format!(" {normalized} ");
    let needle = format!(" {phrase} ");
    haystack.contains(&needle)
}
