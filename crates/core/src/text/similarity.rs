use super::normalize::normalize;

/// Score how alike two strings are, in `[0, 1]`, after normalizing both.
///
/// Identical strings score 1.0. When one contains the other the score is
/// capped at `0.9 * shorter / longer`, so a short query never looks like a
/// perfect hit on a long item name. Otherwise the Levenshtein distance is
/// turned into a ratio of the longer length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    normalized_similarity(&a, &b)
}

/// [`similarity`] for inputs that are already normalized.
pub(crate) fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return if a.is_empty() && b.is_empty() { 1.0 } else { 0.0 };
    }
    if a == b {
        return 1.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let max_len = len_a.max(len_b);

    if a.contains(b) || b.contains(a) {
        let min_len = len_a.min(len_b);
        return (min_len as f64 / max_len as f64) * 0.9;
    }

    let distance = strsim::levenshtein(a, b).min(max_len);
    (max_len - distance) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::similarity;

    #[test]
    fn identical_and_empty_inputs() {
        assert_eq!(similarity("margherita", "margherita"), 1.0);
        assert_eq!(similarity("Calábresa", "calabresa"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "pizza"), 0.0);
        assert_eq!(similarity("pizza", ""), 0.0);
        assert_eq!(similarity("???", "pizza"), 0.0);
    }

    #[test]
    fn containment_is_capped_below_one() {
        let score = similarity("margherita", "pizza margherita");
        let expected = (10.0 / 16.0) * 0.9;
        assert!((score - expected).abs() < 1e-9, "score {score} != {expected}");

        let reversed = similarity("pizza margherita", "margherita");
        assert!((reversed - expected).abs() < 1e-9);
        assert!(score < 0.9);
    }

    #[test]
    fn edit_distance_ratio_for_typos() {
        // one substitution over nine characters
        let score = similarity("calabreza", "calabresa");
        assert!((score - 8.0 / 9.0).abs() < 1e-9);

        let far = similarity("coca", "strogonoff");
        assert!(far < 0.3, "unrelated words should score low, got {far}");
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let pairs = [
            ("a", "b"),
            ("abc", "xyz"),
            ("pizza", "pizzaria"),
            ("guarana", "guaraná 350ml"),
            ("4 queijos", "quatro queijos"),
        ];
        for (a, b) in pairs {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} / {b} scored {score}");
        }
    }
}
