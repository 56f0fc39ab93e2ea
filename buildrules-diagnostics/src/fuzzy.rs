// Fuzzy matching for "did you mean?" suggestions

use strsim::jaro_winkler;

/// Similarity above which a registered name is offered as a suggestion
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Find similar names using fuzzy matching (Jaro-Winkler distance)
/// Returns up to `max_suggestions` names with similarity > threshold, best first
pub fn find_similar_names<'a, I>(
    target: &str,
    candidates: I,
    threshold: f64,
    max_suggestions: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, f64)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (candidate, jaro_winkler(target, candidate)))
        .filter(|(_, score)| *score > threshold)
        .collect();

    // Highest score first; equal scores fall back to name order so output is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typo_is_suggested() {
        let names = ["Core", "CoreUObject", "Engine", "InputCore", "AIModule"];
        let found = find_similar_names("Engnie", names, DEFAULT_THRESHOLD, 3);
        assert_eq!(found.first().map(String::as_str), Some("Engine"));
    }

    #[test]
    fn test_unrelated_names_are_not_suggested() {
        let names = ["Core", "Engine"];
        assert!(find_similar_names("Landscape", names, DEFAULT_THRESHOLD, 3).is_empty());
    }

    #[test]
    fn test_limit_is_respected() {
        let names = ["ModA", "ModB", "ModC", "ModD"];
        assert_eq!(find_similar_names("ModX", names, 0.5, 2).len(), 2);
    }
}
