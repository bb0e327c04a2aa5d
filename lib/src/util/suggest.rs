//! Near-match suggestions for names that failed to resolve.

use std::collections::BTreeSet;

use crate::error::Suggestions;

/// Largest edit distance still considered a typo.
pub const MAX_DISTANCE: usize = 3;

/// Returns every candidate within [`MAX_DISTANCE`] edits of `target`,
/// closest first. Comparison ignores ASCII case.
pub fn suggest<'a>(target: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let target = target.to_lowercase();

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|candidate| (levenshtein(&target, &candidate.to_lowercase()), candidate))
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .collect();
    scored.sort_unstable();

    scored.into_iter().map(|(_, c)| c.to_owned()).collect()
}

/// Like [`suggest`], but falls back to listing every candidate when nothing
/// is close enough.
pub fn suggest_or_all<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Suggestions {
    let candidates: BTreeSet<&str> = candidates.into_iter().collect();
    let similar = suggest(target, candidates.iter().copied());
    if similar.is_empty() {
        Suggestions::All(candidates.into_iter().map(ToOwned::to_owned).collect())
    } else {
        Suggestions::Similar(similar)
    }
}

/// Classic Levenshtein distance, unit cost for insertion, deletion and
/// substitution. Keeps a single row of the table.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "", 3)]
    #[case("", "abc", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("publishing-api", "publsihing-api", 2)]
    #[case("publishing-api", "publishing-api-2", 2)]
    #[case("flaw", "lawn", 2)]
    fn levenshtein_works(#[case] a: &str, #[case] b: &str, #[case] should: usize) {
        assert_eq!(levenshtein(a, b), should);
        assert_eq!(levenshtein(b, a), should);
    }

    #[test]
    fn suggest_finds_typos() {
        let candidates = ["publishing-api-2", "publsihing-api", "frontend"];
        let found = suggest("publishing-api", candidates);
        assert!(found.contains(&"publsihing-api".to_owned()));
        assert!(!found.contains(&"frontend".to_owned()));
    }

    #[test]
    fn suggest_ignores_case() {
        let found = suggest("BACKEND", ["backend", "frontend"]);
        assert_eq!(found, vec!["backend"]);
    }

    #[test]
    fn suggest_orders_by_distance() {
        let found = suggest("backend", ["backends-2", "backend-1", "backenx"]);
        assert_eq!(found, vec!["backenx", "backend-1", "backends-2"]);
    }

    #[test]
    fn suggest_or_all_falls_back() {
        let suggestions = suggest_or_all("zzzzzzzz", ["frontend", "backend", "backend"]);
        assert_eq!(
            suggestions,
            Suggestions::All(vec!["backend".to_owned(), "frontend".to_owned()])
        );
    }

    #[test]
    fn suggest_or_all_prefers_similar() {
        let suggestions = suggest_or_all("backnd", ["frontend", "backend"]);
        assert_eq!(suggestions, Suggestions::Similar(vec!["backend".to_owned()]));
    }
}
