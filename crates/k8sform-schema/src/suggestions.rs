//! "Did you mean" suggestions for unknown attribute and type names

/// Maximum edit distance for suggestions
pub const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A candidate close to the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches<'a, I>(input: &str, candidates: I, max_results: usize) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.text.cmp(&b.text)));
    suggestions.truncate(max_results);
    suggestions
}

/// Single best suggestion formatted as a hint
pub fn did_you_mean<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    find_closest_matches(input, candidates, 1)
        .into_iter()
        .next()
        .map(|s| format!("Did you mean {:?}?", s.text))
}
