//! "Did you mean?" ranking.
//!
//! Candidates are scored by normalized Levenshtein similarity,
//! `1 - distance / max(len_a, len_b)` over chars, so identical names
//! score `1.0` and names with nothing in common score `0.0`.

/// Levenshtein edit distance between two strings, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // two-row table
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Normalized similarity in `[0.0, 1.0]`.
#[expect(
    clippy::cast_precision_loss,
    reason = "identifier lengths are far below f64 mantissa precision"
)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Candidates scoring at least `min_similarity`, best first.
///
/// Ties are broken alphabetically and duplicate candidates collapse to one.
/// At most `max_results` are returned.
pub fn rank_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    min_similarity: f64,
    max_results: usize,
) -> Vec<&'a str> {
    if name.is_empty() || max_results == 0 {
        return Vec::new();
    }

    let mut matches: Vec<(&str, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let score = similarity(name, candidate);
            (score >= min_similarity).then_some((candidate, score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    matches.dedup_by(|a, b| a.0 == b.0);

    matches
        .into_iter()
        .take(max_results)
        .map(|(s, _)| s)
        .collect()
}
