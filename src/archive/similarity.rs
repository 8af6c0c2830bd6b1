//! File name similarity used by picky archival.

/// Length of the longest common substring of `a` and `b`, in chars.
fn longest_common_substring(a: &[char], b: &[char]) -> usize {
    // Rolling single row of the classic DP table
    let mut row = vec![0usize; b.len() + 1];
    let mut best = 0;

    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y { diagonal + 1 } else { 0 };
            best = best.max(row[j + 1]);
            diagonal = above;
        }
    }
    best
}

/// Longest common substring length divided by the mean length of both names.
///
/// Returns a value in `0.0..=1.0`; identical names score `1.0`.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mean = (a.len() + b.len()) as f64 / 2.0;
    if mean == 0.0 {
        return 0.0;
    }
    longest_common_substring(&a, &b) as f64 / mean
}
