// Token-set similarity on top of an Indel-normalized ratio
use std::collections::BTreeSet;

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Insertions plus deletions needed to turn `a` into `b`.
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

/// Normalized Indel similarity, 0-100. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    100.0 * (1.0 - indel_distance(a, b) as f64 / total as f64)
}

/// Order- and duplicate-insensitive similarity, 0-100.
///
/// Both inputs are split on whitespace into token sets. If one set contains
/// the other the score is 100. Otherwise the best of three comparisons wins:
/// the two sorted differences against each other, and the sorted
/// intersection against the intersection followed by either difference.
/// Returns 0 when either input has no tokens.
pub fn token_set_ratio(s1: &str, s2: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = s1.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = s2.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersect: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");
    let ab_len = diff_ab_joined.chars().count();
    let ba_len = diff_ba_joined.chars().count();
    let sect_len = intersect.join(" ").chars().count();

    let result = ratio(&diff_ab_joined, &diff_ba_joined);
    if sect_len == 0 {
        return result;
    }

    // "sect" vs "sect diff": the distance is the separator plus the diff.
    let sect_ab_dist = 1 + ab_len;
    let sect_ba_dist = 1 + ba_len;
    let sect_ab_ratio = 100.0 * (1.0 - sect_ab_dist as f64 / (2 * sect_len + sect_ab_dist) as f64);
    let sect_ba_ratio = 100.0 * (1.0 - sect_ba_dist as f64 / (2 * sect_len + sect_ba_dist) as f64);

    result.max(sect_ab_ratio).max(sect_ba_ratio)
}
