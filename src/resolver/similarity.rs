//! Gestalt pattern matching (Ratcliff/Obershelp).
//!
//! `ratio(a, b) = 2·M / (|a| + |b|)` where `M` counts the characters of the longest common
//! block, plus recursively the longest blocks left and right of it. Lengths are in chars.

/// Similarity in `[0, 1]`; two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest common run inside `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
/// Earliest start in `a`, then in `b`, wins among equally long runs.
fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let width = b_hi - b_lo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let mut best = (a_lo, b_lo, 0);

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let col = j - b_lo + 1;
            if a[i] == b[j] {
                let run = prev[col - 1] + 1;
                curr[col] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                curr[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
