//! Ratcliff/Obershelp sequence similarity.
//!
//! `ratio = 2 * M / T`, where `T` is the combined length of both sequences and
//! `M` is the total size of the matching blocks found by repeatedly taking
//! the longest common substring and recursing on the pieces either side of
//! it. Ties for the longest block go to the earliest position in `a`, then in
//! `b`. When `b` is 200 characters or longer, characters that make up more
//! than 1% of it are not used to seed a block, though blocks may still extend
//! across them.

use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of `size` equal elements at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Similarity of two strings in `[0, 1]`, compared character by character.
///
/// Two empty strings are identical (`1.0`).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.size).sum();
    2.0 * matched as f64 / total as f64
}

/// All matching blocks between `a` and `b`, ordered by position.
pub fn matching_blocks<T: Eq + std::hash::Hash + Copy>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let index = index_b(b);
    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(a, b, &index, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }
        if alo < block.a_start && blo < block.b_start {
            queue.push((alo, block.a_start, blo, block.b_start));
        }
        let (a_end, b_end) = (block.a_start + block.size, block.b_start + block.size);
        if a_end < ahi && b_end < bhi {
            queue.push((a_end, ahi, b_end, bhi));
        }
        blocks.push(block);
    }

    blocks.sort_by_key(|m| (m.a_start, m.b_start));
    blocks
}

fn index_b<T: Eq + std::hash::Hash + Copy>(b: &[T]) -> HashMap<T, Vec<usize>> {
    let mut index: HashMap<T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        index.entry(*item).or_default().push(j);
    }
    if b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        index.retain(|_, positions| positions.len() <= limit);
    }
    index
}

fn longest_match<T: Eq + std::hash::Hash + Copy>(
    a: &[T],
    b: &[T],
    index: &HashMap<T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // run_len[j] = length of the common suffix ending at a[i - 1], b[j]
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_run_len = HashMap::new();
        if let Some(positions) = index.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_len = next_run_len;
    }

    // Grow across elements the index skipped.
    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < ahi
        && best_j + best_size < bhi
        && a[best_i + best_size] == b[best_j + best_size]
    {
        best_size += 1;
    }

    MatchingBlock {
        a_start: best_i,
        b_start: best_j,
        size: best_size,
    }
}
