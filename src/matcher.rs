//! Sequence alignment by longest matching blocks.
//!
//! The matcher finds the longest contiguous block common to both sequences,
//! then recurses into the pieces to its left and right. The resulting blocks
//! are turned into opcodes describing how to turn `a` into `b`. This favours
//! alignments that read naturally to people over minimal edit scripts.
//!
//! When `b` is long, elements that occur in more than about 1% of its
//! positions are left out of the match index. This keeps frequent characters
//! such as spaces from producing long chains of tiny, meaningless matches.
//!
//! # Examples
//!
//! ```
//! use controldiff::matcher::{SequenceMatcher, Tag};
//!
//! let a: Vec<char> = "abcd".chars().collect();
//! let b: Vec<char> = "abxd".chars().collect();
//! let tags: Vec<Tag> = SequenceMatcher::new(&a, &b)
//!     .opcodes()
//!     .into_iter()
//!     .map(|op| op.tag)
//!     .collect();
//!
//! assert_eq!(tags, vec![Tag::Equal, Tag::Replace, Tag::Equal]);
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// Minimum length of `b` before popular elements are dropped from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A block where `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Kind of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `a[a_range] == b[b_range]`
    Equal,
    /// `b[b_range]` should be inserted, `a_range` is empty
    Insert,
    /// `a[a_range]` should be deleted, `b_range` is empty
    Delete,
    /// `a[a_range]` should be replaced by `b[b_range]`
    Replace,
}

/// One step of the edit script from `a` to `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every non-popular element of `b`, ascending.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= threshold);
        }

        Self { a, b, b2j }
    }

    /// Finds the longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among blocks of maximal size, the one starting earliest in `a` wins,
    /// and of those the one starting earliest in `b`. A block of size zero
    /// means there is no common element.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] is the length of the longest match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular elements are not indexed; grow the block over them.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Match {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// Returns the matching blocks in ascending order.
    ///
    /// Adjacent blocks are merged. The last entry is always the sentinel
    /// `Match { a: a.len(), b: b.len(), size: 0 }`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        blocks.sort_by_key(|m| (m.a, m.b, m.size));

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            if let Some(last) = merged.last_mut() {
                if last.a + last.size == m.a && last.b + last.size == m.b {
                    last.size += m.size;
                    continue;
                }
            }
            merged.push(m);
        }
        merged.push(Match {
            a: la,
            b: lb,
            size: 0,
        });

        merged
    }

    /// Returns the opcodes turning `a` into `b`.
    ///
    /// The ranges of consecutive opcodes are contiguous and together cover
    /// both sequences completely.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut opcodes = Vec::new();
        let (mut i, mut j) = (0, 0);

        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(Tag::Replace),
                (true, false) => Some(Tag::Delete),
                (false, true) => Some(Tag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode {
                    tag,
                    a: i..m.a,
                    b: j..m.b,
                });
            }

            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                opcodes.push(Opcode {
                    tag: Tag::Equal,
                    a: m.a..i,
                    b: m.b..j,
                });
            }
        }

        opcodes
    }

    /// Similarity in `[0, 1]`: twice the matched elements over the total.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a = chars("ab ab");
        let b = chars("ab");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, a.len(), 0, b.len());
        assert_eq!(m, Match { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn test_longest_match_none() {
        let a = chars("abc");
        let b = chars("xyz");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 3, 0, 3);
        assert_eq!(m.size, 0);
    }

    #[test]
    fn test_popular_elements_dropped_from_index() {
        let b: Vec<char> = std::iter::repeat('x').take(300).collect();
        let matcher = SequenceMatcher::new(&b, &b);
        assert!(matcher.b2j.is_empty());
    }
}
