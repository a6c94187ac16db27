//! Words (vertex update orders) and their minimal-change enumeration.
//!
//! [`Ehrlich`] implements Knuth's Algorithm E (TAOCP 7.2.1.2): every
//! permutation of `0..n` is produced exactly once, starting from the identity,
//! and consecutive permutations differ by swapping position `0` with one other
//! position.

use std::fmt;
use std::ops::Deref;

/// A vertex update order: each of `0..n` exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(Vec<u8>);

impl Word {
    /// Returns the identity word `0, 1, ..., n-1`.
    ///
    /// # Panics
    /// Panics if `n > 256`.
    pub fn identity(n: usize) -> Self {
        assert!(n <= 256, "words store vertices as u8");
        Self((0..n).map(|v| v as u8).collect())
    }

    /// Wraps `entries` if they form a permutation of `0..entries.len()`.
    pub fn from_vec(entries: Vec<u8>) -> Option<Self> {
        is_permutation(&entries).then_some(Self(entries))
    }

    /// Copies `entries` if they form a permutation of `0..entries.len()`.
    pub fn from_slice(entries: &[u8]) -> Option<Self> {
        Self::from_vec(entries.to_vec())
    }

    /// Returns the entries.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the entries, consuming the word.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Word {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Word {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Returns whether `entries` is a permutation of `0..entries.len()`.
pub fn is_permutation(entries: &[u8]) -> bool {
    if entries.len() > 256 {
        return false;
    }
    let mut seen = [false; 256];
    for &v in entries {
        let v = usize::from(v);
        if v >= entries.len() || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

/// Returns `n!`, or `None` if it overflows a `u64`.
pub fn factorial(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, u64::checked_mul)
}

// ============================================================================
// Algorithm E
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Fresh,
    Running,
    Done,
}

/// Minimal-change generator of all `n!` words, identity first.
///
/// [`next_word`](Self::next_word) lends the current permutation without
/// allocating; the [`Iterator`] implementation copies each one into a [`Word`].
/// A generator cannot be rewound: create a new one to start over.
#[derive(Clone, Debug)]
pub struct Ehrlich {
    a: Vec<u8>,
    b: Vec<u8>,
    // c[0] is never read; indices start at 1.
    c: Vec<u8>,
    phase: Phase,
}

impl Ehrlich {
    /// Creates a generator over the permutations of `0..n`.
    ///
    /// # Panics
    /// Panics if `n > 255`.
    pub fn new(n: usize) -> Self {
        assert!(n <= 255, "words store vertices as u8");
        Self {
            a: (0..n).map(|v| v as u8).collect(),
            b: (0..n).map(|v| v as u8).collect(),
            c: vec![0; n + 1],
            phase: Phase::Fresh,
        }
    }

    /// Advances to the next permutation and returns it, or `None` once all
    /// `n!` permutations have been produced.
    pub fn next_word(&mut self) -> Option<&[u8]> {
        match self.phase {
            Phase::Fresh => self.phase = Phase::Running,
            Phase::Running => {
                if !self.step() {
                    self.phase = Phase::Done;
                    return None;
                }
            }
            Phase::Done => return None,
        }
        Some(&self.a)
    }

    /// Applies one transition; returns `false` when the sequence is exhausted.
    fn step(&mut self) -> bool {
        let n = self.a.len();
        if n <= 1 {
            return false;
        }
        let mut k = 1;
        while usize::from(self.c[k]) == k {
            self.c[k] = 0;
            k += 1;
        }
        if k == n {
            return false;
        }
        self.c[k] += 1;
        let j = usize::from(self.b[k]);
        self.a.swap(0, j);
        self.b[1..k].reverse();
        true
    }
}

impl Iterator for Ehrlich {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        self.next_word().map(|w| Word(w.to_vec()))
    }
}

/// All `n!` words in [`Ehrlich`] order, materialized once.
#[derive(Clone, Debug)]
pub struct PermutationTable {
    n: usize,
    words: Vec<Word>,
}

impl PermutationTable {
    /// Materializes every permutation of `0..n`.
    ///
    /// # Panics
    /// Panics if `n!` does not fit in memory-addressable size.
    pub fn new(n: usize) -> Self {
        let count = factorial(n)
            .and_then(|f| usize::try_from(f).ok())
            .expect("n! does not fit in usize");
        let mut words = Vec::with_capacity(count);
        words.extend(Ehrlich::new(n));
        Self { n, words }
    }

    /// Returns the word length.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the number of words, `n!`.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`: even `n = 0` has the empty word.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the `i`-th word in generation order.
    pub fn get(&self, i: usize) -> Option<&Word> {
        self.words.get(i)
    }

    /// Iterates over the words in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
