//! A randomized search tree: a binary search tree kept balanced in expectation by
//! randomized root insertion and randomized join, without explicit priority keys.
//!
//! Martínez, C., & Roura, S. (1998). *Randomized Binary Search Trees*. Journal of the ACM, 45(2), 288–323.
//!
//! Every node caches the size of its subtree. Those sizes drive all the randomness: a new
//! key becomes the root of a subtree of size `n` with probability `1 / (n + 1)`, and a
//! join of trees of sizes `m` and `n` keeps the left root with probability `m / (m + n)`.
//! The expected depth is logarithmic for any insertion order, sorted input included.
//!
//! ```
//! use rstree::RandomizedTree;
//!
//! let mut tree = RandomizedTree::with_seed(42);
//! tree.extend([5, 3, 8, 1, 4]);
//!
//! assert_eq!(tree.smallest(3), vec![1, 3, 4]);
//! assert!(tree.contains(&8));
//!
//! tree.remove(&3);
//! assert!(!tree.contains(&3));
//! assert_eq!(tree.len(), 4);
//! ```

mod error;
pub mod loader;
mod rst;
pub mod session;

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use crate::error::{Error, Result};
pub use crate::rst::Iter;

use crate::rst::Link;

/// A source of uniform draws for the tree's structural choices
///
/// Implemented for every [`rand::Rng`]. Tests can supply their own implementation to
/// force a particular branch.
pub trait Randomness {
    /// Draw uniformly from `0..bound`. `bound` is always at least one.
    fn below(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> Randomness for R {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// A randomized search tree
///
/// Duplicate keys are allowed; an equal key is routed to the right subtree on insertion
/// and [`remove`](Self::remove) excises one occurrence at a time.
///
/// The tree owns its random source. [`new`](RandomizedTree::new) seeds a [`StdRng`] from
/// the operating system, [`with_seed`](RandomizedTree::with_seed) gives reproducible
/// shapes, and [`with_rng`](RandomizedTree::with_rng) accepts any [`Randomness`].
pub struct RandomizedTree<K, R = StdRng> {
    root: Link<K>,
    rng: R,
}

impl<K: Ord> RandomizedTree<K, StdRng> {
    /// Create an empty tree with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty tree whose shapes are reproducible for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<K: Ord> Default for RandomizedTree<K, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, R: Randomness> RandomizedTree<K, R> {
    /// Create an empty tree drawing from `rng`
    pub fn with_rng(rng: R) -> Self {
        RandomizedTree { root: None, rng }
    }

    /// Number of keys in the tree
    pub fn len(&self) -> usize {
        rst::size(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        rst::height(&self.root)
    }

    /// Insert a key
    pub fn insert(&mut self, key: K) {
        self.root = Some(rst::insert(self.root.take(), key, &mut self.rng));
    }

    /// Remove one occurrence of `key`. Returns `false` if the key was not present.
    pub fn remove(&mut self, key: &K) -> bool {
        let (root, removed) = rst::remove(self.root.take(), key, &mut self.rng);
        self.root = root;
        removed
    }

    /// Check if the tree contains a key
    pub fn contains(&self, key: &K) -> bool {
        rst::contains(&self.root, key)
    }

    /// The `k` smallest keys in ascending order, or every key if the tree has fewer
    ///
    /// Only the part of the tree holding those keys is visited.
    pub fn smallest(&self, k: usize) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(k.min(self.len()));
        rst::collect_smallest(&self.root, k, &mut out);
        out
    }

    /// Merge two trees into one
    ///
    /// Every key in `self` must be less than or equal to every key in `other`. This is
    /// not checked: a violation produces a tree with correct sizes but out-of-order keys.
    /// The merged tree keeps `self`'s random source.
    pub fn join(mut self, mut other: Self) -> Self {
        let left = self.root.take();
        let right = other.root.take();
        self.root = rst::join(left, right, &mut self.rng);
        self
    }

    /// Release every node, returning how many were released
    pub fn clear(&mut self) -> usize {
        let released = rst::teardown(self.root.take());
        log::debug!("released {released} nodes");
        released
    }

    /// Iterate over the keys in ascending order
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root)
    }

    /// A printable diagram of the tree's shape
    ///
    /// Nodes deeper than `max_depth` (the root is at depth zero) are shown with a trailing
    /// ` ...` instead of their subtree. `None` prints the whole tree. An empty tree prints
    /// nothing.
    ///
    /// ```
    /// use rstree::RandomizedTree;
    ///
    /// let mut tree = RandomizedTree::with_seed(3);
    /// tree.extend([2, 1, 3]);
    /// println!("{}", tree.dump(Some(4)));
    /// ```
    pub fn dump(&self, max_depth: Option<usize>) -> Dump<'_, K> {
        Dump {
            root: &self.root,
            max_depth,
        }
    }

    /// Check every cached subtree size and the ordering of the keys
    pub fn is_consistent(&self) -> bool {
        let sizes_hold = rst::checked_size(&self.root).is_some();
        let mut keys = self.iter();
        let ordered = match keys.next() {
            None => true,
            Some(first) => keys
                .try_fold(first, |prev, key| (prev <= key).then_some(key))
                .is_some(),
        };
        sizes_hold && ordered
    }
}

impl<K, R> Drop for RandomizedTree<K, R> {
    fn drop(&mut self) {
        rst::teardown(self.root.take());
    }
}

impl<K: Ord, R: Randomness> Extend<K> for RandomizedTree<K, R> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for RandomizedTree<K, StdRng> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K: Ord, R: Randomness> IntoIterator for &'a RandomizedTree<K, R> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: Ord + fmt::Debug, R: Randomness> fmt::Debug for RandomizedTree<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Tree diagram returned by [`RandomizedTree::dump`]
pub struct Dump<'a, K> {
    root: &'a Link<K>,
    max_depth: Option<usize>,
}

impl<K: fmt::Display> fmt::Display for Dump<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rst::render(f, self.root, "", true, 0, self.max_depth)
    }
}
