//! The randomized search tree engine
//!
//! A randomized search tree keeps no priority field. Every node caches the size of the
//! subtree it roots, and that size is the only weight the randomization needs:
//!
//! - a key inserted into a subtree of size `n` becomes that subtree's root with
//!   probability `1 / (n + 1)`, otherwise it descends one level and tries again
//! - two order-disjoint trees of sizes `m` and `n` are joined under the left root with
//!   probability `m / (m + n)` and under the right root otherwise
//!
//! Either way the resulting shape has the distribution of a tree built from a uniformly
//! shuffled insertion order, so the expected depth is `O(log n)` whatever order keys arrive in.
//!
//! All mutating functions consume the old subtree and hand back the new one. The caller
//! must store the returned link, because rotations and joins routinely change which node
//! is at the top.

use std::cmp::{self, Ordering};
use std::fmt;

use crate::Randomness;

pub(crate) type Link<K> = Option<Box<Node<K>>>;

/// A node in the tree
pub(crate) struct Node<K> {
    key: K,
    size: usize,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn new(key: K) -> Self {
        Node {
            key,
            size: 1,
            left: None,
            right: None,
        }
    }
}

/// Number of nodes under `link`, zero for an empty subtree
pub(crate) fn size<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Recompute the cached size of a node whose children changed
pub(crate) fn fix_size<K>(node: &mut Node<K>) {
    node.size = size(&node.left) + size(&node.right) + 1;
}

// Promote the left child. The promoted node takes over the subtree's cardinality.
fn rotate_right<K>(mut p: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut q) = p.left.take() else {
        return p;
    };
    p.left = q.right.take();
    q.size = p.size;
    fix_size(&mut p);
    q.right = Some(p);
    q
}

// Promote the right child
fn rotate_left<K>(mut q: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut p) = q.right.take() else {
        return q;
    };
    q.right = p.left.take();
    p.size = q.size;
    fix_size(&mut q);
    p.left = Some(q);
    p
}

/// Insert `key` so that it ends up as the root of this subtree
///
/// Equal keys go to the right, like in [`insert`].
pub(crate) fn insert_root<K: Ord>(link: Link<K>, key: K) -> Box<Node<K>> {
    let Some(mut p) = link else {
        return Box::new(Node::new(key));
    };
    if key < p.key {
        p.left = Some(insert_root(p.left.take(), key));
        // the rotation hands p's size to the new root, so it has to count the new key first
        fix_size(&mut p);
        rotate_right(p)
    } else {
        p.right = Some(insert_root(p.right.take(), key));
        fix_size(&mut p);
        rotate_left(p)
    }
}

/// Insert `key` into the subtree, returning the new subtree root
///
/// At every level the new key becomes the local root with probability `1 / (size + 1)`.
pub(crate) fn insert<K, R>(link: Link<K>, key: K, rng: &mut R) -> Box<Node<K>>
where
    K: Ord,
    R: Randomness + ?Sized,
{
    let Some(mut p) = link else {
        return Box::new(Node::new(key));
    };
    if rng.below(p.size + 1) == 0 {
        return insert_root(Some(p), key);
    }
    if key < p.key {
        p.left = Some(insert(p.left.take(), key, rng));
    } else {
        p.right = Some(insert(p.right.take(), key, rng));
    }
    fix_size(&mut p);
    p
}

/// Merge two trees where every key in `p` is `<=` every key in `q`
///
/// The precondition is not checked. Violating it yields a tree whose sizes are right but
/// whose in-order sequence is not sorted.
pub(crate) fn join<K, R>(p: Link<K>, q: Link<K>, rng: &mut R) -> Link<K>
where
    R: Randomness + ?Sized,
{
    match (p, q) {
        (None, q) => q,
        (p, None) => p,
        (Some(mut p), Some(mut q)) => {
            if rng.below(p.size + q.size) < p.size {
                p.right = join(p.right.take(), Some(q), rng);
                fix_size(&mut p);
                Some(p)
            } else {
                q.left = join(Some(p), q.left.take(), rng);
                fix_size(&mut q);
                Some(q)
            }
        }
    }
}

/// Remove one node holding `key`, returning the new subtree and whether anything was removed
pub(crate) fn remove<K, R>(link: Link<K>, key: &K, rng: &mut R) -> (Link<K>, bool)
where
    K: Ord,
    R: Randomness + ?Sized,
{
    let Some(mut p) = link else {
        return (None, false);
    };
    let removed = match key.cmp(&p.key) {
        Ordering::Equal => {
            let Node { left, right, .. } = *p;
            return (join(left, right, rng), true);
        }
        Ordering::Less => {
            let (left, removed) = remove(p.left.take(), key, rng);
            p.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove(p.right.take(), key, rng);
            p.right = right;
            removed
        }
    };
    fix_size(&mut p);
    (Some(p), removed)
}

pub(crate) fn contains<K: Ord>(link: &Link<K>, key: &K) -> bool {
    match link {
        None => false,
        Some(n) => match key.cmp(&n.key) {
            Ordering::Less => contains(&n.left, key),
            Ordering::Greater => contains(&n.right, key),
            Ordering::Equal => true,
        },
    }
}

/// In-order walk that stops descending once `out` holds `k` keys
pub(crate) fn collect_smallest<K: Clone>(link: &Link<K>, k: usize, out: &mut Vec<K>) {
    let Some(node) = link else {
        return;
    };
    if out.len() >= k {
        return;
    }
    collect_smallest(&node.left, k, out);
    if out.len() < k {
        out.push(node.key.clone());
    }
    collect_smallest(&node.right, k, out);
}

pub(crate) fn height<K>(link: &Link<K>) -> usize {
    match link {
        None => 0,
        Some(n) => 1 + cmp::max(height(&n.left), height(&n.right)),
    }
}

/// Verify every cached size, returning the subtree size when all of them hold
pub(crate) fn checked_size<K>(link: &Link<K>) -> Option<usize> {
    match link {
        None => Some(0),
        Some(n) => {
            let expected = checked_size(&n.left)? + checked_size(&n.right)? + 1;
            (n.size == expected).then_some(expected)
        }
    }
}

/// Write the indented diagram of a subtree
///
/// Nodes deeper than `max_depth` are written with a trailing ` ...` and not expanded.
pub(crate) fn render<K, W>(
    out: &mut W,
    link: &Link<K>,
    prefix: &str,
    is_left: bool,
    depth: usize,
    max_depth: Option<usize>,
) -> fmt::Result
where
    K: fmt::Display,
    W: fmt::Write + ?Sized,
{
    let Some(node) = link else {
        return Ok(());
    };
    let connector = if is_left { "├── " } else { "└── " };
    if max_depth.is_some_and(|max| depth > max) {
        return writeln!(out, "{prefix}{connector}{} ...", node.key);
    }
    writeln!(out, "{prefix}{connector}{}", node.key)?;

    let child_prefix = format!("{prefix}{}", if is_left { "│   " } else { "    " });
    render(out, &node.left, &child_prefix, true, depth + 1, max_depth)?;
    render(out, &node.right, &child_prefix, false, depth + 1, max_depth)
}

/// Release every node, children before parents, returning how many were released
pub(crate) fn teardown<K>(link: Link<K>) -> usize {
    match link {
        None => 0,
        Some(mut node) => {
            let released = teardown(node.left.take()) + teardown(node.right.take()) + 1;
            drop(node);
            released
        }
    }
}

/// In-order iterator over the keys of a tree
///
/// Created by [`RandomizedTree::iter`](crate::RandomizedTree::iter).
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: &'a Link<K>) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: size(root),
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: &'a Link<K>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
