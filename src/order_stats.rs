// 🌲 Order-Statistics Tree - sorted multiset with rank queries
// AVL tree stored in an arena. Equal values share one node with a
// multiplicity; every node also carries the total multiplicity of its
// subtree so `select` can descend by rank.
//
// insert: O(log d), select: O(log d), where d = distinct values

use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Node {
    value: u64,
    multiplicity: usize,
    /// Sum of multiplicities in this subtree
    size: usize,
    height: i32,
    left: Option<usize>,
    right: Option<usize>,
}

impl Node {
    fn leaf(value: u64) -> Self {
        Node {
            value,
            multiplicity: 1,
            size: 1,
            height: 1,
            left: None,
            right: None,
        }
    }
}

// ============================================================================
// ORDER-STATISTICS TREE
// ============================================================================

/// OrderStatisticsTree - ascending multiset of `u64` values
#[derive(Debug, Clone, Default)]
pub struct OrderStatisticsTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl OrderStatisticsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of values, duplicates included
    pub fn len(&self) -> usize {
        self.size(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of distinct values
    pub fn distinct_len(&self) -> usize {
        self.nodes.len()
    }

    /// Insert one occurrence of `value`
    pub fn insert(&mut self, value: u64) {
        let root = self.insert_at(self.root, value);
        self.root = Some(root);
    }

    /// Value at 1-based ascending `rank`, or `None` when out of range
    pub fn select(&self, rank: usize) -> Option<u64> {
        if rank == 0 || rank > self.len() {
            return None;
        }

        let mut remaining = rank;
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            let left_size = self.size(node.left);

            if remaining <= left_size {
                cursor = node.left;
            } else if remaining <= left_size + node.multiplicity {
                return Some(node.value);
            } else {
                remaining -= left_size + node.multiplicity;
                cursor = node.right;
            }
        }

        None
    }

    /// Ascending iteration, each value repeated by its multiplicity
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
            pending: None,
        };
        iter.push_left_spine(self.root);
        iter
    }

    // ========================================================================
    // AVL INTERNALS
    // ========================================================================

    fn insert_at(&mut self, node: Option<usize>, value: u64) -> usize {
        let idx = match node {
            Some(idx) => idx,
            None => {
                self.nodes.push(Node::leaf(value));
                return self.nodes.len() - 1;
            }
        };

        match value.cmp(&self.nodes[idx].value) {
            Ordering::Less => {
                let left = self.insert_at(self.nodes[idx].left, value);
                self.nodes[idx].left = Some(left);
            }
            Ordering::Greater => {
                let right = self.insert_at(self.nodes[idx].right, value);
                self.nodes[idx].right = Some(right);
            }
            Ordering::Equal => {
                self.nodes[idx].multiplicity += 1;
            }
        }

        self.update(idx);
        self.rebalance(idx)
    }

    fn size(&self, node: Option<usize>) -> usize {
        node.map_or(0, |idx| self.nodes[idx].size)
    }

    fn height(&self, node: Option<usize>) -> i32 {
        node.map_or(0, |idx| self.nodes[idx].height)
    }

    fn balance_factor(&self, idx: usize) -> i32 {
        let node = &self.nodes[idx];
        self.height(node.left) - self.height(node.right)
    }

    fn update(&mut self, idx: usize) {
        let (left, right) = (self.nodes[idx].left, self.nodes[idx].right);
        let height = 1 + self.height(left).max(self.height(right));
        let size = self.nodes[idx].multiplicity + self.size(left) + self.size(right);

        let node = &mut self.nodes[idx];
        node.height = height;
        node.size = size;
    }

    fn rotate_right(&mut self, idx: usize) -> usize {
        let Some(pivot) = self.nodes[idx].left else {
            return idx;
        };
        self.nodes[idx].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(idx);
        self.update(idx);
        self.update(pivot);
        pivot
    }

    fn rotate_left(&mut self, idx: usize) -> usize {
        let Some(pivot) = self.nodes[idx].right else {
            return idx;
        };
        self.nodes[idx].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(idx);
        self.update(idx);
        self.update(pivot);
        pivot
    }

    fn rebalance(&mut self, idx: usize) -> usize {
        let balance = self.balance_factor(idx);

        if balance > 1 {
            if let Some(left) = self.nodes[idx].left {
                if self.balance_factor(left) < 0 {
                    let new_left = self.rotate_left(left);
                    self.nodes[idx].left = Some(new_left);
                }
            }
            return self.rotate_right(idx);
        }

        if balance < -1 {
            if let Some(right) = self.nodes[idx].right {
                if self.balance_factor(right) > 0 {
                    let new_right = self.rotate_right(right);
                    self.nodes[idx].right = Some(new_right);
                }
            }
            return self.rotate_left(idx);
        }

        idx
    }
}

impl FromIterator<u64> for OrderStatisticsTree {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut tree = OrderStatisticsTree::new();
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

// ============================================================================
// ITERATION
// ============================================================================

/// In-order iterator over an [`OrderStatisticsTree`]
pub struct Iter<'a> {
    tree: &'a OrderStatisticsTree,
    stack: Vec<usize>,
    /// Value being repeated and how many copies are left
    pending: Option<(u64, usize)>,
}

impl Iter<'_> {
    fn push_left_spine(&mut self, mut cursor: Option<usize>) {
        while let Some(idx) = cursor {
            self.stack.push(idx);
            cursor = self.tree.nodes[idx].left;
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some((value, remaining)) = self.pending.as_mut() {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Some(*value);
                }
            }

            let idx = self.stack.pop()?;
            let (value, multiplicity, right) = {
                let node = &self.tree.nodes[idx];
                (node.value, node.multiplicity, node.right)
            };
            self.pending = Some((value, multiplicity));
            self.push_left_spine(right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::*};

    impl OrderStatisticsTree {
        /// Check AVL balance, cached heights and cached sizes everywhere
        fn assert_invariants(&self) {
            fn check(tree: &OrderStatisticsTree, node: Option<usize>) -> (i32, usize) {
                let Some(idx) = node else {
                    return (0, 0);
                };
                let n = &tree.nodes[idx];
                let (lh, ls) = check(tree, n.left);
                let (rh, rs) = check(tree, n.right);
                assert!((lh - rh).abs() <= 1, "unbalanced at value {}", n.value);
                assert_eq!(n.height, 1 + lh.max(rh));
                assert_eq!(n.size, n.multiplicity + ls + rs);
                (n.height, n.size)
            }
            check(self, self.root);
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree = OrderStatisticsTree::new();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.select(1), None);
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn test_duplicates_share_a_node() {
        let tree: OrderStatisticsTree = [200, 50, 200, 200, 50].into_iter().collect();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.distinct_len(), 2);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![50, 50, 200, 200, 200]);
        assert_eq!(tree.select(2), Some(50));
        assert_eq!(tree.select(3), Some(200));
        assert_eq!(tree.select(6), None);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let tree: OrderStatisticsTree = (0..1024).collect();

        tree.assert_invariants();
        // A perfectly balanced tree of 1024 nodes has height 11; AVL allows ~1.44x
        assert!(tree.nodes[tree.root.unwrap()].height <= 15);
        assert_eq!(tree.select(1), Some(0));
        assert_eq!(tree.select(512), Some(511));
        assert_eq!(tree.select(1024), Some(1023));
    }

    #[test]
    fn test_select_rank_zero_is_none() {
        let tree: OrderStatisticsTree = [7].into_iter().collect();

        assert_eq!(tree.select(0), None);
        assert_eq!(tree.select(1), Some(7));
    }

    proptest! {
        #[test]
        fn proptest_matches_sorted_vec(values in vec(0..500u64, 0..400)) {
            let mut tree = OrderStatisticsTree::new();
            let mut sorted = Vec::new();

            for value in values {
                tree.insert(value);
                let pos = sorted.partition_point(|&v| v <= value);
                sorted.insert(pos, value);

                prop_assert_eq!(tree.len(), sorted.len());
            }

            tree.assert_invariants();
            prop_assert_eq!(tree.iter().collect::<Vec<_>>(), sorted.clone());
            for (i, expected) in sorted.iter().enumerate() {
                prop_assert_eq!(tree.select(i + 1), Some(*expected));
            }
        }
    }
}
