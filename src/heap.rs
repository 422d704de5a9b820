//! # Pairing Heap
//!
//! A mergeable max-priority queue.
//!
//! Nodes live in an arena and refer to each other by index: `head` is the
//! leftmost child and `next` the following sibling, so every node has exactly
//! one owner slot. Slots of dequeued nodes are recycled.
//!
//! | Operation | Amortized cost |
//! |-----------|----------------|
//! | [`PairingHeap::enqueue`] | O(1) |
//! | [`PairingHeap::dequeue`] | O(log n) |
//!
//! Equal priorities never reorder the two roots being merged: the first
//! argument stays on top. Combined with the fixed two-pass merge order this
//! makes the output fully deterministic for tied inputs.

type NodeId = usize;

#[derive(Debug)]
struct Node<T> {
    priority: f64,
    value: Option<T>,
    head: Option<NodeId>,
    next: Option<NodeId>,
}

/// Max-priority queue keyed by `f64`.
#[derive(Debug)]
pub struct PairingHeap<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    size: usize,
}

impl<T> Default for PairingHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PairingHeap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            size: 0,
        }
    }

    /// Create an empty heap with room for `capacity` live entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: None,
            size: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Highest-priority entry without removing it.
    pub fn peek(&self) -> Option<(f64, &T)> {
        let node = &self.nodes[self.root?];
        node.value.as_ref().map(|value| (node.priority, value))
    }

    /// Insert `value` with `priority`.
    pub fn enqueue(&mut self, priority: f64, value: T) {
        let id = self.alloc(priority, value);
        self.root = self.merge(self.root, Some(id));
        self.size += 1;
    }

    /// Remove and return the highest-priority entry.
    pub fn dequeue(&mut self) -> Option<T> {
        let root = self.root?;
        let children = self.nodes[root].head.take();
        let value = self.nodes[root].value.take();
        self.free.push(root);

        self.root = self.merge_pairs(children);
        self.size -= 1;
        value
    }

    fn alloc(&mut self, priority: f64, value: T) -> NodeId {
        let node = Node {
            priority,
            value: Some(value),
            head: None,
            next: None,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Link two roots; the loser becomes the winner's leftmost child.
    fn merge(&mut self, i: Option<NodeId>, j: Option<NodeId>) -> Option<NodeId> {
        let (mut i, mut j) = match (i, j) {
            (None, j) => return j,
            (i, None) => return i,
            (Some(i), Some(j)) => (i, j),
        };

        if self.nodes[i].priority < self.nodes[j].priority {
            std::mem::swap(&mut i, &mut j);
        }

        self.nodes[j].next = self.nodes[i].head;
        self.nodes[i].head = Some(j);
        Some(i)
    }

    /// Two-pass merge of a sibling list.
    ///
    /// First pass pairs siblings left to right, pushing each merged pair on
    /// front of a new list (so it ends up reversed). Second pass folds that
    /// list, i.e. right to left over the original order.
    fn merge_pairs(&mut self, mut list: Option<NodeId>) -> Option<NodeId> {
        let mut pairs: Option<NodeId> = None;

        while let Some(a) = list {
            list = self.nodes[a].next.take();
            let b = list;
            if let Some(b) = b {
                list = self.nodes[b].next.take();
            }

            let merged = self.merge(Some(a), b);
            if let Some(m) = merged {
                self.nodes[m].next = pairs;
                pairs = Some(m);
            }
        }

        let mut result = None;
        while let Some(j) = pairs {
            pairs = self.nodes[j].next.take();
            result = self.merge(Some(j), result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random priorities.
    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((*seed >> 33) % 1000) as f64
    }

    #[test]
    fn test_dequeue_in_priority_order() {
        let mut heap = PairingHeap::new();
        for (i, p) in [5.0, 1.0, 8.0, 3.0].into_iter().enumerate() {
            heap.enqueue(p, p);
            assert_eq!(heap.len(), i + 1);
        }

        assert_eq!(heap.dequeue(), Some(8.0));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.dequeue(), Some(5.0));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.dequeue(), Some(3.0));
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.dequeue(), Some(1.0));
        assert_eq!(heap.len(), 0);
        assert!(heap.is_empty());
        assert_eq!(heap.dequeue(), None);
    }

    #[test]
    fn test_peek() {
        let mut heap = PairingHeap::new();
        assert!(heap.peek().is_none());

        heap.enqueue(2.0, "low");
        heap.enqueue(9.0, "high");
        assert_eq!(heap.peek(), Some((9.0, &"high")));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_ties_keep_existing_root() {
        let mut heap = PairingHeap::new();
        heap.enqueue(1.0, "a");
        heap.enqueue(1.0, "b");
        assert_eq!(heap.dequeue(), Some("a"));
        assert_eq!(heap.dequeue(), Some("b"));
    }

    #[test]
    fn test_tie_order_follows_pairing() {
        // Children are threaded newest first, then paired: a | [d, c, b]
        let mut heap = PairingHeap::new();
        for v in ["a", "b", "c", "d"] {
            heap.enqueue(1.0, v);
        }
        let order: Vec<_> = std::iter::from_fn(|| heap.dequeue()).collect();
        assert_eq!(order, vec!["a", "d", "b", "c"]);

        let mut heap = PairingHeap::new();
        for v in ["a", "b", "c"] {
            heap.enqueue(1.0, v);
        }
        let order: Vec<_> = std::iter::from_fn(|| heap.dequeue()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_many_entries_sorted() {
        let mut seed = 42;
        let mut heap = PairingHeap::new();
        for i in 0..500 {
            heap.enqueue(lcg(&mut seed), i);
        }

        let mut last = f64::INFINITY;
        let mut count = 0;
        while let Some((priority, _)) = heap.peek().map(|(p, v)| (p, *v)) {
            assert!(priority <= last);
            last = priority;
            heap.dequeue();
            count += 1;
        }
        assert_eq!(count, 500);
    }

    #[test]
    fn test_interleaved_operations() {
        let mut seed = 7;
        let mut heap = PairingHeap::new();
        let mut reference: Vec<f64> = Vec::new();

        for round in 0..200 {
            let p = lcg(&mut seed);
            heap.enqueue(p, p);
            reference.push(p);

            if round % 3 == 0 {
                reference.sort_by(|a, b| a.total_cmp(b));
                let expected = reference.pop();
                assert_eq!(heap.dequeue(), expected);
            }
            assert_eq!(heap.len(), reference.len());
        }
    }

    #[test]
    fn test_slots_are_reused() {
        let mut heap = PairingHeap::with_capacity(4);
        for round in 0..100 {
            heap.enqueue(round as f64, round);
            heap.enqueue(-(round as f64), round);
            heap.dequeue();
            heap.dequeue();
        }
        assert!(heap.is_empty());
        assert!(heap.nodes.len() <= 2);
    }
}
