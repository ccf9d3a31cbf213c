//! Binary min-heap ordered by an external score lookup
//!
//! Scores are not stored with the elements. Every operation that moves elements
//! takes the score function, so the router can keep its f-score table in a plain
//! map and update it between calls without touching the heap.

/// Array-backed binary min-heap. Grows as needed.
#[derive(Debug, Clone)]
pub struct ScoredHeap<T> {
    items: Vec<T>,
}

impl<T> ScoredHeap<T> {
    pub fn new() -> Self {
        ScoredHeap { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ScoredHeap {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lowest-scoring element, as of the last reordering.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Append `item` and sift it up while its parent scores higher.
    pub fn push<F>(&mut self, item: T, score: F)
    where
        F: Fn(&T) -> f64,
    {
        self.items.push(item);
        self.sift_up(self.items.len() - 1, &score);
    }

    /// Remove and return the root. `None` when empty.
    pub fn pop<F>(&mut self, score: F) -> Option<T>
    where
        F: Fn(&T) -> f64,
    {
        let last = self.items.pop()?;
        if self.items.is_empty() {
            return Some(last);
        }
        let root = std::mem::replace(&mut self.items[0], last);
        self.sift_down(0, &score);
        Some(root)
    }

    /// Linear membership scan. There is no duplicate suppression on push.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    fn sift_up<F>(&mut self, mut idx: usize, score: &F)
    where
        F: Fn(&T) -> f64,
    {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if score(&self.items[parent]) > score(&self.items[idx]) {
                self.items.swap(parent, idx);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down<F>(&mut self, mut idx: usize, score: &F)
    where
        F: Fn(&T) -> f64,
    {
        let len = self.items.len();
        loop {
            let left = idx * 2 + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && score(&self.items[right]) < score(&self.items[left]) {
                right
            } else {
                left
            };
            if score(&self.items[child]) < score(&self.items[idx]) {
                self.items.swap(child, idx);
                idx = child;
            } else {
                break;
            }
        }
    }
}

impl<T> Default for ScoredHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn drain(heap: &mut ScoredHeap<u32>, scores: &HashMap<u32, f64>) -> Vec<f64> {
        let mut out = Vec::new();
        while let Some(item) = heap.pop(|k| scores[k]) {
            out.push(scores[&item]);
        }
        out
    }

    #[test]
    fn test_pops_in_non_decreasing_order() {
        let raw = [5.0, 3.5, 9.0, 1.0, 3.5, 7.25, 0.0, 12.0, 2.0, 8.0, 6.0, 4.0];
        let scores: HashMap<u32, f64> = raw
            .iter()
            .enumerate()
            .map(|(i, s)| (i as u32, *s))
            .collect();

        let mut heap = ScoredHeap::new();
        for key in 0..raw.len() as u32 {
            heap.push(key, |k| scores[k]);
        }
        assert_eq!(heap.len(), raw.len());

        let popped = drain(&mut heap, &scores);
        let mut expected = raw.to_vec();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(popped, expected);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_interleaved_push_and_pop() {
        let scores: HashMap<u32, f64> = (0..40u32).map(|k| (k, ((k * 37) % 41) as f64)).collect();
        let mut heap = ScoredHeap::with_capacity(8);
        let mut popped = Vec::new();

        for key in 0..40u32 {
            heap.push(key, |k| scores[k]);
            if key % 3 == 0 {
                popped.push(heap.pop(|k| scores[k]).unwrap());
            }
        }
        // once pops start draining, what comes out must be sorted
        let rest = drain(&mut heap, &scores);
        assert!(rest.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(popped.len() + rest.len(), 40);
    }

    #[test]
    fn test_pop_empty_and_contains() {
        let mut heap: ScoredHeap<u32> = ScoredHeap::new();
        assert!(heap.pop(|_| 0.0).is_none());

        heap.push(7, |_| 1.0);
        heap.push(7, |_| 1.0);
        assert!(heap.contains(&7));
        assert!(!heap.contains(&8));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.peek(), Some(&7));
    }
}
