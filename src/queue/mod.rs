use crate::service::models::Track;
use std::collections::VecDeque;

/// Tracks waiting to play after the current one. Strict FIFO: no dedup,
/// no priority, no capacity bound.
///
/// `dequeue_head` takes `&mut self`, so two callers can never observe the
/// same head. Share a queue across tasks only behind a lock.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: VecDeque<Track>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track to the tail. Enqueuing the same id twice yields two entries.
    pub fn enqueue(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Remove and return the head, if any.
    pub fn dequeue_head(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn peek_head(&self) -> Option<&Track> {
        self.tracks.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_track(id: &str) -> Track {
        Track::new(id, format!("Track {id}"))
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::new();
        for id in ["1", "2", "3", "4"] {
            queue.enqueue(make_track(id));
        }
        assert_eq!(queue.len(), 4);

        let order: Vec<String> = std::iter::from_fn(|| queue.dequeue_head())
            .map(|t| t.id)
            .collect();
        assert_eq!(order, ["1", "2", "3", "4"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_nth_dequeue_empties() {
        let mut queue = Queue::new();
        queue.enqueue(make_track("a"));
        queue.enqueue(make_track("b"));

        assert!(queue.dequeue_head().is_some());
        assert!(!queue.is_empty());
        assert!(queue.dequeue_head().is_some());
        assert!(queue.is_empty());
        assert!(queue.dequeue_head().is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut queue = Queue::new();
        queue.enqueue(make_track("same"));
        queue.enqueue(make_track("same"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek_head().map(|t| t.id.as_str()), Some("same"));
        queue.dequeue_head();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut queue = Queue::new();
        queue.enqueue(make_track("1"));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.iter().count(), 0);
    }
}
