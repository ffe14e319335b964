use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// What happened to a URL handed to [`Frontier::enqueue_if_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Queued,
    /// Already visited or already pending.
    AlreadySeen,
    /// The pending queue is full; the URL was dropped.
    Overflow,
}

/// Visited set plus FIFO pending queue for a single crawl.
///
/// A URL that has been visited is never queued again, and a URL that is
/// already pending is never queued twice. The frontier also tracks how many
/// pages were fetched successfully so it can tell the engine when the page
/// budget is spent.
#[derive(Debug, Clone)]
pub struct Frontier {
    visited: HashSet<String>,
    pending: VecDeque<String>,
    // Mirror of `pending` for O(1) membership checks
    queued: HashSet<String>,
    max_pages: usize,
    max_pending: usize,
    fetched: usize,
    overflow: usize,
    skipped: usize,
}

impl Frontier {
    pub fn new(max_pages: usize, max_pending: usize) -> Self {
        Self {
            visited: HashSet::new(),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            max_pages,
            max_pending,
            fetched: 0,
            overflow: 0,
            skipped: 0,
        }
    }

    /// Reset to `pending = [url]`, `visited = {}`.
    pub fn seed(&mut self, url: &str) {
        self.visited.clear();
        self.pending.clear();
        self.queued.clear();
        self.fetched = 0;
        self.overflow = 0;
        self.skipped = 0;

        self.pending.push_back(url.to_string());
        self.queued.insert(url.to_string());
    }

    /// Pop the next URL that has not been visited yet.
    pub fn dequeue(&mut self) -> Option<String> {
        while let Some(url) = self.pending.pop_front() {
            self.queued.remove(&url);
            if self.visited.contains(&url) {
                debug!("Discarding already visited {}", url);
                self.skipped += 1;
                continue;
            }
            return Some(url);
        }
        None
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn enqueue_if_new(&mut self, url: &str) -> Enqueue {
        if self.visited.contains(url) || self.queued.contains(url) {
            return Enqueue::AlreadySeen;
        }
        if self.pending.len() >= self.max_pending {
            self.overflow += 1;
            return Enqueue::Overflow;
        }

        self.pending.push_back(url.to_string());
        self.queued.insert(url.to_string());
        Enqueue::Queued
    }

    /// Count one successfully fetched page against the budget.
    pub fn record_fetched(&mut self) {
        self.fetched += 1;
    }

    pub fn remaining_budget(&self) -> usize {
        self.max_pages.saturating_sub(self.fetched)
    }

    pub fn has_budget(&self) -> bool {
        self.remaining_budget() > 0
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Number of discoveries dropped because the queue was full.
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Number of queue entries discarded because they were already visited.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
