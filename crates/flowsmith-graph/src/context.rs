use std::collections::HashMap;

/// Mutable bookkeeping of a single run.
///
/// Created at run start and passed by `&mut` through every recursive branch
/// call, so the caps hold across the whole run rather than per branch. Never
/// share one context between runs.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    visited: Vec<String>,
    iteration_counters: HashMap<String, usize>,
}

/// Returned by `ExecutionContext::record_visit` once the visit cap is exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitCapExceeded {
    pub visits: usize,
    pub cap: usize,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processing event for `node_id`.
    ///
    /// The event is recorded even when it breaks the cap; every later call
    /// fails as well.
    pub fn record_visit(&mut self, node_id: &str, cap: usize) -> Result<usize, VisitCapExceeded> {
        self.visited.push(node_id.to_string());
        let visits = self.visited.len();
        if visits > cap {
            return Err(VisitCapExceeded { visits, cap });
        }
        Ok(visits)
    }

    /// Processing events recorded so far
    pub fn visits(&self) -> usize {
        self.visited.len()
    }

    /// Node ids in processing order (repeats included)
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn has_visited(&self, node_id: &str) -> bool {
        self.visited.iter().any(|id| id == node_id)
    }

    /// Total iterations run by a repeat node over the whole run
    pub fn iterations(&self, node_id: &str) -> usize {
        self.iteration_counters.get(node_id).copied().unwrap_or(0)
    }

    pub(crate) fn record_iteration(&mut self, node_id: &str) -> usize {
        let counter = self.iteration_counters.entry(node_id.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Iterations completed so far, more allowed
    Running(usize),
    /// Condition returned false
    Done,
    /// Condition still true after the last permitted iteration
    CapExceeded,
}

/// Loop bound of one repeat-node activation
#[derive(Debug, Clone)]
pub struct IterationGuard {
    cap: usize,
    completed: usize,
    state: GuardState,
}

impl IterationGuard {
    /// A cap of zero is treated as one; the first iteration always runs.
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            completed: 0,
            state: GuardState::Running(0),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Account for one finished iteration whose condition returned `continued`
    pub fn advance(&mut self, continued: bool) -> GuardState {
        if let GuardState::Running(count) = self.state {
            let count = count + 1;
            self.completed = count;
            self.state = if !continued {
                GuardState::Done
            } else if count >= self.cap {
                GuardState::CapExceeded
            } else {
                GuardState::Running(count)
            };
        }
        self.state
    }
}
