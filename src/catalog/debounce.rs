//! Debounced search input.
//!
//! [`SearchDebouncer`] is the clock-driven core: the caller feeds it raw
//! values with a timestamp and polls it with the current time. Every new value
//! re-arms the deadline, so a burst of keystrokes yields a single commit equal
//! to the last value once the input has been quiet for the whole interval.
//!
//! [`spawn_search_debouncer`] runs the same core on a tokio task for callers
//! that prefer channels over polling.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    interval: Duration,
    raw: String,
    committed: String,
    deadline: Option<Instant>,
}

impl SearchDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            raw: String::new(),
            committed: String::new(),
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// What the input box currently shows.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The last value handed to the pipeline.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// When the pending value will be committed, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record a keystroke. Cancels any pending commit and re-arms the timer.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.raw = value.into();
        self.deadline = Some(now + self.interval);
    }

    /// Commit the raw value if the quiet interval has elapsed.
    ///
    /// Returns the committed value exactly once per pause.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.committed.clone_from(&self.raw);
                Some(&self.committed)
            }
            _ => None,
        }
    }

    /// Empty both values immediately, dropping any pending commit.
    ///
    /// Returns true if the committed value changed.
    pub fn clear(&mut self) -> bool {
        self.raw.clear();
        self.deadline = None;
        if self.committed.is_empty() {
            false
        } else {
            self.committed.clear();
            true
        }
    }
}

// =============================================================================
// ASYNC DRIVER
// =============================================================================

/// Events accepted by the debouncer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Input(String),
    Clear,
}

/// Handle on a running debouncer task.
#[derive(Debug)]
pub struct SearchDebouncerHandle {
    /// Send keystrokes and clear actions here.
    pub events: mpsc::UnboundedSender<SearchEvent>,
    /// Every committed value, in commit order.
    pub commits: mpsc::UnboundedReceiver<String>,
    pub task: JoinHandle<()>,
}

/// Spawn a task that debounces [`SearchEvent`]s.
///
/// A clear is forwarded as an empty commit right away. Dropping the events
/// sender stops the task; a value still waiting for its deadline is discarded.
pub fn spawn_search_debouncer(interval: Duration) -> SearchDebouncerHandle {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (commits_tx, commits_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        let mut debouncer = SearchDebouncer::new(interval);

        loop {
            let deadline = debouncer.deadline();

            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(SearchEvent::Input(value)) => debouncer.input(value, Instant::now()),
                    Some(SearchEvent::Clear) => {
                        debouncer.clear();
                        if commits_tx.send(String::new()).is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(value) = debouncer.poll(Instant::now()) {
                        tracing::debug!(term = %value, "search term committed");
                        if commits_tx.send(value.to_string()).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    SearchDebouncerHandle {
        events: events_tx,
        commits: commits_rx,
        task,
    }
}
