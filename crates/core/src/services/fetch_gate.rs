use std::sync::{Arc, Mutex};

use crate::errors::CoreError;

/// Sequencer for one fetch scope (the full list, or a single coin id).
///
/// Every fetch registers with `begin` and receives a ticket carrying a
/// monotonically increasing sequence number. On completion the fetch
/// settles exactly once, through `commit` (success) or `abort` (failure).
/// `commit` runs the store write under the gate's lock and only if no
/// later-dispatched fetch has committed before it, so cache mutation for
/// the scope is one-at-a-time and a slower, staler response can never
/// overwrite the result of a fetch dispatched after it.
#[derive(Debug, Default)]
pub struct FetchGate {
    state: Arc<Mutex<GateState>>,
}

#[derive(Debug, Default)]
struct GateState {
    /// Sequence number handed to the next fetch.
    next_seq: u64,
    /// Highest sequence number that has committed a write.
    committed_seq: Option<u64>,
    /// Fetches currently in flight.
    in_flight: u32,
    /// Whether the most recently settled fetch failed.
    last_failed: bool,
}

impl GateState {
    fn settle_failed(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_failed = true;
    }
}

/// Proof of a begun fetch. Not copyable: settling consumes it, so a fetch
/// cannot commit or abort twice. A ticket dropped without settling, which
/// happens when the caller's future is dropped mid-fetch, settles as an
/// abort, so an abandoned fetch cannot leave the scope counted as
/// in flight forever.
#[derive(Debug)]
pub struct FetchTicket {
    seq: u64,
    state: Arc<Mutex<GateState>>,
    settled: bool,
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.settle_failed();
    }
}

impl FetchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new fetch and hand back its ticket.
    pub fn begin(&self) -> FetchTicket {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let seq = state.next_seq;
        state.next_seq += 1;
        state.in_flight += 1;
        drop(state);
        FetchTicket {
            seq,
            state: Arc::clone(&self.state),
            settled: false,
        }
    }

    /// Settle a successful fetch. Runs `write` (the store mutation) under
    /// the gate lock, unless a later-dispatched fetch has already
    /// committed, in which case the write is discarded.
    ///
    /// Returns whether the write was applied. A discarded result is not an
    /// error: the caller keeps its own fetched data, the cache simply
    /// stays with the newer fetch. A write that fails marks the scope
    /// failed, the same as `abort`, before the error propagates.
    pub fn commit(
        &self,
        mut ticket: FetchTicket,
        write: impl FnOnce() -> Result<(), CoreError>,
    ) -> Result<bool, CoreError> {
        ticket.settled = true;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.in_flight = state.in_flight.saturating_sub(1);

        if state.committed_seq.is_some_and(|c| c > ticket.seq) {
            return Ok(false);
        }

        if let Err(e) = write() {
            state.last_failed = true;
            return Err(e);
        }
        state.committed_seq = Some(ticket.seq);
        state.last_failed = false;
        Ok(true)
    }

    /// Settle a failed fetch. The committed sequence is untouched, so the
    /// cache keeps whatever the last successful fetch wrote.
    pub fn abort(&self, mut ticket: FetchTicket) {
        ticket.settled = true;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.settle_failed();
    }

    /// Whether any fetch for this scope is in flight right now.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.in_flight > 0
    }

    /// Whether the most recently settled fetch for this scope failed.
    #[must_use]
    pub fn last_fetch_failed(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.last_failed
    }
}
