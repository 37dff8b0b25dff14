//! Debounced digital input.
//!
//! A raw level becomes the stable level in one of two ways:
//!
//! - it holds unchanged for at least the debounce window (classic debounce), or
//! - it appears while at least one window has passed since the previous
//!   stable change, in which case it is committed at once.
//!
//! The second path keeps the stable level from lagging behind a signal that
//! toggles quickly but never faster than the window allows.

use crate::source::{Clock, SampleSource};

/// Default debounce window.
pub const DEBOUNCE_TIME_MILLIS: u32 = 50;

/// Confirmed transition of the stable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
}

impl Edge {
    const fn towards(level: bool) -> Self {
        if level { Edge::Rising } else { Edge::Falling }
    }
}

/// Debounce state machine over a digital [`SampleSource`] and a [`Clock`].
///
/// Call [`run`](Self::run) once per polling iteration. Edge queries describe
/// the most recent call only.
#[derive(Debug)]
pub struct DebounceInput<S, C> {
    source: S,
    clock: C,
    window_millis: u32,
    /// Last raw level observed.
    current_state: bool,
    stable_state: bool,
    /// When `current_state` last changed.
    state_started_at: u32,
    /// When `stable_state` last changed.
    last_successful_change_at: u32,
    edge: Option<Edge>,
}

impl<S, C> DebounceInput<S, C>
where
    S: SampleSource<bool>,
    C: Clock,
{
    /// Create a debouncer with the default [`DEBOUNCE_TIME_MILLIS`] window.
    pub fn new(source: S, clock: C) -> Self {
        Self::with_window(source, clock, DEBOUNCE_TIME_MILLIS)
    }

    /// Create a debouncer with a fixed `window_millis` window.
    pub fn with_window(source: S, clock: C, window_millis: u32) -> Self {
        Self {
            source,
            clock,
            window_millis,
            current_state: false,
            stable_state: false,
            state_started_at: 0,
            last_successful_change_at: 0,
            edge: None,
        }
    }

    /// Advance by one polling step and return the stable level.
    ///
    /// Reads the source exactly once.
    pub fn run(&mut self) -> bool {
        self.edge = None;

        let now = self.clock.now_millis();

        // Candidate has held for a full window.
        if self.elapsed_since(self.state_started_at, now) && self.stable_state != self.current_state {
            self.commit(self.current_state, now);
        }

        let input = self.source.read_raw();
        if input == self.current_state {
            return self.stable_state;
        }

        if self.elapsed_since(self.last_successful_change_at, now) {
            if self.stable_state != input {
                self.commit(input, now);
            }
            self.last_successful_change_at = now;
        }

        self.current_state = input;
        self.state_started_at = now;
        self.stable_state
    }

    /// Debounced level.
    #[inline]
    pub fn stable_state(&self) -> bool {
        self.stable_state
    }

    /// A rising edge was confirmed during the last [`run`](Self::run).
    #[inline]
    pub fn rose(&self) -> bool {
        self.edge == Some(Edge::Rising)
    }

    /// A falling edge was confirmed during the last [`run`](Self::run).
    #[inline]
    pub fn fell(&self) -> bool {
        self.edge == Some(Edge::Falling)
    }

    /// Edge confirmed during the last [`run`](Self::run), if any.
    #[inline]
    pub fn edge(&self) -> Option<Edge> {
        self.edge
    }

    /// Debounce window chosen at construction.
    pub fn window_millis(&self) -> u32 {
        self.window_millis
    }

    /// Give back the sample source and clock.
    pub fn release(self) -> (S, C) {
        (self.source, self.clock)
    }

    fn elapsed_since(&self, since: u32, now: u32) -> bool {
        now.wrapping_sub(since) >= self.window_millis
    }

    fn commit(&mut self, level: bool, now: u32) {
        let edge = Edge::towards(level);
        trace!("debounce edge {} at {}ms", edge, now);

        self.stable_state = level;
        self.last_successful_change_at = now;
        self.edge = Some(edge);
    }
}
