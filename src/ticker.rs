//! Fixed-interval ticking, detached from any GUI event loop.
//!
//! [`Ticker::fire`] runs one tick without waiting, which is how tests drive it. [`Ticker::run`]
//! is the real loop: sleep one interval, fire, repeat until a tick asks to stop.

use std::{thread, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    running: bool,
    fired: u64,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks delivered so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Delivers one tick if running. Returns whether the handler was called.
    pub fn fire<F>(&mut self, on_tick: F) -> bool
    where
        F: FnOnce() -> TickFlow,
    {
        if !self.running {
            return false;
        }

        self.fired += 1;
        if on_tick() == TickFlow::Stop {
            self.stop();
        }
        true
    }

    /// Blocks the calling thread until a tick returns [`TickFlow::Stop`].
    pub fn run<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> TickFlow,
    {
        while self.running {
            thread::sleep(self.interval);
            self.fire(&mut on_tick);
        }
    }
}
