use std::time::{Duration, Instant};

use crate::pipeline::ticker::TickSource;

/// Wall-clock ticks at a fixed period, the native stand-in for
/// display-refresh scheduling.
pub struct IntervalTicker {
    ticks: crossbeam_channel::Receiver<Instant>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            ticks: crossbeam_channel::tick(period),
        }
    }
}

impl TickSource for IntervalTicker {
    fn wait(&mut self) -> bool {
        self.ticks.recv().is_ok()
    }
}

/// Decorator that ends the supply after a fixed number of ticks.
pub struct CappedTicker {
    inner: Box<dyn TickSource>,
    remaining: usize,
}

impl CappedTicker {
    pub fn new(inner: Box<dyn TickSource>, count: usize) -> Self {
        Self {
            inner,
            remaining: count,
        }
    }
}

impl TickSource for CappedTicker {
    fn wait(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.inner.wait()
    }
}

/// Channel-fed ticks: each received unit is one cycle. Dropping the sender
/// ends the loop. Lets tests and interactive callers drive cycles by hand.
pub struct ManualTicker {
    ticks: crossbeam_channel::Receiver<()>,
}

impl ManualTicker {
    pub fn new() -> (crossbeam_channel::Sender<()>, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (tx, Self { ticks: rx })
    }
}

impl TickSource for ManualTicker {
    fn wait(&mut self) -> bool {
        self.ticks.recv().is_ok()
    }
}
