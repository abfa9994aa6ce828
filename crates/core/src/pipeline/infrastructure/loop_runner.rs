use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::pipeline::detection_cycle::DetectionCycle;
use crate::pipeline::ticker::TickSource;

/// Stop/join handle for a running detection loop.
///
/// Dropping the handle cancels the pending cycle and waits for the loop
/// thread, so an owner going away never leaves the camera running.
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
    thread: Option<JoinHandle<DetectionCycle>>,
}

impl LoopHandle {
    /// Requests cancellation; the loop observes it before its next cycle.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Waits for the loop thread and returns the cycle (with its camera
    /// already stopped). `None` if the thread panicked.
    pub fn join(mut self) -> Option<DetectionCycle> {
        self.thread.take().and_then(|t| t.join().ok())
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Runs a detection cycle on a dedicated thread, one cycle per tick.
///
/// Cooperative: the thread blocks on the tick source between cycles and
/// re-checks cancellation before each one. The camera source is stopped on
/// the loop thread before it exits, whatever the exit reason.
pub fn spawn_detection_loop(
    mut cycle: DetectionCycle,
    mut ticks: Box<dyn TickSource>,
) -> LoopHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    let thread = std::thread::spawn(move || {
        while ticks.wait() {
            if flag.load(Ordering::Relaxed) {
                break;
            }
            cycle.run_once();
        }
        cycle.stop();
        cycle
    });
    LoopHandle {
        cancelled,
        thread: Some(thread),
    }
}
