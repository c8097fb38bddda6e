//! Repeating Tick Task
//!
//! A cancellable recurring timer on a background thread. The sequencer
//! owns at most one of these; dropping (or replacing) the handle stops
//! the loop and joins the thread, so there is a single unambiguous
//! cancellation point and no way to leak a second scheduler loop.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle to a recurring background task
pub struct TickTask {
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// Decrements a live counter when the loop exits, however it exits
struct LoopGuard(Arc<AtomicUsize>);

impl Drop for LoopGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TickTask {
    /// Spawn a loop that sleeps `period`, then runs `body`, until cancelled.
    ///
    /// `live` is incremented while the loop runs and decremented when it
    /// exits; cancellation joins the thread, so after [`TickTask`] is
    /// dropped the counter is already back down.
    pub fn spawn<F>(period: Duration, live: Arc<AtomicUsize>, mut body: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        live.fetch_add(1, Ordering::SeqCst);
        let handle = std::thread::spawn(move || {
            let _guard = LoopGuard(live);
            // Sleep first: a fresh loop has nothing due before one period
            while !cancel_flag.load(Ordering::Relaxed) {
                std::thread::sleep(period);
                if cancel_flag.load(Ordering::Relaxed) {
                    break;
                }
                body();
            }
        });
        TickTask {
            cancel,
            handle: Some(handle),
        }
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
