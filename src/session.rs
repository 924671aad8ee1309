//! Acquisition session: the thread that drives sampling ticks.
//!
//! Stopping acquisition is a state change on the handler, not a thread
//! cancellation; the thread keeps running and idles while Stopped. Tearing
//! the session down is explicit: [`AcquisitionSession::shutdown`] flips the
//! stop flag and joins the thread before returning, so shared buffers are
//! never released while the actor could still touch them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::handler::PlotHandler;

/// Owned lifecycle handle for the acquisition thread.
pub struct AcquisitionSession {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl AcquisitionSession {
    /// Spawn the acquisition thread. Each iteration checks the shutdown flag
    /// and the handler state once, ticks if Running, then sleeps for the
    /// handler's configured sample period.
    pub fn spawn(handler: Arc<PlotHandler>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        // non-zero by AcquisitionConfig::validate, checked at handler creation
        let period = handler.config().sample_period;
        let handle = std::thread::Builder::new()
            .name("varscope-acquisition".into())
            .spawn(move || {
                log::debug!("acquisition thread up, period {period:?}");
                while !flag.load(Ordering::SeqCst) {
                    if handler.is_running() {
                        handler.tick();
                    }
                    std::thread::sleep(period);
                }
                log::debug!("acquisition thread exiting");
            })
            .expect("failed to spawn acquisition thread");
        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Stop the thread and join it. Idempotent through `Drop` as well.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AcquisitionSession {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}
