//! Explicit frame scheduling.
//!
//! The host owns the actual animation primitive (a winit redraw, a browser
//! animation frame, a test loop). The engine owns a [`FrameLoop`] that
//! decides whether a delivered frame belongs to the live chain.
//!
//! `start` hands out a [`FrameHandle`]; the host passes it back with every
//! frame. `stop` cancels the handle, so frames still in flight from before
//! the stop are recognised as stale and dropped. Starting twice returns the
//! same handle, which keeps at most one chain alive.

/// Token identifying one run of the frame chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Sequence number of this run, starting at 1.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Tracks the single live frame chain.
#[derive(Debug, Default)]
pub struct FrameLoop {
    issued: u64,
    live: Option<FrameHandle>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a chain, or return the live one if already running.
    pub fn start(&mut self) -> FrameHandle {
        if let Some(handle) = self.live {
            return handle;
        }
        self.issued += 1;
        let handle = FrameHandle(self.issued);
        self.live = Some(handle);
        handle
    }

    /// Cancel the live chain. Returns the cancelled handle, or `None` if
    /// nothing was running.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.live.take()
    }

    /// Whether a frame carrying `handle` should run.
    pub fn accepts(&self, handle: FrameHandle) -> bool {
        self.live == Some(handle)
    }

    pub fn live(&self) -> Option<FrameHandle> {
        self.live
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    /// Number of live chains: always 0 or 1.
    pub fn chains(&self) -> usize {
        usize::from(self.live.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_idempotent() {
        let mut frames = FrameLoop::new();
        let a = frames.start();
        let b = frames.start();
        assert_eq!(a, b);
        assert_eq!(frames.chains(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut frames = FrameLoop::new();
        assert!(frames.cancel().is_none());

        let handle = frames.start();
        assert_eq!(frames.cancel(), Some(handle));
        assert!(frames.cancel().is_none());
        assert_eq!(frames.chains(), 0);
    }

    #[test]
    fn test_stale_handle_rejected_after_restart() {
        let mut frames = FrameLoop::new();
        let first = frames.start();
        frames.cancel();
        let second = frames.start();

        assert_ne!(first, second);
        assert!(!frames.accepts(first));
        assert!(frames.accepts(second));
        assert_eq!(second.id(), 2);
    }
}
