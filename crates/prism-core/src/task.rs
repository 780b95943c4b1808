//! Off-thread channel decomposition for large images.
//!
//! The caller asks a [`Decomposer`] for a split. Images at or below the
//! configured pixel threshold are decomposed on the spot; larger ones get a
//! [`DecompositionTask`] running on its own worker thread. While a task is
//! in flight the shared [`InteractionGate`] reports the UI as blocked; the
//! gate re-opens when the task's result has been handed to the caller.
//!
//! Tasks cannot be cancelled. Scheduling a second task while one is still
//! running is a caller error: it is logged, not queued or rejected.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::buffer::PixelBuffer;
use crate::config::DecompositionConfig;
use crate::decompose::{decompose, DecomposeMode};
use crate::error::Result;

/// Identity of one decomposition request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a request was executed. Decided once, when the request is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionPath {
    Synchronous,
    Background,
}

/// Output of one request. Produced exactly once.
#[derive(Clone, Debug)]
pub struct DecompositionResult {
    pub request: RequestId,
    pub mode: DecomposeMode,
    pub path: ExecutionPath,
    pub buffer: PixelBuffer,
    pub elapsed: Duration,
}

/// Shared "user input is suppressed" flag.
///
/// Cloning yields another handle to the same gate. The host checks
/// [`is_blocked`](Self::is_blocked) to swallow pointer/keyboard input and
/// to show a busy indicator.
#[derive(Clone, Default)]
pub struct InteractionGate {
    inner: Arc<GateInner>,
}

#[derive(Default)]
struct GateInner {
    held: AtomicUsize,
    engagements: AtomicU64,
}

impl InteractionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blocked(&self) -> bool {
        self.inner.held.load(Ordering::Acquire) > 0
    }

    /// How many times interaction has been disabled so far.
    pub fn engagements(&self) -> u64 {
        self.inner.engagements.load(Ordering::Acquire)
    }

    /// Disable interaction until the returned guard is dropped.
    pub fn acquire(&self) -> InteractionGuard {
        self.inner.held.fetch_add(1, Ordering::AcqRel);
        self.inner.engagements.fetch_add(1, Ordering::AcqRel);
        tracing::debug!("Interaction disabled");
        InteractionGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Re-enables interaction on drop.
#[must_use = "interaction is re-enabled as soon as the guard is dropped"]
pub struct InteractionGuard {
    inner: Arc<GateInner>,
}

impl Drop for InteractionGuard {
    fn drop(&mut self) {
        self.inner.held.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!("Interaction enabled");
    }
}

/// Lifecycle of a [`DecompositionTask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Done,
}

type Waker = Box<dyn FnOnce() + Send + 'static>;

/// One decomposition running on a dedicated worker thread.
pub struct DecompositionTask {
    request: RequestId,
    mode: DecomposeMode,
    state: TaskState,
    rx: Option<mpsc::Receiver<DecompositionResult>>,
    handle: Option<JoinHandle<()>>,
    guard: Option<InteractionGuard>,
}

impl DecompositionTask {
    pub fn new(request: RequestId, mode: DecomposeMode) -> Self {
        Self {
            request,
            mode,
            state: TaskState::Idle,
            rx: None,
            handle: None,
            guard: None,
        }
    }

    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn mode(&self) -> DecomposeMode {
        self.mode
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Idle -> Running. The guard is held until the result is delivered.
    ///
    /// `waker` runs on the worker right after the result is sent, so a
    /// host event loop can wake up and call [`poll`](Self::poll).
    pub fn start(
        &mut self,
        image: Arc<PixelBuffer>,
        guard: InteractionGuard,
        waker: Option<Waker>,
    ) -> Result<()> {
        if self.state != TaskState::Idle {
            tracing::warn!("Decomposition {} already started", self.request);
            return Ok(());
        }

        let (tx, rx) = mpsc::channel::<DecompositionResult>();
        let request = self.request;
        let mode = self.mode;

        let handle = std::thread::Builder::new()
            .name(format!("prism-decompose-{}", request.0))
            .spawn(move || {
                let start = Instant::now();
                let buffer = decompose(&image, mode);
                let elapsed = start.elapsed();
                tracing::info!(
                    "Decomposition {request} ({mode}) finished in {:.1}ms",
                    elapsed.as_secs_f64() * 1000.0
                );
                let _ = tx.send(DecompositionResult {
                    request,
                    mode,
                    path: ExecutionPath::Background,
                    buffer,
                    elapsed,
                });
                if let Some(wake) = waker {
                    wake();
                }
            })?;

        self.rx = Some(rx);
        self.handle = Some(handle);
        self.guard = Some(guard);
        self.state = TaskState::Running;
        Ok(())
    }

    /// Deliver the result to `on_finished` if it is ready. Never blocks.
    ///
    /// Returns `true` exactly once, on the call that delivered the result.
    /// Interaction is re-enabled after `on_finished` returns, or while
    /// unwinding if it panics.
    pub fn poll<F>(&mut self, on_finished: F) -> bool
    where
        F: FnOnce(DecompositionResult),
    {
        if self.state != TaskState::Running {
            return false;
        }
        let received = match self.rx.as_ref() {
            Some(rx) => rx.try_recv(),
            None => return false,
        };
        match received {
            Ok(result) => {
                self.deliver(result, on_finished);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Decomposition {} worker exited without a result", self.request);
                self.release();
                false
            }
        }
    }

    /// Block until the worker finishes and return its result.
    pub fn wait(mut self) -> Option<DecompositionResult> {
        if self.state != TaskState::Running {
            return None;
        }
        let received = self.rx.as_ref().and_then(|rx| rx.recv().ok());
        let mut out = None;
        match received {
            Some(result) => self.deliver(result, |r| out = Some(r)),
            None => {
                tracing::error!("Decomposition {} worker exited without a result", self.request);
                self.release();
            }
        }
        out
    }

    fn deliver<F>(&mut self, result: DecompositionResult, on_finished: F)
    where
        F: FnOnce(DecompositionResult),
    {
        self.state = TaskState::Done;
        let guard = self.guard.take();
        on_finished(result);
        drop(guard);
        self.release();
    }

    fn release(&mut self) {
        self.state = TaskState::Done;
        self.rx = None;
        self.guard = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Decomposition {} worker panicked", self.request);
            }
        }
    }
}

/// Outcome of [`Decomposer::request`].
pub enum Dispatch {
    /// Small image: already decomposed on the calling thread.
    Ready(DecompositionResult),
    /// Large image: running on a worker.
    Scheduled(DecompositionTask),
}

/// Routes decomposition requests to the synchronous or background path.
pub struct Decomposer {
    config: DecompositionConfig,
    gate: InteractionGate,
    next_id: u64,
}

impl Decomposer {
    pub fn new(config: DecompositionConfig, gate: InteractionGate) -> Self {
        Self {
            config,
            gate,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &DecompositionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DecompositionConfig) {
        self.config = config;
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn request(&mut self, image: Arc<PixelBuffer>, mode: DecomposeMode) -> Result<Dispatch> {
        self.dispatch(image, mode, None)
    }

    /// Like [`request`](Self::request), with a hook run on the worker once
    /// the result is ready. Unused on the synchronous path.
    pub fn request_with_waker<W>(
        &mut self,
        image: Arc<PixelBuffer>,
        mode: DecomposeMode,
        waker: W,
    ) -> Result<Dispatch>
    where
        W: FnOnce() + Send + 'static,
    {
        self.dispatch(image, mode, Some(Box::new(waker)))
    }

    fn dispatch(
        &mut self,
        image: Arc<PixelBuffer>,
        mode: DecomposeMode,
        waker: Option<Waker>,
    ) -> Result<Dispatch> {
        let request = RequestId(self.next_id);
        self.next_id += 1;

        if !self.config.is_large(image.pixel_count()) {
            let start = Instant::now();
            let buffer = decompose(&image, mode);
            return Ok(Dispatch::Ready(DecompositionResult {
                request,
                mode,
                path: ExecutionPath::Synchronous,
                buffer,
                elapsed: start.elapsed(),
            }));
        }

        if self.gate.is_blocked() {
            tracing::warn!(
                "Decomposition {request} scheduled while another one is still running"
            );
        }
        tracing::info!(
            "Decomposition {request} ({mode}) of {}x{} image moved to a worker thread",
            image.width(),
            image.height()
        );

        let guard = self.gate.acquire();
        let mut task = DecompositionTask::new(request, mode);
        task.start(image, guard, waker)?;
        Ok(Dispatch::Scheduled(task))
    }
}
