// ABOUTME: Batch generation module for the feed-slides application
// ABOUTME: Generates slide images one by one with pacing, resumption and cancellation

use crate::client::{self, GenerationClient};
use crate::errors::{FeedError, Result};
use crate::images::ImageData;
use crate::model::{Project, Slide};
use crate::prompt::compile_prompt;
use crate::references::resolve_references;
use crate::store::ResultStore;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Lifecycle of one slide: pending, generating, then done or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideStatus {
    Pending,
    Generating,
    Done,
    Error,
}

/// Lifecycle of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Options for batch generation
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Wait between consecutive slides, to stay under the service's rate limit.
    pub pacing: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(2),
        }
    }
}

/// Point-in-time view of a run, for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSnapshot {
    pub run: RunState,
    pub statuses: BTreeMap<usize, SlideStatus>,
    /// Slide most recently dispatched.
    pub previewing: Option<usize>,
    pub errors: BTreeMap<usize, String>,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub state: RunState,
    pub generated: Vec<usize>,
    pub skipped: Vec<usize>,
    pub failed: Vec<usize>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<BatchSnapshot>,
    results: Mutex<ResultStore>,
    cancel: AtomicBool,
}

/// Shared view of a generator's state. Clone it to observe progress or
/// request cancellation from another thread.
#[derive(Clone, Default)]
pub struct BatchHandle {
    shared: Arc<Shared>,
}

impl BatchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running batch to stop. The in-flight request is not aborted;
    /// the loop stops before the next slide.
    pub fn cancel(&self) {
        info!("Cancellation requested");
        self.shared.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> BatchSnapshot {
        self.shared.state.lock().clone()
    }

    pub fn run_state(&self) -> RunState {
        self.shared.state.lock().run
    }

    pub fn status(&self, index: usize) -> Option<SlideStatus> {
        self.shared.state.lock().statuses.get(&index).copied()
    }

    pub fn results(&self) -> ResultStore {
        self.shared.results.lock().clone()
    }

    fn set_status(&self, index: usize, status: SlideStatus) {
        let mut state = self.shared.state.lock();
        state.statuses.insert(index, status);
        if status == SlideStatus::Generating {
            state.previewing = Some(index);
        }
    }

    fn record_error(&self, index: usize, message: String) {
        let mut state = self.shared.state.lock();
        state.statuses.insert(index, SlideStatus::Error);
        state.errors.insert(index, message);
    }
}

/// Called with each freshly generated image, before the run moves on.
pub type SlideCallback = Box<dyn Fn(usize, &ImageData) -> Result<()> + Send + Sync>;

/// Leaves the run state terminal even when the loop unwinds.
struct RunGuard<'a> {
    handle: &'a BatchHandle,
}

impl RunGuard<'_> {
    fn finish(&self) -> RunState {
        let final_state = if self.handle.is_cancelled() {
            RunState::Cancelled
        } else {
            RunState::Completed
        };
        self.handle.shared.state.lock().run = final_state;
        final_state
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.handle.run_state() == RunState::Running {
            warn!("Batch loop exited early");
            self.finish();
        }
    }
}

/// Drives a [`GenerationClient`] across the slides of a project.
pub struct Generator<C> {
    client: C,
    options: BatchOptions,
    handle: BatchHandle,
    on_slide_done: Option<SlideCallback>,
}

impl<C: GenerationClient> Generator<C> {
    pub fn new(client: C, options: BatchOptions) -> Self {
        Self::with_handle(client, options, BatchHandle::new())
    }

    /// Build around an existing handle, e.g. one already shared with a UI.
    pub fn with_handle(client: C, options: BatchOptions, handle: BatchHandle) -> Self {
        Self {
            client,
            options,
            handle,
            on_slide_done: None,
        }
    }

    /// Hand every generated image to `callback` as soon as it arrives, e.g. to
    /// write it to disk so an interrupted run keeps its finished slides.
    /// A failing callback is logged and does not fail the slide.
    pub fn with_on_slide_done<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, &ImageData) -> Result<()> + Send + Sync + 'static,
    {
        self.on_slide_done = Some(Box::new(callback));
        self
    }

    /// Seed previously generated images; those slides are skipped by batch runs.
    pub fn with_results(self, results: ResultStore) -> Self {
        *self.handle.shared.results.lock() = results;
        self
    }

    pub fn handle(&self) -> BatchHandle {
        self.handle.clone()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn results(&self) -> ResultStore {
        self.handle.results()
    }

    /// Generate every slide that has no image yet, strictly in display order.
    ///
    /// A failing slide is recorded as `Error` and the run moves on. Starting a
    /// run while another is active fails with [`FeedError::BatchInProgress`].
    pub fn run_batch(&self, project: &Project) -> Result<BatchReport> {
        self.client.ensure_credential()?;

        let slides = project.deck.slides();
        {
            let mut state = self.handle.shared.state.lock();
            if state.run == RunState::Running {
                warn!("Batch start ignored: a run is already active");
                return Err(FeedError::BatchInProgress);
            }
            *state = BatchSnapshot {
                run: RunState::Running,
                statuses: (0..slides.len()).map(|i| (i, SlideStatus::Pending)).collect(),
                previewing: None,
                errors: BTreeMap::new(),
            };
        }
        self.handle.shared.cancel.store(false, Ordering::SeqCst);
        let guard = RunGuard {
            handle: &self.handle,
        };

        info!("Starting batch generation of {} slides", slides.len());
        let start_time = Instant::now();
        let last = slides.len().saturating_sub(1);
        let mut report = BatchReport {
            state: RunState::Running,
            generated: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        };

        for (index, slide) in slides.into_iter().enumerate() {
            if self.handle.is_cancelled() {
                break;
            }

            if self.handle.shared.results.lock().contains(index) {
                debug!("Slide {} already generated, skipping", index + 1);
                self.handle.set_status(index, SlideStatus::Done);
                report.skipped.push(index);
                continue;
            }

            self.handle.set_status(index, SlideStatus::Generating);
            info!("Generating slide {} ({})", index + 1, slide.label());

            match self.generate_slide(project, slide) {
                Ok(image) => {
                    self.store_result(index, image);
                    report.generated.push(index);
                }
                Err(e) => {
                    warn!("Slide {} failed: {}", index + 1, e);
                    self.handle.record_error(index, e.to_string());
                    report.failed.push(index);
                }
            }

            if index < last {
                if self.handle.is_cancelled() {
                    break;
                }
                if !self.options.pacing.is_zero() {
                    debug!("Waiting {:?} before the next slide", self.options.pacing);
                    std::thread::sleep(self.options.pacing);
                }
            }
        }

        let final_state = guard.finish();
        report.state = final_state;

        info!(
            "Batch {:?} in {:.2} seconds: {} generated, {} skipped, {} failed",
            final_state,
            start_time.elapsed().as_secs_f64(),
            report.generated.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Generate one slide regardless of any stored image, replacing it on success.
    ///
    /// Callers must not run this for a slide the batch loop is processing.
    pub fn generate_single(&self, project: &Project, index: usize) -> Result<()> {
        self.client.ensure_credential()?;
        let slide = project
            .deck
            .slide(index)
            .ok_or(FeedError::SlideNotFound(index))?;

        self.handle.set_status(index, SlideStatus::Generating);
        info!("Regenerating slide {} ({})", index + 1, slide.label());

        match self.generate_slide(project, slide) {
            Ok(image) => {
                self.store_result(index, image);
                Ok(())
            }
            Err(e) => {
                warn!("Slide {} failed: {}", index + 1, e);
                self.handle.record_error(index, e.to_string());
                Err(e)
            }
        }
    }

    fn store_result(&self, index: usize, image: ImageData) {
        if let Some(callback) = &self.on_slide_done {
            if let Err(e) = callback(index, &image) {
                warn!("Could not hand off slide {}: {}", index + 1, e);
            }
        }
        self.handle.shared.results.lock().insert(index, image);
        self.handle.set_status(index, SlideStatus::Done);
    }

    fn generate_slide(&self, project: &Project, slide: Slide<'_>) -> Result<ImageData> {
        let prompt = compile_prompt(project, slide);
        let references = resolve_references(project, slide);
        debug!(
            "Prompt of {} chars with {} reference image(s)",
            prompt.chars().count(),
            references.len()
        );
        client::dispatch(&self.client, &prompt, &references)
    }
}
