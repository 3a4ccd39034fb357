//! Blurred snapshot jobs.
//!
//! `run_blur_job` is the synchronous building block. `BlurWorker` runs the
//! same job on a dedicated thread so the UI loop keeps ticking while a large
//! screen is being blurred; a newer request always wins over an older one.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::blur::{box_blur_cancellable, gaussian_blur_cancellable};
use crate::error::{Error, Result};
use crate::types::{unpack, PixelBuffer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BlurAlgorithm {
    #[default]
    Gaussian,
    #[serde(rename = "box")]
    #[value(name = "box")]
    BoxBlur,
}

/// A finished backdrop, ready to be drawn under an open board.
///
/// Owns the blurred buffer outright; dropping the image releases it.
#[derive(Debug)]
pub struct BackdropImage {
    pixels: PixelBuffer,
}

impl BackdropImage {
    pub fn from_buffer(pixels: PixelBuffer) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Write the image as an RGBA PNG (un-premultiplied).
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let (w, h) = (self.width(), self.height());
        let mut rgba = Vec::with_capacity(w * h * 4);
        for y in 0..h {
            for &p in self.pixels.row(y) {
                let [a, r, g, b] = unpack(p);
                let straight = |c: u32| if a == 0 { 0 } else { (c * 255 / a).min(255) as u8 };
                rgba.extend_from_slice(&[straight(r), straight(g), straight(b), a as u8]);
            }
        }
        let img = image::RgbaImage::from_raw(w as u32, h as u32, rgba)
            .ok_or_else(|| Error::Image(format!("{w}x{h} buffer does not fit an image")))?;
        img.save(path).map_err(|e| Error::Image(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "backdrop exported");
        Ok(())
    }
}

/// Blur `frame` with `algorithm` and wrap it for display. Blocking, CPU-bound.
pub fn run_blur_job(frame: PixelBuffer, algorithm: BlurAlgorithm) -> Result<BackdropImage> {
    run_cancellable(frame, algorithm, &|| false)
}

fn run_cancellable(frame: PixelBuffer, algorithm: BlurAlgorithm, cancelled: &dyn Fn() -> bool) -> Result<BackdropImage> {
    let started = Instant::now();
    let (w, h) = (frame.width(), frame.height());
    let blurred = match algorithm {
        BlurAlgorithm::Gaussian => gaussian_blur_cancellable(frame, cancelled)?,
        BlurAlgorithm::BoxBlur => box_blur_cancellable(frame, cancelled)?,
    };
    info!(?algorithm, width = w, height = h, elapsed = ?started.elapsed(), "blur finished");
    Ok(BackdropImage::from_buffer(blurred))
}

struct Job {
    generation: u64,
    frame: PixelBuffer,
    algorithm: BlurAlgorithm,
}

struct Finished {
    generation: u64,
    result: Result<BackdropImage>,
}

/// One background thread blurring one snapshot at a time.
///
/// Both directions are single-slot channels. Submitting a job bumps the
/// generation; the worker abandons anything older, and `poll` drops any
/// result that is not for the latest generation.
pub struct BlurWorker {
    jobs: Option<Sender<Job>>,
    queued: Receiver<Job>,
    results: Receiver<Finished>,
    generation: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl BlurWorker {
    pub fn spawn() -> Result<Self> {
        let (job_tx, job_rx) = bounded::<Job>(1);
        let (done_tx, done_rx) = bounded::<Finished>(1);
        let generation = Arc::new(AtomicU64::new(0));

        let thread = std::thread::Builder::new()
            .name("blur-worker".into())
            .spawn({
                let jobs = job_rx.clone();
                let undelivered = done_rx.clone();
                let generation = generation.clone();
                move || worker_loop(jobs, done_tx, undelivered, generation)
            })
            .map_err(|e| Error::Worker(e.to_string()))?;

        Ok(Self {
            jobs: Some(job_tx),
            queued: job_rx,
            results: done_rx,
            generation,
            thread: Some(thread),
        })
    }

    /// Queue `frame` for blurring, superseding any job still queued or
    /// running. Returns the job's generation.
    pub fn submit(&self, frame: PixelBuffer, algorithm: BlurAlgorithm) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(jobs) = &self.jobs else { return generation };

        let mut job = Job { generation, frame, algorithm };
        loop {
            match jobs.try_send(job) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    // Replace the stale job still sitting in the slot.
                    if let Ok(stale) = self.queued.try_recv() {
                        debug!(generation = stale.generation, "dropping queued blur job");
                    }
                    job = back;
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!("blur worker is gone, job dropped");
                    break;
                }
            }
        }
        generation
    }

    /// Invalidate whatever is queued or running without starting anything new.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        while self.queued.try_recv().is_ok() {}
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Non-blocking: the latest job's outcome, if it has arrived.
    pub fn poll(&self) -> Option<Result<BackdropImage>> {
        while let Ok(done) = self.results.try_recv() {
            if let Some(result) = self.accept(done) {
                return Some(result);
            }
        }
        None
    }

    /// Block up to `timeout` for the latest job's outcome.
    pub fn wait(&self, timeout: Duration) -> Option<Result<BackdropImage>> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(left) {
                Ok(done) => {
                    if let Some(result) = self.accept(done) {
                        return Some(result);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn accept(&self, done: Finished) -> Option<Result<BackdropImage>> {
        let current = self.generation();
        if done.generation != current {
            debug!(generation = done.generation, current, "discarding stale blur result");
            return None;
        }
        Some(done.result)
    }
}

impl Drop for BlurWorker {
    fn drop(&mut self) {
        self.cancel();
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("blur worker panicked");
            }
        }
    }
}

fn worker_loop(jobs: Receiver<Job>, done: Sender<Finished>, undelivered: Receiver<Finished>, generation: Arc<AtomicU64>) {
    debug!("blur worker started");
    for job in jobs.iter() {
        if job.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = job.generation, "skipping superseded blur job");
            continue;
        }

        let wanted = job.generation;
        let cancelled = || generation.load(Ordering::SeqCst) != wanted;
        let result = match run_cancellable(job.frame, job.algorithm, &cancelled) {
            Err(Error::Cancelled) => {
                debug!(generation = wanted, "blur job cancelled mid-flight");
                continue;
            }
            other => other,
        };

        let mut finished = Finished { generation: wanted, result };
        loop {
            match done.try_send(finished) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    // Nobody collected the previous result; it is stale now.
                    let _ = undelivered.try_recv();
                    finished = back;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
    debug!("blur worker stopped");
}
