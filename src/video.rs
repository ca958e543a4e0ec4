//! Background video reader that keeps only the newest decoded frame.
//!
//! The reader thread decodes continuously and overwrites a single slot, so a
//! consumer slower than the stream never works through a backlog.

use crate::error::{Error, Result};
use log::{debug, warn};
use opencv::{core::Mat, prelude::*, videoio::VideoCapture};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex, MutexGuard,
};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Slot {
    frame: Option<Mat>,
    error: Option<String>,
    received: u64,
}

/// Single-frame buffer shared between the reader thread and the consumer
#[derive(Default)]
pub struct LatestFrame {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot>> {
        self.slot
            .lock()
            .map_err(|_| Error::Vehicle("Frame buffer lock poisoned".to_string()))
    }

    /// Replace the held frame
    pub fn publish(&self, frame: Mat) -> Result<()> {
        let mut slot = self.lock()?;
        slot.frame = Some(frame);
        slot.received += 1;
        self.ready.notify_all();
        Ok(())
    }

    /// Mark the stream as failed; later reads return `reason`
    pub fn fail(&self, reason: String) -> Result<()> {
        let mut slot = self.lock()?;
        slot.error = Some(reason);
        self.ready.notify_all();
        Ok(())
    }

    /// Number of frames published so far
    pub fn received(&self) -> Result<u64> {
        Ok(self.lock()?.received)
    }

    /// Copy of the newest frame, waiting up to `timeout` for the first one
    ///
    /// # Errors
    ///
    /// Returns `Error::Vehicle` if the stream failed or no frame arrived in time
    pub fn latest(&self, timeout: Duration) -> Result<Mat> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock()?;

        loop {
            if let Some(reason) = &slot.error {
                return Err(Error::Vehicle(reason.clone()));
            }
            if let Some(frame) = &slot.frame {
                return Ok(frame.try_clone()?);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Vehicle(format!(
                    "No video frame within {} ms",
                    timeout.as_millis()
                )));
            }

            let (guard, _) = self
                .ready
                .wait_timeout(slot, remaining)
                .map_err(|_| Error::Vehicle("Frame buffer lock poisoned".to_string()))?;
            slot = guard;
        }
    }
}

/// Owns the decoding thread for one capture
pub struct FrameReader {
    frames: Arc<LatestFrame>,
    running: Arc<AtomicBool>,
}

impl FrameReader {
    /// Start decoding `cap` on a dedicated thread
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn(mut cap: VideoCapture) -> Result<Self> {
        let frames = Arc::new(LatestFrame::new());
        let running = Arc::new(AtomicBool::new(true));

        let frames_clone = Arc::clone(&frames);
        let running_clone = Arc::clone(&running);

        thread::Builder::new()
            .name("video-reader".to_string())
            .spawn(move || {
                let mut frame = Mat::default();
                while running_clone.load(Ordering::Relaxed) {
                    match cap.read(&mut frame) {
                        Ok(true) if !frame.empty() => {
                            if frames_clone.publish(std::mem::take(&mut frame)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {
                            warn!("Video stream ended");
                            let _ = frames_clone.fail("Video stream ended".to_string());
                            break;
                        }
                        Err(e) => {
                            warn!("Video stream read failed: {}", e);
                            let _ = frames_clone.fail(format!("Failed to read frame from video stream: {e}"));
                            break;
                        }
                    }
                }
                debug!("Video reader stopped");
            })?;

        Ok(Self { frames, running })
    }

    /// Copy of the newest decoded frame
    ///
    /// # Errors
    ///
    /// See [`LatestFrame::latest`]
    pub fn latest(&self, timeout: Duration) -> Result<Mat> {
        self.frames.latest(timeout)
    }
}

impl Drop for FrameReader {
    /// The thread exits after its current read returns
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC1};

    fn filled(value: f64) -> Mat {
        Mat::new_rows_cols_with_default(2, 2, CV_8UC1, Scalar::all(value)).unwrap()
    }

    fn value_of(frame: &Mat) -> u8 {
        *frame.at_2d::<u8>(0, 0).unwrap()
    }

    #[test]
    fn test_latest_returns_newest_frame() {
        let frames = LatestFrame::new();
        for value in [10.0, 20.0, 30.0] {
            frames.publish(filled(value)).unwrap();
        }

        let frame = frames.latest(Duration::from_millis(10)).unwrap();
        assert_eq!(value_of(&frame), 30);
        assert_eq!(frames.received().unwrap(), 3);
    }

    #[test]
    fn test_latest_times_out_without_frames() {
        let frames = LatestFrame::new();
        assert!(matches!(frames.latest(Duration::from_millis(20)), Err(Error::Vehicle(_))));
    }

    #[test]
    fn test_failure_is_reported() {
        let frames = LatestFrame::new();
        frames.publish(filled(1.0)).unwrap();
        frames.fail("Video stream ended".to_string()).unwrap();

        match frames.latest(Duration::from_millis(10)) {
            Err(Error::Vehicle(msg)) => assert!(msg.contains("ended")),
            other => panic!("Expected vehicle error, got {other:?}"),
        }
    }

    #[test]
    fn test_waiting_consumer_is_woken() {
        let frames = Arc::new(LatestFrame::new());
        let producer = Arc::clone(&frames);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            producer.publish(filled(7.0)).unwrap();
        });

        let frame = frames.latest(Duration::from_secs(5)).unwrap();
        assert_eq!(value_of(&frame), 7);
        handle.join().unwrap();
    }
}
