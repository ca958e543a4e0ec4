//! Tracking loop that keeps a face centered in the drone's camera feed.

use crate::{
    config::Config,
    constants::{KEY_ESCAPE, KEY_QUIT},
    controls::{rc_controls, RcControls},
    error::{Error, Result},
    face_detection::{select_most_confident, Detection, Detector, FaceBox},
    utils::resize_to_working,
    vehicle::Vehicle,
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_AUTOSIZE},
    imgproc::{self, LINE_8},
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

/// Lifecycle of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Vehicle and model not yet ready
    Initializing,
    /// Processing frames
    Tracking,
    /// Stopped, either on request or after an error
    Terminated,
}

/// Outcome of one tracking iteration
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    /// Everything the detector returned, sentinel first
    pub detections: Vec<Detection>,
    /// Box the controls were computed from
    pub target: FaceBox,
    /// Command sent to the vehicle
    pub controls: RcControls,
}

/// Face tracking application
pub struct FaceTrackingApp<D: Detector, V: Vehicle> {
    config: Config,
    detector: D,
    vehicle: V,
    state: TrackerState,
    stop: Arc<AtomicBool>,
}

impl<D: Detector, V: Vehicle> FaceTrackingApp<D, V> {
    /// Create a tracker around a loaded detector and an unconnected vehicle
    pub fn new(config: Config, detector: D, vehicle: V) -> Self {
        Self {
            config,
            detector,
            vehicle,
            state: TrackerState::Initializing,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use an externally owned stop signal
    #[must_use]
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that stops [`FaceTrackingApp::run`] when set
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Current lifecycle state
    pub const fn state(&self) -> TrackerState {
        self.state
    }

    /// The vehicle being driven
    pub const fn vehicle(&self) -> &V {
        &self.vehicle
    }

    /// The detector in use
    pub const fn detector(&self) -> &D {
        &self.detector
    }

    /// Bring the vehicle up and start tracking
    ///
    /// Opens the display window, then connects, starts the video stream,
    /// reports the battery, takes off and hovers. Any failure terminates the
    /// tracker.
    pub fn start(&mut self) -> Result<()> {
        if self.state != TrackerState::Initializing {
            return Err(Error::InvalidInput(format!(
                "Cannot start tracker in state {:?}",
                self.state
            )));
        }

        info!("Initializing face tracker");
        if let Err(e) = self.open_display().and_then(|()| self.bring_up()) {
            self.state = TrackerState::Terminated;
            return Err(e);
        }

        self.state = TrackerState::Tracking;
        info!("Tracking");
        Ok(())
    }

    fn open_display(&self) -> Result<()> {
        if self.config.display.enabled {
            highgui::named_window(&self.config.display.window_name, WINDOW_AUTOSIZE)?;
        }
        Ok(())
    }

    fn bring_up(&mut self) -> Result<()> {
        self.vehicle.connect()?;
        self.vehicle.stream_on()?;

        let battery = self.vehicle.battery()?;
        info!("Battery: {}%", battery);

        self.vehicle.takeoff()?;
        self.vehicle.send_velocity(RcControls::STOP)?;
        Ok(())
    }

    /// Run one capture → detect → control → dispatch iteration
    pub fn step(&mut self) -> Result<FrameResult> {
        if self.state != TrackerState::Tracking {
            return Err(Error::InvalidInput(format!(
                "Cannot track in state {:?}",
                self.state
            )));
        }

        let raw = self.vehicle.frame()?;
        let mut frame = resize_to_working(&raw, self.config.detection.input_size)?;

        let detections = self.detector.detect(&frame)?;
        let target = select_most_confident(&detections);
        let controls = rc_controls(&target);

        debug!("Target {:?} -> {}", target, controls);
        self.vehicle.send_velocity(controls)?;

        if self.config.display.enabled {
            self.display(&mut frame, &target)?;
        }

        Ok(FrameResult {
            detections,
            target,
            controls,
        })
    }

    /// Start if needed, then track until the stop signal is raised
    ///
    /// A graceful stop halts and lands the vehicle. Errors end the loop
    /// immediately and are returned as-is.
    pub fn run(&mut self) -> Result<()> {
        if self.state == TrackerState::Initializing {
            self.start()?;
        }

        let mut frame_count: u64 = 0;
        let mut last_report = Instant::now();

        while !self.stop.load(Ordering::SeqCst) {
            if let Err(e) = self.step().and_then(|_| self.pause()) {
                self.state = TrackerState::Terminated;
                return Err(e);
            }

            frame_count += 1;
            if last_report.elapsed() >= Duration::from_secs(1) {
                let fps = frame_count as f64 / last_report.elapsed().as_secs_f64();
                debug!("{} frames processed, {:.1} fps", frame_count, fps);
                frame_count = 0;
                last_report = Instant::now();
            }
        }

        info!("Stop requested");
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        self.state = TrackerState::Terminated;

        self.vehicle.send_velocity(RcControls::STOP)?;
        self.vehicle.land()?;

        if self.config.display.enabled {
            if let Err(e) = highgui::destroy_window(&self.config.display.window_name) {
                warn!("Failed to close display window: {}", e);
            }
        }

        info!("Face tracker terminated");
        Ok(())
    }

    /// Yield briefly between iterations; a quit key raises the stop signal
    fn pause(&self) -> Result<()> {
        let wait_ms = self.config.display.wait_ms.max(1);

        if self.config.display.enabled {
            let key = highgui::wait_key(wait_ms)?;
            if key == KEY_ESCAPE || key == KEY_QUIT {
                info!("Exit requested by user");
                self.stop.store(true, Ordering::SeqCst);
            }
        } else {
            thread::sleep(Duration::from_millis(u64::from(wait_ms.unsigned_abs())));
        }

        Ok(())
    }

    fn display(&self, frame: &mut Mat, target: &FaceBox) -> Result<()> {
        imgproc::rectangle_points(
            frame,
            Point::new(target.x1, target.y1),
            Point::new(target.x2, target.y2),
            Scalar::new(0.0, 0.0, 255.0, 0.0),
            1,
            LINE_8,
            0,
        )?;
        highgui::imshow(&self.config.display.window_name, &*frame)?;
        Ok(())
    }
}
