//! Face tracking for the Tello quadcopter.
//!
//! The drone keeps the most confident face in its camera feed centered and at
//! a comfortable distance. Each iteration:
//! 1. Grab a frame from the drone and resize it to 300×300
//! 2. Run an SSD face detector (`OpenCV` DNN, Caffe weights)
//! 3. Pick the most confident face
//! 4. Map its bounding box to a four-axis velocity command
//! 5. Send the command to the drone
//!
//! # Examples
//!
//! ## Control Law
//!
//! ```
//! use tello_face_tracker::{controls::{rc_controls, RcControls}, face_detection::FaceBox};
//!
//! // Small face on the left: approach and turn left
//! let controls = rc_controls(&FaceBox::new(0, 0, 50, 50));
//! assert_eq!(controls, RcControls::new(0, 20, 0, -25));
//! ```
//!
//! ## Complete Pipeline
//!
//! ```no_run
//! use tello_face_tracker::{
//!     app::FaceTrackingApp,
//!     config::Config,
//!     face_detection::CaffeFaceDetector,
//!     tello::TelloDrone,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let detector = CaffeFaceDetector::new(&config.models.proto_file, &config.models.model_file)?;
//! let drone = TelloDrone::new(&config.vehicle)?;
//!
//! let mut app = FaceTrackingApp::new(config, detector, drone);
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Face detection and best-candidate selection
pub mod face_detection;

/// Bounding box to velocity command mapping
pub mod controls;

/// Vehicle capability trait
pub mod vehicle;

/// Tello SDK client
pub mod tello;

/// Latest-frame video reader
pub mod video;

/// Tracking loop
pub mod app;

/// Utility functions for frames and numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
