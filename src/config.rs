//! Configuration management for the face tracker

use crate::constants::{
    CONFIDENCE_THRESHOLD, DEFAULT_MODEL_FILE, DEFAULT_PROTO_FILE, DEFAULT_WAIT_MS, DEFAULT_WINDOW_NAME,
    DETECTION_MEAN, TELLO_ADDRESS, TELLO_BIND_ADDRESS, TELLO_RESPONSE_TIMEOUT_MS, TELLO_VIDEO_URL,
    WORKING_SIZE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "face_tracker.yaml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Face detection configuration
    pub detection: DetectionConfig,

    /// Drone connection configuration
    pub vehicle: VehicleConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Caffe network description
    pub proto_file: PathBuf,

    /// Caffe trained weights
    pub model_file: PathBuf,
}

/// Face detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum confidence for a face (0.0-1.0, inclusive)
    pub confidence_threshold: f32,

    /// Side of the square frame fed to the detector (must be 300)
    pub input_size: i32,

    /// Per-channel mean subtracted before inference
    pub mean: [f64; 3],
}

/// Drone connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Drone command address
    pub address: String,

    /// Local address for the command socket
    pub bind_address: String,

    /// Video stream URL handed to `OpenCV`
    pub video_url: String,

    /// How long to wait for a command acknowledgement
    pub response_timeout_ms: u64,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the annotated frame
    pub enabled: bool,

    /// Window title
    pub window_name: String,

    /// Pause between iterations in milliseconds
    pub wait_ms: i32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            proto_file: PathBuf::from(DEFAULT_PROTO_FILE),
            model_file: PathBuf::from(DEFAULT_MODEL_FILE),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            input_size: WORKING_SIZE,
            mean: DETECTION_MEAN,
        }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            address: TELLO_ADDRESS.to_string(),
            bind_address: TELLO_BIND_ADDRESS.to_string(),
            video_url: TELLO_VIDEO_URL.to_string(),
            response_timeout_ms: TELLO_RESPONSE_TIMEOUT_MS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            wait_ms: DEFAULT_WAIT_MS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        // Control bands are pixel values for this frame size
        if self.detection.input_size != WORKING_SIZE {
            return Err(Error::ConfigError(format!(
                "Detection input size must be {WORKING_SIZE}, got {}",
                self.detection.input_size
            )));
        }

        if self.vehicle.response_timeout_ms == 0 {
            return Err(Error::ConfigError(
                "Vehicle response timeout must be greater than 0".to_string(),
            ));
        }
        if self.display.wait_ms <= 0 {
            return Err(Error::ConfigError("Display wait must be at least 1 ms".to_string()));
        }

        if !self.models.proto_file.exists() {
            return Err(Error::ConfigError(format!(
                "Model proto file not found: {}",
                self.models.proto_file.display()
            )));
        }
        if !self.models.model_file.exists() {
            return Err(Error::ConfigError(format!(
                "Model weights file not found: {}",
                self.models.model_file.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Tello Face Tracker Configuration

# Caffe face detector files
models:
  proto_file: "deploy.prototxt.txt"
  model_file: "res10_300x300_ssd_iter_140000.caffemodel"

# Face detection parameters
detection:
  confidence_threshold: 0.75
  input_size: 300
  mean: [104.0, 117.0, 123.0]

# Drone connection
vehicle:
  address: "192.168.10.1:8889"
  bind_address: "0.0.0.0:8889"
  video_url: "udp://@0.0.0.0:11111"
  response_timeout_ms: 7000

# Display settings
display:
  enabled: true
  window_name: "Image"
  wait_ms: 1
"#;
