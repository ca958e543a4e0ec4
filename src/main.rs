//! Tello face tracker: flies toward the most confident face until stopped.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use tello_face_tracker::{
    app::FaceTrackingApp,
    config::{Config, DEFAULT_CONFIG_FILE},
    face_detection::CaffeFaceDetector,
    tello::TelloDrone,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tracks faces with Tello drone", long_about = None)]
struct Args {
    /// Path to the model proto file [default: deploy.prototxt.txt]
    #[arg(long = "proto_file")]
    proto_file: Option<PathBuf>,

    /// Path to the model file [default: res10_300x300_ssd_iter_140000.caffemodel]
    #[arg(long = "model_file")]
    model_file: Option<PathBuf>,
}

impl Args {
    /// Overlay the command-line model paths on a loaded configuration
    fn apply(self, mut config: Config) -> Config {
        if let Some(proto_file) = self.proto_file {
            config.models.proto_file = proto_file;
        }
        if let Some(model_file) = self.model_file {
            config.models.model_file = model_file;
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Tello Face Tracker");

    let config = Config::load_or_default(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("Failed to load {DEFAULT_CONFIG_FILE}"))?;
    let config = args.apply(config);
    config.validate()?;

    // Model must load before the drone takes off
    let detector = CaffeFaceDetector::with_params(
        &config.models.proto_file,
        &config.models.model_file,
        config.detection.confidence_threshold,
        config.detection.mean,
    )
    .context("Failed to load face detection model")?;

    let drone = TelloDrone::new(&config.vehicle).context("Failed to open drone connection")?;

    let mut app = FaceTrackingApp::new(config, detector, drone);
    app.run()?;

    Ok(())
}
