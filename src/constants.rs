//! Constants used throughout the application

/// Default Caffe network description file
pub const DEFAULT_PROTO_FILE: &str = "deploy.prototxt.txt";

/// Default Caffe weights file
pub const DEFAULT_MODEL_FILE: &str = "res10_300x300_ssd_iter_140000.caffemodel";

/// Side length of the square frame fed to the detector
pub const WORKING_SIZE: i32 = 300;

/// Minimum confidence for a detection to count as a face (inclusive)
pub const CONFIDENCE_THRESHOLD: f32 = 0.75;

/// Per-channel mean subtracted from the frame before inference
pub const DETECTION_MEAN: [f64; 3] = [104.0, 117.0, 123.0];

/// Values per row of the SSD output: image id, label, confidence, x1, y1, x2, y2
pub const DETECTION_ROW_LEN: usize = 7;

/// Face area at or below which the drone moves forward
pub const MIN_FACE_AREA: i64 = 6000;

/// Face area at or above which the drone backs off
pub const MAX_FACE_AREA: i64 = 17000;

/// Vertical face midpoint at or above which the drone climbs (image y grows downward)
pub const MIN_FACE_Y_MID: i64 = 70;

/// Vertical face midpoint at or below which the drone descends
pub const MAX_FACE_Y_MID: i64 = 135;

/// Horizontal face midpoint at or left of which the drone yaws left
pub const MIN_FACE_X_MID: i64 = 120;

/// Horizontal face midpoint at or right of which the drone yaws right
pub const MAX_FACE_X_MID: i64 = 180;

/// Forward/backward speed when the face is too small or too large
pub const FORWARD_BACKWARD_SPEED: i32 = 20;

/// Climb/descent speed when the face is off center vertically
pub const UP_DOWN_SPEED: i32 = 15;

/// Yaw speed when the face is off center horizontally
pub const YAW_SPEED: i32 = 25;

/// Tello `rc` command range
pub const RC_LIMIT: i32 = 100;

/// Tello command address
pub const TELLO_ADDRESS: &str = "192.168.10.1:8889";

/// Local address of the command socket
pub const TELLO_BIND_ADDRESS: &str = "0.0.0.0:8889";

/// Tello H.264 video stream
pub const TELLO_VIDEO_URL: &str = "udp://@0.0.0.0:11111";

/// Wait for a command reply or the first video frame
pub const TELLO_RESPONSE_TIMEOUT_MS: u64 = 7000;

/// Title of the display window
pub const DEFAULT_WINDOW_NAME: &str = "Image";

/// Pause between iterations in milliseconds
pub const DEFAULT_WAIT_MS: i32 = 1;

/// Escape key, stops tracking from the display window
pub const KEY_ESCAPE: i32 = 27;

/// `q` key, stops tracking from the display window
pub const KEY_QUIT: i32 = b'q' as i32;
