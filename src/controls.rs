//! Control law mapping a face bounding box to drone velocity commands.
//!
//! Every rule is a threshold on the box measured in the 300×300 working
//! frame. Nothing is remembered between frames.

use crate::constants::{
    FORWARD_BACKWARD_SPEED, MAX_FACE_AREA, MAX_FACE_X_MID, MAX_FACE_Y_MID, MIN_FACE_AREA,
    MIN_FACE_X_MID, MIN_FACE_Y_MID, RC_LIMIT, UP_DOWN_SPEED, YAW_SPEED,
};
use crate::face_detection::FaceBox;
use std::fmt;

/// Four-axis velocity command in the vehicle's native range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RcControls {
    /// Strafe, negative is left
    pub left_right: i32,
    /// Negative is backward
    pub forward_backward: i32,
    /// Negative is down
    pub up_down: i32,
    /// Negative is counter-clockwise
    pub yaw: i32,
}

impl RcControls {
    /// Hover in place
    pub const STOP: Self = Self::new(0, 0, 0, 0);

    /// Create a command from its four axes
    #[must_use]
    pub const fn new(left_right: i32, forward_backward: i32, up_down: i32, yaw: i32) -> Self {
        Self {
            left_right,
            forward_backward,
            up_down,
            yaw,
        }
    }

    /// Same command with every axis limited to `±RC_LIMIT`
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |v: i32| v.clamp(-RC_LIMIT, RC_LIMIT);
        Self::new(
            clamp(self.left_right),
            clamp(self.forward_backward),
            clamp(self.up_down),
            clamp(self.yaw),
        )
    }

    /// Axes in `(left_right, forward_backward, up_down, yaw)` order
    #[must_use]
    pub const fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.left_right, self.forward_backward, self.up_down, self.yaw)
    }
}

impl fmt::Display for RcControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lr={} fb={} ud={} yaw={}",
            self.left_right, self.forward_backward, self.up_down, self.yaw
        )
    }
}

/// Approach a distant face, back away from a close one
///
/// A zero area means no face and yields no motion.
#[must_use]
pub fn forward_backward_velocity(bbox: &FaceBox) -> i32 {
    let area = bbox.area();

    if area == 0 || (MIN_FACE_AREA < area && area < MAX_FACE_AREA) {
        0
    } else if area <= MIN_FACE_AREA {
        FORWARD_BACKWARD_SPEED
    } else {
        -FORWARD_BACKWARD_SPEED
    }
}

/// Climb toward a face high in the frame, descend toward a low one
#[must_use]
pub fn up_down_velocity(bbox: &FaceBox) -> i32 {
    let y_mid = bbox.y_mid();

    if y_mid == 0 || (MIN_FACE_Y_MID < y_mid && y_mid < MAX_FACE_Y_MID) {
        0
    } else if y_mid <= MIN_FACE_Y_MID {
        UP_DOWN_SPEED
    } else {
        -UP_DOWN_SPEED
    }
}

/// Turn toward a face off to either side
#[must_use]
pub fn yaw_velocity(bbox: &FaceBox) -> i32 {
    let x_mid = bbox.x_mid();

    if x_mid == 0 || (MIN_FACE_X_MID < x_mid && x_mid < MAX_FACE_X_MID) {
        0
    } else if x_mid <= MIN_FACE_X_MID {
        -YAW_SPEED
    } else {
        YAW_SPEED
    }
}

/// Full command for a face box
///
/// Distance correction takes priority: vertical centering only runs once the
/// face is in the distance band. Strafing is never used.
#[must_use]
pub fn rc_controls(bbox: &FaceBox) -> RcControls {
    let forward_backward = forward_backward_velocity(bbox);

    let up_down = if forward_backward == 0 {
        up_down_velocity(bbox)
    } else {
        0
    };

    RcControls {
        left_right: 0,
        forward_backward,
        up_down,
        yaw: yaw_velocity(bbox),
    }
}
