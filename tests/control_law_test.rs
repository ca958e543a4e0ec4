//! Tests for the bounding box to velocity command mapping

use proptest::prelude::*;
use tello_face_tracker::{
    controls::{forward_backward_velocity, rc_controls, up_down_velocity, yaw_velocity, RcControls},
    face_detection::FaceBox,
};

/// Face in the middle of the frame at a comfortable distance
#[test]
fn test_centered_face_holds_position() {
    let controls = rc_controls(&FaceBox::new(100, 60, 200, 160));
    assert_eq!(controls, RcControls::new(0, 0, 0, 0));
}

/// Small face in the top-left corner
#[test]
fn test_small_face_approaches_and_turns_left() {
    let controls = rc_controls(&FaceBox::new(0, 0, 50, 50));
    assert_eq!(controls, RcControls::new(0, 20, 0, -25));
}

/// Large face low in the frame
#[test]
fn test_large_face_backs_away_without_descending() {
    let controls = rc_controls(&FaceBox::new(50, 180, 250, 290));
    assert_eq!(controls, RcControls::new(0, -20, 0, 0));
}

#[test]
fn test_sentinel_box_is_full_stop() {
    assert_eq!(rc_controls(&FaceBox::new(0, 0, 0, 0)), RcControls::STOP);
}

#[test]
fn test_forward_backward_band_edges() {
    // 60 x 100 = 6000, inclusive lower edge
    assert_eq!(forward_backward_velocity(&FaceBox::new(0, 0, 60, 100)), 20);
    // 6001 is inside the band
    assert_eq!(forward_backward_velocity(&FaceBox::new(0, 0, 1, 6001)), 0);
    // 16999 is inside the band
    assert_eq!(forward_backward_velocity(&FaceBox::new(0, 0, 1, 16_999)), 0);
    // 100 x 170 = 17000, inclusive upper edge
    assert_eq!(forward_backward_velocity(&FaceBox::new(0, 0, 100, 170)), -20);
}

#[test]
fn test_zero_area_with_nonzero_corners() {
    // Degenerate line-shaped box still counts as no face for distance
    assert_eq!(forward_backward_velocity(&FaceBox::new(10, 10, 200, 10)), 0);
}

#[test]
fn test_unordered_corners_give_negative_area() {
    // Flipped box has area -10000, which is below the band
    let bbox = FaceBox::new(200, 60, 100, 160);
    assert_eq!(bbox.area(), -10_000);
    assert_eq!(forward_backward_velocity(&bbox), 20);
}

#[test]
fn test_up_down_floor_division() {
    // (0 + 141) // 2 == 70, inclusive lower edge
    assert_eq!(up_down_velocity(&FaceBox::new(0, 0, 0, 141)), 15);
    // (0 + 143) // 2 == 71, inside the band
    assert_eq!(up_down_velocity(&FaceBox::new(0, 0, 0, 143)), 0);
    // (0 + 269) // 2 == 134, inside the band
    assert_eq!(up_down_velocity(&FaceBox::new(0, 0, 0, 269)), 0);
    // (0 + 270) // 2 == 135, inclusive upper edge
    assert_eq!(up_down_velocity(&FaceBox::new(0, 0, 0, 270)), -15);
}

#[test]
fn test_up_down_zero_midpoint_is_no_face() {
    assert_eq!(up_down_velocity(&FaceBox::new(0, 0, 0, 1)), 0);
    assert_eq!(up_down_velocity(&FaceBox::new(0, -5, 0, 5)), 0);
}

#[test]
fn test_up_down_negative_midpoint_floors() {
    // (-1 + 0) // 2 == -1, above the frame
    assert_eq!(up_down_velocity(&FaceBox::new(0, -1, 0, 0)), 15);
}

#[test]
fn test_yaw_band_edges() {
    assert_eq!(yaw_velocity(&FaceBox::new(100, 0, 140, 0)), -25);
    assert_eq!(yaw_velocity(&FaceBox::new(100, 0, 143, 0)), 0);
    assert_eq!(yaw_velocity(&FaceBox::new(160, 0, 199, 0)), 0);
    assert_eq!(yaw_velocity(&FaceBox::new(160, 0, 200, 0)), 25);
    assert_eq!(yaw_velocity(&FaceBox::new(-1, 0, 1, 0)), 0);
}

#[test]
fn test_extreme_coordinates_do_not_overflow() {
    let bbox = FaceBox::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
    let controls = rc_controls(&bbox);
    assert_eq!(controls.forward_backward, -20);
    assert_eq!(controls.up_down, 0);
}

#[test]
fn test_repeated_calls_are_identical() {
    let bbox = FaceBox::new(37, 81, 122, 190);
    let first = rc_controls(&bbox);
    for _ in 0..10 {
        assert_eq!(rc_controls(&bbox), first);
    }
}

fn face_box() -> impl Strategy<Value = FaceBox> {
    (-400..700i32, -400..700i32, -400..700i32, -400..700i32)
        .prop_map(|(x1, y1, x2, y2)| FaceBox::new(x1, y1, x2, y2))
}

fn floor_mid(a: i32, b: i32) -> i64 {
    ((i64::from(a) + i64::from(b)) as f64 / 2.0).floor() as i64
}

proptest! {
    #[test]
    fn prop_left_right_always_zero(bbox in face_box()) {
        prop_assert_eq!(rc_controls(&bbox).left_right, 0);
    }

    #[test]
    fn prop_forward_backward_follows_area(bbox in face_box()) {
        let area = i64::from(bbox.y2 - bbox.y1) * i64::from(bbox.x2 - bbox.x1);
        let expected = if area == 0 || (6000 < area && area < 17_000) {
            0
        } else if area <= 6000 {
            20
        } else {
            -20
        };
        prop_assert_eq!(rc_controls(&bbox).forward_backward, expected);
    }

    #[test]
    fn prop_distance_correction_suppresses_vertical(bbox in face_box()) {
        let controls = rc_controls(&bbox);
        if controls.forward_backward != 0 {
            prop_assert_eq!(controls.up_down, 0);
        }
    }

    #[test]
    fn prop_up_down_follows_vertical_midpoint(bbox in face_box()) {
        let controls = rc_controls(&bbox);
        prop_assume!(controls.forward_backward == 0);

        let y_mid = floor_mid(bbox.y1, bbox.y2);
        let expected = if y_mid == 0 || (70 < y_mid && y_mid < 135) {
            0
        } else if y_mid <= 70 {
            15
        } else {
            -15
        };
        prop_assert_eq!(controls.up_down, expected);
    }

    #[test]
    fn prop_yaw_follows_horizontal_midpoint(bbox in face_box()) {
        let x_mid = floor_mid(bbox.x1, bbox.x2);
        let expected = if x_mid == 0 || (120 < x_mid && x_mid < 180) {
            0
        } else if x_mid <= 120 {
            -25
        } else {
            25
        };
        prop_assert_eq!(rc_controls(&bbox).yaw, expected);
    }

    #[test]
    fn prop_yaw_independent_of_distance(x1 in -400..700i32, x2 in -400..700i32, h1 in 1..400i32, h2 in 1..400i32) {
        let near = rc_controls(&FaceBox::new(x1, 0, x2, h1));
        let far = rc_controls(&FaceBox::new(x1, 0, x2, h2));
        prop_assert_eq!(near.yaw, far.yaw);
    }

    #[test]
    fn prop_in_band_area_never_moves_forward_or_back(
        x1 in 0..300i32,
        y1 in 0..300i32,
        w in 80..120i32,
        h in 80..120i32,
    ) {
        // 80 x 80 = 6400 up to 119 x 119 = 14161, all inside the band
        let controls = rc_controls(&FaceBox::new(x1, y1, x1 + w, y1 + h));
        prop_assert_eq!(controls.forward_backward, 0);
    }
}
