//! Synthetic upright hands for demos and tests.
//!
//! The geometry is a cartoon of a palm facing the camera: wrist at the
//! bottom, fingers in columns, raised tips well above their PIP joints and
//! curled tips just below them.

use super::landmark::{index, HandLandmarkSet, Landmark, LANDMARK_COUNT};

const FINGER_SPACING: f32 = 0.04;

/// Build a hand whose digits are raised according to `raised`
/// (thumb, index, middle, ring, pinky). `left_x` is the normalized x of the
/// thumb column; the other fingers sit to its right.
pub fn hand(raised: [bool; 5], left_x: f32) -> HandLandmarkSet {
    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    let palm_x = left_x + 2.5 * FINGER_SPACING;

    landmarks[index::WRIST] = Landmark::new(palm_x, 0.90, 0.0);

    landmarks[index::THUMB_CMC] = Landmark::new(left_x + 0.02, 0.80, -0.01);
    landmarks[index::THUMB_MCP] = Landmark::new(left_x + 0.01, 0.74, -0.02);
    landmarks[index::THUMB_IP] = Landmark::new(left_x, 0.70, -0.03);
    landmarks[index::THUMB_TIP] = if raised[0] {
        Landmark::new(left_x, 0.62, -0.04)
    } else {
        Landmark::new(left_x + 0.04, 0.84, -0.04)
    };

    for (finger, &tip) in index::FINGER_TIPS.iter().enumerate() {
        let x = left_x + FINGER_SPACING * (finger as f32 + 1.0);
        let mcp = tip - 3;
        landmarks[mcp] = Landmark::new(x, 0.62, 0.0);
        landmarks[mcp + 1] = Landmark::new(x, 0.50, -0.01);
        if raised[finger + 1] {
            landmarks[mcp + 2] = Landmark::new(x, 0.42, -0.02);
            landmarks[tip] = Landmark::new(x, 0.34, -0.03);
        } else {
            landmarks[mcp + 2] = Landmark::new(x, 0.53, -0.02);
            landmarks[tip] = Landmark::new(x, 0.58, -0.03);
        }
    }

    HandLandmarkSet::new(landmarks)
}

/// A hand with the first `n` digits raised, thumb first. `n` is clamped to 5.
pub fn hand_showing(n: u8, left_x: f32) -> HandLandmarkSet {
    let mut raised = [false; 5];
    raised.iter_mut().take(n.min(5) as usize).for_each(|d| *d = true);
    hand(raised, left_x)
}

/// One or two hands showing `total` raised digits (at most 10).
pub fn hands_showing(total: u8) -> Vec<HandLandmarkSet> {
    let total = total.min(10);
    if total <= 5 {
        vec![hand_showing(total, 0.3)]
    } else {
        vec![hand_showing(5, 0.15), hand_showing(total - 5, 0.55)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::count::{count_hand, count_hands};

    #[test]
    fn hand_showing_counts_requested_digits() {
        for n in 0..=5 {
            assert_eq!(count_hand(&hand_showing(n, 0.3)), n);
        }
        assert_eq!(count_hand(&hand_showing(9, 0.3)), 5);
    }

    #[test]
    fn hands_showing_splits_above_five() {
        assert_eq!(hands_showing(3).len(), 1);
        assert_eq!(hands_showing(7).len(), 2);
        assert_eq!(count_hands(&hands_showing(7)), 7);
        assert_eq!(count_hands(&hands_showing(12)), 10);
    }
}
