//! Hand landmark types produced by the external detector.
//!
//! A detected hand arrives as 21 normalized keypoints in a fixed anatomical
//! order. Nothing here mutates them; the counting code only indexes into
//! the set and compares y-coordinates.

use serde::{Deserialize, Serialize};

/// Number of keypoints reported for each detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices of the hand model.
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Tips of the four non-thumb fingers.
    pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

    /// All five tips, thumb first.
    pub const ALL_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// A single normalized keypoint.
///
/// `x` and `y` are in `[0, 1]` relative to the frame width and height, with
/// `y` growing downward. `z` is depth relative to the wrist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The 21 keypoints of one detected hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarkSet {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarkSet {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Keypoint at `idx`; callers use the constants in [`index`].
    pub fn get(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }
}

/// One captured frame as delivered by the detector bridge: the hands it
/// found (at most two in practice) and the key pressed while it was shown.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub hands: Vec<HandLandmarkSet>,
    #[serde(default)]
    pub key: Option<char>,
}

impl Frame {
    pub fn new(hands: Vec<HandLandmarkSet>) -> Self {
        Self { hands, key: None }
    }

    /// A frame with no hands in view.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }
}

/// Capture resolution used to convert normalized coordinates to pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// A pixel position on the captured frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Project a normalized landmark onto the frame, truncating toward zero.
    pub fn from_landmark(landmark: &Landmark, resolution: Resolution) -> Self {
        Self {
            x: (landmark.x * resolution.width as f32) as i32,
            y: (landmark.y * resolution.height as f32) as i32,
        }
    }
}
