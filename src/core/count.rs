//! Finger-count extraction.
//!
//! A non-thumb finger is up when its tip sits above its PIP joint, the thumb
//! when its tip sits above the CMC joint. Smaller y means higher in the
//! frame. Hands are summed with no identity kept between them.

use super::landmark::{index, HandLandmarkSet, PixelPoint, Resolution};

/// Count raised non-thumb fingers on one hand, in `[0, 4]`.
pub fn count_fingers(hand: &HandLandmarkSet) -> u8 {
    index::FINGER_TIPS
        .iter()
        .filter(|&&tip| hand.get(tip).y < hand.get(tip - 2).y)
        .count() as u8
}

/// Whether the thumb tip is above the thumb base.
pub fn thumb_up(hand: &HandLandmarkSet) -> bool {
    hand.get(index::THUMB_TIP).y < hand.get(index::THUMB_CMC).y
}

/// Raised digits on one hand, thumb included, in `[0, 5]`.
pub fn count_hand(hand: &HandLandmarkSet) -> u8 {
    count_fingers(hand) + u8::from(thumb_up(hand))
}

/// Raised digits summed over every detected hand, saturating at `u8::MAX`.
pub fn count_hands(hands: &[HandLandmarkSet]) -> u8 {
    hands.iter().map(count_hand).fold(0, u8::saturating_add)
}

/// Pixel positions of the five tips of one hand, thumb first.
pub fn fingertip_positions(hand: &HandLandmarkSet, resolution: Resolution) -> [PixelPoint; 5] {
    index::ALL_TIPS.map(|tip| PixelPoint::from_landmark(hand.get(tip), resolution))
}

/// Fingertip positions of all hands concatenated in detection order.
pub fn frame_fingertips(hands: &[HandLandmarkSet], resolution: Resolution) -> Vec<PixelPoint> {
    hands
        .iter()
        .flat_map(|hand| fingertip_positions(hand, resolution))
        .collect()
}
