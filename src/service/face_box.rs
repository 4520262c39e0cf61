//! Normalized detection boxes to pixel-space overlay rectangles.

use crate::types::detection::NormalizedBox;
use serde::{Deserialize, Serialize};

/// Overlay rectangle for an image displayed at a given size.
///
/// `left_col`/`top_row` are offsets from the left/top edge; `right_col`/`bottom_row`
/// are insets from the right/bottom edge, which is what absolute CSS positioning wants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceBox {
    pub left_col: f64,
    pub top_row: f64,
    pub right_col: f64,
    pub bottom_row: f64,
}

impl FaceBox {
    pub fn from_normalized(width: f64, height: f64, b: &NormalizedBox) -> Self {
        Self {
            left_col: b.left_col * width,
            top_row: b.top_row * height,
            right_col: width - b.right_col * width,
            bottom_row: height - b.bottom_row * height,
        }
    }
}

/// One rectangle per box, in input order.
pub fn face_locations(width: f64, height: f64, boxes: &[NormalizedBox]) -> Vec<FaceBox> {
    boxes
        .iter()
        .map(|b| FaceBox::from_normalized(width, height, b))
        .collect()
}
