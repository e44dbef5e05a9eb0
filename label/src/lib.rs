//! Class labels attached to bounding boxes, and the suppression of overlapping detections.

mod common;
pub mod nms;

pub use nms::*;

use bbox::{CyCxHW, Rect, TLBR};
use num_traits::Num;
use noisy_float::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<R, C>
where
    R: Rect,
{
    pub rect: R,
    pub class: C,
}

/// A label scored by a detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection<R, C>
where
    R: Rect,
{
    pub label: Label<R, C>,
    pub confidence: R64,
}

impl<R, C> Detection<R, C>
where
    R: Rect,
{
    pub fn new(rect: R, class: C, confidence: R64) -> Self {
        Self {
            label: Label { rect, class },
            confidence,
        }
    }

    pub fn rect(&self) -> &R {
        &self.label.rect
    }

    pub fn class(&self) -> &C {
        &self.label.class
    }
}

impl<T, C> From<Label<CyCxHW<T>, C>> for Label<TLBR<T>, C>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: Label<CyCxHW<T>, C>) -> Self {
        let Label { rect, class } = from;
        Label {
            rect: TLBR::from(&rect),
            class,
        }
    }
}

impl<T, C> From<Detection<CyCxHW<T>, C>> for Detection<TLBR<T>, C>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: Detection<CyCxHW<T>, C>) -> Self {
        let Detection { label, confidence } = from;
        Detection {
            label: label.into(),
            confidence,
        }
    }
}
