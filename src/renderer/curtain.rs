//! Curtain reveal: the image opens from the bottom up

use super::frame::{Frame, Rect};
use super::image::Bitmap;
use super::paint;
use super::{RevealStrategy, RevealView};
use crate::reveal::RevealMode;

pub struct CurtainReveal;

/// Height (pixels) of the revealed bottom band
pub fn revealed_height(view: &RevealView, frame_size: u32) -> f32 {
    frame_size as f32 * view.plan.percent_at(view.step)
}

impl RevealStrategy for CurtainReveal {
    fn mode(&self) -> RevealMode {
        RevealMode::Curtain
    }

    fn draw(&self, frame: &mut Frame, image: &Bitmap, view: &RevealView) {
        let size = frame.size() as f32;
        let shown = revealed_height(view, frame.size());
        let covered = size - shown;

        let bottom = Rect::new(0.0, covered, size, shown);
        let top = Rect::new(0.0, 0.0, size, covered);

        paint::draw_cover(frame, image, bottom);
        paint::draw_placeholder(frame, image, top);
        paint::draw_sparkles(frame, top, view.seed);

        // Divider only while something is both hidden and shown
        if !bottom.is_empty() && !top.is_empty() {
            paint::draw_divider(frame, covered);
        }
    }
}
