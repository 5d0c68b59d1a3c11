//! Blur reveal: the whole picture, sharpening as steps complete

use super::frame::Frame;
use super::image::Bitmap;
use super::paint;
use super::{RevealStrategy, RevealView};
use crate::consts::MAX_BLUR_FRACTION;
use crate::reveal::RevealMode;

pub struct BlurReveal;

impl RevealStrategy for BlurReveal {
    fn mode(&self) -> RevealMode {
        RevealMode::Blur
    }

    fn draw(&self, frame: &mut Frame, image: &Bitmap, view: &RevealView) {
        let bounds = frame.bounds();

        if view.is_hidden() {
            paint::draw_placeholder(frame, image, bounds);
            paint::draw_sparkles(frame, bounds, view.seed);
            return;
        }

        paint::draw_cover(frame, image, bounds);
        let percent = view.plan.percent_at(view.step);
        let radius = paint::blur_radius(percent, frame.size(), MAX_BLUR_FRACTION);
        paint::box_blur(frame, radius.round() as u32);
    }
}
