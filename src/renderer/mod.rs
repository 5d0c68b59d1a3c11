//! Reveal rendering module
//!
//! Draws the puzzle into a CPU [`Frame`]; the host copies the bytes into a
//! canvas. Each [`RevealMode`] maps to one [`RevealStrategy`]:
//! - `jigsaw`: 4x4 tiles open in seeded order
//! - `curtain`: band revealed from the bottom up
//! - `blur`: whole image, blur shrinks as steps complete
//!
//! Every strategy shows the placeholder only before the first step and the
//! full image after the last one.

pub mod blur;
pub mod curtain;
pub mod frame;
pub mod image;
pub mod jigsaw;
pub mod paint;
pub mod pixel;

pub use blur::BlurReveal;
pub use curtain::CurtainReveal;
pub use frame::{Frame, Rect};
pub use image::{Bitmap, ImageSlot, LoadToken};
pub use jigsaw::JigsawReveal;
pub use pixel::{Rgba, colors};

use crate::reveal::{RevealMode, RevealPlan};

/// Everything a strategy needs besides the image
#[derive(Debug, Clone, Copy)]
pub struct RevealView<'a> {
    /// Last completed step (-1 = not started)
    pub step: i32,
    pub plan: &'a RevealPlan,
    /// Seeded tile permutation for the current puzzle
    pub tile_order: &'a [usize],
    /// Seed for decorative noise (sparkles)
    pub seed: u64,
}

impl RevealView<'_> {
    pub fn is_hidden(&self) -> bool {
        self.step < 0
    }

    pub fn is_solved(&self) -> bool {
        self.plan.is_terminal(self.step)
    }
}

/// One way of partially disclosing the image
pub trait RevealStrategy {
    fn mode(&self) -> RevealMode;

    /// Draw the whole frame for `view`
    fn draw(&self, frame: &mut Frame, image: &Bitmap, view: &RevealView);
}

static JIGSAW: JigsawReveal = JigsawReveal;
static CURTAIN: CurtainReveal = CurtainReveal;
static BLUR: BlurReveal = BlurReveal;

impl RevealMode {
    pub fn strategy(self) -> &'static dyn RevealStrategy {
        match self {
            RevealMode::Jigsaw => &JIGSAW,
            RevealMode::Curtain => &CURTAIN,
            RevealMode::Blur => &BLUR,
        }
    }
}

/// What a render call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Image not loaded yet; frame untouched
    Skipped,
    /// Frame shows the puzzle
    Drawn,
    /// Image failed to load; frame shows the error fill
    ErrorFrame,
}

/// Render the bound image (if any) with `mode`
pub fn render(
    mode: RevealMode,
    slot: &ImageSlot,
    view: &RevealView,
    frame: &mut Frame,
) -> RenderOutcome {
    match slot {
        ImageSlot::Empty | ImageSlot::Pending { .. } => RenderOutcome::Skipped,
        ImageSlot::Failed { .. } => {
            paint::draw_error_frame(frame);
            RenderOutcome::ErrorFrame
        }
        ImageSlot::Loaded { bitmap, .. } => {
            frame.clear();
            mode.strategy().draw(frame, bitmap, view);
            RenderOutcome::Drawn
        }
    }
}
