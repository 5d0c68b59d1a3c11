//! Jigsaw reveal: a 4x4 grid whose tiles open in seeded order

use super::frame::{Frame, Rect};
use super::image::Bitmap;
use super::paint;
use super::{RevealStrategy, RevealView};
use crate::consts::{GRID_SIZE, TOTAL_TILES};
use crate::reveal::RevealMode;

pub struct JigsawReveal;

/// Frame rect covered by tile `index` (row-major)
pub fn tile_rect(index: usize, frame_size: u32) -> Rect {
    let tile = frame_size as f32 / GRID_SIZE as f32;
    let row = index / GRID_SIZE;
    let col = index % GRID_SIZE;
    Rect::new(col as f32 * tile, row as f32 * tile, tile, tile)
}

/// Which tiles are open after `view.step`
pub fn revealed_tiles(view: &RevealView) -> [bool; TOTAL_TILES] {
    let mut open = [false; TOTAL_TILES];
    let count = view.plan.tiles_at(view.step);
    for &tile in view.tile_order.iter().take(count) {
        if tile < TOTAL_TILES {
            open[tile] = true;
        }
    }
    open
}

impl RevealStrategy for JigsawReveal {
    fn mode(&self) -> RevealMode {
        RevealMode::Jigsaw
    }

    fn draw(&self, frame: &mut Frame, image: &Bitmap, view: &RevealView) {
        let open = revealed_tiles(view);
        let size = frame.size();

        for (index, &is_open) in open.iter().enumerate() {
            let rect = tile_rect(index, size);
            if is_open {
                paint::draw_cover(frame, image, rect);
            } else {
                paint::draw_placeholder(frame, image, rect);
                paint::draw_sparkles(frame, rect, view.seed.wrapping_add(index as u64));
                paint::draw_tile_edge(frame, rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::*;
    use crate::reveal::{RevealPlan, default_tile_order};

    #[test]
    fn test_tile_rects_cover_grid() {
        assert_eq!(tile_rect(0, 400), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(tile_rect(5, 400), Rect::new(100.0, 100.0, 100.0, 100.0));
        assert_eq!(tile_rect(15, 400), Rect::new(300.0, 300.0, 100.0, 100.0));
    }

    #[test]
    fn test_first_step_opens_first_tile_in_order() {
        // Five steps: tile thresholds [1, 3, 6, 10, 16]
        let plan = RevealPlan::new(5);
        let order = default_tile_order("komachi");
        let view = RevealView {
            step: 0,
            plan: &plan,
            tile_order: &order,
            seed: 0,
        };
        let open = revealed_tiles(&view);
        assert_eq!(open.iter().filter(|&&o| o).count(), 1);
        assert!(open[order[0]]);
    }

    #[test]
    fn test_not_started_opens_nothing() {
        let plan = RevealPlan::new(5);
        let order = default_tile_order("komachi");
        let view = RevealView {
            step: -1,
            plan: &plan,
            tile_order: &order,
            seed: 0,
        };
        assert!(revealed_tiles(&view).iter().all(|&o| !o));
    }

    #[test]
    fn test_draw_partial_reveal() {
        let image = coord_image(64);
        let plan = RevealPlan::new(5);
        let order = default_tile_order("komachi");
        let view = RevealView {
            step: 1,
            plan: &plan,
            tile_order: &order,
            seed: 3,
        };
        let mut frame = Frame::new(64);
        JigsawReveal.draw(&mut frame, &image, &view);

        // Three 16x16 tiles show the image, the rest is covered
        assert_eq!(count_image_pixels(&frame, &image), 3 * 16 * 16);
        for &tile in &order[..3] {
            let r = tile_rect(tile, 64);
            let (x, y) = (r.min.x as u32 + 8, r.min.y as u32 + 8);
            assert!(shows_image(&frame, &image, x, y));
        }
        let hidden = tile_rect(order[3], 64);
        assert!(!shows_image(&frame, &image, hidden.min.x as u32 + 8, hidden.min.y as u32 + 8));
    }
}
