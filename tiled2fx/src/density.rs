use crate::error::{MapError, Result};
use crate::objects::SpriteGrid;

/// Number of sprites in the `span` x `span` window whose top-left cell is (xo, yo),
/// clipped to the grid.
pub fn window_count(sprites: &SpriteGrid, xo: usize, yo: usize, span: usize) -> usize {
    let xe = (xo + span).min(sprites.width);
    let ye = (yo + span).min(sprites.height);
    (yo..ye)
        .flat_map(|y| (xo..xe).map(move |x| (x, y)))
        .filter(|&(x, y)| sprites.is_occupied(x, y))
        .count()
}

/// All window positions, top-left corner. A grid smaller than the window is one window.
fn windows(sprites: &SpriteGrid, span: usize) -> impl Iterator<Item = (usize, usize)> {
    let xs = sprites.width.saturating_sub(span);
    let ys = sprites.height.saturating_sub(span);
    (0..=ys).flat_map(move |yo| (0..=xs).map(move |xo| (xo, yo)))
}

/// Window with the most sprites, as (x, y, count)
pub fn busiest(sprites: &SpriteGrid, span: usize) -> Option<(usize, usize, usize)> {
    if sprites.width == 0 || sprites.height == 0 {
        return None;
    }
    windows(sprites, span)
        .map(|(xo, yo)| (xo, yo, window_count(sprites, xo, yo, span)))
        .max_by_key(|w| w.2)
}

/// Make sure the renderer never sees more than `max` sprites, wherever the camera is.
pub fn check(sprites: &SpriteGrid, span: usize, max: usize) -> Result<()> {
    if sprites.width == 0 || sprites.height == 0 {
        return Ok(());
    }
    for (xo, yo) in windows(sprites, span) {
        let count = window_count(sprites, xo, yo, span);
        if count > max {
            return Err(MapError::TooManySprites {
                x: xo,
                y: yo,
                count,
                max,
            });
        }
    }
    Ok(())
}
