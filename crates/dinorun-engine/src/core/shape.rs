//! Collision shapes of the agent and obstacle segments.
//!
//! Shapes are generated once and shared for the lifetime of the process.

use std::sync::LazyLock;

use super::mask::CollisionMask;

pub const AGENT_WIDTH: usize = 58;
pub const AGENT_HEIGHT: usize = 66;

/// Width and height of each obstacle segment, in segment order.
pub const SEGMENT_SIZES: [(usize, usize); 3] = [(46, 50), (50, 50), (42, 50)];

static AGENT_MASK: LazyLock<CollisionMask> = LazyLock::new(|| {
    // (x range, y range) blocks of the runner silhouette, facing right.
    const BLOCKS: [(usize, usize, usize, usize); 6] = [
        (30, 58, 0, 20),  // head
        (10, 44, 18, 46), // torso
        (0, 12, 22, 36),  // tail
        (44, 50, 28, 34), // arm
        (14, 22, 46, 66), // back leg
        (32, 40, 46, 66), // front leg
    ];
    CollisionMask::from_fn(AGENT_WIDTH, AGENT_HEIGHT, |x, y| {
        BLOCKS
            .iter()
            .any(|&(x0, x1, y0, y1)| (x0..x1).contains(&x) && (y0..y1).contains(&y))
    })
});

static SEGMENT_MASKS: LazyLock<[CollisionMask; 3]> =
    LazyLock::new(|| SEGMENT_SIZES.map(|(width, height)| dome(width, height)));

/// Half-ellipse standing on the bottom edge of a `width` x `height` box.
#[expect(clippy::cast_precision_loss)]
fn dome(width: usize, height: usize) -> CollisionMask {
    let rx = width as f32 / 2.0;
    let ry = height as f32;
    CollisionMask::from_fn(width, height, |x, y| {
        let nx = (x as f32 + 0.5 - rx) / rx;
        let ny = (height - y) as f32 / ry;
        nx * nx + ny * ny <= 1.0
    })
}

#[must_use]
pub fn agent_mask() -> &'static CollisionMask {
    &AGENT_MASK
}

/// Mask of the `index`-th segment of an obstacle group.
///
/// # Panics
///
/// Panics if `index` is 3 or more.
#[must_use]
pub fn segment_mask(index: usize) -> &'static CollisionMask {
    &SEGMENT_MASKS[index]
}

#[must_use]
pub fn segment_width(index: usize) -> i32 {
    segment_mask(index)
        .width()
        .try_into()
        .expect("segment width fits in i32")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_mask_dimensions() {
        let mask = agent_mask();
        assert_eq!(mask.width(), AGENT_WIDTH);
        assert_eq!(mask.height(), AGENT_HEIGHT);
        // Feet touch the bottom row so a grounded runner meets low obstacles.
        assert!(mask.is_set(18, AGENT_HEIGHT - 1));
        assert!(mask.is_set(36, AGENT_HEIGHT - 1));
        assert!(!mask.is_set(0, 0));
    }

    #[test]
    fn test_segment_masks_are_domes() {
        for (i, (width, height)) in SEGMENT_SIZES.into_iter().enumerate() {
            let mask = segment_mask(i);
            assert_eq!(mask.width(), width);
            assert_eq!(mask.height(), height);
            // Solid across the base, empty in the upper corners.
            assert!((0..width).all(|x| mask.is_set(x, height - 1)));
            assert!(!mask.is_set(0, 0));
            assert!(!mask.is_set(width - 1, 0));
            assert!(mask.is_set(width / 2, 1));
        }
    }

    #[test]
    fn test_segment_width_matches_mask() {
        assert_eq!(segment_width(0), 46);
        assert_eq!(segment_width(1), 50);
        assert_eq!(segment_width(2), 42);
    }
}
