use arrayvec::ArrayVec;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::{mask::CollisionMask, shape};

/// Number of segments in an obstacle group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupVariant {
    Single,
    Double,
    Triple,
}

impl GroupVariant {
    pub const ALL: [Self; 3] = [Self::Single, Self::Double, Self::Triple];

    #[must_use]
    pub const fn segment_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// Draws each variant with equal probability.
impl Distribution<GroupVariant> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GroupVariant {
        GroupVariant::ALL[rng.random_range(0..GroupVariant::ALL.len())]
    }
}

/// A cluster of one to three obstacle segments scrolling together.
///
/// Segment `i` starts right after segment `i - 1`, and all segments move by
/// the same amount every tick, so their relative offsets never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleGroup {
    segments: ArrayVec<i32, 3>,
    y: i32,
    variant: GroupVariant,
    passed: bool,
}

impl ObstacleGroup {
    /// Creates a group whose leading segment starts at `x`.
    #[must_use]
    pub fn new(x: i32, y: i32, variant: GroupVariant) -> Self {
        let mut segments = ArrayVec::new();
        let mut left = x;
        for i in 0..variant.segment_count() {
            segments.push(left);
            left += shape::segment_width(i);
        }
        Self {
            segments,
            y,
            variant,
            passed: false,
        }
    }

    #[must_use]
    pub fn variant(&self) -> GroupVariant {
        self.variant
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Horizontal positions of the segments, leading segment first.
    #[must_use]
    pub fn segment_positions(&self) -> &[i32] {
        &self.segments
    }

    /// Segment positions paired with their collision masks.
    pub fn segments(&self) -> impl Iterator<Item = (i32, &'static CollisionMask)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, &x)| (x, shape::segment_mask(i)))
    }

    #[must_use]
    pub fn leading_x(&self) -> i32 {
        self.segments[0]
    }

    /// Position of the rightmost segment.
    #[must_use]
    pub fn trailing_x(&self) -> i32 {
        self.segments[self.segments.len() - 1]
    }

    /// First column right of the rightmost segment.
    #[must_use]
    pub fn right_edge(&self) -> i32 {
        self.trailing_x() + shape::segment_width(self.segments.len() - 1)
    }

    /// Whether the group has scrolled completely past the left edge of the track.
    #[must_use]
    pub fn is_off_track(&self) -> bool {
        self.right_edge() < 0
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    /// Marks the group passed if its rightmost segment is behind `reference_x`.
    ///
    /// Returns `true` only on the call that flips the flag.
    pub fn mark_passed_behind(&mut self, reference_x: i32) -> bool {
        if self.passed || self.trailing_x() >= reference_x {
            return false;
        }
        self.passed = true;
        true
    }

    pub fn scroll(&mut self, velocity: i32) {
        for x in &mut self.segments {
            *x -= velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_segments_are_laid_out_back_to_back() {
        let group = ObstacleGroup::new(600, 300, GroupVariant::Triple);
        assert_eq!(group.segment_positions(), &[600, 646, 696]);
        assert_eq!(group.leading_x(), 600);
        assert_eq!(group.trailing_x(), 696);
        assert_eq!(group.right_edge(), 738);

        let single = ObstacleGroup::new(600, 300, GroupVariant::Single);
        assert_eq!(single.segment_positions(), &[600]);
        assert_eq!(single.right_edge(), 646);
    }

    #[test]
    fn test_scroll_keeps_relative_offsets() {
        let mut group = ObstacleGroup::new(1000, 300, GroupVariant::Double);
        for _ in 0..37 {
            group.scroll(10);
        }
        assert_eq!(group.segment_positions(), &[630, 676]);
        assert_eq!(group.y(), 300);
    }

    #[test]
    fn test_off_track_only_after_right_edge_crosses_zero() {
        let mut group = ObstacleGroup::new(-96, 300, GroupVariant::Double);
        // right edge = -96 + 46 + 50 = 0
        assert_eq!(group.right_edge(), 0);
        assert!(!group.is_off_track());
        group.scroll(1);
        assert!(group.is_off_track());
    }

    #[test]
    fn test_mark_passed_fires_once() {
        let mut group = ObstacleGroup::new(150, 300, GroupVariant::Double);
        // trailing segment at 196, reference at 200
        assert!(group.mark_passed_behind(200));
        assert!(group.is_passed());
        assert!(!group.mark_passed_behind(200));

        let mut ahead = ObstacleGroup::new(154, 300, GroupVariant::Double);
        // trailing segment exactly at the reference is not behind it
        assert!(!ahead.mark_passed_behind(200));
        assert!(!ahead.is_passed());
    }

    #[test]
    fn test_variant_distribution_covers_all_variants() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let variant: GroupVariant = rng.random();
            counts[variant.segment_count() - 1] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "skewed counts: {counts:?}");
        }
    }
}
