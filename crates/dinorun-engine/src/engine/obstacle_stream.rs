use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::core::obstacle::ObstacleGroup;

/// Layout and motion of the obstacle track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackParams {
    /// Distance every group moves left per tick.
    pub scroll_velocity: i32,
    /// Gap between the rightmost segment of the last group and a newly spawned group.
    pub spawn_gap: i32,
    pub obstacle_y: i32,
    /// Leading-segment positions of the groups present at the start, left to right.
    pub initial_layout: Vec<i32>,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            scroll_velocity: 10,
            spawn_gap: 400,
            obstacle_y: 300,
            initial_layout: vec![600, 1000, 1400],
        }
    }
}

/// Seed for deterministic obstacle generation.
///
/// A 128-bit seed for the generator that draws the segment count of every
/// obstacle group. The same seed always yields the same track, so a cohort
/// can be replayed against exactly the obstacles it was trained on.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use dinorun_engine::{ObstacleStream, TrackParams, TrackSeed};
/// use rand::Rng as _;
///
/// let seed: TrackSeed = rand::rng().random();
/// let a = ObstacleStream::new(&TrackParams::default(), seed);
/// let b = ObstacleStream::new(&TrackParams::default(), seed);
/// assert_eq!(a.groups(), b.groups());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackSeed([u8; 16]);

impl TrackSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid hex track seed: {reason}")]
pub struct ParseTrackSeedError {
    #[error(not(source))]
    reason: String,
}

impl std::str::FromStr for TrackSeed {
    type Err = ParseTrackSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseTrackSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseTrackSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl std::fmt::Display for TrackSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl TryFrom<String> for TrackSeed {
    type Error = ParseTrackSeedError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TrackSeed> for String {
    fn from(seed: TrackSeed) -> Self {
        seed.to_string()
    }
}

impl Distribution<TrackSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TrackSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TrackSeed(seed)
    }
}

/// The live obstacle groups of one evaluation, in left-to-right order.
///
/// One tick of the stream is split in two so that the cohort can inspect the
/// scrolled groups before any of them disappear:
///
/// 1. [`scroll`](Self::scroll) moves every group.
/// 2. Callers run collision tests and [`mark_passed`](Self::mark_passed).
/// 3. [`finish_tick`](Self::finish_tick) spawns a new group when something was
///    passed, then drops groups that left the track.
///
/// Spawning happens before removal, so at least one group is always live.
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    rng: Pcg32,
    params: TrackParams,
    groups: Vec<ObstacleGroup>,
}

impl ObstacleStream {
    /// Creates a stream with one group per entry of the initial layout.
    ///
    /// # Panics
    ///
    /// Panics if the initial layout is empty.
    #[must_use]
    pub fn new(params: &TrackParams, seed: TrackSeed) -> Self {
        assert!(
            !params.initial_layout.is_empty(),
            "track needs at least one initial obstacle group"
        );
        let mut rng = Pcg32::from_seed(seed.0);
        let groups = params
            .initial_layout
            .iter()
            .map(|&x| ObstacleGroup::new(x, params.obstacle_y, rng.random()))
            .collect();
        Self {
            rng,
            params: params.clone(),
            groups,
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[ObstacleGroup] {
        &self.groups
    }

    /// The leftmost group that has not been passed yet.
    #[must_use]
    pub fn next_unpassed(&self) -> Option<&ObstacleGroup> {
        self.groups.iter().find(|group| !group.is_passed())
    }

    pub fn scroll(&mut self) {
        for group in &mut self.groups {
            group.scroll(self.params.scroll_velocity);
        }
    }

    /// Marks every group whose rightmost segment fell behind `reference_x`.
    ///
    /// Returns the number of groups that became passed during this call.
    pub fn mark_passed(&mut self, reference_x: i32) -> usize {
        self.groups
            .iter_mut()
            .map(|group| group.mark_passed_behind(reference_x))
            .filter(|&newly_passed| newly_passed)
            .count()
    }

    pub fn finish_tick(&mut self, spawn: bool) {
        if spawn {
            self.spawn();
        }
        self.groups.retain(|group| !group.is_off_track());
    }

    fn spawn(&mut self) {
        let last = self
            .groups
            .last()
            .expect("obstacle stream always has a live group");
        let x = last.trailing_x() + self.params.spawn_gap;
        let group = ObstacleGroup::new(x, self.params.obstacle_y, self.rng.random());
        self.groups.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::obstacle::GroupVariant;

    fn seed() -> TrackSeed {
        TrackSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ])
    }

    fn single_group_params(x: i32) -> TrackParams {
        TrackParams {
            initial_layout: vec![x],
            ..TrackParams::default()
        }
    }

    mod track_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = TrackSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");

            let deserialized: TrackSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_accepts_uppercase_hex() {
            let parsed: TrackSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(parsed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_error_wrong_length() {
            let result: Result<TrackSeed, _> = serde_json::from_str("\"0123\"");
            let err_msg = result.unwrap_err().to_string();
            assert!(err_msg.contains("invalid hex"));
        }

        #[test]
        fn test_error_invalid_characters() {
            let err = "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<TrackSeed>()
                .unwrap_err();
            assert!(err.to_string().contains("invalid hex"));
        }
    }

    #[test]
    fn test_initial_layout_follows_params() {
        let stream = ObstacleStream::new(&TrackParams::default(), seed());
        let leading: Vec<_> = stream.groups().iter().map(ObstacleGroup::leading_x).collect();
        assert_eq!(leading, vec![600, 1000, 1400]);
        assert!(stream.groups().iter().all(|g| g.y() == 300 && !g.is_passed()));
    }

    #[test]
    fn test_same_seed_same_track() {
        let mut a = ObstacleStream::new(&TrackParams::default(), seed());
        let mut b = ObstacleStream::new(&TrackParams::default(), seed());
        for _ in 0..200 {
            for stream in [&mut a, &mut b] {
                stream.scroll();
                let passed = stream.mark_passed(200);
                stream.finish_tick(passed > 0);
            }
            assert_eq!(a.groups(), b.groups());
        }
    }

    #[test]
    fn test_scroll_moves_every_group_by_velocity() {
        let mut stream = ObstacleStream::new(&TrackParams::default(), seed());
        let before: Vec<_> = stream.groups().to_vec();
        stream.scroll();
        for (old, new) in std::iter::zip(&before, stream.groups()) {
            for (x0, x1) in std::iter::zip(old.segment_positions(), new.segment_positions()) {
                assert_eq!(x0 - 10, *x1);
            }
        }
    }

    #[test]
    fn test_pass_spawns_group_after_last_trailing_segment() {
        let mut stream = ObstacleStream::new(&TrackParams::default(), seed());
        let last_trailing = stream.groups()[2].trailing_x();
        assert_eq!(stream.mark_passed(stream.groups()[0].trailing_x() + 1), 1);
        stream.finish_tick(true);

        assert_eq!(stream.groups().len(), 4);
        assert_eq!(stream.groups()[3].leading_x(), last_trailing + 400);
        assert!(!stream.groups()[3].is_passed());
        assert_eq!(stream.next_unpassed(), Some(&stream.groups()[1]));
    }

    #[test]
    fn test_group_removed_exactly_when_fully_off_track() {
        // The first group leaves on the scroll that pushes its right edge below zero.
        let params = TrackParams {
            initial_layout: vec![4, 600],
            ..TrackParams::default()
        };
        let mut stream = ObstacleStream::new(&params, seed());
        let variant = stream.groups()[0].variant();
        let right_edge = stream.groups()[0].right_edge();
        let ticks_until_gone = right_edge / 10 + 1;

        for tick in 1..=ticks_until_gone {
            stream.scroll();
            let first = &stream.groups()[0];
            let expect_gone = first.leading_x() == 4 - 10 * tick && first.is_off_track();
            stream.finish_tick(false);
            let still_there = stream.groups()[0].leading_x() == 4 - 10 * tick;
            assert_eq!(still_there, !expect_gone, "tick {tick} ({variant:?})");
        }
        assert_eq!(stream.groups().len(), 1);
        assert_eq!(stream.groups()[0].leading_x(), 600 - 10 * ticks_until_gone);
    }

    #[test]
    fn test_two_segment_group_removal_timing() {
        let group = ObstacleGroup::new(-86, 300, GroupVariant::Double);
        // right edge 10: still visible now, gone after one more scroll
        assert_eq!(group.right_edge(), 10);
        let mut stream = ObstacleStream {
            rng: Pcg32::from_seed(seed().0),
            params: single_group_params(0),
            groups: vec![group, ObstacleGroup::new(400, 300, GroupVariant::Single)],
        };
        stream.finish_tick(false);
        assert_eq!(stream.groups().len(), 2);
        stream.scroll();
        assert_eq!(stream.groups()[0].right_edge(), 0);
        stream.finish_tick(false);
        assert_eq!(stream.groups().len(), 2, "right edge at 0 is not yet off track");
        stream.scroll();
        stream.finish_tick(false);
        assert_eq!(stream.groups().len(), 1);
        assert_eq!(stream.groups()[0].leading_x(), 380);
    }

    #[test]
    fn test_spawn_before_remove_keeps_a_group_alive() {
        let mut stream = ObstacleStream::new(&single_group_params(-40), seed());
        stream.scroll();
        let passed = stream.mark_passed(200);
        assert_eq!(passed, 1);
        stream.finish_tick(true);
        assert!(!stream.groups().is_empty());
        assert!(stream.next_unpassed().is_some());
    }

    #[test]
    #[should_panic(expected = "at least one initial obstacle group")]
    fn test_empty_layout_is_rejected() {
        let params = TrackParams {
            initial_layout: vec![],
            ..TrackParams::default()
        };
        let _ = ObstacleStream::new(&params, seed());
    }
}
