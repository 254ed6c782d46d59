use super::{kinematics::Agent, obstacle::ObstacleGroup};

/// Tests whether the runner's shape touches any segment of the group.
///
/// Each segment mask is placed at `(segment.x - agent.x, group.y - round(agent.y))`
/// relative to the runner mask.
#[must_use]
pub fn agent_overlaps_group(agent: &Agent, group: &ObstacleGroup) -> bool {
    let agent_mask = agent.mask();
    let dy = group.y() - agent.pixel_y();
    group
        .segments()
        .any(|(x, segment_mask)| agent_mask.overlaps(segment_mask, (x - agent.x(), dy)))
}
