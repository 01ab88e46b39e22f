//! Collision volumes, overlap predicates and the rollback resolution policy.
//!
//! # Overview
//!
//! The forest sits on a flat ground plane and every obstacle is short compared
//! to the distances the player covers, so all tests reduce to the X/Z
//! footprint or to a plain distance check:
//!
//! * [`point_in_sphere`] - open-ball test used for rocks, the giant tree and the NPC
//! * [`point_in_box`] - footprint test with an inward shrink margin, used for trees
//! * [`box_overlaps_box`] - player footprint against a target footprint, used for logs
//!
//! # Resolution
//!
//! Resolution never pushes the player out of a volume. The player's position is
//! snapshotted once at the start of the frame; any collidable that reports a
//! hit sends the player straight back to that snapshot. Because the target is
//! the same for every hit, the outcome does not depend on how many volumes
//! fired or in which order they were visited.

use crate::game::player::Player;

/// Axis-aligned bounding box in an object's local space.
///
/// Produced once by the scene registry and treated as read-only afterwards.
/// World-space placement is supplied separately at test time as a translation
/// plus a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    /// Minimum corner `[x, y, z]`.
    pub min: [f32; 3],
    /// Maximum corner `[x, y, z]`.
    pub max: [f32; 3],
}

impl AxisAlignedBox {
    /// Creates a box from its two corners.
    ///
    /// # Example
    /// ```rust,ignore
    /// use crate::game::collision::AxisAlignedBox;
    ///
    /// let bounds = AxisAlignedBox::new([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]);
    /// assert_eq!(bounds.size(), [2.0, 2.0, 2.0]);
    /// ```
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// An inverted box that any call to [`expand_to_point`](Self::expand_to_point)
    /// will snap onto the first point.
    pub fn empty() -> Self {
        Self {
            min: [f32::MAX; 3],
            max: [f32::MIN; 3],
        }
    }

    /// Whether the box still has inverted extents on some axis.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Grows the box so that it contains `point`.
    pub fn expand_to_point(&mut self, point: [f32; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Centre point of the box.
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// The box after a uniform scale followed by a translation.
    pub fn placed(&self, position: [f32; 3], scale: f32) -> Self {
        Self {
            min: [
                self.min[0] * scale + position[0],
                self.min[1] * scale + position[1],
                self.min[2] * scale + position[2],
            ],
            max: [
                self.max[0] * scale + position[0],
                self.max[1] * scale + position[1],
                self.max[2] * scale + position[2],
            ],
        }
    }
}

/// A bounding sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Centre of the sphere.
    pub center: [f32; 3],
    /// Radius of the sphere.
    pub radius: f32,
}

impl Sphere {
    /// Creates a sphere from its centre and radius.
    pub fn new(center: [f32; 3], radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Amounts trimmed from a target's world-space max-X and max-Z before a
/// [`box_overlaps_box`] test.
///
/// Meshes whose visual origin does not sit on their logical footprint get a
/// per-type correction here. The values are empirical and are tied to the
/// mesh they were measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxOffsets {
    /// Subtracted from the target's world-space max-X.
    pub max_x: f32,
    /// Subtracted from the target's world-space max-Z.
    pub max_z: f32,
}

/// Offsets for the fallen log mesh, whose origin sits at one end of the trunk.
pub const LOG_BOX_OFFSETS: BoxOffsets = BoxOffsets {
    max_x: 16.5,
    max_z: 2.0,
};

/// No correction.
pub const NO_BOX_OFFSETS: BoxOffsets = BoxOffsets {
    max_x: 0.0,
    max_z: 0.0,
};

/// Edge length of the square footprint that stands in for the player in
/// box-box tests.
pub const PLAYER_BOX_SIZE: f32 = 0.3;

/// Returns `true` if `point` lies strictly inside the sphere.
///
/// The ball is open: a point at exactly `radius` from `center` does not collide.
///
/// # Example
/// ```rust,ignore
/// use crate::game::collision::point_in_sphere;
///
/// assert!(point_in_sphere([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0));
/// assert!(!point_in_sphere([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0));
/// ```
pub fn point_in_sphere(point: [f32; 3], center: [f32; 3], radius: f32) -> bool {
    let dx = point[0] - center[0];
    let dy = point[1] - center[1];
    let dz = point[2] - center[2];
    (dx * dx + dy * dy + dz * dz).sqrt() < radius
}

/// Returns `true` if the X/Z projection of `point` lies inside the shrunk
/// footprint of a placed box.
///
/// The box's local extents are pulled in by `shrink` on X and Z, then scaled by
/// `scale` and translated by `world_position`. Y plays no part. A shrink large
/// enough to invert the footprint makes the test always false.
///
/// # Arguments
///
/// * `point` - World-space point to test, usually the camera position
/// * `bounds` - Local-space bounds of the object
/// * `world_position` - Translation of the placed instance
/// * `scale` - Uniform scale of the placed instance
/// * `shrink` - Inward margin in local units
pub fn point_in_box(
    point: [f32; 3],
    bounds: &AxisAlignedBox,
    world_position: [f32; 3],
    scale: f32,
    shrink: f32,
) -> bool {
    let min_x = (bounds.min[0] + shrink) * scale + world_position[0];
    let max_x = (bounds.max[0] - shrink) * scale + world_position[0];
    let min_z = (bounds.min[2] + shrink) * scale + world_position[2];
    let max_z = (bounds.max[2] - shrink) * scale + world_position[2];

    point[0] >= min_x && point[0] <= max_x && point[2] >= min_z && point[2] <= max_z
}

/// Returns `true` if a fixed-size player footprint centred on `player_center`
/// overlaps the footprint of a placed box.
///
/// The target footprint is the box scaled and translated, with `offsets`
/// trimmed from its max-X and max-Z. Overlap is the closed interval test
/// `a_min <= b_max && a_max >= b_min` on both axes.
pub fn box_overlaps_box(
    player_center: [f32; 3],
    bounds: &AxisAlignedBox,
    world_position: [f32; 3],
    scale: f32,
    offsets: BoxOffsets,
) -> bool {
    let half = PLAYER_BOX_SIZE * 0.5;
    let player_min_x = player_center[0] - half;
    let player_max_x = player_center[0] + half;
    let player_min_z = player_center[2] - half;
    let player_max_z = player_center[2] + half;

    let target = bounds.placed(world_position, scale);
    let target_max_x = target.max[0] - offsets.max_x;
    let target_max_z = target.max[2] - offsets.max_z;

    player_min_x <= target_max_x
        && player_max_x >= target.min[0]
        && player_min_z <= target_max_z
        && player_max_z >= target.min[2]
}

/// One collidable volume, paired with the predicate that tests it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Shrunk footprint of a placed box, see [`point_in_box`].
    Footprint {
        /// Local-space bounds.
        bounds: AxisAlignedBox,
        /// World translation.
        position: [f32; 3],
        /// Uniform scale.
        scale: f32,
        /// Inward margin.
        shrink: f32,
    },
    /// Open ball, see [`point_in_sphere`].
    Sphere(Sphere),
    /// Player box against a placed box, see [`box_overlaps_box`].
    Overlap {
        /// Local-space bounds.
        bounds: AxisAlignedBox,
        /// World translation.
        position: [f32; 3],
        /// Uniform scale.
        scale: f32,
        /// Per-type correction of the target's max corner.
        offsets: BoxOffsets,
    },
}

impl Collider {
    /// Runs this collider's predicate against `point`.
    pub fn hits(&self, point: [f32; 3]) -> bool {
        match self {
            Collider::Footprint {
                bounds,
                position,
                scale,
                shrink,
            } => point_in_box(point, bounds, *position, *scale, *shrink),
            Collider::Sphere(sphere) => point_in_sphere(point, sphere.center, sphere.radius),
            Collider::Overlap {
                bounds,
                position,
                scale,
                offsets,
            } => box_overlaps_box(point, bounds, *position, *scale, *offsets),
        }
    }
}

/// Where the point handed to the predicates comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    /// The player's own position, re-read after every rollback.
    Player,
    /// A camera position that does not follow the player, such as a point on
    /// the arrival curve.
    Fixed([f32; 3]),
}

impl Probe {
    /// The point to test for the player's current state.
    pub fn point(&self, player: &Player) -> [f32; 3] {
        match self {
            Probe::Player => player.position,
            Probe::Fixed(point) => *point,
        }
    }
}

/// Summary of one frame of collision resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Number of blocking volumes that reported a hit.
    pub hits: usize,
    /// Whether the player ended the frame at its pre-frame position.
    pub rolled_back: bool,
    /// Index of the last standing tree whose loose footprint contained the probe.
    pub choppable: Option<usize>,
    /// Whether the probe was inside the NPC's talking range.
    pub near_npc: bool,
}

impl Player {
    /// Tests one blocking collider and rolls the player back on a hit.
    ///
    /// The rollback happens immediately, so later colliders in the same frame
    /// see the restored position. The target is always the snapshot taken by
    /// [`Player::begin_frame`], which makes repeated rollbacks idempotent.
    ///
    /// # Returns
    ///
    /// `true` if the collider reported a hit.
    pub fn block_against(&mut self, probe: Probe, collider: &Collider) -> bool {
        let hit = collider.hits(probe.point(self));
        if hit {
            self.roll_back();
        }
        hit
    }

    /// Runs every collider in order through [`block_against`](Self::block_against)
    /// and returns how many of them fired.
    pub fn resolve_collisions<'a>(
        &mut self,
        probe: Probe,
        colliders: impl IntoIterator<Item = &'a Collider>,
    ) -> usize {
        colliders
            .into_iter()
            .filter(|collider| self.block_against(probe, collider))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AxisAlignedBox {
        AxisAlignedBox::new([-5.0, 0.0, -5.0], [5.0, 10.0, 5.0])
    }

    fn player_at(x: f32, z: f32) -> Player {
        let mut player = Player::new();
        player.position = [x, 2.5, z];
        player.begin_frame();
        player
    }

    /// The centre of a sphere is always inside it.
    #[test]
    fn test_sphere_contains_center() {
        for radius in [0.001, 0.5, 2.0, 7.7, 100.0] {
            assert!(point_in_sphere([3.0, 2.5, -1.0], [3.0, 2.5, -1.0], radius));
        }
    }

    /// Exactly on the surface is outside.
    #[test]
    fn test_sphere_boundary_is_open() {
        let center = [1.0, 2.0, 3.0];
        assert!(!point_in_sphere([4.0, 2.0, 3.0], center, 3.0));
        assert!(!point_in_sphere([1.0, 2.0, -2.0], center, 5.0));
        assert!(point_in_sphere([3.999, 2.0, 3.0], center, 3.0));
    }

    /// The sphere test uses full 3D distance, unlike the box tests.
    #[test]
    fn test_sphere_uses_height() {
        assert!(!point_in_sphere([0.0, 3.0, 0.0], [0.0, 0.0, 0.0], 2.0));
    }

    #[test]
    fn test_point_in_box_ignores_height() {
        let bounds = unit_box();
        assert!(point_in_box([0.0, 1000.0, 0.0], &bounds, [0.0; 3], 1.0, 0.0));
        assert!(point_in_box([0.0, -50.0, 0.0], &bounds, [0.0; 3], 1.0, 0.0));
    }

    /// Shrink is applied in local space, so it scales with the instance.
    #[test]
    fn test_point_in_box_shrink_scales_with_instance() {
        let bounds = unit_box();
        // Local footprint [-1, 1] after shrink 4, doubled to [-2, 2], moved by +10.
        assert!(point_in_box([11.9, 0.0, 10.0], &bounds, [10.0, 0.0, 10.0], 2.0, 4.0));
        assert!(!point_in_box([12.1, 0.0, 10.0], &bounds, [10.0, 0.0, 10.0], 2.0, 4.0));
        assert!(point_in_box([8.0, 0.0, 8.0], &bounds, [10.0, 0.0, 10.0], 2.0, 4.0));
    }

    /// A margin wider than the box leaves nothing inside.
    #[test]
    fn test_point_in_box_inverted_footprint() {
        let bounds = unit_box();
        assert!(!point_in_box([0.0, 0.0, 0.0], &bounds, [0.0; 3], 1.0, 6.0));
    }

    /// Every point inside the tighter footprint is inside the looser one.
    #[test]
    fn test_shrink_is_monotonic() {
        let bounds = AxisAlignedBox::new([-4.0, 0.0, -3.0], [6.0, 12.0, 5.0]);
        let position = [20.0, 0.0, -7.0];
        let scale = 0.9;
        let margins = [0.0, 0.5, 1.0, 2.0, 3.2, 3.5, 4.5];

        for step_x in -60..=60 {
            for step_z in -60..=60 {
                let point = [
                    position[0] + step_x as f32 * 0.1,
                    0.0,
                    position[2] + step_z as f32 * 0.1,
                ];
                for pair in margins.windows(2) {
                    let (loose, tight) = (pair[0], pair[1]);
                    if point_in_box(point, &bounds, position, scale, tight) {
                        assert!(
                            point_in_box(point, &bounds, position, scale, loose),
                            "{point:?} inside shrink {tight} but not {loose}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_box_overlap_touching_edges() {
        let bounds = AxisAlignedBox::new([0.0, 0.0, 0.0], [2.0, 1.0, 2.0]);
        // Player box spans [-0.15, 0.15]; touching at x = 0.0 counts.
        assert!(box_overlaps_box([-0.15, 0.0, 1.0], &bounds, [0.0; 3], 1.0, NO_BOX_OFFSETS));
        assert!(!box_overlaps_box([-0.16, 0.0, 1.0], &bounds, [0.0; 3], 1.0, NO_BOX_OFFSETS));
    }

    /// The log offsets pull the far edges in and leave the near edges alone.
    #[test]
    fn test_box_overlap_log_offsets() {
        let bounds = AxisAlignedBox::new([-1.0, 0.0, -0.8], [22.0, 1.5, 3.3]);
        let position = [100.0, 0.0, 50.0];
        let scale = 0.8;
        // World max-X is 100 + 17.6 - 16.5 = 101.1.
        assert!(box_overlaps_box([101.2, 0.0, 50.0], &bounds, position, scale, LOG_BOX_OFFSETS));
        assert!(!box_overlaps_box([101.3, 0.0, 50.0], &bounds, position, scale, LOG_BOX_OFFSETS));
        assert!(box_overlaps_box([110.0, 0.0, 50.0], &bounds, position, scale, NO_BOX_OFFSETS));
        // Near edge at 100 - 0.8 = 99.2 is untouched.
        assert!(box_overlaps_box([99.1, 0.0, 50.0], &bounds, position, scale, LOG_BOX_OFFSETS));
    }

    /// Stepping into a tree footprint puts the player back where the frame began.
    #[test]
    fn test_step_into_tree_is_rolled_back() {
        // Shrunk by 3.5, the footprint covers X in [0.5, 1.5] and Z in [-0.5, 0.5].
        let tree = Collider::Footprint {
            bounds: AxisAlignedBox::new([-3.0, 0.0, -4.0], [5.0, 10.0, 4.0]),
            position: [0.0; 3],
            scale: 1.0,
            shrink: 3.5,
        };
        let mut player = player_at(0.0, 0.0);
        player.position = [1.0, 2.5, 0.0];

        let hits = player.resolve_collisions(Probe::Player, [&tree]);

        assert_eq!(hits, 1);
        assert_eq!(player.position, [0.0, 2.5, 0.0]);
    }

    fn ring_of_spheres(n: usize) -> Vec<Collider> {
        (0..n)
            .map(|i| Collider::Sphere(Sphere::new([10.0 + i as f32 * 0.1, 2.5, 0.0], 5.0)))
            .collect()
    }

    /// One colliding volume among many still restores the snapshot.
    #[test]
    fn test_rollback_single_hit() {
        let mut colliders = vec![
            Collider::Sphere(Sphere::new([100.0, 2.5, 100.0], 1.0)),
            Collider::Sphere(Sphere::new([-100.0, 2.5, 100.0], 1.0)),
        ];
        colliders.push(Collider::Sphere(Sphere::new([7.0, 2.5, 0.0], 2.0)));

        let mut player = player_at(3.0, 0.0);
        player.position = [6.0, 2.5, 0.0];
        let hits = player.resolve_collisions(Probe::Player, &colliders);

        assert_eq!(hits, 1);
        assert_eq!(player.position, [3.0, 2.5, 0.0]);
    }

    /// All volumes firing gives the same result as one, in any order.
    #[test]
    fn test_rollback_every_hit_any_order() {
        let colliders = ring_of_spheres(8);
        let candidate = [9.0, 2.5, 0.0];

        let mut forward = player_at(0.0, 0.0);
        forward.position = candidate;
        let fixed = Probe::Fixed(candidate);
        let hits = forward.resolve_collisions(fixed, &colliders);
        assert_eq!(hits, colliders.len());
        assert_eq!(forward.position, [0.0, 2.5, 0.0]);

        let mut reversed = player_at(0.0, 0.0);
        reversed.position = candidate;
        reversed.resolve_collisions(fixed, colliders.iter().rev());
        assert_eq!(reversed.position, forward.position);
    }

    /// With the player as probe, later volumes see the rolled-back position.
    #[test]
    fn test_rollback_is_visible_to_later_colliders() {
        let colliders = ring_of_spheres(4);
        let mut player = player_at(0.0, 0.0);
        player.position = [9.0, 2.5, 0.0];

        let hits = player.resolve_collisions(Probe::Player, &colliders);

        assert_eq!(hits, 1);
        assert_eq!(player.position, [0.0, 2.5, 0.0]);
    }

    /// No hit leaves the candidate untouched.
    #[test]
    fn test_no_hit_keeps_candidate() {
        let colliders = ring_of_spheres(3);
        let mut player = player_at(-20.0, 0.0);
        player.position = [-19.0, 2.5, 1.0];

        let hits = player.resolve_collisions(Probe::Player, &colliders);

        assert_eq!(hits, 0);
        assert_eq!(player.position, [-19.0, 2.5, 1.0]);
    }

    #[test]
    fn test_expand_to_point() {
        let mut bounds = AxisAlignedBox::empty();
        assert!(bounds.is_empty());
        bounds.expand_to_point([1.0, -2.0, 3.0]);
        bounds.expand_to_point([-1.0, 4.0, 0.0]);
        assert!(!bounds.is_empty());
        assert_eq!(bounds.min, [-1.0, -2.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 4.0, 3.0]);
        assert_eq!(bounds.center(), [0.0, 1.0, 1.5]);
    }
}
