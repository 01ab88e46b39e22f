//! The forest: scattered props, their collision volumes and the felled-tree record.
//!
//! [`World::generate`] places every prop once from a seed. Each frame,
//! [`World::resolve_frame`] runs the collision pass in a fixed order (trees,
//! rocks, logs, giant tree, NPC) and reports what the player touched.

use crate::config::{
    DECORATION_SCATTER, GIANT_TREE_RADIUS, GIANT_TREE_SPHERES, LOG_SCALE, LOG_SCATTER,
    NPC_BLOCK_RADIUS, NPC_CENTER, NPC_PROXIMITY_RADIUS, ROCK_RADIUS_PADDING, ROCK_SCATTER,
    ScatterRule, TREE_BLOCK_SHRINK, TREE_CHOP_SHRINK, TREE_SCATTER,
};
use crate::game::collision::{
    AxisAlignedBox, Collider, CollisionReport, LOG_BOX_OFFSETS, Probe, Sphere, point_in_sphere,
};
use crate::game::player::Player;
use crate::game::scene::{self, SceneError, SceneRegistry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A choppable spruce.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Ground position of the trunk.
    pub position: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
    /// Where the stump was left, once felled.
    pub stump: Option<[f32; 2]>,
}

impl Tree {
    /// Whether the tree has not been felled.
    pub fn is_standing(&self) -> bool {
        self.stump.is_none()
    }
}

/// A rock or log: a position and a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedProp {
    /// Ground position.
    pub position: [f32; 3],
    /// Uniform scale; for rocks also the collision radius.
    pub scale: f32,
}

/// A bush or flower with no collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    /// Ground position.
    pub position: [f32; 3],
    /// Index into [`scene::DECORATIONS`].
    pub kind: usize,
}

/// Every placed prop plus the colliders built from them.
#[derive(Debug, Clone)]
pub struct World {
    /// Spruces, standing or felled.
    pub trees: Vec<Tree>,
    /// Boulders on the outer ring.
    pub rocks: Vec<PlacedProp>,
    /// Fallen logs.
    pub logs: Vec<PlacedProp>,
    /// Bushes and flowers.
    pub decorations: Vec<Decoration>,
    tree_bounds: AxisAlignedBox,
    /// Rocks, logs, giant tree and NPC, in resolution order.
    static_colliders: Vec<Collider>,
    felled: usize,
}

impl World {
    /// Scatters the forest from `seed` using the volumes in `registry`.
    ///
    /// The same seed and registry always give the same world.
    pub fn generate(registry: &SceneRegistry, seed: u64) -> Result<Self, SceneError> {
        let tree_bounds = *registry.lookup(scene::TREE)?;
        let log_bounds = *registry.lookup(scene::LOG)?;
        for name in scene::DECORATIONS {
            registry.lookup(name)?;
        }

        let mut rng = StdRng::seed_from_u64(seed);

        let trees: Vec<Tree> = (0..TREE_SCATTER.count)
            .map(|_| {
                let (x, z) = sample_ring(&mut rng, &TREE_SCATTER);
                Tree {
                    position: [x, 0.0, z],
                    scale: rng_scale(&mut rng, 80) + 0.5,
                    stump: None,
                }
            })
            .collect();
        // The decorations are split into equal runs, one per kind.
        let per_kind = (DECORATION_SCATTER.count / scene::DECORATIONS.len()).max(1);
        let decorations: Vec<Decoration> = (0..DECORATION_SCATTER.count)
            .map(|i| {
                let (x, z) = sample_ring(&mut rng, &DECORATION_SCATTER);
                Decoration {
                    position: [x, 0.0, z],
                    kind: (i / per_kind).min(scene::DECORATIONS.len() - 1),
                }
            })
            .collect();
        let rocks: Vec<PlacedProp> = (0..ROCK_SCATTER.count)
            .map(|_| {
                let (x, z) = sample_ring(&mut rng, &ROCK_SCATTER);
                PlacedProp {
                    position: [x, 0.0, z],
                    scale: (rng_scale(&mut rng, 50) + 0.8) * 40.0,
                }
            })
            .collect();
        let logs: Vec<PlacedProp> = (0..LOG_SCATTER.count)
            .map(|_| {
                let (x, z) = sample_ring(&mut rng, &LOG_SCATTER);
                PlacedProp {
                    position: [x, 0.0, z],
                    scale: LOG_SCALE,
                }
            })
            .collect();

        let static_colliders = rocks
            .iter()
            .map(|rock| {
                Collider::Sphere(Sphere::new(
                    [rock.position[0], 0.0, rock.position[2]],
                    rock.scale + ROCK_RADIUS_PADDING,
                ))
            })
            .chain(logs.iter().map(|log| Collider::Overlap {
                bounds: log_bounds,
                position: log.position,
                scale: log.scale,
                offsets: LOG_BOX_OFFSETS,
            }))
            .chain(
                GIANT_TREE_SPHERES
                    .iter()
                    .map(|&center| Collider::Sphere(Sphere::new(center, GIANT_TREE_RADIUS))),
            )
            .chain(std::iter::once(Collider::Sphere(Sphere::new(
                NPC_CENTER,
                NPC_BLOCK_RADIUS,
            ))))
            .collect();

        log::info!(
            "Generated forest from seed {seed}: {} trees, {} rocks, {} logs, {} decorations",
            trees.len(),
            rocks.len(),
            logs.len(),
            decorations.len()
        );

        Ok(Self {
            trees,
            rocks,
            logs,
            decorations,
            tree_bounds,
            static_colliders,
            felled: 0,
        })
    }

    /// Number of trees turned into stumps so far.
    pub fn felled_count(&self) -> usize {
        self.felled
    }

    /// Runs the collision pass for one frame.
    ///
    /// Each standing tree is tested twice at the same probe point: a tight
    /// footprint that blocks and a looser one that marks the tree as choppable.
    /// The last tree whose loose footprint contains the probe wins. The remaining
    /// volumes only block. [`Player::begin_frame`] must have been called first.
    pub fn resolve_frame(&self, player: &mut Player, probe: Probe) -> CollisionReport {
        let mut report = CollisionReport::default();

        for (index, tree) in self.trees.iter().enumerate().filter(|(_, t)| t.is_standing()) {
            let point = probe.point(player);
            let block = self.tree_collider(tree, TREE_BLOCK_SHRINK);
            if block.hits(point) {
                player.roll_back();
                report.hits += 1;
            }
            if self.tree_collider(tree, TREE_CHOP_SHRINK).hits(point) {
                report.choppable = Some(index);
            }
        }

        report.hits += player.resolve_collisions(probe, &self.static_colliders);
        report.rolled_back = report.hits > 0;
        report.near_npc = point_in_sphere(probe.point(player), NPC_CENTER, NPC_PROXIMITY_RADIUS);

        if report.rolled_back {
            log::trace!("Rolled back after {} collisions", report.hits);
        }
        report
    }

    fn tree_collider(&self, tree: &Tree, shrink: f32) -> Collider {
        Collider::Footprint {
            bounds: self.tree_bounds,
            position: tree.position,
            scale: tree.scale,
            shrink,
        }
    }

    /// Turns tree `index` into a stump at `stump`.
    ///
    /// Returns `false` if the tree does not exist or is already a stump.
    pub fn fell_tree(&mut self, index: usize, stump: [f32; 2]) -> bool {
        match self.trees.get_mut(index) {
            Some(tree) if tree.is_standing() => {
                tree.stump = Some(stump);
                self.felled += 1;
                log::info!("Tree {index} felled, stump at ({:.2}, {:.2})", stump[0], stump[1]);
                true
            }
            _ => false,
        }
    }
}

/// Draws integer positions until one lands strictly inside the rule's ring.
fn sample_ring(rng: &mut StdRng, rule: &ScatterRule) -> (f32, f32) {
    let inner = rule.inner * rule.inner;
    let outer = rule.outer * rule.outer;
    loop {
        let x = rng.gen_range(rule.range.0..rule.range.1) as f32;
        let z = rng.gen_range(rule.range.0..rule.range.1) as f32;
        let r2 = x * x + z * z;
        if r2 > inner && r2 < outer {
            return (x, z);
        }
    }
}

/// `(rand % modulus) / 100`, the step used for every random scale.
fn rng_scale(rng: &mut StdRng, modulus: u32) -> f32 {
    rng.gen_range(0..modulus) as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(seed: u64) -> World {
        World::generate(&SceneRegistry::with_defaults(), seed).unwrap()
    }

    /// A world with a single tree at the origin and nothing else in the way.
    fn lone_tree_world(bounds: AxisAlignedBox) -> World {
        let mut world = world(1);
        world.trees = vec![Tree {
            position: [0.0, 0.0, 0.0],
            scale: 1.0,
            stump: None,
        }];
        world.tree_bounds = bounds;
        world.static_colliders.clear();
        world
    }

    const FAR_FROM_NPC: [f32; 3] = [30.0, 2.5, -30.0];

    fn ring_radius(position: [f32; 3]) -> f32 {
        (position[0] * position[0] + position[2] * position[2]).sqrt()
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = world(7);
        let b = world(7);
        assert_eq!(a.trees, b.trees);
        assert_eq!(a.rocks, b.rocks);
        assert_eq!(a.logs, b.logs);
        assert_eq!(a.decorations, b.decorations);
        assert_ne!(a.trees, world(8).trees);
    }

    /// Every prop sits strictly inside its ring, with scales in the expected range.
    #[test]
    fn test_scatter_rings_and_scales() {
        let w = world(2024);
        assert_eq!(w.trees.len(), TREE_SCATTER.count);
        assert_eq!(w.rocks.len(), ROCK_SCATTER.count);
        assert_eq!(w.logs.len(), LOG_SCATTER.count);
        assert_eq!(w.decorations.len(), DECORATION_SCATTER.count);

        for tree in &w.trees {
            let r = ring_radius(tree.position);
            assert!(r > 50.0 && r < 150.0, "tree at r={r}");
            assert!(tree.scale >= 0.5 && tree.scale < 1.3);
            assert!(tree.position[0] >= -100.0 && tree.position[0] < 400.0);
        }
        for rock in &w.rocks {
            let r = ring_radius(rock.position);
            assert!(r > 240.0 && r < 280.0, "rock at r={r}");
            assert!(rock.scale >= 32.0 && rock.scale < 52.0);
        }
        for log in &w.logs {
            let r = ring_radius(log.position);
            assert!(r > 50.0 && r < 150.0);
            assert_eq!(log.scale, LOG_SCALE);
        }
        for decoration in &w.decorations {
            let r = ring_radius(decoration.position);
            assert!(r > 40.0 && r < 150.0);
        }
        let kinds: Vec<usize> = (0..4)
            .map(|k| w.decorations.iter().filter(|d| d.kind == k).count())
            .collect();
        assert_eq!(kinds, vec![100; 4]);
    }

    #[test]
    fn test_missing_volume_fails_generation() {
        let registry = SceneRegistry::with_defaults().without(scene::LOG);
        assert!(matches!(
            World::generate(&registry, 3),
            Err(SceneError::NotFound(name)) if name == scene::LOG
        ));
    }

    /// Walking into a tree trunk from (0, 0) to (1, 0) leaves the player at (0, 0).
    #[test]
    fn test_tree_blocks_and_is_choppable() {
        let world = lone_tree_world(AxisAlignedBox::new([-3.0, 0.0, -4.0], [5.0, 10.0, 4.0]));
        let mut player = Player::new();
        player.position = [0.0, 2.5, 0.0];
        player.begin_frame();
        player.position = [1.0, 2.5, 0.0];

        let report = world.resolve_frame(&mut player, Probe::Player);
        assert_eq!(player.position, [0.0, 2.5, 0.0]);
        assert!(report.rolled_back);
        assert_eq!(report.hits, 1);
        assert_eq!(report.choppable, Some(0));
    }

    /// With two overlapping trees in reach, the later one is the chop target.
    #[test]
    fn test_last_tree_in_reach_is_choppable() {
        let mut world = lone_tree_world(AxisAlignedBox::new([-4.0, 0.0, -4.0], [4.0, 14.0, 4.0]));
        world.trees.push(Tree {
            position: [0.5, 0.0, 0.0],
            scale: 1.0,
            stump: None,
        });
        let mut player = Player::new();
        player.position = [0.25, 2.5, 0.0];
        player.begin_frame();
        player.position = [0.3, 2.5, 0.1];

        let report = world.resolve_frame(&mut player, Probe::Player);
        assert_eq!(report.hits, 2);
        assert!(report.rolled_back);
        assert_eq!(report.choppable, Some(1));
        assert_eq!(player.position, [0.25, 2.5, 0.0]);
        assert_eq!(player.position, player.previous_position);
    }

    /// The band between the chop and block footprints allows chopping without blocking.
    #[test]
    fn test_chop_band_does_not_block() {
        let world = lone_tree_world(AxisAlignedBox::new([-4.0, 0.0, -4.0], [4.0, 14.0, 4.0]));
        let mut player = Player::new();
        player.position = [0.0, 2.5, -0.65];
        player.begin_frame();

        let report = world.resolve_frame(&mut player, Probe::Player);
        assert!(!report.rolled_back);
        assert_eq!(report.choppable, Some(0));
    }

    /// Stumps neither block nor can be chopped again.
    #[test]
    fn test_fell_tree_once() {
        let mut world = lone_tree_world(AxisAlignedBox::new([-4.0, 0.0, -4.0], [4.0, 14.0, 4.0]));
        assert!(world.fell_tree(0, [1.0, 2.0]));
        assert!(!world.fell_tree(0, [5.0, 5.0]));
        assert!(!world.fell_tree(99, [0.0, 0.0]));
        assert_eq!(world.felled_count(), 1);
        assert_eq!(world.trees[0].stump, Some([1.0, 2.0]));

        let mut player = Player::new();
        player.position = [0.0, 2.5, 0.0];
        player.begin_frame();
        let report = world.resolve_frame(&mut player, Probe::Player);
        assert_eq!(report, CollisionReport::default());
    }

    /// The villager both blocks and, from further away, makes the quest audible.
    #[test]
    fn test_npc_block_and_proximity() {
        let world = world(5);
        let mut player = Player::new();
        player.position = [NPC_CENTER[0] + 5.0, 2.5, NPC_CENTER[2]];
        player.begin_frame();
        player.position = [NPC_CENTER[0] + 1.0, 2.5, NPC_CENTER[2]];

        let report = world.resolve_frame(&mut player, Probe::Player);
        assert!(report.rolled_back);
        assert!(report.near_npc);
        assert_eq!(player.position[0], NPC_CENTER[0] + 5.0);

        player.position = FAR_FROM_NPC;
        player.begin_frame();
        assert!(!world.resolve_frame(&mut player, Probe::Player).near_npc);
    }

    /// A fixed probe never moves with the player, so its hits cannot clear.
    #[test]
    fn test_fixed_probe() {
        let world = world(9);
        let mut player = Player::new();
        player.begin_frame();
        player.position[0] += 0.5;
        let report = world.resolve_frame(&mut player, Probe::Fixed(GIANT_TREE_SPHERES[0]));
        assert!(report.rolled_back);
        assert_eq!(player.position, player.previous_position);
    }
}
