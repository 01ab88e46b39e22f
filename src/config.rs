//! Gameplay tuning constants and runtime configuration.
//!
//! Everything that shapes how the forest plays (speeds, chop timing, scatter
//! rings, collision radii) lives here as named constants so the game modules
//! read as logic rather than as a wall of literals. [`GameConfig`] carries the
//! handful of knobs that can change between runs.

use std::path::PathBuf;

// Window

/// Title shown on the window and on the title screen.
pub const WINDOW_TITLE: &str = "Timberman";
/// Initial window width in physical pixels.
pub const WINDOW_WIDTH: u32 = 800;
/// Initial window height in physical pixels.
pub const WINDOW_HEIGHT: u32 = 600;
/// Clear colour of the sky.
pub const SKY_COLOR: [f64; 3] = [0.433, 0.773, 0.984];
/// Vertical field of view, in degrees.
pub const FIELD_OF_VIEW: f32 = 60.0;
/// Near clipping plane distance.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clipping plane distance.
pub const FAR_PLANE: f32 = 400.0;

// Player and movement

/// Where the player stands when the session begins.
pub const PLAYER_START: [f32; 3] = [3.77, 2.5, -26.03];
/// Resting eye height above the ground plane.
pub const EYE_HEIGHT: f32 = 2.5;
/// Walking speed.
pub const DEFAULT_SPEED: f32 = 5.5;
/// Speed while the sprint modifier is held together with forward.
pub const SPRINT_SPEED: f32 = 7.5;
/// Angular rate of the view bob while walking.
pub const WALK_BOB_RATE: f32 = 6.0;
/// Angular rate of the view bob while sprinting.
pub const SPRINT_BOB_RATE: f32 = 8.0;
/// Peak height of the view bob.
pub const BOB_AMPLITUDE: f32 = 0.2;
/// Radians of orbit per pixel of mouse travel.
pub const MOUSE_SENSITIVITY: f32 = 0.01;

// Camera

/// Initial and post-arrival azimuth of the orbit camera.
pub const FREE_LOOK_THETA: f32 = -12.63;
/// Initial and post-arrival elevation of the orbit camera.
pub const FREE_LOOK_PHI: f32 = 0.06;
/// Radius of the spherical camera offset.
pub const CAMERA_DISTANCE: f32 = 2.0;
/// How fast the arrival curve parameter advances per second.
pub const ARRIVAL_RATE: f32 = 0.1;
/// Fixed control points of the arrival curve. The fourth point tracks the player.
pub const ARRIVAL_CONTROL_POINTS: [[f32; 3]; 3] = [
    [62.26, 15.0, -49.71],
    [37.03, 7.0, -40.22],
    [12.83, 5.0, -34.03],
];

// Chopping

/// Seconds the chop input must be held to fell a tree.
pub const CHOP_DURATION: f32 = 3.0;
/// Angular rate of the axe swing.
pub const AXE_SWING_RATE: f32 = 8.0;
/// Peak axe swing, in degrees.
pub const AXE_SWING_DEGREES: f32 = 20.0;

// Collision volumes

/// Inward margin for the tree footprint that blocks movement.
pub const TREE_BLOCK_SHRINK: f32 = 3.5;
/// Inward margin for the looser tree footprint that allows chopping.
pub const TREE_CHOP_SHRINK: f32 = 3.2;
/// Added to a rock's scale to get its collision radius.
pub const ROCK_RADIUS_PADDING: f32 = 2.0;
/// Uniform scale applied to every log.
pub const LOG_SCALE: f32 = 0.8;
/// Radius of each sphere approximating the giant tree.
pub const GIANT_TREE_RADIUS: f32 = 5.0;
/// Sphere centres approximating the giant tree's trunk and roots.
pub const GIANT_TREE_SPHERES: [[f32; 3]; 10] = [
    [-9.10, 2.5, -7.91],
    [-3.59, 2.5, -7.60],
    [1.02, 2.5, -5.68],
    [3.75, 2.5, -5.08],
    [2.76, 2.5, -1.09],
    [5.68, 2.5, 3.07],
    [1.81, 2.5, 3.25],
    [-5.05, 2.5, 5.33],
    [-9.95, 2.5, 6.65],
    [-5.37, 2.5, -1.88],
];
/// Collision centre of the quest giver.
pub const NPC_CENTER: [f32; 3] = [3.04, 2.5, -10.26];
/// Where the quest giver is drawn.
pub const NPC_POSITION: [f32; 3] = [-4.0, 0.0, -10.0];
/// The player cannot get closer than this to the quest giver.
pub const NPC_BLOCK_RADIUS: f32 = 2.0;
/// Dialogue shows and the quest advances within this distance.
pub const NPC_PROXIMITY_RADIUS: f32 = 7.7;

// World scatter

/// Placement rule for one category of scattered props.
///
/// Candidates are drawn as integer coordinates in `[range.0, range.1)` on
/// both axes and rejected until they land strictly inside the ring
/// `inner < r < outer` around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterRule {
    /// Number of props to place.
    pub count: usize,
    /// Half-open integer sampling range shared by X and Z.
    pub range: (i32, i32),
    /// Exclusive inner radius of the accepted ring.
    pub inner: f32,
    /// Exclusive outer radius of the accepted ring.
    pub outer: f32,
}

/// Choppable spruces around the clearing.
pub const TREE_SCATTER: ScatterRule = ScatterRule {
    count: 250,
    range: (-100, 400),
    inner: 50.0,
    outer: 150.0,
};
/// Bushes and flowers.
pub const DECORATION_SCATTER: ScatterRule = ScatterRule {
    count: 400,
    range: (-250, 250),
    inner: 40.0,
    outer: 150.0,
};
/// Mountain rocks that wall in the map.
pub const ROCK_SCATTER: ScatterRule = ScatterRule {
    count: 200,
    range: (-250, 250),
    inner: 240.0,
    outer: 280.0,
};
/// Fallen logs.
pub const LOG_SCATTER: ScatterRule = ScatterRule {
    count: 10,
    range: (-250, 250),
    inner: 50.0,
    outer: 150.0,
};

// Chickens

/// Control points of the path walked by the chickens.
pub const CHICKEN_PATH: [[f32; 2]; 4] = [
    [-22.66, -18.40],
    [-6.60, -23.68],
    [8.76, -17.90],
    [16.43, -9.21],
];
/// How fast the chickens advance along their path per second.
pub const CHICKEN_RATE: f32 = 0.1;

/// Environment variable holding the world seed.
pub const SEED_VAR: &str = "TIMBERMAN_SEED";
/// Environment variable holding an OBJ file with object bounds.
pub const SCENE_VAR: &str = "TIMBERMAN_SCENE";

/// Settings that may differ between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Seed for the world scatter.
    pub seed: u64,
    /// Optional OBJ file whose object bounds replace the built-in volumes.
    pub scene_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            scene_path: None,
        }
    }
}

impl GameConfig {
    /// Builds a config from the defaults, overridden by `TIMBERMAN_SEED` and
    /// `TIMBERMAN_SCENE` when they are set.
    pub fn from_env() -> Self {
        Self::default().overridden_by(|key| std::env::var(key).ok())
    }

    /// Applies the overrides found through `lookup` on top of `self`.
    fn overridden_by(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self;

        if let Some(raw) = lookup(SEED_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = seed,
                Err(e) => log::warn!("Ignoring {SEED_VAR}={raw:?}: {e}"),
            }
        }

        if let Some(path) = lookup(SCENE_VAR).filter(|p| !p.trim().is_empty()) {
            config.scene_path = Some(PathBuf::from(path));
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A numeric seed in the environment is picked up verbatim.
    #[test]
    fn test_seed_override() {
        let config = GameConfig::default()
            .overridden_by(|key| (key == SEED_VAR).then(|| "42".to_string()));
        assert_eq!(config.seed, 42);
        assert!(config.scene_path.is_none());
    }

    /// Garbage seeds keep the default seed instead of failing.
    #[test]
    fn test_bad_seed_is_ignored() {
        let base = GameConfig {
            seed: 7,
            scene_path: None,
        };
        let config = base
            .clone()
            .overridden_by(|key| (key == SEED_VAR).then(|| "forty-two".to_string()));
        assert_eq!(config, base);
    }

    #[test]
    fn test_scene_path_override() {
        let config = GameConfig::default().overridden_by(|key| {
            (key == SCENE_VAR).then(|| "assets/forest.obj".to_string())
        });
        assert_eq!(config.scene_path, Some(PathBuf::from("assets/forest.obj")));
    }
}
