//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which tracks all mutable state for the game loop,
//! including the player, camera mode, forest, chop and quest progress, and frame timing.
//!
//! All gameplay changes go through [`GameState::update`], once per frame, in a fixed order:
//! orbit, frame snapshot, camera and movement, collision, chop, quest.

pub mod camera;
pub mod chickens;
pub mod chop;
pub mod collision;
pub mod keys;
pub mod player;
pub mod quest;
pub mod scene;
pub mod world;

use self::camera::CameraMode;
use self::chickens::Flock;
use self::chop::ChopState;
use self::collision::CollisionReport;
use self::keys::InputSnapshot;
use self::player::Player;
use self::quest::QuestState;
use self::world::World;
use crate::config::WINDOW_TITLE;
use std::time::Instant;

/// Prompt shown under the title until the session starts.
pub const START_PROMPT: &str = "Press [ENTER] to play";

/// Represents the entire mutable state of the game.
///
/// This struct is updated every frame and contains:
/// - The player and the camera mode.
/// - The forest and which trees have been felled.
/// - Chop and quest progress.
/// - Timing information for frame updates and FPS calculation.
pub struct GameState {
    /// The player character.
    pub player: Player,
    /// Which camera drives the view this frame.
    pub camera: CameraMode,
    /// The scattered forest and its colliders.
    pub world: World,
    /// Progress on the tree in reach.
    pub chop: ChopState,
    /// The villager's quest line.
    pub quest: QuestState,
    /// The wandering chickens.
    pub flock: Flock,
    /// Collision outcome of the most recent frame.
    pub last_report: CollisionReport,
    /// Seconds of game time since launch.
    pub clock: f32,
    /// Time of the last frame.
    pub last_frame_time: Instant,
    /// Time elapsed since the last frame (seconds).
    pub delta_time: f32,
    /// Number of frames rendered since the last FPS update.
    pub frame_count: u32,
    /// Current frames per second.
    pub current_fps: f32,
    /// Time of the last FPS update.
    pub last_fps_time: Instant,
}

/// Every string the HUD can show for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    /// `"Trees chopped: N"`.
    pub trees_chopped: String,
    /// Current objective, while one is active.
    pub quest: Option<String>,
    /// Chop countdown, while chopping.
    pub countdown: Option<String>,
    /// The villager's lines, while in earshot.
    pub dialogue: Option<[&'static str; 3]>,
    /// Title and prompt, before the session starts.
    pub title: Option<[&'static str; 2]>,
    /// Pulse factor for the title text.
    pub title_scale: f32,
    /// `"60.00 fps"`.
    pub fps: String,
}

impl GameState {
    /// Creates a new [`GameState`] on the title screen in `world`.
    pub fn new(world: World) -> Self {
        let now = Instant::now();
        Self {
            player: Player::new(),
            camera: CameraMode::Idle,
            world,
            chop: ChopState::new(),
            quest: QuestState::new(),
            flock: Flock::new(),
            last_report: CollisionReport::default(),
            clock: 0.0,
            last_frame_time: now,
            delta_time: 0.0,
            frame_count: 0,
            current_fps: 0.0,
            last_fps_time: now,
        }
    }

    /// Advances the game by one frame of `delta_time` seconds.
    pub fn update(&mut self, input: &InputSnapshot, delta_time: f32) {
        self.clock += delta_time;

        if input.start_game {
            self.camera.start();
        }

        let (dx, dy) = input.orbit_delta;
        if dx != 0.0 || dy != 0.0 {
            self.player.mouse_movement(dx, dy);
        }

        self.player.begin_frame();

        match self.camera {
            CameraMode::Idle => {}
            CameraMode::ScriptedArrival { .. } => {
                self.camera.advance(&mut self.player, delta_time);
                self.flock.update(delta_time);
            }
            CameraMode::FreeLook => {
                self.player.apply_movement(input, delta_time);
                self.player.update_bob(self.clock);
                self.flock.update(delta_time);
            }
        }

        let probe = self.camera.probe(&self.player);
        let report = self.world.resolve_frame(&mut self.player, probe);

        if self.camera.is_free_look() {
            let felled = self.chop.update(input.chop_held, report.choppable, delta_time);
            if let Some(tree) = felled {
                if self.world.fell_tree(tree, self.player.footprint_ahead()) {
                    self.quest.record_chop();
                }
            }
        }

        self.quest.update(report.near_npc, input.accept_quest);
        self.last_report = report;
    }

    /// Formats the HUD for the current state.
    pub fn hud(&self) -> HudText {
        HudText {
            trees_chopped: format!("Trees chopped: {}", self.quest.trees_chopped),
            quest: self.quest.quest_line(),
            countdown: self.chop.remaining_text(),
            dialogue: self.last_report.near_npc.then(|| self.quest.dialogue()),
            title: (!self.camera.has_started()).then_some([WINDOW_TITLE, START_PROMPT]),
            title_scale: self.clock.sin().abs() + 0.3,
            fps: format!("{:.2} fps", self.current_fps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NPC_CENTER, PLAYER_START};
    use crate::game::scene::SceneRegistry;

    const FRAME: f32 = 0.25;

    fn state() -> GameState {
        GameState::new(World::generate(&SceneRegistry::with_defaults(), 11).unwrap())
    }

    fn free_look() -> GameState {
        let mut state = state();
        state.camera = CameraMode::FreeLook;
        state
    }

    /// On the title screen the player cannot move, but the orbit still turns.
    #[test]
    fn test_title_screen_blocks_movement() {
        let mut state = state();
        let input = InputSnapshot {
            forward: true,
            orbit_delta: (10.0, 0.0),
            ..Default::default()
        };
        let theta = state.player.camera_theta;
        state.update(&input, FRAME);
        assert_eq!(state.player.position, PLAYER_START);
        assert!(state.player.camera_theta < theta);

        let hud = state.hud();
        assert_eq!(hud.title, Some(["Timberman", "Press [ENTER] to play"]));
        assert!(hud.countdown.is_none());
    }

    /// Enter starts the fly-in, which ends in free look about ten seconds later.
    #[test]
    fn test_start_to_free_look() {
        let mut state = state();
        let start = InputSnapshot {
            start_game: true,
            ..Default::default()
        };
        state.update(&start, 0.0);
        assert!(matches!(state.camera, CameraMode::ScriptedArrival { .. }));
        assert!(state.hud().title.is_none());

        for _ in 0..41 {
            state.update(&InputSnapshot::default(), FRAME);
        }
        assert_eq!(state.camera, CameraMode::FreeLook);
    }

    /// Holding chop on a tree for three seconds leaves one stump and counts it once.
    #[test]
    fn test_chop_tree_end_to_end() {
        let mut state = free_look();
        state.world.trees.truncate(1);
        let [x, _, z] = state.world.trees[0].position;
        state.player.position = [x, 2.5, z];

        let hold = InputSnapshot {
            chop_held: true,
            ..Default::default()
        };
        for _ in 0..11 {
            state.update(&hold, FRAME);
        }
        assert!(state.world.trees[0].is_standing());
        assert!(state.hud().countdown.is_some());

        state.update(&hold, FRAME);
        assert!(!state.world.trees[0].is_standing());
        assert_eq!(state.quest.trees_chopped, 1);
        assert_eq!(state.hud().trees_chopped, "Trees chopped: 1");

        for _ in 0..20 {
            state.update(&hold, FRAME);
        }
        assert_eq!(state.world.felled_count(), 1);
        assert_eq!(state.quest.trees_chopped, 1);
    }

    /// Chopping needs free look; during the fly-in the input is ignored.
    #[test]
    fn test_no_chop_before_free_look() {
        let mut state = state();
        state.camera = CameraMode::ScriptedArrival { t: 0.0 };
        let hold = InputSnapshot {
            chop_held: true,
            ..Default::default()
        };
        state.update(&hold, FRAME);
        assert_eq!(state.chop, ChopState::new());
    }

    /// Standing next to the villager shows the dialogue and accepting starts the quest.
    #[test]
    fn test_accept_quest_near_villager() {
        let mut state = free_look();
        state.player.position = [NPC_CENTER[0] + 4.0, 2.5, NPC_CENTER[2]];
        let accept = InputSnapshot {
            accept_quest: true,
            ..Default::default()
        };
        state.update(&accept, FRAME);

        assert_eq!(state.quest.level, 1);
        let hud = state.hud();
        assert_eq!(hud.dialogue, Some(quest::DIALOGUE[1]));
        assert_eq!(hud.quest.as_deref(), Some("Quest: chop 3 trees"));
    }

    #[test]
    fn test_fps_text() {
        let mut state = state();
        state.current_fps = 59.876;
        assert_eq!(state.hud().fps, "59.88 fps");
    }
}
