//! Player state and movement logic.
//!
//! This module defines the [`Player`] struct, which tracks the player's position, the
//! pre-frame snapshot used for collision rollback, and the spherical camera angles that
//! steer both the view and the walking direction.
//!
//! # Overview
//!
//! The player system handles:
//! - **Position and Rollback**: 3D world position plus the X/Z snapshot taken at the start
//!   of each frame
//! - **Orbit Angles**: `theta`/`phi`/`distance` spherical coordinates driven by the mouse
//! - **Movement**: Forward/backward/left/right along the orbit offset, with an optional sprint
//! - **View Bob**: A small vertical sine whose rate depends on how fast the player moves
//!
//! # Coordinate System
//!
//! The player uses a right-handed coordinate system with Y pointing up. The orbit offset
//! is computed as:
//! - `x = r * cos(phi) * sin(theta)`
//! - `y = r * sin(phi)`
//! - `z = r * cos(phi) * cos(theta)`
//!
//! Angles are in radians; `phi` is clamped to `[-PI/2, PI/2]`.
//!
//! # Usage Example
//!
//! ```rust
//! use crate::game::player::Player;
//!
//! let mut player = Player::new();
//!
//! // Start of a frame: remember where we are
//! player.begin_frame();
//!
//! // Walk forward for one 60 FPS frame
//! player.move_forward(0.016);
//!
//! // A collision fired: go back
//! player.roll_back();
//! ```

use crate::config::{
    BOB_AMPLITUDE, CAMERA_DISTANCE, DEFAULT_SPEED, EYE_HEIGHT, FREE_LOOK_PHI, FREE_LOOK_THETA,
    MOUSE_SENSITIVITY, PLAYER_START, SPRINT_BOB_RATE, SPRINT_SPEED, WALK_BOB_RATE,
};
use crate::game::keys::InputSnapshot;
use std::f32::consts::FRAC_PI_2;

/// How the player moved during the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gait {
    /// No movement input.
    #[default]
    Standing,
    /// Any movement key held.
    Walking,
    /// Sprint modifier held together with forward.
    Sprinting,
}

impl Gait {
    /// Angular rate of the view bob for this gait.
    ///
    /// Standing still gives a rate of zero, which keeps the camera at eye height.
    pub fn bob_rate(self) -> f32 {
        match self {
            Gait::Standing => 0.0,
            Gait::Walking => WALK_BOB_RATE,
            Gait::Sprinting => SPRINT_BOB_RATE,
        }
    }
}

/// Represents the player character's state in the world.
///
/// # Fields
///
/// ## Position
/// - `position`: 3D world coordinates `[x, y, z]`; `y` is owned by the view bob
/// - `previous_position`: snapshot taken by [`begin_frame`](Player::begin_frame), the only
///   rollback target for the frame
///
/// ## Camera
/// - `camera_theta`: azimuth around the Y axis, radians
/// - `camera_phi`: elevation, radians, clamped to `[-PI/2, PI/2]`
/// - `camera_distance`: radius of the orbit offset
///
/// ## Movement
/// - `speed`: current movement speed in units per second
/// - `gait`: how the player moved this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Player's world position in 3D space `[x, y, z]`.
    pub position: [f32; 3],

    /// Position at the start of the current frame.
    ///
    /// Only X and Z are restored on rollback; Y belongs to the view bob.
    pub previous_position: [f32; 3],

    /// Azimuth of the orbit offset, in radians.
    pub camera_theta: f32,

    /// Elevation of the orbit offset, in radians.
    pub camera_phi: f32,

    /// Radius of the orbit offset.
    pub camera_distance: f32,

    /// Current movement speed in units per second.
    pub speed: f32,

    /// How the player moved during the last movement update.
    pub gait: Gait,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Creates a new [`Player`] standing at the start of the forest clearing.
    ///
    /// # Returns
    ///
    /// A new `Player` instance with the following defaults:
    /// - Position: [`PLAYER_START`]
    /// - Orbit: `theta = -12.63`, `phi = 0.06`, `distance = 2.0`
    /// - Speed: walking speed
    pub fn new() -> Self {
        Self {
            position: PLAYER_START,
            previous_position: PLAYER_START,
            camera_theta: FREE_LOOK_THETA,
            camera_phi: FREE_LOOK_PHI,
            camera_distance: CAMERA_DISTANCE,
            speed: DEFAULT_SPEED,
            gait: Gait::Standing,
        }
    }

    /// Snapshots the current position as this frame's rollback target.
    ///
    /// Must be called once per frame before any movement or collision test.
    pub fn begin_frame(&mut self) {
        self.previous_position = self.position;
    }

    /// Restores X and Z from the frame snapshot.
    ///
    /// Calling this any number of times within a frame leaves the player in the same place.
    pub fn roll_back(&mut self) {
        self.position[0] = self.previous_position[0];
        self.position[2] = self.previous_position[2];
    }

    /// Updates the orbit angles based on mouse movement.
    ///
    /// # Arguments
    ///
    /// * `delta_x` - Mouse movement in the X direction (positive = right)
    /// * `delta_y` - Mouse movement in the Y direction (positive = down)
    ///
    /// # Behavior
    ///
    /// - **Theta**: Decreases with positive `delta_x`
    /// - **Phi**: Increases with positive `delta_y`, clamped to `[-PI/2, PI/2]`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crate::game::player::Player;
    ///
    /// let mut player = Player::new();
    /// let theta = player.camera_theta;
    /// player.mouse_movement(10.0, 0.0);
    /// assert!(player.camera_theta < theta);
    /// ```
    pub fn mouse_movement(&mut self, delta_x: f64, delta_y: f64) {
        self.camera_theta -= MOUSE_SENSITIVITY * delta_x as f32;
        self.camera_phi += MOUSE_SENSITIVITY * delta_y as f32;
        self.camera_phi = self.camera_phi.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Puts the orbit angles back to their free-look defaults.
    pub fn reset_orbit(&mut self) {
        self.camera_theta = FREE_LOOK_THETA;
        self.camera_phi = FREE_LOOK_PHI;
    }

    /// The spherical camera offset `[x, y, z]` for the current angles.
    ///
    /// Horizontal movement follows the X/Z part of this vector, so a wider orbit
    /// radius also means a faster stride.
    pub fn orbit_offset(&self) -> [f32; 3] {
        let r = self.camera_distance;
        let (sin_phi, cos_phi) = self.camera_phi.sin_cos();
        let (sin_theta, cos_theta) = self.camera_theta.sin_cos();
        [r * cos_phi * sin_theta, r * sin_phi, r * cos_phi * cos_theta]
    }

    /// The ground point one orbit offset in front of the player.
    ///
    /// Felled trees leave their stump here.
    pub fn footprint_ahead(&self) -> [f32; 2] {
        let offset = self.orbit_offset();
        [self.position[0] + offset[0], self.position[2] + offset[2]]
    }

    /// Moves the player along the orbit offset.
    ///
    /// # Movement Calculation
    ///
    /// - `position.x += offset.x * speed * delta_time`
    /// - `position.z += offset.z * speed * delta_time`
    pub fn move_forward(&mut self, delta_time: f32) {
        let [x, _, z] = self.orbit_offset();
        self.position[0] += delta_time * self.speed * x;
        self.position[2] += delta_time * self.speed * z;
    }

    /// Moves the player against the orbit offset. The inverse of `move_forward()`.
    pub fn move_backward(&mut self, delta_time: f32) {
        let [x, _, z] = self.orbit_offset();
        self.position[0] -= delta_time * self.speed * x;
        self.position[2] -= delta_time * self.speed * z;
    }

    /// Strafes left, perpendicular to the orbit offset.
    ///
    /// # Movement Calculation
    ///
    /// - `position.x += offset.z * speed * delta_time`
    /// - `position.z -= offset.x * speed * delta_time`
    pub fn move_left(&mut self, delta_time: f32) {
        let [x, _, z] = self.orbit_offset();
        self.position[0] += delta_time * self.speed * z;
        self.position[2] -= delta_time * self.speed * x;
    }

    /// Strafes right. The inverse of `move_left()`.
    pub fn move_right(&mut self, delta_time: f32) {
        let [x, _, z] = self.orbit_offset();
        self.position[0] -= delta_time * self.speed * z;
        self.position[2] += delta_time * self.speed * x;
    }

    /// Applies one frame of movement input and records the resulting [`Gait`].
    ///
    /// Sprinting only takes effect while moving forward; otherwise the player walks at
    /// the default speed.
    pub fn apply_movement(&mut self, input: &InputSnapshot, delta_time: f32) -> Gait {
        let sprinting = input.sprint && input.forward;
        self.speed = if sprinting { SPRINT_SPEED } else { DEFAULT_SPEED };

        if input.backward {
            self.move_backward(delta_time);
        }
        if input.forward {
            self.move_forward(delta_time);
        }
        if input.right {
            self.move_right(delta_time);
        }
        if input.left {
            self.move_left(delta_time);
        }

        self.gait = if sprinting {
            Gait::Sprinting
        } else if input.is_moving() {
            Gait::Walking
        } else {
            Gait::Standing
        };
        self.gait
    }

    /// Sets the eye height from the view bob at time `clock` (seconds since start).
    pub fn update_bob(&mut self, clock: f32) {
        self.position[1] = (self.gait.bob_rate() * clock).sin().abs() * BOB_AMPLITUDE + EYE_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn forward_only() -> InputSnapshot {
        InputSnapshot {
            forward: true,
            ..Default::default()
        }
    }

    /// The player starts at the clearing entrance with the free-look orientation.
    #[test]
    fn test_new_player_defaults() {
        let player = Player::new();
        assert_eq!(player.position, [3.77, 2.5, -26.03]);
        assert_eq!(player.camera_theta, -12.63);
        assert_eq!(player.camera_phi, 0.06);
        assert_eq!(player.camera_distance, 2.0);
        assert_eq!(player.speed, DEFAULT_SPEED);
    }

    /// Phi never leaves the half-open hemisphere range, however far the mouse goes.
    #[test]
    fn test_mouse_movement_clamps_phi() {
        let mut player = Player::new();
        player.mouse_movement(0.0, 10_000.0);
        assert_eq!(player.camera_phi, FRAC_PI_2);
        player.mouse_movement(0.0, -20_000.0);
        assert_eq!(player.camera_phi, -FRAC_PI_2);
    }

    #[test]
    fn test_mouse_movement_theta_direction() {
        let mut player = Player::new();
        player.mouse_movement(100.0, 0.0);
        assert!((player.camera_theta - (FREE_LOOK_THETA - 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_orbit_offset_length() {
        let mut player = Player::new();
        player.camera_theta = 0.7;
        player.camera_phi = -0.3;
        let [x, y, z] = player.orbit_offset();
        assert!(((x * x + y * y + z * z).sqrt() - CAMERA_DISTANCE).abs() < EPSILON);
    }

    /// Looking straight along +Z moves the player along +Z.
    #[test]
    fn test_move_forward_follows_offset() {
        let mut player = Player::new();
        player.position = [0.0, 2.5, 0.0];
        player.camera_theta = 0.0;
        player.camera_phi = 0.0;
        player.apply_movement(&forward_only(), 1.0);
        assert!(player.position[0].abs() < EPSILON);
        assert!((player.position[2] - DEFAULT_SPEED * CAMERA_DISTANCE).abs() < EPSILON);
    }

    /// Left and right strafes cancel out.
    #[test]
    fn test_strafes_cancel() {
        let mut player = Player::new();
        let start = player.position;
        let input = InputSnapshot {
            left: true,
            right: true,
            ..Default::default()
        };
        player.apply_movement(&input, 0.5);
        assert!((player.position[0] - start[0]).abs() < EPSILON);
        assert!((player.position[2] - start[2]).abs() < EPSILON);
        assert_eq!(player.gait, Gait::Walking);
    }

    /// Sprint needs forward to kick in.
    #[test]
    fn test_sprint_requires_forward() {
        let mut player = Player::new();
        let input = InputSnapshot {
            sprint: true,
            backward: true,
            ..Default::default()
        };
        assert_eq!(player.apply_movement(&input, 0.1), Gait::Walking);
        assert_eq!(player.speed, DEFAULT_SPEED);

        let input = InputSnapshot {
            sprint: true,
            forward: true,
            ..Default::default()
        };
        assert_eq!(player.apply_movement(&input, 0.1), Gait::Sprinting);
        assert_eq!(player.speed, SPRINT_SPEED);
    }

    /// Standing still keeps the camera at eye height; walking lifts it within the amplitude.
    #[test]
    fn test_view_bob() {
        let mut player = Player::new();
        player.apply_movement(&InputSnapshot::default(), 0.1);
        player.update_bob(12.3);
        assert_eq!(player.position[1], EYE_HEIGHT);

        player.apply_movement(&forward_only(), 0.1);
        for step in 0..100 {
            player.update_bob(step as f32 * 0.037);
            assert!(player.position[1] >= EYE_HEIGHT);
            assert!(player.position[1] <= EYE_HEIGHT + BOB_AMPLITUDE + EPSILON);
        }
    }

    /// Rollback restores X/Z from the snapshot and leaves the bob alone.
    #[test]
    fn test_roll_back_keeps_height() {
        let mut player = Player::new();
        player.begin_frame();
        player.position = [10.0, 2.6, 10.0];
        player.roll_back();
        player.roll_back();
        assert_eq!(player.position, [PLAYER_START[0], 2.6, PLAYER_START[2]]);
    }
}
