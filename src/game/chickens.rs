//! A small flock of chickens pacing back and forth near the clearing.

use crate::config::{CHICKEN_PATH, CHICKEN_RATE};
use crate::math::cubic_bezier;

/// Lead distance of each follower from the leader, before the sway.
const FOLLOWER_OFFSETS: [f32; 2] = [2.0, 0.5];
/// How far the followers sway towards and away from the leader.
const SWAY_AMPLITUDE: f32 = 3.0;
const SWAY_RATE: f32 = 0.5;

/// One chicken's ground position and facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chicken {
    /// X/Z position on the ground.
    pub position: [f32; 2],
    /// Rotation about Y, in degrees.
    pub heading: f32,
}

/// The leader walks the path; the two followers trail it diagonally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flock {
    /// Progress along the current leg, `0..1`.
    pub t: f32,
    /// Walking the path end to start.
    pub returning: bool,
}

impl Flock {
    /// A flock at the start of its path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the flock. At the end of a leg it turns round and walks back.
    pub fn update(&mut self, delta_time: f32) {
        self.t += delta_time * CHICKEN_RATE;
        if self.t >= 1.0 {
            self.t = 0.0;
            self.returning = !self.returning;
        }
    }

    /// Where the leader stands.
    pub fn leader_position(&self) -> [f32; 2] {
        let t = if self.returning { 1.0 - self.t } else { self.t };
        cubic_bezier(&CHICKEN_PATH, t)
    }

    /// All three chickens at time `clock` (seconds since start).
    pub fn chickens(&self, clock: f32) -> [Chicken; 3] {
        let [x, z] = self.leader_position();
        let heading = if self.returning { 0.0 } else { 180.0 };
        let sway = (SWAY_RATE * clock).sin() * SWAY_AMPLITUDE;
        let follower = |lead: f32| Chicken {
            position: [x + lead + sway, z + lead + sway],
            heading,
        };

        [
            Chicken {
                position: [x, z],
                heading,
            },
            follower(FOLLOWER_OFFSETS[0]),
            follower(FOLLOWER_OFFSETS[1]),
        ]
    }
}
