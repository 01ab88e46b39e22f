//! Camera modes: the title screen, the scripted fly-in, and free look.
//!
//! The camera owns no position of its own. In [`CameraMode::ScriptedArrival`] it
//! produces an eye point along a fixed curve that ends just behind the player; in
//! [`CameraMode::FreeLook`] the eye is the player and the view follows the orbit
//! angles. The mode only ever moves forward.

use crate::config::{ARRIVAL_CONTROL_POINTS, ARRIVAL_RATE, EYE_HEIGHT};
use crate::game::collision::Probe;
use crate::game::player::Player;
use crate::math::cubic_bezier;

/// Which stage of the session the camera is in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraMode {
    /// Title screen. Only the orbit angles react to input.
    #[default]
    Idle,
    /// Flying in from the hills towards the player.
    ScriptedArrival {
        /// Curve parameter in `[0, 1)`.
        t: f32,
    },
    /// Player-controlled first-person view.
    FreeLook,
}

/// Where the camera is and which way it faces for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub eye: [f32; 3],
    /// Look direction, not normalised.
    pub view: [f32; 3],
}

impl CameraMode {
    /// Whether the player has control over movement and gameplay.
    pub fn is_free_look(self) -> bool {
        self == CameraMode::FreeLook
    }

    /// Whether the session has left the title screen.
    pub fn has_started(self) -> bool {
        self != CameraMode::Idle
    }

    /// Begins the fly-in. Has no effect once the session is running.
    pub fn start(&mut self) {
        if *self == CameraMode::Idle {
            log::info!("Starting arrival sequence");
            *self = CameraMode::ScriptedArrival { t: 0.0 };
        }
    }

    /// Advances the fly-in by `delta_time` seconds.
    ///
    /// When the curve completes, switches to free look and puts the player's
    /// orbit angles back to their defaults.
    pub fn advance(&mut self, player: &mut Player, delta_time: f32) {
        if let CameraMode::ScriptedArrival { t } = self {
            *t += delta_time * ARRIVAL_RATE;
            if *t >= 1.0 {
                log::info!("Arrival complete, switching to free look");
                *self = CameraMode::FreeLook;
                player.reset_orbit();
            }
        }
    }

    /// Which point the collision pass should test this frame.
    pub fn probe(self, player: &Player) -> Probe {
        match self {
            CameraMode::ScriptedArrival { t } => Probe::Fixed(arrival_eye(player, t)),
            CameraMode::Idle | CameraMode::FreeLook => Probe::Player,
        }
    }

    /// Camera pose for the current frame.
    pub fn pose(self, player: &Player) -> CameraPose {
        match self {
            CameraMode::ScriptedArrival { t } => {
                let eye = arrival_eye(player, t);
                let target = [player.position[0], EYE_HEIGHT, player.position[2]];
                CameraPose {
                    eye,
                    view: [target[0] - eye[0], target[1] - eye[1], target[2] - eye[2]],
                }
            }
            CameraMode::Idle | CameraMode::FreeLook => {
                let [x, y, z] = player.orbit_offset();
                CameraPose {
                    eye: player.position,
                    view: [x, -y, z],
                }
            }
        }
    }
}

/// Point on the arrival curve, whose last control point sits one unit behind the player.
fn arrival_eye(player: &Player, t: f32) -> [f32; 3] {
    let [a, b, c] = ARRIVAL_CONTROL_POINTS;
    let end = [player.position[0], EYE_HEIGHT, player.position[2] - 1.0];
    cubic_bezier(&[a, b, c, end], t)
}
