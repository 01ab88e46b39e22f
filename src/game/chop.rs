//! Tree chopping: the hold-to-chop timer and the axe swing.

use crate::config::{AXE_SWING_DEGREES, AXE_SWING_RATE, CHOP_DURATION};

/// Where the axe is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChopPhase {
    /// Axe at rest.
    #[default]
    Idle,
    /// Chop input held on a choppable tree.
    Chopping,
    /// Input released early; the swing winds down to rest.
    ReturningToRest,
}

/// Hold-to-chop state for the single tree in reach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChopState {
    /// Current phase of the swing.
    pub phase: ChopPhase,
    /// Seconds of swing accumulated towards [`CHOP_DURATION`].
    pub timer: f32,
    /// Current axe rotation, in degrees.
    pub axe_angle: f32,
    /// Tree the timer belongs to.
    pub target: Option<usize>,
}

impl ChopState {
    /// Axe at rest with no target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the chop by one frame.
    ///
    /// `choppable` is this frame's tree in reach, if any. Returns the index of the
    /// tree that was felled this frame; the caller turns it into a stump. A felled
    /// tree is never returned twice because the state resets to idle and a stump
    /// is no longer choppable.
    pub fn update(
        &mut self,
        chop_held: bool,
        choppable: Option<usize>,
        delta_time: f32,
    ) -> Option<usize> {
        match choppable.filter(|_| chop_held) {
            Some(tree) => {
                if self.target != Some(tree) {
                    self.timer = 0.0;
                    self.target = Some(tree);
                }
                self.phase = ChopPhase::Chopping;
                self.swing(delta_time);

                if self.timer >= CHOP_DURATION {
                    *self = Self::new();
                    return Some(tree);
                }
            }
            None => match self.phase {
                ChopPhase::Idle => {}
                ChopPhase::Chopping | ChopPhase::ReturningToRest => {
                    if self.axe_angle as i32 != 0 {
                        self.phase = ChopPhase::ReturningToRest;
                        self.swing(delta_time);
                    } else {
                        log::debug!("Axe back at rest");
                        *self = Self::new();
                    }
                }
            },
        }
        None
    }

    fn swing(&mut self, delta_time: f32) {
        self.axe_angle = (AXE_SWING_RATE * self.timer).sin() * AXE_SWING_DEGREES;
        self.timer += delta_time;
    }

    /// Countdown shown while chopping, e.g. `"1.5s"`.
    pub fn remaining_text(&self) -> Option<String> {
        (self.phase == ChopPhase::Chopping).then(|| format!("{:.1}s", CHOP_DURATION - self.timer))
    }
}
