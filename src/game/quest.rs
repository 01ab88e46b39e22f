//! The woodcutting quest given by the villager next to the giant tree.
//!
//! Progress is a level from 0 to [`FINAL_LEVEL`]. Every level has three lines of
//! dialogue, and the quest only moves while the player stands close enough to
//! hear them.

/// Last level; the quest is complete here.
pub const FINAL_LEVEL: u8 = 4;

/// Three lines per level, indexed by level.
pub const DIALOGUE: [[&str; 3]; 5] = [
    [
        "Hello there, woodcutter. Winter is drawing near",
        "and the people of a nearby village need firewood to keep warm.",
        "If you are willing to help us gather it, press [Y].",
    ],
    [
        "Splendid, thank you kindly!",
        "You can start by bringing me the wood of 3 trees.",
        "I will be waiting for you right here.",
    ],
    [
        "We are very grateful for your help!",
        "Still, we will need a little more wood.",
        "Bring us the wood of 5 more trees.",
    ],
    [
        "Some new folk have settled in our village, so",
        "we will need even more wood. Could you",
        "help us by gathering the wood of 10 more trees?",
    ],
    [
        "Thank you so much for your help!",
        "The wood you gathered will surely",
        "keep us warm through the coming winter.",
    ],
];

/// Trees needed to leave levels 1, 2 and 3.
const TREE_GOALS: [u32; 3] = [3, 5, 10];

/// Quest level and progress towards its tree goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestState {
    /// Current level, `0..=FINAL_LEVEL`.
    pub level: u8,
    /// Set once the player accepts; stays set for the session.
    pub accepted: bool,
    /// Trees felled since the last level change.
    pub trees_chopped: u32,
}

impl QuestState {
    /// Level 0, not yet accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one felled tree towards the current tier.
    pub fn record_chop(&mut self) {
        self.trees_chopped += 1;
    }

    /// Trees the current level asks for, if it asks for any.
    pub fn goal(&self) -> Option<u32> {
        match self.level {
            1..=3 => Some(TREE_GOALS[usize::from(self.level - 1)]),
            _ => None,
        }
    }

    /// Advances the quest by at most one level.
    ///
    /// Nothing happens unless `near_npc` holds: the accept key is ignored and
    /// finished tiers wait until the player comes back. Returns the new level
    /// when a transition happened.
    pub fn update(&mut self, near_npc: bool, accept_pressed: bool) -> Option<u8> {
        if !near_npc {
            return None;
        }
        if accept_pressed && !self.accepted {
            log::info!("Quest accepted");
            self.accepted = true;
        }

        let ready = match self.level {
            0 => self.accepted,
            FINAL_LEVEL => false,
            _ => self.goal().is_some_and(|goal| self.trees_chopped >= goal),
        };
        if !ready {
            return None;
        }

        self.level += 1;
        self.trees_chopped = 0;
        log::info!("Quest advanced to level {}", self.level);
        Some(self.level)
    }

    /// The villager's lines for the current level.
    pub fn dialogue(&self) -> [&'static str; 3] {
        DIALOGUE[usize::from(self.level.min(FINAL_LEVEL))]
    }

    /// HUD objective, e.g. `"Quest: chop 5 trees"`.
    pub fn quest_line(&self) -> Option<String> {
        self.goal().map(|goal| format!("Quest: chop {goal} trees"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chop(quest: &mut QuestState, count: u32) {
        for _ in 0..count {
            quest.record_chop();
        }
    }

    /// Full playthrough from the first greeting to the thank-you.
    #[test]
    fn test_quest_end_to_end() {
        let mut quest = QuestState::new();
        assert_eq!(quest.update(true, false), None);
        assert_eq!(quest.update(true, true), Some(1));
        assert_eq!(quest.trees_chopped, 0);

        chop(&mut quest, 2);
        assert_eq!(quest.update(true, false), None);
        chop(&mut quest, 1);
        assert_eq!(quest.update(true, false), Some(2));
        assert_eq!(quest.trees_chopped, 0);

        chop(&mut quest, 5);
        assert_eq!(quest.update(true, false), Some(3));
        chop(&mut quest, 10);
        assert_eq!(quest.update(true, false), Some(4));
        assert_eq!(quest.trees_chopped, 0);

        chop(&mut quest, 50);
        assert_eq!(quest.update(true, true), None);
        assert_eq!(quest.level, FINAL_LEVEL);
        assert_eq!(quest.dialogue(), DIALOGUE[4]);
        assert!(quest.quest_line().is_none());
    }

    /// Away from the villager the quest is frozen, even with the goal met.
    #[test]
    fn test_frozen_outside_proximity() {
        let mut quest = QuestState::new();
        assert_eq!(quest.update(false, true), None);
        assert!(!quest.accepted);

        quest.update(true, true);
        chop(&mut quest, 7);
        assert_eq!(quest.update(false, false), None);
        assert_eq!(quest.level, 1);
        assert_eq!(quest.trees_chopped, 7);

        assert_eq!(quest.update(true, false), Some(2));
    }

    /// Overshooting several goals still only advances one level per frame.
    #[test]
    fn test_one_transition_per_frame() {
        let mut quest = QuestState {
            level: 1,
            accepted: true,
            trees_chopped: 100,
        };
        assert_eq!(quest.update(true, false), Some(2));
        assert_eq!(quest.update(true, false), None);
    }

    /// Accepting latches: leaving and coming back still counts.
    #[test]
    fn test_accept_latches() {
        let mut quest = QuestState::new();
        quest.accepted = true;
        assert_eq!(quest.update(true, false), Some(1));
    }

    #[test]
    fn test_quest_lines() {
        let mut quest = QuestState::new();
        assert!(quest.quest_line().is_none());
        quest.level = 2;
        assert_eq!(quest.quest_line().as_deref(), Some("Quest: chop 5 trees"));
    }
}
