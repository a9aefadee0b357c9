//! Match state: turn metadata for one match.

use std::collections::{BTreeMap, HashMap};

use cardroom_protocol::{MatchId, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MatchError;

/// What a player already did this round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionUsage {
    pub action_card_used: bool,
    pub skill_used: bool,
}

/// Turn metadata for one match.
///
/// A plain value: the tracker stores and returns it whole. Change a copy,
/// then hand it back with [`MatchTracker::update`](crate::MatchTracker::update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub match_id: MatchId,
    pub player_order: Vec<PlayerId>,
    pub current_player: PlayerId,
    /// Index of `current_player` in `player_order`.
    pub turn_index: usize,
    /// Starts at 1; goes up each time the turn wraps to the first player.
    pub round_number: u32,
    pub action_usage: HashMap<PlayerId, ActionUsage>,
    /// Free-form state owned by the caller. Never interpreted here.
    pub additional_state: BTreeMap<String, serde_json::Value>,
    pub last_updated: DateTime<Utc>,
}

impl MatchState {
    /// A fresh match at round 1 with the first player to act.
    pub fn new(match_id: MatchId, player_order: Vec<PlayerId>) -> Result<Self, MatchError> {
        let current_player = *player_order
            .first()
            .ok_or(MatchError::EmptyOrder(match_id))?;
        Ok(Self {
            match_id,
            player_order,
            current_player,
            turn_index: 0,
            round_number: 1,
            action_usage: HashMap::new(),
            additional_state: BTreeMap::new(),
            last_updated: Utc::now(),
        })
    }

    /// Moves to the next player. Wrapping to the first player starts a new
    /// round and clears every usage flag.
    pub fn advance(&mut self) -> PlayerId {
        if self.player_order.is_empty() {
            return self.current_player;
        }
        self.turn_index = (self.turn_index + 1) % self.player_order.len();
        if self.turn_index == 0 {
            self.round_number += 1;
            self.action_usage.clear();
        }
        self.current_player = self.player_order[self.turn_index];
        self.current_player
    }

    /// Usage flags of `player` this round. All false if nothing was used.
    pub fn usage(&self, player: PlayerId) -> ActionUsage {
        self.action_usage.get(&player).copied().unwrap_or_default()
    }

    pub fn mark_action_card_used(&mut self, player: PlayerId) -> Result<(), MatchError> {
        self.usage_mut(player)?.action_card_used = true;
        Ok(())
    }

    pub fn mark_skill_used(&mut self, player: PlayerId) -> Result<(), MatchError> {
        self.usage_mut(player)?.skill_used = true;
        Ok(())
    }

    fn usage_mut(&mut self, player: PlayerId) -> Result<&mut ActionUsage, MatchError> {
        if !self.player_order.contains(&player) {
            return Err(MatchError::UnknownPlayer(self.match_id, player));
        }
        Ok(self.action_usage.entry(player).or_default())
    }

    pub fn set_state(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.additional_state.insert(key.into(), value);
    }

    pub fn state(&self, key: &str) -> Option<&serde_json::Value> {
        self.additional_state.get(key)
    }
}
