//! The match tracker: every tracked match, keyed by id.
//!
//! # Concurrency note
//!
//! `MatchTracker` is NOT thread-safe by itself; it uses a plain
//! `HashMap`. Callers that share it across tasks wrap it in a mutex of
//! their own. It has nothing to do with room actors.

use std::collections::HashMap;

use cardroom_protocol::{MatchId, PlayerId};
use chrono::Utc;

use crate::{MatchError, MatchState};

/// Turn metadata for every tracked match.
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ get() / update() ... ──→ remove()
///    ▲                                     │
///    └──────── create() again overwrites ──┘
/// ```
#[derive(Debug, Default)]
pub struct MatchTracker {
    matches: HashMap<MatchId, MatchState>,
}

impl MatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a match at round 1 with the first player in
    /// `player_order` to act.
    ///
    /// Replaces any match already tracked under `match_id`.
    ///
    /// # Errors
    /// Returns [`MatchError::EmptyOrder`] if `player_order` is empty.
    pub fn create(
        &mut self,
        match_id: MatchId,
        player_order: Vec<PlayerId>,
    ) -> Result<&MatchState, MatchError> {
        let state = MatchState::new(match_id, player_order)?;
        if self.matches.insert(match_id, state).is_some() {
            tracing::debug!(%match_id, "match replaced");
        }
        tracing::info!(%match_id, "match created");
        self.matches
            .get(&match_id)
            .ok_or(MatchError::NotFound(match_id))
    }

    /// Returns the tracked state of a match.
    pub fn get(&self, match_id: MatchId) -> Option<&MatchState> {
        self.matches.get(&match_id)
    }

    /// Replaces a match's state wholesale and refreshes its timestamp.
    ///
    /// Fields are not merged: whatever `state` holds becomes the match.
    /// Does nothing and returns `false` if the match is not tracked.
    pub fn update(&mut self, match_id: MatchId, mut state: MatchState) -> bool {
        let Some(slot) = self.matches.get_mut(&match_id) else {
            tracing::debug!(%match_id, "update for untracked match ignored");
            return false;
        };
        state.match_id = match_id;
        state.last_updated = Utc::now();
        *slot = state;
        true
    }

    /// Reads, modifies and writes back a match in one step.
    ///
    /// # Errors
    /// Returns [`MatchError::NotFound`] if the match is not tracked, or
    /// whatever `modify` returns; in both cases nothing is stored.
    pub fn update_with<F>(&mut self, match_id: MatchId, modify: F) -> Result<&MatchState, MatchError>
    where
        F: FnOnce(&mut MatchState) -> Result<(), MatchError>,
    {
        let slot = self
            .matches
            .get_mut(&match_id)
            .ok_or(MatchError::NotFound(match_id))?;
        let mut staged = slot.clone();
        modify(&mut staged)?;
        staged.match_id = match_id;
        staged.last_updated = Utc::now();
        *slot = staged;
        Ok(&*slot)
    }

    /// Stops tracking a match. Returns its last state.
    pub fn remove(&mut self, match_id: MatchId) -> Option<MatchState> {
        let removed = self.matches.remove(&match_id);
        if removed.is_some() {
            tracing::info!(%match_id, "match removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Lists tracked match ids in ascending order.
    pub fn match_ids(&self) -> Vec<MatchId> {
        let mut ids: Vec<MatchId> = self.matches.keys().copied().collect();
        ids.sort();
        ids
    }
}
