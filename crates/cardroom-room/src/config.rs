//! Game rule constants and room settings.

use serde::{Deserialize, Serialize};

/// Configuration shared by every room a manager creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum players required to start a game.
    pub min_players: usize,

    /// Cards dealt to each player when the game starts.
    pub hand_size: usize,

    /// Damage an Action card deals to the next player in sequence.
    pub action_damage: i32,

    /// Health a Consumable card restores to the player who uses it.
    pub consumable_heal: i32,

    /// Damage of the severe random event (every seated player).
    pub major_event_damage: i32,

    /// Damage of the mild random event (every seated player).
    pub minor_event_damage: i32,

    /// Health given to a joining player whose profile carries none.
    pub starting_health: i32,

    /// Seed for room RNGs. `None` seeds each room from the OS.
    /// Each room mixes its id into the seed.
    pub rng_seed: Option<u64>,

    /// Room actor mailbox size. Senders wait when it is full.
    pub channel_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            hand_size: 5,
            action_damage: 10,
            consumable_heal: 20,
            major_event_damage: 20,
            minor_event_damage: 10,
            starting_health: 100,
            rng_seed: None,
            channel_size: 64,
        }
    }
}

impl GameConfig {
    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// - `min_players` is at least 2 (a game needs an opponent).
    /// - `channel_size` is at least 1.
    /// - Damage and heal amounts are not negative.
    pub fn validated(mut self) -> Self {
        if self.min_players < 2 {
            tracing::warn!(min_players = self.min_players, "min_players below 2, clamping");
            self.min_players = 2;
        }
        self.channel_size = self.channel_size.max(1);
        self.action_damage = self.action_damage.max(0);
        self.consumable_heal = self.consumable_heal.max(0);
        self.major_event_damage = self.major_event_damage.max(0);
        self.minor_event_damage = self.minor_event_damage.max(0);
        self
    }

    /// Returns a config whose rooms draw from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }
}
