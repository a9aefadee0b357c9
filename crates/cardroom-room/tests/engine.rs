//! Scenario tests for the pure room state machine.

use cardroom_protocol::{CardId, EventName, Notification, PlayerId, RoomId};
use cardroom_room::engine::{
    self, PlayOutcome, RandomEvent, Rules, Verdict,
};
use cardroom_room::{GameConfig, GameError};
use cardroom_zone::{
    CardCatalog, CardDefinition, CardKind, InMemoryCatalog, Owner, PlayerRecord,
    RoomRecord, RoomSnapshot, Zone, ZoneLedger,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

// =========================================================================
// Fixtures
// =========================================================================

const ROOM: RoomId = RoomId(1);

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

/// `count` cards of one kind, quantities 1..=count.
fn catalog_of(kind: CardKind, count: u64) -> InMemoryCatalog {
    (1..=count)
        .map(|i| CardDefinition::new(CardId(i), format!("Card {i}"), kind, i as i32))
        .collect()
}

/// An unstarted room with players 1..=n seated at full health.
fn seated_room(n: u64) -> RoomSnapshot {
    let mut room = RoomRecord::new(ROOM, "Room 1", 8);
    room.players = (1..=n).map(PlayerId).collect();
    let players = room
        .players
        .iter()
        .map(|id| PlayerRecord {
            id: *id,
            name: format!("Player {id}"),
            health: 100,
            room: Some(ROOM),
        })
        .collect();
    RoomSnapshot {
        room,
        players,
        zones: ZoneLedger::new(ROOM),
    }
}

struct Table {
    catalog: InMemoryCatalog,
    config: GameConfig,
    rng: StdRng,
}

impl Table {
    fn new(catalog: InMemoryCatalog) -> Self {
        Self {
            catalog,
            config: GameConfig::default(),
            rng: StdRng::seed_from_u64(42),
        }
    }

    fn rules(&mut self) -> Rules<'_> {
        Rules {
            catalog: &self.catalog,
            config: &self.config,
            rng: &mut self.rng,
        }
    }

    fn start(&mut self, snapshot: &mut RoomSnapshot) -> Vec<Notification> {
        let mut out = Vec::new();
        engine::start_game(snapshot, &mut self.rules(), &mut out).unwrap();
        out
    }
}

fn holder(snapshot: &RoomSnapshot) -> PlayerId {
    snapshot.room.current_turn.unwrap()
}

fn first_card_in_hand(snapshot: &RoomSnapshot, player: PlayerId) -> CardId {
    snapshot.zones.hand(player).next().unwrap().card()
}

// =========================================================================
// Start
// =========================================================================

#[test]
fn test_start_deals_hands_and_order_draws() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);

    let out = table.start(&mut snapshot);

    assert!(snapshot.room.started);
    assert_eq!(snapshot.zones.hand_len(pid(1)), 5);
    assert_eq!(snapshot.zones.hand_len(pid(2)), 5);
    // Two order cards discarded, ten dealt.
    assert_eq!(snapshot.zones.discard_len(), 2);
    assert_eq!(snapshot.zones.deck_len(), 20 - 12);
    snapshot
        .zones
        .verify_partition(&table.catalog.card_ids())
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, EventName::GameStarted);
    assert_eq!(out[0].payload, "Game in room R-1 has started!");
}

#[test]
fn test_turn_order_follows_order_draw_values() {
    let mut table = Table::new(catalog_of(CardKind::Equipment, 2));
    let mut snapshot = seated_room(3);

    table.start(&mut snapshot);

    // Player 1 drew the first discarded card, player 2 the second, and
    // player 3 found the deck empty.
    let drawn: Vec<i32> = snapshot
        .zones
        .discard_pile()
        .map(|a| table.catalog.card(a.card()).unwrap().quantity)
        .collect();
    assert_eq!(drawn.len(), 2);
    let expected = if drawn[1] > drawn[0] {
        vec![pid(2), pid(1), pid(3)]
    } else {
        vec![pid(1), pid(2), pid(3)]
    };
    assert_eq!(snapshot.room.turn_order, expected);
    assert_eq!(snapshot.room.current_turn, Some(expected[0]));
}

#[test]
fn test_equal_draws_keep_join_order() {
    let catalog: InMemoryCatalog = (1..=10)
        .map(|i| CardDefinition::new(CardId(i), "Same", CardKind::Equipment, 3))
        .collect();
    let mut table = Table::new(catalog);
    let mut snapshot = seated_room(4);

    table.start(&mut snapshot);

    assert_eq!(snapshot.room.turn_order, vec![pid(1), pid(2), pid(3), pid(4)]);
}

#[test]
fn test_start_with_short_deck_deals_what_it_can() {
    let mut table = Table::new(catalog_of(CardKind::Action, 8));
    let mut snapshot = seated_room(2);

    table.start(&mut snapshot);

    let order = snapshot.room.turn_order.clone();
    assert_eq!(snapshot.zones.hand_len(order[0]), 5);
    assert_eq!(snapshot.zones.hand_len(order[1]), 1);
    assert_eq!(snapshot.zones.deck_len(), 0);
    snapshot
        .zones
        .verify_partition(&table.catalog.card_ids())
        .unwrap();
}

#[test]
fn test_start_preconditions() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));

    let mut lonely = seated_room(1);
    let err = engine::start_game(&mut lonely, &mut table.rules(), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::NotEnoughPlayers { required: 2, present: 1, .. }
    ));
    assert!(!lonely.room.started);
    assert!(lonely.zones.is_empty());

    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);
    let err = engine::start_game(&mut snapshot, &mut table.rules(), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, GameError::AlreadyStarted(ROOM)));
}

// =========================================================================
// Draw
// =========================================================================

#[test]
fn test_draw_moves_top_card_and_advances() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);

    let player = holder(&snapshot);
    let top = snapshot.zones.top_of_deck().unwrap();
    let mut out = Vec::new();
    let drawn = engine::draw_card(&mut snapshot, player, &mut table.rules(), &mut out).unwrap();

    assert_eq!(drawn.id, top);
    assert!(snapshot.zones.find(top).unwrap().is_in_hand_of(player));
    assert_eq!(snapshot.zones.hand_len(player), 6);
    assert_eq!(snapshot.zones.deck_len(), 7);
    assert_ne!(holder(&snapshot), player);
    assert_eq!(out[0].payload, format!("Player {player} drew a card."));
}

#[test]
fn test_draw_reshuffles_discard_when_deck_is_empty() {
    // 12 cards, 2 players: the deal empties the deck.
    let mut table = Table::new(catalog_of(CardKind::Action, 12));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);
    assert_eq!(snapshot.zones.deck_len(), 0);
    let discarded = snapshot.zones.discard_len();
    assert_eq!(discarded, 2);

    let player = holder(&snapshot);
    engine::draw_card(&mut snapshot, player, &mut table.rules(), &mut Vec::new()).unwrap();

    assert_eq!(snapshot.zones.deck_len(), discarded - 1);
    assert_eq!(snapshot.zones.discard_len(), 0);
    snapshot
        .zones
        .verify_partition(&table.catalog.card_ids())
        .unwrap();
}

#[test]
fn test_draw_with_nothing_left_fails_cleanly() {
    let mut table = Table::new(catalog_of(CardKind::Action, 12));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);

    // Two draws use up the two recycled order cards.
    for _ in 0..2 {
        let player = holder(&snapshot);
        engine::draw_card(&mut snapshot, player, &mut table.rules(), &mut Vec::new()).unwrap();
    }

    let before = snapshot.clone();
    let player = holder(&snapshot);
    let mut out = Vec::new();
    let err = engine::draw_card(&mut snapshot, player, &mut table.rules(), &mut out).unwrap_err();

    assert!(matches!(err, GameError::NoCardAvailable(ROOM)));
    assert_eq!(snapshot, before);
    assert!(out.is_empty());
}

// =========================================================================
// Use
// =========================================================================

#[test]
fn test_action_card_damages_next_player_and_goes_to_room_discard() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);

    let player = holder(&snapshot);
    let target = engine::next_holder(&snapshot.room.turn_order, player).unwrap();
    let card = first_card_in_hand(&snapshot, player);
    let mut out = Vec::new();

    let play = engine::use_card(&mut snapshot, player, card, &mut table.rules(), &mut out).unwrap();

    assert_eq!(play.outcome, PlayOutcome::Damaged { target, amount: 10 });
    assert_eq!(snapshot.health_of(target), Some(90));
    assert_eq!(snapshot.health_of(player), Some(100));
    let assignment = snapshot.zones.find(card).unwrap();
    assert_eq!(assignment.zone(), Zone::DiscardPile);
    assert_eq!(assignment.owner(), Owner::Room(ROOM));
    assert_eq!(holder(&snapshot), target);
    assert_eq!(
        out.last().unwrap().payload,
        format!("Player {player} used card {card}.")
    );
}

#[test]
fn test_consumable_heals_the_user() {
    let mut table = Table::new(catalog_of(CardKind::Consumable, 20));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);

    let player = holder(&snapshot);
    let card = first_card_in_hand(&snapshot, player);
    let play = engine::use_card(&mut snapshot, player, card, &mut table.rules(), &mut Vec::new())
        .unwrap();

    assert_eq!(play.outcome, PlayOutcome::Healed { amount: 20 });
    assert_eq!(snapshot.health_of(player), Some(120));
}

#[test]
fn test_equipment_is_discarded_without_effect() {
    let mut table = Table::new(catalog_of(CardKind::Equipment, 20));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);

    let player = holder(&snapshot);
    let card = first_card_in_hand(&snapshot, player);
    let play = engine::use_card(&mut snapshot, player, card, &mut table.rules(), &mut Vec::new())
        .unwrap();

    assert_eq!(play.outcome, PlayOutcome::NoEffect);
    assert!(snapshot.seated().all(|p| p.health == 100));
    assert_eq!(snapshot.zones.find(card).unwrap().zone(), Zone::DiscardPile);
}

#[test]
fn test_turn_preconditions() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);

    let err = engine::draw_card(&mut snapshot, pid(1), &mut table.rules(), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, GameError::NotStarted(ROOM)));

    table.start(&mut snapshot);
    let player = holder(&snapshot);
    let other = engine::next_holder(&snapshot.room.turn_order, player).unwrap();

    let err = engine::pass_turn(&mut snapshot, other, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, GameError::NotYourTurn(p) if p == other));

    let err = engine::pass_turn(&mut snapshot, pid(9), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, GameError::NotInRoom(..)));

    // A card from the other player's hand.
    let foreign = first_card_in_hand(&snapshot, other);
    let err = engine::use_card(&mut snapshot, player, foreign, &mut table.rules(), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, GameError::CardNotInHand { .. }));
    assert_eq!(holder(&snapshot), player);
}

#[test]
fn test_pass_advances_cyclically() {
    let mut table = Table::new(catalog_of(CardKind::Action, 30));
    let mut snapshot = seated_room(3);
    table.start(&mut snapshot);

    let first = holder(&snapshot);
    for _ in 0..3 {
        let player = holder(&snapshot);
        engine::pass_turn(&mut snapshot, player, &mut Vec::new()).unwrap();
    }
    assert_eq!(holder(&snapshot), first);
}

// =========================================================================
// Events and the win check
// =========================================================================

#[test]
fn test_event_damages_every_seated_player() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(3);
    table.start(&mut snapshot);

    let mut out = Vec::new();
    assert!(engine::apply_event(
        &mut snapshot,
        RandomEvent::Earthquake,
        &table.config,
        &mut out
    ));
    assert!(snapshot.seated().all(|p| p.health == 90));
    assert_eq!(out[0].payload, "An earthquake strikes! All players lose 10 HP.");
}

#[test]
fn test_event_before_start_is_a_no_op() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);
    let mut out = Vec::new();

    assert_eq!(
        engine::apply_random_event(&mut snapshot, &mut table.rules(), &mut out),
        None
    );
    assert!(snapshot.seated().all(|p| p.health == 100));
    assert!(out.is_empty());
}

#[test]
fn test_resolved_event_eliminates_at_once() {
    let mut table = Table::new(catalog_of(CardKind::Action, 30));
    let mut snapshot = seated_room(3);
    table.start(&mut snapshot);
    snapshot.player_mut(pid(1)).unwrap().health = 5;
    snapshot.player_mut(pid(2)).unwrap().health = 5;

    let mut out = Vec::new();
    let mut event = RandomEvent::Calm;
    for _ in 0..100 {
        out.clear();
        event = engine::resolve_random_event(&mut snapshot, &mut table.rules(), &mut out)
            .unwrap()
            .unwrap();
        if event != RandomEvent::Calm {
            break;
        }
    }
    assert_ne!(event, RandomEvent::Calm);

    assert!(!snapshot.room.started);
    assert_eq!(snapshot.room.winner, Some(pid(3)));
    assert_eq!(snapshot.room.players, vec![pid(3)]);
    assert!(snapshot.zones.hand(pid(1)).next().is_none());
    let last = out.last().unwrap();
    assert_eq!(last.name, EventName::GameEnded);
    assert_eq!(last.payload, "Player P-3 wins!");
}

#[test]
fn test_double_elimination_leaves_a_winner() {
    let mut table = Table::new(catalog_of(CardKind::Action, 30));
    let mut snapshot = seated_room(3);
    table.start(&mut snapshot);
    snapshot.player_mut(pid(1)).unwrap().health = 15;
    snapshot.player_mut(pid(2)).unwrap().health = 15;

    let mut out = Vec::new();
    engine::apply_event(&mut snapshot, RandomEvent::DragonAttack, &table.config, &mut out);
    let verdict = engine::check_win_condition(&mut snapshot, &mut out).unwrap();
    engine::announce(&verdict, ROOM, &mut out);

    assert_eq!(verdict, Verdict::Winner(pid(3)));
    assert!(!snapshot.room.started);
    assert_eq!(snapshot.room.winner, Some(pid(3)));
    assert_eq!(snapshot.room.players, vec![pid(3)]);
    assert_eq!(snapshot.room.turn_order, vec![pid(3)]);
    for loser in [pid(1), pid(2)] {
        assert_eq!(snapshot.zones.hand_len(loser), 0);
        assert_eq!(snapshot.player(loser).unwrap().room, None);
    }
    snapshot
        .zones
        .verify_partition(&table.catalog.card_ids())
        .unwrap();

    let ended: Vec<_> = out
        .iter()
        .filter(|n| n.name == EventName::GameEnded)
        .collect();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].payload, "Player P-3 wins!");
    assert!(out.iter().any(|n| n.payload == "Player P-1 has been eliminated!"));
}

#[test]
fn test_win_check_is_idempotent() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);
    snapshot.player_mut(pid(2)).unwrap().health = 0;

    let first = engine::check_win_condition(&mut snapshot, &mut Vec::new()).unwrap();
    assert_eq!(first, Verdict::Winner(pid(1)));
    let after_first = snapshot.clone();

    let mut out = Vec::new();
    let second = engine::check_win_condition(&mut snapshot, &mut out).unwrap();
    assert_eq!(second.winner(), Some(pid(1)));
    assert!(!second.ended_game());
    assert_eq!(snapshot, after_first);
    assert!(out.is_empty());
}

#[test]
fn test_everyone_eliminated_is_a_draw() {
    let mut table = Table::new(catalog_of(CardKind::Action, 20));
    let mut snapshot = seated_room(2);
    table.start(&mut snapshot);
    for p in [pid(1), pid(2)] {
        snapshot.player_mut(p).unwrap().health = 5;
    }

    let mut out = Vec::new();
    engine::apply_event(&mut snapshot, RandomEvent::Earthquake, &table.config, &mut out);
    let verdict = engine::check_win_condition(&mut snapshot, &mut out).unwrap();

    assert_eq!(verdict, Verdict::Draw);
    assert!(!snapshot.room.started);
    assert_eq!(snapshot.room.current_turn, None);
    assert_eq!(snapshot.room.winner, None);
    assert_eq!(out.last().unwrap().payload, "Game ends in a draw!");
    assert_eq!(out.last().unwrap().name, EventName::GameEnded);
}

#[test]
fn test_eliminating_the_holder_passes_turn_to_successor() {
    let mut table = Table::new(catalog_of(CardKind::Action, 30));
    let mut snapshot = seated_room(3);
    table.start(&mut snapshot);

    let current = holder(&snapshot);
    let successor = engine::next_holder(&snapshot.room.turn_order, current).unwrap();
    snapshot.player_mut(current).unwrap().health = -1;

    let verdict = engine::check_win_condition(&mut snapshot, &mut Vec::new()).unwrap();

    assert_eq!(verdict, Verdict::Ongoing);
    assert_eq!(holder(&snapshot), successor);
    assert!(!snapshot.room.turn_order.contains(&current));
}

// =========================================================================
// Whole games
// =========================================================================

/// Plays random legal moves, checking the zone partition and the turn
/// holder after every committed step.
#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..20u64 {
        let mut table = Table::new(catalog_of(CardKind::Action, 14));
        table.catalog.insert(CardDefinition::new(CardId(15), "Potion", CardKind::Consumable, 2));
        table.catalog.insert(CardDefinition::new(CardId(16), "Shield", CardKind::Equipment, 4));
        table.rng = StdRng::seed_from_u64(seed);
        let all_cards = table.catalog.card_ids();

        let mut snapshot = seated_room(3);
        table.start(&mut snapshot);

        let mut steps = 0;
        while snapshot.room.started && steps < 500 {
            steps += 1;
            let player = holder(&snapshot);
            let staged = snapshot.clone();
            let in_hand = snapshot.zones.hand(player).next().map(|a| a.card());
            let mut out = Vec::new();
            let mut rules = table.rules();

            let result = match (steps % 3, in_hand) {
                (0, Some(card)) => {
                    engine::use_card(&mut snapshot, player, card, &mut rules, &mut out).map(|_| ())
                }
                (1, _) => engine::draw_card(&mut snapshot, player, &mut rules, &mut out).map(|_| ()),
                _ => engine::pass_turn(&mut snapshot, player, &mut out),
            }
            .and_then(|()| engine::conclude_action(&mut snapshot, &mut rules, &mut out).map(|_| ()));

            if let Err(e) = result {
                assert!(matches!(e, GameError::NoCardAvailable(_)), "seed {seed}: {e}");
                snapshot = staged;
                engine::pass_turn(&mut snapshot, player, &mut Vec::new()).unwrap();
            }

            snapshot.zones.verify_partition(&all_cards).unwrap();
            if snapshot.room.started {
                assert!(snapshot.room.turn_order.contains(&holder(&snapshot)));
                assert_eq!(snapshot.room.players.len(), snapshot.room.turn_order.len());
            }
        }
        assert!(!snapshot.room.started, "seed {seed}: game never ended");
    }
}
