//! Integration tests: zone relocation keeps a room's cards partitioned.

use cardroom_protocol::{CardId, PlayerId, RoomId};
use cardroom_zone::{GameStore, InMemoryStore, Owner, RoomRecord, Zone, ZoneLedger};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

const ROOM: RoomId = RoomId(1);

fn catalog_ids(n: u64) -> Vec<CardId> {
    (1..=n).map(CardId).collect()
}

/// Picks a random legal move for a random card and applies it.
fn random_move(ledger: &mut ZoneLedger, players: &[PlayerId], rng: &mut StdRng) {
    let assignments = ledger.assignments().to_vec();
    let Some(pick) = assignments.choose(rng) else {
        return;
    };
    let (to, owner) = match rng.random_range(0..3) {
        0 => (Zone::Deck, Owner::Room(ROOM)),
        1 => (Zone::DiscardPile, Owner::Room(ROOM)),
        _ => {
            let player = *players.choose(rng).unwrap();
            (Zone::Hand, Owner::Player(player))
        }
    };
    ledger.relocate(pick.card(), pick.zone(), to, owner).unwrap();
}

#[test]
fn test_random_relocations_preserve_partition() {
    let cards = catalog_ids(40);
    let players = [PlayerId(1), PlayerId(2), PlayerId(3)];

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ledger = ZoneLedger::stock_deck(ROOM, cards.clone());
        for _ in 0..200 {
            random_move(&mut ledger, &players, &mut rng);
            ledger.verify_partition(&cards).unwrap();
        }
        let total = ledger.deck_len()
            + ledger.discard_len()
            + players.iter().map(|p| ledger.hand_len(*p)).sum::<usize>();
        assert_eq!(total, cards.len(), "seed {seed}");
    }
}

#[test]
fn test_recycle_and_surrender_preserve_partition() {
    let cards = catalog_ids(10);
    let mut ledger = ZoneLedger::stock_deck(ROOM, cards.clone());
    let p = PlayerId(1);
    for card in &cards[..5] {
        ledger.relocate(*card, Zone::Deck, Zone::Hand, Owner::Player(p)).unwrap();
    }
    for card in &cards[5..] {
        ledger
            .relocate(*card, Zone::Deck, Zone::DiscardPile, Owner::Room(ROOM))
            .unwrap();
    }
    assert_eq!(ledger.deck_len(), 0);

    ledger.surrender_hand(p).unwrap();
    assert_eq!(ledger.discard_len(), 10);
    ledger.recycle_discard().unwrap();
    assert_eq!(ledger.deck_len(), 10);
    ledger.verify_partition(&cards).unwrap();
}

#[test]
fn test_store_keeps_ledger_order() {
    let store = InMemoryStore::new();
    store.insert_room(&RoomRecord::new(ROOM, "Room 1", 2)).unwrap();
    let mut snapshot = store.load_room(ROOM).unwrap().unwrap();
    snapshot.zones = ZoneLedger::stock_deck(ROOM, [CardId(5), CardId(2), CardId(9)]);
    store.commit(&snapshot).unwrap();

    let loaded = store.load_room(ROOM).unwrap().unwrap();
    assert_eq!(loaded.zones.top_of_deck(), Some(CardId(5)));
    let order: Vec<CardId> = loaded.zones.deck().map(|a| a.card()).collect();
    assert_eq!(order, vec![CardId(5), CardId(2), CardId(9)]);
}
