use std::sync::Arc;

use cardroom::prelude::*;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn catalog() -> InMemoryCatalog {
    let strikes = (1..=18).map(|i| {
        CardDefinition::new(CardId(i), format!("Strike {i}"), CardKind::Action, i as i32)
            .with_description("Hits the next player.")
    });
    let potions = (19..=24).map(|i| {
        CardDefinition::new(CardId(i), "Potion", CardKind::Consumable, 2)
            .with_description("Restores your health.")
    });
    let gear = (25..=28).map(|i| {
        CardDefinition::new(CardId(i), "Buckler", CardKind::Equipment, 5).with_effect(CardEffect {
            id: i,
            name: "Block".into(),
            reference: "effects/block".into(),
        })
    });
    strikes.chain(potions).chain(gear).collect()
}

// ---------------------------------------------------------------------------
// Play
// ---------------------------------------------------------------------------

/// Plays one seat's turn: a card when the hand has one worth playing,
/// otherwise a draw, otherwise a pass.
async fn take_turn(
    server: &CardroomServer,
    catalog: &dyn CardCatalog,
    room: RoomId,
    info: &RoomInfo,
    player: PlayerId,
) -> Result<(), CardroomError> {
    let view = info.player(player);
    let health = view.map(|p| p.health).unwrap_or_default();
    let hand = view.map(|p| p.hand.as_slice()).unwrap_or_default();

    for card in hand {
        let Some(definition) = catalog.card(*card) else {
            continue;
        };
        let wanted = match definition.kind {
            CardKind::Action => true,
            CardKind::Consumable => health < 60,
            CardKind::Equipment => false,
        };
        if wanted {
            let play = server.use_card(room, player, *card).await?;
            tracing::debug!(%player, outcome = ?play.outcome, "card played");
            return Ok(());
        }
    }

    match server.draw_card(room, player).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::Exhausted => server.pass_turn(room, player).await,
        Err(e) => Err(e),
    }
}

/// Plays a two-player game to the end. Returns the winner, if any.
async fn duel(
    server: &CardroomServer,
    catalog: &dyn CardCatalog,
) -> Result<Option<PlayerId>, CardroomError> {
    let room = server.create_room(2).await?;
    let mut observer = server.subscribe(room).await?;
    let printer = tokio::spawn(async move {
        while let Some(note) = observer.recv().await {
            println!("{note}");
        }
    });

    server
        .join_room(room, PlayerProfile::new(PlayerId(1), "Ada"))
        .await?;
    server
        .join_room(room, PlayerProfile::new(PlayerId(2), "Bo").with_health(120))
        .await?;
    server.start_game(room).await?;

    loop {
        let info = server.room_info(room).await?;
        let Some(holder) = info.current_turn.filter(|_| info.started) else {
            break;
        };
        take_turn(server, catalog, room, &info, holder).await?;
    }

    let winner = server.check_win_condition(room).await?;
    let summary = server.room_info(room).await?;
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::warn!(error = %e, "could not render room summary"),
    }

    server.destroy_room(room).await?;
    let _ = printer.await;
    Ok(winner)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok());
    let config = GameConfig {
        rng_seed: seed,
        ..GameConfig::default()
    };
    let catalog = Arc::new(catalog());
    let server = CardroomServer::builder()
        .config(config)
        .shared_catalog(catalog.clone())
        .build();

    match duel(&server, catalog.as_ref()).await? {
        Some(winner) => eprintln!("winner: {winner}"),
        None => eprintln!("no winner"),
    }
    Ok(())
}
