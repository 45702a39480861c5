//! Integration tests for the registry and the round lifecycle, driven only
//! through the public API.

use std::collections::HashSet;

use lineup_protocol::{PlayerId, RoomCode, RoomStatus, RoundResult};
use lineup_room::{GameConfig, GameError, RoomRegistry};

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn registry() -> RoomRegistry {
    RoomRegistry::with_seed(GameConfig::default(), 2024)
}

/// Creates a room hosted by player 1 and joins players 2..=n.
fn room_with(registry: &mut RoomRegistry, n: u64) -> RoomCode {
    let code = registry.create_room(pid(1), "P1").unwrap().code().clone();
    for id in 2..=n {
        registry.join_room(&code, pid(id), &format!("P{id}")).unwrap();
    }
    code
}

fn number_of(registry: &RoomRegistry, code: &RoomCode, id: PlayerId) -> u8 {
    registry
        .get(code)
        .and_then(|room| room.player(id))
        .and_then(|p| p.number)
        .expect("player should hold a number")
}

/// Places every card in the given order.
fn place_all(registry: &mut RoomRegistry, code: &RoomCode, order: &[PlayerId]) {
    for (position, &id) in order.iter().enumerate() {
        registry.place_card(code, id, position).unwrap();
    }
}

// =========================================================================
// Room registry
// =========================================================================

#[test]
fn test_create_room_starts_in_lobby_with_creator_as_host() {
    let mut registry = registry();
    let room = registry.create_room(pid(1), "Ana").unwrap();

    assert!(room.code().is_well_formed());
    assert_eq!(room.host_id(), pid(1));
    assert_eq!(room.status(), RoomStatus::Lobby);
    assert_eq!(room.players().len(), 1);
    assert_eq!(room.players()[0].name, "Ana");
}

#[test]
fn test_join_room_not_found() {
    let mut registry = registry();
    let missing = RoomCode::normalize("ZZZZ");
    let result = registry.join_room(&missing, pid(1), "Ana");
    assert!(matches!(result, Err(GameError::RoomNotFound(c)) if c == missing));
}

#[test]
fn test_join_room_is_case_insensitive_after_normalizing() {
    let mut registry = registry();
    let code = registry.create_room(pid(1), "Ana").unwrap().code().clone();

    let typed = RoomCode::normalize(&code.as_str().to_lowercase());
    registry.join_room(&typed, pid(2), "Bo").unwrap();

    assert_eq!(registry.get(&code).unwrap().players().len(), 2);
}

#[test]
fn test_join_room_while_playing_is_rejected() {
    let mut registry = registry();
    let code = room_with(&mut registry, 2);
    registry.start_round(&code, pid(1)).unwrap();

    let result = registry.join_room(&code, pid(3), "Late");
    assert!(matches!(result, Err(GameError::RoomNotJoinable(_))));
    assert_eq!(registry.get(&code).unwrap().players().len(), 2);
}

#[test]
fn test_join_room_full_at_number_range() {
    let config = GameConfig { number_min: 1, number_max: 3, ..GameConfig::default() };
    let mut registry = RoomRegistry::with_seed(config, 1);
    let code = room_with(&mut registry, 3);

    let result = registry.join_room(&code, pid(4), "P4");
    assert!(matches!(result, Err(GameError::RoomFull(_))));
}

#[test]
fn test_remove_host_passes_leadership_in_join_order() {
    let mut registry = registry();
    let code = room_with(&mut registry, 3);

    let departure = registry.remove_player(&code, pid(1)).unwrap();
    assert_eq!(departure.new_host, Some(pid(2)));
    assert!(!departure.room_closed);
    assert_eq!(registry.get(&code).unwrap().host_id(), pid(2));

    let departure = registry.remove_player(&code, pid(2)).unwrap();
    assert_eq!(departure.new_host, Some(pid(3)));
}

#[test]
fn test_remove_last_player_deletes_room() {
    let mut registry = registry();
    let code = room_with(&mut registry, 2);

    registry.remove_player(&code, pid(2)).unwrap();
    let departure = registry.remove_player(&code, pid(1)).unwrap();

    assert!(departure.room_closed);
    assert!(registry.get(&code).is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_operations_on_missing_room_return_not_found() {
    let mut registry = registry();
    let code = RoomCode::normalize("ABCD");

    assert!(matches!(registry.start_round(&code, pid(1)), Err(GameError::RoomNotFound(_))));
    assert!(matches!(registry.place_card(&code, pid(1), 0), Err(GameError::RoomNotFound(_))));
    assert!(matches!(registry.move_card(&code, 0, 1), Err(GameError::RoomNotFound(_))));
    assert!(matches!(registry.start_reveal(&code), Err(GameError::RoomNotFound(_))));
    assert!(matches!(registry.reveal_next(&code), Err(GameError::RoomNotFound(_))));
    assert!(matches!(registry.remove_player(&code, pid(1)), Err(GameError::RoomNotFound(_))));
    assert!(matches!(registry.final_results(&code), Err(GameError::RoomNotFound(_))));
}

// =========================================================================
// Round state machine
// =========================================================================

#[test]
fn test_every_round_deals_distinct_numbers_in_range() {
    let mut registry = registry();
    let code = room_with(&mut registry, 8);

    for _ in 0..20 {
        registry.start_round(&code, pid(1)).unwrap();
        let room = registry.get(&code).unwrap();
        let numbers: HashSet<u8> = room.players().iter().filter_map(|p| p.number).collect();
        assert_eq!(numbers.len(), 8);
        assert!(numbers.iter().all(|n| (1..=100).contains(n)));

        // Finish the round so the next start_round is a replay.
        let order: Vec<PlayerId> = room.players().iter().map(|p| p.id).collect();
        place_all(&mut registry, &code, &order);
        registry.start_reveal(&code).unwrap();
        for _ in 0..8 {
            registry.reveal_next(&code).unwrap();
        }
    }
}

#[test]
fn test_place_card_rejected_after_placing_at_any_point() {
    let mut registry = registry();
    let code = room_with(&mut registry, 4);
    registry.start_round(&code, pid(1)).unwrap();

    registry.place_card(&code, pid(3), 0).unwrap();
    for other in [1, 2, 4] {
        let next = registry.get(&code).unwrap().card_line().len();
        assert_eq!(
            registry.place_card(&code, pid(3), next),
            Err(GameError::AlreadyPlaced)
        );
        registry.place_card(&code, pid(other), next).unwrap();
    }
    assert_eq!(
        registry.place_card(&code, pid(3), 4),
        Err(GameError::AlreadyPlaced)
    );
}

#[test]
fn test_move_card_preserves_members() {
    let mut registry = registry();
    let code = room_with(&mut registry, 5);
    registry.start_round(&code, pid(1)).unwrap();
    place_all(&mut registry, &code, &[pid(1), pid(2), pid(3), pid(4), pid(5)]);

    let before: HashSet<PlayerId> =
        registry.get(&code).unwrap().card_line().iter().copied().collect();

    for (from, to) in [(0, 4), (4, 0), (2, 3), (1, 1), (3, 0)] {
        registry.move_card(&code, from, to).unwrap();
        let line = registry.get(&code).unwrap().card_line();
        assert_eq!(line.len(), 5);
        let after: HashSet<PlayerId> = line.iter().copied().collect();
        assert_eq!(before, after);
    }
}

#[test]
fn test_reveal_is_legal_exactly_line_length_times() {
    let mut registry = registry();
    let code = room_with(&mut registry, 3);
    registry.start_round(&code, pid(1)).unwrap();

    place_all(&mut registry, &code, &[pid(1), pid(2)]);
    assert!(matches!(
        registry.start_reveal(&code),
        Err(GameError::NotAllPlaced { placed: 2, players: 3 })
    ));

    registry.place_card(&code, pid(3), 2).unwrap();
    registry.start_reveal(&code).unwrap();

    for index in 0..3 {
        let (data, room) = registry.reveal_next(&code).unwrap();
        assert_eq!(data.index, index);
        let expected = if index < 2 { RoomStatus::Revealing } else { RoomStatus::Ended };
        assert_eq!(room.status(), expected);
    }
    assert!(matches!(registry.reveal_next(&code), Err(GameError::NotRevealing)));
}

#[test]
fn test_result_matches_line_order() {
    let mut registry = registry();
    let code = room_with(&mut registry, 4);
    registry.start_round(&code, pid(1)).unwrap();

    // Sort the players by their dealt number: ascending line must win.
    let mut order: Vec<PlayerId> = (1..=4).map(pid).collect();
    order.sort_by_key(|&id| number_of(&registry, &code, id));
    place_all(&mut registry, &code, &order);
    registry.start_reveal(&code).unwrap();
    for _ in 0..4 {
        assert!(registry.reveal_next(&code).unwrap().0.is_correct);
    }
    assert_eq!(registry.get(&code).unwrap().result(), Some(RoundResult::Win));

    // Replay with a single swapped pair at the end: must lose.
    registry.start_round(&code, pid(1)).unwrap();
    let mut order: Vec<PlayerId> = (1..=4).map(pid).collect();
    order.sort_by_key(|&id| number_of(&registry, &code, id));
    order.swap(2, 3);
    place_all(&mut registry, &code, &order);
    registry.start_reveal(&code).unwrap();
    let flags: Vec<bool> = (0..4)
        .map(|_| registry.reveal_next(&code).unwrap().0.is_correct)
        .collect();
    assert_eq!(flags, vec![true, true, true, false]);
    assert_eq!(registry.get(&code).unwrap().result(), Some(RoundResult::Lose));
}

#[test]
fn test_two_player_round_trip() {
    let mut registry = registry();
    let code = registry.create_room(pid(1), "A").unwrap().code().clone();
    registry.join_room(&code, pid(2), "B").unwrap();
    registry.start_round(&code, pid(1)).unwrap();

    let a = number_of(&registry, &code, pid(1));
    let b = number_of(&registry, &code, pid(2));

    assert_eq!(registry.place_card(&code, pid(1), 0), Ok(0));
    assert_eq!(registry.place_card(&code, pid(2), 1), Ok(1));
    registry.start_reveal(&code).unwrap();

    let (first, _) = registry.reveal_next(&code).unwrap();
    assert_eq!((first.player_id, first.number, first.is_correct), (pid(1), a, true));
    assert_eq!(first.player_name, "A");

    let (second, room) = registry.reveal_next(&code).unwrap();
    assert_eq!(second.is_correct, b >= a);
    assert_eq!(room.status(), RoomStatus::Ended);

    let expected = if a <= b { RoundResult::Win } else { RoundResult::Lose };
    assert_eq!(room.result(), Some(expected));

    let results = registry.final_results(&code).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!((results[0].name.as_str(), results[0].number), ("A", a));
    assert_eq!((results[1].name.as_str(), results[1].number), ("B", b));
}

#[test]
fn test_rejected_operations_leave_room_unchanged() {
    let mut registry = registry();
    let code = room_with(&mut registry, 3);
    registry.start_round(&code, pid(1)).unwrap();
    registry.place_card(&code, pid(2), 0).unwrap();

    let before = format!("{:?}", registry.get(&code).unwrap());

    let _ = registry.start_round(&code, pid(2));
    let _ = registry.start_round(&code, pid(1));
    let _ = registry.place_card(&code, pid(1), 5);
    let _ = registry.place_card(&code, pid(2), 1);
    let _ = registry.move_card(&code, 0, 9);
    let _ = registry.start_reveal(&code);
    let _ = registry.reveal_next(&code);
    let _ = registry.final_results(&code);

    assert_eq!(format!("{:?}", registry.get(&code).unwrap()), before);
}

// =========================================================================
// Departures mid-round
// =========================================================================

#[test]
fn test_leaving_during_play_pulls_card_and_keeps_round() {
    let mut registry = registry();
    let code = room_with(&mut registry, 3);
    registry.start_round(&code, pid(1)).unwrap();
    place_all(&mut registry, &code, &[pid(2), pid(3)]);

    let departure = registry.remove_player(&code, pid(2)).unwrap();
    assert!(!departure.round_ended);

    let room = registry.get(&code).unwrap();
    assert_eq!(room.status(), RoomStatus::Playing);
    assert_eq!(room.card_line(), &[pid(3)]);

    // The remaining player can still complete the line at the new end.
    registry.place_card(&code, pid(1), 1).unwrap();
    registry.start_reveal(&code).unwrap();
}

#[test]
fn test_leaving_during_reveal_can_finish_round() {
    let mut registry = registry();
    let code = room_with(&mut registry, 3);
    registry.start_round(&code, pid(1)).unwrap();
    place_all(&mut registry, &code, &[pid(1), pid(2), pid(3)]);
    registry.start_reveal(&code).unwrap();
    registry.reveal_next(&code).unwrap();
    registry.reveal_next(&code).unwrap();

    let departure = registry.remove_player(&code, pid(3)).unwrap();

    assert!(departure.round_ended);
    let room = registry.get(&code).unwrap();
    assert_eq!(room.status(), RoomStatus::Ended);
    assert_eq!(room.revealed_count(), 2);
    assert!(room.result().is_some());
    assert_eq!(registry.final_results(&code).unwrap().len(), 2);
}
