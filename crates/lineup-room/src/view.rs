//! Per-viewer room snapshots.

use lineup_protocol::{PlayerId, PlayerView, ViewState};

use crate::Room;

/// Projects `room` for `viewer`.
///
/// Players and the card line are shown by id and name only. The one number
/// that appears is the viewer's own, so broadcasting the result to that
/// viewer can never leak anyone else's card. A viewer who isn't in the room
/// gets a snapshot with no number at all.
pub fn project(room: &Room, viewer: PlayerId) -> ViewState {
    ViewState {
        code: room.code().clone(),
        host_id: room.host_id(),
        status: room.status(),
        players: room
            .players()
            .iter()
            .map(|p| PlayerView { id: p.id, name: p.name.clone() })
            .collect(),
        card_line: room.card_line().to_vec(),
        my_number: room.player(viewer).and_then(|p| p.number),
        revealed_count: room.revealed_count(),
        result: room.result(),
    }
}

#[cfg(test)]
mod tests {
    use lineup_protocol::{RoomCode, RoomStatus};

    use super::*;
    use crate::GameConfig;

    fn playing_room() -> Room {
        let mut room = Room::new(RoomCode::normalize("QRST"), PlayerId(1), "Ana".into());
        room.add_player(PlayerId(2), "Bo".into(), 100).unwrap();
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(4);
        room.start_round(PlayerId(1), &GameConfig::default(), &mut rng).unwrap();
        room
    }

    #[test]
    fn test_project_shows_only_own_number() {
        let room = playing_room();
        let ana = room.player(PlayerId(1)).unwrap().number;
        let bo = room.player(PlayerId(2)).unwrap().number;

        assert_eq!(project(&room, PlayerId(1)).my_number, ana);
        assert_eq!(project(&room, PlayerId(2)).my_number, bo);
    }

    #[test]
    fn test_project_player_list_carries_no_numbers() {
        let room = playing_room();
        let view = project(&room, PlayerId(1));
        let players = format!("{:?}", view.players);
        assert!(!players.contains("number"), "{players}");
    }

    #[test]
    fn test_project_for_outsider_has_no_number() {
        let room = playing_room();
        let view = project(&room, PlayerId(99));
        assert_eq!(view.my_number, None);
        assert_eq!(view.status, RoomStatus::Playing);
        assert_eq!(view.players.len(), 2);
    }

    #[test]
    fn test_project_lobby() {
        let room = Room::new(RoomCode::normalize("QRST"), PlayerId(1), "Ana".into());
        let view = project(&room, PlayerId(1));
        assert_eq!(view.code.as_str(), "QRST");
        assert_eq!(view.host_id, PlayerId(1));
        assert_eq!(view.status, RoomStatus::Lobby);
        assert!(view.card_line.is_empty());
        assert_eq!(view.my_number, None);
        assert_eq!(view.result, None);
    }
}
