use super::*;
use crate::error::BoardError;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center
    assert_eq!(pos.to_index(), 7 * 15 + 7);
    assert_eq!(pos.to_index(), 112);

    let pos2 = Pos::from_index(112);
    assert_eq!(pos2, Pos::center());
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(14, 14));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, -1));
    assert!(!Pos::is_valid(15, 0));
    assert!(!Pos::is_valid(0, 15));
}

#[test]
fn test_pos_try_new_rejects_out_of_range() {
    assert_eq!(Pos::try_new(14, 0), Ok(Pos::new(14, 0)));
    assert_eq!(
        Pos::try_new(15, 3),
        Err(BoardError::OutOfBounds { row: 15, col: 3 })
    );
    assert!(Pos::try_new(0, 99).is_err());
}

#[test]
fn test_pos_offset_stops_at_edge() {
    let corner = Pos::new(0, 0);
    assert_eq!(corner.offset(1, 1, 2), Some(Pos::new(2, 2)));
    assert_eq!(corner.offset(-1, 0, 1), None);
    assert_eq!(Pos::new(14, 14).offset(0, 1, 1), None);
}

#[test]
fn test_board_constants() {
    assert_eq!(BOARD_SIZE, 15);
    assert_eq!(TOTAL_CELLS, 225);
}

#[test]
fn test_pos_ordering() {
    let pos1 = Pos::new(0, 0);
    let pos2 = Pos::new(0, 1);
    let pos3 = Pos::new(1, 0);

    assert!(pos1 < pos2);
    assert!(pos2 < pos3);
}

#[test]
fn test_board_get_set_roundtrip() {
    let mut board = Board::new();
    assert!(board.is_board_empty());
    board.set(Pos::new(3, 4), Stone::White);
    assert_eq!(board.get(Pos::new(3, 4)), Stone::White);
    assert_eq!(board.stone_count(), 1);
    board.set(Pos::new(3, 4), Stone::Empty);
    assert!(board.is_board_empty());
}

#[test]
fn test_board_raw_access_out_of_bounds() {
    let mut board = Board::new();
    assert_eq!(
        board.get_at(15, 0),
        Err(BoardError::OutOfBounds { row: 15, col: 0 })
    );
    assert!(board.set_at(0, 15, Stone::Black).is_err());
    assert!(board.set_at(14, 14, Stone::Black).is_ok());
    assert_eq!(board.get_at(14, 14), Ok(Stone::Black));
}

#[test]
fn test_board_is_full() {
    let mut board = Board::new();
    for idx in 0..TOTAL_CELLS - 1 {
        board.set(Pos::from_index(idx), Stone::Black);
    }
    assert!(!board.is_full());
    assert_eq!(board.empty_cells().collect::<Vec<_>>(), vec![Pos::new(14, 14)]);
    board.set(Pos::new(14, 14), Stone::White);
    assert!(board.is_full());
    assert_eq!(board.empty_cells().count(), 0);
}

#[test]
fn test_empty_cells_row_major() {
    let mut board = Board::new();
    board.set(Pos::new(0, 0), Stone::Black);
    let first: Vec<_> = board.empty_cells().take(2).collect();
    assert_eq!(first, vec![Pos::new(0, 1), Pos::new(0, 2)]);
}

#[test]
fn test_has_neighbor() {
    let mut board = Board::new();
    board.set(Pos::new(7, 7), Stone::Black);
    assert!(board.has_neighbor(Pos::new(8, 8), 1));
    assert!(board.has_neighbor(Pos::new(9, 9), 2));
    assert!(!board.has_neighbor(Pos::new(10, 10), 2));
}

#[test]
fn test_pos_deserialize_checks_bounds() {
    let pos: Pos = serde_json::from_str(r#"{"row":14,"col":0}"#).unwrap();
    assert_eq!(pos, Pos::new(14, 0));
    assert_eq!(serde_json::to_string(&pos).unwrap(), r#"{"row":14,"col":0}"#);

    assert!(serde_json::from_str::<Pos>(r#"{"row":15,"col":0}"#).is_err());
    assert!(serde_json::from_str::<Pos>(r#"{"row":200,"col":3}"#).is_err());
    assert!(serde_json::from_str::<Pos>(r#"{"row":-1,"col":3}"#).is_err());
}
