//! Whole-game-tree properties of the engine.

use std::collections::HashSet;
use strictly_minimax::{
    Board, DRAW_VALUE, LINES, Outcome, Player, Square, check_winner, choose_move, classify,
    completes_line, search,
};

/// Every board reachable from the empty board with X moving first.
fn reachable_boards() -> HashSet<Board> {
    fn walk(board: Board, to_move: Player, seen: &mut HashSet<Board>) {
        if !seen.insert(board) || classify(&board).is_terminal() {
            return;
        }
        for pos in board.legal_moves() {
            let next = board.place(pos, to_move).unwrap();
            walk(next, to_move.opponent(), seen);
        }
    }

    let mut seen = HashSet::new();
    walk(Board::new(), Player::X, &mut seen);
    seen
}

fn to_move(board: &Board) -> Player {
    let x = board
        .squares()
        .iter()
        .filter(|s| **s == Square::Occupied(Player::X))
        .count();
    let o = board
        .squares()
        .iter()
        .filter(|s| **s == Square::Occupied(Player::O))
        .count();
    if x == o { Player::X } else { Player::O }
}

/// Straightforward line-by-line evaluation to compare `classify` against.
fn manual_outcome(board: &Board) -> Outcome {
    for line in LINES {
        let marks: Vec<Square> = line.iter().map(|&i| board.get(i).unwrap()).collect();
        if let Square::Occupied(p) = marks[0] {
            if marks[1] == marks[0] && marks[2] == marks[0] {
                return Outcome::Win(p);
            }
        }
    }
    if board.legal_moves().is_empty() {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

#[test]
fn test_reachable_board_count() {
    // 5478 distinct legal positions, the well-known total for tic-tac-toe.
    assert_eq!(reachable_boards().len(), 5478);
}

#[test]
fn test_classify_matches_manual_enumeration() {
    for board in reachable_boards() {
        assert_eq!(classify(&board), manual_outcome(&board), "{}", board);
    }
}

#[test]
fn test_search_never_returns_occupied_square() {
    for board in reachable_boards() {
        if board.occupied_count() < 2 || classify(&board).is_terminal() {
            continue;
        }
        let result = search(&board, to_move(&board));
        let pos = result.best_move.expect("ongoing board has a move");
        assert!(board.is_empty(pos), "{} -> {}", board.to_compact(), pos);
    }
}

#[test]
fn test_optimal_play_stays_drawn() {
    let mut board = Board::new();
    let mut mover = Player::X;
    while classify(&board) == Outcome::Ongoing {
        let result = search(&board, mover);
        assert_eq!(result.value, DRAW_VALUE, "{}", board.to_compact());
        board = board.place(result.best_move.unwrap(), mover).unwrap();
        mover = mover.opponent();
    }
    assert_eq!(classify(&board), Outcome::Draw);
}

#[test]
fn test_place_only_creates_winner_on_completed_line() {
    for board in reachable_boards() {
        if classify(&board) != Outcome::Ongoing {
            continue;
        }
        let mover = to_move(&board);
        for pos in board.legal_moves() {
            let next = board.place(pos, mover).unwrap();
            match check_winner(&next) {
                Some(winner) => {
                    assert_eq!(winner, mover);
                    assert!(completes_line(&board, pos, mover));
                }
                None => assert!(!completes_line(&board, pos, mover)),
            }
        }
    }
}

#[test]
fn test_heuristic_always_wins_or_blocks() {
    let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(3);
    for board in reachable_boards() {
        if classify(&board) != Outcome::Ongoing {
            continue;
        }
        let me = to_move(&board);
        let them = me.opponent();
        let empties = board.legal_moves();
        let can_win = empties.iter().any(|&p| completes_line(&board, p, me));
        let must_block = empties.iter().any(|&p| completes_line(&board, p, them));

        let pos = choose_move(&board, me, them, &mut rng).unwrap();
        assert!(board.is_empty(pos));
        if can_win {
            assert!(completes_line(&board, pos, me), "{}", board.to_compact());
        } else if must_block {
            assert!(completes_line(&board, pos, them), "{}", board.to_compact());
        }
    }
}

#[test]
fn test_heuristic_never_beats_search() {
    // Search as O against the heuristic as X never loses, whatever the dice say.
    for seed in 0..20 {
        let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(seed);
        let mut board = Board::new();
        let mut mover = Player::X;
        while classify(&board) == Outcome::Ongoing {
            let pos = match mover {
                Player::X => choose_move(&board, Player::X, Player::O, &mut rng).unwrap(),
                Player::O => search(&board, Player::O).best_move.unwrap(),
            };
            board = board.place(pos, mover).unwrap();
            mover = mover.opponent();
        }
        assert_ne!(classify(&board), Outcome::Win(Player::X), "seed {}", seed);
    }
}

#[test]
fn test_board_serde_round_trip() {
    let board: Board = "XX..O....".parse().unwrap();
    let json = serde_json::to_string(&board).unwrap();
    assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
}
