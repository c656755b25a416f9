//! A small deterministic game implementing [`Position`], for tests.
//!
//! Each side has a king and two golds in hand. Kings step to any free square
//! not next to the other king. Golds are dropped on a few fixed squares and
//! afterwards step straight forward. A king reaching the far rank wins by
//! declaration; a side without a move is mated; otherwise the game ends
//! after [`ToyPosition::DEFAULT_MAX_PLIES`] plies and the side whose king
//! advanced further wins.
//!
//! SFEN text is `<pieces> <side> <hands> <move number>`, for example
//! `K5i,k5a b 22 1`: kings are `K`/`k`, golds `G`/`g`, and the hands field
//! holds Black's then White's golds in hand.

use rand::Rng;
use rand::seq::SliceRandom;

use rensa_core::{Color, DropKind, File, Move, Rank, Source, Square};

use crate::position::{Outcome, Position, Termination};

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Squares golds may be dropped on.
pub const DROP_SQUARES: [Square; 5] = [
    Square::new(File::File5, Rank::RankE),
    Square::new(File::File3, Rank::RankE),
    Square::new(File::File7, Rank::RankE),
    Square::new(File::File5, Rank::RankG),
    Square::new(File::File5, Rank::RankC),
];

/// Error for malformed toy SFEN text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid toy sfen: \"{sfen}\"")]
pub struct ToySfenError {
    pub sfen: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ToyState {
    kings: [Square; Color::COUNT],
    /// Golds on the board, sorted.
    golds: Vec<(Color, Square)>,
    hands: [u8; Color::COUNT],
    side: Color,
    move_number: u32,
}

impl ToyState {
    fn occupied(&self, sq: Square) -> bool {
        self.kings.contains(&sq) || self.golds.iter().any(|&(_, g)| g == sq)
    }

    fn sort_golds(&mut self) {
        self.golds.sort_by_key(|&(color, sq)| (color.index(), sq));
    }

    fn to_sfen(&self) -> String {
        let mut pieces = vec![
            format!("K{}", self.kings[Color::Black.index()]),
            format!("k{}", self.kings[Color::White.index()]),
        ];
        for &(color, sq) in &self.golds {
            let letter = if color == Color::Black { 'G' } else { 'g' };
            pieces.push(format!("{letter}{sq}"));
        }
        format!(
            "{} {} {}{} {}",
            pieces.join(","),
            self.side,
            self.hands[Color::Black.index()],
            self.hands[Color::White.index()],
            self.move_number
        )
    }

    fn parse(sfen: &str) -> Option<ToyState> {
        let fields: Vec<&str> = sfen.split_whitespace().collect();
        let [pieces, side, hands, number] = fields.as_slice() else {
            return None;
        };

        let mut kings = [None; Color::COUNT];
        let mut golds = Vec::new();
        for piece in pieces.split(',') {
            let mut chars = piece.chars();
            let letter = chars.next()?;
            let sq = Square::from_usi(chars.as_str())?;
            match letter {
                'K' => kings[Color::Black.index()] = Some(sq),
                'k' => kings[Color::White.index()] = Some(sq),
                'G' => golds.push((Color::Black, sq)),
                'g' => golds.push((Color::White, sq)),
                _ => return None,
            }
        }

        let side = match *side {
            "b" => Color::Black,
            "w" => Color::White,
            _ => return None,
        };

        let mut hand_digits = hands.chars().map(|c| c.to_digit(10));
        let black_hand = hand_digits.next()??;
        let white_hand = hand_digits.next()??;
        if hand_digits.next().is_some() {
            return None;
        }

        let move_number: u32 = number.parse().ok().filter(|&n| n >= 1)?;
        let mut state = ToyState {
            kings: [kings[0]?, kings[1]?],
            golds,
            hands: [black_hand as u8, white_hand as u8],
            side,
            move_number,
        };
        state.sort_golds();
        Some(state)
    }
}

fn adjacent(a: Square, b: Square) -> bool {
    let df = a.file().index().abs_diff(b.file().index());
    let dr = a.rank().index().abs_diff(b.rank().index());
    df <= 1 && dr <= 1
}

/// The toy game with its move history.
#[derive(Debug, Clone)]
pub struct ToyPosition {
    state: ToyState,
    history: Vec<(Move, ToyState)>,
    max_plies: u32,
}

impl ToyPosition {
    /// Plies after which a game ends by move limit.
    pub const DEFAULT_MAX_PLIES: u32 = 16;

    /// Starting position: kings on 5i and 5a, two golds in each hand.
    pub const STARTPOS_SFEN: &'static str = "K5i,k5a b 22 1";

    /// Black to move; [`ToyPosition::CORNERING_MOVE`] leaves White without
    /// a legal reply.
    pub const CORNERED_SFEN: &'static str = "K3c,k1a,G2a b 00 1";

    /// The king move that takes White's last escape square.
    pub const CORNERING_MOVE: Move = Move::new(
        Square::new(File::File3, Rank::RankC),
        Square::new(File::File2, Rank::RankC),
    );

    fn from_state(state: ToyState) -> Self {
        Self {
            state,
            history: Vec::new(),
            max_plies: Self::DEFAULT_MAX_PLIES,
        }
    }

    /// The position of [`ToyPosition::CORNERED_SFEN`].
    pub fn cornered() -> Self {
        Self::from_state(ToyState {
            kings: [
                Square::new(File::File3, Rank::RankC),
                Square::new(File::File1, Rank::RankA),
            ],
            golds: vec![(Color::Black, Square::new(File::File2, Rank::RankA))],
            hands: [0, 0],
            side: Color::Black,
            move_number: 1,
        })
    }

    /// The same position with a different move limit.
    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    fn plies_played(&self) -> u32 {
        self.state.move_number - 1
    }
}

impl Position for ToyPosition {
    type Error = ToySfenError;

    fn startpos() -> Self {
        Self::from_state(ToyState {
            kings: [
                Square::new(File::File5, Rank::RankI),
                Square::new(File::File5, Rank::RankA),
            ],
            golds: Vec::new(),
            hands: [2, 2],
            side: Color::Black,
            move_number: 1,
        })
    }

    fn from_sfen(sfen: &str) -> Result<Self, ToySfenError> {
        ToyState::parse(sfen)
            .map(Self::from_state)
            .ok_or_else(|| ToySfenError {
                sfen: sfen.to_string(),
            })
    }

    fn sfen(&self) -> String {
        self.state.to_sfen()
    }

    fn legal_moves(&self) -> Vec<Move> {
        let s = &self.state;
        let side = s.side;
        let king = s.kings[side.index()];
        let enemy = s.kings[side.flip().index()];
        let mut moves = Vec::new();

        for (df, dr) in KING_STEPS {
            if let Some(to) = king.offset(df, dr) {
                if !s.occupied(to) && !adjacent(to, enemy) {
                    moves.push(Move::new(king, to));
                }
            }
        }

        let forward = if side == Color::Black { -1 } else { 1 };
        for &(color, from) in &s.golds {
            if color != side {
                continue;
            }
            if let Some(to) = from.offset(0, forward) {
                if !s.occupied(to) {
                    moves.push(Move::new(from, to));
                }
            }
        }

        if s.hands[side.index()] > 0 {
            for sq in DROP_SQUARES {
                if !s.occupied(sq) {
                    moves.push(Move::new_drop(DropKind::Gold, sq));
                }
            }
        }
        moves
    }

    fn push(&mut self, mv: Move) {
        let previous = self.state.clone();
        let s = &mut self.state;
        let side = s.side.index();
        match mv.source() {
            Source::Drop(_) => {
                s.golds.push((s.side, mv.dest()));
                s.hands[side] = s.hands[side].saturating_sub(1);
            }
            Source::Board(from) if from == s.kings[side] => s.kings[side] = mv.dest(),
            Source::Board(from) => {
                if let Some(gold) = s.golds.iter_mut().find(|g| **g == (previous.side, from)) {
                    gold.1 = mv.dest();
                }
            }
        }
        s.sort_golds();
        s.side = s.side.flip();
        s.move_number += 1;
        self.history.push((mv, previous));
    }

    fn pop(&mut self) -> Option<Move> {
        let (mv, previous) = self.history.pop()?;
        self.state = previous;
        Some(mv)
    }

    fn is_king_move(&self, mv: Move) -> bool {
        mv.source().square() == Some(self.state.kings[self.state.side.index()])
    }

    fn side_to_move(&self) -> Color {
        self.state.side
    }

    fn outcome(&self) -> Option<Outcome> {
        let black = self.state.kings[Color::Black.index()].rank().index();
        let white = self.state.kings[Color::White.index()].rank().index();
        if black == Rank::RankA.index() {
            return Some(Outcome::win(Color::Black, Termination::Declaration));
        }
        if white == Rank::RankI.index() {
            return Some(Outcome::win(Color::White, Termination::Declaration));
        }
        if self.legal_moves().is_empty() {
            return Some(Outcome::win(self.state.side.flip(), Termination::Checkmate));
        }
        if self.plies_played() >= self.max_plies {
            let black_advance = Rank::RankI.index() - black;
            let white_advance = white;
            return Some(match black_advance.cmp(&white_advance) {
                std::cmp::Ordering::Greater => Outcome::win(Color::Black, Termination::MaxMoves),
                std::cmp::Ordering::Less => Outcome::win(Color::White, Termination::MaxMoves),
                std::cmp::Ordering::Equal => Outcome::draw(Termination::MaxMoves),
            });
        }
        None
    }

    fn ply(&self) -> usize {
        self.history.len()
    }
}

/// Play uniformly random legal moves until the game ends.
pub fn play_out_randomly<P: Position, R: Rng + ?Sized>(position: &mut P, rng: &mut R) {
    while position.outcome().is_none() {
        let moves = position.legal_moves();
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        position.push(mv);
    }
}
