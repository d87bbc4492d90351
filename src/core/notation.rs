//! Move notation
//!
//! Text is always resolved against the legal move list, so the castle and
//! en-passant flags of the returned [`Move`] come from the generator and
//! never from the text.

use super::board::{Board, Square};
use super::moves::{Move, Promotion};
use crate::engine::movegen::MoveGen;
use crate::error::{ChessError, Result};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess};

impl Board {
    /// Resolve long coordinate notation ("e2e4", "e7e8q") to a legal move
    pub fn parse_uci_move(&self, text: &str) -> Result<Move> {
        let text = text.trim();
        if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
            return Err(ChessError::InvalidMove(text.to_string()));
        }
        let from = Square::from_algebraic(&text[0..2])
            .ok_or_else(|| ChessError::InvalidMove(text.to_string()))?;
        let to = Square::from_algebraic(&text[2..4])
            .ok_or_else(|| ChessError::InvalidMove(text.to_string()))?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Promotion::from_char(c)
                .ok_or_else(|| ChessError::InvalidMove(text.to_string()))?,
            None => Promotion::None,
        };

        MoveGen::generate_legal_moves(self)
            .iter()
            .copied()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| ChessError::IllegalMove(text.to_string()))
    }

    /// Resolve standard algebraic notation ("Nf3", "exd5", "O-O", "e8=Q+")
    pub fn parse_san(&self, text: &str) -> Result<Move> {
        let text = text.trim();
        let san: SanPlus = text
            .parse()
            .map_err(|_| ChessError::InvalidMove(text.to_string()))?;
        let pos = self.to_shakmaty()?;
        let mv = san
            .san
            .to_move(&pos)
            .map_err(|_| ChessError::IllegalMove(text.to_string()))?;
        self.parse_uci_move(&mv.to_uci(CastlingMode::Standard).to_string())
    }

    fn to_shakmaty(&self) -> Result<Chess> {
        let fen = self.to_fen();
        let parsed: Fen = fen
            .parse()
            .map_err(|e| ChessError::fen(&fen, format!("{}", e)))?;
        parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessError::fen(&fen, format!("{}", e)))
    }
}

/// Replay PGN movetext (e.g. "1. e4 e5 2. Nf3 Nc6 1-0") from `board`
///
/// Move numbers may stand alone ("1.", "1...") or be glued to the move
/// ("1.e4", "1...e5").
pub fn play_san_line(board: &Board, movetext: &str) -> Result<Board> {
    let mut board = board.clone();
    for token in movetext.split_whitespace() {
        if matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*") {
            break;
        }
        let san = strip_move_number(token);
        if san.is_empty() {
            continue;
        }
        let mv = board.parse_san(san)?;
        board.apply_move(mv);
    }
    Ok(board)
}

/// "12.Nf3" -> "Nf3", "3..." -> ""; tokens without a numbered prefix pass through
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == token.len() || !rest.starts_with('.') {
        return token;
    }
    rest.trim_start_matches('.')
}
