//! FEN handling for positions exchanged with the board client and the tablebase.
//! The board client writes FENs with underscores instead of spaces
//! (`8/8/8/8/8/8/8/K1k5_w_-_-_0_1`); both forms are accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::{fen::Fen as ShakmatyFen, Color};

/// Standard initial position, used for free play.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is empty")]
    Empty,

    #[error("Invalid FEN '{fen}': {reason}")]
    Invalid { fen: String, reason: String },
}

/// A syntactically valid FEN, stored in its space-separated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fen {
    text: String,
    turn: Color,
}

impl Fen {
    pub fn parse(input: &str) -> Result<Self, FenError> {
        let text = input.trim().replace('_', " ");
        if text.is_empty() {
            return Err(FenError::Empty);
        }

        let parsed = text.parse::<ShakmatyFen>().map_err(|e| FenError::Invalid {
            fen: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            turn: parsed.as_setup().turn,
            text,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Underscore form, safe to put in a query string unescaped.
    pub fn to_query(&self) -> String {
        self.text.replace(' ', "_")
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Side to move as the board client names it.
    pub fn side_to_move(&self) -> &'static str {
        match self.turn {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    pub fn starting() -> Self {
        Self {
            text: STARTING_FEN.to_string(),
            turn: Color::White,
        }
    }
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fen {
    type Error = FenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fen> for String {
    fn from(fen: Fen) -> Self {
        fen.text
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
