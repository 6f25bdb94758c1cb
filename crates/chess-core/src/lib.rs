pub mod dtm;
pub mod fen;

pub use fen::{Fen, FenError};
