//! Distance-to-mate conversion.
//!
//! The tablebase reports DTM in plies, counting moves of both sides. The
//! trainer shows full moves left for the side to move: half the plies,
//! rounded up. The sign (negative = side to move is getting mated) is kept.

pub fn plies_to_moves(plies: i32) -> i32 {
    let magnitude = plies.unsigned_abs();
    let moves = (magnitude / 2 + magnitude % 2) as i32;
    if plies < 0 {
        -moves
    } else {
        moves
    }
}
