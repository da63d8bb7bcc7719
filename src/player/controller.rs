use crate::core::{Board, Turn};

/// 着手を選ぶ側の trait
pub trait PlayerController {
    fn choose_move(&self, board: &Board, legal_moves: &[usize]) -> Option<usize>;
    fn name(&self) -> &str;
    /// Which mark this controller places.
    fn side(&self) -> Turn;
}
