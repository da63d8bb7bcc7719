use crate::core::{Board, Turn};
use crate::player::PlayerController;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

/// Picks uniformly among the legal moves. Stands in for a careless human.
pub struct RandomAI {
    pub side: Turn,
    pub name: String,
    rng: Mutex<StdRng>,
}

impl RandomAI {
    pub fn new(side: Turn, name: &str, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandomAI {
            side,
            name: name.to_string(),
            rng: Mutex::new(rng),
        }
    }
}

impl PlayerController for RandomAI {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&self, _board: &Board, legal_moves: &[usize]) -> Option<usize> {
        let mut rng = self.rng.lock().ok()?;
        legal_moves.choose(&mut *rng).copied()
    }

    fn side(&self) -> Turn {
        self.side
    }
}
