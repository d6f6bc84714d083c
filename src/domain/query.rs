use crate::domain::Rover;

pub const DEFAULT_SOL: u32 = 1000;

/// The (rover, sol) pair that determines which photos are browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedQuery {
    pub rover: Rover,
    pub sol: u32,
}

impl FeedQuery {
    pub fn new(rover: Rover, sol: u32) -> Self {
        Self { rover, sol }
    }

    /// Parse user-typed sol text. Anything that is not a positive integer
    /// becomes sol 1.
    pub fn parse_sol(input: &str) -> u32 {
        match input.trim().parse::<u32>() {
            Ok(sol) if sol > 0 => sol,
            _ => 1,
        }
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self::new(Rover::Curiosity, DEFAULT_SOL)
    }
}
