pub mod endgames;
pub mod pool;
