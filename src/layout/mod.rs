/// Bitset of candidate tile indices
pub mod bitset;
/// Backtracking layout solver with bounded work and random fallback
pub mod solver;
