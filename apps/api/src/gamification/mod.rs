pub mod badges;
pub mod challenges;
pub mod handlers;
pub mod leaderboard;
pub mod scoring;
pub mod streaks;
pub mod xp;
