pub mod espn_scoreboard;
pub mod espn_summary;
pub mod transport;
