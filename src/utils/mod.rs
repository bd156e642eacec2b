pub mod compare;
pub mod data;
pub mod date_range;
pub mod dedup;
pub mod normalizer;
pub mod rate_limiter;
