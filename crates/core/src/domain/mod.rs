pub mod distance;
pub mod hotel;
pub mod search;
