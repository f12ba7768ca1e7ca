pub use raffle::*;
pub use ticket::*;

pub mod raffle;
pub mod ticket;
