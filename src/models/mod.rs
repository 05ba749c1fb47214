pub mod contestant;
pub mod race;
pub mod time;

pub use contestant::*;
pub use race::*;
pub use time::*;
