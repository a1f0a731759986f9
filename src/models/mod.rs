pub mod award;
pub mod board;
pub mod common;
pub mod draw;
pub mod winner;

pub use award::*;
pub use board::*;
pub use common::*;
pub use draw::*;
pub use winner::*;
