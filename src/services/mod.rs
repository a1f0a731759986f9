pub mod award_service;
pub mod board_service;
pub mod draw_service;
pub mod winner_service;

pub use award_service::*;
pub use board_service::*;
pub use draw_service::*;
pub use winner_service::*;
