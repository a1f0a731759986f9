pub mod awards;
pub mod winners;

pub use awards as award_entity;
pub use winners as winner_entity;
