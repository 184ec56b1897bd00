pub mod follow;
pub mod registry;
