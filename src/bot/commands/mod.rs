pub mod fishing;
pub mod roster;
pub mod status;
