pub mod format;
pub mod roster_selector;
pub mod time;
pub mod validation;
