mod crosswalk;

pub use crosswalk::CrosswalkCommands;
