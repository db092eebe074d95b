pub mod copy_po;
pub mod crosswalk;
pub mod dispatch;
pub mod schema;
pub mod sync;
pub mod verify;
