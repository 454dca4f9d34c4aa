pub mod zpool;
pub mod zpool_status;
