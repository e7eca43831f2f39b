pub mod access;
pub mod storage;

pub use access::is_access_active;
