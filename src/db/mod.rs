pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod store;

pub use store::RecordStore;
