pub mod context;
pub mod history;
pub mod log;
pub mod pending;
pub mod remote_view;
pub mod sync;
pub mod view_cache;

pub use context::AppContext;
pub use remote_view::RemoteView;
pub use sync::{SyncOrchestrator, SyncSnapshot, SyncState};
