mod init;
mod run_id;
mod span;

pub use init::init_logger;
pub use run_id::RunId;
pub use span::{actor_span, run_span};
