pub mod acquisition;
pub mod config;
pub mod history;
pub mod parse;
pub mod record;
pub mod session;
pub mod sink;
pub mod source;

pub use acquisition::PipelineError;
pub use config::Config;
pub use history::{BoundedHistory, Snapshot};
pub use record::Record;
pub use session::{SessionError, SessionState, StreamSession};
pub use sink::RecordSink;
pub use source::{ChannelSource, LineSource, ReaderSource};
