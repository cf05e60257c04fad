pub mod client;
pub mod envelope;
pub mod session;
pub mod storage;
pub mod traits;

pub use client::{ClientError, WellnessClient};
pub use envelope::{ChatEnvelope, MessageHistory, RemoteReply};
pub use session::Session;
pub use storage::MemorySessionStorage;
pub use traits::{SessionStorage, Transport};
