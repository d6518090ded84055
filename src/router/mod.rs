pub mod channels;
pub mod coordinator;
pub mod messages;

pub use channels::{Badge, LoggingToolbar, PageChannel, Toolbar};
pub use coordinator::{Coordinator, RequestState};
pub use messages::{Ack, AckStatus, Message, PageSignal, Reply, Sender, TabEvent, TabStatus};
