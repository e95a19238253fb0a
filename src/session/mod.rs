//! Conversation sessions: pairwise, group, nested, and sequential.

pub mod group;
pub mod nested;
pub mod pair;
pub mod sequential;
pub mod summary;
pub mod transcript;

pub use group::{GroupChat, ManagerSelect, RoundRobin, SpeakerSelector};
pub use nested::{MessageFn, NestedChat};
pub use pair::{ChatOutcome, PairChat, DEFAULT_MAX_ROUNDS};
pub use sequential::{run_chat_sequence, ChatSpec, SessionSummary};
pub use summary::{summarize, SummaryMethod, REFLECTION_PROMPT};
pub use transcript::{SessionEnd, Transcript};
