//! # Voxbot Core
//!
//! Domain types, traits, and error definitions for the Voxbot chatbot.
//! This crate has **no I/O of its own** — it defines the domain model that
//! the channel, knowledge and session crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (microphone, speaker, console, web APIs) is
//! reached through a trait defined here. Implementations live in their
//! respective crates. This enables:
//! - Swapping channels and knowledge sources via configuration
//! - Easy testing with scripted channels and mock sources
//! - Clean dependency graph (all crates depend inward on core)

pub mod channel;
pub mod error;
pub mod reply;
pub mod source;
pub mod text;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use channel::{ChannelId, InputChannel, ListenParams, OutputChannel, SpeechParams};
pub use error::{ChannelError, Error, Result, SourceError};
pub use reply::Reply;
pub use source::{KnowledgeSource, SourceAnswer};
pub use turn::{ReplyOrigin, Turn};
