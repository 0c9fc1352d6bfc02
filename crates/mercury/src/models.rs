//! These models represent the objects passed between the relay, its callers and the upstream APIs
//!
//! There are a few related formats we need to interact with:
//! - chat messages sent from a caller to the relay
//! - openai-compatible messages, tools and stream chunks exchanged with the model API
//! - search requests and results exchanged with the search API
//! - the `data: ...` lines streamed back to the caller
//!
//! The wire formats overlap heavily, so most structs serialize directly into the upstream shape.
pub mod event;
pub mod message;
pub mod search;
pub mod tool;
