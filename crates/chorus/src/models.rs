//! These models represent the conversation passed around by the dispatcher
//!
//! Callers send a loosely typed list of `{role, content}` turns. We immediately
//! convert that into a [`message::Conversation`] through the normalizer, and every
//! provider adapter renders its own wire format from that canonical form.
pub mod message;
pub mod role;
