//! Multi-frame transport of encoded messages.
//!
//! [`builder`] slices an [`EncodedMessage`](super::frame_codec::EncodedMessage)
//! into CAN frames on the outbound routing group; [`assembler`] rebuilds
//! inbound messages from start/middle/end frames of the inbound group.
pub mod assembler;
pub mod builder;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
