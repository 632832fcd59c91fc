//! Pipeline and dispatcher for the `fixbot` binary.
//!
//! Each subcommand runs the same four stages in sequence: gather context,
//! request one completion, classify the reply, dispatch exactly one action.
//! The stages pass plain data; there is no shared mutable state.

pub mod dispatch;
pub mod pipeline;
