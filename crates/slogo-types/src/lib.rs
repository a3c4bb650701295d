//! Shared types for SLogo.
//!
//! This crate defines the command tree, the world state evaluated against
//! it, and the structured error type embedded in trees.

mod error;
pub mod command;
pub mod turtle;
pub mod world;

pub use command::{
    Command, CommandKind, ConditionalKind, DisplayOp, LoopKind, MathOp, MultiTurtleOp, QueryOp,
    TurtleOp, COMMAND_TYPE_IDS,
};
pub use error::{ErrorCategory, ErrorCode, SlogoError};
pub use turtle::{Point, Segment, Turtle};
pub use world::{
    normalize_name, Color, Procedure, MAX_PALETTE_LEN, ProcedureTable, TurtleSnapshot, World, WorldSnapshot,
};
