//! SLogo tree-walking evaluator.
//!
//! Walks command forests built by `slogo-parser`, mutating a
//! [`slogo_types::World`] in place. Errors stay in the tree as error leaves;
//! after a forest runs, the first one in depth-first order marks the line.

mod evaluator;
mod math;
mod turtle;

pub use evaluator::{first_error, Evaluator, ForestOutcome, MAX_EVAL_DEPTH, REPCOUNT};

use slogo_types::{Command, World};

/// Evaluate a single tree with no step limit.
pub fn evaluate(command: &mut Command, world: &mut World) -> f64 {
    Evaluator::new(world).evaluate(command)
}

/// Evaluate every root of a forest in order and report the first error.
pub fn evaluate_forest(
    roots: &mut [Command],
    world: &mut World,
    step_limit: Option<u64>,
) -> ForestOutcome {
    Evaluator::new(world)
        .with_step_limit(step_limit)
        .evaluate_forest(roots)
}
