//! Core tree walker: dispatch, control flow, variables and procedures.
//!
//! Every node evaluates to an `f64`. Failures never unwind; they are pushed
//! onto the failing node's own parameters as error leaves and the node
//! returns 0 (or -1 for bad colors), so sibling subtrees and later roots
//! still run.

use slogo_types::{
    Command, CommandKind, ConditionalKind, LoopKind, Procedure, SlogoError, World,
};

/// Variable bound to the current iteration by `repeat`.
pub const REPCOUNT: &str = "repcount";

/// Deepest the evaluator recurses. Built trees stay well below this; the
/// margin covers procedure bodies evaluated inside calls.
pub const MAX_EVAL_DEPTH: usize = 256;

/// Results of evaluating every root of one forest.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestOutcome {
    /// One value per root, in order.
    pub values: Vec<f64>,
    /// First error leaf found in a depth-first scan after evaluation.
    pub error: Option<SlogoError>,
}

impl ForestOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// First error leaf across a forest, scanning roots in order.
pub fn first_error(roots: &[Command]) -> Option<&SlogoError> {
    roots.iter().find_map(Command::first_error)
}

/// The tree-walking evaluator, borrowing one session's world.
pub struct Evaluator<'w> {
    pub(crate) world: &'w mut World,
    /// Nodes evaluated so far.
    steps: u64,
    /// Optional cap on `steps`; `None` never stops.
    step_limit: Option<u64>,
    limit_reported: bool,
    /// Current recursion depth.
    depth: usize,
    depth_reported: bool,
}

impl<'w> Evaluator<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self {
            world,
            steps: 0,
            step_limit: None,
            limit_reported: false,
            depth: 0,
            depth_reported: false,
        }
    }

    /// Stop evaluating once `limit` nodes have run.
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn world(&self) -> &World {
        &*self.world
    }

    /// Count one step. Returns `false` once the limit is exhausted.
    fn tick(&mut self) -> bool {
        self.steps += 1;
        !self.exhausted()
    }

    pub(crate) fn exhausted(&self) -> bool {
        matches!(self.step_limit, Some(limit) if self.steps > limit)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Entry points
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate every root in order, then scan for the first error.
    pub fn evaluate_forest(&mut self, roots: &mut [Command]) -> ForestOutcome {
        let values = roots.iter_mut().map(|root| self.evaluate(root)).collect();
        let error = first_error(roots).cloned();
        ForestOutcome { values, error }
    }

    /// Evaluate one node against the world.
    pub fn evaluate(&mut self, command: &mut Command) -> f64 {
        if !self.tick() {
            if let (false, Some(limit)) = (self.limit_reported, self.step_limit) {
                tracing::debug!(limit, "step limit exceeded");
                self.limit_reported = true;
                command.push_error(SlogoError::step_limit_exceeded(limit));
            }
            return 0.0;
        }
        if self.depth >= MAX_EVAL_DEPTH {
            if !self.depth_reported {
                tracing::debug!(depth = self.depth, "evaluation nested too deep");
                self.depth_reported = true;
                command.push_error(SlogoError::nesting_too_deep(MAX_EVAL_DEPTH));
            }
            return 0.0;
        }

        self.depth += 1;
        let value = self.dispatch(command);
        self.depth -= 1;
        value
    }

    fn dispatch(&mut self, command: &mut Command) -> f64 {
        let Command { kind, params } = command;
        match kind {
            CommandKind::Constant(value) => *value,
            CommandKind::Variable(name) => self.world.variable(name).unwrap_or(0.0),
            CommandKind::ListBody => self.eval_sequence(params),

            // Markers and error leaves never carry behavior of their own.
            CommandKind::ListStart
            | CommandKind::ListEnd
            | CommandKind::GroupStart
            | CommandKind::GroupEnd
            | CommandKind::Error(_) => 0.0,

            CommandKind::Math(op) => self.eval_math(*op, params),
            CommandKind::Turtle(op) => self.eval_turtle(*op, params),
            CommandKind::Query(op) => self.eval_query(*op),
            CommandKind::Display(op) => self.eval_display(*op, params),
            CommandKind::MultiTurtle(op) => self.eval_multi_turtle(*op, params),

            CommandKind::Conditional(ConditionalKind::If) => self.eval_if(params),
            CommandKind::Conditional(ConditionalKind::IfElse) => self.eval_if_else(params),
            CommandKind::Loop(LoopKind::For) => self.eval_for(params),
            CommandKind::Loop(LoopKind::Repeat) => self.eval_repeat(params),
            CommandKind::Loop(LoopKind::DoTimes) => self.eval_dotimes(params),

            CommandKind::MakeVariable => self.eval_make(params),
            CommandKind::MakeUserInstruction { name } => {
                let name = name.clone();
                self.eval_define(&name, params)
            }
            CommandKind::UserCommand { name } => {
                let name = name.clone();
                self.eval_call(&name, params)
            }
        }
    }

    /// Evaluate each node in order and return the last result.
    pub(crate) fn eval_sequence(&mut self, params: &mut [Command]) -> f64 {
        let mut result = 0.0;
        for param in params.iter_mut() {
            result = self.evaluate(param);
        }
        result
    }

    /// Evaluate each node in order and collect every result.
    pub(crate) fn eval_values(&mut self, params: &mut [Command]) -> Vec<f64> {
        params.iter_mut().map(|param| self.evaluate(param)).collect()
    }

    /// Push a "not enough parameters" leaf when fewer than `count`
    /// parameters are bound.
    pub(crate) fn require(params: &mut Vec<Command>, count: usize, command: &str) -> bool {
        if params.len() < count {
            params.push(Command::error(SlogoError::not_enough_parameters(command)));
            return false;
        }
        true
    }

    // ══════════════════════════════════════════════════════════════════════
    // Conditionals
    // ══════════════════════════════════════════════════════════════════════

    fn eval_if(&mut self, params: &mut Vec<Command>) -> f64 {
        if !Self::require(params, 2, "If") {
            return 0.0;
        }
        if self.evaluate(&mut params[0]) != 0.0 {
            self.evaluate(&mut params[1])
        } else {
            0.0
        }
    }

    fn eval_if_else(&mut self, params: &mut Vec<Command>) -> f64 {
        if !Self::require(params, 3, "IfElse") {
            return 0.0;
        }
        let branch = if self.evaluate(&mut params[0]) != 0.0 { 1 } else { 2 };
        self.evaluate(&mut params[branch])
    }

    // ══════════════════════════════════════════════════════════════════════
    // Loops
    // ══════════════════════════════════════════════════════════════════════

    /// `for [ :var start end increment ] [ body ]`
    ///
    /// Runs while the variable is at most `end`. A zero or negative
    /// increment with `start <= end` never terminates on its own.
    fn eval_for(&mut self, params: &mut Vec<Command>) -> f64 {
        let Some(var) = loop_variable(params, 4) else {
            params.push(Command::error(SlogoError::malformed_for()));
            return 0.0;
        };
        let (header, body) = params.split_at_mut(1);
        let (header, body) = (&mut header[0], &mut body[0]);

        let start = self.evaluate(&mut header.params[1]);
        let end = self.evaluate(&mut header.params[2]);
        let increment = self.evaluate(&mut header.params[3]);

        let mut result = 0.0;
        let mut i = start;
        while i <= end && !self.exhausted() {
            self.world.set_variable(&var, i);
            result = self.evaluate(body);
            i += increment;
        }
        result
    }

    /// `repeat n [ body ]`, binding `repcount` to 1..=n.
    fn eval_repeat(&mut self, params: &mut Vec<Command>) -> f64 {
        if !Self::require(params, 2, "Repeat") {
            return 0.0;
        }
        let (count, body) = params.split_at_mut(1);
        let times = self.evaluate(&mut count[0]);

        let mut result = 0.0;
        let mut i = 1.0;
        while i <= times && !self.exhausted() {
            self.world.set_variable(REPCOUNT, i);
            result = self.evaluate(&mut body[0]);
            i += 1.0;
        }
        result
    }

    /// `dotimes [ :var limit ] [ body ]`, binding the variable to 1..=limit.
    fn eval_dotimes(&mut self, params: &mut Vec<Command>) -> f64 {
        let Some(var) = loop_variable(params, 2) else {
            params.push(Command::error(SlogoError::malformed_dotimes()));
            return 0.0;
        };
        let (header, body) = params.split_at_mut(1);
        let limit = self.evaluate(&mut header[0].params[1]);

        let mut result = 0.0;
        let mut i = 1.0;
        while i <= limit && !self.exhausted() {
            self.world.set_variable(&var, i);
            result = self.evaluate(&mut body[0]);
            i += 1.0;
        }
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Variables and procedures
    // ══════════════════════════════════════════════════════════════════════

    fn eval_make(&mut self, params: &mut Vec<Command>) -> f64 {
        let name = match params.first().and_then(Command::variable_name) {
            Some(name) if params.len() >= 2 => name.to_string(),
            _ => {
                params.push(Command::error(SlogoError::malformed_make_variable()));
                return 0.0;
            }
        };
        let value = self.evaluate(&mut params[1]);
        self.world.set_variable(&name, value);
        value
    }

    /// `to name [ :formals ] [ body ]` stores the procedure and returns 1.
    /// A definition whose formals or body are malformed is not stored, so
    /// the name stays free.
    fn eval_define(&mut self, name: &str, params: &mut Vec<Command>) -> f64 {
        let well_formed = params.len() >= 2
            && params[0].kind == CommandKind::ListBody
            && params[0].params.iter().all(|p| p.variable_name().is_some())
            && params[1].kind == CommandKind::ListBody
            && params[1].first_error().is_none();
        if !well_formed {
            params.push(Command::error(SlogoError::malformed_procedure_def()));
            return 0.0;
        }

        let procedure = Procedure::new(params[0].clone(), params[1].clone());
        tracing::debug!(name, arity = procedure.arity(), "defined procedure");
        self.world.define_procedure(name, procedure);
        1.0
    }

    /// Bind formals to evaluated arguments in the global scope, then run the
    /// body. Bindings persist after the call returns.
    fn eval_call(&mut self, name: &str, params: &mut Vec<Command>) -> f64 {
        if !Self::require(params, 3, name) {
            return 0.0;
        }

        let mut malformed = false;
        {
            let (formals, rest) = params.split_at_mut(1);
            let (body, args) = rest.split_at_mut(1);
            for (formal, arg) in formals[0].params.iter().zip(args[0].params.iter_mut()) {
                match formal.variable_name() {
                    Some(var) => {
                        let value = self.evaluate(arg);
                        self.world.set_variable(var, value);
                    }
                    None => malformed = true,
                }
            }
            if !malformed {
                return self.evaluate(&mut body[0]);
            }
        }

        params.push(Command::error(SlogoError::malformed_user_command()));
        self.evaluate(&mut params[1])
    }
}

/// Loop variable of a `[ :var ... ]` header holding exactly `len` items,
/// followed by a body.
fn loop_variable(params: &[Command], len: usize) -> Option<String> {
    let header = params.first().filter(|h| h.kind == CommandKind::ListBody)?;
    if params.len() < 2 || header.params.len() != len {
        return None;
    }
    header.params[0].variable_name().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<Command>) -> Command {
        Command::list_body(items)
    }

    fn node(kind: CommandKind, params: Vec<Command>) -> Command {
        Command { kind, params }
    }

    #[test]
    fn test_loop_variable_shape() {
        let good = vec![
            list(vec![
                Command::variable("i"),
                Command::constant(1.0),
                Command::constant(2.0),
                Command::constant(1.0),
            ]),
            list(vec![]),
        ];
        assert_eq!(loop_variable(&good, 4), Some("i".to_string()));
        assert_eq!(loop_variable(&good, 2), None);

        let literal_head = vec![list(vec![Command::constant(1.0), Command::constant(3.0)]), list(vec![])];
        assert_eq!(loop_variable(&literal_head, 2), None);
    }

    #[test]
    fn test_unbound_variable_is_zero() {
        let mut world = World::new();
        let mut var = Command::variable("nothing");
        assert_eq!(Evaluator::new(&mut world).evaluate(&mut var), 0.0);
    }

    #[test]
    fn test_step_limit_stops_runaway_loop() {
        let mut world = World::new();
        // for [ :i 1 2 0 ] [ ] never terminates without a limit
        let mut root = node(
            CommandKind::Loop(LoopKind::For),
            vec![
                list(vec![
                    Command::variable("i"),
                    Command::constant(1.0),
                    Command::constant(2.0),
                    Command::constant(0.0),
                ]),
                list(vec![]),
            ],
        );
        let mut evaluator = Evaluator::new(&mut world).with_step_limit(Some(100));
        let outcome = evaluator.evaluate_forest(std::slice::from_mut(&mut root));
        assert!(evaluator.steps() > 100);
        let err = outcome.error.unwrap();
        assert_eq!(err.code, slogo_types::ErrorCode::STEP_LIMIT_EXCEEDED);
    }

    #[test]
    fn test_deep_tree_stops_at_depth_limit() {
        let mut world = World::new();
        let mut root = Command::constant(1.0);
        for _ in 0..MAX_EVAL_DEPTH + 44 {
            root = node(CommandKind::Math(slogo_types::MathOp::Minus), vec![root]);
        }
        let outcome = Evaluator::new(&mut world).evaluate_forest(std::slice::from_mut(&mut root));
        assert_eq!(outcome.values, vec![0.0]);
        assert_eq!(
            outcome.error.unwrap().code,
            slogo_types::ErrorCode::NESTING_TOO_DEEP
        );
    }

    #[test]
    fn test_tree_at_depth_limit_evaluates() {
        let mut world = World::new();
        let mut root = Command::constant(1.0);
        for _ in 0..MAX_EVAL_DEPTH - 1 {
            root = node(CommandKind::Math(slogo_types::MathOp::Minus), vec![root]);
        }
        let outcome = Evaluator::new(&mut world).evaluate_forest(std::slice::from_mut(&mut root));
        assert!(outcome.error.is_none());
        assert_eq!(outcome.values, vec![-1.0]);
    }

    #[test]
    fn test_markers_evaluate_to_zero() {
        let mut world = World::new();
        let mut evaluator = Evaluator::new(&mut world);
        for kind in [CommandKind::ListEnd, CommandKind::GroupEnd] {
            assert_eq!(evaluator.evaluate(&mut Command::new(kind)), 0.0);
        }
    }
}
