//! Tree builder: flat classified stream → forest of parameterized roots.
//!
//! The builder consumes its input left to right. Every command binds
//! exactly `arity` subtrees, except for the bracket forms:
//!
//! - `[ ... ]` collects every subtree up to the matching `]` into a list body
//! - `( head ... )` makes `head` accumulate every subtree up to the matching
//!   `)`, which is what makes `( sum 1 2 3 4 )` variadic
//! - a user-procedure call binds as many arguments as its stored formals
//!
//! Shortages never index past the end of the stream; they are recorded as
//! error nodes in the tree.

use slogo_types::{Command, CommandKind, SlogoError};
use std::collections::VecDeque;

/// Deepest a built tree may nest. A command reached below this depth
/// becomes an error leaf instead of binding operands.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Build a forest from a classified command sequence.
pub fn build(commands: Vec<Command>) -> Vec<Command> {
    TreeBuilder::new(commands).build_forest()
}

/// Recursive-descent tree builder over a pending command queue.
pub struct TreeBuilder {
    /// Commands not yet bound into a tree.
    pending: VecDeque<Command>,
    /// Nesting depth of the command being built.
    depth: usize,
}

impl TreeBuilder {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            pending: commands.into(),
            depth: 0,
        }
    }

    // ── Cursor ───────────────────────────────────────────────────────────────

    fn peek_kind(&self) -> Option<&CommandKind> {
        self.pending.front().map(|c| &c.kind)
    }

    fn advance(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    /// Whether the next pending command closes a bracket.
    fn at_close(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(CommandKind::ListEnd | CommandKind::GroupEnd)
        )
    }

    /// Consume the next command if it has the given kind.
    fn eat(&mut self, kind: &CommandKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Number of commands still waiting to be bound.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    // ── Building ─────────────────────────────────────────────────────────────

    /// Build one root per call until the queue is empty.
    pub fn build_forest(mut self) -> Vec<Command> {
        let mut roots = Vec::new();
        while let Some(root) = self.build_next() {
            roots.push(root);
        }
        roots
    }

    /// Build the next root, or `None` once every command is bound.
    pub fn build_next(&mut self) -> Option<Command> {
        let command = self.advance()?;
        let root = self.build(command);
        tracing::trace!(root = %root, "built root");
        Some(root)
    }

    /// Bind `command`'s parameters from the pending queue.
    pub fn build(&mut self, command: Command) -> Command {
        if self.depth >= MAX_NESTING_DEPTH {
            tracing::trace!(command = command.kind.name(), "nesting too deep");
            return Command::error(SlogoError::nesting_too_deep(MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        let built = self.build_nested(command);
        self.depth -= 1;
        built
    }

    fn build_nested(&mut self, command: Command) -> Command {
        match command.kind {
            CommandKind::ListStart => self.build_list(),
            CommandKind::GroupStart => self.build_group(),
            CommandKind::UserCommand { .. } => self.build_user_command(command),
            _ if command.arity() == 0 => command,
            _ => self.build_operator(command),
        }
    }

    /// The next operand subtree, or `None` when the stream ends or a close
    /// marker is next.
    fn build_operand(&mut self) -> Option<Command> {
        if self.at_close() {
            return None;
        }
        let next = self.advance()?;
        Some(self.build(next))
    }

    fn build_operator(&mut self, mut command: Command) -> Command {
        let arity = command.arity();
        if self.remaining() < arity {
            tracing::trace!(command = command.kind.name(), arity, "not enough parameters");
            return Command::error(SlogoError::not_enough_parameters(command.kind.name()));
        }

        for _ in 0..arity {
            match self.build_operand() {
                Some(param) => command.push_param(param),
                None => {
                    let err = SlogoError::not_enough_parameters(command.kind.name());
                    command.push_error(err);
                }
            }
        }
        command
    }

    fn build_user_command(&mut self, mut call: Command) -> Command {
        let wanted = formal_count(&call);
        if self.remaining() < wanted {
            return Command::error(SlogoError::not_enough_parameters(call.kind.name()));
        }

        let mut args = Command::list_body(Vec::with_capacity(wanted));
        for _ in 0..wanted {
            match self.build_operand() {
                Some(arg) => args.push_param(arg),
                None => args.push_error(SlogoError::not_enough_parameters(call.kind.name())),
            }
        }
        call.push_param(args);
        call
    }

    /// `[` already consumed: collect subtrees until the matching `]`.
    fn build_list(&mut self) -> Command {
        let mut body = Command::list_body(Vec::new());
        loop {
            if self.eat(&CommandKind::ListEnd) {
                return body;
            }
            match self.advance() {
                Some(next) => {
                    let child = self.build(next);
                    body.push_param(child);
                }
                None => return Command::error(SlogoError::missing_closing_bracket("[")),
            }
        }
    }

    /// `(` already consumed: the next command heads the group and
    /// accumulates every subtree until the matching `)`.
    fn build_group(&mut self) -> Command {
        let mut head = match self.advance() {
            Some(head) if head.kind != CommandKind::GroupEnd => head,
            _ => return Command::error(SlogoError::missing_closing_bracket("(")),
        };

        // Bracket heads are built first and then extended.
        if matches!(head.kind, CommandKind::ListStart | CommandKind::GroupStart) {
            head = self.build(head);
        }

        let mut children = Vec::new();
        loop {
            if self.eat(&CommandKind::GroupEnd) {
                break;
            }
            match self.advance() {
                Some(next) => children.push(self.build(next)),
                None => return Command::error(SlogoError::missing_closing_bracket("(")),
            }
        }

        match head.kind {
            CommandKind::UserCommand { .. } => {
                if children.len() < formal_count(&head) {
                    return Command::error(SlogoError::not_enough_parameters(head.kind.name()));
                }
                head.push_param(Command::list_body(children));
                head
            }
            CommandKind::Error(_) => {
                children.insert(0, head);
                Command::list_body(children)
            }
            _ => {
                head.params.extend(children);
                head
            }
        }
    }
}

/// Number of formals stored on a user-procedure call.
fn formal_count(call: &Command) -> usize {
    call.params.first().map_or(0, |formals| formals.params.len())
}
