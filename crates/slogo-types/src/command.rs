//! Command tree node types.
//!
//! A [`Command`] pairs a [`CommandKind`] with its bound parameters. The
//! classifier produces unparameterized commands, the tree builder fills in
//! `params`, and the evaluator walks the result.

use crate::SlogoError;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Operator families
// ══════════════════════════════════════════════════════════════════════════════

/// Turtle commands that move, turn or restyle every active turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurtleOp {
    Forward,
    Backward,
    Left,
    Right,
    SetHeading,
    SetTowards,
    SetPosition,
    PenDown,
    PenUp,
    ShowTurtle,
    HideTurtle,
    Home,
    ClearScreen,
}

/// Read-only questions about the last active turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOp {
    XCoordinate,
    YCoordinate,
    Heading,
    IsPenDown,
    IsShowing,
}

/// Arithmetic and boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathOp {
    Sum,
    Difference,
    Product,
    Quotient,
    Remainder,
    Minus,
    Power,
    Sine,
    Cosine,
    Tangent,
    ArcTangent,
    NaturalLog,
    Pi,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    And,
    Or,
    Not,
}

/// Background, pen and palette commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayOp {
    SetBackground,
    SetPenColor,
    SetPenSize,
    SetPalette,
    GetPenColor,
}

/// Commands that choose or inspect the set of active turtles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiTurtleOp {
    Id,
    Turtles,
    Tell,
    Ask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalKind {
    If,
    IfElse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    For,
    Repeat,
    DoTimes,
}

// ══════════════════════════════════════════════════════════════════════════════
// CommandKind
// ══════════════════════════════════════════════════════════════════════════════

/// Every node variant in a command tree.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    /// Numeric literal: `50`, `-2.5`
    Constant(f64),
    /// Variable reference, name normalized: `:size` → `size`
    Variable(String),
    Math(MathOp),
    Turtle(TurtleOp),
    Query(QueryOp),
    Display(DisplayOp),
    MultiTurtle(MultiTurtleOp),
    Conditional(ConditionalKind),
    Loop(LoopKind),
    /// `make :name value`
    MakeVariable,
    /// `to name [ :params ] [ body ]`
    MakeUserInstruction { name: String },
    /// Invocation of a procedure defined with `to`.
    UserCommand { name: String },
    /// `[`
    ListStart,
    /// `]`
    ListEnd,
    /// `(`
    GroupStart,
    /// `)`
    GroupEnd,
    /// Variable-arity container built from a list literal or argument bundle.
    ListBody,
    /// Embedded error marker; evaluates to 0.
    Error(SlogoError),
}

/// Every command-type identifier the registry can instantiate.
///
/// The translation table maps symbolic names onto these strings.
pub const COMMAND_TYPE_IDS: &[&str] = &[
    "math.Constant",
    "control.Variable",
    "control.group.ListStart",
    "control.group.ListEnd",
    "control.group.GroupStart",
    "control.group.GroupEnd",
    "turtle.Forward",
    "turtle.Backward",
    "turtle.Left",
    "turtle.Right",
    "turtle.SetHeading",
    "turtle.SetTowards",
    "turtle.SetPosition",
    "turtle.PenDown",
    "turtle.PenUp",
    "turtle.ShowTurtle",
    "turtle.HideTurtle",
    "turtle.Home",
    "turtle.ClearScreen",
    "turtle.query.XCoordinate",
    "turtle.query.YCoordinate",
    "turtle.query.Heading",
    "turtle.query.IsPenDown",
    "turtle.query.IsShowing",
    "math.Sum",
    "math.Difference",
    "math.Product",
    "math.Quotient",
    "math.Remainder",
    "math.Minus",
    "math.Power",
    "math.Sine",
    "math.Cosine",
    "math.Tangent",
    "math.ArcTangent",
    "math.NaturalLog",
    "math.Pi",
    "math.boolean.LessThan",
    "math.boolean.GreaterThan",
    "math.boolean.Equal",
    "math.boolean.NotEqual",
    "math.boolean.And",
    "math.boolean.Or",
    "math.boolean.Not",
    "display.SetBackground",
    "display.SetPenColor",
    "display.SetPenSize",
    "display.SetPalette",
    "display.GetPenColor",
    "multiple.Id",
    "multiple.Turtles",
    "multiple.Tell",
    "multiple.Ask",
    "control.If",
    "control.IfElse",
    "control.For",
    "control.Repeat",
    "control.DoTimes",
    "control.MakeVariable",
    "control.MakeUserInstruction",
];

impl CommandKind {
    /// Instantiate a fresh command kind from its command-type identifier.
    ///
    /// Payload-carrying kinds start empty; the classifier fills them in.
    pub fn from_type_id(id: &str) -> Option<Self> {
        use CommandKind as K;
        let kind = match id {
            "math.Constant" => K::Constant(0.0),
            "control.Variable" => K::Variable(String::new()),
            "control.group.ListStart" => K::ListStart,
            "control.group.ListEnd" => K::ListEnd,
            "control.group.GroupStart" => K::GroupStart,
            "control.group.GroupEnd" => K::GroupEnd,
            "turtle.Forward" => K::Turtle(TurtleOp::Forward),
            "turtle.Backward" => K::Turtle(TurtleOp::Backward),
            "turtle.Left" => K::Turtle(TurtleOp::Left),
            "turtle.Right" => K::Turtle(TurtleOp::Right),
            "turtle.SetHeading" => K::Turtle(TurtleOp::SetHeading),
            "turtle.SetTowards" => K::Turtle(TurtleOp::SetTowards),
            "turtle.SetPosition" => K::Turtle(TurtleOp::SetPosition),
            "turtle.PenDown" => K::Turtle(TurtleOp::PenDown),
            "turtle.PenUp" => K::Turtle(TurtleOp::PenUp),
            "turtle.ShowTurtle" => K::Turtle(TurtleOp::ShowTurtle),
            "turtle.HideTurtle" => K::Turtle(TurtleOp::HideTurtle),
            "turtle.Home" => K::Turtle(TurtleOp::Home),
            "turtle.ClearScreen" => K::Turtle(TurtleOp::ClearScreen),
            "turtle.query.XCoordinate" => K::Query(QueryOp::XCoordinate),
            "turtle.query.YCoordinate" => K::Query(QueryOp::YCoordinate),
            "turtle.query.Heading" => K::Query(QueryOp::Heading),
            "turtle.query.IsPenDown" => K::Query(QueryOp::IsPenDown),
            "turtle.query.IsShowing" => K::Query(QueryOp::IsShowing),
            "math.Sum" => K::Math(MathOp::Sum),
            "math.Difference" => K::Math(MathOp::Difference),
            "math.Product" => K::Math(MathOp::Product),
            "math.Quotient" => K::Math(MathOp::Quotient),
            "math.Remainder" => K::Math(MathOp::Remainder),
            "math.Minus" => K::Math(MathOp::Minus),
            "math.Power" => K::Math(MathOp::Power),
            "math.Sine" => K::Math(MathOp::Sine),
            "math.Cosine" => K::Math(MathOp::Cosine),
            "math.Tangent" => K::Math(MathOp::Tangent),
            "math.ArcTangent" => K::Math(MathOp::ArcTangent),
            "math.NaturalLog" => K::Math(MathOp::NaturalLog),
            "math.Pi" => K::Math(MathOp::Pi),
            "math.boolean.LessThan" => K::Math(MathOp::LessThan),
            "math.boolean.GreaterThan" => K::Math(MathOp::GreaterThan),
            "math.boolean.Equal" => K::Math(MathOp::Equal),
            "math.boolean.NotEqual" => K::Math(MathOp::NotEqual),
            "math.boolean.And" => K::Math(MathOp::And),
            "math.boolean.Or" => K::Math(MathOp::Or),
            "math.boolean.Not" => K::Math(MathOp::Not),
            "display.SetBackground" => K::Display(DisplayOp::SetBackground),
            "display.SetPenColor" => K::Display(DisplayOp::SetPenColor),
            "display.SetPenSize" => K::Display(DisplayOp::SetPenSize),
            "display.SetPalette" => K::Display(DisplayOp::SetPalette),
            "display.GetPenColor" => K::Display(DisplayOp::GetPenColor),
            "multiple.Id" => K::MultiTurtle(MultiTurtleOp::Id),
            "multiple.Turtles" => K::MultiTurtle(MultiTurtleOp::Turtles),
            "multiple.Tell" => K::MultiTurtle(MultiTurtleOp::Tell),
            "multiple.Ask" => K::MultiTurtle(MultiTurtleOp::Ask),
            "control.If" => K::Conditional(ConditionalKind::If),
            "control.IfElse" => K::Conditional(ConditionalKind::IfElse),
            "control.For" => K::Loop(LoopKind::For),
            "control.Repeat" => K::Loop(LoopKind::Repeat),
            "control.DoTimes" => K::Loop(LoopKind::DoTimes),
            "control.MakeVariable" => K::MakeVariable,
            "control.MakeUserInstruction" => K::MakeUserInstruction {
                name: String::new(),
            },
            _ => return None,
        };
        Some(kind)
    }

    /// Number of child subtrees the tree builder must bind.
    ///
    /// Bracket openers report a nominal arity of 1 so the builder does not
    /// treat them as leaves.
    pub fn arity(&self) -> usize {
        use CommandKind as K;
        match self {
            K::Constant(_) | K::Variable(_) | K::ListEnd | K::GroupEnd => 0,
            K::ListBody | K::Error(_) => 0,
            K::ListStart | K::GroupStart => 1,
            K::UserCommand { .. } => 3,
            K::MakeUserInstruction { .. } | K::MakeVariable => 2,
            K::Conditional(ConditionalKind::If) => 2,
            K::Conditional(ConditionalKind::IfElse) => 3,
            K::Loop(_) => 2,
            K::Query(_) => 0,
            K::Turtle(op) => match op {
                TurtleOp::Forward
                | TurtleOp::Backward
                | TurtleOp::Left
                | TurtleOp::Right
                | TurtleOp::SetHeading => 1,
                TurtleOp::SetTowards | TurtleOp::SetPosition => 2,
                TurtleOp::PenDown
                | TurtleOp::PenUp
                | TurtleOp::ShowTurtle
                | TurtleOp::HideTurtle
                | TurtleOp::Home
                | TurtleOp::ClearScreen => 0,
            },
            K::Math(op) => match op {
                MathOp::Pi => 0,
                MathOp::Minus
                | MathOp::Sine
                | MathOp::Cosine
                | MathOp::Tangent
                | MathOp::ArcTangent
                | MathOp::NaturalLog
                | MathOp::Not => 1,
                _ => 2,
            },
            K::Display(op) => match op {
                DisplayOp::GetPenColor => 0,
                DisplayOp::SetPalette => 4,
                _ => 1,
            },
            K::MultiTurtle(op) => match op {
                MultiTurtleOp::Id | MultiTurtleOp::Turtles => 0,
                MultiTurtleOp::Tell => 1,
                MultiTurtleOp::Ask => 2,
            },
        }
    }

    /// Short display name, used in messages and tree dumps.
    pub fn name(&self) -> &str {
        use CommandKind as K;
        match self {
            K::UserCommand { name } => name,
            K::ListBody => "ListBody",
            K::Error(_) => "Error",
            other => other
                .type_id()
                .and_then(|id| id.rsplit('.').next())
                .unwrap_or("Command"),
        }
    }

    /// The command-type identifier this kind was instantiated from.
    ///
    /// User commands, list bodies and errors are synthesized, never
    /// instantiated from the registry, so they have none.
    pub fn type_id(&self) -> Option<&'static str> {
        use CommandKind as K;
        let id = match self {
            K::Constant(_) => "math.Constant",
            K::Variable(_) => "control.Variable",
            K::ListStart => "control.group.ListStart",
            K::ListEnd => "control.group.ListEnd",
            K::GroupStart => "control.group.GroupStart",
            K::GroupEnd => "control.group.GroupEnd",
            K::Turtle(op) => match op {
                TurtleOp::Forward => "turtle.Forward",
                TurtleOp::Backward => "turtle.Backward",
                TurtleOp::Left => "turtle.Left",
                TurtleOp::Right => "turtle.Right",
                TurtleOp::SetHeading => "turtle.SetHeading",
                TurtleOp::SetTowards => "turtle.SetTowards",
                TurtleOp::SetPosition => "turtle.SetPosition",
                TurtleOp::PenDown => "turtle.PenDown",
                TurtleOp::PenUp => "turtle.PenUp",
                TurtleOp::ShowTurtle => "turtle.ShowTurtle",
                TurtleOp::HideTurtle => "turtle.HideTurtle",
                TurtleOp::Home => "turtle.Home",
                TurtleOp::ClearScreen => "turtle.ClearScreen",
            },
            K::Query(op) => match op {
                QueryOp::XCoordinate => "turtle.query.XCoordinate",
                QueryOp::YCoordinate => "turtle.query.YCoordinate",
                QueryOp::Heading => "turtle.query.Heading",
                QueryOp::IsPenDown => "turtle.query.IsPenDown",
                QueryOp::IsShowing => "turtle.query.IsShowing",
            },
            K::Math(op) => match op {
                MathOp::Sum => "math.Sum",
                MathOp::Difference => "math.Difference",
                MathOp::Product => "math.Product",
                MathOp::Quotient => "math.Quotient",
                MathOp::Remainder => "math.Remainder",
                MathOp::Minus => "math.Minus",
                MathOp::Power => "math.Power",
                MathOp::Sine => "math.Sine",
                MathOp::Cosine => "math.Cosine",
                MathOp::Tangent => "math.Tangent",
                MathOp::ArcTangent => "math.ArcTangent",
                MathOp::NaturalLog => "math.NaturalLog",
                MathOp::Pi => "math.Pi",
                MathOp::LessThan => "math.boolean.LessThan",
                MathOp::GreaterThan => "math.boolean.GreaterThan",
                MathOp::Equal => "math.boolean.Equal",
                MathOp::NotEqual => "math.boolean.NotEqual",
                MathOp::And => "math.boolean.And",
                MathOp::Or => "math.boolean.Or",
                MathOp::Not => "math.boolean.Not",
            },
            K::Display(op) => match op {
                DisplayOp::SetBackground => "display.SetBackground",
                DisplayOp::SetPenColor => "display.SetPenColor",
                DisplayOp::SetPenSize => "display.SetPenSize",
                DisplayOp::SetPalette => "display.SetPalette",
                DisplayOp::GetPenColor => "display.GetPenColor",
            },
            K::MultiTurtle(op) => match op {
                MultiTurtleOp::Id => "multiple.Id",
                MultiTurtleOp::Turtles => "multiple.Turtles",
                MultiTurtleOp::Tell => "multiple.Tell",
                MultiTurtleOp::Ask => "multiple.Ask",
            },
            K::Conditional(ConditionalKind::If) => "control.If",
            K::Conditional(ConditionalKind::IfElse) => "control.IfElse",
            K::Loop(LoopKind::For) => "control.For",
            K::Loop(LoopKind::Repeat) => "control.Repeat",
            K::Loop(LoopKind::DoTimes) => "control.DoTimes",
            K::MakeVariable => "control.MakeVariable",
            K::MakeUserInstruction { .. } => "control.MakeUserInstruction",
            K::UserCommand { .. } | K::ListBody | K::Error(_) => return None,
        };
        Some(id)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Command
// ══════════════════════════════════════════════════════════════════════════════

/// One node of a command tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    /// Bound parameters, in encounter order.
    pub params: Vec<Command>,
}

impl Command {
    /// Create an unparameterized command.
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(CommandKind::Constant(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(CommandKind::Variable(name.into()))
    }

    pub fn error(error: SlogoError) -> Self {
        Self::new(CommandKind::Error(error))
    }

    /// A list body holding the given children.
    pub fn list_body(params: Vec<Command>) -> Self {
        Self {
            kind: CommandKind::ListBody,
            params,
        }
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    pub fn push_param(&mut self, param: Command) {
        self.params.push(param);
    }

    /// Append an error marker to this node's own parameters.
    pub fn push_error(&mut self, error: SlogoError) {
        self.params.push(Command::error(error));
    }

    /// The variable name, if this node is a variable reference.
    pub fn variable_name(&self) -> Option<&str> {
        match &self.kind {
            CommandKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, CommandKind::Error(_))
    }

    /// First error marker in depth-first order, including this node.
    pub fn first_error(&self) -> Option<&SlogoError> {
        if let CommandKind::Error(err) = &self.kind {
            return Some(err);
        }
        self.params.iter().find_map(Command::first_error)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CommandKind::Constant(value) => write!(f, "{value}")?,
            CommandKind::Variable(name) => write!(f, ":{name}")?,
            CommandKind::MakeUserInstruction { name } => write!(f, "MakeUserInstruction {name}")?,
            CommandKind::Error(err) => write!(f, "Error({})", err.message)?,
            kind => write!(f, "{}", kind.name())?,
        }
        if !self.params.is_empty() {
            write!(f, "(")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
