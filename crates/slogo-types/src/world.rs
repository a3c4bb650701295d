//! Mutable world state for one session.
//!
//! The world holds turtles, the active turtle list, variables, user
//! procedures, the palette and the background. It has no behavior of its
//! own beyond bookkeeping; commands in `slogo-eval` drive every change.
//!
//! Variables live in a single global map. There is no scoping: assignments
//! made inside a user procedure stay visible after it returns.

use crate::command::Command;
use crate::turtle::{Point, Segment, Turtle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Id of the turtle every world starts with.
pub const FIRST_TURTLE_ID: u32 = 1;

/// Normalize a variable or procedure name: strip a leading `:` or `"`
/// sigil and lowercase the rest.
pub fn normalize_name(raw: &str) -> String {
    raw.trim_start_matches([':', '"']).to_lowercase()
}

// ══════════════════════════════════════════════════════════════════════════════
// Colors
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Palette every world starts with, indexed from 0.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(255, 255, 255),
    Color::rgb(0, 0, 0),
    Color::rgb(255, 0, 0),
    Color::rgb(0, 128, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 255, 0),
    Color::rgb(255, 165, 0),
    Color::rgb(128, 0, 128),
];

/// Largest number of entries a palette may grow to.
pub const MAX_PALETTE_LEN: usize = 256;

// ══════════════════════════════════════════════════════════════════════════════
// Procedures
// ══════════════════════════════════════════════════════════════════════════════

/// A user-defined procedure as captured by `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    /// List body of formal parameter variables.
    pub params: Command,
    /// Instruction body, re-evaluated on every call.
    pub body: Command,
}

impl Procedure {
    pub fn new(params: Command, body: Command) -> Self {
        Self { params, body }
    }

    /// Number of arguments a call must supply.
    pub fn arity(&self) -> usize {
        self.params.params.len()
    }
}

/// User procedures keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct ProcedureTable {
    procedures: BTreeMap<String, Procedure>,
}

impl ProcedureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(&normalize_name(name))
    }

    /// Store a procedure, replacing any previous definition.
    pub fn define(&mut self, name: &str, procedure: Procedure) {
        self.procedures.insert(normalize_name(name), procedure);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// World
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct World {
    turtles: BTreeMap<u32, Turtle>,
    active: Vec<u32>,
    variables: BTreeMap<String, f64>,
    procedures: ProcedureTable,
    palette: Vec<Color>,
    background: usize,
}

impl World {
    /// Create a world with a single active turtle at home.
    pub fn new() -> Self {
        let mut turtles = BTreeMap::new();
        turtles.insert(FIRST_TURTLE_ID, Turtle::new(FIRST_TURTLE_ID));
        Self {
            turtles,
            active: vec![FIRST_TURTLE_ID],
            variables: BTreeMap::new(),
            procedures: ProcedureTable::new(),
            palette: DEFAULT_PALETTE.to_vec(),
            background: 0,
        }
    }

    // ── Turtles ──────────────────────────────────────────────────────────────

    pub fn turtle(&self, id: u32) -> Option<&Turtle> {
        self.turtles.get(&id)
    }

    pub fn turtles(&self) -> impl Iterator<Item = &Turtle> {
        self.turtles.values()
    }

    pub fn turtle_count(&self) -> usize {
        self.turtles.len()
    }

    /// Active turtle ids in the order they were activated.
    pub fn active_ids(&self) -> &[u32] {
        &self.active
    }

    /// Replace the active list, creating turtles that do not exist yet.
    pub fn set_active(&mut self, ids: Vec<u32>) {
        for id in &ids {
            self.turtles.entry(*id).or_insert_with(|| Turtle::new(*id));
        }
        self.active = ids;
    }

    /// Mutable access to every active turtle, in id order.
    pub fn active_turtles_mut(&mut self) -> impl Iterator<Item = &mut Turtle> {
        let active = &self.active;
        self.turtles
            .iter_mut()
            .filter(move |(id, _)| active.contains(*id))
            .map(|(_, turtle)| turtle)
    }

    /// The most recently activated turtle; queries report on it.
    pub fn last_active(&self) -> Option<&Turtle> {
        self.active.last().and_then(|id| self.turtles.get(id))
    }

    // ── Variables ────────────────────────────────────────────────────────────

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(&normalize_name(name)).copied()
    }

    /// Bind or rebind a global variable.
    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.variables.insert(normalize_name(name), value);
    }

    pub fn variables(&self) -> &BTreeMap<String, f64> {
        &self.variables
    }

    // ── Procedures ───────────────────────────────────────────────────────────

    pub fn procedures(&self) -> &ProcedureTable {
        &self.procedures
    }

    pub fn define_procedure(&mut self, name: &str, procedure: Procedure) {
        self.procedures.define(name, procedure);
    }

    // ── Palette & background ─────────────────────────────────────────────────

    pub fn color(&self, index: usize) -> Option<Color> {
        self.palette.get(index).copied()
    }

    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Set a palette entry. Indices past the end grow the palette, filling
    /// the gap with white. Returns `false`, leaving the palette unchanged,
    /// for an index at or beyond [`MAX_PALETTE_LEN`].
    pub fn set_palette(&mut self, index: usize, color: Color) -> bool {
        if index >= MAX_PALETTE_LEN {
            return false;
        }
        if index >= self.palette.len() {
            self.palette.resize(index + 1, DEFAULT_PALETTE[0]);
        }
        self.palette[index] = color;
        true
    }

    pub fn background(&self) -> usize {
        self.background
    }

    pub fn set_background(&mut self, index: usize) {
        self.background = index;
    }

    // ── Snapshot ─────────────────────────────────────────────────────────────

    /// Deep copy of everything the presentation layer may read.
    pub fn snapshot(&self) -> WorldSnapshot {
        let resolve = |index: usize| self.color(index).unwrap_or(DEFAULT_PALETTE[1]);
        WorldSnapshot {
            turtles: self
                .turtles
                .values()
                .map(|t| {
                    let snapshot = TurtleSnapshot {
                        id: t.id,
                        position: t.position,
                        heading: t.heading,
                        pen_down: t.pen_down,
                        visible: t.visible,
                        pen_color: resolve(t.pen_color),
                        pen_size: t.pen_size,
                        trail: t.trail.clone(),
                    };
                    (t.id, snapshot)
                })
                .collect(),
            active: self.active.clone(),
            variables: self.variables.clone(),
            procedures: self.procedures.names().map(String::from).collect(),
            background: resolve(self.background),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Snapshots
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurtleSnapshot {
    pub id: u32,
    pub position: Point,
    pub heading: f64,
    pub pen_down: bool,
    pub visible: bool,
    pub pen_color: Color,
    pub pen_size: f64,
    pub trail: Vec<Segment>,
}

/// Immutable copy of a [`World`] handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub turtles: BTreeMap<u32, TurtleSnapshot>,
    pub active: Vec<u32>,
    pub variables: BTreeMap<String, f64>,
    pub procedures: Vec<String>,
    pub background: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(":Size"), "size");
        assert_eq!(normalize_name("\"x"), "x");
        assert_eq!(normalize_name("Square"), "square");
    }

    #[test]
    fn test_new_world_has_one_active_turtle() {
        let world = World::new();
        assert_eq!(world.turtle_count(), 1);
        assert_eq!(world.active_ids(), &[FIRST_TURTLE_ID]);
        assert_eq!(world.last_active().map(|t| t.id), Some(FIRST_TURTLE_ID));
    }

    #[test]
    fn test_variables_are_case_normalized() {
        let mut world = World::new();
        world.set_variable(":X", 5.0);
        assert_eq!(world.variable("x"), Some(5.0));
        world.set_variable("\"x", 10.0);
        assert_eq!(world.variable(":x"), Some(10.0));
        assert_eq!(world.variables().len(), 1);
    }

    #[test]
    fn test_set_active_creates_turtles() {
        let mut world = World::new();
        world.set_active(vec![2, 3]);
        assert_eq!(world.turtle_count(), 3);
        assert_eq!(world.active_turtles_mut().count(), 2);
        assert_eq!(world.last_active().map(|t| t.id), Some(3));
    }

    #[test]
    fn test_palette_grows() {
        let mut world = World::new();
        assert!(world.set_palette(10, Color::rgb(1, 2, 3)));
        assert_eq!(world.palette_len(), 11);
        assert_eq!(world.color(10), Some(Color::rgb(1, 2, 3)));
        assert_eq!(world.color(9), Some(DEFAULT_PALETTE[0]));
    }

    #[test]
    fn test_palette_size_is_capped() {
        let mut world = World::new();
        assert!(!world.set_palette(MAX_PALETTE_LEN, Color::rgb(1, 2, 3)));
        assert!(!world.set_palette(usize::MAX, Color::rgb(1, 2, 3)));
        assert_eq!(world.palette_len(), DEFAULT_PALETTE.len());
        assert!(world.set_palette(MAX_PALETTE_LEN - 1, Color::rgb(1, 2, 3)));
        assert_eq!(world.palette_len(), MAX_PALETTE_LEN);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut world = World::new();
        world.set_variable("x", 1.0);
        let snapshot = world.snapshot();
        world.set_variable("x", 2.0);
        world.set_active(vec![4]);
        assert_eq!(snapshot.variables.get("x"), Some(&1.0));
        assert_eq!(snapshot.turtles.len(), 1);
        assert_eq!(snapshot.background, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut world = World::new();
        world.set_variable("size", 50.0);
        world.define_procedure(
            "square",
            Procedure::new(Command::list_body(vec![]), Command::list_body(vec![])),
        );
        let snapshot = world.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.procedures, vec!["square".to_string()]);
    }
}
