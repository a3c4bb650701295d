//! Turtle motion, queries, display and multiple-turtle commands.
//!
//! Motion applies every evaluated parameter to every active turtle in turn;
//! the result is the last value applied (or, for absolute moves, the
//! distance or turn reported by the last turtle).

use crate::evaluator::Evaluator;
use slogo_types::{
    Color, Command, CommandKind, DisplayOp, MultiTurtleOp, Point, QueryOp, SlogoError, Turtle,
    TurtleOp, World, MAX_PALETTE_LEN,
};

/// Point `distance` steps along the turtle's heading.
fn ahead(turtle: &Turtle, distance: f64) -> Point {
    let radians = turtle.heading.to_radians();
    Point::new(
        turtle.position.x + distance * radians.sin(),
        turtle.position.y + distance * radians.cos(),
    )
}

/// Heading (0 = north, clockwise) from `from` toward `to`.
fn bearing(from: Point, to: Point) -> Option<f64> {
    if from == to {
        return None;
    }
    Some((to.x - from.x).atan2(to.y - from.y).to_degrees())
}

/// Turn to an absolute heading and report the degrees turned.
fn turn_to(turtle: &mut Turtle, heading: f64) -> f64 {
    let before = turtle.heading;
    turtle.set_heading(heading);
    (turtle.heading - before).abs()
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// `value` as an index below `len`, when it is a whole number in range.
/// The bound is checked before the cast.
fn palette_index(value: f64, len: usize) -> Option<usize> {
    (value >= 0.0 && value.fract() == 0.0 && value < len as f64).then(|| value as usize)
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl Evaluator<'_> {
    // ══════════════════════════════════════════════════════════════════════
    // Motion and pen
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_turtle(&mut self, op: TurtleOp, params: &mut Vec<Command>) -> f64 {
        match op {
            TurtleOp::Forward => self.each_value(params, |t, v| {
                t.move_to(ahead(t, v));
            }),
            TurtleOp::Backward => self.each_value(params, |t, v| {
                t.move_to(ahead(t, -v));
            }),
            TurtleOp::Left => self.each_value(params, |t, v| t.set_heading(t.heading - v)),
            TurtleOp::Right => self.each_value(params, |t, v| t.set_heading(t.heading + v)),
            TurtleOp::SetHeading => {
                let mut turned = 0.0;
                for param in params.iter_mut() {
                    let heading = self.evaluate(param);
                    for turtle in self.world.active_turtles_mut() {
                        turned = turn_to(turtle, heading);
                    }
                }
                turned
            }
            TurtleOp::SetTowards => self.each_pair(params, |t, target| {
                bearing(t.position, target).map_or(0.0, |heading| turn_to(t, heading))
            }),
            TurtleOp::SetPosition => self.each_pair(params, |t, target| t.move_to(target)),
            TurtleOp::PenDown => self.each_active(|t| t.pen_down = true, 1.0),
            TurtleOp::PenUp => self.each_active(|t| t.pen_down = false, 0.0),
            TurtleOp::ShowTurtle => self.each_active(|t| t.visible = true, 1.0),
            TurtleOp::HideTurtle => self.each_active(|t| t.visible = false, 0.0),
            TurtleOp::Home => self.return_home(false),
            TurtleOp::ClearScreen => self.return_home(true),
        }
    }

    /// Evaluate each parameter and apply it to every active turtle. Returns
    /// the last value.
    fn each_value(&mut self, params: &mut [Command], apply: impl Fn(&mut Turtle, f64)) -> f64 {
        let mut last = 0.0;
        for param in params.iter_mut() {
            let value = self.evaluate(param);
            for turtle in self.world.active_turtles_mut() {
                apply(turtle, value);
            }
            last = value;
        }
        last
    }

    /// Consume parameters as `(x, y)` pairs; a trailing odd parameter is
    /// ignored. Returns what the last turtle reported for the last pair.
    fn each_pair(
        &mut self,
        params: &mut [Command],
        apply: impl Fn(&mut Turtle, Point) -> f64,
    ) -> f64 {
        let mut last = 0.0;
        for pair in params.chunks_exact_mut(2) {
            let x = self.evaluate(&mut pair[0]);
            let y = self.evaluate(&mut pair[1]);
            for turtle in self.world.active_turtles_mut() {
                last = apply(turtle, Point::new(x, y));
            }
        }
        last
    }

    fn each_active(&mut self, apply: impl Fn(&mut Turtle), result: f64) -> f64 {
        for turtle in self.world.active_turtles_mut() {
            apply(turtle);
        }
        result
    }

    /// Send active turtles to the origin facing north, optionally erasing
    /// their trails. Returns the distance the last turtle moved.
    fn return_home(&mut self, clear: bool) -> f64 {
        let mut distance = 0.0;
        for turtle in self.world.active_turtles_mut() {
            distance = turtle.move_to(Point::ORIGIN);
            turtle.set_heading(0.0);
            if clear {
                turtle.clear_trail();
            }
        }
        distance
    }

    // ══════════════════════════════════════════════════════════════════════
    // Queries
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_query(&mut self, op: QueryOp) -> f64 {
        let Some(turtle) = self.world.last_active() else {
            return 0.0;
        };
        match op {
            QueryOp::XCoordinate => turtle.position.x,
            QueryOp::YCoordinate => turtle.position.y,
            QueryOp::Heading => turtle.heading,
            QueryOp::IsPenDown => flag(turtle.pen_down),
            QueryOp::IsShowing => flag(turtle.visible),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Display
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_display(&mut self, op: DisplayOp, params: &mut Vec<Command>) -> f64 {
        match op {
            DisplayOp::SetBackground => self.each_color(params, |world, index| {
                world.set_background(index);
            }),
            DisplayOp::SetPenColor => self.each_color(params, |world, index| {
                for turtle in world.active_turtles_mut() {
                    turtle.pen_color = index;
                }
            }),
            DisplayOp::SetPenSize => self.each_value(params, |t, size| t.pen_size = size),
            DisplayOp::SetPalette => self.eval_set_palette(params),
            DisplayOp::GetPenColor => self
                .world
                .last_active()
                .map_or(0.0, |turtle| turtle.pen_color as f64),
        }
    }

    /// Validate each parameter as a palette index and apply it. A bad index
    /// appends a color error and makes the command return -1.
    fn each_color(
        &mut self,
        params: &mut Vec<Command>,
        apply: impl Fn(&mut World, usize),
    ) -> f64 {
        let values = self.eval_values(params);
        let mut last = 0.0;
        for value in values {
            match palette_index(value, self.world.palette_len()) {
                Some(index) => {
                    apply(&mut *self.world, index);
                    last = value;
                }
                None => {
                    params.push(Command::error(SlogoError::malformed_color(value)));
                    return -1.0;
                }
            }
        }
        last
    }

    /// `setpalette index r g b`
    fn eval_set_palette(&mut self, params: &mut Vec<Command>) -> f64 {
        if !Self::require(params, 4, "SetPalette") {
            return 0.0;
        }
        let values = self.eval_values(&mut params[..4]);
        let color = Color::rgb(channel(values[1]), channel(values[2]), channel(values[3]));
        match palette_index(values[0], MAX_PALETTE_LEN) {
            Some(index) if self.world.set_palette(index, color) => values[0],
            _ => {
                params.push(Command::error(SlogoError::malformed_color(values[0])));
                -1.0
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Multiple turtles
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_multi_turtle(&mut self, op: MultiTurtleOp, params: &mut Vec<Command>) -> f64 {
        match op {
            MultiTurtleOp::Id => self
                .world
                .active_ids()
                .last()
                .map_or(0.0, |id| f64::from(*id)),
            MultiTurtleOp::Turtles => self.world.turtle_count() as f64,
            MultiTurtleOp::Tell => {
                if !Self::require(params, 1, "Tell") {
                    return 0.0;
                }
                match self.turtle_ids(&mut params[0]) {
                    Some(ids) => {
                        let last = ids.last().copied().unwrap_or_default();
                        self.world.set_active(ids);
                        f64::from(last)
                    }
                    None => {
                        params.push(Command::error(SlogoError::malformed_turtle_list()));
                        0.0
                    }
                }
            }
            MultiTurtleOp::Ask => {
                if !Self::require(params, 2, "Ask") {
                    return 0.0;
                }
                let Some(ids) = self.turtle_ids(&mut params[0]) else {
                    params.push(Command::error(SlogoError::malformed_turtle_list()));
                    return 0.0;
                };
                let previous = self.world.active_ids().to_vec();
                self.world.set_active(ids);
                let result = self.evaluate(&mut params[1]);
                self.world.set_active(previous);
                result
            }
        }
    }

    /// Evaluate a `[ ids ]` list into turtle ids. Every id must be a
    /// positive whole number and the list must not be empty.
    fn turtle_ids(&mut self, list: &mut Command) -> Option<Vec<u32>> {
        if list.kind != CommandKind::ListBody || list.params.is_empty() {
            return None;
        }
        let values = self.eval_values(&mut list.params);
        values
            .into_iter()
            .map(|v| (v >= 1.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX)).then_some(v as u32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ahead_follows_compass_heading() {
        let mut turtle = Turtle::new(1);
        let north = ahead(&turtle, 10.0);
        assert!((north.x).abs() < 1e-9 && (north.y - 10.0).abs() < 1e-9);

        turtle.set_heading(90.0);
        let east = ahead(&turtle, 10.0);
        assert!((east.x - 10.0).abs() < 1e-9 && east.y.abs() < 1e-9);
    }

    #[test]
    fn test_bearing() {
        let origin = Point::ORIGIN;
        assert_eq!(bearing(origin, origin), None);
        let east = bearing(origin, Point::new(5.0, 0.0)).unwrap();
        assert!((east - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_palette_index_bounds() {
        assert_eq!(palette_index(0.0, 8), Some(0));
        assert_eq!(palette_index(7.0, 8), Some(7));
        assert_eq!(palette_index(8.0, 8), None);
        assert_eq!(palette_index(-1.0, 8), None);
        assert_eq!(palette_index(1.5, 8), None);
        assert_eq!(palette_index(1e20, MAX_PALETTE_LEN), None);
        assert_eq!(palette_index(f64::INFINITY, MAX_PALETTE_LEN), None);
        assert_eq!(palette_index(f64::NAN, MAX_PALETTE_LEN), None);
    }

    #[test]
    fn test_channel_clamps() {
        assert_eq!(channel(300.0), 255);
        assert_eq!(channel(-4.0), 0);
        assert_eq!(channel(127.6), 128);
    }
}
