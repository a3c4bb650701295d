//! Arithmetic and boolean operators.
//!
//! Operators fold over every bound child, so a grouped form such as
//! `( sum 1 2 3 4 )` takes any number of operands. Trigonometry works in
//! degrees.

use crate::evaluator::Evaluator;
use slogo_types::{Command, MathOp, SlogoError};

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Left fold over `values`, or 0 when there are none.
fn fold_left(values: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    match values.split_first() {
        Some((first, rest)) => rest.iter().fold(*first, |acc, v| f(acc, *v)),
        None => 0.0,
    }
}

/// Apply `f` to each value and return the last result.
fn map_last(values: &[f64], f: impl Fn(f64) -> f64) -> f64 {
    values.iter().map(|v| f(*v)).last().unwrap_or(0.0)
}

/// Whether `holds` is true for every adjacent pair.
fn chain(values: &[f64], holds: impl Fn(f64, f64) -> bool) -> f64 {
    truth(values.windows(2).all(|pair| holds(pair[0], pair[1])))
}

impl Evaluator<'_> {
    pub(crate) fn eval_math(&mut self, op: MathOp, params: &mut Vec<Command>) -> f64 {
        let values = self.eval_values(params);

        match op {
            MathOp::Sum => values.iter().sum(),
            MathOp::Difference => fold_left(&values, |a, b| a - b),
            MathOp::Product => fold_left(&values, |a, b| a * b),
            MathOp::Power => fold_left(&values, f64::powf),
            MathOp::Quotient | MathOp::Remainder => {
                if values.iter().skip(1).any(|v| *v == 0.0) {
                    params.push(Command::error(SlogoError::division_by_zero()));
                    return 0.0;
                }
                if op == MathOp::Quotient {
                    fold_left(&values, |a, b| a / b)
                } else {
                    fold_left(&values, |a, b| a % b)
                }
            }

            MathOp::Minus => map_last(&values, |v| -v),
            MathOp::Sine => map_last(&values, |v| v.to_radians().sin()),
            MathOp::Cosine => map_last(&values, |v| v.to_radians().cos()),
            MathOp::Tangent => map_last(&values, |v| v.to_radians().tan()),
            MathOp::ArcTangent => map_last(&values, |v| v.atan().to_degrees()),
            MathOp::NaturalLog => map_last(&values, f64::ln),
            MathOp::Not => map_last(&values, |v| truth(v == 0.0)),
            MathOp::Pi => std::f64::consts::PI,

            MathOp::LessThan => chain(&values, |a, b| a < b),
            MathOp::GreaterThan => chain(&values, |a, b| a > b),
            MathOp::Equal => chain(&values, |a, b| a == b),
            MathOp::NotEqual => chain(&values, |a, b| a != b),
            MathOp::And => truth(values.iter().all(|v| *v != 0.0)),
            MathOp::Or => truth(values.iter().any(|v| *v != 0.0)),
        }
    }
}
