//! Structural comparison.
//!
//! Two instances are compared field by field in lock-step traversal order.
//! The ordering relations are componentwise dominance, not lexicographic:
//! `a < b` holds when every field of `a` is `<=` the matching field of `b`
//! and at least one differs. Two distinct values can therefore be unordered.

use std::cmp::Ordering;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reflect::{Reflect, ReflectRef};
use crate::registry::Registry;
use crate::visit::VisitOptions;

/// A test applied to the ordering of each pair of leaf values.
///
/// Unordered pairs (NaN, mismatched leaf types) never satisfy a predicate.
pub trait Predicate {
    fn holds(&self, ordering: Ordering) -> bool;
}

/// The six relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Predicate for CompareOp {
    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal => ordering.is_eq(),
            CompareOp::NotEqual => ordering.is_ne(),
            CompareOp::Less => ordering.is_lt(),
            CompareOp::LessEqual => ordering.is_le(),
            CompareOp::Greater => ordering.is_gt(),
            CompareOp::GreaterEqual => ordering.is_ge(),
        }
    }
}

impl<F: Fn(Ordering) -> bool> Predicate for F {
    fn holds(&self, ordering: Ordering) -> bool {
        self(ordering)
    }
}

/// Ordering of two leaf values.
///
/// Scalars of the same type order with `PartialOrd`. Enums of the same type
/// order by underlying value. Everything else is unordered.
pub fn leaf_ordering(lhs: &dyn Reflect, rhs: &dyn Reflect) -> Option<Ordering> {
    match (lhs.reflect_ref(), rhs.reflect_ref()) {
        (ReflectRef::Scalar(scalar), _) => scalar.scalar_cmp(rhs),
        (ReflectRef::Enum(left), ReflectRef::Enum(right))
            if lhs.concrete_type_id() == rhs.concrete_type_id() =>
        {
            let left = left.underlying().ok()?;
            let right = right.underlying().ok()?;
            Some(left.cmp(&right))
        }
        _ => None,
    }
}

impl Registry {
    /// Applies `predicate` to every pair of corresponding fields of two
    /// records of the same type and ANDs the results.
    pub fn compare<T: Reflect>(&self, lhs: &T, rhs: &T, predicate: impl Predicate) -> Result<bool> {
        self.compare_records(lhs, rhs, &predicate)
    }

    /// [`compare`](Self::compare) over arbitrary values: records recurse,
    /// sequences compare lengths then elements, leaves use `predicate`.
    pub fn compare_values(
        &self,
        lhs: &dyn Reflect,
        rhs: &dyn Reflect,
        predicate: &dyn Predicate,
    ) -> Result<bool> {
        match (lhs.reflect_ref(), rhs.reflect_ref()) {
            (ReflectRef::Record(_), ReflectRef::Record(_)) => {
                self.compare_records(lhs, rhs, predicate)
            }
            (ReflectRef::Sequence(left), ReflectRef::Sequence(right)) => {
                if left.len() != right.len() {
                    return Ok(false);
                }
                for index in 0..left.len() {
                    let (Some(l), Some(r)) = (left.element(index), right.element(index)) else {
                        return Ok(false);
                    };
                    if !self.compare_values(l, r, predicate)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => {
                let ordering = leaf_ordering(lhs, rhs);
                Ok(ordering.is_some_and(|o| predicate.holds(o)))
            }
        }
    }

    fn compare_records(
        &self,
        lhs: &dyn Reflect,
        rhs: &dyn Reflect,
        predicate: &dyn Predicate,
    ) -> Result<bool> {
        let flow = self.visit_pair_reflect(lhs, rhs, VisitOptions::default(), &mut |_, l, r| {
            if self.compare_values(l, r, predicate)? {
                Ok(ControlFlow::Continue(()))
            } else {
                Ok(ControlFlow::Break(()))
            }
        })?;
        Ok(flow.is_continue())
    }

    /// Every pair of corresponding fields is equal.
    pub fn equal_to<T: Reflect>(&self, lhs: &T, rhs: &T) -> Result<bool> {
        self.compare(lhs, rhs, CompareOp::Equal)
    }

    /// Strict componentwise dominance from below.
    pub fn less_than<T: Reflect>(&self, lhs: &T, rhs: &T) -> Result<bool> {
        let within = self.compare(lhs, rhs, CompareOp::LessEqual)?;
        Ok(within && !self.equal_to(lhs, rhs)?)
    }

    /// Strict componentwise dominance from above.
    pub fn greater_than<T: Reflect>(&self, lhs: &T, rhs: &T) -> Result<bool> {
        let within = self.compare(lhs, rhs, CompareOp::GreaterEqual)?;
        Ok(within && !self.equal_to(lhs, rhs)?)
    }
}
