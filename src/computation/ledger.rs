//! ledger.rs
//! Value types flowing through an evaluation: the input binding and the
//! forward-mode (value, gradient) pair.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::ops::{Add, Mul};

/// Inputs to a graph's eval function: a mapping from variable name to value.
pub type Inputs = HashMap<String, f64>;

/// Partial derivatives ordered by `VariableOrder`.
///
/// Small variable counts stay inline: no heap allocation per node.
pub type Gradient = SmallVec<[f64; 8]>;

/// The atomic unit of forward-mode differentiation: a value together with its
/// gradient with respect to every input variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Dual {
    pub value: f64,
    pub gradient: Gradient,
}

impl Dual {
    /// A constant: zero gradient of length `width`.
    pub fn constant(value: f64, width: usize) -> Self {
        Self { value, gradient: SmallVec::from_elem(0.0, width) }
    }

    /// A variable: one-hot gradient with `1.0` at `slot`.
    pub fn variable(value: f64, width: usize, slot: usize) -> Self {
        let mut dual = Self::constant(value, width);
        dual.gradient[slot] = 1.0;
        dual
    }

    pub fn into_parts(self) -> (f64, Vec<f64>) {
        (self.value, self.gradient.into_vec())
    }
}

/// Sum rule: `d(a + b) = da + db`.
impl Add for Dual {
    type Output = Dual;

    fn add(mut self, rhs: Dual) -> Dual {
        debug_assert_eq!(self.gradient.len(), rhs.gradient.len());
        self.value += rhs.value;
        for (l, r) in self.gradient.iter_mut().zip(rhs.gradient.iter()) {
            *l += *r;
        }
        self
    }
}

/// Product rule: `d(a * b) = b * da + a * db`.
impl Mul for Dual {
    type Output = Dual;

    fn mul(mut self, rhs: Dual) -> Dual {
        debug_assert_eq!(self.gradient.len(), rhs.gradient.len());
        let (a, b) = (self.value, rhs.value);
        self.value = a * b;
        for (l, r) in self.gradient.iter_mut().zip(rhs.gradient.iter()) {
            *l = b * *l + a * *r;
        }
        self
    }
}
