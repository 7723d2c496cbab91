use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Kilometers(f64);

impl Kilometers {
    pub const ZERO: Kilometers = Kilometers(0.0);
    pub const INFINITY: Kilometers = Kilometers(f64::INFINITY);

    pub fn new(value: f64) -> Self {
        Kilometers(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Eq for Kilometers {}

impl PartialOrd for Kilometers {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kilometers {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Kilometers {
    fn from(value: f64) -> Self {
        Kilometers::new(value)
    }
}

impl Add for Kilometers {
    type Output = Kilometers;

    fn add(self, other: Kilometers) -> Kilometers {
        Kilometers(self.0 + other.0)
    }
}

impl AddAssign for Kilometers {
    fn add_assign(&mut self, other: Kilometers) {
        self.0 += other.0;
    }
}

impl Mul<f64> for Kilometers {
    type Output = Kilometers;

    fn mul(self, factor: f64) -> Kilometers {
        Kilometers(self.0 * factor)
    }
}

impl Sum for Kilometers {
    fn sum<I: Iterator<Item = Kilometers>>(iter: I) -> Kilometers {
        iter.fold(Kilometers::ZERO, |acc, x| acc + x)
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinity_is_greater_than_everything() {
        assert!(Kilometers::INFINITY > Kilometers::new(1e12));
        assert_eq!(Kilometers::INFINITY + Kilometers::new(3.0), Kilometers::INFINITY);
    }

    #[test]
    fn display_rounds_to_one_decimal() {
        assert_eq!(Kilometers::new(111.194_9).to_string(), "111.2 km");
    }

    #[test]
    fn sum() {
        let total: Kilometers = [1.5, 2.0, 0.5].into_iter().map(Kilometers::new).sum();
        assert_eq!(total, Kilometers::new(4.0));
    }
}
