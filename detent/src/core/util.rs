use ahash::RandomState;
use std::collections::HashMap as StdHashMap;

pub type HashMap<K, V> = StdHashMap<K, V, RandomState>;

/// `ternary!(cond, true_case, false_case)`
#[macro_export]
macro_rules! ternary {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition { $_true } else { $_false }
    };
}

/// Pushes `value` away from zero so that its magnitude is at least `min`,
/// keeping its sign. Zero is treated as positive.
pub fn min_magnitude(value: f64, min: f64) -> f64 {
    if value.abs() >= min {
        value
    } else {
        ternary!(value < 0.0, -min, min)
    }
}

/// Returns true when `a` and `b` differ by more than `tolerance`
pub fn differs_by_more_than(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() > tolerance
}
