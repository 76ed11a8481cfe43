/// Returns an [`InvalidHyperparameter`](crate::Error::InvalidHyperparameter) error from the
/// enclosing function if a numerical value is not in the interval `[a,b]`
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns an error with the message "Invalid value for \`alpha\`: must be in the interval \[0, 1\], got 2".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::hyperparameter(
                stringify!($var),
                format!("must be in the interval [{}, {}], got {}", $a, $b, $var),
            ));
        }
    };
}

/// Mean of a trailing window over `values`, one entry per input value
///
/// Entries before the window is full average over what is available.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            if i >= window {
                sum -= values[i - window];
            }
            sum / (i + 1).min(window) as f64
        })
        .collect()
}
