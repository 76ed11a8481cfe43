use crate::{Error, Result};

/// An implementation of a per-episode decaying value
pub trait Decay {
    /// Calculate value at episode `t`
    fn evaluate(&self, t: u32) -> f64;
}

fn validate(rate: f64, vi: f64, vf: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&vi) || !(0.0..=1.0).contains(&vf) {
        return Err(Error::hyperparameter(
            "epsilon",
            format!("start {vi} and floor {vf} must both lie in [0, 1]"),
        ));
    }
    if rate.is_nan() || vi < vf {
        return Err(Error::hyperparameter(
            "epsilon",
            format!("start {vi} must not be below floor {vf} (rate {rate})"),
        ));
    }
    Ok(())
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Result<Self> {
        validate(0.0, value, value)?;
        Ok(Self { value })
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: u32) -> f64 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Closed form of multiplying the value by `r` after every episode and flooring it at `v_f`.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    rate: f64,
    vi: f64,
    vf: f64,
}

/// Start at 1.0, shrink by 0.5% per episode, never drop below 0.05
impl Default for Geometric {
    fn default() -> Self {
        Self {
            rate: 0.995,
            vi: 1.0,
            vf: 0.05,
        }
    }
}

impl Geometric {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::hyperparameter(
                "rate",
                format!("geometric rate must lie in [0, 1], got {rate}"),
            ));
        }
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Geometric {
    fn evaluate(&self, t: u32) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t as f64)).max(vf)
    }
}
