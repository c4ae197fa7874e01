//! Setup-time draws: behaviour class, response delay, car use.

use ev_agent::Behaviour;
use ev_core::AgentRng;

use crate::{BehaviorError, BehaviorResult};

/// Standard deviation of the response delay, in seconds.
pub const RESPONSE_DELAY_SD_SECS: f64 = 120.0;

/// Relative weights of the four behaviour classes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviourMix {
    pub compliant:     f64,
    pub non_compliant: f64,
    pub curious:       f64,
    pub familiar:      f64,
}

impl Default for BehaviourMix {
    fn default() -> Self {
        Self { compliant: 1.0, non_compliant: 0.0, curious: 0.0, familiar: 0.0 }
    }
}

impl BehaviourMix {
    /// Everyone behaves as `behaviour`.
    pub fn only(behaviour: Behaviour) -> Self {
        let mut mix = Self { compliant: 0.0, ..Self::default() };
        *mix.weight_mut(behaviour) = 1.0;
        mix
    }

    fn weights(&self) -> [f64; 4] {
        [self.compliant, self.non_compliant, self.curious, self.familiar]
    }

    fn weight_mut(&mut self, behaviour: Behaviour) -> &mut f64 {
        match behaviour {
            Behaviour::Compliant    => &mut self.compliant,
            Behaviour::NonCompliant => &mut self.non_compliant,
            Behaviour::Curious      => &mut self.curious,
            Behaviour::Familiar     => &mut self.familiar,
        }
    }

    /// # Errors
    ///
    /// [`BehaviorError::Config`] for a negative or non-finite weight, or if
    /// all weights are zero.
    pub fn validate(&self) -> BehaviorResult<()> {
        let w = self.weights();
        if w.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(BehaviorError::Config(format!("behaviour weights must be non-negative: {self:?}")));
        }
        if w.iter().sum::<f64>() <= 0.0 {
            return Err(BehaviorError::Config("behaviour weights sum to zero".into()));
        }
        Ok(())
    }

    /// Draw one class.  Falls back to `Compliant` for an invalid mix.
    pub fn sample(&self, rng: &mut AgentRng) -> Behaviour {
        rng.choose_weighted(&self.weights())
            .map_or(Behaviour::Compliant, |i| Behaviour::ALL[i])
    }
}

/// Response delay in seconds: `Normal(mean·60, 120)` clamped at zero, or
/// zero when no mean is configured.
pub fn response_delay_secs(mean_mins: Option<f64>, rng: &mut AgentRng) -> f64 {
    match mean_mins {
        None => 0.0,
        Some(mins) => rng.normal(mins * 60.0, RESPONSE_DELAY_SD_SECS).max(0.0),
    }
}

/// `true` with probability `car_use_pc / 100`.
pub fn draws_car(car_use_pc: f64, rng: &mut AgentRng) -> bool {
    rng.gen_bool(car_use_pc / 100.0)
}
