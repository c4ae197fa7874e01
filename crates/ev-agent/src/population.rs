//! Population storage: the evacuee records and their RNG streams.
//!
//! Records and RNGs live in two structs so a step function can hold
//! `&mut Evacuee` and `&mut AgentRng` for the same agent while the rest of
//! the population is borrowed elsewhere.

use ev_core::{AgentId, AgentRng};

use crate::evacuee::Evacuee;

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// One deterministic RNG per agent, indexed by `AgentId`.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// All evacuees, indexed by `AgentId`.
#[derive(Clone, Debug, Default)]
pub struct Population {
    agents: Vec<Evacuee>,
}

impl Population {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len() as u32).map(AgentId)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> &Evacuee {
        &self.agents[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> &mut Evacuee {
        &mut self.agents[id.index()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Evacuee> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Evacuee> {
        self.agents.iter_mut()
    }

    pub fn number_requiring_evacuation(&self) -> usize {
        self.agents.iter().filter(|a| a.requires_evacuation()).count()
    }

    pub fn number_evacuated(&self) -> usize {
        self.agents.iter().filter(|a| a.evacuated()).count()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Evacuee;
    type IntoIter = std::slice::Iter<'a, Evacuee>;
    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

// ── PopulationBuilder ─────────────────────────────────────────────────────────

/// Creates `count` evacuees, each from its own freshly seeded RNG.
///
/// ```
/// use ev_agent::{Behaviour, Category, Evacuee, PopulationBuilder};
/// use ev_core::{BuildingId, TravelMode};
///
/// let (population, rngs) = PopulationBuilder::new(3, 42)
///     .build_with(|id, rng| {
///         let mode = if rng.gen_bool(0.5) { TravelMode::Car } else { TravelMode::Walk };
///         Ok::<_, ()>(Evacuee::new(
///             id, Category::WorkingAdult, Behaviour::Compliant, mode, 1.4,
///             BuildingId(0), BuildingId(1), BuildingId(1), 0.0,
///         ))
///     })
///     .unwrap();
/// assert_eq!(population.len(), 3);
/// assert_eq!(rngs.len(), 3);
/// ```
pub struct PopulationBuilder {
    count: usize,
    seed:  u64,
}

impl PopulationBuilder {
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed }
    }

    /// Call `make` once per agent, in id order.  The RNG passed in is the
    /// one the agent keeps for the rest of the run.
    pub fn build_with<E, F>(self, mut make: F) -> Result<(Population, AgentRngs), E>
    where
        F: FnMut(AgentId, &mut AgentRng) -> Result<Evacuee, E>,
    {
        let mut rngs = AgentRngs::new(self.count, self.seed);
        let mut agents = Vec::with_capacity(self.count);
        for (i, rng) in rngs.inner.iter_mut().enumerate() {
            agents.push(make(AgentId(i as u32), rng)?);
        }
        Ok((Population { agents }, rngs))
    }
}
