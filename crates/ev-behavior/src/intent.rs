//! What an agent decides to do, as closed enums.

/// Outcome of the prepare step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Start evacuating towards `target`.  `on_foot` forces the agent out
    /// of its car first.
    Evacuate { target: EvacuationTarget, on_foot: bool },
    /// Leave the current activity for the next one in the schedule.
    Depart,
    /// Nothing to do this tick.
    Stay,
}

/// Where an evacuating agent heads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EvacuationTarget {
    /// The entrance of the agent's own home.
    Home,
    /// Whichever exit for the agent's travel mode is closest by road.
    NearestExit,
}

/// One fallback tried, in order, when an agent is diverted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiversionOption {
    /// Re-route to where the agent was already going, on the safe network.
    OriginalDestination,
    /// Go home, if home is outside the zone.
    Home,
    /// Go to a random home outside the zone.
    RandomHome,
}
