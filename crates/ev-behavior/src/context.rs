//! Read-only simulation state passed to every behaviour decision.

use ev_core::{Point, TimeOfDay};
use ev_spatial::{EvacuationZone, Region};

/// Per-tick snapshot shared by every agent's decisions.
///
/// Built once per tick by `ev-sim`; nothing in it changes while agents are
/// being stepped.
#[derive(Clone, Copy)]
pub struct SimContext<'a> {
    pub now: TimeOfDay,

    /// Simulated seconds per tick.
    pub tick_duration_secs: u32,

    /// The declared zone, once the hazard has been triggered.
    pub zone: Option<&'a EvacuationZone>,

    /// When the hazard was triggered.  Meaningless while `zone` is `None`.
    pub hazard_started_at: TimeOfDay,
}

impl<'a> SimContext<'a> {
    /// Context before any hazard.
    pub fn calm(now: TimeOfDay, tick_duration_secs: u32) -> Self {
        Self { now, tick_duration_secs, zone: None, hazard_started_at: TimeOfDay::MIDNIGHT }
    }

    /// Context once `zone` has been declared at `started_at`.
    pub fn hazard(now: TimeOfDay, tick_duration_secs: u32, zone: &'a EvacuationZone, started_at: TimeOfDay) -> Self {
        Self { now, tick_duration_secs, zone: Some(zone), hazard_started_at: started_at }
    }

    #[inline]
    pub fn hazard_active(&self) -> bool {
        self.zone.is_some()
    }

    /// `true` if the hazard is active and `p` lies strictly inside the zone.
    #[inline]
    pub fn in_zone(&self, p: Point) -> bool {
        self.zone.is_some_and(|z| z.contains(p))
    }

    /// Seconds since the hazard was triggered; `None` before it.
    pub fn secs_since_hazard(&self) -> Option<f64> {
        self.zone.map(|_| self.now.since(self.hazard_started_at))
    }
}
