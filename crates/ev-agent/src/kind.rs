//! Closed classifications attached to every evacuee.

use std::fmt;

// ── Category ──────────────────────────────────────────────────────────────────

/// Population category.  Selects the schedule template and default walking
/// speed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Child,
    WorkingAdult,
    RetiredAdult,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Child, Category::WorkingAdult, Category::RetiredAdult];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Walking speed used when a scenario does not set one, in m/s.
    pub fn default_walking_speed_mps(self) -> f64 {
        match self {
            Category::Child        => 1.1,
            Category::WorkingAdult => 1.4,
            Category::RetiredAdult => 1.2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Child        => "child",
            Category::WorkingAdult => "working_adult",
            Category::RetiredAdult => "retired_adult",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

/// How an evacuee responds to the hazard.  Fixed at creation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Behaviour {
    /// Heads for the nearest exit.
    Compliant,
    /// Ignores the evacuation order and the cordon.
    NonCompliant,
    /// Complies, but dawdles near the hazard.
    Curious,
    /// Heads home instead of for an exit.
    Familiar,
}

impl Behaviour {
    pub const ALL: [Behaviour; 4] = [
        Behaviour::Compliant,
        Behaviour::NonCompliant,
        Behaviour::Curious,
        Behaviour::Familiar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Behaviour::Compliant    => "compliant",
            Behaviour::NonCompliant => "non_compliant",
            Behaviour::Curious      => "curious",
            Behaviour::Familiar     => "familiar",
        }
    }
}

impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    /// Inside a building, or stopped with no route.
    #[default]
    Parked,
    /// Following the daily schedule, or a diversion.
    Travelling,
    /// Responding to the evacuation order.
    Evacuating,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Parked     => "parked",
            Status::Travelling => "travelling",
            Status::Evacuating => "evacuating",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── NetworkKind ───────────────────────────────────────────────────────────────

/// Which network instance a route was computed on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NetworkKind {
    #[default]
    Full,
    /// The network with the zone removed.
    Safe,
}
