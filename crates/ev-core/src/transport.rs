//! Travel mode shared by routing, movement, and the occupancy index.

/// How an evacuee moves through the road network.
///
/// Each mode has its own road graph (walkable vs drivable) and its own set
/// of zone exits, so the enum doubles as an index into per-mode arrays.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TravelMode {
    #[default]
    Walk,
    Car,
}

impl TravelMode {
    pub const ALL: [TravelMode; 2] = [TravelMode::Walk, TravelMode::Car];

    /// Position in per-mode arrays such as `[RoadNetwork; 2]`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            TravelMode::Walk => 0,
            TravelMode::Car  => 1,
        }
    }

    #[inline]
    pub fn is_vehicle(self) -> bool {
        matches!(self, TravelMode::Car)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walk => "walk",
            TravelMode::Car  => "car",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
