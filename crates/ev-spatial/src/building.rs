//! Building footprints.
//!
//! Footprints are `geo` polygons in projected metres.  Each building caches
//! its area (the weight for area-proportional selection), centroid, and one
//! entrance node per travel mode.

use geo::{Area, BoundingRect, Centroid, Contains, LineString, Polygon};
use log::warn;

use ev_core::{AgentRng, BuildingId, NodeId, Point, TravelMode};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

/// Rejection-sampling attempts before falling back to the buffered envelope.
const MAX_SAMPLE_ATTEMPTS: usize = 64;
/// Envelope buffer used for footprints too small to sample.
const SAMPLE_BUFFER_M: f64 = 1e-6;

// ── BuildingKind ──────────────────────────────────────────────────────────────

/// Building category.  Doubles as the "place" of a schedule activity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuildingKind {
    Home,
    Work,
    School,
    Supermarket,
    Shop,
    Recreation,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 6] = [
        BuildingKind::Home,
        BuildingKind::Work,
        BuildingKind::School,
        BuildingKind::Supermarket,
        BuildingKind::Shop,
        BuildingKind::Recreation,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Kinds resolved to a fresh building on every visit rather than a
    /// building fixed per agent.
    pub fn is_generic(self) -> bool {
        match self {
            BuildingKind::Home | BuildingKind::Work | BuildingKind::School => false,
            BuildingKind::Supermarket | BuildingKind::Shop | BuildingKind::Recreation => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildingKind::Home        => "home",
            BuildingKind::Work        => "work",
            BuildingKind::School      => "school",
            BuildingKind::Supermarket => "supermarket",
            BuildingKind::Shop        => "shop",
            BuildingKind::Recreation  => "recreation",
        }
    }

    /// Kind named by the first word of an activity label: `"home 2"` is a
    /// `Home`, `"supermarket"` a `Supermarket`.
    pub fn from_label(label: &str) -> Option<Self> {
        let head = label.split_whitespace().next()?;
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(head))
    }
}

impl std::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Building {
    pub id:        BuildingId,
    pub kind:      BuildingKind,
    pub footprint: Polygon<f64>,
    pub centroid:  Point,
    pub area_m2:   f64,
    /// Nearest node to the centroid, per travel mode.
    entrance:      [NodeId; 2],
}

impl Building {
    /// Build from an exterior ring.  The ring is closed automatically.
    ///
    /// # Errors
    ///
    /// [`SpatialError::DegenerateFootprint`] for an empty ring.
    pub fn new(id: BuildingId, kind: BuildingKind, outline: &[Point]) -> SpatialResult<Self> {
        if outline.is_empty() {
            return Err(SpatialError::DegenerateFootprint(id));
        }
        let ring: LineString<f64> = outline.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>().into();
        let footprint = Polygon::new(ring, vec![]);
        let area_m2 = footprint.unsigned_area();
        let centroid = footprint
            .centroid()
            .map(|c| Point::new(c.x(), c.y()))
            .unwrap_or_else(|| mean_point(outline));
        Ok(Self { id, kind, footprint, centroid, area_m2, entrance: [NodeId::INVALID; 2] })
    }

    /// Axis-aligned rectangular footprint, handy for synthetic scenarios.
    pub fn rectangle(id: BuildingId, kind: BuildingKind, min: Point, max: Point) -> SpatialResult<Self> {
        let outline = [
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ];
        Self::new(id, kind, &outline)
    }

    /// Snap the centroid to each mode's network.  `networks` is indexed by
    /// [`TravelMode::index`].
    pub fn snap_entrances(&mut self, networks: [&RoadNetwork; 2]) {
        for mode in TravelMode::ALL {
            self.entrance[mode.index()] = networks[mode.index()]
                .nearest_node(self.centroid)
                .unwrap_or(NodeId::INVALID);
        }
    }

    #[inline]
    pub fn entrance(&self, mode: TravelMode) -> NodeId {
        self.entrance[mode.index()]
    }

    /// Uniform random point inside the footprint.
    ///
    /// Slivers that rejection sampling cannot hit are sampled from their
    /// envelope buffered by a micrometre instead.
    pub fn random_point(&self, rng: &mut AgentRng) -> Point {
        let Some(rect) = self.footprint.bounding_rect() else {
            return self.centroid;
        };
        let (min, max) = (rect.min(), rect.max());

        if self.area_m2 > 0.0 {
            for _ in 0..MAX_SAMPLE_ATTEMPTS {
                let x = rng.gen_range(min.x..=max.x);
                let y = rng.gen_range(min.y..=max.y);
                if self.footprint.contains(&geo::Point::new(x, y)) {
                    return Point::new(x, y);
                }
            }
        }

        warn!("{}: footprint too small to sample, using buffered envelope", self.id);
        Point::new(
            rng.gen_range((min.x - SAMPLE_BUFFER_M)..=(max.x + SAMPLE_BUFFER_M)),
            rng.gen_range((min.y - SAMPLE_BUFFER_M)..=(max.y + SAMPLE_BUFFER_M)),
        )
    }
}

fn mean_point(points: &[Point]) -> Point {
    let n = points.len().max(1) as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}
