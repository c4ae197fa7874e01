//! Synthetic grid town.
//!
//! A square grid of streets 200 m apart.  The middle row and column are
//! 30 mph main roads, everything else is a 20 mph residential street.
//! Pedestrians use every street plus a footpath along each block's
//! diagonal; drivers use the streets only.
//!
//! Blocks beside the main roads hold workplaces; four corner blocks hold a
//! school, a supermarket, a shop, and a park; the rest hold two homes each.

use ev_core::{BuildingId, NodeId, Point};
use ev_spatial::{Building, BuildingKind, RoadNetwork, RoadNetworkBuilder, RoadSpec, SpatialResult};

/// Streets per side.
pub const GRID: usize = 9;
/// Block size in metres.
pub const BLOCK_M: f64 = 200.0;

const MAIN_ROAD: &str = "30 mph";
const RESIDENTIAL: &str = "20 mph";

/// Way ids: rows from 1, columns from 101, footpaths from 1001.
fn street_way(horizontal: bool, line: usize) -> u64 {
    if horizontal { 1 + line as u64 } else { 101 + line as u64 }
}

fn is_main(line: usize) -> bool {
    line == GRID / 2
}

fn node_pos(row: usize, col: usize) -> Point {
    Point::new(col as f64 * BLOCK_M, row as f64 * BLOCK_M)
}

/// `(walk, drive)` networks.
pub fn networks() -> SpatialResult<(RoadNetwork, RoadNetwork)> {
    Ok((streets(true)?, streets(false)?))
}

fn streets(with_footpaths: bool) -> SpatialResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::with_capacity(GRID * GRID, 6 * GRID * GRID);
    let ids: Vec<NodeId> = (0..GRID * GRID).map(|i| b.add_node(node_pos(i / GRID, i % GRID))).collect();
    let at = |row: usize, col: usize| ids[row * GRID + col];

    for row in 0..GRID {
        for col in 0..GRID {
            if col + 1 < GRID {
                let limit = if is_main(row) { MAIN_ROAD } else { RESIDENTIAL };
                b.add_road(at(row, col), at(row, col + 1), RoadSpec::way(street_way(true, row)).maxspeed(limit));
            }
            if row + 1 < GRID {
                let limit = if is_main(col) { MAIN_ROAD } else { RESIDENTIAL };
                b.add_road(at(row, col), at(row + 1, col), RoadSpec::way(street_way(false, col)).maxspeed(limit));
            }
            if with_footpaths && row + 1 < GRID && col + 1 < GRID {
                let way = 1001 + (row * GRID + col) as u64;
                b.add_road(at(row, col), at(row + 1, col + 1), RoadSpec::way(way));
            }
        }
    }
    b.build()
}

/// Two homes per block, with the non-residential buildings on the blocks
/// touching the main roads.
pub fn buildings() -> SpatialResult<Vec<Building>> {
    let mut out = Vec::new();
    let centre = GRID / 2;
    for row in 0..GRID - 1 {
        for col in 0..GRID - 1 {
            let origin = node_pos(row, col);
            let kind = match (row, col) {
                (r, c) if r == centre || c == centre => BuildingKind::Work,
                (1, 1) => BuildingKind::School,
                (r, c) if r == GRID - 3 && c == 1 => BuildingKind::Supermarket,
                (1, c) if c == GRID - 3 => BuildingKind::Recreation,
                (r, c) if r == GRID - 3 && c == GRID - 3 => BuildingKind::Shop,
                _ => BuildingKind::Home,
            };
            let size = if kind == BuildingKind::Home { 40.0 } else { 90.0 };
            out.push(lot(kind, origin, 30.0, size)?);
            if kind == BuildingKind::Home {
                out.push(lot(kind, origin, 120.0, size)?);
            }
        }
    }
    Ok(out)
}

fn lot(kind: BuildingKind, block: Point, offset: f64, size: f64) -> SpatialResult<Building> {
    let min = Point::new(block.x + offset, block.y + 30.0);
    let max = Point::new(min.x + size.min(BLOCK_M - offset - 10.0), min.y + size);
    Building::rectangle(BuildingId(0), kind, min, max)
}
