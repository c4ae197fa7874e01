//! Road network representation and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  The
//! outgoing edges of `NodeId n` are the contiguous `EdgeId` range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! and every per-edge array (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_speed_mps`, `edge_way`) is indexed by that `EdgeId`.  Roads are
//! undirected, so each segment is stored once per direction.
//!
//! # Connectivity
//!
//! [`RoadNetworkBuilder::build`] keeps only the largest strongly connected
//! component, so every node of a built network can reach every other node
//! even when some segments were added one-way.  The same
//! rule is re-applied when a safe network is derived with
//! [`RoadNetwork::build_safe`].
//!
//! # Node identity
//!
//! `NodeId`s are dense indices and are renumbered whenever nodes are
//! dropped.  `node_source` carries the id the node had in the source data
//! (an OSM node id, or the builder insertion index) and survives that
//! renumbering, so it is the way to compare nodes across network instances.

use log::warn;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ev_core::{EdgeId, NodeId, Point};

use crate::zone::Region;
use crate::{SpatialError, SpatialResult};

// ── Speed limits ──────────────────────────────────────────────────────────────

const MPH_TO_KPH: f64 = 1.609;

/// Speed limit assumed when a road has no usable `maxspeed` tag: 30 mph.
pub const DEFAULT_SPEED_LIMIT_MPS: f64 = 30.0 * MPH_TO_KPH / 3.6;

/// Parse an OSM-style `maxspeed` value (`"20 mph"`, `"40"`, `"['20 mph', '30 mph']"`)
/// into metres per second.
///
/// The first run of digits is read as miles per hour.  Returns `None` when
/// there are no digits or the value is zero.
pub fn parse_speed_limit(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let mph: u32 = digits.parse().ok()?;
    (mph > 0).then(|| f64::from(mph) * MPH_TO_KPH / 3.6)
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Road graph for one travel mode, in CSR form, plus a nearest-node index.
///
/// Fields are `pub` for direct indexed access on hot paths.  Construct with
/// [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    pub node_pos:    Vec<Point>,
    /// Source-data id of each node, stable across derived networks.
    pub node_source: Vec<u64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data ─────────────────────────────────────────────────────────
    pub edge_from:      Vec<NodeId>,
    pub edge_to:        Vec<NodeId>,
    pub edge_length_m:  Vec<f64>,
    /// Posted speed limit.  Pedestrians ignore it.
    pub edge_speed_mps: Vec<f64>,
    /// Id of the source way the segment belongs to (traffic sensors key on it).
    pub edge_way:       Vec<u64>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes.  Every query against it fails or returns `None`.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().assemble()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> Point {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn source_id(&self, node: NodeId) -> u64 {
        self.node_source[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()];
        let end   = self.node_out_start[node.index() + 1];
        (start..end).map(EdgeId)
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    /// Shortest direct edge from `a` to `b`, if the two are adjacent.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.out_edges(a)
            .filter(|e| self.edge_to[e.index()] == b)
            .min_by(|x, y| self.edge_length_m[x.index()].total_cmp(&self.edge_length_m[y.index()]))
    }

    /// Position `distance_m` along `edge`, clamped to the segment.
    pub fn point_along(&self, edge: EdgeId, distance_m: f64) -> Point {
        let from = self.position(self.edge_from[edge.index()]);
        let to   = self.position(self.edge_to[edge.index()]);
        let len  = self.edge_length_m[edge.index()];
        if len <= 0.0 {
            return from;
        }
        from.lerp(to, (distance_m / len).clamp(0.0, 1.0))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`.  `None` only for an empty network.
    pub fn nearest_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .map(|e| e.id)
    }

    /// Up to `k` nearest nodes, closest first.
    pub fn k_nearest_nodes(&self, pos: Point, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Edge whose straight segment passes closest to `pos`, searched among
    /// the edges leaving the few nodes nearest to it.
    pub fn nearest_edge(&self, pos: Point) -> Option<EdgeId> {
        let mut best: Option<(f64, EdgeId)> = None;
        for node in self.k_nearest_nodes(pos, 8) {
            for e in self.out_edges(node) {
                let a = self.position(self.edge_from[e.index()]);
                let b = self.position(self.edge_to[e.index()]);
                let d = segment_distance_sq(pos, a, b);
                if best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((d, e));
                }
            }
        }
        best.map(|(_, e)| e)
    }

    // ── Derived networks ──────────────────────────────────────────────────

    /// Rebuild this network without the nodes inside `excluded`, keeping
    /// the largest connected component of what remains.
    ///
    /// The result may be empty if the region swallows the whole network.
    /// Source ids, lengths, speeds, and way ids are carried over unchanged.
    pub fn build_safe(&self, excluded: &impl Region) -> RoadNetwork {
        let mut b = RoadNetworkBuilder::with_capacity(self.node_count(), self.edge_count());
        let mut remap = vec![NodeId::INVALID; self.node_count()];

        for (i, &pos) in self.node_pos.iter().enumerate() {
            if !excluded.contains(pos) {
                remap[i] = b.add_node_with_source(pos, self.node_source[i]);
            }
        }
        for e in 0..self.edge_count() {
            let from = remap[self.edge_from[e].index()];
            let to   = remap[self.edge_to[e].index()];
            if from.is_valid() && to.is_valid() {
                b.raw_edges.push(RawEdge {
                    from,
                    to,
                    length_m:  self.edge_length_m[e],
                    speed_mps: self.edge_speed_mps[e],
                    way_id:    self.edge_way[e],
                });
            }
        }
        b.assemble()
    }
}

fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let len_sq = a.distance_sq(b);
    if len_sq == 0.0 {
        return p.distance_sq(a);
    }
    let t = ((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq;
    p.distance_sq(a.lerp(b, t.clamp(0.0, 1.0)))
}

// ── RoadSpec ──────────────────────────────────────────────────────────────────

/// Attributes of one road segment as supplied by the geometry source.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoadSpec<'a> {
    pub way_id:   u64,
    /// Explicit length; defaults to the straight-line distance between the
    /// two endpoints.
    pub length_m: Option<f64>,
    /// Raw `maxspeed` tag.
    pub maxspeed: Option<&'a str>,
}

impl<'a> RoadSpec<'a> {
    pub fn way(way_id: u64) -> Self {
        Self { way_id, ..Self::default() }
    }

    pub fn length(mut self, length_m: f64) -> Self {
        self.length_m = Some(length_m);
        self
    }

    pub fn maxspeed(mut self, raw: &'a str) -> Self {
        self.maxspeed = Some(raw);
        self
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and road segments, then assembles a [`RoadNetwork`].
///
/// ```
/// use ev_core::Point;
/// use ev_spatial::{RoadNetworkBuilder, RoadSpec};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0));
/// let c = b.add_node(Point::new(120.0, 0.0));
/// b.add_road(a, c, RoadSpec::way(1).maxspeed("20 mph"));
/// let net = b.build().unwrap();
/// assert_eq!(net.edge_count(), 2);
/// assert_eq!(net.edge_length_m[0], 120.0);
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<Point>,
    sources:   Vec<u64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
    speed_mps: f64,
    way_id:    u64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), sources: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            sources:   Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node whose source id is its insertion index.
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let source = self.nodes.len() as u64;
        self.add_node_with_source(pos, source)
    }

    /// Add a node carrying an explicit source-data id (e.g. an OSM node id).
    pub fn add_node_with_source(&mut self, pos: Point, source: u64) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.sources.push(source);
        id
    }

    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, spec: RoadSpec<'_>) {
        let length_m = spec
            .length_m
            .unwrap_or_else(|| self.nodes[from.index()].distance(self.nodes[to.index()]));
        let speed_mps = match spec.maxspeed {
            None => DEFAULT_SPEED_LIMIT_MPS,
            Some(raw) => parse_speed_limit(raw).unwrap_or_else(|| {
                warn!("way {}: unparsable maxspeed {raw:?}, assuming 30 mph", spec.way_id);
                DEFAULT_SPEED_LIMIT_MPS
            }),
        };
        self.raw_edges.push(RawEdge { from, to, length_m, speed_mps, way_id: spec.way_id });
    }

    /// Add a two-way road segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, spec: RoadSpec<'_>) {
        self.add_directed_edge(a, b, spec);
        self.add_directed_edge(b, a, spec);
    }

    pub fn node_pos(&self, id: NodeId) -> Point {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Assemble the network, keeping only the largest strongly connected
    /// component.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyNetwork`] if no nodes were added.
    pub fn build(self) -> SpatialResult<RoadNetwork> {
        let net = self.assemble();
        if net.is_empty() {
            return Err(SpatialError::EmptyNetwork);
        }
        Ok(net)
    }

    /// Largest-component filter + CSR + R-tree, with no emptiness check.
    fn assemble(self) -> RoadNetwork {
        let keep = largest_component(self.nodes.len(), &self.raw_edges);

        let mut remap = vec![NodeId::INVALID; self.nodes.len()];
        let mut node_pos    = Vec::with_capacity(self.nodes.len());
        let mut node_source = Vec::with_capacity(self.nodes.len());
        for (i, (&pos, &src)) in self.nodes.iter().zip(&self.sources).enumerate() {
            if keep[i] {
                remap[i] = NodeId(node_pos.len() as u32);
                node_pos.push(pos);
                node_source.push(src);
            }
        }

        let mut raw: Vec<RawEdge> = self
            .raw_edges
            .into_iter()
            .filter(|e| keep[e.from.index()] && keep[e.to.index()])
            .map(|e| RawEdge { from: remap[e.from.index()], to: remap[e.to.index()], ..e })
            .collect();
        // Stable sort keeps insertion order among a node's edges.
        raw.sort_by_key(|e| e.from.0);

        let node_count = node_pos.len();
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: p.to_array(), id: NodeId(i as u32) })
            .collect();

        RoadNetwork {
            node_pos,
            node_source,
            node_out_start,
            edge_from:      raw.iter().map(|e| e.from).collect(),
            edge_to:        raw.iter().map(|e| e.to).collect(),
            edge_length_m:  raw.iter().map(|e| e.length_m).collect(),
            edge_speed_mps: raw.iter().map(|e| e.speed_mps).collect(),
            edge_way:       raw.iter().map(|e| e.way_id).collect(),
            spatial_idx:    RTree::bulk_load(entries),
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Membership mask of the largest strongly connected component, so one-way
/// spurs that cannot be left again are dropped.  Ties go to the component
/// containing the lowest node index.
fn largest_component(node_count: usize, edges: &[RawEdge]) -> Vec<bool> {
    let mut fwd = vec![Vec::new(); node_count];
    let mut rev = vec![Vec::new(); node_count];
    for e in edges {
        fwd[e.from.index()].push(e.to.index());
        rev[e.to.index()].push(e.from.index());
    }

    // Kosaraju, pass 1: finish order of a DFS over the forward edges.
    let mut seen = vec![false; node_count];
    let mut finished = Vec::with_capacity(node_count);
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for start in 0..node_count {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        stack.push((start, 0));
        while let Some(&(v, next)) = stack.last() {
            match fwd[v].get(next) {
                Some(&w) => {
                    let top = stack.len() - 1;
                    stack[top].1 += 1;
                    if !seen[w] {
                        seen[w] = true;
                        stack.push((w, 0));
                    }
                }
                None => {
                    finished.push(v);
                    stack.pop();
                }
            }
        }
    }

    // Pass 2: sweep the reversed edges in reverse finish order.
    let mut label = vec![usize::MAX; node_count];
    let mut best: Option<(usize, usize, usize)> = None; // (size, lowest member, label)
    let mut todo = Vec::new();
    for &root in finished.iter().rev() {
        if label[root] != usize::MAX {
            continue;
        }
        label[root] = root;
        todo.push(root);
        let (mut size, mut lowest) = (0, root);
        while let Some(v) = todo.pop() {
            size += 1;
            lowest = lowest.min(v);
            for &w in &rev[v] {
                if label[w] == usize::MAX {
                    label[w] = root;
                    todo.push(w);
                }
            }
        }
        if best.is_none_or(|(s, low, _)| size > s || (size == s && lowest < low)) {
            best = Some((size, lowest, root));
        }
    }
    let Some((_, _, keep)) = best else {
        return Vec::new();
    };
    label.iter().map(|&l| l == keep).collect()
}
