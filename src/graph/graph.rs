//! Room connectivity graph.
//!
//! Rooms are nodes, doors/openings/hallway links are undirected edges. The
//! graph is stored in a petgraph `UnGraph` with a flat id index on the side;
//! adjacency lists are derived, never stored on rooms.
//!
//! Two variants of adjacency detection exist: a strict pass that applies the
//! access rules (used to diagnose missing connections) and a permissive pass
//! that treats any shared wall as potentially traversable (used for
//! reachability, so that a plan missing one door is reported as a missing
//! door rather than as an unreachable wing).

#[cfg(test)]
mod test;

use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::errors::{FloorweaveError, PlanWarning};
use crate::geometry::shared_wall;
use crate::layout::Room;
use crate::point::Point;
use crate::program::{AccessType, RoomType};

/// Wall-contact tolerance for implicit adjacency, in feet.
pub const ADJACENCY_TOLERANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Door,
    Opening,
    Hallway,
}

impl Display for EdgeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Door => write!(f, "door"),
            EdgeKind::Opening => write!(f, "opening"),
            EdgeKind::Hallway => write!(f, "hallway"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorSwing {
    Inward,
    Outward,
    Either,
    Pocket,
    Barn,
}

/// An explicit door or cased opening between two rooms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Door {
    pub point: Point,
    /// Clear width in feet; 3.0 is the practical minimum.
    pub width: f32,
    pub swing: DoorSwing,
    pub between: (String, String),
}

impl Door {
    pub fn new(point: Point, between: (impl Into<String>, impl Into<String>)) -> Self {
        Door {
            point,
            width: 3.0,
            swing: DoorSwing::Inward,
            between: (between.0.into(), between.1.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomNode {
    pub id: u32,
    pub name: String,
    pub room_type: RoomType,
}

#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub kind: EdgeKind,
    pub door_point: Option<Point>,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectivityGraph {
    graph: UnGraph<RoomNode, Connection>,
    by_id: BTreeMap<u32, NodeIndex>,
}

impl ConnectivityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room node. Idempotent: adding an id twice leaves the graph
    /// unchanged.
    pub fn add_room(&mut self, id: u32, name: impl Into<String>, room_type: RoomType) {
        if self.by_id.contains_key(&id) {
            return;
        }
        let idx = self.graph.add_node(RoomNode { id, name: name.into(), room_type });
        self.by_id.insert(id, idx);
    }

    /// Adds an undirected edge. Unknown endpoints are an error; duplicate
    /// edges are silently ignored (the graph stays as it was).
    pub fn add_connection(
        &mut self,
        from: u32,
        to: u32,
        kind: EdgeKind,
        door_point: Option<Point>,
    ) -> Result<(), FloorweaveError> {
        let a = *self
            .by_id
            .get(&from)
            .ok_or_else(|| FloorweaveError::RoomNotFound(format!("room #{from}")))?;
        let b = *self
            .by_id
            .get(&to)
            .ok_or_else(|| FloorweaveError::RoomNotFound(format!("room #{to}")))?;
        if self.graph.find_edge(a, b).is_some() {
            return Ok(());
        }
        self.graph.add_edge(a, b, Connection { kind, door_point });
        Ok(())
    }

    pub fn room_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn node(&self, id: u32) -> Option<&RoomNode> {
        self.by_id.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.by_id
            .iter()
            .find(|(_, idx)| self.graph[**idx].name == name)
            .map(|(id, _)| *id)
    }

    /// Neighbor ids in ascending order.
    pub fn neighbors(&self, id: u32) -> Vec<u32> {
        let Some(idx) = self.by_id.get(&id) else {
            return Vec::new();
        };
        self.graph.neighbors(*idx).map(|n| self.graph[n].id).sorted().collect_vec()
    }

    pub fn degree(&self, id: u32) -> usize {
        self.by_id.get(&id).map_or(0, |idx| self.graph.neighbors(*idx).count())
    }

    pub fn edge_kind(&self, a: u32, b: u32) -> Option<EdgeKind> {
        let ai = self.by_id.get(&a)?;
        let bi = self.by_id.get(&b)?;
        self.graph.find_edge(*ai, *bi).map(|e| self.graph[e].kind)
    }

    /// Ids reachable from `start` (inclusive), ascending.
    pub fn reachable_from(&self, start: u32) -> Vec<u32> {
        let mut reached = Vec::new();
        if !self.by_id.contains_key(&start) {
            return reached;
        }
        let mut visited: BTreeMap<u32, ()> = BTreeMap::new();
        let mut queue = VecDeque::new();
        visited.insert(start, ());
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            reached.push(current);
            for next in self.neighbors(current) {
                if visited.insert(next, ()).is_none() {
                    queue.push_back(next);
                }
            }
        }
        reached.sort_unstable();
        reached
    }

    /// Connected components as sorted id lists, ordered by smallest member.
    pub fn components(&self) -> Vec<Vec<u32>> {
        let mut seen: BTreeMap<u32, ()> = BTreeMap::new();
        let mut components = Vec::new();
        for &id in self.by_id.keys() {
            if seen.contains_key(&id) {
                continue;
            }
            let component = self.reachable_from(id);
            for &member in &component {
                seen.insert(member, ());
            }
            components.push(component);
        }
        components
    }

    /// Fewest-edges path from `a` to `b` as an id sequence, both inclusive.
    /// BFS with parent-chain reconstruction; hop count, not distance.
    pub fn shortest_path(&self, a: u32, b: u32) -> Option<Vec<u32>> {
        if !self.by_id.contains_key(&a) || !self.by_id.contains_key(&b) {
            return None;
        }
        if a == b {
            return Some(vec![a]);
        }
        let mut parent: BTreeMap<u32, u32> = BTreeMap::new();
        let mut queue = VecDeque::new();
        parent.insert(a, a);
        queue.push_back(a);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, current);
                if next == b {
                    let mut path = vec![b];
                    let mut node = b;
                    while node != a {
                        node = parent[&node];
                        path.push(node);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

/// Builds the strict graph: explicit doors first, then rule-driven implicit
/// adjacency edges.
pub fn build_graph(rooms: &[Room], doors: &[Door]) -> ConnectivityGraph {
    let mut graph = ConnectivityGraph::new();
    for room in rooms {
        graph.add_room(room.id, room.name.clone(), room.room_type);
    }
    for door in doors {
        let (Some(a), Some(b)) =
            (graph.id_of(&door.between.0), graph.id_of(&door.between.1))
        else {
            continue; // door referencing unplaced rooms is dropped, not fatal
        };
        let _ = graph.add_connection(a, b, EdgeKind::Door, Some(door.point));
    }
    detect_adjacencies(&mut graph, rooms);
    graph
}

/// Builds the permissive variant: every shared wall becomes a candidate
/// opening, regardless of room types.
pub fn build_permissive_graph(rooms: &[Room], doors: &[Door]) -> ConnectivityGraph {
    let mut graph = ConnectivityGraph::new();
    for room in rooms {
        graph.add_room(room.id, room.name.clone(), room.room_type);
    }
    for door in doors {
        let (Some(a), Some(b)) =
            (graph.id_of(&door.between.0), graph.id_of(&door.between.1))
        else {
            continue;
        };
        let _ = graph.add_connection(a, b, EdgeKind::Door, Some(door.point));
    }
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let (a, b) = (&rooms[i], &rooms[j]);
            if let Some((w1, w2)) = shared_wall(&a.bounds(), &b.bounds(), ADJACENCY_TOLERANCE) {
                let _ = graph.add_connection(
                    a.id,
                    b.id,
                    EdgeKind::Opening,
                    Some(w1.midpoint(&w2)),
                );
            }
        }
    }
    graph
}

fn is_hallway_like(room_type: RoomType) -> bool {
    matches!(room_type, RoomType::Hallway | RoomType::Circulation)
}

fn is_hub_room(room_type: RoomType) -> bool {
    matches!(room_type, RoomType::Foyer | RoomType::Mudroom)
}

/// The implicit-edge rules, applied to every touching pair:
/// bedrooms never link to bedrooms and bathrooms never link to bathrooms
/// (privacy and egress); open-plan pairs merge with an opening; hallways
/// serve rooms with direct or hub access; foyer and mudroom doors open onto
/// whatever they touch.
fn detect_adjacencies(graph: &mut ConnectivityGraph, rooms: &[Room]) {
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let (a, b) = (&rooms[i], &rooms[j]);
            let Some((w1, w2)) = shared_wall(&a.bounds(), &b.bounds(), ADJACENCY_TOLERANCE)
            else {
                continue;
            };
            let door_point = Some(w1.midpoint(&w2));

            if a.room_type == RoomType::Bedroom && b.room_type == RoomType::Bedroom {
                continue;
            }
            if a.room_type == RoomType::Bathroom && b.room_type == RoomType::Bathroom {
                continue;
            }

            let kind = if a.room_type.is_open_plan() && b.room_type.is_open_plan() {
                Some(EdgeKind::Opening)
            } else if is_hallway_like(a.room_type)
                && matches!(b.room_type.access(), AccessType::Direct | AccessType::Hub)
            {
                Some(EdgeKind::Hallway)
            } else if is_hallway_like(b.room_type)
                && matches!(a.room_type.access(), AccessType::Direct | AccessType::Hub)
            {
                Some(EdgeKind::Hallway)
            } else if is_hub_room(a.room_type) || is_hub_room(b.room_type) {
                Some(EdgeKind::Door)
            } else {
                None
            };

            if let Some(kind) = kind {
                let _ = graph.add_connection(a.id, b.id, kind, door_point);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityValidationResult {
    pub reachable: Vec<String>,
    pub unreachable: Vec<String>,
    pub missing_connections: Vec<String>,
    pub warnings: Vec<PlanWarning>,
    pub component_count: usize,
}

impl ConnectivityValidationResult {
    pub fn all_reachable(&self) -> bool {
        self.unreachable.is_empty()
    }
}

/// Checks that every room can plausibly be reached from the entry and that
/// access rules hold. Reachability runs on the permissive graph; the access
/// rules run on the strict one. Never fatal: problems come back as lists
/// and warnings.
pub fn validate_connectivity(
    rooms: &[Room],
    doors: &[Door],
    entry_name: &str,
) -> Result<ConnectivityValidationResult, FloorweaveError> {
    let permissive = build_permissive_graph(rooms, doors);
    let strict = build_graph(rooms, doors);

    let entry = permissive
        .id_of(entry_name)
        .ok_or_else(|| FloorweaveError::RoomNotFound(entry_name.to_string()))?;

    let reached = permissive.reachable_from(entry);
    let mut reachable = Vec::new();
    let mut unreachable = Vec::new();
    for room in rooms {
        if reached.binary_search(&room.id).is_ok() {
            reachable.push(room.name.clone());
        } else {
            unreachable.push(room.name.clone());
        }
    }

    let mut missing_connections = Vec::new();
    for room in rooms {
        if room.room_type.access() != AccessType::Direct {
            continue;
        }
        let served = strict.neighbors(room.id).iter().any(|&n| {
            matches!(
                strict.edge_kind(room.id, n),
                Some(EdgeKind::Hallway) | Some(EdgeKind::Door)
            )
        });
        if !served {
            missing_connections.push(format!(
                "'{}' ({}) needs a hallway or hub connection",
                room.name, room.room_type
            ));
        }
    }

    let mut warnings = Vec::new();
    if !rooms.is_empty() {
        let average_degree = 2.0 * strict.edge_count() as f32 / rooms.len() as f32;
        if average_degree < 1.5 {
            warnings.push(PlanWarning::warning(
                "connectivity",
                format!("average connectivity is low ({average_degree:.2} edges per room)"),
            ));
        }
    }
    for room in rooms {
        if room.room_type.access() == AccessType::Hub && strict.degree(room.id) < 2 {
            warnings.push(PlanWarning::warning(
                "connectivity",
                format!("hub room '{}' connects to fewer than 2 rooms", room.name),
            ));
        }
    }

    Ok(ConnectivityValidationResult {
        reachable,
        unreachable,
        missing_connections,
        warnings,
        component_count: permissive.components().len(),
    })
}

/// Hard variant of the access rules: errors on the first direct-access
/// room the strict graph leaves without a hallway or hub connection. For
/// callers that treat access as a requirement instead of an advisory.
pub fn require_direct_access(
    rooms: &[Room],
    graph: &ConnectivityGraph,
) -> Result<(), FloorweaveError> {
    for room in rooms {
        if room.room_type.access() != AccessType::Direct {
            continue;
        }
        let served = graph.neighbors(room.id).iter().any(|&n| {
            matches!(
                graph.edge_kind(room.id, n),
                Some(EdgeKind::Hallway) | Some(EdgeKind::Door)
            )
        });
        if !served {
            return Err(FloorweaveError::MissingAccess { room: room.name.clone() });
        }
    }
    Ok(())
}
