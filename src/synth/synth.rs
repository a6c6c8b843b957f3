//! The synthesis pipeline.
//!
//! `Synthesis::run` is the one-call entry point: program + footprint in,
//! validated plan out. It is a pure function of its request; two identical
//! requests produce byte-identical results. The builder walks the fixed
//! stage order and is not re-entrant; every run owns its own state.

#[cfg(test)]
mod test;

use std::fmt::{Display, Formatter};

use log::{debug, info};
use serde::Serialize;

use crate::budget::{calculate_space_budget, SpaceBudget};
use crate::circulation::{
    self, compute_requirements, compute_spine, sum_requirements, CirculationReport,
    CirculationRequirement, CirculationSpine,
};
use crate::errors::{FloorweaveError, PlanWarning, Severity};
use crate::graph::{validate_connectivity, ConnectivityValidationResult, Door};
use crate::layout::{place_rooms, Layout, PlacementRequest, PositionSpec};
use crate::network::{
    compute_hallway_network, corridor_to_segments, detect_bedroom_clusters,
    detect_open_plan_clusters, generate_cluster_corridor, generate_spine_geometry,
    generate_traffic_paths, BedroomCluster, CorridorSpec, HallwayNetwork, OpenPlanCluster,
    SpineGeometry, TrafficPath, DEFAULT_CORRIDOR_WIDTH,
};
use crate::pathfind::{validate_all_rooms_reachable, ReachabilityReport};
use crate::program::{FloorProgram, Footprint, RoomType};

/// Progress marker for a synthesis run. Later stages imply all earlier ones
/// completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisStage {
    Init,
    ComputedRequirements,
    ComputedAllocation,
    PlacedRooms,
    BuiltGraph,
    BuiltNetwork,
    BuiltCorridors,
    MaterialisedGeometry,
    Validated,
    Final,
}

/// Feature switches for the optional stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SynthesisFlags {
    pub detect_clusters: bool,
    pub generate_traffic: bool,
    pub validate_reachability: bool,
}

impl Default for SynthesisFlags {
    fn default() -> Self {
        SynthesisFlags {
            detect_clusters: true,
            generate_traffic: true,
            validate_reachability: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub program: FloorProgram,
    pub footprint: Footprint,
    /// Caller-pinned positions by room name; everything else auto-places.
    pub positions: Vec<(String, PositionSpec)>,
    pub doors: Vec<Door>,
    /// Room to validate reachability from. Defaults to the foyer, then the
    /// first placed room.
    pub entry_room: Option<String>,
    pub is_l_shaped: bool,
    pub flags: SynthesisFlags,
}

impl SynthesisRequest {
    pub fn new(program: FloorProgram, footprint: Footprint) -> Self {
        SynthesisRequest {
            program,
            footprint,
            positions: Vec::new(),
            doors: Vec::new(),
            entry_room: None,
            is_l_shaped: false,
            flags: SynthesisFlags::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    pub layout: Layout,
    pub requirements: Vec<CirculationRequirement>,
    pub circulation: CirculationReport,
    pub spine: CirculationSpine,
    pub budget: SpaceBudget,
    pub connectivity: Option<ConnectivityValidationResult>,
    pub network: HallwayNetwork,
    pub clusters: Vec<BedroomCluster>,
    pub corridors: Vec<CorridorSpec>,
    pub open_plan: Vec<OpenPlanCluster>,
    pub traffic_paths: Vec<TrafficPath>,
    pub geometry: SpineGeometry,
    pub reachability: Option<ReachabilityReport>,
    pub entry_room: Option<String>,
    pub warnings: Vec<PlanWarning>,
    pub stage: SynthesisStage,
}

impl SynthesisResult {
    /// A unique structured string describing this result. Used by tests to
    /// compare runs byte for byte; not meant to be readable.
    pub fn slug(&self) -> String {
        let mut slug = self.layout.slug();
        slug.push('[');
        for req in &self.requirements {
            slug.push_str(&format!("{}:{};", req.component, req.area));
        }
        slug.push_str("];[");
        for segment in &self.network.segments {
            slug.push_str(&format!(
                "h{}:{:.2},{:.2}-{:.2},{:.2};",
                segment.id,
                segment.from_point.x,
                segment.from_point.y,
                segment.to_point.x,
                segment.to_point.y
            ));
        }
        slug.push_str(&format!("];w{:.2};t{:.2};", self.geometry.walled_area, self.geometry.traffic_path_area));
        slug
    }
}

impl Display for SynthesisResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} room(s) on {:.0} sq ft, {} hallway segment(s), {:.0} sq ft circulation ({:?}/{:?})",
            self.layout.rooms.len(),
            self.layout.footprint.area(),
            self.network.segments.len(),
            self.geometry.walled_area,
            self.circulation.rating,
            self.circulation.band,
        )?;
        for warning in &self.warnings {
            writeln!(f, "\t[{:?}] {}: {}", warning.severity, warning.category, warning.message)?;
        }
        Ok(())
    }
}

pub struct Synthesis;

impl Synthesis {
    pub fn run(request: &SynthesisRequest) -> Result<SynthesisResult, FloorweaveError> {
        SynthesisBuilder::new(request).run()
    }
}

struct SynthesisBuilder<'a> {
    request: &'a SynthesisRequest,
    stage: SynthesisStage,
    warnings: Vec<PlanWarning>,
}

impl<'a> SynthesisBuilder<'a> {
    fn new(request: &'a SynthesisRequest) -> Self {
        SynthesisBuilder { request, stage: SynthesisStage::Init, warnings: Vec::new() }
    }

    fn run(mut self) -> Result<SynthesisResult, FloorweaveError> {
        let program = &self.request.program;
        let footprint = self.request.footprint;
        info!(
            "synthesising {} room(s) on a {:.0}x{:.0} footprint ({})",
            program.rooms.len(),
            footprint.width,
            footprint.depth,
            program.feel
        );

        // ** Circulation requirements and spine ** //
        let requirements = compute_requirements(program);
        let required_area = sum_requirements(&requirements, false);
        let spine = compute_spine(&footprint, program, self.request.is_l_shaped);
        self.stage = SynthesisStage::ComputedRequirements;

        // ** Space budget: rooms get what circulation leaves behind ** //
        let room_area = footprint.area() - required_area;
        if room_area <= 0.0 {
            return Err(FloorweaveError::UnsatisfiableRequirement {
                required: required_area,
                available: footprint.area(),
            });
        }
        let budget = calculate_space_budget(room_area, program)?;
        self.stage = SynthesisStage::ComputedAllocation;

        // ** Placement ** //
        let mut layout = Layout::new(footprint);
        let requests: Vec<PlacementRequest> = budget
            .rooms
            .iter()
            .map(|room| PlacementRequest {
                name: room.name.clone(),
                room_type: room.room_type,
                is_primary: room.is_primary,
                size: room.current,
                position: self.position_for(&room.name),
            })
            .collect();
        place_rooms(&mut layout, &requests)?;
        self.stage = SynthesisStage::PlacedRooms;

        let entry_room = self.entry_room(&layout);

        // ** Connectivity graph ** //
        let connectivity = match &entry_room {
            Some(entry) => {
                let result =
                    validate_connectivity(&layout.rooms, &self.request.doors, entry)?;
                self.warnings.extend(result.warnings.iter().cloned());
                for missing in &result.missing_connections {
                    self.warnings.push(PlanWarning::warning("access", missing.clone()));
                }
                Some(result)
            }
            None => None,
        };
        self.stage = SynthesisStage::BuiltGraph;

        // ** Hallway MST ** //
        let hallway_width = program.feel.params().hallway_width;
        let mut network = compute_hallway_network(&layout.rooms, hallway_width);
        self.stage = SynthesisStage::BuiltNetwork;

        // ** Bedroom corridors ** //
        let mut clusters: Vec<BedroomCluster> = Vec::new();
        let mut corridors: Vec<CorridorSpec> = Vec::new();
        if self.request.flags.detect_clusters {
            clusters = detect_bedroom_clusters(&layout.rooms);
            for cluster in &clusters {
                let corridor =
                    generate_cluster_corridor(cluster, &layout.rooms, DEFAULT_CORRIDOR_WIDTH);
                let segments =
                    corridor_to_segments(&corridor, &layout.rooms, network.next_segment_id());
                network.integrate_segments(segments);
                corridors.push(corridor);
            }
        }
        self.stage = SynthesisStage::BuiltCorridors;

        // ** Open-plan traffic overlays ** //
        let mut open_plan: Vec<OpenPlanCluster> = Vec::new();
        let mut traffic_paths: Vec<TrafficPath> = Vec::new();
        if self.request.flags.generate_traffic {
            open_plan = detect_open_plan_clusters(&layout.rooms);
            let entry_point = entry_room
                .as_deref()
                .and_then(|name| layout.room_named(name))
                .map(|room| room.centroid());
            traffic_paths = generate_traffic_paths(&open_plan, &layout.rooms, entry_point);
        }

        // ** Geometry realisation ** //
        let geometry =
            generate_spine_geometry(&network, &traffic_paths, &footprint, &layout.rooms);
        self.warnings.extend(geometry.warnings.iter().cloned());
        self.stage = SynthesisStage::MaterialisedGeometry;

        // ** Walkability validation ** //
        let mut reachability = None;
        if self.request.flags.validate_reachability {
            if let Some(entry) = &entry_room {
                let report = validate_all_rooms_reachable(
                    &layout.rooms,
                    &geometry,
                    &self.request.doors,
                    entry,
                )?;
                if !report.all_reachable {
                    return Err(FloorweaveError::Unreachable {
                        rooms: report.unreachable.clone(),
                    });
                }
                reachability = Some(report);
            }
        }
        self.stage = SynthesisStage::Validated;

        let circulation =
            circulation::report(&requirements, footprint.area(), geometry.walled_area);
        let error_count =
            self.warnings.iter().filter(|w| w.severity == Severity::Error).count();
        debug!(
            "synthesis finished: {} warning(s), {} error finding(s)",
            self.warnings.len(),
            error_count
        );

        self.stage = SynthesisStage::Final;
        Ok(SynthesisResult {
            layout,
            requirements,
            circulation,
            spine,
            budget,
            connectivity,
            network,
            clusters,
            corridors,
            open_plan,
            traffic_paths,
            geometry,
            reachability,
            entry_room,
            warnings: self.warnings,
            stage: self.stage,
        })
    }

    fn position_for(&self, name: &str) -> PositionSpec {
        self.request
            .positions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec.clone())
            .unwrap_or(PositionSpec::Auto { prefer: None })
    }

    /// The reachability origin: the caller's choice, else the foyer, else
    /// the first placed room.
    fn entry_room(&self, layout: &Layout) -> Option<String> {
        if let Some(entry) = &self.request.entry_room {
            return Some(entry.clone());
        }
        layout
            .rooms_of_type(RoomType::Foyer)
            .next()
            .or_else(|| layout.rooms.first())
            .map(|room| room.name.clone())
    }
}
