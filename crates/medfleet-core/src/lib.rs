pub mod availability;
pub mod geo;
pub mod models;
pub mod path;
pub mod risk;
pub mod selection;

pub use availability::find_available_drones;
pub use models::{
    DeliveryFlight, DeliveryPath, Dispatch, DispatchRequirements, Drone, DroneCapability,
    DronePath, FleetInsight, MaintenanceLog, MaintenancePlan, PlanRequest, PlanResponse,
    Position, RiskLevel, WeeklyWindow,
};
pub use path::{delivery_path_geojson, plan_delivery};
pub use risk::{build_insight, build_plan};
pub use selection::select_drone;
