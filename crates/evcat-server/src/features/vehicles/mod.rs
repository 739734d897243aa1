pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{DeleteVehicleCommand, DeleteVehicleError, DeleteVehicleResponse};

pub use queries::{
    GetVehicleError, GetVehicleQuery, ListVehiclesError, ListVehiclesQuery, ListVehiclesResponse,
};

pub use routes::vehicles_routes;
pub use types::Vehicle;
