pub mod delete;

pub use delete::{DeleteVehicleCommand, DeleteVehicleError, DeleteVehicleResponse};
