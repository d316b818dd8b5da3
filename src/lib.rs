pub mod error;
pub mod math;
pub mod ratsnest;

pub use error::{AirWiresError, Result};
pub use ratsnest::{
    build_net_air_wires, normalize, total_length, AirWire, AirWires, AirWiresBuilder, Point,
    PointId, RatsnestParams,
};
