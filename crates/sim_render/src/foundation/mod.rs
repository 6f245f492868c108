//! Foundation utilities: math types, simulation time, logging

pub mod logging;
pub mod math;
pub mod time;
