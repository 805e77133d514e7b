//! Background loops.

pub mod telemetry_sim_loop;
