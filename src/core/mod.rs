//! Runtime components: metrics source and producers, exposition encoder,
//! snapshot collector, scheduler and its observable state.

pub mod collector;
pub mod collectors;
pub mod executor;
pub mod exposition;
pub mod status;
