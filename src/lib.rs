pub mod assembler;
pub mod batch;
pub mod clock;
pub mod config;
pub mod emitter;
pub mod error;
pub mod interpolate;
pub mod model;
pub mod pipeline;
pub mod record_source;
pub mod signal;
