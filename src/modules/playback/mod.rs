pub mod duration_probe;
pub mod rodio_engine;
