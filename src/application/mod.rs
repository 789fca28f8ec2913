pub mod factory;
pub mod payload;
pub mod ports;
pub mod writer;
