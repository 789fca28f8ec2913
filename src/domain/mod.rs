pub mod charset;
pub mod chunk;
pub mod entities;
pub mod errors;
pub mod sniff;
pub mod value_objects;
