mod dimensions;

pub use dimensions::Dimensions;
