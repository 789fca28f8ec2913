mod file;
mod image;

pub use file::File;
pub use image::Image;
