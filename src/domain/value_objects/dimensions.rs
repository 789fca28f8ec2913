use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of an image; `-1` on either axis means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    width: i64,
    height: i64,
}

impl Dimensions {
    pub const UNKNOWN: Dimensions = Dimensions {
        width: -1,
        height: -1,
    };

    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn is_known(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Dimensions {
    /// Renders `WxH`, with `?` for an unknown axis, e.g. `16x16` or `?x?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.width < 0, self.height < 0) {
            (false, false) => write!(f, "{}x{}", self.width, self.height),
            (true, false) => write!(f, "?x{}", self.height),
            (false, true) => write!(f, "{}x?", self.width),
            (true, true) => write!(f, "?x?"),
        }
    }
}
