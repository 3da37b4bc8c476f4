use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse orientation bucket derived from a video's width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationClass {
    Landscape,
    Portrait,
    Other,
}

impl OrientationClass {
    const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
    const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
    const RATIO_TOLERANCE: f64 = 0.001;

    /// Bucket a pixel geometry. Callers must reject zero dimensions first.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);
        if (ratio - Self::LANDSCAPE_RATIO).abs() < Self::RATIO_TOLERANCE {
            OrientationClass::Landscape
        } else if (ratio - Self::PORTRAIT_RATIO).abs() < Self::RATIO_TOLERANCE {
            OrientationClass::Portrait
        } else {
            OrientationClass::Other
        }
    }

    /// Storage key prefix, without the trailing slash.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationClass::Landscape => "landscape",
            OrientationClass::Portrait => "portrait",
            OrientationClass::Other => "other",
        }
    }
}

impl Display for OrientationClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
