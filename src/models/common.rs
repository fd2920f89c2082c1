use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MockupError;

/// Required width:height proportion of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const LANDSCAPE: AspectRatio = AspectRatio::new(1920, 1080);
    pub const SQUARE: AspectRatio = AspectRatio::new(1080, 1080);
    pub const PORTRAIT: AspectRatio = AspectRatio::new(1080, 1920);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The three ratios offered on the request form, in display order.
    pub fn presets() -> [(&'static str, AspectRatio); 3] {
        [
            ("Landscape", Self::LANDSCAPE),
            ("Square", Self::SQUARE),
            ("Portrait", Self::PORTRAIT),
        ]
    }

    pub fn label(&self) -> Option<&'static str> {
        Self::presets()
            .into_iter()
            .find(|(_, ratio)| ratio == self)
            .map(|(label, _)| label)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::LANDSCAPE
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MockupError::RequestRejected(format!("Invalid aspect ratio '{}'", s));
        let (w, h) = s.trim().split_once(':').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(AspectRatio::new(width, height))
    }
}

/// How many images one submission produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputCount {
    #[default]
    One,
    Two,
    Four,
}

impl OutputCount {
    pub fn all() -> &'static [OutputCount] {
        &[OutputCount::One, OutputCount::Two, OutputCount::Four]
    }

    pub fn get(&self) -> usize {
        match self {
            OutputCount::One => 1,
            OutputCount::Two => 2,
            OutputCount::Four => 4,
        }
    }
}

impl TryFrom<usize> for OutputCount {
    type Error = MockupError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OutputCount::One),
            2 => Ok(OutputCount::Two),
            4 => Ok(OutputCount::Four),
            n => Err(MockupError::RequestRejected(format!(
                "Unsupported output count {} (choose 1, 2 or 4)",
                n
            ))),
        }
    }
}

/// Which form the user is filling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Scene described in text, logo composited into a synthesized photo.
    #[default]
    Description,
    /// Logo placed into an uploaded base photo.
    Image,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_parse_and_display() {
        let ratio: AspectRatio = "1080:1920".parse().unwrap();
        assert_eq!(ratio, AspectRatio::PORTRAIT);
        assert_eq!(ratio.to_string(), "1080:1920");
        assert_eq!(ratio.label(), Some("Portrait"));
        assert!("16x9".parse::<AspectRatio>().is_err());
        assert!("0:9".parse::<AspectRatio>().is_err());
        assert_eq!(AspectRatio::default(), AspectRatio::LANDSCAPE);
    }

    #[test]
    fn test_output_count() {
        assert_eq!(OutputCount::try_from(2).unwrap(), OutputCount::Two);
        assert!(OutputCount::try_from(3).is_err());
        assert_eq!(
            OutputCount::all().iter().map(|c| c.get()).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
    }
}
