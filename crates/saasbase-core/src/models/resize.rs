use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::constants::{AVATAR_SIZE_PX, MAX_RESIZE_DIMENSION_PX};
use crate::error::AppError;

/// Encoded output format of a resized image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    #[default]
    Png,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// How the source image is mapped onto the requested dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Sizing {
    /// Fit inside width x height, keeping aspect ratio
    ScaleToFit,
    /// Exact width, height follows aspect ratio
    Width,
    /// Exact height, width follows aspect ratio
    Height,
    /// Cover width x height, then crop the overflow around the center
    Crop,
    /// Stretch to exactly width x height
    Fill,
}

impl fmt::Display for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sizing::ScaleToFit => "scaleToFit",
            Sizing::Width => "width",
            Sizing::Height => "height",
            Sizing::Crop => "crop",
            Sizing::Fill => "fill",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CenterKeyword {
    Faces,
    Center,
}

/// Requested focal point. Part of the cache key; cropping is always centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Center {
    Point { x: f64, y: f64 },
    Keyword(CenterKeyword),
}

/// Parameters of a resize. The canonical JSON form of this struct is the
/// variant's cache key, so absent fields are omitted rather than `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct ResizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100, message = "Quality must be between 1 and 100"))]
    pub quality: Option<u8>,
    pub sizing: Sizing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Center>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 1,
        max = MAX_RESIZE_DIMENSION_PX,
        message = "Width must be between 1 and 8192 pixels"
    ))]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 1,
        max = MAX_RESIZE_DIMENSION_PX,
        message = "Height must be between 1 and 8192 pixels"
    ))]
    pub height: Option<u32>,
}

impl ResizeSpec {
    pub fn new(sizing: Sizing) -> Self {
        Self {
            format: None,
            quality: None,
            sizing,
            center: None,
            width: None,
            height: None,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// The square crop served for user avatars.
    pub fn avatar() -> Self {
        Self::new(Sizing::Crop)
            .width(AVATAR_SIZE_PX)
            .height(AVATAR_SIZE_PX)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Field ranges plus the dimensions each sizing mode requires.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        match self.sizing {
            Sizing::ScaleToFit => Ok(()),
            Sizing::Width if self.width.is_none() => Err(AppError::InvalidInput(
                "Width is required for sizing: width".to_string(),
            )),
            Sizing::Height if self.height.is_none() => Err(AppError::InvalidInput(
                "Height is required for sizing: height".to_string(),
            )),
            Sizing::Crop | Sizing::Fill if self.width.is_none() || self.height.is_none() => {
                Err(AppError::InvalidInput(format!(
                    "Width and height are required for sizing: {}",
                    self.sizing
                )))
            }
            _ => Ok(()),
        }
    }
}
