// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Folio PDF engine.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

// -- Page ranges --------------------------------------------------------------

/// Inclusive, 1-indexed page range.
///
/// `end` is never checked against a document up front: it is clamped to the
/// page count when the range is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Build a range, enforcing `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Check the `1 <= start <= end` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.start < 1 || self.end < self.start {
            return Err(FolioError::InvalidRange(format!("{}-{}", self.start, self.end)));
        }
        Ok(())
    }

    /// Parse a single `"start-end"` token.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        let (start, end) = token
            .split_once('-')
            .ok_or_else(|| FolioError::InvalidRange(token.to_string()))?;
        let start: u32 = start
            .trim()
            .parse()
            .map_err(|_| FolioError::InvalidRange(token.to_string()))?;
        let end: u32 = end
            .trim()
            .parse()
            .map_err(|_| FolioError::InvalidRange(token.to_string()))?;
        Self::new(start, end).map_err(|_| FolioError::InvalidRange(token.to_string()))
    }

    /// Parse a comma-separated list such as `"1-5, 6-10"`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        let ranges = list
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>>>()?;
        if ranges.is_empty() {
            return Err(FolioError::InvalidRange(list.to_string()));
        }
        Ok(ranges)
    }

    /// Resolve against a document of `page_count` pages, yielding 0-based
    /// indices. `None` means the range falls outside the document and is
    /// dropped by the caller.
    pub fn resolve(&self, page_count: usize) -> Option<RangeInclusive<usize>> {
        let total = page_count as i64;
        let start_idx = self.start as i64 - 1;
        let end_idx = (self.end as i64).min(total) - 1;

        if start_idx < 0 || start_idx > end_idx || end_idx >= total {
            return None;
        }
        Some(start_idx as usize..=end_idx as usize)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for PageRange {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// -- Rotation -----------------------------------------------------------------

/// Clockwise page rotation. Only quarter turns are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rotation {
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub fn degrees(&self) -> i64 {
        match self {
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarter => 270,
        }
    }

    /// Add this rotation to an existing `/Rotate` value, normalised to 0..360.
    pub fn apply_to(&self, existing: i64) -> i64 {
        (existing + self.degrees()).rem_euclid(360)
    }
}

impl TryFrom<i64> for Rotation {
    type Error = FolioError;

    fn try_from(degrees: i64) -> Result<Self> {
        match degrees {
            90 => Ok(Self::Quarter),
            180 => Ok(Self::Half),
            270 => Ok(Self::ThreeQuarter),
            other => Err(FolioError::InvalidParameters(format!(
                "rotation must be 90, 180, or 270 degrees, got {other}"
            ))),
        }
    }
}

impl From<Rotation> for i64 {
    fn from(rotation: Rotation) -> i64 {
        rotation.degrees()
    }
}

// -- Page geometry ------------------------------------------------------------

/// A page box in PDF points: (left, bottom, right, top).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBox {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl PageBox {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Box with its origin at (0, 0).
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Shrink by the given margins. Returns `None` when the result would be
    /// degenerate (`left >= right` or `bottom >= top`).
    pub fn shrink(&self, margins: &CropMargins) -> Option<PageBox> {
        let shrunk = PageBox {
            left: self.left + margins.left,
            bottom: self.bottom + margins.bottom,
            right: self.right - margins.right,
            top: self.top - margins.top,
        };
        if shrunk.left >= shrunk.right || shrunk.bottom >= shrunk.top {
            None
        } else {
            Some(shrunk)
        }
    }
}

/// Independent crop margins in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropMargins {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub top: f32,
}

impl CropMargins {
    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.left, self.bottom, self.right, self.top]
            .iter()
            .all(|m| m.is_finite());
        if !all_finite {
            return Err(FolioError::InvalidParameters(
                "crop margins must be finite numbers".into(),
            ));
        }
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.bottom == 0.0 && self.right == 0.0 && self.top == 0.0
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::A3 => (841.89, 1190.55),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_pt();
        (w * 25.4 / 72.0, h * 25.4 / 72.0)
    }

    pub fn page_box(&self) -> PageBox {
        let (w, h) = self.dimensions_pt();
        PageBox::from_size(w, h)
    }
}

// -- Security -----------------------------------------------------------------

/// Actions a reader of a protected document may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    pub print: bool,
    pub modify: bool,
    pub copy: bool,
    pub annotate: bool,
    pub form: bool,
    pub extract: bool,
    pub assemble: bool,
    pub print_high_quality: bool,
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::all()
    }
}

impl PermissionSet {
    pub fn all() -> Self {
        Self {
            print: true,
            modify: true,
            copy: true,
            annotate: true,
            form: true,
            extract: true,
            assemble: true,
            print_high_quality: true,
        }
    }

    pub fn none() -> Self {
        Self {
            print: false,
            modify: false,
            copy: false,
            annotate: false,
            form: false,
            extract: false,
            assemble: false,
            print_high_quality: false,
        }
    }
}

/// Password parameters of `protect`, as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtectOptions {
    pub user_password: Option<String>,
    pub owner_password: Option<String>,
    #[serde(default)]
    pub permissions: PermissionSet,
}

/// Resolved `(user, owner)` password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub owner: String,
}

impl ProtectOptions {
    /// At least one password is required; the owner password falls back to
    /// the user password, and a missing user password means "opens freely".
    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.user_password, &self.owner_password) {
            (None, None) => Err(FolioError::InvalidParameters(
                "at least one of user_password or owner_password must be provided".into(),
            )),
            (Some(user), None) => Ok(Credentials {
                user: user.clone(),
                owner: user.clone(),
            }),
            (user, Some(owner)) => Ok(Credentials {
                user: user.clone().unwrap_or_default(),
                owner: owner.clone(),
            }),
        }
    }
}

// -- Overlays -----------------------------------------------------------------

/// Anchor for page-number captions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl NumberPosition {
    pub const ALL: [NumberPosition; 6] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Fixed baseline origin on the numbering canvas.
    pub fn anchor(&self) -> (f32, f32) {
        match self {
            Self::TopLeft => (50.0, 800.0),
            Self::TopCenter => (300.0, 800.0),
            Self::TopRight => (550.0, 800.0),
            Self::BottomLeft => (50.0, 50.0),
            Self::BottomCenter => (300.0, 50.0),
            Self::BottomRight => (550.0, 50.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl FromStr for NumberPosition {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                FolioError::InvalidParameters(format!(
                    "position must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// Parameters of `add_page_numbers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageNumberOptions {
    pub position: NumberPosition,
    pub start_number: i64,
    /// Template with `{page_num}` and `{total_pages}` placeholders.
    pub format: String,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            position: NumberPosition::default(),
            start_number: 1,
            format: "Page {page_num}".to_string(),
        }
    }
}

impl PageNumberOptions {
    /// Render the caption for the zero-based page `index`. Numbers past
    /// `i64::MAX` stick there.
    pub fn caption(&self, index: usize, total_pages: usize) -> String {
        let offset = i64::try_from(index).unwrap_or(i64::MAX);
        let number = self.start_number.saturating_add(offset);
        self.format
            .replace("{page_num}", &number.to_string())
            .replace("{total_pages}", &total_pages.to_string())
    }
}

/// Watermark layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    #[default]
    Center,
    Tiled,
}

impl FromStr for WatermarkPosition {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "center" => Ok(Self::Center),
            "tiled" => Ok(Self::Tiled),
            _ => Err(FolioError::InvalidParameters(
                "position must be one of: center, tiled".into(),
            )),
        }
    }
}

/// Watermark parameters as supplied by the caller. Exactly one of `text` and
/// `image` must be set; see [`WatermarkSpec::content`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkSpec {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default = "WatermarkSpec::default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub position: WatermarkPosition,
    /// Counter-clockwise rotation in degrees, pivoted at the page centre.
    #[serde(default)]
    pub rotation: f32,
}

/// The validated payload of a [`WatermarkSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatermarkContent<'a> {
    Text(&'a str),
    Image(&'a Path),
}

impl WatermarkSpec {
    fn default_opacity() -> f32 {
        0.3
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
            opacity: Self::default_opacity(),
            position: WatermarkPosition::default(),
            rotation: 0.0,
        }
    }

    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self {
            text: None,
            image: Some(path.into()),
            opacity: Self::default_opacity(),
            position: WatermarkPosition::default(),
            rotation: 0.0,
        }
    }

    /// Validate the spec and return its payload.
    pub fn content(&self) -> Result<WatermarkContent<'_>> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(FolioError::InvalidParameters(format!(
                "opacity must be within 0.0..=1.0, got {}",
                self.opacity
            )));
        }
        if !self.rotation.is_finite() {
            return Err(FolioError::InvalidParameters(
                "rotation must be a finite number of degrees".into(),
            ));
        }
        match (&self.text, &self.image) {
            (Some(text), None) => Ok(WatermarkContent::Text(text)),
            (None, Some(image)) => Ok(WatermarkContent::Image(image)),
            (None, None) => Err(FolioError::InvalidParameters(
                "either watermark text or watermark image must be provided".into(),
            )),
            (Some(_), Some(_)) => Err(FolioError::InvalidParameters(
                "watermark text and watermark image are mutually exclusive".into(),
            )),
        }
    }
}

// -- Compression --------------------------------------------------------------

/// Compression tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionQuality {
    Low,
    #[default]
    Medium,
    High,
}

/// What a compression tier translates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionProfile {
    /// JPEG quality (0-100) used when re-encoding embedded images.
    pub image_quality: u8,
    pub strip_metadata: bool,
}

impl CompressionQuality {
    pub fn profile(&self) -> CompressionProfile {
        match self {
            Self::Low => CompressionProfile {
                image_quality: 30,
                strip_metadata: true,
            },
            Self::Medium => CompressionProfile {
                image_quality: 60,
                strip_metadata: false,
            },
            Self::High => CompressionProfile {
                image_quality: 90,
                strip_metadata: false,
            },
        }
    }
}

impl FromStr for CompressionQuality {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(FolioError::InvalidParameters(
                "quality must be one of: low, medium, high".into(),
            )),
        }
    }
}

// -- Input formats ------------------------------------------------------------

/// Families of input accepted by `convert_to_pdf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Image,
    Text,
    Office,
}

impl InputFormat {
    /// Infer the format family from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tif" | "tiff" | "webp" => Some(Self::Image),
            "txt" | "text" | "md" | "markdown" | "csv" | "log" => Some(Self::Text),
            "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt" | "ods" | "odp" | "rtf"
            | "html" | "htm" => Some(Self::Office),
            _ => None,
        }
    }

    /// Infer the format family from a path, failing with `UnsupportedFormat`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            FolioError::UnsupportedFormat(if ext.is_empty() {
                format!("{} has no file extension", path.display())
            } else {
                format!(".{ext}")
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ranges() {
        assert_eq!(PageRange::parse("1-5").unwrap(), PageRange { start: 1, end: 5 });
        assert_eq!(PageRange::parse(" 6 - 12 ").unwrap(), PageRange { start: 6, end: 12 });
        let list = PageRange::parse_list("1-5,6-10, 11-15").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[2], PageRange { start: 11, end: 15 });
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        for bad in ["5", "a-b", "0-3", "4-2", "1-2-3", ""] {
            assert!(
                matches!(PageRange::parse(bad), Err(FolioError::InvalidRange(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(PageRange::parse_list(" , ").is_err());
    }

    #[test]
    fn resolve_clamps_end_to_page_count() {
        let range = PageRange::new(6, 12).unwrap();
        assert_eq!(range.resolve(10), Some(5..=9));
    }

    #[test]
    fn resolve_drops_ranges_outside_the_document() {
        assert_eq!(PageRange::new(11, 15).unwrap().resolve(10), None);
        assert_eq!(PageRange::new(1, 3).unwrap().resolve(0), None);
        assert_eq!(PageRange::new(10, 10).unwrap().resolve(10), Some(9..=9));
    }

    #[test]
    fn rotation_accepts_quarter_turns_only() {
        assert_eq!(Rotation::try_from(90).unwrap(), Rotation::Quarter);
        assert!(Rotation::try_from(45).is_err());
        assert!(Rotation::try_from(0).is_err());
        assert!(Rotation::try_from(360).is_err());
    }

    #[test]
    fn rotations_compose_modulo_360() {
        let once = Rotation::Quarter.apply_to(0);
        assert_eq!(Rotation::ThreeQuarter.apply_to(once), 0);
        assert_eq!(Rotation::Half.apply_to(270), 90);
        assert_eq!(Rotation::Quarter.apply_to(-90), 0);
    }

    #[test]
    fn zero_margins_leave_box_unchanged() {
        let page = PageBox::from_size(612.0, 792.0);
        assert_eq!(page.shrink(&CropMargins::default()), Some(page));
    }

    #[test]
    fn degenerate_crop_is_refused() {
        let page = PageBox::from_size(100.0, 100.0);
        let margins = CropMargins {
            left: 60.0,
            right: 40.0,
            ..Default::default()
        };
        assert_eq!(page.shrink(&margins), None);
    }

    #[test]
    fn owner_password_defaults_to_user_password() {
        let opts = ProtectOptions {
            user_password: Some("x".into()),
            ..Default::default()
        };
        let creds = opts.credentials().unwrap();
        assert_eq!(creds.owner, "x");
        assert_eq!(creds.user, "x");
    }

    #[test]
    fn owner_only_protection_opens_freely() {
        let opts = ProtectOptions {
            owner_password: Some("boss".into()),
            ..Default::default()
        };
        let creds = opts.credentials().unwrap();
        assert_eq!(creds.user, "");
        assert_eq!(creds.owner, "boss");
    }

    #[test]
    fn protect_requires_a_password() {
        assert!(matches!(
            ProtectOptions::default().credentials(),
            Err(FolioError::InvalidParameters(_))
        ));
    }

    #[test]
    fn permissions_default_to_all_allowed() {
        let perms: PermissionSet = serde_json::from_str("{}").unwrap();
        assert_eq!(perms, PermissionSet::all());
        let perms: PermissionSet = serde_json::from_str(r#"{"print": false}"#).unwrap();
        assert!(!perms.print);
        assert!(perms.copy);
    }

    #[test]
    fn watermark_needs_exactly_one_payload() {
        let mut spec = WatermarkSpec::text("DRAFT");
        assert_eq!(spec.content().unwrap(), WatermarkContent::Text("DRAFT"));

        spec.text = None;
        assert!(matches!(spec.content(), Err(FolioError::InvalidParameters(_))));

        spec.text = Some("DRAFT".into());
        spec.image = Some(PathBuf::from("logo.png"));
        assert!(spec.content().is_err());
    }

    #[test]
    fn watermark_opacity_is_bounded() {
        let mut spec = WatermarkSpec::text("DRAFT");
        spec.opacity = 1.5;
        assert!(spec.content().is_err());
    }

    #[test]
    fn caption_template_substitution() {
        let opts = PageNumberOptions {
            start_number: 5,
            format: "{page_num} / {total_pages}".into(),
            ..Default::default()
        };
        assert_eq!(opts.caption(0, 3), "5 / 3");
        assert_eq!(opts.caption(2, 3), "7 / 3");
        assert_eq!(PageNumberOptions::default().caption(0, 1), "Page 1");
    }

    #[test]
    fn caption_numbers_saturate_near_the_top_of_the_range() {
        let opts = PageNumberOptions {
            start_number: i64::MAX - 1,
            format: "{page_num}".into(),
            ..Default::default()
        };
        assert_eq!(opts.caption(0, 3), (i64::MAX - 1).to_string());
        assert_eq!(opts.caption(1, 3), i64::MAX.to_string());
        assert_eq!(opts.caption(2, 3), i64::MAX.to_string());
        assert_eq!(opts.caption(usize::MAX, 3), i64::MAX.to_string());
    }

    #[test]
    fn positions_parse_from_kebab_case() {
        assert_eq!(
            "top-right".parse::<NumberPosition>().unwrap(),
            NumberPosition::TopRight
        );
        assert!("middle".parse::<NumberPosition>().is_err());
        assert_eq!("tiled".parse::<WatermarkPosition>().unwrap(), WatermarkPosition::Tiled);
        assert!("diagonal".parse::<WatermarkPosition>().is_err());
    }

    #[test]
    fn compression_tiers() {
        assert!(CompressionQuality::Low.profile().strip_metadata);
        assert!(!CompressionQuality::Medium.profile().strip_metadata);
        assert_eq!(CompressionQuality::High.profile().image_quality, 90);
        assert!("ultra".parse::<CompressionQuality>().is_err());
    }

    #[test]
    fn input_format_from_extension() {
        assert_eq!(InputFormat::from_extension("PNG"), Some(InputFormat::Image));
        assert_eq!(InputFormat::from_extension("txt"), Some(InputFormat::Text));
        assert_eq!(InputFormat::from_extension("docx"), Some(InputFormat::Office));
        assert_eq!(InputFormat::from_extension("exe"), None);
        assert!(matches!(
            InputFormat::from_path(Path::new("notes")),
            Err(FolioError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn letter_is_exact_in_points() {
        assert_eq!(PaperSize::Letter.dimensions_pt(), (612.0, 792.0));
    }
}
