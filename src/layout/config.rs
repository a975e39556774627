//! Layout geometry used by the page-number locator and resolver.

/// Geometry assumptions for page-number inference.
///
/// Coordinates are in the decoder's units with a top-down vertical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Assumed page height; candidates below `page_height / 2` are "bottom"
    pub page_height: f64,

    /// Fallback window: bottom conventions only accept tokens with `y > margin`
    pub margin: f64,

    /// Fallback window: top conventions accept tokens with `y < margin + top_band`
    pub top_band: f64,

    /// Fallback window: horizontal slack around the convention's x
    pub tolerance: f64,

    /// Relative centroid position below which the convention is "left"
    pub left_threshold: f64,

    /// Relative centroid position above which the convention is "right"
    pub right_threshold: f64,

    /// Exclusive upper bound for a resolved page number
    pub max_page_number: u32,
}

impl LayoutConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assumed page height.
    pub fn with_page_height(mut self, page_height: f64) -> Self {
        self.page_height = page_height;
        self
    }

    /// Set the fallback window margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the extra band a top convention accepts below the margin.
    pub fn with_top_band(mut self, top_band: f64) -> Self {
        self.top_band = top_band;
        self
    }

    /// Set the horizontal tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the left/right classification thresholds.
    pub fn with_horizontal_thresholds(mut self, left: f64, right: f64) -> Self {
        self.left_threshold = left;
        self.right_threshold = right;
        self
    }

    /// Set the exclusive upper bound for page numbers.
    pub fn with_max_page_number(mut self, max: u32) -> Self {
        self.max_page_number = max;
        self
    }

    /// Whether `n` is an acceptable printed page number.
    pub fn accepts_page_number(&self, n: u64) -> bool {
        n > 0 && n < u64::from(self.max_page_number)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_height: 800.0,
            margin: 75.0,
            top_band: 100.0,
            tolerance: 30.0,
            left_threshold: 0.33,
            right_threshold: 0.66,
            max_page_number: 10_000,
        }
    }
}
