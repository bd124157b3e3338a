//! Scale selection for height-bounded decoding
//!
//! Maps an image's intrinsic height against the caller's height budget
//! to one of the decode engine's four scale factors, and derives the
//! output-unit cap that bounds the engine's per-block scratch buffer.

/// Downscale factor applied by the decode engine during decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scale {
    /// Native resolution (divisor 1)
    Full,
    /// Half resolution (divisor 2)
    Half,
    /// Quarter resolution (divisor 4)
    Quarter,
    /// Eighth resolution (divisor 8)
    Eighth,
}

impl Scale {
    /// Integer divisor applied to the native image dimensions
    pub fn divisor(self) -> u32 {
        match self {
            Self::Full => 1,
            Self::Half => 2,
            Self::Quarter => 4,
            Self::Eighth => 8,
        }
    }

    /// Get a string representation of this scale
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Quarter => "quarter",
            Self::Eighth => "eighth",
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of scale selection: a scale factor plus the matching
/// output-unit cap for the decode engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePlan {
    /// Chosen downscale factor
    pub scale: Scale,
    /// Cap on the engine's block-processing units per decode pass
    pub max_output_units: u32,
}

/// Select the scale factor that fits `native_height` into `height_budget`
///
/// The first matching tier wins; boundary ratios (exactly 1, 2, 4) select
/// the less-aggressive tier. The unit cap grows with the divisor so the
/// engine's peak scratch memory stays roughly level across tiers: larger
/// downscales produce proportionally smaller output per unit.
///
/// The cap is clamped to at least 1 so a narrow width budget can never
/// configure the engine with a zero-unit buffer.
///
/// # Example
///
/// ```
/// use jpeg_draw::{fit_scale, Scale};
///
/// // 640 rows into a 160-row budget: ratio 4 stays in the quarter tier
/// let plan = fit_scale(640, 320, 160);
/// assert_eq!(plan.scale, Scale::Quarter);
/// assert_eq!(plan.max_output_units, 320 / 4);
/// ```
pub fn fit_scale(native_height: u32, width_budget: u32, height_budget: u32) -> ScalePlan {
    let ratio = native_height as f32 / height_budget as f32;
    let (scale, units) = if ratio <= 1.0 {
        (Scale::Full, width_budget / 16)
    } else if ratio <= 2.0 {
        (Scale::Half, width_budget / 8)
    } else if ratio <= 4.0 {
        (Scale::Quarter, width_budget / 4)
    } else {
        (Scale::Eighth, width_budget / 2)
    };

    ScalePlan {
        scale,
        max_output_units: units.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_per_ratio() {
        assert_eq!(fit_scale(100, 320, 160).scale, Scale::Full);
        assert_eq!(fit_scale(320, 320, 160).scale, Scale::Half);
        assert_eq!(fit_scale(640, 320, 160).scale, Scale::Quarter);
        assert_eq!(fit_scale(1280, 320, 160).scale, Scale::Eighth);
    }

    #[test]
    fn boundary_ratios_take_lower_tier() {
        // Exact ratios 1, 2, 4 must not spill into the next tier
        assert_eq!(fit_scale(160, 320, 160).scale, Scale::Full);
        assert_eq!(fit_scale(200, 320, 100).scale, Scale::Half);
        assert_eq!(fit_scale(400, 320, 100).scale, Scale::Quarter);
        // One row past the boundary does spill
        assert_eq!(fit_scale(201, 320, 100).scale, Scale::Quarter);
        assert_eq!(fit_scale(401, 320, 100).scale, Scale::Eighth);
    }

    #[test]
    fn unit_cap_per_tier() {
        assert_eq!(fit_scale(100, 320, 160).max_output_units, 20);
        assert_eq!(fit_scale(320, 320, 160).max_output_units, 40);
        assert_eq!(fit_scale(640, 320, 160).max_output_units, 80);
        assert_eq!(fit_scale(1280, 320, 160).max_output_units, 160);
    }

    #[test]
    fn unit_cap_positive_for_narrow_budgets() {
        assert_eq!(fit_scale(100, 16, 160).max_output_units, 1);
        // Below the full-tier unit width the cap clamps rather than hits zero
        assert_eq!(fit_scale(100, 8, 160).max_output_units, 1);
    }

    #[test]
    fn divisor_monotonic_in_height() {
        let mut prev = 0;
        for height in 1..=2048 {
            let divisor = fit_scale(height, 320, 160).scale.divisor();
            assert!(
                divisor >= prev,
                "divisor shrank at height {}: {} -> {}",
                height,
                prev,
                divisor
            );
            prev = divisor;
        }
    }

    #[test]
    fn portrait_fits_quarter_tier() {
        // 320x640 source into a 160-row budget
        let plan = fit_scale(640, 320, 160);
        assert_eq!(plan.scale, Scale::Quarter);
        assert_eq!(plan.max_output_units, 320 / 4);
    }
}
