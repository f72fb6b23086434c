//! Display information the provider needs for icon sizing

/// Source of the current display scale factor
pub trait DisplayContext: Send + Sync {
    fn scale_factor(&self) -> u32;
}

/// Constant scale factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScale(pub u32);

impl Default for FixedScale {
    fn default() -> Self {
        Self(1)
    }
}

impl DisplayContext for FixedScale {
    fn scale_factor(&self) -> u32 {
        // a zero scale would hide every icon
        self.0.max(1)
    }
}
