/// Minification filter of the render target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MinFilter {
    /// Trilinear: linear within a level, linear between mip levels.
    #[default]
    LinearMipmapLinear,
    /// Linear on the base level only.
    Linear,
}

impl MinFilter {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            MinFilter::LinearMipmapLinear => MinFilter::Linear,
            MinFilter::Linear => MinFilter::LinearMipmapLinear,
        }
    }

    #[inline]
    pub fn uses_mipmaps(self) -> bool {
        matches!(self, MinFilter::LinearMipmapLinear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_returns() {
        let f = MinFilter::default();
        assert!(f.uses_mipmaps());
        assert_eq!(f.toggled(), MinFilter::Linear);
        assert!(!f.toggled().uses_mipmaps());
        assert_eq!(f.toggled().toggled(), f);
    }
}
