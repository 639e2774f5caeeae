//! Target filters.
//!
//! A filter lists the accepted values per dimension. An absent list accepts
//! every value of that dimension, so the default filter matches all targets.

use serde::{Deserialize, Serialize};

use super::{Framework, Mode, Optimization, Platform, Target};

/// Per-dimension predicate over targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Vec<Platform>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<Vec<Optimization>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Vec<Mode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<Vec<Framework>>,
}

fn accepts<T: PartialEq>(allowed: &Option<Vec<T>>, value: &T) -> bool {
    allowed.as_ref().map_or(true, |values| values.contains(value))
}

impl TargetFilter {
    /// A filter that accepts every target.
    pub fn any() -> Self {
        TargetFilter::default()
    }

    pub fn with_platform(mut self, values: impl IntoIterator<Item = Platform>) -> Self {
        self.platform = Some(values.into_iter().collect());
        self
    }

    pub fn with_optimization(mut self, values: impl IntoIterator<Item = Optimization>) -> Self {
        self.optimization = Some(values.into_iter().collect());
        self
    }

    pub fn with_mode(mut self, values: impl IntoIterator<Item = Mode>) -> Self {
        self.mode = Some(values.into_iter().collect());
        self
    }

    pub fn with_framework(mut self, values: impl IntoIterator<Item = Framework>) -> Self {
        self.framework = Some(values.into_iter().collect());
        self
    }

    /// Check whether the target satisfies every constrained dimension.
    pub fn matches(&self, target: &Target) -> bool {
        accepts(&self.platform, &target.platform)
            && accepts(&self.optimization, &target.optimization)
            && accepts(&self.mode, &target.mode)
            && accepts(&self.framework, &target.framework)
    }

    /// True when no dimension is constrained.
    pub fn is_any(&self) -> bool {
        self.platform.is_none()
            && self.optimization.is_none()
            && self.mode.is_none()
            && self.framework.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(opt: Optimization, mode: Mode) -> Target {
        Target::new(Platform::Win64, opt, mode, Framework::Vs2019)
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = TargetFilter::any();
        assert!(filter.is_any());
        assert!(filter.matches(&target(Optimization::Debug, Mode::Game)));
        assert!(filter.matches(&target(Optimization::Retail, Mode::Editor)));
    }

    #[test]
    fn test_filter_constrains_each_dimension() {
        let filter = TargetFilter::any()
            .with_optimization([Optimization::Debug])
            .with_mode([Mode::Editor]);

        assert!(filter.matches(&target(Optimization::Debug, Mode::Editor)));
        assert!(!filter.matches(&target(Optimization::Debug, Mode::Game)));
        assert!(!filter.matches(&target(Optimization::Release, Mode::Editor)));
    }

    #[test]
    fn test_filter_from_toml() {
        let filter: TargetFilter =
            toml::from_str("optimization = [\"release\", \"retail\"]").unwrap();
        assert!(!filter.matches(&target(Optimization::Debug, Mode::Game)));
        assert!(filter.matches(&target(Optimization::Retail, Mode::Game)));
    }

    #[test]
    fn test_filter_rejects_unknown_dimension() {
        let result: Result<TargetFilter, _> = toml::from_str("arch = [\"x86\"]");
        assert!(result.is_err());
    }
}
