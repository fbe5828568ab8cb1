use serde::{Deserialize, Serialize};

/// Rendering theme a mockup was captured in. The ordering (`Light < Dark`)
/// is what the grouped trial ordering sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Light,
    Dark,
}

/// One image offered by an image source. Immutable once produced; the
/// survey core never rewrites descriptors, only wraps them in trials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Opaque locator understood by the presentation layer (URL, asset path).
    pub source: String,
    /// Identifier, unique within one survey.
    pub name: String,
    pub mode: DisplayMode,
}

impl ImageDescriptor {
    pub fn new(source: impl Into<String>, name: impl Into<String>, mode: DisplayMode) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            mode,
        }
    }
}

/// Which display modes a survey run admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyMode {
    Light,
    Dark,
    Both,
}

impl SurveyMode {
    pub fn admits(&self, mode: DisplayMode) -> bool {
        match self {
            SurveyMode::Light => mode == DisplayMode::Light,
            SurveyMode::Dark => mode == DisplayMode::Dark,
            SurveyMode::Both => true,
        }
    }
}

impl Default for SurveyMode {
    fn default() -> Self {
        SurveyMode::Both
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_admits_everything() {
        assert!(SurveyMode::Both.admits(DisplayMode::Light));
        assert!(SurveyMode::Both.admits(DisplayMode::Dark));
    }

    #[test]
    fn single_mode_filters() {
        assert!(SurveyMode::Dark.admits(DisplayMode::Dark));
        assert!(!SurveyMode::Dark.admits(DisplayMode::Light));
        assert!(!SurveyMode::Light.admits(DisplayMode::Dark));
    }

    #[test]
    fn light_sorts_before_dark() {
        assert!(DisplayMode::Light < DisplayMode::Dark);
    }
}
