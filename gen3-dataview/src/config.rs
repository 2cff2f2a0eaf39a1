use crate::layout::Layout;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Skips the detector's verdict when set. Scores are still computed and reported.
    pub layout: Option<Layout>,
    /// Recompute section checksums at load. `Save::validate` always does.
    pub verify_checksums: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: None,
            verify_checksums: true,
        }
    }
}
