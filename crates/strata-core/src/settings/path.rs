//! Setting path parsing.
//!
//! Paths address nested objects inside a settings document. Segments are
//! separated by `.` or `/`, which may be mixed: `"Filters/Clip.Scalars"`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SettingPath {
    segments: Vec<String>,
}

impl SettingPath {
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split(['.', '/'])
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a single segment, kept verbatim even if it contains delimiters.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        let segment = segment.into();
        if !segment.is_empty() {
            segments.push(segment);
        }
        Self { segments }
    }
}

impl fmt::Display for SettingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for SettingPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for SettingPath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&SettingPath> for SettingPath {
    fn from(path: &SettingPath) -> Self {
        path.clone()
    }
}
