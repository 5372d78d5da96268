use std::path::{Path, PathBuf};

/// Short code identifying a completed pipeline step, embedded in artifact
/// file names.
pub type StepTag = &'static str;

/// Ordered accumulator of applied step tags.
///
/// The tag sequence is the single source of truth for artifact naming: every
/// persistence point derives its file name here, so a final file name is a
/// legible audit trail of exactly which steps ran and in what order, e.g.
/// `target_UC_BE_PS_CR_SPCC_ST_Curves_Adj.fit`.
#[derive(Clone, Debug, Default)]
pub struct StepTracker {
    tags: Vec<StepTag>,
}

impl StepTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed step. Append-only during a run; duplicates are
    /// allowed since steps may be revisited.
    pub fn append(&mut self, tag: StepTag) {
        self.tags.push(tag);
    }

    pub fn contains(&self, tag: StepTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &[StepTag] {
        &self.tags
    }

    /// Clear all tags. Called exactly once at the start of a run so a
    /// long-lived session can run repeatedly.
    pub fn reset(&mut self) {
        self.tags.clear();
    }

    /// Derive the artifact name for the current tag sequence: the base stem
    /// joined with every tag in order, then the base extension or an explicit
    /// override suffix (e.g. ".tif" for the lossless interchange file).
    ///
    /// With no tags applied the base path comes back unchanged.
    pub fn artifact_name(&self, base: &Path, suffix: Option<&str>) -> PathBuf {
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = match suffix {
            Some(s) => s.to_string(),
            None => base
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        };

        let name = if self.tags.is_empty() {
            format!("{stem}{extension}")
        } else {
            format!("{stem}_{}{extension}", self.tags.join("_"))
        };

        match base.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}
