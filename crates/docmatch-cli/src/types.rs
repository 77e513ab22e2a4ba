use std::path::PathBuf;

use docmatch_map::ValidationRun;

#[derive(Debug)]
pub struct DetectResult {
    pub input: PathBuf,
    pub run: ValidationRun,
    /// Required fields the written mapping does not cover.
    pub missing_required: Vec<String>,
    pub mapping_written: Option<PathBuf>,
    pub output_written: Option<PathBuf>,
}

impl DetectResult {
    pub fn has_errors(&self) -> bool {
        self.run.report.invalid_rows > 0
    }
}
