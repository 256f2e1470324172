//! Report pipeline orchestration.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::model::Portfolio;
use crate::report;
use crate::table::RawTables;

/// Owns the three export paths and the output directory for one report run.
///
/// The pipeline is linear: load the raw tables, clean them into a typed
/// portfolio, render and write the dated report. It either completes
/// end-to-end or aborts on the first error; no partial report is produced.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    epics: PathBuf,
    features: PathBuf,
    dependencies: PathBuf,
    output_dir: PathBuf,
}

impl ReportBuilder {
    /// A builder over the three export files, writing into the current
    /// directory unless [`output_dir`](Self::output_dir) overrides it.
    pub fn new(
        epics: impl Into<PathBuf>,
        features: impl Into<PathBuf>,
        dependencies: impl Into<PathBuf>,
    ) -> Self {
        Self {
            epics: epics.into(),
            features: features.into(),
            dependencies: dependencies.into(),
            output_dir: PathBuf::from("."),
        }
    }

    /// Write the report into `dir` instead of the current directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Run the pipeline and return the path of the written report.
    pub fn build(&self) -> Result<PathBuf> {
        debug!(
            "building report from {}, {}, {}",
            self.epics.display(),
            self.features.display(),
            self.dependencies.display()
        );
        let raw = RawTables::load(&self.epics, &self.features, &self.dependencies)?;
        let portfolio = Portfolio::from_raw(&raw)?;
        report::write_report(&portfolio, &self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const EPICS_CSV: &str = "Id,Title,State,Blocked,MVP,Epic Progress,Program Increments\n\
        1,Auth,Open,No,Yes,0.5,\"PI1,PI2,PI3\"\n";
    const FEATURES_CSV: &str = "Title,Blocked,Feature Progress\nLogin,No,0.25\n";
    const DEPENDENCIES_CSV: &str = "Dependency ID,Title,Feature,Priority,Status,Needed By\n\
        10,DB setup,Login,Critical,Open,2024-01-01\n";

    fn write_exports(dir: &Path, epics: &str, features: &str, dependencies: &str) -> ReportBuilder {
        let epics_path = dir.join("epics.csv");
        let features_path = dir.join("features.csv");
        let dependencies_path = dir.join("dependencies.csv");
        fs::write(&epics_path, epics).unwrap();
        fs::write(&features_path, features).unwrap();
        fs::write(&dependencies_path, dependencies).unwrap();
        ReportBuilder::new(epics_path, features_path, dependencies_path).output_dir(dir)
    }

    fn report_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| {
                let path = entry.unwrap().path();
                let name = path.file_name()?.to_str()?;
                name.starts_with("Sample Report - ").then_some(path)
            })
            .collect()
    }

    #[test]
    fn test_build_writes_the_full_report() {
        let dir = TempDir::new().unwrap();
        let builder = write_exports(dir.path(), EPICS_CSV, FEATURES_CSV, DEPENDENCIES_CSV);

        let path = builder.build().unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.contains("This report contains data on: 1 Epics, 1 Features, and 1 Dependencies"));
        assert!(text.contains("The average overall Epic Progress is 50.00%"));
        assert!(text.contains("The average MVP Epic Progress is 50.00%"));
        assert!(text.contains("The average overall Feature Progress is 25.00%"));
        assert!(text.contains("No blocked Epics"));
        assert!(text.contains("No blocked Features"));
        assert!(text.contains("No blocked Dependencies"));
        assert!(text.contains(
            "Feature: Login\n\tDependency: ID 10, DB setup, Critical, Open, Needed By 01/01/2024"
        ));
        assert!(text.contains("Epic ID 1: Auth expected to be delivered in PI3"));
        assert!(text.contains("This report was generated on "));
    }

    #[test]
    fn test_missing_input_aborts_without_a_report() {
        let dir = TempDir::new().unwrap();
        let builder = ReportBuilder::new(
            dir.path().join("missing.csv"),
            dir.path().join("features.csv"),
            dir.path().join("dependencies.csv"),
        )
        .output_dir(dir.path());

        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::DataAccess { .. }));
        assert!(report_files(dir.path()).is_empty());
    }

    #[test]
    fn test_bad_cell_aborts_without_a_report() {
        let dir = TempDir::new().unwrap();
        let bad_features = "Title,Blocked,Feature Progress\nLogin,No,half\n";
        let builder = write_exports(dir.path(), EPICS_CSV, bad_features, DEPENDENCIES_CSV);

        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert!(report_files(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_column_aborts_without_a_report() {
        let dir = TempDir::new().unwrap();
        let no_progress = "Title,Blocked\nLogin,No\n";
        let builder = write_exports(dir.path(), EPICS_CSV, no_progress, DEPENDENCIES_CSV);

        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            Error::Schema {
                table: "Features",
                column: "Feature Progress"
            }
        ));
        assert!(report_files(dir.path()).is_empty());
    }
}
