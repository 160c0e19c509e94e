//! Validated run plan: which files to ingest and how.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::IngestionJob;
use crate::errors::PipelineError;
use crate::source::DEFAULT_LIST_FIELD;
use bulk_indexer_shared::FileFormat;

/// Raw run parameters as collected from the command line and settings.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub file: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    /// Format for every file; classified per file when unset.
    pub format: Option<FileFormat>,
    /// Index given on the command line. Takes precedence over `config_index`.
    pub index: Option<String>,
    /// Index from the settings file.
    pub config_index: Option<String>,
    pub auto_index: bool,
    pub list_field: String,
    pub id_field: Option<String>,
    pub generate_ids: bool,
}

impl Default for PlanInput {
    fn default() -> Self {
        Self {
            file: None,
            dir: None,
            format: None,
            index: None,
            config_index: None,
            auto_index: false,
            list_field: DEFAULT_LIST_FIELD.to_string(),
            id_field: None,
            generate_ids: false,
        }
    }
}

/// Ordered list of files to ingest plus the settings shared by their jobs.
#[derive(Debug, Clone)]
pub struct IngestPlan {
    files: Vec<PathBuf>,
    fixed_index: Option<String>,
    format: Option<FileFormat>,
    list_field: String,
    id_field: Option<String>,
    generate_ids: bool,
}

impl IngestPlan {
    /// Validate `input` and enumerate the input files.
    ///
    /// Nothing here talks to the search engine. Directory contents are
    /// collected recursively, regular files only, sorted by path; a single
    /// `file` is appended after them.
    pub fn new(input: PlanInput) -> Result<Self, PipelineError> {
        let index = input.index.or(input.config_index);

        if index.is_none() && !input.auto_index {
            return Err(PipelineError::resolution(
                "You need to either set an index or set the `--auto-index` flag",
            ));
        }
        if input.file.is_none() && input.dir.is_none() {
            return Err(PipelineError::NoInput);
        }

        let mut files = match &input.dir {
            Some(dir) => list_files(dir)?,
            None => Vec::new(),
        };
        files.extend(input.file);

        // Files under a directory are routed by their own path
        let fixed_index = match input.dir {
            Some(_) => None,
            None => index,
        };

        debug!(
            files = files.len(),
            fixed_index = ?fixed_index,
            "Built ingest plan"
        );

        Ok(Self {
            files,
            fixed_index,
            format: input.format,
            list_field: input.list_field,
            id_field: input.id_field,
            generate_ids: input.generate_ids,
        })
    }

    /// Files in processing order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Index used for every file, if the run has one.
    pub fn fixed_index(&self) -> Option<&str> {
        self.fixed_index.as_deref()
    }

    /// Build the job for one file of this plan.
    pub fn job_for(&self, path: &Path) -> IngestionJob {
        IngestionJob::new(path)
            .with_format(self.format)
            .with_index(self.fixed_index.clone())
            .with_auto_index(self.fixed_index.is_none())
            .with_list_field(self.list_field.as_str())
            .with_id_field(self.id_field.clone())
            .with_generated_ids(self.generate_ids)
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| PipelineError::read(format!("{}: {}", dir.display(), e)))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn input() -> PlanInput {
        PlanInput {
            file: Some(PathBuf::from("results.txt")),
            index: Some("cli".to_string()),
            ..PlanInput::default()
        }
    }

    #[test]
    fn test_no_index_source_is_rejected() {
        let err = IngestPlan::new(PlanInput {
            index: None,
            ..input()
        })
        .unwrap_err();

        assert!(matches!(err, PipelineError::ResolutionError(_)));
        assert!(err.to_string().contains("--auto-index"));
    }

    #[test]
    fn test_no_input_is_rejected() {
        let err = IngestPlan::new(PlanInput {
            file: None,
            ..input()
        })
        .unwrap_err();

        assert!(matches!(err, PipelineError::NoInput));
    }

    #[test]
    fn test_cli_index_wins_over_config() {
        let plan = IngestPlan::new(PlanInput {
            config_index: Some("config".to_string()),
            ..input()
        })
        .unwrap();

        assert_eq!(plan.fixed_index(), Some("cli"));
        assert_eq!(plan.files(), &[PathBuf::from("results.txt")]);
    }

    #[test]
    fn test_config_index_is_used() {
        let plan = IngestPlan::new(PlanInput {
            index: None,
            config_index: Some("config".to_string()),
            ..input()
        })
        .unwrap();

        let mut job = plan.job_for(Path::new("results.txt"));
        assert_eq!(job.resolve_index().unwrap(), "config");
    }

    #[test]
    fn test_auto_index_per_file() {
        let plan = IngestPlan::new(PlanInput {
            file: Some(PathBuf::from("in/nuclei-1/output.txt")),
            index: None,
            auto_index: true,
            ..PlanInput::default()
        })
        .unwrap();

        assert_eq!(plan.fixed_index(), None);
        let mut job = plan.job_for(&plan.files()[0]);
        assert_eq!(job.resolve_index().unwrap(), "nuclei");
    }

    #[test]
    fn test_directory_is_walked_in_order() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("in").join("httpx-1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join("b.txt"), "x\n").unwrap();
        fs::write(root.path().join("a.txt"), "x\n").unwrap();
        fs::write(nested.join("out.json"), "{}\n").unwrap();

        let plan = IngestPlan::new(PlanInput {
            file: Some(PathBuf::from("extra.txt")),
            dir: Some(root.path().to_path_buf()),
            ..input()
        })
        .unwrap();

        assert_eq!(
            plan.files(),
            &[
                root.path().join("a.txt"),
                root.path().join("b.txt"),
                nested.join("out.json"),
                PathBuf::from("extra.txt"),
            ]
        );
        // A directory run routes each file by its own path
        assert_eq!(plan.fixed_index(), None);
        let mut job = plan.job_for(&nested.join("out.json"));
        assert_eq!(job.resolve_index().unwrap(), "httpx");
    }

    #[test]
    fn test_missing_directory_is_read_error() {
        let err = IngestPlan::new(PlanInput {
            file: None,
            dir: Some(PathBuf::from("/definitely/not/a/dir")),
            ..input()
        })
        .unwrap_err();

        assert!(matches!(err, PipelineError::ReadError(_)));
    }
}
