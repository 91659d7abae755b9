use std::path::PathBuf;

use anyhow::Result;
use log::{debug, error, info, warn};
use rayon::prelude::*;

use super::Job;
use crate::error::{ErrorKind, classify};

/// A file that did not produce output
#[derive(Debug, Clone)]
pub struct Failure {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of a batch; one bad file never stops the others
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Results of the jobs that succeeded, in job order
    pub completed: Vec<T>,
    /// Degenerate inputs that were left alone
    pub skipped: Vec<Failure>,
    /// Jobs that failed
    pub failed: Vec<Failure>,
}

impl<T> BatchReport<T> {
    /// True if no job failed (skips are fine)
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Log the totals and every failure
    pub fn log_summary(&self, action: &str) {
        info!(
            "{} {} file(s), skipped {}, failed {}",
            action,
            self.completed.len(),
            self.skipped.len(),
            self.failed.len()
        );
        for failure in &self.failed {
            error!("  {}: {}", failure.path.display(), failure.message);
        }
    }
}

/// Run `op` on every job in parallel and sort the results into a report.
///
/// Fully transparent images are reported as skipped; every other error is a
/// failure.
pub fn run_batch<T, F>(jobs: &[Job], op: F) -> BatchReport<T>
where
    T: Send,
    F: Fn(&Job) -> Result<T> + Sync,
{
    let results: Vec<Result<T>> = jobs.par_iter().map(&op).collect();

    let mut report = BatchReport {
        completed: Vec::with_capacity(jobs.len()),
        skipped: Vec::new(),
        failed: Vec::new(),
    };

    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(value) => {
                debug!("Processed {}", job.name);
                report.completed.push(value);
            }
            Err(e) => {
                let failure = Failure {
                    path: job.source.clone(),
                    kind: classify(&e),
                    message: format!("{:#}", e),
                };
                if failure.kind == ErrorKind::DegenerateImage {
                    warn!("Skipping {}: {}", job.name, failure.message);
                    report.skipped.push(failure);
                } else {
                    error!("Failed {}: {}", job.name, failure.message);
                    report.failed.push(failure);
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;

    fn job(name: &str) -> Job {
        Job {
            name: name.to_string(),
            source: PathBuf::from(name),
            dest: PathBuf::from("out").join(name),
            mask: None,
            mask_dest: None,
        }
    }

    #[test]
    fn test_failures_are_isolated() {
        let jobs = vec![job("a.png"), job("b.png"), job("c.png"), job("d.png")];

        let report = run_batch(&jobs, |job| match job.name.as_str() {
            "b.png" => Err(PrepError::FullyTransparent {
                width: 4,
                height: 4,
            }
            .into()),
            "c.png" => Err(PrepError::MissingAlpha {
                color: "Rgb8".to_string(),
            }
            .into()),
            name => Ok(name.len()),
        });

        assert_eq!(report.completed, vec![5, 5]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, PathBuf::from("b.png"));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].kind, ErrorKind::InvalidInput);
        assert!(!report.is_success());
    }

    #[test]
    fn test_results_keep_job_order() {
        let jobs: Vec<_> = (0..64).map(|i| job(&format!("{i}.png"))).collect();

        let report = run_batch(&jobs, |job| Ok(job.name.clone()));

        let names: Vec<_> = jobs.iter().map(|j| j.name.clone()).collect();
        assert_eq!(report.completed, names);
        assert!(report.is_success());
    }

    #[test]
    fn test_untyped_errors_count_as_io() {
        let jobs = vec![job("a.png")];

        let report: BatchReport<()> = run_batch(&jobs, |_| Err(anyhow::anyhow!("disk full")));

        assert_eq!(report.failed[0].kind, ErrorKind::Io);
        assert_eq!(report.failed[0].message, "disk full");
    }
}
