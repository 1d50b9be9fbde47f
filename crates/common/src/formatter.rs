//! Progress and summary reporting for batch runs over example documents.

use tracing::{error, info};

/// Tally of a batch run; failed documents are listed again in the summary.
pub struct TestResult {
    tool_name: String,
    total: usize,
    processed: usize,
    failures: Vec<(String, String)>,
}

impl TestResult {
    pub fn new(tool_name: &str, total: usize) -> Self {
        info!("{}: processing {} schema documents", tool_name, total);
        info!("{}", "=".repeat(80));
        Self {
            tool_name: tool_name.to_string(),
            total,
            processed: 0,
            failures: Vec::new(),
        }
    }

    pub fn report_success(&mut self, file_name: &str, stats: Option<&str>) {
        self.processed += 1;
        match stats {
            Some(stats) => info!(
                "[{}/{}] ok {} ({})",
                self.processed, self.total, file_name, stats
            ),
            None => info!("[{}/{}] ok {}", self.processed, self.total, file_name),
        }
    }

    pub fn report_failure(&mut self, file_name: &str, reason: Option<&str>) {
        self.processed += 1;
        let reason = reason.unwrap_or("unknown error");
        error!("[{}/{}] FAILED {}: {}", self.processed, self.total, file_name, reason);
        self.failures.push((file_name.to_string(), reason.to_string()));
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.processed - self.failures.len()
    }

    /// Log the summary; `true` when every document succeeded.
    pub fn finish(self) -> bool {
        info!("{}", "=".repeat(80));
        info!(
            "{}: {} succeeded, {} failed, {} total",
            self.tool_name,
            self.succeeded(),
            self.failed(),
            self.total
        );
        for (file_name, reason) in &self.failures {
            error!("  {}: {}", file_name, reason);
        }
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_and_outcome() {
        let mut ok = TestResult::new("normalizer", 1);
        ok.report_success("a.json", Some("tables=2"));
        assert_eq!(ok.succeeded(), 1);
        assert!(ok.finish());

        let mut bad = TestResult::new("normalizer", 2);
        bad.report_success("a.json", None);
        bad.report_failure("b.json", Some("unknown attribute"));
        assert_eq!((bad.succeeded(), bad.failed()), (1, 1));
        assert!(!bad.finish());
    }
}
