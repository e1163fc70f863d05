//! Filesystem archive for final evaluation reports.
//!
//! Reports land in `{data_dir}/interview-logs/{name}-{key}-log.md`, one file
//! per applicant. A later interview by the same applicant overwrites it.
//! Both parts are escaped so that `-` only ever appears as the separator and
//! distinct identities never share a file.

use std::path::{Path, PathBuf};

use hireloop_core::storage::archive::EvaluationArchive;
use hireloop_types::error::RepositoryError;
use hireloop_types::inbound::ApplicantIdentity;

/// Writes evaluation reports as markdown files.
pub struct FileEvaluationArchive {
    dir: PathBuf,
}

impl FileEvaluationArchive {
    /// Archive rooted at `{data_dir}/interview-logs`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("interview-logs"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report for `applicant`.
    pub fn report_path(&self, applicant: &ApplicantIdentity) -> PathBuf {
        self.dir.join(format!(
            "{}-{}-log.md",
            escape(&applicant.name),
            escape(&applicant.key)
        ))
    }
}

/// Keep ASCII alphanumerics and `_`; every other byte becomes `%XX`.
fn escape(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for byte in part.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

impl EvaluationArchive for FileEvaluationArchive {
    async fn save(&self, applicant: &ApplicantIdentity, report: &str) -> Result<(), RepositoryError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            RepositoryError::FileSystem(format!("create {}: {e}", self.dir.display()))
        })?;

        let path = self.report_path(applicant);
        tokio::fs::write(&path, report)
            .await
            .map_err(|e| RepositoryError::FileSystem(format!("write {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "saved evaluation report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn writes_report_under_interview_logs() {
        let tmp = TempDir::new().unwrap();
        let archive = FileEvaluationArchive::new(tmp.path());
        let applicant = ApplicantIdentity::new("Foo Bar", "abc");

        archive.save(&applicant, "# Evaluation\nStrong hire.").await.unwrap();

        let path = tmp.path().join("interview-logs").join("Foo%20Bar-abc-log.md");
        assert_eq!(archive.report_path(&applicant), path);
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "# Evaluation\nStrong hire.");
    }

    #[tokio::test]
    async fn later_report_replaces_earlier() {
        let tmp = TempDir::new().unwrap();
        let archive = FileEvaluationArchive::new(tmp.path());
        let applicant = ApplicantIdentity::new("Foo", "abc");

        archive.save(&applicant, "first").await.unwrap();
        archive.save(&applicant, "second").await.unwrap();

        let content = tokio::fs::read_to_string(archive.report_path(&applicant))
            .await
            .unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn path_separators_are_neutralized() {
        let archive = FileEvaluationArchive::new(Path::new("/data"));
        let applicant = ApplicantIdentity::new("../etc", "a/b");
        let path = archive.report_path(&applicant);
        assert_eq!(
            path,
            Path::new("/data/interview-logs/%2E%2E%2Fetc-a%2Fb-log.md")
        );
    }

    #[tokio::test]
    async fn distinct_applicants_never_share_a_report() {
        let tmp = TempDir::new().unwrap();
        let archive = FileEvaluationArchive::new(tmp.path());
        let first = ApplicantIdentity::new("Foo-Bar", "x");
        let second = ApplicantIdentity::new("Foo", "Bar-x");

        assert_ne!(archive.report_path(&first), archive.report_path(&second));
        assert_ne!(
            archive.report_path(&ApplicantIdentity::new("Foo", "k.1")),
            archive.report_path(&ApplicantIdentity::new("Foo", "k_1"))
        );

        archive.save(&first, "report A").await.unwrap();
        archive.save(&second, "report B").await.unwrap();
        let content = tokio::fs::read_to_string(archive.report_path(&first))
            .await
            .unwrap();
        assert_eq!(content, "report A");
    }

    #[test]
    fn escaping_keeps_plain_names_readable() {
        assert_eq!(escape("Ada_Lovelace42"), "Ada_Lovelace42");
        assert_eq!(escape("a-b"), "a%2Db");
        assert_eq!(escape("é"), "%C3%A9");
    }

    #[tokio::test]
    async fn unwritable_dir_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        tokio::fs::write(&blocker, "x").await.unwrap();

        let archive = FileEvaluationArchive::new(&blocker);
        let err = archive
            .save(&ApplicantIdentity::new("Foo", "abc"), "report")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::FileSystem(_)));
    }
}
