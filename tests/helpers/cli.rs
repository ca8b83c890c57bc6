use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary project directory to run the binary in
pub struct CliTestHelper {
    pub temp_dir: TempDir,
    pub project_root: PathBuf,
}

impl CliTestHelper {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project_root = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            project_root,
        }
    }

    /// Command for the binary, run from the project root with no ambient database
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pgbaseline").unwrap();
        cmd.current_dir(&self.project_root)
            .env_remove("DATABASE_URL")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.project_root.join("pgbaseline.yaml"), contents)
            .expect("Failed to write config file");
    }

    pub fn write_migration(&self, filename: &str, sql: &str) {
        let dir = self.project_root.join("migrations");
        fs::create_dir_all(&dir).expect("Failed to create migrations dir");
        fs::write(dir.join(filename), sql).expect("Failed to write migration");
    }
}
