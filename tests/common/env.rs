//! Test environment builder for isolated nyo testing.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ssh_key::rand_core::OsRng;
use ssh_key::{Algorithm, LineEnding, PrivateKey};
use tempfile::TempDir;

/// Environment variables that would leak the developer's setup into a test
const NYO_VARS: &[&str] = &[
    "NYO_CONNECT_TIMEOUT",
    "NYO_COMMAND_TIMEOUT",
    "NYO_REGISTRY_PATH",
    "NYO_SSH_CONFIG",
    "NYO_KNOWN_HOSTS",
    "NYO_HOST_KEY_POLICY",
    "NYO_MAX_PARALLEL_NODES",
];

/// Result of running the nyo binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Isolated project directory and home directory
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    nyo_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
            home_dir: tempfile::tempdir().unwrap(),
            nyo_bin: PathBuf::from(env!("CARGO_BIN_EXE_nyo")),
        }
    }

    /// Environment with `Nyo.toml` written to the project root
    pub fn with_project(document: &str) -> Self {
        let env = Self::new();
        env.write_project_file("Nyo.toml", document);
        env
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn home_path(&self, relative: &str) -> PathBuf {
        self.home_dir.path().join(relative)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        write_file(&self.project_path(relative), content.as_bytes());
    }

    pub fn write_home_file(&self, relative: &str, content: &str) {
        write_file(&self.home_path(relative), content.as_bytes());
    }

    /// Write `~/.ssh/config` and a fresh unencrypted `~/.ssh/id_ed25519`.
    pub fn write_ssh_setup(&self, config: &str) -> PrivateKey {
        let key = PrivateKey::random(&mut OsRng, Algorithm::Ed25519).unwrap();
        let pem = key.to_openssh(LineEnding::LF).unwrap();
        write_file(&self.home_path(".ssh/id_ed25519"), pem.as_bytes());
        self.write_home_file(".ssh/config", config);
        key
    }

    /// Run nyo from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.nyo_bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .with_test_home(self.home_dir.path())
            .env("NYO_LOG", "warn");
        for var in NYO_VARS {
            cmd.env_remove(var);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute nyo");
        to_result(output)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Home directory isolation for child processes
pub trait TestHomeExt {
    fn with_test_home(&mut self, home: &Path) -> &mut Self;
}

impl TestHomeExt for Command {
    fn with_test_home(&mut self, home: &Path) -> &mut Self {
        self.env("HOME", home)
            .env("USERPROFILE", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("NYO_TEST_HOME", home)
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create directories");
    }
    std::fs::write(path, content).expect("failed to write file");
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
