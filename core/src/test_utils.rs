use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::process::{CommandOutput, CommandRunner, ExternalCommand};

/// A fresh folder under the system temp dir, removed on drop.
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub(crate) fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "vulkan-shader-embed-{name}-{pid}",
            pid = std::process::id()
        ));
        if path.exists() {
            fs::remove_dir_all(&path).unwrap();
        }
        fs::create_dir_all(&path).unwrap();

        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn write(&self, name: &str, content: &[u8]) {
        fs::write(self.path.join(name), content).unwrap();
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Stands in for git, cmake, make and glslangValidator. Records every
/// command line, and "compiles" a shader by writing its canned artifact
/// to the `-o` path.
#[derive(Default)]
pub(crate) struct FakeRunner {
    pub(crate) commands: Vec<String>,
    artifacts: HashMap<String, Vec<u8>>,
    fail_on: Option<String>,
}

impl FakeRunner {
    pub(crate) fn failing_on(program: &str) -> Self {
        Self {
            fail_on: Some(program.to_owned()),
            ..Default::default()
        }
    }

    pub(crate) fn with_artifact(mut self, shader: &str, bytes: &[u8]) -> Self {
        self.artifacts.insert(shader.to_owned(), bytes.to_vec());
        self
    }
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, command: &ExternalCommand) -> Result<CommandOutput> {
        self.commands.push(command.to_string());

        let program = Path::new(command.program());
        let program_name = program.file_name().unwrap().to_string_lossy();

        if let Some(fail_on) = &self.fail_on {
            if program_name == fail_on.as_str() {
                return Ok(CommandOutput {
                    status: Some(1),
                    stdout: String::new(),
                    stderr: format!("{fail_on} failed"),
                });
            }
        }

        if program_name == "glslangValidator" {
            let args = command.args();
            let source = Path::new(&args[1]);
            let output = Path::new(&args[3]);
            let shader = source.file_name().unwrap().to_string_lossy().into_owned();
            let bytes = self.artifacts.get(&shader).cloned().unwrap_or_default();
            fs::write(output, bytes)?;
        }

        Ok(CommandOutput {
            status: Some(0),
            ..Default::default()
        })
    }
}
