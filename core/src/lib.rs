//! Compiles the Vulkan shaders of a project to SPIR-V with glslang and embeds
//! the binaries in a generated C++ header/source pair.
//!
//! ```rust,no_run
//! use vulkan_shader_embed::{run, Config, SystemRunner};
//!
//! let config = Config::new("/path/to/gepard");
//! let generated = run(&config, &mut SystemRunner).unwrap();
//! println!("{}", generated.header_path.display());
//! ```

use anyhow::Result;
use log::info;

pub mod artifact;
pub mod config;
pub mod emit;
pub mod naming;
pub mod process;
pub mod sources;
#[cfg(test)]
mod test_utils;
pub mod toolchain;

pub use artifact::SpirvArtifact;
pub use config::{Config, WordFormat};
pub use emit::GeneratedPair;
pub use naming::normalize_shader_name;
pub use process::{CommandFailed, CommandOutput, CommandRunner, ExternalCommand, SystemRunner};

/// Provisions glslang, compiles every shader of the shader folder, then
/// writes the generated header and source. Stops at the first failure,
/// in which case the generated files are left untouched.
pub fn run<R: CommandRunner + ?Sized>(config: &Config, runner: &mut R) -> Result<GeneratedPair> {
    if config.skip_provision {
        info!("Skipping glslang provisioning");
    } else {
        toolchain::prepare_glslang(config, runner)?;
    }

    let shaders = sources::collect_shader_sources(&config.shader_source_directory)?;
    info!(
        "Found {count} shaders in {path}",
        count = shaders.len(),
        path = config.display_path(&config.shader_source_directory)
    );

    for shader in &shaders {
        sources::compile_shader(config, runner, shader)?;
    }

    let sizes = artifact::spirv_sizes(config, &shaders)?;
    let artifacts = artifact::read_artifacts(config, &sizes)?;

    emit::write_generated(config, &artifacts)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_utils::{FakeRunner, ScratchDir};

    fn project(name: &str) -> (ScratchDir, Config) {
        let scratch = ScratchDir::new(name);
        let config = Config::new(scratch.path()).with_generator("test");
        fs::create_dir_all(&config.shader_source_directory).unwrap();
        fs::write(config.shader_path("a.vert"), "void main() {}").unwrap();
        fs::write(config.shader_path("b.frag"), "void main() {}").unwrap();
        fs::write(config.shader_path("notes.txt"), "not a shader").unwrap();

        (scratch, config)
    }

    fn runner() -> FakeRunner {
        FakeRunner::default()
            .with_artifact("a.vert", &[1, 2, 3, 4, 0xff, 0, 0, 0])
            .with_artifact("b.frag", &[0x03, 0x02, 0x23, 0x07])
    }

    #[test]
    fn test_end_to_end() {
        let (_scratch, config) = project("run-end-to-end");
        let mut runner = runner();

        let generated = run(&config, &mut runner).unwrap();

        let header = fs::read_to_string(&generated.header_path).unwrap();
        let source = fs::read_to_string(&generated.source_path).unwrap();

        assert!(header.contains("extern const uint32_t aVert[2];\n"));
        assert!(header.contains("extern const uint32_t bFrag[1];\n"));
        assert!(source.contains("const uint32_t aVert[2] = {\n    67305985,\n    255,\n};\n"));
        assert!(source.contains("const uint32_t bFrag[1] = {\n    119734787,\n};\n"));

        let warning = "/* This file was auto-generated by test! */\n\n";
        assert!(header.starts_with(warning));
        assert!(source.starts_with(warning));
        let namespaces = "namespace gepard {\nnamespace vulkan {\n\n";
        let closing = "} // namespace vulkan\n} // namespace gepard\n";
        assert!(header.contains(namespaces) && header.contains(closing));
        assert!(source.contains(namespaces) && source.ends_with(closing));
        assert!(header.starts_with(
            "/* This file was auto-generated by test! */\n\n\n#ifndef GEPARD_VULKAN_SPIRV_BINARIES_H\n"
        ));
        assert!(header.ends_with("#endif // GEPARD_VULKAN_SPIRV_BINARIES_H\n"));

        // clone, configure, build, then one compilation per shader
        assert_eq!(runner.commands.len(), 5);
        assert!(runner.commands[0].starts_with("git clone "));
        assert!(runner.commands[3].contains("a.vert"));
        assert!(runner.commands[4].contains("b.frag"));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let (_scratch, config) = project("run-idempotent");

        let first = run(&config, &mut runner()).unwrap();
        let header = fs::read(&first.header_path).unwrap();
        let source = fs::read(&first.source_path).unwrap();

        let second = run(&config, &mut runner()).unwrap();

        assert_eq!(fs::read(&second.header_path).unwrap(), header);
        assert_eq!(fs::read(&second.source_path).unwrap(), source);
    }

    #[test]
    fn test_skip_provision() {
        let (_scratch, config) = project("run-skip-provision");
        let config = config.with_skip_provision(true);
        let mut runner = runner();

        run(&config, &mut runner).unwrap();

        assert_eq!(runner.commands.len(), 2);
        assert!(runner
            .commands
            .iter()
            .all(|command| command.contains("glslangValidator")));
    }

    #[test]
    fn test_compile_failure_writes_nothing() {
        let (_scratch, config) = project("run-compile-failure");
        let mut runner = FakeRunner::failing_on("glslangValidator");

        let error = run(&config, &mut runner).unwrap_err();

        assert_eq!(error.to_string(), "Couldn't compile shader a.vert");
        assert!(error.downcast_ref::<CommandFailed>().is_some());
        assert!(!config.header_path().exists());
        assert!(!config.source_path().exists());
    }

    #[test]
    fn test_toolchain_failure_stops_before_compiling() {
        let (_scratch, config) = project("run-toolchain-failure");
        let mut runner = FakeRunner::failing_on("git");

        let error = run(&config, &mut runner).unwrap_err();

        assert_eq!(error.to_string(), "Couldn't clone glslang");
        assert_eq!(runner.commands.len(), 1);
        assert!(!config.header_path().exists());
    }

    #[test]
    fn test_partial_word_artifact_fails() {
        let (_scratch, config) = project("run-partial-word");
        let mut runner = runner().with_artifact("b.frag", &[1, 2, 3, 4, 5]);

        let error = run(&config, &mut runner).unwrap_err();

        assert_eq!(error.to_string(), "Invalid SPIR-V binary for shader b.frag");
        assert!(!config.source_path().exists());
    }

    #[test]
    fn test_empty_shader_folder() {
        let scratch = ScratchDir::new("run-empty");
        let config = Config::new(scratch.path())
            .with_generator("test")
            .with_skip_provision(true);
        fs::create_dir_all(&config.shader_source_directory).unwrap();

        let generated = run(&config, &mut FakeRunner::default()).unwrap();

        assert!(generated.symbols.is_empty());
        let header = fs::read_to_string(&generated.header_path).unwrap();
        assert!(!header.contains("extern"));
    }
}
