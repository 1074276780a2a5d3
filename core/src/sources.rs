use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    config::Config,
    process::{run_checked, CommandRunner, ExternalCommand},
};

pub const SHADER_SUFFIXES: [&str; 2] = [".frag", ".vert"];

pub fn is_shader_source(file_name: &str) -> bool {
    SHADER_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

/// Lists the shader sources directly inside `directory`, sorted by name.
pub fn collect_shader_sources(directory: &Path) -> Result<Vec<String>> {
    let listing_context = || {
        format!(
            "Couldn't list shader folder {path}",
            path = directory.to_string_lossy()
        )
    };
    let entries = fs::read_dir(directory).with_context(listing_context)?;

    let mut shaders = vec![];
    for entry in entries {
        let entry = entry.with_context(listing_context)?;
        // follows symlinks, a link to a folder is skipped too
        if entry.path().is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(file_name) => {
                if is_shader_source(&file_name) {
                    shaders.push(file_name);
                }
            }
            Err(file_name) => warn!(
                "Skipping {name}, not a valid UTF-8 file name",
                name = file_name.to_string_lossy()
            ),
        }
    }

    shaders.sort();

    Ok(shaders)
}

/// Compiles `shader` to SPIR-V next to its source, as `<shader>.spv`.
pub fn compile_shader<R: CommandRunner + ?Sized>(
    config: &Config,
    runner: &mut R,
    shader: &str,
) -> Result<()> {
    let command = ExternalCommand::new(config.glslang_validator())
        .arg("-V")
        .arg(config.shader_path(shader))
        .arg("-o")
        .arg(config.spirv_path(shader));

    run_checked(runner, &command).with_context(|| format!("Couldn't compile shader {shader}"))?;
    info!("Compiled {shader}");

    Ok(())
}
