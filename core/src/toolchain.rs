use std::ffi::OsString;

use anyhow::{Context, Result};
use log::info;

use crate::{
    config::Config,
    process::{run_checked, CommandRunner, ExternalCommand},
};

/// Clones glslang if it isn't there yet, then configures and builds it.
/// The build runs every time so the validator is kept up to date.
pub fn prepare_glslang<R: CommandRunner + ?Sized>(config: &Config, runner: &mut R) -> Result<()> {
    let glslang = config.display_path(&config.glslang_path);

    if !config.glslang_path.exists() {
        info!("Cloning {url} into {glslang}", url = config.glslang_git_url);
        let clone = ExternalCommand::new("git")
            .arg("clone")
            .arg(&config.glslang_git_url)
            .arg(&config.glslang_path);
        run_checked(runner, &clone).context("Couldn't clone glslang")?;
    }

    info!("Building {glslang}");
    let configure = ExternalCommand::new("cmake")
        .arg(prefixed("-B", &config.glslang_build_path))
        .arg(prefixed("-H", &config.glslang_path));
    run_checked(runner, &configure).context("Couldn't configure glslang")?;

    let build = ExternalCommand::new("make").arg(prefixed("-C", &config.glslang_build_path));
    run_checked(runner, &build).context("Couldn't build glslang")?;

    Ok(())
}

fn prefixed(flag: &str, path: impl AsRef<std::path::Path>) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path.as_ref());
    arg
}
