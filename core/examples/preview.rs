use std::path::PathBuf;

use vulkan_shader_embed::{artifact, emit, sources, Config};

/// Prints the header that would be generated for a shader folder whose
/// shaders were already compiled, without running glslang.
fn main() -> anyhow::Result<()> {
    let shaders = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(&shaders).with_shader_source_directory(&shaders);

    let names = sources::collect_shader_sources(&config.shader_source_directory)?;
    let sizes = artifact::spirv_sizes(&config, &names)?;
    let artifacts = artifact::read_artifacts(&config, &sizes)?;

    print!("{}", emit::render_header(&config, &artifacts)?);

    Ok(())
}
