use anyhow::Result;
use args::Cli;
use clap::Parser;
use log::info;
use vulkan_shader_embed::{run, SystemRunner};

mod args;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.into_config()?;

    let generated = run(&config, &mut SystemRunner)?;

    for (symbol, word_count) in &generated.symbols {
        info!("{symbol}: {word_count} words");
    }
    println!(
        "Generated {header} and {source}",
        header = config.display_path(&generated.header_path),
        source = config.display_path(&generated.source_path)
    );

    Ok(())
}
