use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use regex::Regex;
use vulkan_shader_embed::Config;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Root of the project, defaults to the current directory
    #[clap(short, long, value_parser)]
    pub base_path: Option<PathBuf>,
    /// Folder containing the .frag and .vert files, defaults to <BASE_PATH>/src/engines/vulkan/shaders
    #[clap(short, long, value_parser)]
    pub shader_dir: Option<PathBuf>,
    /// Base name of the generated .h and .cpp files
    #[clap(short, long, value_parser = validate_basename)]
    pub output: Option<String>,
    /// How the words of the SPIR-V binaries are written
    #[clap(value_enum, short, long, default_value_t = WordFormat::Decimal)]
    pub word_format: WordFormat,
    /// Drop trailing bytes of binaries whose size isn't a multiple of 4 instead of failing
    #[clap(long)]
    pub allow_trailing_bytes: bool,
    /// Use an already built glslangValidator, don't clone or build glslang
    #[clap(long)]
    pub skip_provision: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        let base_path = match self.base_path {
            Some(base_path) => base_path,
            None => std::env::current_dir()?,
        };

        let mut config = Config::new(base_path)
            .with_word_format(self.word_format.into())
            .with_allow_trailing_bytes(self.allow_trailing_bytes)
            .with_skip_provision(self.skip_provision);

        if let Some(shader_dir) = self.shader_dir {
            config = config.with_shader_source_directory(shader_dir);
        }
        if let Some(output) = self.output {
            config = config.with_output_basename(output);
        }

        Ok(config)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WordFormat {
    Decimal,
    Hex,
}

impl From<WordFormat> for vulkan_shader_embed::WordFormat {
    fn from(word_format: WordFormat) -> Self {
        match word_format {
            WordFormat::Decimal => vulkan_shader_embed::WordFormat::Decimal,
            WordFormat::Hex => vulkan_shader_embed::WordFormat::Hex,
        }
    }
}

fn validate_basename(s: &str) -> Result<String> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("Verified regex");
    if re.is_match(s) {
        Ok(s.to_owned())
    } else {
        Err(anyhow!(
            "The output name should only contain letters, digits, '-' and '_', and can't start with a digit or '-'"
        ))
    }
}
