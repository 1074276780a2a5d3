use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    artifact::SpirvArtifact,
    config::Config,
    naming::{guard_name, NameNormalizer},
};

/// The header and source written by [write_generated].
#[derive(Debug, Clone)]
pub struct GeneratedPair {
    pub header_path: PathBuf,
    pub source_path: PathBuf,
    /// Emitted symbols with their word counts, in emission order.
    pub symbols: Vec<(String, usize)>,
}

struct Emitter<'a> {
    config: &'a Config,
    /// Artifacts sorted by shader name, paired with their symbol.
    entries: Vec<(String, &'a SpirvArtifact)>,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a Config, artifacts: &'a [SpirvArtifact]) -> Result<Self> {
        let mut sorted: Vec<&SpirvArtifact> = artifacts.iter().collect();
        sorted.sort_by(|a, b| a.shader.cmp(&b.shader));

        let symbols = NameNormalizer::new()
            .symbols(sorted.iter().map(|artifact| artifact.shader.as_str()))?;

        Ok(Self {
            config,
            entries: symbols.into_iter().zip(sorted).collect(),
        })
    }

    fn generated_warning(&self) -> String {
        format!(
            "/* This file was auto-generated by {generator}! */\n\n",
            generator = self.config.generator
        )
    }

    fn namespace_begin(&self) -> String {
        let mut begin = String::from("\n");
        for namespace in &self.config.namespaces {
            begin += &format!("namespace {namespace} {{\n");
        }
        begin.push('\n');
        begin
    }

    fn namespace_end(&self) -> String {
        let mut end = String::from("\n");
        for namespace in self.config.namespaces.iter().rev() {
            end += &format!("}} // namespace {namespace}\n");
        }
        end
    }

    fn header(&self) -> String {
        let guard = guard_name(&self.config.output_basename);
        let mut header = self.generated_warning();

        header += &format!("\n#ifndef {guard}_H\n#define {guard}_H\n\n#include <stdint.h>\n");
        header += &self.namespace_begin();
        for (symbol, artifact) in &self.entries {
            header += &format!(
                "extern const uint32_t {symbol}[{count}];\n",
                count = artifact.word_count()
            );
        }
        header += &self.namespace_end();
        header += &format!("\n#endif // {guard}_H\n");

        header
    }

    fn source(&self) -> String {
        let mut source = self.generated_warning();

        source += &format!(
            "#include \"{header}\"\n",
            header = self.config.header_file_name()
        );
        source += &self.namespace_begin();
        for (symbol, artifact) in &self.entries {
            source += &format!(
                "const uint32_t {symbol}[{count}] = {{\n",
                count = artifact.word_count()
            );
            for &word in &artifact.words {
                source += &format!("    {},\n", self.config.word_format.format(word));
            }
            source += "};\n\n";
        }
        source += &self.namespace_end();

        source
    }

    fn symbols(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .map(|(symbol, artifact)| (symbol.clone(), artifact.word_count()))
            .collect()
    }
}

/// Text of the generated header: one `extern` declaration per artifact.
pub fn render_header(config: &Config, artifacts: &[SpirvArtifact]) -> Result<String> {
    Ok(Emitter::new(config, artifacts)?.header())
}

/// Text of the generated source: one initialized array per artifact.
pub fn render_source(config: &Config, artifacts: &[SpirvArtifact]) -> Result<String> {
    Ok(Emitter::new(config, artifacts)?.source())
}

/// Renders both files and overwrites them in the shader folder.
///
/// Both files are first written next to their target as `<name>.tmp`, then
/// renamed over it, so a failed write leaves the previous pair untouched.
/// Only a failing rename of the source, after the header was renamed, can
/// still leave a new header next to an old source.
pub fn write_generated(config: &Config, artifacts: &[SpirvArtifact]) -> Result<GeneratedPair> {
    let emitter = Emitter::new(config, artifacts)?;
    let header = emitter.header();
    let source = emitter.source();

    let header_path = config.header_path();
    let source_path = config.source_path();
    let staged_header = staging_path(&header_path);
    let staged_source = staging_path(&source_path);

    write_file(config, &staged_header, &header)?;
    if let Err(error) = write_file(config, &staged_source, &source) {
        discard(config, &staged_header);
        discard(config, &staged_source);
        return Err(error);
    }

    rename_file(config, &staged_header, &header_path)?;
    info!("Wrote {path}", path = config.display_path(&header_path));
    rename_file(config, &staged_source, &source_path)?;
    info!("Wrote {path}", path = config.display_path(&source_path));

    Ok(GeneratedPair {
        header_path,
        source_path,
        symbols: emitter.symbols(),
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

fn write_file(config: &Config, path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Couldn't write {path}", path = config.display_path(path)))
}

fn rename_file(config: &Config, from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).with_context(|| {
        format!(
            "Couldn't replace {to} with {from}",
            to = config.display_path(to),
            from = config.display_path(from)
        )
    })
}

fn discard(config: &Config, path: &Path) {
    if path.is_file() {
        if let Err(error) = fs::remove_file(path) {
            warn!(
                "Couldn't remove {path}: {error}",
                path = config.display_path(path)
            );
        }
    }
}
