use std::collections::HashMap;

use anyhow::{anyhow, Result};
use regex::{Captures, Regex};

/// Folds shader file names into camel-case C identifiers:
/// every `.` or `-` followed by a word character is replaced by that
/// character, uppercased. `blit-test.frag` becomes `blitTestFrag`.
pub struct NameNormalizer {
    re: Regex,
    identifier: Regex,
}

impl NameNormalizer {
    pub fn new() -> Self {
        let re = Regex::new(r"[.-]([A-Za-z0-9_])").expect("Verified regex");
        let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Verified regex");

        Self { re, identifier }
    }

    pub fn normalize(&self, shader_name: &str) -> String {
        self.re
            .replace_all(shader_name, |captures: &Captures| captures[1].to_uppercase())
            .into_owned()
    }

    /// Normalizes every name, failing if a symbol isn't a valid C identifier
    /// or if two names map to the same symbol.
    pub fn symbols<'a, I>(&self, shader_names: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut symbols = vec![];

        for shader_name in shader_names {
            let symbol = self.normalize(shader_name);
            if !self.identifier.is_match(&symbol) {
                return Err(anyhow!(
                    "Shader {shader_name} maps to {symbol}, which is not a valid C identifier"
                ));
            }
            if let Some(previous) = seen.insert(symbol.clone(), shader_name) {
                return Err(anyhow!(
                    "Shaders {previous} and {shader_name} both map to symbol {symbol}"
                ));
            }
            symbols.push(symbol);
        }

        Ok(symbols)
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn normalize_shader_name(shader_name: &str) -> String {
    NameNormalizer::new().normalize(shader_name)
}

/// Include guard base for a generated file, `gepard-vulkan` gives `GEPARD_VULKAN`.
pub fn guard_name(basename: &str) -> String {
    basename.replace('-', "_").to_uppercase()
}
