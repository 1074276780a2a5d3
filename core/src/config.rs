use std::{
    borrow::Cow,
    fmt::Display,
    path::{Path, PathBuf},
};

pub const GLSLANG_GIT_URL: &str = "https://github.com/KhronosGroup/glslang.git";
pub const DEFAULT_OUTPUT_BASENAME: &str = "gepard-vulkan-spirv-binaries";
pub const DEFAULT_GENERATOR: &str = "vulkan-shader-embed";

/// How each 32-bit word is written in the generated arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordFormat {
    #[default]
    Decimal,
    Hex,
}

impl WordFormat {
    pub fn name(&self) -> &'static str {
        match self {
            WordFormat::Decimal => "decimal",
            WordFormat::Hex => "hex",
        }
    }

    pub fn format(&self, word: u32) -> String {
        match self {
            WordFormat::Decimal => word.to_string(),
            WordFormat::Hex => format!("{word:#010x}"),
        }
    }
}

impl Display for WordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything the generator needs to know about where things live and how
/// the output should look. Built once, then handed to every step.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_path: PathBuf,
    pub glslang_path: PathBuf,
    pub glslang_build_path: PathBuf,
    pub glslang_git_url: String,
    pub shader_source_directory: PathBuf,
    pub output_basename: String,
    pub namespaces: Vec<String>,
    /// Name written in the auto-generation warning of both files.
    pub generator: String,
    pub word_format: WordFormat,
    /// Truncate artifacts whose length isn't a multiple of 4 instead of failing.
    pub allow_trailing_bytes: bool,
    pub skip_provision: bool,
}

impl Config {
    /// Creates a configuration where every path is derived from `base_path`,
    /// the root of the project owning the shaders.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let glslang_path = base_path.join("thirdparty").join("glslang");
        let glslang_build_path = glslang_path.join("build").join("vulkan");
        let shader_source_directory = base_path
            .join("src")
            .join("engines")
            .join("vulkan")
            .join("shaders");

        Self {
            base_path,
            glslang_path,
            glslang_build_path,
            glslang_git_url: GLSLANG_GIT_URL.to_owned(),
            shader_source_directory,
            output_basename: DEFAULT_OUTPUT_BASENAME.to_owned(),
            namespaces: vec!["gepard".to_owned(), "vulkan".to_owned()],
            generator: DEFAULT_GENERATOR.to_owned(),
            word_format: WordFormat::default(),
            allow_trailing_bytes: false,
            skip_provision: false,
        }
    }

    pub fn with_shader_source_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.shader_source_directory = directory.into();
        self
    }

    pub fn with_output_basename(mut self, basename: impl Into<String>) -> Self {
        self.output_basename = basename.into();
        self
    }

    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    pub fn with_word_format(mut self, word_format: WordFormat) -> Self {
        self.word_format = word_format;
        self
    }

    pub fn with_allow_trailing_bytes(mut self, allow_trailing_bytes: bool) -> Self {
        self.allow_trailing_bytes = allow_trailing_bytes;
        self
    }

    pub fn with_skip_provision(mut self, skip_provision: bool) -> Self {
        self.skip_provision = skip_provision;
        self
    }

    pub fn glslang_validator(&self) -> PathBuf {
        self.glslang_build_path
            .join("StandAlone")
            .join("glslangValidator")
    }

    pub fn shader_path(&self, shader: &str) -> PathBuf {
        self.shader_source_directory.join(shader)
    }

    pub fn spirv_path(&self, shader: &str) -> PathBuf {
        self.shader_source_directory.join(format!("{shader}.spv"))
    }

    pub fn header_file_name(&self) -> String {
        format!("{}.h", self.output_basename)
    }

    pub fn header_path(&self) -> PathBuf {
        self.shader_source_directory.join(self.header_file_name())
    }

    pub fn source_path(&self) -> PathBuf {
        self.shader_source_directory
            .join(format!("{}.cpp", self.output_basename))
    }

    /// Path relative to the base path when possible, for log output.
    pub fn display_path<'a>(&self, path: &'a Path) -> Cow<'a, str> {
        match pathdiff::diff_paths(path, &self.base_path) {
            Some(relative) if !relative.starts_with("..") => {
                Cow::Owned(relative.to_string_lossy().into_owned())
            }
            _ => path.to_string_lossy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = Config::new("/project");

        assert_eq!(
            config.glslang_build_path,
            Path::new("/project/thirdparty/glslang/build/vulkan")
        );
        assert_eq!(
            config.glslang_validator(),
            Path::new("/project/thirdparty/glslang/build/vulkan/StandAlone/glslangValidator")
        );
        assert_eq!(
            config.spirv_path("blit.frag"),
            Path::new("/project/src/engines/vulkan/shaders/blit.frag.spv")
        );
        assert_eq!(
            config.header_path(),
            Path::new("/project/src/engines/vulkan/shaders/gepard-vulkan-spirv-binaries.h")
        );
        assert_eq!(
            config.source_path(),
            Path::new("/project/src/engines/vulkan/shaders/gepard-vulkan-spirv-binaries.cpp")
        );
        assert_eq!(config.namespaces, vec!["gepard", "vulkan"]);
    }

    #[test]
    fn test_display_path() {
        let config = Config::new("/project");

        assert_eq!(
            config.display_path(Path::new("/project/thirdparty/glslang")),
            "thirdparty/glslang"
        );
        assert_eq!(config.display_path(Path::new("/elsewhere/a")), "/elsewhere/a");
    }

    #[test]
    fn test_word_format() {
        assert_eq!(WordFormat::Decimal.format(67305985), "67305985");
        assert_eq!(WordFormat::Hex.format(67305985), "0x04030201");
        assert_eq!(WordFormat::Hex.format(0), "0x00000000");
    }
}
