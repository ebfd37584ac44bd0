//! Optional TOML configuration file and option resolution.
//!
//! Keys mirror the long flag names:
//! ```toml
//! input = "schema.d.ts"
//! output = "src/client.ts"
//! use-operation-id = true
//! default-headers = ["Authorization"]
//! ```
//! A flag given on the command line wins over the file, which wins over the
//! built-in default.

use fetchgen_core::GenerateOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::args::GenerateArgs;

pub const DEFAULT_OUTPUT: &str = "./client.ts";

/// Contents of the `--config` file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub paths_type: Option<String>,
    pub components_type: Option<String>,
    pub operations_type: Option<String>,
    pub use_operation_id: Option<bool>,
    pub schema_import_path_prefix: Option<String>,
    pub base_url: Option<String>,
    pub default_headers: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read config file {}: {err}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|err| format!("Failed to parse config file {}: {err}", path.display()))
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: GenerateOptions,
}

impl Settings {
    pub fn resolve(args: &GenerateArgs, file: FileConfig) -> Result<Self, String> {
        let input = args
            .input
            .clone()
            .or(file.input)
            .ok_or("No input file given: pass --input or set `input` in the config file")?;
        let output = args
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let mut default_headers = header_names(args.default_headers.clone());
        if default_headers.is_empty() {
            default_headers = header_names(file.default_headers.unwrap_or_default());
        }

        let defaults = GenerateOptions::default();
        let options = GenerateOptions {
            paths_type: args
                .paths_type
                .clone()
                .or(file.paths_type)
                .unwrap_or(defaults.paths_type),
            components_type: args
                .components_type
                .clone()
                .or(file.components_type)
                .unwrap_or(defaults.components_type),
            operations_type: args
                .operations_type
                .clone()
                .or(file.operations_type)
                .unwrap_or(defaults.operations_type),
            use_operation_id: args.use_operation_id
                || file.use_operation_id.unwrap_or(defaults.use_operation_id),
            schema_import_path_prefix: args
                .schema_import_path_prefix
                .clone()
                .or(file.schema_import_path_prefix)
                .unwrap_or(defaults.schema_import_path_prefix),
            schema_module: defaults.schema_module,
            base_url: args.base_url.clone().or(file.base_url),
            default_headers,
        };

        Ok(Self {
            input,
            output,
            options,
        })
    }
}

/// Trimmed, non-empty header names, first occurrence kept.
fn header_names(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let args = GenerateArgs {
            input: Some("schema.d.ts".into()),
            ..GenerateArgs::default()
        };
        let settings = Settings::resolve(&args, FileConfig::default()).unwrap();
        assert_eq!(settings.input, PathBuf::from("schema.d.ts"));
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(settings.options, GenerateOptions::default());
    }

    #[test]
    fn test_flags_override_file() {
        let file: FileConfig = toml::from_str(
            r#"
input = "from-file.d.ts"
output = "out/client.ts"
paths-type = "FilePaths"
base-url = "https://file.example.com"
default-headers = ["Authorization"]
use-operation-id = true
"#,
        )
        .unwrap();
        let args = GenerateArgs {
            input: Some("from-flag.d.ts".into()),
            paths_type: Some("FlagPaths".into()),
            default_headers: vec!["X-Id".into()],
            ..GenerateArgs::default()
        };

        let settings = Settings::resolve(&args, file).unwrap();
        assert_eq!(settings.input, PathBuf::from("from-flag.d.ts"));
        assert_eq!(settings.output, PathBuf::from("out/client.ts"));
        assert_eq!(settings.options.paths_type, "FlagPaths");
        assert_eq!(settings.options.components_type, "components");
        assert_eq!(
            settings.options.base_url.as_deref(),
            Some("https://file.example.com")
        );
        assert_eq!(settings.options.default_headers, vec!["X-Id".to_string()]);
        assert!(settings.options.use_operation_id);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let err = Settings::resolve(&GenerateArgs::default(), FileConfig::default()).unwrap_err();
        assert!(err.contains("No input file given"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("paths_type = \"x\"").is_err());
        assert!(toml::from_str::<FileConfig>("colour = true").is_err());
    }

    #[test]
    fn test_default_header_names_are_cleaned() {
        let args = GenerateArgs {
            input: Some("schema.d.ts".into()),
            default_headers: vec![
                "Authorization".into(),
                " X-Id".into(),
                String::new(),
                "X-Id ".into(),
            ],
            ..GenerateArgs::default()
        };
        let settings = Settings::resolve(&args, FileConfig::default()).unwrap();
        assert_eq!(
            settings.options.default_headers,
            vec!["Authorization".to_string(), "X-Id".to_string()]
        );

        let file: FileConfig =
            toml::from_str("default-headers = [\" Authorization \", \"\", \"Authorization\"]").unwrap();
        let args = GenerateArgs {
            input: Some("schema.d.ts".into()),
            ..GenerateArgs::default()
        };
        let settings = Settings::resolve(&args, file).unwrap();
        assert_eq!(settings.options.default_headers, vec!["Authorization".to_string()]);
    }

    #[test]
    fn test_blank_header_flag_falls_back_to_file() {
        let file: FileConfig = toml::from_str("default-headers = [\"X-Id\"]").unwrap();
        let args = GenerateArgs {
            input: Some("schema.d.ts".into()),
            default_headers: vec![" ".into(), String::new()],
            ..GenerateArgs::default()
        };
        let settings = Settings::resolve(&args, file).unwrap();
        assert_eq!(settings.options.default_headers, vec!["X-Id".to_string()]);
    }
}
