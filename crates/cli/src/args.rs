use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Input file path of the openapi-typescript declarations
    #[arg(
        short = 'i',
        long,
        value_name = "PATH",
        required_unless_present = "config"
    )]
    pub input: Option<PathBuf>,

    /// Output file path of the generated client [default: ./client.ts]
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Name of the interface listing the API paths [default: paths]
    #[arg(long, value_name = "NAME")]
    pub paths_type: Option<String>,

    /// Name of the components declaration [default: components]
    #[arg(long, value_name = "NAME")]
    pub components_type: Option<String>,

    /// Name of the operations declaration [default: operations]
    #[arg(long, value_name = "NAME")]
    pub operations_type: Option<String>,

    /// Name methods after their operationId where possible
    #[arg(long)]
    pub use_operation_id: bool,

    /// Prefix of the schema import path [default: ./]
    #[arg(long, value_name = "DIR")]
    pub schema_import_path_prefix: Option<String>,

    /// Base URL passed to createClient by the generated constructor
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Header names always present in the client's default headers
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub default_headers: Vec<String>,

    /// TOML file providing defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
