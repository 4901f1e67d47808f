use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cspi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for AP CSP pseudocode", long_about = None)]
pub struct Args {
    /// Program to run; read from stdin when neither FILE nor --eval is given
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(short, long, value_name = "CODE", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Print the output of a stage instead of running the program
    #[arg(long = "dump", value_name = "STAGE")]
    pub dump: Option<DumpStage>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(long = "error-format", value_name = "FORMAT", default_value = "human")]
    pub error_format: ErrorFormat,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
    /// Rank completions for the word before a caret position
    Suggest {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Byte offset of the caret
        #[arg(long, value_name = "OFFSET")]
        caret: usize,

        #[arg(short = 'n', long = "limit", value_name = "N", default_value_t = crate::suggest::MAX_OPTIONS)]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpStage {
    Tokens,
    Ast,
}

impl std::str::FromStr for DumpStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tokens" => Ok(DumpStage::Tokens),
            "ast" => Ok(DumpStage::Ast),
            _ => Err(format!("Invalid dump stage: {}. Must be 'tokens' or 'ast'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    Human,
    Json,
}

impl std::str::FromStr for ErrorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(ErrorFormat::Human),
            "json" => Ok(ErrorFormat::Json),
            _ => Err(format!("Invalid error format: {}. Must be 'human' or 'json'", s)),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
