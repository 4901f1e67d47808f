use crate::cli::{Args, ColorChoice, DumpStage, ErrorFormat};

/// Runtime settings resolved from the command line.
pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub dump: Option<DumpStage>,
    pub error_format: ErrorFormat,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            dump: args.dump,
            error_format: args.error_format,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
