use clap::Parser;
use cspi::cli::{generate_completions, Args, Commands, DumpStage, ErrorFormat};
use cspi::config::AppConfig;
use cspi::diagnostic::{render_diagnostics, Diagnostic};
use cspi::interpreter::{self, Error, StdoutSink};
use cspi::{lexer, suggest};
use owo_colors::OwoColorize;
use std::io::{self, Read};
use std::path::Path;

fn main() {
    let args = Args::parse();
    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    match &args.command {
        Some(Commands::Complete { shell }) => {
            generate_completions(*shell);
            return;
        }
        Some(Commands::Suggest { file, caret, limit }) => {
            if let Err(e) = print_suggestions(file, *caret, *limit) {
                error_message(&config, &e);
                std::process::exit(1);
            }
            return;
        }
        None => {}
    }

    let (source, name) = match read_program(&args) {
        Ok(input) => input,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };
    tracing::debug!(bytes = source.len(), file = %name, "read program");

    let result = match config.dump {
        Some(DumpStage::Tokens) => dump_tokens(&source).map_err(|error| vec![error.to_diagnostic()]),
        Some(DumpStage::Ast) => dump_ast(&source).map_err(|error| vec![error.to_diagnostic()]),
        None => run_program(&source),
    };

    if let Err(diagnostics) = result {
        report(&config, &source, &name, &diagnostics);
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_ansi(config.color_enabled),
        )
        .with(filter)
        .init();
}

/// Program text and the name used for it in diagnostics.
fn read_program(args: &Args) -> Result<(String, String), String> {
    if let Some(file) = &args.file {
        tracing::debug!(path = %file.display(), "reading program from file");
        Ok((read_file(file)?, file.display().to_string()))
    } else if let Some(code) = &args.eval {
        Ok((code.clone(), "<eval>".to_string()))
    } else {
        tracing::debug!("reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok((buffer, "<stdin>".to_string()))
    }
}

fn run_program(source: &str) -> Result<(), Vec<Diagnostic>> {
    let mut sink = StdoutSink;
    let result = interpreter::run_with_diagnostics(source, &mut sink)?;
    if let Some(value) = result {
        tracing::debug!(%value, "program returned");
    }
    Ok(())
}

fn dump_tokens(source: &str) -> Result<(), Error> {
    for token in lexer::lex(source)? {
        let span = token.span();
        println!("{:>5}..{:<5} {:<14} {:?}", span.start, span.end, token.kind, token.text);
    }
    Ok(())
}

fn dump_ast(source: &str) -> Result<(), Error> {
    let program = interpreter::parse_source(source)?;
    println!("{:#?}", program);
    Ok(())
}

fn report(config: &AppConfig, source: &str, name: &str, diagnostics: &[Diagnostic]) {
    match config.error_format {
        ErrorFormat::Human => {
            eprint!("{}", render_diagnostics(source, name, diagnostics, config.color_enabled));
        }
        ErrorFormat::Json => {
            for diagnostic in diagnostics {
                eprintln!("{}", diagnostic.to_json(source));
            }
        }
    }
}

fn print_suggestions(file: &Path, caret: usize, limit: usize) -> Result<(), String> {
    let source = read_file(file)?;
    for suggestion in suggest::suggest(&source, caret, limit) {
        println!("{}\t{}\t{:.3}", suggestion.key, suggestion.display, suggestion.score);
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
