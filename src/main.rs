use clap::{Parser, Subcommand};
use nanobanana_cartoon::{
    logger::{self, LogLevel, LoggerConfig},
    Config, GenerationRequest, GenerationResult, ImageClient, ImageSize, NanoBananaError,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nanobanana-cartoon", version, about = "AI Cartoon Creator powered by the Nano Banana API")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one cartoon image
    Generate {
        /// What to draw, e.g. "A detective corgi in a neon-lit city, comic style"
        #[arg(short, long)]
        prompt: String,

        /// One of 1024x1024, 768x768, 512x512
        #[arg(short, long, default_value = "1024x1024")]
        size: ImageSize,

        /// Style hint; blank falls back to "cartoon"
        #[arg(long, default_value = "cartoon")]
        style: String,

        /// Where inline images are written
        #[arg(short, long, default_value = "cartoon.png")]
        output: PathBuf,
    },
    /// Serve the POST /api/cartoon proxy
    #[cfg(feature = "server")]
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let dotenv_loaded = dotenv::dotenv().is_ok();

    let logger_config = if cli.json_logs {
        LoggerConfig::production()
    } else if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default().with_level(LogLevel::Warn)
    };
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let config = Config::from_env();
    logger::log_config_info(&config);

    match cli.command {
        Command::Generate {
            prompt,
            size,
            style,
            output,
        } => generate(&config, &prompt, size, &style, output).await,
        #[cfg(feature = "server")]
        Command::Serve { port } => {
            let config = match port {
                Some(port) => config.with_port(port),
                None => config,
            };
            match nanobanana_cartoon::server::run(config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn generate(
    config: &Config,
    prompt: &str,
    size: ImageSize,
    style: &str,
    output: PathBuf,
) -> ExitCode {
    match request_image(config, prompt, size, style).await {
        Ok(image) => match deliver(image, &output).await {
            Ok(location) => {
                println!("{}", location);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to write {}: {}", output.display(), e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("{}", cli_message(&e));
            if e.is_caller_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn request_image(
    config: &Config,
    prompt: &str,
    size: ImageSize,
    style: &str,
) -> nanobanana_cartoon::Result<GenerationResult> {
    let request =
        GenerationRequest::new(prompt, size, style, config.nanobanana.api_key.as_deref())?;
    let client = ImageClient::new(&config.nanobanana)?;

    eprintln!("Generating cartoon...");
    client.generate(request).await
}

/// Remote images are reported by URL; inline ones are written to `output`.
async fn deliver(image: GenerationResult, output: &Path) -> io::Result<String> {
    match image {
        GenerationResult::RemoteImage { url } => Ok(url),
        GenerationResult::InlineImage { bytes } => {
            tokio::fs::write(output, &bytes).await?;
            Ok(output.display().to_string())
        }
    }
}

fn cli_message(err: &NanoBananaError) -> String {
    match err {
        NanoBananaError::MissingCredentialError => {
            "Add `NANOBANANA_API_KEY` to your environment or a .env file.".to_string()
        }
        other => other.to_string(),
    }
}
