//! Folio - portfolio web server and configuration wizard.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use axum::http::Request;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use folio::{AppState, Config, ContentPaths, router, setup};

/// Folio - personal portfolio server.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Personal portfolio site with GitHub projects, blog, and contact form", long_about = None)]
struct Args {
    /// Site configuration file.
    #[arg(long, env = "FOLIO_CONFIG", default_value = "config/config.json")]
    config: PathBuf,

    /// SMTP configuration file.
    #[arg(long, env = "FOLIO_MAIL_CONFIG", default_value = "config/mail.config.json")]
    mail_config: PathBuf,

    /// Directory of static assets served as-is.
    #[arg(long, env = "FOLIO_PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Directory of markdown blog posts.
    #[arg(long, env = "FOLIO_BLOG_DIR", default_value = "src/markdown")]
    blog_dir: PathBuf,

    /// Directory uploaded images are written to.
    #[arg(long, env = "FOLIO_UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Override the port from config.json.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default).
    Serve,
    /// Interactively write config.json and mail.config.json.
    Setup {
        /// Directory to write the configuration files into.
        #[arg(long, default_value = "config")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match &args.command {
        Some(Command::Setup { dir }) => setup::run(dir).map_err(anyhow::Error::from),
        Some(Command::Serve) | None => serve(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "exiting");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: Args) -> anyhow::Result<()> {
    let paths = ContentPaths {
        public_dir: args.public_dir,
        blog_dir: args.blog_dir,
        upload_dir: args.upload_dir,
    };
    let mut config = Config::load(&args.config, &args.mail_config, paths)?;
    if let Some(port) = args.port {
        config.site.port = Some(port);
    }
    let port = config.port();

    let state = AppState::from_config(config)?;

    let app = router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        },
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) if err.kind() == ErrorKind::AddrInUse => {
            error!(port, "port is already in use, stop the other process or choose another port");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    info!(%addr, "server running");

    axum::serve(listener, app).await?;

    Ok(())
}
