//! MCP server for PocketBase.
//!
//! Run with `pocketbase-mcp --url http://localhost:8090`, or configure via
//! the `POCKETBASE_URL` / `POCKETBASE_TOKEN` / `POCKETBASE_ADMIN_EMAIL` /
//! `POCKETBASE_ADMIN_PASSWORD` environment variables.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pocketbase_mcp::{HttpClient, McpServer, PocketBaseApi};

/// MCP server for PocketBase.
///
/// Exposes PocketBase collection and record operations as MCP tools for AI
/// agents. Communicates via JSON-RPC 2.0 over stdin/stdout.
#[derive(Parser)]
#[command(name = "pocketbase-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// PocketBase base URL.
    #[arg(long, short = 'u', env = "POCKETBASE_URL", default_value = "http://localhost:8090")]
    url: String,

    /// Static auth token. Takes precedence over email/password.
    #[arg(long, env = "POCKETBASE_TOKEN")]
    token: Option<String>,

    /// Superuser email for startup authentication.
    #[arg(long, short = 'e', env = "POCKETBASE_ADMIN_EMAIL")]
    admin_email: Option<String>,

    /// Superuser password for startup authentication.
    #[arg(long, short = 'p', env = "POCKETBASE_ADMIN_PASSWORD")]
    admin_password: Option<String>,

    /// Enable debug logging to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Set up logging. stdout carries the protocol, so logs go to stderr.
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("pocketbase_mcp=debug".parse().unwrap()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let mut http = HttpClient::new(&args.url, args.token.clone());

    // With no static token, try a one-shot admin authentication. A failure
    // is logged rather than fatal; the auth tools remain available.
    if args.token.is_none() {
        if let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password) {
            match http.authenticate(email, password).await {
                Ok(Some(_)) => tracing::info!("Authenticated as superuser"),
                Ok(None) => eprintln!("Warning: authentication returned no token"),
                Err(e) => eprintln!("Warning: authentication failed: {}", e),
            }
        }
    }

    let api = PocketBaseApi::new(http);
    let mut server = McpServer::new(api);

    if let Err(e) = server.run().await {
        eprintln!("Error: Server error: {}", e);
        std::process::exit(1);
    }
}
