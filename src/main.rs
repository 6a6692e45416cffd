use anyhow::Result;
use clap::Parser;
use stratus::commands;
use stratus::config::Config;
use stratus::http::ApiClient;

/// stratus - command-line client for the Stratus platform API
///
/// Credentials and server location are read from the STRATUS_*
/// environment variables; the server flags below override them.
///
/// Examples:
///   stratus api /system/findProjects
///   stratus describe record-9zJkV0Pq3XB7qY6b
#[derive(Parser, Debug)]
#[command(author, version = env!("STRATUS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server host (also via STRATUS_APISERVER_HOST)
    #[arg(long, env = "STRATUS_APISERVER_HOST", value_name = "HOST", global = true)]
    host: Option<String>,

    /// API server port (also via STRATUS_APISERVER_PORT)
    #[arg(long, env = "STRATUS_APISERVER_PORT", value_name = "PORT", global = true)]
    port: Option<u16>,

    /// API server protocol, http or https (also via STRATUS_APISERVER_PROTOCOL)
    #[arg(
        long,
        env = "STRATUS_APISERVER_PROTOCOL",
        value_name = "PROTOCOL",
        global = true
    )]
    protocol: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Invoke an API route directly
    Api(ApiArgs),

    /// Describe a platform object by its ID
    Describe(DescribeArgs),

    /// Show the resolved client configuration
    Env,
}

#[derive(clap::Args, Debug)]
pub struct ApiArgs {
    /// Server route, e.g. "/system/findProjects"
    #[arg(value_name = "ROUTE")]
    pub route: String,

    /// JSON input for the call (defaults to "{}")
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DescribeArgs {
    /// Object ID, e.g. "record-9zJkV0Pq3XB7qY6b"
    #[arg(value_name = "ID")]
    pub id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = Some(port);
    }
    if let Some(protocol) = cli.protocol {
        config.server.protocol = protocol;
    }

    match cli.command {
        Commands::Api(args) => {
            let client = ApiClient::new(&config)?;
            commands::api(&client, &args.route, args.input.as_deref()).await?
        }
        Commands::Describe(args) => {
            let client = ApiClient::new(&config)?;
            commands::describe(&client, &args.id).await?
        }
        Commands::Env => commands::env(&config),
    }
    Ok(())
}
