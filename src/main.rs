use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use deploio_env::{
    config::{GeneratorConfig, MysqlKind, S3Config, ToolConfig},
    DeploioEnv, Nctl, NctlError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Generate deplo.io env YAML from nctl resources")]
struct Cli {
    /// nctl project (e.g. demo-12345)
    #[arg(short, long, env = "NCTL_PROJECT")]
    project: String,

    /// deplo.io app name; prints example `nctl update app` commands
    #[arg(short, long, env = "DEPLOIO_APP")]
    app: Option<String>,

    /// mysql, or mysqldatabase for the economy offering
    #[arg(long, value_enum, default_value_t = MysqlKind::Mysql, env = "DEPLOIO_MYSQL_KIND")]
    mysql_kind: MysqlKind,

    /// Name of the MySQL resource
    #[arg(long, env = "DEPLOIO_MYSQL_NAME")]
    mysql_name: String,

    /// Name of the KeyValueStore (Redis) resource
    #[arg(long, env = "DEPLOIO_KVS_NAME")]
    kvs_name: String,

    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: String,

    #[arg(long, env = "S3_REGION")]
    s3_region: String,

    #[arg(long, env = "S3_BUCKET")]
    s3_bucket: String,

    #[arg(long, env = "S3_ACCESS_KEY", hide_env_values = true)]
    s3_access_key: String,

    #[arg(long, env = "S3_SECRET_KEY", hide_env_values = true)]
    s3_secret_key: String,

    /// Tool config file (JSON); defaults to <config dir>/deploio-env/config.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// nctl binary to run
    #[arg(long, env = "NCTL_BIN")]
    nctl: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            project: self.project.clone(),
            app: self.app.clone(),
            mysql_kind: self.mysql_kind,
            mysql_name: self.mysql_name.clone(),
            kvs_name: self.kvs_name.clone(),
            s3: S3Config {
                endpoint: self.s3_endpoint.clone(),
                region: self.s3_region.clone(),
                bucket: self.s3_bucket.clone(),
                access_key: self.s3_access_key.clone(),
                secret_key: self.s3_secret_key.clone(),
            },
        }
    }
}

fn log_level(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Logs go to stderr; stdout carries the YAML.
fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose, quiet).as_str().to_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: &Cli) -> Result<String> {
    let mut tool = ToolConfig::load(cli.config.as_deref())?;
    if let Some(nctl) = &cli.nctl {
        tool.nctl_path = nctl.clone();
    }
    let nctl = Nctl::new(tool.nctl_path);
    tracing::debug!(nctl = %nctl.program().display(), "using nctl binary");

    let generator = DeploioEnv::new(cli.generator_config(), nctl);
    let environment = generator.generate().await?;
    Ok(environment.render(generator.config()))
}

/// nctl's own status for nctl failures, 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    let status = err.downcast_ref::<NctlError>().map_or(1, NctlError::exit_status);
    u8::try_from(status).ok().filter(|status| *status != 0).unwrap_or(1)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<NctlError>() {
                // relay nctl's own message as is
                Some(NctlError::CommandFailed { message, .. }) => eprintln!("{}", message),
                _ => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(exit_status(&err))
        }
    }
}
