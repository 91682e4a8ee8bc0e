use snafu::OptionExt;

use crate::Result;
use crate::command::{run_keygen, run_openapi};
use crate::config::CliArgs;
use crate::config::Commands;
use crate::config::Config;
use crate::error::ConfigSnafu;
use crate::web::server::run_web_server;

pub async fn run_command(args: CliArgs) -> Result<()> {
    match args.command {
        Commands::Server => {
            let filename = args.config.context(ConfigSnafu {
                msg: "Config file is required, use --config config.toml".to_string(),
            })?;
            let config = Config::build(&filename)?;
            run_web_server(&config).await
        }
        Commands::Openapi { output } => run_openapi(output),
        Commands::Keygen => run_keygen(),
    }
}
