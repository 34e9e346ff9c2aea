//! fbgraph CLI main entry point

use clap::Parser;
use fbgraph_cli::{
    cli::{Cli, Commands},
    commands::{manager_from_args, OAuthCommand, RequestCommand},
    error::CliResult,
    utils::{init_tracing, load_defaults, ColoredOutput},
};
use fbgraph_http::RequestDispatcher;
use tracing::debug;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("fbgraph CLI v{}", env!("CARGO_PKG_VERSION"));

    let defaults = load_defaults(cli.config.as_deref())?;
    let dispatcher = RequestDispatcher::new(defaults);

    match cli.command {
        Commands::Request {
            path,
            verb,
            params,
            files,
            rest,
            beta,
            video,
            connection,
            format,
            include,
        } => {
            let options = connection
                .to_options()
                .rest_api(rest)
                .beta(beta)
                .video(video);
            RequestCommand::run(
                &dispatcher,
                &path,
                &verb,
                &params,
                &files,
                options,
                format,
                include,
            )
            .await
        }

        Commands::AuthorizeUrl { scope, display } => {
            let manager = manager_from_args(&cli.app, false, dispatcher)?;
            println!("{}", OAuthCommand::authorize_url(&manager, scope, display)?);
            Ok(())
        }

        Commands::ExchangeUrl { code } => {
            let manager = manager_from_args(&cli.app, true, dispatcher)?;
            println!("{}", OAuthCommand::exchange_url(&manager, &code)?);
            Ok(())
        }

        Commands::AccessToken { code, connection } => {
            let manager = manager_from_args(&cli.app, true, dispatcher)?;
            OAuthCommand::access_token(&manager, &code, connection.to_options()).await
        }

        Commands::AppToken { connection } => {
            let manager = manager_from_args(&cli.app, true, dispatcher)?;
            OAuthCommand::app_token(&manager, connection.to_options()).await
        }

        Commands::ExchangeSessions { keys, connection } => {
            let manager = manager_from_args(&cli.app, true, dispatcher)?;
            OAuthCommand::exchange_sessions(&manager, &keys, connection.to_options()).await
        }

        Commands::ParseSignedRequest { signed_request } => {
            let manager = manager_from_args(&cli.app, true, dispatcher)?;
            OAuthCommand::parse_signed_request(&manager, &signed_request)
        }

        Commands::ParseCookie { cookies } => {
            let manager = manager_from_args(&cli.app, true, dispatcher)?;
            OAuthCommand::parse_cookie(&manager, &cookies)
        }
    }
}
