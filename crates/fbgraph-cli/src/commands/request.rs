//! Raw request command

use crate::{
    cli::{ConnectionArgs, OutputFormat},
    error::CliResult,
    utils::{parse_key_value, ColoredOutput},
};
use fbgraph_core::{Params, UploadableParameter};
use fbgraph_http::{RequestDispatcher, RequestOptions, Verb};
use tracing::debug;

impl ConnectionArgs {
    /// Per-call overrides; unset flags leave the defaults in charge
    pub fn to_options(&self) -> RequestOptions {
        let mut options = RequestOptions::new();
        options.use_ssl = self.ssl;
        options.proxy = self.proxy.clone();
        options.timeout = self.timeout;
        options.ca_file = self.ca_file.clone();
        options.ca_path = self.ca_path.clone();
        options.port = self.port;
        options
    }
}

pub struct RequestCommand;

impl RequestCommand {
    /// Assemble the parameter set from `key=value` and `key=path` arguments
    pub fn build_params(params: &[String], files: &[String]) -> CliResult<Params> {
        let mut built = Params::new();
        for arg in params {
            let (key, value) = parse_key_value(arg)?;
            built.insert(key, value);
        }
        for arg in files {
            let (key, path) = parse_key_value(arg)?;
            built.insert(key, UploadableParameter::from_path(path, None)?);
        }
        Ok(built)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        dispatcher: &RequestDispatcher,
        path: &str,
        verb: &str,
        params: &[String],
        files: &[String],
        options: RequestOptions,
        format: OutputFormat,
        include: bool,
    ) -> CliResult<()> {
        let params = Self::build_params(params, files)?;
        let verb = Verb::parse(verb);
        debug!(%verb, path, count = params.len(), "sending request");

        let response = dispatcher.execute(path, params, verb, &options).await?;

        if include {
            let status = response.status().to_string();
            let status = if response.status() < 400 {
                ColoredOutput::success(&status)
            } else {
                ColoredOutput::error(&status)
            };
            println!("{} {}", ColoredOutput::highlight("status"), status);
            for (name, value) in response.headers() {
                println!(
                    "{}: {}",
                    ColoredOutput::dim(name.as_str()),
                    value.to_str().unwrap_or("<binary>")
                );
            }
            println!();
        }
        println!("{}", format.format_body(&response.body()));
        Ok(())
    }
}
