//! OAuth commands: URLs, token exchange, cookie and signed request checks

use crate::{
    cli::AppArgs,
    error::{CliError, CliResult},
    utils::{parse_key_value, ColoredOutput},
};
use fbgraph_http::{RequestDispatcher, RequestOptions};
use fbgraph_oauth::{AccessTokenInfo, OAuthOptions, OAuthTokenManager};
use std::collections::HashMap;

/// Build the manager, requiring the app id and, when `needs_secret`, the secret
pub fn manager_from_args(
    app: &AppArgs,
    needs_secret: bool,
    dispatcher: RequestDispatcher,
) -> CliResult<OAuthTokenManager> {
    let app_id = app
        .app_id
        .clone()
        .ok_or(CliError::MissingCredential("app id"))?;
    let app_secret = match &app.app_secret {
        Some(secret) => secret.clone(),
        None if needs_secret => return Err(CliError::MissingCredential("app secret")),
        None => String::new(),
    };
    Ok(OAuthTokenManager::new(
        app_id,
        app_secret,
        app.callback.clone(),
        dispatcher,
    ))
}

fn print_token(info: &AccessTokenInfo) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(info)?);
    Ok(())
}

pub struct OAuthCommand;

impl OAuthCommand {
    pub fn authorize_url(
        manager: &OAuthTokenManager,
        scope: Vec<String>,
        display: Option<String>,
    ) -> CliResult<String> {
        let mut options = OAuthOptions::new();
        if !scope.is_empty() {
            options = options.permissions(scope);
        }
        if let Some(display) = display {
            options = options.display(display);
        }
        Ok(manager.authorization_url(&options)?)
    }

    pub fn exchange_url(manager: &OAuthTokenManager, code: &str) -> CliResult<String> {
        Ok(manager.token_exchange_url(code, &OAuthOptions::new())?)
    }

    pub async fn access_token(
        manager: &OAuthTokenManager,
        code: &str,
        request: RequestOptions,
    ) -> CliResult<()> {
        let info = manager
            .fetch_access_token_info(code, &OAuthOptions::new().request(request))
            .await?;
        print_token(&info)
    }

    pub async fn app_token(manager: &OAuthTokenManager, request: RequestOptions) -> CliResult<()> {
        let info = manager
            .fetch_app_access_token_info(&OAuthOptions::new().request(request))
            .await?;
        print_token(&info)
    }

    pub async fn exchange_sessions(
        manager: &OAuthTokenManager,
        keys: &[String],
        request: RequestOptions,
    ) -> CliResult<()> {
        let results = manager
            .exchange_session_keys(keys, &OAuthOptions::new().request(request))
            .await?;
        for (key, result) in keys.iter().zip(results) {
            match result {
                Some(info) => println!("{} {}", ColoredOutput::highlight(key), info.access_token),
                None => println!("{} {}", ColoredOutput::highlight(key), ColoredOutput::dim("invalid")),
            }
        }
        Ok(())
    }

    pub fn parse_signed_request(manager: &OAuthTokenManager, signed: &str) -> CliResult<()> {
        let payload = manager.parse_signed_request(signed)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        Ok(())
    }

    pub fn parse_cookie(manager: &OAuthTokenManager, cookies: &[String]) -> CliResult<()> {
        let jar = cookies
            .iter()
            .map(|c| parse_key_value(c))
            .collect::<CliResult<HashMap<String, String>>>()?;
        match manager.user_info_from_cookies(&jar) {
            Some(info) => {
                println!("{}", serde_json::to_string_pretty(&info)?);
                Ok(())
            }
            None => Err(CliError::InvalidArgument(
                "no valid application cookie found".to_string(),
            )),
        }
    }
}
