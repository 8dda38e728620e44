use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    // All arguments carry default literals, so the lookups cannot miss; the
    // ok_or_else guards keep that assumption explicit.
    let secret = matches
        .get_one::<String>("secret")
        .map(|s| SecretString::from(s.to_string()))
        .ok_or_else(|| anyhow::anyhow!("missing argument: --secret"))?;

    let flag = matches
        .get_one::<String>("flag")
        .map(String::to_string)
        .ok_or_else(|| anyhow::anyhow!("missing argument: --flag"))?;

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(3000),
        dsn: matches
            .get_one::<String>("dsn")
            .map(String::to_string)
            .ok_or_else(|| anyhow::anyhow!("missing argument: --dsn"))?,
    };

    Ok((action, GlobalArgs::new(secret, flag)))
}
