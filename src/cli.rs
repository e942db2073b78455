//! Command-line argument handling for the `catalog-fetch` binary

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::config::Config;

/// Where the query JSON comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl QuerySource {
    fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            QuerySource::Stdin
        } else if let Some(path) = arg.strip_prefix('@') {
            QuerySource::File(PathBuf::from(path))
        } else {
            QuerySource::Inline(arg.to_string())
        }
    }

    pub fn read_query(&self) -> Result<Value> {
        let text = match self {
            QuerySource::Inline(text) => text.clone(),
            QuerySource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read query file {}", path.display()))?,
            QuerySource::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };

        serde_json::from_str(&text).context("Query is not valid JSON")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(QuerySource),
    InitConfig,
    GenerateConfig,
    ShowPath,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub auth_token: Option<String>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

const VALUE_FLAGS: [&str; 4] = ["--config", "--url", "--token", "--output"];

impl CliArgs {
    /// Parse arguments, excluding the program name
    pub fn parse(args: &[String]) -> Result<Self> {
        let has = |flag: &str| args.iter().any(|a| a == flag);
        let value_of = |flag: &str| -> Result<Option<String>> {
            match args.iter().position(|a| a == flag) {
                Some(pos) => args
                    .get(pos + 1)
                    .filter(|v| !v.starts_with("--"))
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| anyhow!("{} needs a value", flag)),
                None => Ok(None),
            }
        };

        let mut positional = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if VALUE_FLAGS.contains(&arg.as_str()) {
                iter.next();
            } else if arg.starts_with("--") {
                if !matches!(
                    arg.as_str(),
                    "--init-config" | "--generate-config" | "--show-path" | "--help" | "--verbose"
                ) {
                    bail!("Unknown option: {}", arg);
                }
            } else {
                positional.push(arg.as_str());
            }
        }
        if positional.len() > 1 {
            bail!("Expected at most one query, got {}", positional.len());
        }

        let command = if has("--help") {
            Command::Help
        } else if has("--init-config") {
            Command::InitConfig
        } else if has("--generate-config") {
            Command::GenerateConfig
        } else if has("--show-path") {
            Command::ShowPath
        } else {
            Command::Fetch(
                positional
                    .first()
                    .map(|arg| QuerySource::from_arg(arg))
                    .unwrap_or(QuerySource::Stdin),
            )
        };

        Ok(Self {
            command,
            config_path: value_of("--config")?.map(PathBuf::from),
            api_url: value_of("--url")?,
            auth_token: value_of("--token")?,
            output: value_of("--output")?.map(PathBuf::from),
            verbose: has("--verbose"),
        })
    }

    /// Load the persisted config and apply one-off overrides
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.api_url = url.clone();
        }
        if let Some(token) = &self.auth_token {
            config.api.auth_token = token.clone();
        }
        if let Some(output) = &self.output {
            config.storage.response_path = Some(output.clone());
        }
    }
}
