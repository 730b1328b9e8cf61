//! Command-line configuration for `relpub dist`.
//!
//! clap resolves each value as flag, then environment variable, then
//! default. [`DistConfig::from_args`] validates the result once and the
//! command works from that frozen value only.

use std::path::PathBuf;

use clap::Args;
use relpub_core::descriptor::{ReleaseInputs, SigningOptions};
use relpub_core::io::UploadOptions;
use relpub_core::{PublishRequest, SigningAlgorithm, SigningError, SigningKeySource};
use relpub_schema::{Channel, Checksum, EntitlementConstraints, ProductId, Signature};
use thiserror::Error;

/// Registry used when none is configured.
pub const DEFAULT_API_URL: &str = "https://api.keygen.sh";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Channel(String),

    #[error(transparent)]
    Algorithm(#[from] SigningError),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Args)]
pub struct DistArgs {
    /// Path to the release artifact
    pub path: PathBuf,

    /// Your account identifier
    #[arg(long, env = "RELPUB_ACCOUNT_ID")]
    pub account: String,

    /// Your product identifier
    #[arg(long, env = "RELPUB_PRODUCT_ID")]
    pub product: String,

    /// Your product token
    #[arg(long, env = "RELPUB_PRODUCT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Version for the release
    #[arg(long)]
    pub version: String,

    /// Filename for the release (default grabs basename from <PATH>)
    #[arg(long)]
    pub filename: Option<String>,

    /// Filetype for the release (default grabs extname from <PATH>)
    #[arg(long, default_value = "auto")]
    pub filetype: String,

    /// Human-readable name for the release
    #[arg(long)]
    pub name: Option<String>,

    /// Description for the release (e.g. release notes)
    #[arg(long)]
    pub description: Option<String>,

    /// Platform for the release
    #[arg(long)]
    pub platform: Option<String>,

    /// Channel for the release, one of: stable, rc, beta, alpha, dev
    #[arg(long, default_value = "stable")]
    pub channel: String,

    /// Pre-calculated signature for the release
    #[arg(long)]
    pub signature: Option<String>,

    /// Pre-calculated checksum for the release (defaults to sha-512)
    #[arg(long)]
    pub checksum: Option<String>,

    /// Signing algorithm, one of: ed25519ph, ed25519
    #[arg(long, default_value = "ed25519ph")]
    pub signing_algorithm: String,

    /// Path to an ed25519 private key for signing the release
    #[arg(long, value_name = "PATH", env = "RELPUB_SIGNING_KEY_PATH")]
    pub signing_key: Option<String>,

    /// Hex-encoded ed25519 private key (used when no key path is given)
    #[arg(skip = std::env::var("RELPUB_SIGNING_KEY").ok())]
    pub signing_key_inline: Option<String>,

    /// Comma separated list of entitlement constraints (e.g. <id>,<id>,...)
    #[arg(long, value_delimiter = ',')]
    pub entitlements: Vec<String>,

    /// Registry API base URL [default: https://api.keygen.sh]
    #[arg(long, env = "RELPUB_API_URL")]
    pub api_url: Option<String>,
}

/// Validated, immutable configuration for one `dist` run.
#[derive(Debug, Clone)]
pub struct DistConfig {
    pub account: String,
    pub token: String,
    pub api_url: String,
    pub request: PublishRequest,
}

impl DistConfig {
    /// Validate `args` and freeze them.
    ///
    /// Only checks that need no I/O happen here: the version, signing key
    /// and artifact are validated by the pipeline before any network call.
    pub fn from_args(args: DistArgs) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("account", &args.account),
            ("product", &args.product),
            ("token", &args.token),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }

        let channel: Channel = args.channel.parse().map_err(ConfigError::Channel)?;
        let algorithm: SigningAlgorithm = args.signing_algorithm.parse()?;
        // An empty environment variable counts as unset.
        let key_path = non_empty(args.signing_key).map(PathBuf::from);
        let signing = SigningKeySource::select(key_path, non_empty(args.signing_key_inline))
            .map(|key| SigningOptions { key, algorithm });

        let mut inputs = ReleaseInputs::new(ProductId::new(args.product), args.version);
        inputs.filename = non_empty(args.filename);
        inputs.filetype = args.filetype;
        inputs.channel = channel;
        inputs.platform = non_empty(args.platform);
        inputs.name = non_empty(args.name);
        inputs.description = non_empty(args.description);
        inputs.constraints = EntitlementConstraints::from_lists(&args.entitlements);
        inputs.checksum = non_empty(args.checksum).map(Checksum::new);
        inputs.signature = non_empty(args.signature).map(Signature::new);
        inputs.signing = signing;

        Ok(Self {
            account: args.account,
            token: args.token,
            api_url: non_empty(args.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request: PublishRequest {
                path: args.path,
                inputs,
                upload: UploadOptions::default(),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
