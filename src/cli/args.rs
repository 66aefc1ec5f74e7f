//! Command-line argument parsing

use crate::cli::config::{ClientConfig, DEFAULT_TOKEN_ENDPOINT, DEFAULT_TOKEN_SERVICE, ServerConfig};
use crate::error::ConfigError;
use crate::image::Platform;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "image-inspector")]
#[command(about = "Serve image download size and OS identity straight from container registries")]
#[command(version)]
pub struct Args {
    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(help = "Address the HTTP server binds to")]
    pub listen_address: String,

    /// Timeout in seconds for manifest and token requests
    #[arg(
        long = "timeout",
        short = 't',
        default_value = "30",
        help = "Timeout for manifest and token requests in seconds"
    )]
    pub timeout: u64,

    /// Timeout in seconds for blob downloads
    #[arg(
        long = "blob-timeout",
        default_value = "600",
        help = "Timeout for layer blob downloads in seconds"
    )]
    pub blob_timeout: u64,

    /// Token issuer used for every registry
    #[arg(
        long = "token-endpoint",
        default_value = DEFAULT_TOKEN_ENDPOINT,
        help = "Bearer token endpoint queried for pull scopes"
    )]
    pub token_endpoint: String,

    #[arg(
        long = "token-service",
        default_value = DEFAULT_TOKEN_SERVICE,
        help = "Service name sent to the token endpoint"
    )]
    pub token_service: String,

    /// Target platform architecture for manifest indexes
    #[arg(long = "platform-arch", default_value = "amd64")]
    pub platform_arch: String,

    /// Target platform OS for manifest indexes
    #[arg(long = "platform-os", default_value = "linux")]
    pub platform_os: String,

    /// Talk plain HTTP to registries
    #[arg(
        long = "insecure-registry",
        help = "Use http:// instead of https:// for registry hosts"
    )]
    pub insecure_registry: bool,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet mode
    #[arg(
        long = "quiet",
        short = 'q',
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_insecure_registry(self.insecure_registry)
            .with_timeout(self.timeout)
            .with_blob_timeout(self.blob_timeout)
            .with_token_endpoint(self.token_endpoint.clone())
            .with_token_service(self.token_service.clone())
            .with_platform(Platform::new(self.platform_arch.clone(), self.platform_os.clone()))
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.listen_address.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server_config().validate()?;
        self.client_config().validate()
    }
}
