//! Runner wiring parsed arguments into the registry client and HTTP server

use crate::api::AppState;
use crate::cli::args::Args;
use crate::logging::Logger;
use crate::registry::RegistryClient;
use crate::server::Server;

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, output }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        self.args.validate()?;

        let client_config = self.args.client_config();
        self.output.verbose(&format!(
            "Registry scheme: {}, token endpoint: {}, platform: {}",
            client_config.scheme, client_config.token_endpoint, client_config.platform
        ));
        self.output.verbose(&format!(
            "Timeouts: {}s control, {}s blob",
            client_config.timeout, client_config.blob_timeout
        ));

        let client = RegistryClient::new(client_config, self.output.clone())?;
        let state = AppState::new(client, self.output.clone());
        let server = Server::new(self.args.server_config(), state, self.output.clone());

        server.run().await?;
        self.output.info("Server stopped");
        Ok(())
    }
}
