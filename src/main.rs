use clap::Parser;

use picdex::app::GalleryApp;
use picdex::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("picdex=info".parse()?),
        )
        .init();

    let config = Config::parse();
    GalleryApp::new(config).run().await
}
