use clap::Parser;
use deepzoom::{
    config::{Cli, RenderConfig},
    render,
};
use log::{debug, error};

fn main() {
    env_logger::init();

    let config = match RenderConfig::try_from(Cli::parse()) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    debug!("using {} worker threads", config.threads);
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
    {
        error!("failed to start worker threads: {}", err);
        std::process::exit(1);
    }

    if let Err(err) = render::run_with_precision(config) {
        error!("{}", err);
        std::process::exit(1);
    }
}
