use ga_event_tracker::{
    config::{Config, Protocol},
    default_client, measurement, universal, Error, SendEvent,
};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    match run() {
        Ok(name) => {
            info!("Event \"{}\" sent", name);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, Error> {
    let config = Config::from_env()?;
    let name = config.event_name().to_string();
    let client = default_client()?;

    match config.protocol {
        Protocol::Measurement { meta, event } => {
            let mut tracker = measurement::Tracker::new(meta, client);
            if let Some(endpoint) = &config.endpoint {
                tracker = tracker.with_endpoint(endpoint)?;
            }
            tracker.send_event(&event)?;
        }
        Protocol::Universal { meta, event } => {
            let mut tracker = universal::Tracker::new(meta, client);
            if let Some(endpoint) = &config.endpoint {
                tracker = tracker.with_endpoint(endpoint)?;
            }
            tracker.send_event(&event)?;
        }
    }

    Ok(name)
}
