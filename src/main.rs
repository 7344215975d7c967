use std::env;
use std::path::PathBuf;

use wealth_roadmap::error::CliError;

const DEFAULT_SCENARIO_PATH: &str = "scenarios.json";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let scenario_path = env::var("WEALTH_ROADMAP_SCENARIOS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCENARIO_PATH));
        if let Err(e) = wealth_roadmap::api::run_http_server(port, scenario_path).await {
            log::error!("server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    match wealth_roadmap::api::run_cli(raw_args) {
        Ok(json) => println!("{json}"),
        Err(CliError::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}
