use clap::{Parser, Subcommand};
use replica_probe::http::ReplicaReport;

#[derive(Parser)]
#[command(name = "probe-cli")]
#[command(about = "Operator CLI for the replica health-probe aggregator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "AUTH_TOKEN", default_value = "")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the aggregator itself is up
    Health,
    /// Probe every replica behind the target and summarize
    Check {
        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
        /// Exit with status 2 if any replica is offline
        #[arg(long)]
        fail_on_offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            let status = res.status();
            println!("{} {}", status, res.text().await?);
            if !status.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Check { json, fail_on_offline } => {
            let res = client
                .get(format!("{}/check_replicas", base))
                .query(&[("auth_token", cli.token.as_str())])
                .send()
                .await?;

            let status = res.status();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                eprintln!("Error: aggregator rejected the auth token");
                std::process::exit(1);
            }

            let report: ReplicaReport = res.json().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if report.server_error.is_some() {
                std::process::exit(1);
            }
            if fail_on_offline && report.offline_replicas > 0 {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

fn print_report(report: &ReplicaReport) {
    if let Some(error) = &report.server_error {
        eprintln!("Error: {}", error);
        return;
    }

    println!(
        "{}/{} replicas online ({} offline), total {} ms",
        report.online_replicas,
        report.total_replicas,
        report.offline_replicas,
        report.total_response_time
    );

    for replica in report.replica_responses.iter().flatten() {
        let outcome = match &replica.error {
            Some(error) => error.clone(),
            None => replica.response_body.trim().to_string(),
        };
        println!(
            "  {:<40} {:>3} {:>6} ms  {}",
            replica.ip_address, replica.status_code, replica.response_time, outcome
        );
    }
}
