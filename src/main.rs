use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use fix_test_workflow::github::GitHubClient;
use fix_test_workflow::{init_telemetry, script};

#[derive(Parser)]
#[command(name = "fix-test-workflow")]
#[command(about = "Fix test workflows so a failed test_matrix job fails the dependent test job")]
#[command(
    long_about = "Scans each repository for .github/workflows/test.yml, and when the test job \
                  depends on test_matrix without an `if` guard, opens a pull request adding an \
                  always-run condition plus an early-exit step guarding on the matrix result."
)]
struct Cli {
    /// GitHub token with repo scope
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repositories to patch
    #[arg(required = true, value_name = "OWNER/REPO")]
    repositories: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry()?;

    tokio::runtime::Runtime::new()?.block_on(run_batch(cli))
}

/// Run the script against every repository, recording failures without
/// aborting the rest of the batch.
async fn run_batch(cli: Cli) -> Result<()> {
    let octocrab = octocrab::Octocrab::builder()
        .personal_token(cli.token.clone())
        .build()?;

    let mut failures = 0usize;

    for target in &cli.repositories {
        let Some((owner, repo)) = target.split_once('/').filter(|(o, r)| !o.is_empty() && !r.is_empty()) else {
            error!(repository = %target, "expected OWNER/REPO");
            failures += 1;
            continue;
        };

        let client = GitHubClient::new(octocrab.clone(), owner.to_string(), repo.to_string());

        let result = async {
            let repository = client.get_repository().await?;
            script::run(&client, &repository).await
        }
        .await;

        match result {
            Ok(outcome) => info!(repository = %target, outcome = ?outcome, "repository processed"),
            Err(err) => {
                failures += 1;
                error!(repository = %target, error = %format!("{err:#}"), "repository failed");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} repositories failed",
            cli.repositories.len()
        );
    }

    Ok(())
}
