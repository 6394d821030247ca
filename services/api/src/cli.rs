use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use admit_match::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "University Match Service",
    about = "Score applicants against a university catalog over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one applicant profile against a catalog file and print JSON
    Score(ScoreArgs),
    /// Score a built-in sample applicant against a built-in sample catalog
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "admit-match-api",
            "score",
            "--profile",
            "profile.json",
            "--catalog",
            "catalog.csv",
            "--limit",
            "5",
            "--tiers",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.profile.to_str(), Some("profile.json"));
                assert_eq!(args.catalog.to_str(), Some("catalog.csv"));
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.page, None);
                assert!(args.tiers);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }
}
