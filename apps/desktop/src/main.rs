use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use signup_client::{load_settings, Operation, RosterView, SignupApi, SignupClient};
use signup_shared::domain::ActivityName;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "signup", about = "List activities and manage signups")]
struct Cli {
    /// Backend base URL; overrides signup.toml and environment settings.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every activity with its availability and participants.
    List,
    /// Register an email for an activity.
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Unregister an email from an activity.
    Remove {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.server_url.as_deref() {
        settings = settings.with_server_url(url);
    }
    let client = SignupClient::from_settings(&settings)
        .with_context(|| format!("failed to build client for {}", settings.server_url))?;

    let succeeded = match cli.command {
        Command::List => print_roster(&client).await,
        Command::Signup { activity, email } => signup(&client, activity, email).await,
        Command::Remove {
            activity,
            email,
            yes,
        } => remove(&client, activity, email, yes).await?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn print_roster(api: &dyn SignupApi) -> bool {
    let mut view = RosterView::new();
    match api.list_activities().await {
        Ok(roster) => {
            view.render(&roster);
            print!("{view}");
            true
        }
        Err(err) => {
            warn!("error fetching activities: {err}");
            view.render_failure();
            eprint!("{view}");
            false
        }
    }
}

/// Trimmed email plus activity, or `None` when either is blank.
fn required_inputs(activity: String, email: &str) -> Option<(ActivityName, String)> {
    let email = email.trim();
    if activity.trim().is_empty() || email.is_empty() {
        return None;
    }
    Some((ActivityName::from(activity), email.to_string()))
}

async fn signup(api: &dyn SignupApi, activity: String, email: String) -> bool {
    let Some((activity, email)) = required_inputs(activity, &email) else {
        debug!("signup ignored: missing activity or email");
        return true;
    };

    match api.signup(&activity, &email).await {
        Ok(response) => {
            println!("{}", response.text_or("Signup successful"));
            println!();
            print_roster(api).await;
            true
        }
        Err(err) => {
            eprintln!("{}", err.user_message(Operation::Signup));
            false
        }
    }
}

async fn remove(api: &dyn SignupApi, activity: String, email: String, yes: bool) -> Result<bool> {
    let Some((activity, email)) = required_inputs(activity, &email) else {
        debug!("removal ignored: missing activity or email");
        return Ok(true);
    };

    if !yes && !confirm(&format!("Unregister {email} from {activity}?"))? {
        return Ok(true);
    }

    match api.unregister(&activity, &email).await {
        Ok(response) => {
            println!("{}", response.text_or("Participant removed"));
            match api.list_activities().await {
                Ok(roster) => match roster.get(activity.as_str()) {
                    Some(current) => {
                        println!("{activity}: {} spots left", current.spots_left())
                    }
                    None => warn!(activity = %activity, "activity missing from refreshed roster"),
                },
                Err(err) => warn!(activity = %activity, "availability refresh failed: {err}"),
            }
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", err.user_message(Operation::RemoveParticipant));
            Ok(false)
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_remove_with_global_server_url() {
        let cli = Cli::try_parse_from([
            "signup",
            "remove",
            "--activity",
            "Chess Club",
            "--email",
            "a@x.com",
            "--yes",
            "--server-url",
            "http://school:8000",
        ])
        .expect("parse");

        assert_eq!(cli.server_url.as_deref(), Some("http://school:8000"));
        match cli.command {
            Command::Remove {
                activity,
                email,
                yes,
            } => {
                assert_eq!(activity, "Chess Club");
                assert_eq!(email, "a@x.com");
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn inputs_are_trimmed_and_blank_ones_rejected() {
        let (activity, email) =
            required_inputs("Chess Club".to_string(), "  a@x.com \n").expect("inputs");
        assert_eq!(activity.as_str(), "Chess Club");
        assert_eq!(email, "a@x.com");

        assert!(required_inputs("Chess Club".to_string(), "   ").is_none());
        assert!(required_inputs(" ".to_string(), "a@x.com").is_none());
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
    }
}
