mod api;
mod app;
mod auth;
mod config;
mod dialog;
mod error;
mod form;
mod logging;
mod login;
mod project;
mod project_dialog;
mod project_list;
mod routes;
mod task;
mod task_dialog;
mod task_list;
#[cfg(test)]
mod testing;
mod token_store;
mod ui;

use crate::api::{ApiClient, HttpTransport};
use crate::app::App;
use crate::auth::{AuthSession, Credentials};
use crate::config::Config;
use crate::login::LOGIN_FAILED;
use crate::project::ProjectClient;
use crate::routes::Route;
use crate::task::TaskClient;
use crate::token_store::FileTokenStore;
use clap::{Arg, ArgMatches, Command};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::rc::Rc;
use tracing::{error, info};

fn cli() -> Command {
    Command::new("taskdesk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal console for projects and their tasks")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .help("Base URL of the API (overrides config)"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session token")
                .arg(Arg::new("email").long("email").help("Account email"))
                .arg(Arg::new("password").long("password").help("Account password")),
        )
        .subcommand(Command::new("logout").about("Forget the stored session token"))
        .subcommand(Command::new("status").about("Show whether a session is stored"))
        .subcommand(Command::new("projects").about("List projects"))
        .subcommand(
            Command::new("tasks")
                .about("List the tasks of a project")
                .arg(
                    Arg::new("project_id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64))
                        .help("Project id"),
                ),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let (mut config, config_problems) = Config::load();
    if let Some(url) = api_url(&matches) {
        config.api.base_url = url.clone();
    }

    let home = config::home_dir().ok();
    if let Some(home) = &home {
        logging::init(home, &config.logging.level)?;
    }
    for problem in &config_problems {
        error!("config: {}", problem);
        eprintln!("warning: {}", problem);
    }
    info!(base_url = %config.api.base_url, "starting");

    let tokens = Rc::new(FileTokenStore::new(home.map(|h| h.join("session.json"))));
    let transport = Rc::new(HttpTransport::new(&config.api.base_url)?);
    let api = ApiClient::new(transport, tokens);

    match matches.subcommand() {
        Some(("login", sub)) => login(&AuthSession::new(api), sub)?,
        Some(("logout", _)) => {
            AuthSession::new(api).logout();
            println!("Logged out.");
        }
        Some(("status", _)) => {
            if AuthSession::new(api).is_authenticated() {
                println!("Signed in ({})", config.api.base_url);
            } else {
                println!("Not signed in.");
            }
        }
        Some(("projects", _)) => list_projects(api)?,
        Some(("tasks", sub)) => {
            let project_id = *sub.get_one::<i64>("project_id").ok_or("missing project id")?;
            list_tasks(api, project_id)?;
        }
        _ => run_console(api, config.console.creator_id)?,
    }
    Ok(())
}

/// `--api-url` is global, so it may come before or after the subcommand.
fn api_url(matches: &ArgMatches) -> Option<&String> {
    matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>("api-url"))
        .or_else(|| matches.get_one::<String>("api-url"))
}

fn run_console(api: ApiClient, creator_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api, creator_id);
    app.navigate(Route::parse(""));

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{:?}", err);
    }
    Ok(())
}

fn login(session: &AuthSession, args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let email = match args.get_one::<String>("email") {
        Some(email) => email.clone(),
        None => prompt("Email")?,
    };
    let password = match args.get_one::<String>("password") {
        Some(password) => password.clone(),
        None => prompt("Password")?,
    };
    match session.login(&Credentials { email, password }) {
        Some(_) => {
            println!("Signed in.");
            Ok(())
        }
        None => Err(LOGIN_FAILED.into()),
    }
}

fn list_projects(api: ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    for project in ProjectClient::new(api).list()? {
        println!(
            "- [{}] {} ({}, {}) {}",
            project.project_id,
            project.name,
            project.chain.as_deref().unwrap_or("-"),
            project.source.as_deref().unwrap_or("-"),
            project.status
        );
    }
    Ok(())
}

fn list_tasks(api: ApiClient, project_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    for task in TaskClient::new(api).list_for_project(project_id)? {
        println!(
            "- [{}] {} {} (Due: {})",
            task.task_id,
            task.title,
            task.status,
            task.deadline.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}: ", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let matches = cli()
            .try_get_matches_from(["taskdesk", "--api-url", "http://api.test", "tasks", "4"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("api-url").map(String::as_str),
            Some("http://api.test")
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "tasks");
        assert_eq!(sub.get_one::<i64>("project_id"), Some(&4));
    }

    #[test]
    fn api_url_may_follow_the_subcommand() {
        let matches = cli()
            .try_get_matches_from(["taskdesk", "tasks", "4", "--api-url", "http://late.test"])
            .unwrap();
        assert_eq!(api_url(&matches).map(String::as_str), Some("http://late.test"));

        let matches = cli()
            .try_get_matches_from(["taskdesk", "--api-url", "http://early.test", "projects"])
            .unwrap();
        assert_eq!(api_url(&matches).map(String::as_str), Some("http://early.test"));

        let matches = cli().try_get_matches_from(["taskdesk", "status"]).unwrap();
        assert_eq!(api_url(&matches), None);
    }

    #[test]
    fn tasks_requires_numeric_project() {
        assert!(cli().try_get_matches_from(["taskdesk", "tasks", "abc"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }
}
