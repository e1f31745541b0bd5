use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{
    Args, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use tracing::{error, warn};

mod app;
mod audio;
mod catalog;
mod config;
mod mpris;
mod playback;
mod runtime;
mod session;
mod ui;

use session::{SessionStore, greeting_alias};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    name = env!("CARGO_PKG_NAME"),
    bin_name = env!("CARGO_PKG_NAME"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    styles = styles(),
)]
struct Cli {
    /// Defaults to `play`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Open the player (requires a signed-in account)
    Play,

    /// Create the local account and sign in
    Register(RegisterOptions),

    /// Sign in with the local account
    Login(LoginOptions),

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,
}

#[derive(Args, Debug, Clone)]
struct RegisterOptions {
    /// Full name shown on the account
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    /// Prompted for (with confirmation) when omitted
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct LoginOptions {
    #[arg(long)]
    email: String,

    /// Prompted for when omitted
    #[arg(long)]
    password: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = runtime::init_logging() {
        eprintln!("teaser: logging disabled: {e}");
    }

    match dispatch(cli.command.unwrap_or(Command::Play)) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("teaser: {e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = SessionStore::open_default()?;

    match command {
        Command::Play => {
            let Some(email) = store.current_user()? else {
                warn!("play: nobody signed in");
                eprintln!("teaser: not signed in; run `teaser login --email <EMAIL>` first");
                return Ok(ExitCode::FAILURE);
            };
            let settings = runtime::load_settings();
            runtime::run(settings, &email)?;
        }
        Command::Register(opt) => {
            let (password, confirm) = match opt.password {
                Some(p) => (p.clone(), p),
                None => (prompt("Password: ")?, prompt("Confirm password: ")?),
            };
            let account = store.register(&opt.name, &opt.email, &password, &confirm)?;
            println!("Welcome, {}", greeting_alias(&account.email));
        }
        Command::Login(opt) => {
            let password = match opt.password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            store.login(&opt.email, &password)?;
            println!("Signed in as {}", opt.email.trim());
        }
        Command::Logout => {
            if store.logout()? {
                println!("Signed out");
            } else {
                println!("Nobody was signed in");
            }
        }
        Command::Whoami => match store.current_user()? {
            Some(email) => println!("{email}"),
            None => {
                println!("Not signed in");
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// Read one line from stdin, without the trailing newline.
fn prompt(label: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
