use clap::{Parser, Subcommand};
use piketers::config::{init_logging, AppConfig};
use piketers::display::{print_assignment, print_roster, print_schedule_table, NO_TASK_TODAY};
use piketers::relay::{deliver, status_line, TelegramClient, TelegramRelay, WhatsappRelay};
use piketers::schedule::{generate_assignment, today_name, ScheduleTable};
use piketers::settings::SettingsStore;
use piketers::web::{self, AppState};

/// Piketers: daily piket rotation for a fixed roster.
#[derive(Parser)]
#[command(name = "piketers", version, about)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate and print the assignment (default)
    Today {
        /// Day name to generate for instead of today (e.g. Senin)
        #[arg(long)]
        day: Option<String>,
    },
    /// Print the weekly schedule table
    Schedule,
    /// Show or edit the roster
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },
    /// Telegram credentials
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate and relay the assignment
    Send {
        #[arg(value_enum)]
        target: SendTarget,
        #[arg(long)]
        day: Option<String>,
    },
    /// Serve the web interface
    Web {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Subcommand)]
enum RosterAction {
    List,
    Add { name: String },
    Remove { index: usize },
}

#[derive(Subcommand)]
enum ConfigAction {
    SetToken { token: String },
    SetChat { chat_id: String },
    /// Find the chat id of a user who has messaged the bot, and store it
    Lookup { username: String },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SendTarget {
    Telegram,
    Whatsapp,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();
    let mut settings = SettingsStore::open(cli.config.settings_path())?;
    let table = ScheduleTable::default();

    match cli.command.unwrap_or(Command::Today { day: None }) {
        Command::Today { day } => {
            let day_name = day.unwrap_or_else(|| today_name().to_string());
            let assignment = generate_assignment(&table, &day_name, &settings.roster());
            print_assignment(&day_name, assignment.as_ref());
        }
        Command::Schedule => print_schedule_table(&table),
        Command::Roster { action } => match action {
            RosterAction::List => print_roster(&settings.roster()),
            RosterAction::Add { name } => print_roster(&settings.add_member(&name)?),
            RosterAction::Remove { index } => {
                let removed = settings.remove_member(index)?;
                println!("Removed {}", removed);
                print_roster(&settings.roster());
            }
        },
        Command::Config { action } => match action {
            ConfigAction::SetToken { token } => {
                settings.set_bot_token(&token)?;
                println!("Bot token saved");
            }
            ConfigAction::SetChat { chat_id } => {
                settings.set_target_chat_id(&chat_id)?;
                println!("Target chat ID saved");
            }
            ConfigAction::Lookup { username } => {
                let token = settings.bot_token();
                if token.trim().is_empty() {
                    println!("Please enter bot token first");
                    return Ok(());
                }
                let client = TelegramClient::new(cli.config.telegram_api.clone());
                match client.lookup_chat_id(&token, &username).await {
                    Ok(Some(chat_id)) => {
                        settings.set_target_chat_id(&chat_id)?;
                        println!("Found! Chat ID is {}", chat_id);
                    }
                    Ok(None) => println!("Username not found. Ensure the user has messaged your bot."),
                    Err(e) => println!("Error: {}", e),
                }
            }
        },
        Command::Send { target, day } => {
            let day_name = day.unwrap_or_else(|| today_name().to_string());
            let Some(assignment) = generate_assignment(&table, &day_name, &settings.roster()) else {
                println!("{}", NO_TASK_TODAY);
                return Ok(());
            };
            print_assignment(&day_name, Some(&assignment));

            let outcome = match target {
                SendTarget::Telegram => {
                    let client = TelegramClient::new(cli.config.telegram_api.clone());
                    match TelegramRelay::from_settings(client, &settings) {
                        Ok(relay) => deliver(&relay, &assignment.message).await,
                        Err(e) => Err(e),
                    }
                }
                SendTarget::Whatsapp => {
                    let relay = WhatsappRelay::new(cli.config.share_opener.clone());
                    deliver(&relay, &assignment.message).await
                }
            };
            println!("\n{}", status_line(&outcome));
        }
        Command::Web { port } => {
            println!("Starting web server on port {}...", port);
            println!("Access the site at http://localhost:{}", port);
            web::start_server(port, AppState::new(settings, &cli.config)).await?;
        }
    }

    Ok(())
}
