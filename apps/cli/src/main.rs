use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, CharacterSession, HttpCharacterStore, RemoteStore, SessionError,
    SessionSnapshot,
};
use shared::domain::{Character, CharacterId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "votes", about = "Browse characters and cast votes")]
struct Cli {
    /// Collection url, e.g. http://localhost:3000/characters
    #[arg(long)]
    base_url: Option<String>,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every character; the first one is shown in detail.
    List,
    /// Show one character (the first one when no id is given).
    Show { id: Option<String> },
    /// Add votes to a character.
    Vote { id: String, amount: String },
    /// Reset a character's votes to zero.
    Reset { id: String },
    /// Create a character and show it.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    let settings = load_settings()?.with_base_url_override(cli.base_url.as_deref())?;
    tracing::info!(base_url = %settings.base_url, "cli: using character collection");
    let store = HttpCharacterStore::from_settings(&settings)?;
    let mut session = CharacterSession::new(store);

    match cli.command {
        Command::List => {
            session.refresh().await?;
            let snapshot = session.snapshot();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_roster(&snapshot));
                if let Some(selected) = &snapshot.selected {
                    print!("\n{}", render_detail(selected));
                }
            }
        }
        Command::Show { id } => {
            let character = match id {
                Some(id) => session.store().fetch(&CharacterId::from(id.as_str())).await?,
                None => {
                    session.refresh().await?;
                    session
                        .selected()
                        .cloned()
                        .ok_or_else(|| anyhow!("the collection is empty"))?
                }
            };
            print_character(&character, cli.json)?;
        }
        Command::Vote { id, amount } => {
            select_by_id(&mut session, &id).await?;
            let change = session.add_votes(&amount).await.map_err(user_facing)?;
            println!("Votes: {} -> {}", change.previous, change.votes);
        }
        Command::Reset { id } => {
            select_by_id(&mut session, &id).await?;
            let change = session.reset_votes().await?;
            println!("Votes: {} -> {}", change.previous, change.votes);
        }
        Command::Create { name, image } => {
            session.refresh().await?;
            let created = session
                .create_character(&name, &image)
                .await
                .map_err(user_facing)?
                .clone();
            print_character(&created, cli.json)?;
        }
    }

    Ok(())
}

async fn select_by_id(
    session: &mut CharacterSession<HttpCharacterStore>,
    raw_id: &str,
) -> Result<()> {
    session.refresh().await?;
    session.select(&CharacterId::from(raw_id))?;
    Ok(())
}

fn user_facing(err: SessionError) -> anyhow::Error {
    match err {
        SessionError::InvalidVotes(input) => anyhow!("{} ({input})", input.user_message()),
        other => other.into(),
    }
}

fn print_character(character: &Character, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(character)?);
    } else {
        print!("{}", render_detail(character));
    }
    Ok(())
}

fn render_roster(snapshot: &SessionSnapshot) -> String {
    let selected = snapshot.selected.as_ref().map(|c| &c.id);
    snapshot
        .roster
        .iter()
        .map(|entry| {
            let marker = if Some(&entry.id) == selected { '*' } else { ' ' };
            format!("{marker} [{}] {}\n", entry.id, entry.name)
        })
        .collect()
}

fn render_detail(character: &Character) -> String {
    format!(
        "{}\n  image: {}\n  Votes: {}\n",
        character.name, character.image, character.votes
    )
}
