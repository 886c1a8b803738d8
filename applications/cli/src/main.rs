/// Cadence - headless music player
use anyhow::Context;
use cadence_cli::{
    config::CliConfig,
    player::{self, RunningPlayer},
    repl::{self, ReplCommand},
};
use cadence_client::{AuthSession, CadenceClient, SearchResults};
use cadence_core::{Playlist, Track};
use cadence_playback::{PlaybackSession, SessionConfig, SessionHandle, SimulatedSink};
use cadence_storage::RedbStore;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence headless music player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive player
    Run,
    /// List the catalog
    Tracks,
    /// List albums
    Albums,
    /// Show recently played tracks
    History,
    /// Search songs and albums by name
    Search {
        /// Text to look for
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List your playlists
    Playlists,
    /// Create an empty playlist
    NewPlaylist {
        /// Playlist name
        name: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Sign in and store the token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Account password
        #[arg(short, long, env = "CADENCE_PASSWORD")]
        password: String,
    },
    /// Forget the stored token
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_cli=info,cadence_playback=info,cadence_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Run => run(&config).await?,
        Commands::Tracks => list_tracks(&config).await?,
        Commands::Albums => list_albums(&config).await?,
        Commands::History => show_history(&config).await?,
        Commands::Search { query } => search(&config, &query.join(" ")).await?,
        Commands::Playlists => list_playlists(&config).await?,
        Commands::NewPlaylist { name, description } => {
            new_playlist(&config, &name, description.as_deref()).await?;
        }
        Commands::Login { email, password } => login(&config, &email, &password).await?,
        Commands::Logout => logout(&config)?,
    }

    Ok(())
}

/// Open the session store and the API client, signed in if a token is stored
fn connect(config: &CliConfig) -> anyhow::Result<(AuthSession<RedbStore>, CadenceClient)> {
    let store = RedbStore::open(&config.session.store_path).with_context(|| {
        format!(
            "failed to open session store at {}",
            config.session.store_path.display()
        )
    })?;
    let auth = AuthSession::restore(store)?;
    let client = CadenceClient::new(config.client_config(auth.token()))?;
    Ok((auth, client))
}

async fn run(config: &CliConfig) -> anyhow::Result<()> {
    let (auth, client) = connect(config)?;
    let tracks = player::fetch_catalog(&client).await?;

    let RunningPlayer {
        handle,
        mut events,
        task,
    } = player::start(
        config,
        Box::new(auth.into_store()),
        client.clone(),
        tracks.clone(),
    )
    .await?;

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Some(line) = repl::describe_event(&event) {
                println!("{}", line);
            }
        }
    });

    println!("{}", repl::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match repl::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(command)) => execute(command, &handle, &client, &tracks).await?,
            Err(e) => println!("{}", e),
        }
    }

    handle.shutdown().await?;
    let session = task.await?;
    printer.await?;
    tracing::info!(history = session.history().len(), "Player stopped");
    Ok(())
}

async fn execute(
    command: ReplCommand,
    handle: &SessionHandle,
    client: &CadenceClient,
    tracks: &[Track],
) -> anyhow::Result<()> {
    match command {
        ReplCommand::Session(command) => handle.send(command).await?,
        ReplCommand::Status => {
            let snapshot = handle.snapshot().await?;
            println!("{}", repl::describe_snapshot(&snapshot));
        }
        ReplCommand::Tracks => print_tracks(tracks),
        ReplCommand::History => {
            let snapshot = handle.snapshot().await?;
            let now = Utc::now();
            for (position, entry) in snapshot.history.iter().enumerate() {
                let name = entry
                    .resolve(tracks)
                    .map_or("(unavailable)", |index| tracks[index].name.as_str());
                println!("{:>2}  {}  {}", position, name, entry.relative_label(now));
            }
        }
        // API failures are printed; the player keeps running
        ReplCommand::Search(query) => match client.search(&query).await {
            Ok(results) => print_search(&results),
            Err(e) => println!("search failed: {}", e),
        },
        ReplCommand::Playlists => match client.fetch_playlists().await {
            Ok(playlists) => print_playlists(&playlists),
            Err(e) => println!("playlists unavailable: {}", e),
        },
        ReplCommand::AddTo(playlist_id) => {
            let snapshot = handle.snapshot().await?;
            match snapshot.current_track {
                None => println!("nothing loaded"),
                Some(track) => match client.add_to_playlist(&playlist_id, &track.id).await {
                    Ok(playlist) => println!("added {} to {}", track.name, playlist.name),
                    Err(e) => println!("could not add {}: {}", track.name, e),
                },
            }
        }
        ReplCommand::Help => println!("{}", repl::HELP),
        ReplCommand::Quit => {}
    }
    Ok(())
}

fn print_tracks(tracks: &[Track]) {
    for (index, track) in tracks.iter().enumerate() {
        println!(
            "{:>3}  {:<26}  {:<32}  {:<24}  {}",
            index,
            track.id.as_str(),
            track.name,
            track.artist,
            track.duration_label()
        );
    }
}

fn print_search(results: &SearchResults) {
    if results.is_empty() {
        println!("no matches");
        return;
    }
    for track in &results.songs {
        println!("song   {:<26}  {:<32}  {}", track.id.as_str(), track.name, track.artist);
    }
    for album in &results.albums {
        println!("album  {:<26}  {}", album.id, album.name);
    }
}

fn print_playlists(playlists: &[Playlist]) {
    if playlists.is_empty() {
        println!("no playlists");
    }
    for playlist in playlists {
        println!(
            "{:<26}  {:<32}  {} songs",
            playlist.id,
            playlist.name,
            playlist.songs.len()
        );
    }
}

async fn list_tracks(config: &CliConfig) -> anyhow::Result<()> {
    let (_auth, client) = connect(config)?;
    let tracks = player::fetch_catalog(&client).await?;
    print_tracks(&tracks);
    Ok(())
}

async fn search(config: &CliConfig, query: &str) -> anyhow::Result<()> {
    let (_auth, client) = connect(config)?;
    print_search(&client.search(query).await?);
    Ok(())
}

async fn list_playlists(config: &CliConfig) -> anyhow::Result<()> {
    let (_auth, client) = connect(config)?;
    let playlists = client
        .fetch_playlists()
        .await
        .context("failed to list playlists (run `cadence login` first)")?;
    print_playlists(&playlists);
    Ok(())
}

async fn new_playlist(config: &CliConfig, name: &str, description: Option<&str>) -> anyhow::Result<()> {
    let (_auth, client) = connect(config)?;
    let playlist = client.create_playlist(name, description).await?;
    println!("Created {} ({})", playlist.name, playlist.id);
    Ok(())
}

async fn list_albums(config: &CliConfig) -> anyhow::Result<()> {
    let (_auth, client) = connect(config)?;
    for album in client.fetch_albums().await? {
        println!("{:<26}  {:<32}  {}", album.id, album.name, album.desc);
    }
    Ok(())
}

async fn show_history(config: &CliConfig) -> anyhow::Result<()> {
    let (auth, client) = connect(config)?;
    // Read-only view: never load a track that was not already current
    let session_config = SessionConfig {
        autoload_first_track: false,
        ..config.session_config()
    };
    let mut session = PlaybackSession::new(
        session_config,
        Box::new(SimulatedSink::new()),
        Box::new(auth.into_store()),
    );

    match player::fetch_catalog(&client).await {
        Ok(tracks) => session.load_catalog(tracks),
        Err(e) => tracing::warn!(error = %e, "Catalog unavailable, showing positions only"),
    }

    let now = Utc::now();
    let resolved = session.resolved_history();
    if resolved.is_empty() {
        for entry in session.history().entries() {
            println!("#{:<4}  {}", entry.index, entry.relative_label(now));
        }
    } else {
        for (entry, track) in resolved {
            println!("{:<32}  {:<24}  {}", track.name, track.artist, entry.relative_label(now));
        }
    }
    Ok(())
}

async fn login(config: &CliConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let (mut auth, client) = connect(config)?;
    let token = client.login(email, password).await?;
    auth.login(token)?;
    println!("Logged in as {}", email);
    Ok(())
}

fn logout(config: &CliConfig) -> anyhow::Result<()> {
    let store = RedbStore::open(&config.session.store_path)?;
    let mut auth = AuthSession::restore(store)?;
    if auth.is_logged_in() {
        auth.logout()?;
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}
