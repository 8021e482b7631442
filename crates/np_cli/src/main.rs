use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use np_app::Session;
use np_core::config::{API_URL_ENV, DEFAULT_API_URL};
use np_core::{AppState, CallbackParams, Config};
use tracing::info;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                let seconds = current_number
                    .parse::<u64>()
                    .ok()
                    .and_then(|num| num.checked_mul(unit))
                    .ok_or_else(|| "Duration too large".to_string())?;
                total_seconds = total_seconds
                    .checked_add(seconds)
                    .ok_or_else(|| "Duration too large".to_string())?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number means seconds
        if !current_number.is_empty() {
            total_seconds = current_number
                .parse::<u64>()
                .ok()
                .and_then(|num| total_seconds.checked_add(num))
                .ok_or_else(|| "Duration too large".to_string())?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Search news, draft a LinkedIn post with AI and publish it", long_about = None)]
pub struct Cli {
    /// Base URL of the NewsPost backend
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(long, default_value = np_client::DEFAULT_BACKEND, help = "Backend to use. Available backends: http (default), dummy")]
    backend: String,
    /// Give up on a backend request after this long (e.g. 30s, 2m)
    #[arg(long)]
    timeout: Option<HumanDuration>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the web interface
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Search articles for a keyword
    Search {
        #[arg(required = true, num_args = 1..)]
        keyword: Vec<String>,
    },
    /// Search articles, then draft a post from them
    Generate {
        #[arg(required = true, num_args = 1..)]
        keyword: Vec<String>,
    },
    /// Search, draft and publish the post on LinkedIn
    Publish {
        #[arg(required = true, num_args = 1..)]
        keyword: Vec<String>,
        /// Token handed out by the backend after the LinkedIn OAuth flow
        #[arg(long, env = "NEWSPOST_LINKEDIN_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Print the URL that starts the LinkedIn OAuth flow
    Connect,
}

/// Surfaces the session's error slot as a command failure.
fn check(state: &AppState) -> anyhow::Result<()> {
    if state.has_error() {
        bail!("{}", state.error);
    }
    Ok(())
}

fn print_articles(state: &AppState) {
    println!("📄 Top {} Articles:", state.articles.len());
    for article in &state.articles {
        println!();
        println!("  {}", article.title);
        if !article.description.is_empty() {
            println!("  {}", article.description);
        }
        if !article.pub_date.is_empty() {
            println!("  🕒 {}", article.date_line());
        }
    }
}

async fn search(session: &Session, keyword: &str) -> anyhow::Result<AppState> {
    session.fetch_news(keyword).await;
    let state = session.snapshot().await;
    check(&state)?;
    print_articles(&state);
    Ok(state)
}

async fn generate(session: &Session, keyword: &str) -> anyhow::Result<AppState> {
    search(session, keyword).await?;
    session.generate_post().await;
    let state = session.snapshot().await;
    check(&state)?;
    println!();
    println!("📝 AI-Generated LinkedIn Post:");
    println!();
    println!("{}", state.generated_post);
    Ok(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    np_app::init_logging();
    let cli = Cli::parse();

    let mut config = Config::new(&cli.api_url)?;
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout.0);
    }
    let backend = np_client::create_backend(&cli.backend, config)?;
    let session = Session::new(backend.clone());

    match cli.command {
        Commands::Serve { bind } => {
            info!("🚀 Starting web interface (backend at {})", cli.api_url);
            let state = np_web::AppState::new(backend)?;
            np_web::serve(state, bind).await?;
        }
        Commands::Search { keyword } => {
            search(&session, &keyword.join(" ")).await?;
        }
        Commands::Generate { keyword } => {
            generate(&session, &keyword.join(" ")).await?;
        }
        Commands::Publish { keyword, token } => {
            session.load_page(&CallbackParams::with_token(token)).await;
            generate(&session, &keyword.join(" ")).await?;
            session.post_to_linkedin().await;
            check(&session.snapshot().await)?;
            match session.take_notice().await {
                Some(notice) => println!("\n{}", notice),
                None => println!("\n⚠️ The backend did not confirm the post"),
            }
        }
        Commands::Connect => {
            println!("🔐 Open this URL to connect with LinkedIn:");
            println!("{}", session.auth_url()?);
        }
    }

    Ok(())
}
