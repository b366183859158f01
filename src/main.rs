use clap::Parser;
use tableback::analysis::AnalysisService;
use tableback::db::Db;
use tableback::{router, AppState};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// libSQL database URL: a `file:` path or a remote address.
    #[arg(long, env, default_value = "file:tableback.db")]
    database_url: String,

    /// libSQL authentication token for remote databases.
    #[arg(long, env, default_value = "")]
    database_auth_token: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Gemini API key; the AI analysis stays disabled when empty.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    gemini_api_key: String,

    /// Gemini generateContent endpoint.
    #[arg(
        long,
        env,
        default_value = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    )]
    gemini_api_url: String,

    /// Set the Secure attribute on session cookies.
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "tableback=debug,axum=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(args.database_url, args.database_auth_token).await?;
    let analysis = AnalysisService::gemini(args.gemini_api_url, args.gemini_api_key);
    let state = AppState {
        db,
        analysis,
        secure_cookies: args.secure_cookies,
    };

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
