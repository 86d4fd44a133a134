use anyhow::{Context as AnyhowContext, Result};
use assist_protocol::{wire_schemas, ConfigAttributes, SearchConfiguration};
use assist_session::{FileStore, IdentityStore, KeyValueStore, SessionTokenManager};
use assist_suggest::{CredentialSource, SuggestionFetcher};
use assist_widget::{
    CommitOutcome, HeadlessHost, NavigationController, SearchWidget, WidgetSettings,
};
use clap::{Args, Parser, Subcommand};
use http_api::HttpApi;
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod http_api;
mod simulate;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

#[derive(Parser)]
#[command(name = "search-assist")]
#[command(about = "Search suggestions and visitor sessions from the command line", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Origin serving /api/visitor-token and /api/suggestions
    #[arg(
        long,
        global = true,
        env = "SEARCH_ASSIST_API_BASE",
        default_value = "http://127.0.0.1:3000"
    )]
    api_base: String,

    /// Page host name; its first label becomes the site name
    #[arg(
        long,
        global = true,
        env = "SEARCH_ASSIST_HOST",
        default_value = "localhost"
    )]
    host: String,

    /// User agent reported when requesting a visitor token
    #[arg(long, global = true, default_value = concat!("search-assist/", env!("CARGO_PKG_VERSION")))]
    user_agent: String,

    /// JSON file persisting the visitor id and session token
    #[arg(long, global = true, env = "SEARCH_ASSIST_STATE")]
    state_file: Option<PathBuf>,

    #[command(flatten)]
    page: PageArgs,
}

/// Raw configuration attributes, parsed exactly as a page's would be.
#[derive(Args)]
struct PageArgs {
    /// Value of data-search-bar ("Icon" collapses the input)
    #[arg(long, global = true)]
    search_bar: Option<String>,

    /// Value of data-selected-collections (JSON array)
    #[arg(long, global = true)]
    collections: Option<String>,

    /// Value of data-selected-fields-search (JSON array)
    #[arg(long, global = true)]
    fields: Option<String>,
}

impl PageArgs {
    fn attributes(&self) -> ConfigAttributes {
        ConfigAttributes {
            search_bar: self.search_bar.clone(),
            selected_collections: self.collections.clone(),
            selected_fields_search: self.fields.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the persisted visitor id, creating one if needed
    #[command(name = "visitor-id")]
    VisitorId,

    /// Print a valid session token, refreshing it when expired
    Token,

    /// Fetch suggestions for a query
    Suggest(SuggestArgs),

    /// Print the results-page URL a query commits to
    Commit(CommitArgs),

    /// Type a query into a headless widget and replay keys against it
    Simulate(SimulateArgs),

    /// Print JSON Schemas for the wire types
    Schema,
}

#[derive(Args)]
struct SuggestArgs {
    /// Query as typed
    query: String,

    /// Attach the session token to the request
    #[arg(long)]
    with_session: bool,
}

#[derive(Args)]
struct CommitArgs {
    /// Query as typed
    query: String,
}

#[derive(Args)]
struct SimulateArgs {
    /// Text typed one character at a time
    typed: String,

    /// Comma-separated keys or clicks replayed after typing
    /// (ArrowDown, ArrowUp, Tab, Enter, Space, Escape, view-all, icon, submit)
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Page path the widget attaches on
    #[arg(long, default_value = "/")]
    path: String,

    /// Whether the page has a search icon container
    #[arg(long)]
    icon: bool,
}

struct Context {
    api: HttpApi,
    store: Arc<dyn KeyValueStore>,
    host: String,
    user_agent: String,
}

impl Context {
    fn new(cli: &Cli) -> Result<Self> {
        let state_file = match &cli.state_file {
            Some(path) => path.clone(),
            None => default_state_file()?,
        };
        log::debug!("Using state file {}", state_file.display());
        Ok(Self {
            api: HttpApi::new(&cli.api_base, &cli.user_agent)?,
            store: Arc::new(FileStore::new(state_file)),
            host: cli.host.clone(),
            user_agent: cli.user_agent.clone(),
        })
    }

    fn session(&self) -> SessionTokenManager {
        SessionTokenManager::new(
            self.store.clone(),
            Arc::new(self.api.clone()),
            self.host.clone(),
            self.user_agent.clone(),
        )
    }

    fn fetcher(&self, with_session: bool) -> SuggestionFetcher {
        let fetcher = SuggestionFetcher::new(Arc::new(self.api.clone()), &self.host);
        if with_session {
            let source: Arc<dyn CredentialSource> = Arc::new(self.session());
            fetcher.with_credentials(source)
        } else {
            fetcher
        }
    }
}

fn default_state_file() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("No data directory; pass --state-file")?;
    Ok(dir.join("search-assist").join("state.json"))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::VisitorId => run_visitor_id(&cli).await?,
        Commands::Token => run_token(&cli).await?,
        Commands::Suggest(args) => run_suggest(&cli, args).await?,
        Commands::Commit(args) => run_commit(args)?,
        Commands::Simulate(args) => simulate::run(&cli, args).await?,
        Commands::Schema => print_json(&wire_schemas())?,
    }

    Ok(())
}

async fn run_visitor_id(cli: &Cli) -> Result<()> {
    let ctx = Context::new(cli)?;
    let visitor = IdentityStore::new(ctx.store.clone())
        .get_or_create_visitor_id()
        .await;
    print_json(&json!({ "visitor_id": visitor.as_str() }))
}

async fn run_token(cli: &Cli) -> Result<()> {
    let ctx = Context::new(cli)?;
    let token = ctx.session().get_session_token().await;
    let body = match token {
        Some(token) => json!({
            "token": token.as_str(),
            "expires_at": token.expires_at(),
        }),
        None => serde_json::Value::Null,
    };
    print_json(&body)
}

async fn run_suggest(cli: &Cli, args: &SuggestArgs) -> Result<()> {
    let ctx = Context::new(cli)?;
    let config = SearchConfiguration::from_attributes(&cli.page.attributes());
    let items = ctx
        .fetcher(args.with_session)
        .fetch_suggestions(&args.query, &config)
        .await;
    print_json(&serde_json::to_value(items)?)
}

fn run_commit(args: &CommitArgs) -> Result<()> {
    let host = Arc::new(HeadlessHost::new("/", false));
    let navigation =
        NavigationController::new(host, WidgetSettings::default().invalid_highlight);
    print_json(&outcome_json(&navigation.commit(&args.query)))
}

fn outcome_json(outcome: &CommitOutcome) -> serde_json::Value {
    match outcome {
        CommitOutcome::Navigated(url) => json!({ "outcome": "navigated", "url": url }),
        CommitOutcome::Rejected => json!({ "outcome": "rejected" }),
    }
}

fn attach_widget(
    cli: &Cli,
    ctx: &Context,
    host: Arc<HeadlessHost>,
) -> Result<Arc<SearchWidget>> {
    let widget = SearchWidget::attach(
        host,
        &cli.page.attributes(),
        ctx.fetcher(false),
        assist_widget::AttachOptions {
            session: Some(ctx.session()),
            ..Default::default()
        },
    )?;
    Ok(widget)
}
