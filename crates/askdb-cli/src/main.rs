use askdb_core::config::{load_config, write_sample_config, AppConfig};
use askdb_core::engine::runner::{AskOutcome, Pipeline};
use askdb_core::gateway::ExecutionGateway;
use askdb_core::model::StudentRecord;
use askdb_core::providers::llm::{fake::FakeClient, ollama::OllamaClient, LlmClient};
use askdb_core::session::{Session, DEFAULT_PAGE_SIZE};
use askdb_core::storage::{ExampleStore, StudentsDb};
use askdb_core::synth::Synthesizer;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "askdb",
    version,
    about = "Natural-language SQL assistant for the students database"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question in natural language and run the synthesized SQL
    Ask(AskArgs),
    /// Replace the students table with records from a JSON file
    Load(LoadArgs),
    /// Inspect or extend the accepted-example store
    Examples(ExamplesArgs),
    /// Create a sample config and initialize both databases
    Init(InitArgs),
    Version,
}

#[derive(Parser, Clone)]
struct AskArgs {
    /// The question, e.g. "who is from bangalore"
    question: String,

    #[arg(long, default_value = "askdb.yaml")]
    config: PathBuf,

    /// override config: completion model name
    #[arg(long)]
    model: Option<String>,

    /// override config: completion service base URL
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    students_db: Option<PathBuf>,

    #[arg(long)]
    examples_db: Option<PathBuf>,

    /// number of similar examples to retrieve
    #[arg(long, short = 'k')]
    k: Option<usize>,

    /// admin secret for write statements
    #[arg(long, env = "ASKDB_ADMIN_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// save the (question, query) pair as a future example on success
    #[arg(long)]
    save: bool,

    /// result page to print
    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// completion provider: ollama|fake
    #[arg(long, default_value = "ollama")]
    provider: String,

    /// canned model output for --provider fake (tests/dev)
    #[arg(long, hide = true)]
    fake_response: Option<String>,
}

#[derive(Parser, Clone)]
struct LoadArgs {
    /// JSON file holding an array of student records
    file: PathBuf,

    #[arg(long, default_value = "askdb.yaml")]
    config: PathBuf,

    #[arg(long)]
    students_db: Option<PathBuf>,
}

#[derive(Parser, Clone)]
struct ExamplesArgs {
    #[command(subcommand)]
    cmd: ExamplesSub,

    #[arg(long, default_value = "askdb.yaml")]
    config: PathBuf,

    #[arg(long)]
    examples_db: Option<PathBuf>,
}

#[derive(Subcommand, Clone)]
enum ExamplesSub {
    List,
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        query: String,
    },
}

#[derive(Parser, Clone)]
struct InitArgs {
    #[arg(long, default_value = "askdb.yaml")]
    config: PathBuf,
}

mod exit_codes {
    pub const OK: i32 = 0;
    pub const QUERY_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            exit_codes::QUERY_FAILED
        }
    };
    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Ask(args) => cmd_ask(args).await,
        Command::Load(args) => cmd_load(args),
        Command::Examples(args) => cmd_examples(args),
        Command::Init(args) => cmd_init(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

fn effective_config(path: &PathBuf) -> anyhow::Result<AppConfig> {
    load_config(path).map_err(|e| anyhow::anyhow!(e))
}

async fn cmd_ask(args: AskArgs) -> anyhow::Result<i32> {
    let mut cfg = effective_config(&args.config)?;
    if let Some(model) = args.model {
        cfg.model = model;
    }
    if let Some(base_url) = args.base_url {
        cfg.base_url = base_url;
    }
    if let Some(p) = args.students_db {
        cfg.students_db = p;
    }
    if let Some(p) = args.examples_db {
        cfg.examples_db = p;
    }
    if let Some(k) = args.k {
        cfg.retrieve_k = k;
    }
    // cfg.admin_secret is the expected value (config file or env);
    // args.secret is the caller's attempt. Never conflate the two.

    let client: Arc<dyn LlmClient> = match args.provider.as_str() {
        "ollama" => Arc::new(OllamaClient::new(cfg.base_url.clone(), cfg.model.clone())),
        "fake" => {
            let canned = args
                .fake_response
                .ok_or_else(|| anyhow::anyhow!("--provider fake requires --fake-response"))?;
            Arc::new(FakeClient::with_response(&canned))
        }
        other => anyhow::bail!("unknown provider: {} (expected ollama|fake)", other),
    };

    ensure_parent_dir(&cfg.examples_db)?;
    let examples = ExampleStore::open(&cfg.examples_db).map_err(|e| anyhow::anyhow!(e))?;
    examples.init_schema().map_err(|e| anyhow::anyhow!(e))?;

    let gateway = ExecutionGateway::new(&cfg.students_db, cfg.admin_secret.clone());
    let pipeline = Pipeline::new(examples, Synthesizer::new(client), gateway, cfg.retrieve_k);

    match pipeline.ask(&args.question, args.secret.as_deref()).await? {
        AskOutcome::Executed {
            query,
            examples_used,
            result,
        } => {
            print_examples_used(&examples_used);
            println!("SQL: {}", query.normalized_sql);

            let mut session = Session::new(args.page_size.max(1));
            session.record(&args.question, &query.normalized_sql, result);
            session.goto_page(args.page);
            print_page(&session);

            if args.save {
                pipeline
                    .save_example(&args.question, &query.normalized_sql)
                    .map_err(|e| anyhow::anyhow!(e))?;
                eprintln!("example saved");
            }
            Ok(exit_codes::OK)
        }
        AskOutcome::WriteGated { query, .. } => {
            println!("SQL: {}", query.normalized_sql);
            eprintln!("write statement requires the admin secret; re-run with --secret or set ASKDB_ADMIN_SECRET");
            Ok(exit_codes::QUERY_FAILED)
        }
    }
}

fn print_examples_used(examples: &[(String, String)]) {
    if examples.is_empty() {
        return;
    }
    eprintln!("similar examples used:");
    for (q, sql) in examples {
        eprintln!("  Q: {}", q);
        eprintln!("     {}", sql);
    }
}

fn print_page(session: &Session) {
    let Some(result) = session.result() else {
        return;
    };
    if result.rows.is_empty() {
        println!("no rows");
        return;
    }
    println!("{}", result.columns.join(" | "));
    for row in session.current_rows() {
        println!("{}", row.join(" | "));
    }
    println!(
        "({} rows, page {} of {})",
        result.row_count(),
        session.page(),
        session.total_pages()
    );
}

fn cmd_load(args: LoadArgs) -> anyhow::Result<i32> {
    let mut cfg = effective_config(&args.config)?;
    if let Some(p) = args.students_db {
        cfg.students_db = p;
    }

    let raw = std::fs::read_to_string(&args.file)?;
    let records: Vec<StudentRecord> = serde_json::from_str(&raw)?;

    ensure_parent_dir(&cfg.students_db)?;
    let db = StudentsDb::new(&cfg.students_db);
    let report = db.replace_all(&records)?;

    println!(
        "loaded {} record(s) into {} ({} skipped)",
        report.inserted,
        cfg.students_db.display(),
        report.skipped
    );
    Ok(exit_codes::OK)
}

fn cmd_examples(args: ExamplesArgs) -> anyhow::Result<i32> {
    let mut cfg = effective_config(&args.config)?;
    if let Some(p) = args.examples_db {
        cfg.examples_db = p;
    }

    ensure_parent_dir(&cfg.examples_db)?;
    let store = ExampleStore::open(&cfg.examples_db).map_err(|e| anyhow::anyhow!(e))?;
    store.init_schema().map_err(|e| anyhow::anyhow!(e))?;

    match args.cmd {
        ExamplesSub::List => {
            let examples = store.list().map_err(|e| anyhow::anyhow!(e))?;
            if examples.is_empty() {
                println!("no examples stored");
            }
            for ex in examples {
                println!("[{}] Q: {}", ex.id, ex.question);
                println!("    {}", ex.query);
            }
        }
        ExamplesSub::Add { question, query } => {
            let existed = store
                .contains(&question, &query)
                .map_err(|e| anyhow::anyhow!(e))?;
            store
                .save_example(&question, &query)
                .map_err(|e| anyhow::anyhow!(e))?;
            if existed {
                println!("example already exists");
            } else {
                println!("example saved");
            }
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_init(args: InitArgs) -> anyhow::Result<i32> {
    if !args.config.exists() {
        write_sample_config(&args.config).map_err(|e| anyhow::anyhow!(e))?;
        eprintln!("created {}", args.config.display());
    } else {
        eprintln!("note: {} already exists", args.config.display());
    }

    let cfg = effective_config(&args.config)?;

    ensure_parent_dir(&cfg.students_db)?;
    StudentsDb::new(&cfg.students_db).init_schema()?;
    eprintln!("initialized {}", cfg.students_db.display());

    ensure_parent_dir(&cfg.examples_db)?;
    let store = ExampleStore::open(&cfg.examples_db).map_err(|e| anyhow::anyhow!(e))?;
    store.init_schema().map_err(|e| anyhow::anyhow!(e))?;
    eprintln!("initialized {}", cfg.examples_db.display());

    Ok(exit_codes::OK)
}

fn ensure_parent_dir(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
