use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use sk_production::audit::RequestContext;
use sk_production::cache::Cache;
use sk_production::cli::{
    handle_audit_command, handle_bulk_command, handle_cache_command, handle_client_command,
    handle_equipment_command, handle_export_command, handle_history_command,
    handle_import_command, handle_maintenance_command, handle_project_command,
    handle_task_command, handle_widget_command, Session,
};
use sk_production::config::{SkpPaths, Settings};
use sk_production::display::format_dashboard;
use sk_production::models::UserId;
use sk_production::services::DashboardService;
use sk_production::storage::Storage;
use sk_production::{logging, AdminResult};

#[derive(Parser)]
#[command(
    name = "skp",
    author = "SK Production",
    version,
    about = "Equipment, project and task administration for SK Production",
    long_about = "skp manages the SK Production inventory, projects, tasks, clients and \
                  maintenance from the command line. Every change is written to an \
                  audit log and versioned, so any document can be compared with or \
                  rolled back to an earlier state."
)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Acting user ID recorded in audit and version history
    #[arg(long, env = "SKP_USER", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Equipment inventory commands
    #[command(subcommand, alias = "eq")]
    Equipment(sk_production::cli::EquipmentCommands),

    /// Project management commands
    #[command(subcommand)]
    Project(sk_production::cli::ProjectCommands),

    /// Task management commands
    #[command(subcommand)]
    Task(sk_production::cli::TaskCommands),

    /// Client management commands
    #[command(subcommand)]
    Client(sk_production::cli::ClientCommands),

    /// Maintenance scheduling commands
    #[command(subcommand, alias = "mnt")]
    Maintenance(sk_production::cli::MaintenanceCommands),

    /// Dashboard widget commands
    #[command(subcommand)]
    Widget(sk_production::cli::WidgetCommands),

    /// Query the audit log
    #[command(subcommand)]
    Audit(sk_production::cli::AuditCommands),

    /// Version history, compare and rollback
    #[command(subcommand)]
    History(sk_production::cli::HistoryCommands),

    /// Status changes and deletes across many documents
    #[command(subcommand)]
    Bulk(sk_production::cli::BulkCommands),

    /// Import equipment from a CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Export data
    #[command(subcommand)]
    Export(sk_production::cli::ExportCommands),

    /// Cache inspection and invalidation
    #[command(subcommand)]
    Cache(sk_production::cli::CacheCommands),

    /// Show dashboard statistics
    Dashboard,

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let json = cli.json;
    if let Err(e) = run(cli) {
        if json {
            println!("{}", e.to_response());
            std::process::exit(1);
        }
        return Err(e.into());
    }
    Ok(())
}

fn run(cli: Cli) -> AdminResult<()> {
    // Initialize paths and settings
    let paths = SkpPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage and cache
    let storage = Storage::open(paths.clone())?;
    let cache = Cache::from_settings(&settings.cache);

    let ctx = match cli.user.as_deref() {
        Some(user) => RequestContext::for_user(user.parse::<UserId>()?),
        None => RequestContext::system(),
    }
    .with_user_agent(format!("skp/{}", env!("CARGO_PKG_VERSION")));

    let session = Session {
        storage: &storage,
        cache: &cache,
        settings: &settings,
        ctx,
        json: cli.json,
    };

    match cli.command {
        Some(Commands::Equipment(cmd)) => handle_equipment_command(&session, cmd)?,
        Some(Commands::Project(cmd)) => handle_project_command(&session, cmd)?,
        Some(Commands::Task(cmd)) => handle_task_command(&session, cmd)?,
        Some(Commands::Client(cmd)) => handle_client_command(&session, cmd)?,
        Some(Commands::Maintenance(cmd)) => handle_maintenance_command(&session, cmd)?,
        Some(Commands::Widget(cmd)) => handle_widget_command(&session, cmd)?,
        Some(Commands::Audit(cmd)) => handle_audit_command(&session, cmd)?,
        Some(Commands::History(cmd)) => handle_history_command(&session, cmd)?,
        Some(Commands::Bulk(cmd)) => handle_bulk_command(&session, cmd)?,
        Some(Commands::Import { file }) => handle_import_command(&session, &file)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Cache(cmd)) => handle_cache_command(&session, cmd)?,
        Some(Commands::Dashboard) => {
            let stats = DashboardService::new(&storage, &cache).stats()?;
            session.emit(&stats, || format_dashboard(&stats))?;
        }
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Initialized SK Production Admin at: {}", paths.base_dir().display());
            println!();
            println!("Run 'skp equipment add <name>' to add your first piece of equipment.");
        }
        Some(Commands::Config) => {
            println!("SK Production Admin Configuration");
            println!("=================================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Version history:  {}", paths.versions_file().display());
            println!();
            println!("Settings:");
            println!("  Cache backend:    {}", cache.backend_name());
            println!("  Cache TTL:        {}s", settings.cache.default_ttl_secs);
            println!("  Audit page size:  {}", settings.audit.default_page_size);
            println!("  Acting user:      {}", match session.ctx.user {
                Some(user) => user.to_string(),
                None => "system".to_string(),
            });
        }
        None => {
            println!("skp - SK Production Admin");
            println!();
            println!("Run 'skp --help' for usage information.");
        }
    }

    Ok(())
}
