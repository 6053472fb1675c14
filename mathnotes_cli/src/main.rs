use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use mathnotes_core::store::DEFAULT_BASE_URL;
use mathnotes_core::view::{
    CategoryRegistryView, FormulaForm, FormulaListView, Notice, NoticeLevel, PlainTypesetter,
};
use mathnotes_core::{
    Catalog, Category, CategoryFilter, CategoryId, Coordinator, Formula, FormulaId, FormulaQuery,
    HttpStore, MemoryStore, Phase, StoreApi, StoreConfig,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod print;

#[derive(Parser)]
#[command(name = "mathnotes")]
#[command(about = "Your catalog of LaTeX formulas", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root URL of the backing store
    #[arg(long, global = true, env = "MATHNOTES_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Use a seeded in-memory store instead of the backing store
    #[arg(long, global = true)]
    offline: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Catalog(CatalogCommand),
    /// Show how a formula would be rendered
    Preview { latex: String },
}

/// Commands that need the catalog loaded from the store.
#[derive(Subcommand)]
enum CatalogCommand {
    /// List formulas, newest first
    List {
        /// Only show formulas of this category (0 for all)
        #[arg(long, default_value_t = 0)]
        category: u64,

        /// Only show formulas whose description or LaTeX contains this text
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List categories with their formula counts
    Categories,
    /// Create a category
    AddCategory { name: String },
    /// Delete a category that has no formulas
    DeleteCategory { id: u64 },
    /// Create a formula
    Add {
        latex: String,

        /// Id of the category the formula belongs to
        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a formula
    Delete { id: u64 },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let command = match cli.command {
        Commands::Preview { latex } => {
            print::preview(&FormulaForm { latex, ..Default::default() });
            return Ok(());
        }
        Commands::Catalog(command) => command,
    };

    if cli.offline {
        debug!("using in-memory store");
        run(MemoryStore::with_catalog(&demo_catalog()), command).await
    } else {
        debug!(api_url = %cli.api_url, "using http store");
        run(HttpStore::new(StoreConfig::new(cli.api_url)), command).await
    }
}

fn default_log_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose, quiet)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run<S: StoreApi>(store: S, command: CatalogCommand) -> Result<()> {
    let mut coordinator = Coordinator::load(store).await;
    if let Phase::Error(message) = coordinator.phase() {
        bail!("Could not load data: {message}");
    }

    match command {
        CatalogCommand::List { category, search } => {
            let view =
                FormulaListView::new(FormulaQuery::new(CategoryFilter::from_raw(category), search));
            print::formula_list(&view, coordinator.catalog(), &PlainTypesetter);
        }
        CatalogCommand::Categories => print::categories(coordinator.catalog()),
        CatalogCommand::AddCategory { name } => {
            let mut view = CategoryRegistryView { input: name };
            match view.submit(&mut coordinator).await.map_err(notice_error)? {
                Some(id) => println!("Added category {id}."),
                None => println!("Nothing to add."),
            }
        }
        CatalogCommand::DeleteCategory { id } => {
            CategoryRegistryView::delete(&mut coordinator, CategoryId(id))
                .await
                .map_err(notice_error)?;
            println!("Deleted category {id}.");
        }
        CatalogCommand::Add { latex, category, description } => {
            let mut form = FormulaForm { latex, description, selected_category: category };
            print::preview(&form);
            let id = form.submit(&mut coordinator).await.map_err(notice_error)?;
            println!("Added formula {id}.");
        }
        CatalogCommand::Delete { id } => {
            FormulaListView::delete(&mut coordinator, FormulaId(id)).await.map_err(notice_error)?;
            println!("Deleted formula {id}.");
        }
    }
    Ok(())
}

fn notice_error(notice: Notice) -> anyhow::Error {
    match notice.level {
        NoticeLevel::Warning => anyhow!("{notice}"),
        NoticeLevel::Error => anyhow!("request failed: {notice}"),
    }
}

fn demo_catalog() -> Catalog {
    let category = |id, name: &str| Category { id: CategoryId(id), name: name.to_string() };
    let formula = |id, category_id, description: &str, latex: &str| Formula {
        id: FormulaId(id),
        latex: latex.to_string(),
        description: description.to_string(),
        category_id: CategoryId(category_id),
        created_at: "01.01.2024".to_string(),
    };
    Catalog::new(
        vec![category(1, "Geometry"), category(2, "Algebra"), category(3, "Calculus")],
        vec![
            formula(11, 1, "Circle area", "\\pi r^2"),
            formula(12, 2, "Line", "y=mx+b"),
            formula(13, 2, "Quadratic roots", "x = \\frac{-b \\pm \\sqrt{b^2-4ac}}{2a}"),
            formula(14, 3, "Power rule", "\\frac{d}{dx} x^n = n x^{n-1}"),
        ],
    )
}
