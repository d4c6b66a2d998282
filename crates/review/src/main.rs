use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use models::SortOrder;
use review::{
    Route,
    analysis_flow::AnalysisRequestFlow,
    api_client::{HttpApiClient, ProductApi},
    detail::DetailView,
    results::{DEFAULT_PAGE_SIZE, ResultsController},
    session_cache::{CacheKey, CacheKeyStrategy, SessionCache},
};
use url::Url;
use utils::text::format_price;

/// Search products and read AI review summaries from the terminal
#[derive(Debug, Parser)]
#[command(name = "review", version)]
struct Args {
    /// Base URL of the review-lens server
    #[arg(long, env = "REVIEW_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: Url,

    /// Products shown per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// How analyzed products are keyed in the session cache
    #[arg(long, value_enum, default_value_t = CacheKeyStrategy::PageIndex)]
    cache_key: CacheKeyStrategy,

    /// Request timeout in seconds (analysis usually takes ~20s)
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Run this search right away
    #[arg(long)]
    keyword: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum ListAction {
    Search,
    Sort,
    PrevPage,
    NextPage,
    Open(usize),
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::logging::init("warn");
    let args = Args::parse();

    let api: Arc<dyn ProductApi> = Arc::new(HttpApiClient::new(
        args.api_url.clone(),
        Duration::from_secs(args.timeout_secs),
    )?);
    let cache = SessionCache::new();
    let flow = AnalysisRequestFlow::new(api.clone(), cache.clone(), args.cache_key);
    let mut controller = ResultsController::new(args.page_size);

    if let Some(keyword) = args.keyword.as_deref() {
        run_search(&mut controller, api.as_ref(), keyword).await;
    }

    let mut route = Route::Search;
    loop {
        route = match route {
            Route::Search => match list_screen(&mut controller, api.as_ref(), &flow).await? {
                Some(next) => next,
                None => break,
            },
            Route::Detail(key) => detail_screen(&cache, &key)?,
        };
    }

    Ok(())
}

async fn run_search(controller: &mut ResultsController, api: &dyn ProductApi, keyword: &str) {
    let spinner = spinner("searching...");
    let outcome = controller.search(api, keyword).await;
    spinner.finish_and_clear();

    if let Err(e) = outcome {
        println!("{e}");
    }
}

/// Returns the next route, or `None` to quit.
async fn list_screen(
    controller: &mut ResultsController,
    api: &dyn ProductApi,
    flow: &AnalysisRequestFlow<SessionCache>,
) -> Result<Option<Route>> {
    print_results(controller);

    let mut items = Vec::new();
    let mut actions = Vec::new();
    for (index, product) in controller.visible().iter().enumerate() {
        items.push(format!("{}  {} 원", product.name, format_price(product.price)));
        actions.push(ListAction::Open(index));
    }
    items.push("New search".to_string());
    actions.push(ListAction::Search);
    items.push(format!("Sort ({})", controller.sort_order().label()));
    actions.push(ListAction::Sort);
    if controller.has_prev() {
        items.push("Previous page".to_string());
        actions.push(ListAction::PrevPage);
    }
    if controller.has_next() {
        items.push("Next page".to_string());
        actions.push(ListAction::NextPage);
    }
    items.push("Quit".to_string());
    actions.push(ListAction::Quit);

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose a product or action")
        .items(&items)
        .default(0)
        .interact()?;

    match actions[choice] {
        ListAction::Search => {
            let keyword: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Keyword")
                .allow_empty(true)
                .interact_text()?;
            run_search(controller, api, &keyword).await;
        }
        ListAction::Sort => {
            let labels: Vec<&str> = SortOrder::ALL.iter().map(SortOrder::label).collect();
            let current = SortOrder::ALL
                .iter()
                .position(|order| *order == controller.sort_order())
                .unwrap_or(0);
            let picked = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Sort by")
                .items(&labels)
                .default(current)
                .interact()?;
            controller.set_sort_order(SortOrder::ALL[picked]);
        }
        ListAction::PrevPage => controller.prev_page(),
        ListAction::NextPage => controller.next_page(),
        ListAction::Open(index) => {
            let product = controller.visible()[index].clone();
            let spinner = spinner("analyzing reviews... this takes about 20 seconds");
            let outcome = flow.select(index, &product).await;
            spinner.finish_and_clear();

            match outcome {
                Ok(route) => return Ok(Some(route)),
                Err(e) => println!("{e}"),
            }
        }
        ListAction::Quit => return Ok(None),
    }

    Ok(Some(Route::Search))
}

fn detail_screen(cache: &SessionCache, key: &CacheKey) -> Result<Route> {
    let view = match DetailView::load(cache, key) {
        Ok(view) => view,
        Err(e) => {
            println!("{e}");
            return Ok(Route::Search);
        }
    };

    println!("\n{}", view.render());

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .items(&["Download PDF", "Back to results"])
            .default(1)
            .interact()?;
        if choice == 1 {
            return Ok(Route::Search);
        }

        match view.pdf_url() {
            Ok(url) => {
                if let Err(e) = open::that(url) {
                    tracing::warn!(url, error = %e, "Failed to open PDF link");
                    println!("could not open {url}");
                }
            }
            Err(e) => println!("{e}"),
        }
    }
}

fn print_results(controller: &ResultsController) {
    println!();
    if let Some(error) = controller.error() {
        println!("{error}");
    }
    if controller.keyword().is_empty() {
        return;
    }
    if controller.visible().is_empty() {
        println!("No results for \"{}\".", controller.keyword());
        return;
    }
    if controller.sorted_results().len() > controller.page_size() {
        println!("page {} / {}", controller.page(), controller.total_pages());
    }
    for product in controller.visible() {
        println!("  {}  {}", product.name, product.info_url);
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
