use log::{debug, error};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use mealdb_browser::{
    connect, BrowserConfig, BrowserError, DetailNavigator, DetailState, FilterController, History,
    ListContext, Recipe, RecipeGateway, Route, SearchController, SortKey, SortOrder,
};

const USAGE: &str = "Usage:
  mealdb-browser search <query> [--sort name|category|area] [--order asc|desc] [--open <n>]
  mealdb-browser gallery [--category <name>]... [--area <name>]... [--open <n>]
  mealdb-browser detail <id>
  mealdb-browser browse";

#[derive(Debug, PartialEq)]
enum Command {
    Search {
        query: String,
        sort_by: SortKey,
        order: SortOrder,
        open: Option<usize>,
    },
    Gallery {
        categories: Vec<String>,
        areas: Vec<String>,
        open: Option<usize>,
    },
    Detail {
        id: String,
    },
    Browse,
}

fn usage(message: &str) -> BrowserError {
    BrowserError::Usage(format!("{}\n\n{}", message, USAGE))
}

fn parse_args(args: &[String]) -> Result<Command, BrowserError> {
    let (command, rest) = args
        .split_first()
        .ok_or_else(|| usage("Please provide a command"))?;

    let mut positional = Vec::new();
    let mut sort_by = SortKey::default();
    let mut order = SortOrder::default();
    let mut open = None;
    let mut categories = Vec::new();
    let mut areas = Vec::new();

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| usage(&format!("Missing value for {}", arg)))
        };
        match arg.as_str() {
            "--sort" => sort_by = value()?.parse()?,
            "--order" => order = value()?.parse()?,
            "--category" => categories.push(value()?),
            "--area" => areas.push(value()?),
            "--open" => {
                let n = value()?;
                let n: usize = n
                    .parse()
                    .map_err(|_| usage(&format!("--open expects a number, got '{}'", n)))?;
                if n == 0 {
                    return Err(usage("--open counts from 1"));
                }
                open = Some(n);
            }
            flag if flag.starts_with("--") => {
                return Err(usage(&format!("Unknown option {}", flag)))
            }
            _ => positional.push(arg.clone()),
        }
    }

    match command.as_str() {
        "search" => Ok(Command::Search {
            query: positional.join(" "),
            sort_by,
            order,
            open,
        }),
        "gallery" => Ok(Command::Gallery {
            categories,
            areas,
            open,
        }),
        "detail" => match positional.as_slice() {
            [id] => Ok(Command::Detail { id: id.clone() }),
            _ => Err(usage("detail expects exactly one recipe id")),
        },
        "browse" => Ok(Command::Browse),
        other => Err(usage(&format!("Unknown command '{}'", other))),
    }
}

fn print_list(recipes: &[Recipe]) {
    for (i, recipe) in recipes.iter().enumerate() {
        println!(
            "{:>3}. {} [{} | {}] #{}",
            i + 1,
            recipe.name,
            recipe.category,
            recipe.area,
            recipe.id
        );
    }
}

fn print_detail(state: &DetailState) {
    let view = match state {
        DetailState::Loaded(view) => view,
        DetailState::NotFound { id } => {
            println!("Meal not found ({})", id);
            println!("[back]");
            return;
        }
    };

    let recipe = view.recipe();
    let previous = if view.has_previous() { "[prev]" } else { "      " };
    let next = if view.has_next() { "[next]" } else { "      " };
    println!("[back]  {} {} {}", previous, view.position_label(), next);
    println!();
    println!("{}", recipe.name);
    println!("{}", recipe.thumbnail);
    println!("Category: {}", recipe.category);
    println!("Area: {}", recipe.area);
    if let Some(tags) = &recipe.tags {
        println!("Tags: {}", tags);
    }

    println!();
    println!("Ingredients");
    for ingredient in &recipe.ingredients {
        if ingredient.measure.is_empty() {
            println!("  {}", ingredient.name);
        } else {
            println!("  {} - {}", ingredient.name, ingredient.measure);
        }
    }

    println!();
    println!("Instructions");
    for paragraph in recipe.instruction_paragraphs() {
        println!("{}", paragraph);
    }
}

fn print_gallery(gallery: &FilterController) {
    let categories: Vec<String> = gallery
        .categories()
        .iter()
        .map(|c| mark(gallery.is_category_selected(c), c))
        .collect();
    let areas: Vec<String> = gallery
        .areas()
        .iter()
        .map(|a| mark(gallery.is_area_selected(a), a))
        .collect();
    println!("Categories: {}", categories.join(" "));
    println!("Areas: {}", areas.join(" "));
    println!();

    if gallery.filtered().is_empty() {
        println!("No recipes match the selected filters");
    } else {
        print_list(gallery.filtered());
    }
}

fn mark(selected: bool, name: &str) -> String {
    if selected {
        format!("[x] {}", name)
    } else {
        format!("[ ] {}", name)
    }
}

fn print_search(search: &SearchController) {
    let results = search.results();
    if search.show_no_results() {
        println!("No meals found for \"{}\"", search.query());
    } else {
        print_list(&results);
    }
}

/// Open the `n`-th (1-based) recipe of `context` in a new detail session.
async fn open_nth(
    gateway: &Arc<dyn RecipeGateway>,
    context: ListContext,
    n: usize,
) -> Result<DetailNavigator, BrowserError> {
    let id = context
        .get(n - 1)
        .map(|r| r.id.clone())
        .ok_or_else(|| BrowserError::Usage(format!("No recipe number {} in this list", n)))?;
    Ok(DetailNavigator::open(gateway.clone(), &id, Some(context)).await)
}

/// State of an interactive session: one controller per list view and one
/// navigator per detail entry in the history, kept alive across navigation
/// so going back never refetches.
struct Session {
    gateway: Arc<dyn RecipeGateway>,
    config: BrowserConfig,
    history: History,
    search: SearchController,
    gallery: Option<FilterController>,
    /// Parallel to the detail entries of `history`, oldest first
    details: Vec<DetailNavigator>,
}

impl Session {
    fn new(gateway: Arc<dyn RecipeGateway>, config: BrowserConfig) -> Self {
        let search = SearchController::new(gateway.clone(), config.debounce());
        Self {
            gateway,
            config,
            history: History::default(),
            search,
            gallery: None,
            details: Vec::new(),
        }
    }

    fn current_detail(&self) -> Option<&DetailNavigator> {
        match self.history.current().route {
            Route::Detail { .. } => self.details.last(),
            _ => None,
        }
    }

    fn push_detail(
        &mut self,
        route: Route,
        context: Option<ListContext>,
        detail: DetailNavigator,
    ) {
        self.history.push(route, context);
        self.details.push(detail);
    }

    fn current_list(&self) -> Option<ListContext> {
        match self.history.current().route {
            Route::Search => Some(self.search.list_context()),
            Route::Gallery => self.gallery.as_ref().map(FilterController::list_context),
            Route::Detail { .. } => None,
        }
    }

    fn show(&self) {
        match &self.history.current().route {
            Route::Search => print_search(&self.search),
            Route::Gallery => {
                if let Some(gallery) = &self.gallery {
                    print_gallery(gallery);
                }
            }
            Route::Detail { .. } => {
                if let Some(detail) = self.current_detail() {
                    print_detail(detail.state());
                }
            }
        }
    }

    fn gallery_mut(&mut self) -> Result<&mut FilterController, BrowserError> {
        if self.history.current().route != Route::Gallery {
            return Err(BrowserError::Usage("Open the gallery first".to_string()));
        }
        self.gallery
            .as_mut()
            .ok_or_else(|| BrowserError::Usage("Gallery is not loaded".to_string()))
    }

    fn detail_mut(&mut self) -> Result<&mut DetailNavigator, BrowserError> {
        if !matches!(self.history.current().route, Route::Detail { .. }) {
            return Err(BrowserError::Usage("No recipe is open".to_string()));
        }
        self.details
            .last_mut()
            .ok_or_else(|| BrowserError::Usage("No recipe is open".to_string()))
    }

    /// Run one command line. Returns false when the session should end.
    async fn execute(&mut self, line: &str) -> Result<bool, BrowserError> {
        let (command, argument) = match line.trim().split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line.trim(), ""),
        };
        debug!("Command '{}' argument '{}'", command, argument);

        match command {
            "" => return Ok(true),
            "quit" | "exit" => return Ok(false),
            "search" => {
                if self.history.current().route != Route::Search {
                    self.history.push(Route::Search, None);
                }
                self.search.set_query(argument);
                self.search.settle().await;
            }
            "sort" => {
                let mut parts = argument.split_whitespace();
                if let Some(key) = parts.next() {
                    self.search.set_sort_by(key.parse()?);
                }
                if let Some(order) = parts.next() {
                    self.search.set_sort_order(order.parse()?);
                }
            }
            "gallery" => {
                if self.gallery.is_none() {
                    println!("Loading gallery...");
                    self.gallery = Some(
                        FilterController::load(self.gateway.clone(), &self.config.gallery_seed)
                            .await,
                    );
                }
                if self.history.current().route != Route::Gallery {
                    self.history.push(Route::Gallery, None);
                }
            }
            "category" => self.gallery_mut()?.toggle_category(argument),
            "area" => self.gallery_mut()?.toggle_area(argument),
            "clear" => self.gallery_mut()?.clear_filters(),
            "open" => {
                let n = argument
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| BrowserError::Usage("open expects a number".to_string()))?;
                let context = self
                    .current_list()
                    .ok_or_else(|| BrowserError::Usage("Nothing to open here".to_string()))?;
                let navigator = open_nth(&self.gateway, context.clone(), n).await?;
                let id = context.get(n - 1).map(|r| r.id.clone()).unwrap_or_default();
                self.push_detail(Route::Detail { id }, Some(context), navigator);
            }
            "detail" => {
                let route: Route = format!("/detail/{}", argument).parse()?;
                let navigator = DetailNavigator::open(self.gateway.clone(), argument, None).await;
                self.push_detail(route, None, navigator);
            }
            "next" | "prev" => {
                let detail = self.detail_mut()?;
                let moved = if command == "next" {
                    detail.next().await
                } else {
                    detail.previous().await
                };
                if !moved {
                    let side = if command == "next" { "after" } else { "before" };
                    println!("Nothing {} this recipe", side);
                    return Ok(true);
                }
                let stepped = detail.state().view().map(|view| {
                    let route = Route::Detail {
                        id: view.recipe().id.clone(),
                    };
                    (route, view.context().clone())
                });
                if let Some((route, context)) = stepped {
                    self.history.replace(route, Some(context));
                }
            }
            "back" => {
                if !self.history.can_go_back() {
                    println!("Already at {}", self.history.current().route);
                    return Ok(true);
                }
                let leaving_detail =
                    matches!(self.history.current().route, Route::Detail { .. });
                self.history.back();
                if leaving_detail {
                    self.details.pop();
                }
            }
            "help" => {
                println!("search <text> | sort <name|category|area> [asc|desc] | gallery");
                println!("category <name> | area <name> | clear | open <n> | detail <id>");
                println!("next | prev | back | quit");
                return Ok(true);
            }
            other => {
                return Err(BrowserError::Usage(format!(
                    "Unknown command '{}', try help",
                    other
                )))
            }
        }

        println!("-- {}", self.history.current().route);
        self.show();
        Ok(true)
    }
}

async fn browse(gateway: Arc<dyn RecipeGateway>, config: BrowserConfig) -> Result<(), BrowserError> {
    let mut session = Session::new(gateway, config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        // A failed flush only affects the prompt
        let _ = io::stdout().flush();

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| BrowserError::Usage(format!("Failed to read input: {}", e)))?;

        match session.execute(&line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}

async fn run(command: Command, config: BrowserConfig) -> Result<(), BrowserError> {
    let gateway = connect(&config)?;

    match command {
        Command::Search {
            query,
            sort_by,
            order,
            open,
        } => {
            let mut search = SearchController::new(gateway.clone(), config.debounce());
            search.set_sort_by(sort_by);
            search.set_sort_order(order);
            search.set_query(query);
            search.settle().await;

            match open {
                Some(n) => {
                    let navigator = open_nth(&gateway, search.list_context(), n).await?;
                    print_detail(navigator.state());
                }
                None => print_search(&search),
            }
        }
        Command::Gallery {
            categories,
            areas,
            open,
        } => {
            let mut gallery = FilterController::load(gateway.clone(), &config.gallery_seed).await;
            for category in &categories {
                gallery.toggle_category(category);
            }
            for area in &areas {
                gallery.toggle_area(area);
            }

            match open {
                Some(n) => {
                    let navigator = open_nth(&gateway, gallery.list_context(), n).await?;
                    print_detail(navigator.state());
                }
                None => print_gallery(&gallery),
            }
        }
        Command::Detail { id } => {
            let navigator = DetailNavigator::open(gateway, &id, None).await;
            print_detail(navigator.state());
        }
        Command::Browse => browse(gateway, config).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let config = BrowserConfig::load()?;
    if let Err(e) = run(command, config).await {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
