use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::api::Category;
use crate::error::ApiError;
use crate::format;
use crate::models::{Article, SourceInfo};
use crate::paging::PageView;

const TITLE_WIDTH: usize = 60;
const WRAP_WIDTH: usize = 76;

pub fn show_header() {
    println!();
    println!("{}", "  NEWSDECK".cyan().bold());
    println!("{}", "  terminal news dashboard".dark_grey());
}

/// `favorites_count` is `None` when the store failed to load and
/// favorites are disabled for the session.
pub fn menu_choice(favorites_count: Option<usize>) -> String {
    println!();
    println!("{}", "Main menu".bold());
    println!("  1) Top headlines");
    println!("  2) Search news");
    println!("  3) Browse by category");
    println!("  4) Browse by source");
    match favorites_count {
        Some(count) => println!("  5) Favorites ({count})"),
        None => println!("  5) Favorites (unavailable)"),
    }
    println!("  0) Quit");
    prompt("Choice").to_lowercase()
}

pub fn show_listing(title: &str, view: &PageView<'_>, keywords: &[String]) {
    println!();
    println!("{}", title.bold().cyan());
    if view.total_available > view.total as u64 {
        println!(
            "{}",
            format!(
                "showing {} of {} available",
                view.total, view.total_available
            )
            .dark_grey()
        );
    }
    println!();

    for (offset, article) in view.articles.iter().enumerate() {
        let headline = format::truncate(&article.title, TITLE_WIDTH);
        let headline =
            format::highlight_keywords(&headline, keywords, |m| m.yellow().bold().to_string());
        println!("  {:>3}. {}", view.start + offset, headline);
        println!(
            "       {}  {}",
            format::format_date(article.published_at.as_ref()).dark_grey(),
            article.source.as_str().green()
        );
    }

    println!();
    println!(
        "{}",
        format!(
            "Page {}/{} ({}-{} of {})",
            view.index + 1,
            view.page_count,
            view.start,
            view.end,
            view.total
        )
        .dark_grey()
    );
}

/// Available actions depend on where the cursor sits and whether this is
/// a fetched listing (save) or the favorites view (remove/clear).
pub fn pagination_prompt(view: &PageView<'_>, allow_save: bool) -> String {
    let mut actions: Vec<&str> = Vec::new();
    if view.has_next {
        actions.push("[n]ext");
    }
    if view.has_prev {
        actions.push("[p]rev");
    }
    if view.page_count > 1 {
        actions.push("[g]oto");
    }
    actions.push("[v]iew");
    if allow_save {
        actions.push("[s]ave");
    } else {
        actions.push("[r]emove");
        actions.push("[c]lear");
    }
    actions.push("[o]pen");
    actions.push("[b]ack");
    println!("{}", actions.join("  ").dark_grey());
    prompt("Action").to_lowercase()
}

pub fn show_article_detail(article: &Article, is_favorite: bool) {
    println!();
    println!("{}", article.title.as_str().bold());
    if is_favorite {
        println!("{}", "★ in favorites".yellow());
    }
    println!(
        "{}  {}  {}",
        article.source.as_str().green(),
        article.author.as_deref().unwrap_or("Unknown author"),
        format::format_date(article.published_at.as_ref()).dark_grey()
    );
    println!();
    if let Some(description) = article.description.as_deref() {
        for line in textwrap::wrap(description.trim(), WRAP_WIDTH) {
            println!("{line}");
        }
        println!();
    }
    if let Some(content) = article.content.as_deref() {
        for line in textwrap::wrap(content.trim(), WRAP_WIDTH) {
            println!("{}", line.as_ref().dark_grey());
        }
        println!();
    }
    println!("{}", article.url.as_str().blue().underlined());
}

pub fn show_sources(sources: &[SourceInfo]) {
    println!();
    println!("{}", "Available sources".bold().cyan());
    println!();
    for source in sources {
        println!(
            "  {:<24} {}",
            source.id.as_str().yellow(),
            source.name
        );
        if let Some(description) = source.description.as_deref() {
            println!("  {:<24} {}", "", format::truncate(description, TITLE_WIDTH).dark_grey());
        }
    }
}

pub fn pick_category() -> Option<Category> {
    println!();
    println!("{}", "Categories".bold());
    for (n, category) in Category::ALL.iter().enumerate() {
        println!("  {}) {}", n + 1, category.as_str());
    }
    let choice = prompt_number("Category", 1, Category::ALL.len())?;
    Some(Category::ALL[choice - 1])
}

pub fn show_api_error(err: &ApiError) {
    show_error(&err.to_string());
    match err {
        ApiError::Auth(_) => {
            show_info("Check the api_key in your config file; free keys: https://newsapi.org/register");
        }
        ApiError::RateLimited { retry_after } => match retry_after {
            Some(secs) => show_info(&format!("Wait {secs}s before trying again")),
            None => show_info("Wait a while before trying again"),
        },
        ApiError::Transient(_) => show_info("Check your internet connection and try again"),
        _ => {}
    }
}

pub fn show_error(message: &str) {
    println!("{} {}", "error:".red().bold(), message);
}

pub fn show_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

pub fn show_info(message: &str) {
    println!("{}", message.dark_grey());
}

pub fn show_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn show_goodbye() {
    println!();
    println!("{}", "Bye.".dark_grey());
}

pub fn pause() {
    let _ = prompt("Press Enter to continue");
}

pub fn confirm(label: &str) -> bool {
    prompt(&format!("{label} [y/N]")).eq_ignore_ascii_case("y")
}

pub fn open_url(url: &str) -> bool {
    open::that(url).is_ok()
}

pub fn prompt(label: &str) -> String {
    print!("{} ", format!("{label}:").bold());
    let _ = io::stdout().flush();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

/// Read a bounded number; empty input or `q` cancels.
pub fn prompt_number(label: &str, min: usize, max: usize) -> Option<usize> {
    loop {
        let input = prompt(&format!("{label} ({min}-{max}, empty to cancel)"));
        if input.is_empty() || input.eq_ignore_ascii_case("q") {
            return None;
        }
        match input.parse::<usize>() {
            Ok(value) if (min..=max).contains(&value) => return Some(value),
            Ok(_) => show_warning(&format!("Enter a number between {min} and {max}")),
            Err(_) => show_warning("Enter a valid number"),
        }
    }
}
