//! Terminal front-end for the LnkUp link shortener.
//!
//! # Usage
//!
//! ```bash
//! # Interactive shortening with alias suggestions
//! lnkup
//!
//! # Non-interactive
//! lnkup shorten --url https://example.com/docs --alias my-docs --yes
//!
//! # Resolve an alias
//! lnkup open my-docs
//!
//! # One-shot calls
//! lnkup check my-docs
//! lnkup suggest https://example.com/docs --count 5
//! lnkup stats my-docs
//! ```
//!
//! # Environment Variables
//!
//! See [`lnkup::config`]. `--api-url` and `--origin` override the environment.

use lnkup::api::{HttpLinkApi, LinkApi};
use lnkup::application::flows::{Navigator, RedirectPage, RedirectState, SuggestionSlots};
use lnkup::application::session::{SessionSettings, ShortenSession};
use lnkup::config::{Config, MAX_SUGGESTION_COUNT, Overrides, load_from_env};
use lnkup::prelude::{AliasVerdict, AvailabilityIndicator};
use lnkup::telemetry;
use lnkup::utils::TerminalClipboard;

use anyhow::{Context, Result};
use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Select};
use std::sync::Arc;

/// Shorten links and resolve aliases from the terminal.
#[derive(Parser)]
#[command(name = "lnkup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service API base URL (overrides LNKUP_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Public origin used to compose short links (overrides LNKUP_PUBLIC_ORIGIN)
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL (default)
    Shorten {
        /// URL to shorten (prompted if omitted)
        #[arg(short, long)]
        url: Option<String>,

        /// Custom alias (prompted if omitted)
        #[arg(short, long)]
        alias: Option<String>,

        /// Skip prompts and confirmation
        #[arg(short = 'y', long)]
        yes: bool,

        /// Copy the short link to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// Resolve an alias to its destination
    Open {
        alias: String,
    },

    /// Check whether an alias is available
    Check {
        alias: String,
    },

    /// Suggest aliases for a URL
    Suggest {
        url: String,

        /// Number of suggestions (1-10)
        #[arg(
            short = 'n',
            long,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_SUGGESTION_COUNT as u64)
        )]
        count: Option<usize>,
    },

    /// Show click statistics for a short code
    Stats {
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_from_env(Overrides {
        api_url: cli.api_url,
        public_origin: cli.origin,
    })
    .context("Failed to load configuration")?;

    telemetry::init(&config);
    config.print_summary();

    let api: Arc<dyn LinkApi> =
        Arc::new(HttpLinkApi::from_config(&config).context("Failed to create API client")?);

    let command = cli.command.unwrap_or(Commands::Shorten {
        url: None,
        alias: None,
        yes: false,
        copy: false,
    });

    match command {
        Commands::Shorten {
            url,
            alias,
            yes,
            copy,
        } => shorten(api, &config, url, alias, yes, copy).await?,
        Commands::Open { alias } => open(api, &alias).await?,
        Commands::Check { alias } => check(api, &alias).await?,
        Commands::Suggest { url, count } => {
            let count = count.unwrap_or(config.suggestion_count);
            suggest(api, &url, count).await?
        }
        Commands::Stats { code } => stats(api, &code).await?,
    }

    Ok(())
}

/// Every prefix of `text`, as if typed one character at a time.
fn keystrokes(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .map(move |(i, c)| &text[..i + c.len_utf8()])
}

/// Feeds a typed URL to the session and waits for its suggestions.
async fn enter_url(session: &mut ShortenSession, url: &str) -> Result<()> {
    for prefix in keystrokes(url) {
        session.set_url(prefix)?;
    }
    session.settle().await;
    Ok(())
}

/// Feeds a typed alias to the session and waits for its availability.
///
/// Re-entering the alias already checked issues no new check; see
/// [`ShortenSession::recheck_alias`].
async fn enter_alias(session: &mut ShortenSession, alias: &str) -> Result<()> {
    if alias.is_empty() {
        session.set_alias("")?;
    }
    for prefix in keystrokes(alias) {
        session.set_alias(prefix)?;
    }
    session.settle().await;
    Ok(())
}

fn print_suggestions(slots: &SuggestionSlots) {
    match slots {
        SuggestionSlots::Hidden | SuggestionSlots::Placeholders(_) => {}
        SuggestionSlots::Aliases(aliases) if aliases.is_empty() => {
            println!("  {}", "No suggestions available".bright_black());
        }
        SuggestionSlots::Aliases(aliases) => {
            println!("  {}", "Suggested aliases:".bright_white());
            for alias in aliases {
                println!("    {}", alias.cyan());
            }
        }
    }
}

fn print_availability(indicator: &AvailabilityIndicator) {
    let Some(message) = indicator.message() else {
        return;
    };

    let line = match indicator {
        AvailabilityIndicator::Available => message.green(),
        AvailabilityIndicator::Taken => message.red(),
        AvailabilityIndicator::Unverified(_) => message.yellow(),
        AvailabilityIndicator::None | AvailabilityIndicator::Checking => message.bright_black(),
    };
    println!("  {line}");
}

/// Asks for an alias: a suggestion, a custom one or none.
fn prompt_alias(slots: &SuggestionSlots) -> Result<String> {
    let suggestions = match slots {
        SuggestionSlots::Aliases(aliases) => aliases.clone(),
        SuggestionSlots::Hidden | SuggestionSlots::Placeholders(_) => Vec::new(),
    };

    let mut items = suggestions.clone();
    items.push("Type a custom alias".to_string());
    items.push("No custom alias".to_string());

    let choice = Select::new()
        .with_prompt("Alias")
        .items(&items)
        .default(items.len() - 1)
        .interact()?;

    if choice < suggestions.len() {
        Ok(suggestions[choice].clone())
    } else if choice == suggestions.len() {
        Ok(Input::new()
            .with_prompt("Custom alias")
            .allow_empty(true)
            .interact_text()?)
    } else {
        Ok(String::new())
    }
}

/// Runs one shortening session.
///
/// # Flow
///
/// 1. Type the URL, wait for suggestions
/// 2. Pick or type an alias, wait for its availability
/// 3. Confirm (unless `--yes`) and submit
/// 4. Show the short link, optionally copy it
///
/// A refused alias is asked for again when prompting is allowed.
async fn shorten(
    api: Arc<dyn LinkApi>,
    config: &Config,
    url: Option<String>,
    alias: Option<String>,
    skip_prompts: bool,
    copy: bool,
) -> Result<()> {
    println!("{}", "🔗 Shorten a link".bright_blue().bold());
    println!();

    let mut session = ShortenSession::new(api, SessionSettings::from(config));

    let url = match url {
        Some(url) => url,
        None if skip_prompts => anyhow::bail!("--url is required with --yes"),
        None => Input::new().with_prompt("Long URL").interact_text()?,
    };

    enter_url(&mut session, url.trim()).await?;
    print_suggestions(&session.view().suggestions);

    let mut alias = match alias {
        Some(alias) => alias,
        None if skip_prompts => String::new(),
        None => prompt_alias(&session.view().suggestions)?,
    };

    enter_alias(&mut session, alias.trim()).await?;

    loop {
        print_availability(&session.view().availability);

        let verdict = session.alias_verdict();
        if verdict.permits_submission() {
            break;
        }
        if skip_prompts {
            anyhow::bail!("Alias '{}' cannot be used", session.alias());
        }

        if matches!(verdict, AliasVerdict::Unverified(_))
            && Confirm::new()
                .with_prompt("Check the alias again?")
                .default(true)
                .interact()?
        {
            session.recheck_alias();
            session.settle().await;
            continue;
        }

        alias = prompt_alias(&session.view().suggestions)?;
        enter_alias(&mut session, alias.trim()).await?;
    }

    if !skip_prompts {
        let confirmed = Confirm::new()
            .with_prompt("Shorten this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    loop {
        println!("  {}", session.view().action_label.bright_black());
        session
            .submit()
            .map_err(|e| anyhow::anyhow!("Cannot submit: {}", e))?;
        session.settle().await;

        let view = session.view();
        if let (Some(link), Some(result)) = (view.short_link, session.result()) {
            println!();
            println!("{}", "✅ Link shortened!".green().bold());
            println!("  {}", link.bright_yellow().bold());
            println!(
                "  {}",
                format!(
                    "Created {}",
                    result
                        .created_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                )
                .bright_black()
            );
            break;
        }

        let error = view.error.unwrap_or_default();
        println!("{}", format!("❌ {error}").red());

        if skip_prompts {
            anyhow::bail!("Shortening failed: {}", error);
        }

        let retry = Confirm::new()
            .with_prompt("Try again?")
            .default(true)
            .interact()?;
        if !retry {
            return Ok(());
        }
    }

    let copy = copy
        || (!skip_prompts
            && Confirm::new()
                .with_prompt("Copy to clipboard?")
                .default(true)
                .interact()?);

    if copy {
        let mut clipboard = TerminalClipboard::default();
        if session
            .copy_short_link(&mut clipboard)
            .map_err(|e| anyhow::anyhow!("Failed to copy to clipboard: {}", e))?
            .is_some()
        {
            println!("{}", "📋 Copied".green());
        }
    }

    println!();
    Ok(())
}

/// Prints navigations instead of performing them.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn hard_navigate(&mut self, url: &str) {
        println!("  {} {}", "➡".green(), url.bright_yellow().bold());
    }

    fn route_to(&mut self, path: &str) {
        println!("  {} {}", "↪".yellow(), path.yellow());
    }
}

async fn open(api: Arc<dyn LinkApi>, alias: &str) -> Result<()> {
    println!("{} {}", "🔎 Resolving".bright_blue().bold(), alias.cyan());

    let mut page = RedirectPage::new(api);
    match page.open(alias, &mut TerminalNavigator).await {
        RedirectState::Resolved(_) | RedirectState::Failed(Some(_)) => Ok(()),
        RedirectState::Failed(None) => anyhow::bail!("Link '{}' not found", alias),
        RedirectState::Idle | RedirectState::Pending => {
            anyhow::bail!("Resolution of '{}' did not finish", alias)
        }
    }
}

async fn check(api: Arc<dyn LinkApi>, alias: &str) -> Result<()> {
    let availability = api
        .check_alias_availability(alias)
        .await
        .map_err(|e| anyhow::anyhow!("Availability check failed: {}", e))?;

    let verdict = if availability.is_available {
        AliasVerdict::Available
    } else {
        AliasVerdict::Taken
    };
    println!("{}", availability.alias.cyan());
    print_availability(&verdict.indicator());

    Ok(())
}

async fn suggest(api: Arc<dyn LinkApi>, url: &str, count: usize) -> Result<()> {
    let aliases = api
        .suggest_aliases(url, count)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch suggestions: {}", e))?;

    print_suggestions(&SuggestionSlots::Aliases(
        aliases.into_iter().take(count).collect(),
    ));

    Ok(())
}

async fn stats(api: Arc<dyn LinkApi>, code: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let metadata = api
        .get_metadata(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!("  Code:    {}", code.cyan());
    println!(
        "  Clicks:  {}",
        metadata.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Last IP: {}",
        metadata.last_ip.as_deref().unwrap_or("-").bright_black()
    );
    if let Some(name) = metadata.custom_name {
        println!("  Alias:   {}", name.cyan());
    }
    println!();

    Ok(())
}
