use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use console::{Emoji, Term};
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use podshelf::{
    Action, AppContext, Config, DEFAULT_BASE_URL, DateStyle, Effect, EpisodeForm, EpisodeRecord,
    EpisodeSource, EpisodeStats, FeedLocation, JsonApiSource, Notification, NotificationCenter,
    NotificationLevel, NotificationSink, PodcastInfo, ReqwestClient, RssFeedSource,
    SeasonSelector, SharedEpisodeSource, UploadCoordinator, Variant, episode_count_label,
    format_display_date, render, render_notifications, render_podcast_info, render_stats,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static UPLOAD: Emoji<'_, '_> = Emoji("📤 ", "[^] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static INFO: Emoji<'_, '_> = Emoji("💬 ", "[-] ");
static MUSIC: Emoji<'_, '_> = Emoji("🎵 ", "");

/// Browse and manage the episodes of a podcast site
#[derive(Parser, Debug)]
#[command(name = "podshelf")]
#[command(about = "Browse and manage the episodes of a podcast site")]
#[command(version)]
struct Cli {
    /// Site root hosting the episode API and rss.xml
    #[arg(long, env = "PODSHELF_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: Url,

    /// Read episodes from this RSS feed (URL or local file) instead of the API
    #[arg(long, global = true)]
    feed: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only errors are printed
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List episodes
    List {
        /// "all" or a season number
        #[arg(long, default_value = "all")]
        season: String,

        /// Print the rendered HTML instead of a text listing
        #[arg(long)]
        html: bool,

        /// Use the admin layout
        #[arg(long)]
        admin: bool,
    },

    /// Show channel information and catalogue statistics from the RSS feed
    Stats {
        /// Print the rendered HTML instead of a text summary
        #[arg(long)]
        html: bool,
    },

    /// Upload a new episode
    Upload {
        /// Audio file to upload
        file: PathBuf,

        /// Episode title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Duration as m:ss or h:mm:ss (defaults to the probed length)
        #[arg(long)]
        duration: Option<String>,

        /// Episode number
        #[arg(long)]
        episode: Option<u32>,

        /// Season number
        #[arg(long)]
        season: Option<u32>,

        /// Text file with one track per line
        #[arg(long)]
        tracklist_file: Option<PathBuf>,

        /// Media type of the file (inferred from its extension otherwise)
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Delete the episode at a position of the API listing
    Delete {
        /// Position as shown by `list --admin`
        index: usize,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Prints notifications around the spinner and keeps them for HTML output
struct TerminalSink {
    bar: ProgressBar,
    quiet: bool,
    center: NotificationCenter,
}

impl NotificationSink for TerminalSink {
    fn notify(&self, notification: Notification) {
        let line = match notification.level {
            NotificationLevel::Error => Some(format!(
                "{FAILURE}{}",
                notification.message.red()
            )),
            _ if self.quiet => None,
            NotificationLevel::Success => Some(format!(
                "{SUCCESS}{}",
                notification.message.green()
            )),
            NotificationLevel::Info => Some(format!("{INFO}{}", notification.message)),
        };
        if let Some(line) = line {
            self.bar.suspend(|| eprintln!("{line}"));
        }
        self.center.notify(notification);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {wide_msg}")?);
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

fn episode_source(
    client: &ReqwestClient,
    feed: Option<&str>,
    config: &Config,
) -> Result<SharedEpisodeSource> {
    Ok(match feed {
        Some(feed) => Arc::new(RssFeedSource::new(
            client.clone(),
            FeedLocation::parse(feed).context("Invalid --feed")?,
        )),
        None => Arc::new(JsonApiSource::new(
            client.clone(),
            config.episodes_url().context("Invalid base URL")?,
        )),
    })
}

fn variant_for(admin: bool, from_feed: bool) -> Variant {
    match (admin, from_feed) {
        (false, false) => Variant::Viewer,
        (false, true) => Variant::StaticViewer,
        (true, false) => Variant::Admin,
        (true, true) => Variant::AdminStatic,
    }
}

fn print_episode(index: usize, episode: &EpisodeRecord) {
    println!("  {} {}", format!("[{index}]").dimmed(), episode.title.bold());

    let mut meta = vec![episode.display_date(), episode.duration.clone()];
    if let Some(n) = episode.episode_number {
        meta.push(format!("Episode {n}"));
    }
    if let Some(n) = episode.season {
        meta.push(format!("Season {n}"));
    }
    meta.retain(|part| !part.is_empty());
    if !meta.is_empty() {
        println!("      {}", meta.join(" • ").dimmed());
    }

    if episode.has_tracklist() {
        println!(
            "      {MUSIC}{}",
            format!("{} tracks", episode.tracklist.len()).cyan()
        );
    }
}

fn print_info(info: &PodcastInfo, feed_url: &str) {
    println!("{HEADPHONES}{}", info.title.bold().green());
    let rows = [
        ("Author", info.author.as_str()),
        ("Email", info.email.as_str()),
        ("Language", info.language.as_str()),
        ("Website", info.website.as_str()),
        ("Feed URL", feed_url),
        ("Generator", info.generator.as_str()),
    ];
    for (label, value) in rows.iter().filter(|(_, v)| !v.is_empty()) {
        println!("  {:<10} {}", format!("{label}:").dimmed(), value);
    }
    let updated = format_display_date(&info.last_build_date, DateStyle::DayTime);
    if !updated.is_empty() {
        println!("  {:<10} {}", "Updated:".dimmed(), updated);
    }
}

fn print_stats(stats: &EpisodeStats) {
    println!("\n{}", "Statistics".bold());
    println!("  Episodes:        {}", stats.total_episodes.to_string().cyan());
    println!("  Total duration:  {}", stats.total_duration_display().cyan());
    println!("  Average:         {}", stats.average_duration_display().cyan());
    println!("  Tracks:          {}", stats.total_tracks.to_string().cyan());
    println!(
        "  With tracklist:  {}",
        stats.episodes_with_tracklist.to_string().cyan()
    );
    if let Some((title, date)) = &stats.latest {
        println!(
            "  Latest:          {} ({})",
            title.yellow(),
            format_display_date(date, DateStyle::Day)
        );
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if !cli.quiet {
        eprintln!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podshelf".bold().magenta(),
            "- Podcast Episode Shelf".dimmed()
        );
    }

    let config = Config::with_base_url(cli.base_url.clone());
    let client = ReqwestClient::new();
    let bar = spinner(cli.quiet)?;
    let sink = Arc::new(TerminalSink {
        bar: bar.clone(),
        quiet: cli.quiet,
        center: NotificationCenter::new(config.notification_ttl),
    });

    match cli.command {
        Command::List {
            season,
            html,
            admin,
        } => {
            let selector: SeasonSelector = season.parse().context("Invalid --season")?;
            let source = episode_source(&client, cli.feed.as_deref(), &config)?;
            bar.set_message(format!("{SEARCH}Loading episodes from {}", source.describe().cyan()));
            let app = AppContext::new(source, sink.clone(), config);

            app.reload().await.context("Failed to load episodes")?;
            bar.finish_and_clear();
            app.dispatch(&Action::Filter(selector));

            let variant = variant_for(admin, cli.feed.is_some());
            if html {
                println!("{}", app.render_page(variant).html);
                println!("{}", render(&render_notifications(&sink.center.active())).html);
                return Ok(());
            }

            let episodes = if admin { app.episodes() } else { app.filtered() };
            let title = if admin {
                SeasonSelector::All.section_title()
            } else {
                selector.section_title()
            };
            println!(
                "{HEADPHONES}{} • {}\n",
                title.bold(),
                episode_count_label(episodes.len())
            );
            if episodes.is_empty() {
                println!("  {}", "No episodes available".dimmed());
            }
            for (index, episode) in episodes.iter().enumerate() {
                print_episode(index, episode);
            }
        }

        Command::Stats { html } => {
            let location = match cli.feed.as_deref() {
                Some(feed) => FeedLocation::parse(feed).context("Invalid --feed")?,
                None => FeedLocation::Remote(config.feed_url().context("Invalid base URL")?),
            };
            bar.set_message(format!("{SEARCH}Fetching feed: {}", location.to_string().cyan()));

            let source = RssFeedSource::new(client, location.clone());
            let feed = source.load_feed().await.context("Failed to load feed")?;
            bar.finish_and_clear();

            let stats = EpisodeStats::compute(&feed.episodes);
            let feed_url = location.to_string();
            if html {
                println!("{}", render(&render_podcast_info(&feed.info, &feed_url)).html);
                println!("{}", render(&render_stats(&stats)).html);
            } else {
                print_info(&feed.info, &feed_url);
                print_stats(&stats);
            }
        }

        Command::Upload {
            file,
            title,
            description,
            duration,
            episode,
            season,
            tracklist_file,
            media_type,
        } => {
            if cli.feed.is_some() {
                bail!("Uploading needs the episode API; drop --feed");
            }
            let tracklist_text = match &tracklist_file {
                Some(path) => tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => String::new(),
            };

            let source = episode_source(&client, None, &config)?;
            let app = Arc::new(AppContext::new(source, sink.clone(), config));
            let coordinator = UploadCoordinator::new(client, app.clone());

            bar.set_message(format!("{SEARCH}Reading {}", file.display()));
            let Some(prefill) = coordinator.select_file(&file, media_type.as_deref()).await else {
                bar.finish_and_clear();
                bail!("{} is not an audio file", file.display());
            };

            let mut form = EpisodeForm {
                description,
                episode_number: episode,
                season,
                tracklist_text,
                ..Default::default()
            };
            form.apply_prefill(&prefill);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(duration) = duration {
                form.duration = duration;
            }
            if form.duration.trim().is_empty() {
                bar.finish_and_clear();
                bail!(
                    "No duration could be read from {}, pass it with --duration",
                    file.display()
                );
            }

            bar.set_message(format!("{UPLOAD}Uploading {}", form.title.cyan()));
            coordinator
                .submit(&form, &prefill.file)
                .await
                .context("Failed to upload episode")?;
            bar.finish_and_clear();

            if !cli.quiet {
                println!(
                    "\n{SUCCESS}{} now lists {}",
                    "API".bold(),
                    episode_count_label(app.episodes().len()).green()
                );
            }
        }

        Command::Delete { index, yes } => {
            if cli.feed.is_some() {
                bail!("Deleting needs the episode API; drop --feed");
            }
            let source = episode_source(&client, None, &config)?;
            let app = Arc::new(AppContext::new(source, sink.clone(), config));
            let coordinator = UploadCoordinator::new(client, app.clone());

            bar.set_message(format!("{SEARCH}Loading episodes"));
            app.reload().await.context("Failed to load episodes")?;
            bar.finish_and_clear();

            if app.dispatch(&Action::ConfirmDelete { index }) == Effect::None {
                bail!(
                    "No episode at position {index} ({})",
                    episode_count_label(app.episodes().len())
                );
            }

            let title = app.episode(index).map(|e| e.title).unwrap_or_default();
            if !yes && !confirm(&format!("Delete \"{title}\"?"))? {
                app.dispatch(&Action::CancelDelete);
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }

            if let Effect::DeleteEpisode(index) = app.dispatch(&Action::Delete) {
                coordinator
                    .delete(index)
                    .await
                    .context("Failed to delete episode")?;
            }
        }
    }

    Ok(())
}
