use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use myga::backend::BackendClient;
use myga::config::Config;
use myga::dom::Page;
use myga::mail::{SummaryStyle, Tone};
use myga::nav::{PageContext, is_mail_host};
use myga::relay::{serve_lines, spawn_relay};
use myga::sidebar::{ReplyOutcome, Sidebar, SummaryOutcome};

fn setup_logging(to_file: bool) {
    use std::fs::OpenOptions;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,myga=debug"));

    // The relay speaks on stdout, so it never gets a log file either
    let log_file = to_file
        .then(Config::config_dir)
        .and_then(|dir| dir.ok())
        .and_then(|dir| fs::create_dir_all(&dir).ok().map(|_| dir.join("myga.log")))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"myga - AI reply drafting and thread summaries for webmail

Usage: myga <command> [options]

Commands:
    reply <page.html>       Draft a reply for the open email and insert it
                            into the compose box
        --tone <tone>       Formal, Courteous, Concise, Casual, Empathetic, Rigid
    summarize <page.html>   Summarize the open thread
        --style <style>     Short, BulletPoints, Detailed
    relay                   Serve relay requests as JSON lines on stdin/stdout
    help                    Show this help message

Options for reply and summarize:
    --url <url>             Location the page was captured from
    --out <file>            Write the updated page here instead of stdout

Configuration file: ~/.config/myga/config.toml
"#
    );
}

/// Arguments shared by the page commands.
struct PageArgs {
    page: PathBuf,
    url: Option<String>,
    out: Option<PathBuf>,
    /// Value of the command's own option (`--tone` or `--style`)
    choice: Option<String>,
}

fn parse_page_args(args: &[String], choice_flag: &str) -> Result<PageArgs> {
    let mut page = None;
    let mut url = None;
    let mut out = None;
    let mut choice = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--url" => url = Some(value("--url")?),
            "--out" => out = Some(PathBuf::from(value("--out")?)),
            flag if flag == choice_flag => choice = Some(value(choice_flag)?),
            flag if flag.starts_with("--") => anyhow::bail!("Unknown option: {}", flag),
            path if page.is_none() => page = Some(PathBuf::from(path)),
            extra => anyhow::bail!("Unexpected argument: {}", extra),
        }
    }

    Ok(PageArgs {
        page: page.context("Missing page file")?,
        url,
        out,
        choice,
    })
}

impl PageArgs {
    fn load_page(&self) -> Result<Page> {
        let html = fs::read_to_string(&self.page)
            .with_context(|| format!("Failed to read page: {}", self.page.display()))?;
        Ok(Page::parse(&html))
    }

    fn write_page(&self, page: &Page) -> Result<()> {
        let html = page.to_html();
        match &self.out {
            Some(path) => fs::write(path, html)
                .with_context(|| format!("Failed to write page: {}", path.display())),
            None => {
                println!("{}", html);
                Ok(())
            }
        }
    }
}

/// Without a URL the snapshot is taken to be an open thread.
fn build_sidebar(config: &Config, url: Option<&str>) -> Sidebar {
    let backend = BackendClient::new(config.backend.base_url.clone());
    let relay = spawn_relay(backend, config.relay.channel_capacity);
    let mut sidebar = Sidebar::new(relay, config, PageContext::Thread);
    if let Some(url) = url {
        if !is_mail_host(url) {
            tracing::warn!("{} is not a webmail location", url);
        }
        sidebar.mount(url);
    }
    sidebar.show();
    sidebar
}

fn report_status(sidebar: &Sidebar) {
    if let Some(status) = &sidebar.state().status {
        eprintln!("{}", status.text);
    }
}

async fn run_reply(args: &[String]) -> Result<()> {
    let args = parse_page_args(args, "--tone")?;
    let config = Config::load()?;
    let mut page = args.load_page()?;
    let mut sidebar = build_sidebar(&config, args.url.as_deref());
    if let Some(tone) = &args.choice {
        sidebar.select_tone(tone.parse::<Tone>()?);
    }

    let outcome = sidebar.generate_reply(&mut page).await;
    report_status(&sidebar);
    match outcome {
        ReplyOutcome::Injected(_) => args.write_page(&page),
        ReplyOutcome::NotInjected(reply) => {
            println!("=== GENERATED REPLY ===\n{}\n=== END REPLY ===", reply);
            Ok(())
        }
        ReplyOutcome::Failed => std::process::exit(1),
    }
}

async fn run_summarize(args: &[String]) -> Result<()> {
    let args = parse_page_args(args, "--style")?;
    let config = Config::load()?;
    let mut page = args.load_page()?;
    let mut sidebar = build_sidebar(&config, args.url.as_deref());
    if let Some(style) = &args.choice {
        sidebar.select_style(style.parse::<SummaryStyle>()?);
    }

    let outcome = sidebar.summarize_thread(&mut page).await;
    report_status(&sidebar);
    match outcome {
        SummaryOutcome::Shown { summary, .. } => {
            if args.out.is_some() {
                println!("{}", summary);
            }
            args.write_page(&page)
        }
        SummaryOutcome::Failed => std::process::exit(1),
    }
}

async fn run_relay() -> Result<()> {
    let config = Config::load()?;
    let backend = BackendClient::new(config.backend.base_url);
    tracing::info!("Relay serving stdin/stdout for {}", backend.base_url());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve_lines(stdin, tokio::io::stdout(), &backend).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") | None => {
            print_usage();
            Ok(())
        }
        Some("reply") => {
            setup_logging(true);
            run_reply(&args[2..]).await
        }
        Some("summarize") => {
            setup_logging(true);
            run_summarize(&args[2..]).await
        }
        Some("relay") => {
            setup_logging(false);
            run_relay().await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
    }
}
