use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shirabe_config::{Config, LoggingConfig};
use shirabe_core::LanguageProcessor;
use shirabe_core::preprocess::{DefaultPreprocessor, Preprocessor};
use shirabe_lang_japanese::{JapaneseProcessor, contains_japanese, lookup_span};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod loading;
mod output;

use self::loading::Dictionaries;
use self::output::CandidateView;

#[derive(Parser)]
#[command(name = "shirabe", about = "Japanese dictionary lookup with deconjugation")]
struct Cli {
    /// Text to look up. If omitted, reads lines from stdin.
    #[arg(long)]
    text: Option<String>,

    /// JSON config file; `SHIRABE_*` environment variables are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Character position in the text where the lookup starts.
    #[arg(short, long, default_value = "0")]
    position: usize,

    /// Show at most N candidates.
    #[arg(short = 'n', long = "top", default_value = "10")]
    top: usize,

    /// Print candidates as JSON lines.
    #[arg(long)]
    json: bool,

    /// Look up single kanji only.
    #[arg(long)]
    kanji: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::new(),
    };
    if cli.kanji {
        config.lookup.kanji_mode = true;
    }
    config.validate()?;

    init_tracing(&config.logging);

    let rules = loading::load_rules(config.dictionary.rules_path.clone().map(PathBuf::from)).await?;

    let dictionaries = Dictionaries::pending(&config.dictionary);
    let processor = dictionaries.attach(JapaneseProcessor::new(rules, config.lookup.clone()));

    let loader = tokio::spawn({
        let dictionaries = dictionaries.clone();
        async move { loading::load_all(&dictionaries).await }
    });

    let session = Session {
        processor,
        dictionaries,
        position: cli.position,
        top: cli.top,
        json: cli.json,
    };

    match &cli.text {
        Some(text) => {
            let published = loader.await.context("dictionary loader panicked")?;
            tracing::debug!("{published} dictionaries published");
            session.print(text)
        }
        None => session.repl().await,
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries results
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

struct Session {
    processor: JapaneseProcessor,
    dictionaries: Dictionaries,
    position: usize,
    top: usize,
    json: bool,
}

impl Session {
    fn lookup(&self, line: &str) -> Vec<CandidateView> {
        let text = DefaultPreprocessor.process(line);
        if !contains_japanese(&text) {
            tracing::debug!("No Japanese text in input: '{}'", text);
            return Vec::new();
        }

        let span = lookup_span(&text, self.position);
        tracing::debug!("Lookup span: '{}'", span);

        self.processor
            .lookup(&span)
            .iter()
            .take(self.top)
            .map(CandidateView::from)
            .collect()
    }

    fn print(&self, line: &str) -> anyhow::Result<()> {
        let views = self.lookup(line);
        let mut stdout = std::io::stdout().lock();

        if self.json {
            serde_json::to_writer(&mut stdout, &views)?;
            writeln!(stdout)?;
        } else if views.is_empty() {
            if !self.dictionaries.is_ready() {
                tracing::info!("Dictionaries are still loading");
            }
            writeln!(stdout, "No matches")?;
        } else {
            for view in &views {
                write!(stdout, "{view}")?;
            }
        }
        Ok(())
    }

    /// Look up stdin lines until EOF. `:reload` reloads every dictionary, `:quit` exits.
    async fn repl(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            match line.trim() {
                "" => continue,
                ":quit" | ":q" => break,
                ":reload" => {
                    let published = loading::load_all(&self.dictionaries).await;
                    tracing::info!("Reloaded {published} dictionaries");
                }
                text => self.print(text)?,
            }
        }

        tracing::info!("Input closed");
        Ok(())
    }
}
