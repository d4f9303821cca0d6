use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use schemaform::config::{Config, DEFAULT_NOTICE_MS, DEFAULT_THEME_FILE};
use schemaform::export::DirSink;
use schemaform::render::render_page;
use schemaform::session::{Session, after_millis, parse_script};
use schemaform::theme::{self, FileThemeStore, ThemeStore};
use schemaform::{SAMPLE_SCHEMA, validate};
use std::path::PathBuf;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "schemaform")]
#[command(about = "Validate, preview and drive schema-described forms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,

    /// File holding the persisted theme ("light" or "dark").
    #[arg(long, global = true, env = "SCHEMAFORM_THEME_FILE", default_value = DEFAULT_THEME_FILE)]
    theme_file: PathBuf,

    /// How long the success notice stays up, in milliseconds.
    #[arg(long, global = true, env = "SCHEMAFORM_NOTICE_MS", default_value_t = DEFAULT_NOTICE_MS)]
    notice_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a schema file and list every problem.
    Validate {
        #[arg(long)]
        schema: String,

        /// Print violations as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write an HTML preview of a schema (the sample if none is given).
    Render {
        #[arg(long)]
        schema: Option<String>,

        #[arg(short = 'o', long)]
        out: String,
    },

    /// Run a JSON-lines event script against a session.
    Replay {
        #[arg(long)]
        schema: Option<String>,

        #[arg(long)]
        events: String,

        /// Directory receiving downloads and copied text.
        #[arg(long, env = "SCHEMAFORM_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Also write the final HTML preview here.
        #[arg(short = 'o', long)]
        out: Option<String>,
    },

    /// Show or toggle the persisted theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Print the built-in sample schema.
    Sample,
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config {
        notice_delay_ms: cli.notice_ms,
        theme_file: cli.theme_file,
        ..Config::default()
    };

    match cli.cmd {
        Commands::Validate { schema, json } => {
            let text = read_schema(Some(&schema))?;
            match validate(&text) {
                Ok(doc) => {
                    if json {
                        println!("[]");
                    } else {
                        println!(
                            "{}: ok ({} field(s), \"{}\")",
                            schema,
                            doc.fields.len(),
                            doc.form_title
                        );
                    }
                }
                Err(violations) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&violations)?);
                    } else {
                        eprintln!("{}", violations);
                    }
                    bail!("{}: {} problem(s)", schema, violations.len());
                }
            }
        }

        Commands::Render { schema, out } => {
            let text = read_schema(schema.as_deref())?;
            let session = Session::new(config.clone(), text, theme_store(&config));
            std::fs::write(&out, render_page(&session.page()))
                .with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }

        Commands::Replay {
            schema,
            events,
            out_dir,
            out,
        } => {
            config.out_dir = out_dir;
            let text = read_schema(schema.as_deref())?;
            let script = std::fs::read_to_string(&events)
                .with_context(|| format!("read event script {}", events))?;
            let steps = parse_script(&script).with_context(|| format!("parse {}", events))?;

            let mut session = Session::new(config.clone(), text, theme_store(&config));
            let mut sink = DirSink::new(&config.out_dir);
            let start = chrono::Utc::now();
            let mut elapsed_ms: u64 = 0;

            for step in steps {
                elapsed_ms = elapsed_ms.saturating_add(step.after_ms);
                let now = after_millis(start, elapsed_ms);
                let reaction = session.handle(step.event, now, &mut sink);
                println!("[{:>6} ms] {}", elapsed_ms, reaction);
            }

            if let Some(out) = out {
                std::fs::write(&out, render_page(&session.page()))
                    .with_context(|| format!("write {}", out))?;
                println!("Wrote {}", out);
            }
        }

        Commands::Theme { action } => {
            let mut store = FileThemeStore::new(&config.theme_file);
            let current = theme::load_or_default(&store);
            match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => println!("{}", current),
                ThemeAction::Toggle => {
                    let next = current.toggled();
                    store
                        .save(next)
                        .with_context(|| format!("write {}", store.path().display()))?;
                    println!("{}", next);
                }
            }
        }

        Commands::Sample => print!("{}", SAMPLE_SCHEMA),
    }

    Ok(())
}

fn read_schema(path: Option<&str>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("read schema file {}", p)),
        None => Ok(SAMPLE_SCHEMA.to_string()),
    }
}

fn theme_store(config: &Config) -> Box<dyn ThemeStore> {
    Box::new(FileThemeStore::new(&config.theme_file))
}
