use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gbt7714::config::{find_config_file, load_config, Config};
use gbt7714::formatters::{format, OutputMode};
use gbt7714::models::{Author, Citation, CitationBuilder, EntryType};
use gbt7714::parsers::{detect_format, CitationParser, InputFormat};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// gbt7714 - Normalize citations into GB/T 7714-2015 and LaTeX bibitem form
#[derive(Parser, Debug)]
#[command(name = "gbt7714")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Normalize BibTeX, APA, web and GB/T citations into GB/T 7714-2015", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which renderings to print
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// GB/T 7714 string
    Gbt,
    /// LaTeX \bibitem entry
    Bibitem,
    /// Both, GB/T first
    Both,
}

impl Mode {
    fn outputs(self) -> &'static [OutputMode] {
        match self {
            Mode::Gbt => &[OutputMode::Gbt],
            Mode::Bibitem => &[OutputMode::Bibitem],
            Mode::Both => &[OutputMode::Gbt, OutputMode::Bibitem],
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize one citation given as an argument or on stdin
    #[command(alias = "n")]
    Normalize {
        /// Citation text, or `-` to read from stdin
        text: String,

        /// Output rendering
        #[arg(long, short, value_enum, default_value_t = Mode::Both)]
        mode: Mode,

        /// Key for the \bibitem entry
        #[arg(long, short)]
        key: Option<String>,

        /// Print the parsed citation and renderings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render built-in example citations
    Demo {
        /// Output rendering
        #[arg(long, short, value_enum, default_value_t = Mode::Both)]
        mode: Mode,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// One normalized entry in `--json` output
#[derive(Serialize)]
struct JsonEntry<'a> {
    format: InputFormat,
    citation: &'a Citation,
    #[serde(skip_serializing_if = "Option::is_none")]
    gbt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bibitem: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let (config, config_path) = if let Some(config_path) = &cli.config {
        let config = load_config(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?;
        (config, Some(config_path.clone()))
    } else if let Some(config_path) = find_config_file() {
        let config = load_config(&config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?;
        (config, Some(config_path))
    } else {
        (Config::default(), None)
    };

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let parser = CitationParser::new(&config.authors);

    match cli.command {
        Commands::Normalize {
            text,
            mode,
            key,
            json,
        } => {
            let input = if text == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read stdin")?;
                buf
            } else {
                text
            };

            let input = input.trim();
            if input.is_empty() {
                anyhow::bail!("no citation text given");
            }

            if let Err(e) = normalize_entry(&parser, input, mode, key.as_deref(), json) {
                report_error(input, &e);
                anyhow::bail!("the citation could not be normalized");
            }
        }

        Commands::Demo { mode } => {
            for citation in demo_citations() {
                for output in mode.outputs() {
                    println!("{}", format(&citation, *output, None));
                }
                println!();
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml().context("failed to serialize config")?);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins, then `-v`/`-q`, then the configured level
fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("gbt7714={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn normalize_entry(
    parser: &CitationParser,
    raw: &str,
    mode: Mode,
    key: Option<&str>,
    json: bool,
) -> Result<()> {
    let detected = detect_format(raw);
    let citation = parser.parse_as(detected, raw)?;

    if json {
        println!("{}", render_json(detected, &citation, mode, key)?);
    } else {
        for output in mode.outputs() {
            println!("{}", format(&citation, *output, key));
        }
    }
    Ok(())
}

fn render_json(
    detected: InputFormat,
    citation: &Citation,
    mode: Mode,
    key: Option<&str>,
) -> Result<String> {
    let render = |wanted: OutputMode| {
        mode.outputs()
            .contains(&wanted)
            .then(|| format(citation, wanted, key))
    };
    let entry = JsonEntry {
        format: detected,
        citation,
        gbt: render(OutputMode::Gbt),
        bibitem: render(OutputMode::Bibitem),
    };
    serde_json::to_string_pretty(&entry).context("failed to serialize citation")
}

fn report_error(entry: &str, error: &anyhow::Error) {
    let preview: String = entry.chars().take(60).collect();
    if std::io::stderr().is_terminal() {
        eprintln!("{} {:#}", "error:".red().bold(), error);
        eprintln!("  {}", preview.dimmed());
    } else {
        eprintln!("error: {:#}", error);
        eprintln!("  {}", preview);
    }
}

fn demo_citations() -> Vec<Citation> {
    vec![
        CitationBuilder::new(EntryType::Journal, "Intelligent robotics and applications")
            .authors(vec![
                Author::person("Yu H B"),
                Author::person("Liu J G"),
                Author::person("Liu L Q"),
                Author::person("张三"),
            ])
            .container("Example Journal")
            .year(2023)
            .volume("12")
            .issue("1")
            .pages("20-30")
            .doi("https://doi.org/10.1000/xyz123")
            .build(),
        CitationBuilder::new(EntryType::Book, "Python 编程实践")
            .author(Author::person("刘伟"))
            .publisher("机械工业出版社")
            .place("北京")
            .year(2023)
            .edition("2")
            .build(),
        CitationBuilder::new(EntryType::WebResource, "国家标准发布公告")
            .author(Author::institution("国家标准化管理委员会"))
            .publish_date("2015-05-15")
            .access_date("2024-01-10")
            .url("https://www.sac.gov.cn/")
            .maybe_year(Some(2015))
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_inside_record_is_one_citation() {
        let raw = "@article{k,\n  author={A B},\n\n  title={T}, journal={J}, year={2020}, volume={1}, pages={1--2}}";
        assert!(normalize_entry(&CitationParser::default(), raw, Mode::Gbt, None, false).is_ok());
    }

    #[test]
    fn test_parse_failure_is_returned() {
        let result = normalize_entry(&CitationParser::default(), "nothing here", Mode::Both, None, true);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_json() {
        let citation = demo_citations().remove(0);
        let text = render_json(InputFormat::Gbt, &citation, Mode::Gbt, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["format"], "gbt");
        assert!(value["gbt"].as_str().is_some_and(|s| s.ends_with("DOI: 10.1000/xyz123")));
        assert!(value.get("bibitem").is_none());
    }
}
