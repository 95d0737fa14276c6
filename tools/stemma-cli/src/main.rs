use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use serde::Serialize;
use stemma_graph::{render_tree, validate_tree, DependencyGraph};
use stemma_parser::{parse_notation, Parser, RuleTable, DEFAULT_LIMIT};
use stemma_protocol::{Chunk, Node, RuleSet};
use tracing::{info, warn, Level};

#[derive(ClapParser)]
#[command(author, version, about = "Rule-driven dependency reduction over chunked sentences")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON rule table into a binary archive
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Reduce chunked sentences, one per line (stdin when no file is given)
    Parse {
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Rule table: `.json` rule set or compiled archive (default: built-in English)
        #[arg(short, long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Maximum number of reduction passes
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        #[arg(short, long, value_enum, default_value_t = Format::Tree)]
        format: Format,

        /// Input is a JSON array of sentences, each an array of chunks
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in English rule table as JSON
    Rules,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Tree,
    Json,
    Dot,
}

#[derive(Serialize)]
struct SentenceReport<'a> {
    forest: &'a [Node],
    passes: usize,
    fixed_point: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Compile { input, output } => compile(&input, &output),
        Command::Parse {
            input,
            rules,
            limit,
            format,
            json,
        } => {
            let rules = load_rules(rules.as_deref())?;
            let text = read_input(input.as_deref())?;
            let sentences = if json {
                serde_json::from_str::<Vec<Vec<Chunk>>>(&text).context("input is not a JSON array of sentences")?
            } else {
                read_sentences(&text)?
            };
            print!("{}", parse(Parser::new(rules, Default::default()), sentences, limit, format)?);
            Ok(())
        }
        Command::Rules => {
            println!("{}", serde_json::to_string_pretty(&RuleTable::english().to_rule_set())?);
            Ok(())
        }
    }
}

fn compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    info!(input = %input.display(), "reading rule set");
    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let set: RuleSet = serde_json::from_str(&text).context("rule set is not valid JSON")?;

    info!(version = set.version, rules = set.rules.len(), "compiling");
    let table = RuleTable::from_rule_set(set)?;
    let bytes = table.to_archive()?;

    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    println!("Compiled {} rules into {}", table.len(), output.display());
    Ok(())
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<RuleTable> {
    let Some(path) = path else {
        return Ok(RuleTable::english());
    };

    let table = if path.extension().is_some_and(|ext| ext == "json") {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        RuleTable::from_rule_set(serde_json::from_str(&text)?)?
    } else {
        RuleTable::from_archive(&fs::read(path).with_context(|| format!("reading {}", path.display()))?)?
    };
    info!(path = %path.display(), rules = table.len(), "rule table loaded");
    Ok(table)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// One sentence per line; blank lines and `#` comments are skipped.
fn read_sentences(text: &str) -> anyhow::Result<Vec<Vec<Chunk>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(number, line)| parse_notation(line).with_context(|| format!("line {}", number + 1)))
        .collect()
}

fn parse(parser: Parser, sentences: Vec<Vec<Chunk>>, limit: usize, format: Format) -> anyhow::Result<String> {
    let mut out = String::new();

    for chunks in sentences {
        let parse = parser.parse(chunks, limit);
        for violation in validate_tree(&parse.forest) {
            warn!(%violation, "reduced forest is malformed");
        }

        match format {
            Format::Tree => {
                out.push_str(&render_tree(&parse.forest));
                out.push('\n');
            }
            Format::Json => {
                let report = SentenceReport {
                    forest: &parse.forest,
                    passes: parse.stats.passes,
                    fixed_point: parse.stats.fixed_point,
                };
                out.push_str(&serde_json::to_string(&report)?);
                out.push('\n');
            }
            Format::Dot => out.push_str(&DependencyGraph::from_forest(&parse.forest).to_dot()),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let text = "# corpus\n\nNP[NN](dogs) VP[VBP](bark)\n   \nVP[VB](go)\n";
        let sentences = read_sentences(text).expect("valid input");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].len(), 2);
    }

    #[test]
    fn test_bad_line_is_reported_by_number() {
        let err = read_sentences("NP[NN](dogs)\nNP[NN](dogs\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2");
    }

    #[test]
    fn test_json_output_has_forest_and_stats() {
        let sentences = read_sentences("NP[NN](dogs) VP[VBP](bark)").expect("valid input");
        let out = parse(Parser::english(), sentences, DEFAULT_LIMIT, Format::Json).expect("parse");

        let value: serde_json::Value = serde_json::from_str(out.trim()).expect("json");
        assert_eq!(value["forest"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["forest"][0]["label"], "ROOT");
        assert_eq!(value["forest"][0]["left"][0]["label"], "nsubj");
        assert_eq!(value["passes"], 1);
    }

    #[test]
    fn test_compiled_rules_load_back() {
        let dir = std::env::temp_dir().join(format!("stemma-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let json = dir.join("rules.json");
        let bin = dir.join("rules.bin");

        fs::write(&json, serde_json::to_string(&RuleTable::english().to_rule_set()).expect("json")).expect("write");
        compile(&json, &bin).expect("compile");

        assert_eq!(load_rules(Some(&bin)).expect("archive"), RuleTable::english());
        assert_eq!(load_rules(Some(&json)).expect("json"), RuleTable::english());
        fs::remove_dir_all(&dir).ok();
    }
}
