use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::{
    paginate, remove_duplicates, Document, DocumentStatus, ExecutionMode, InvertedIndex,
    RequestQueue, SearchConfig, StopWords,
};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: i32,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Query an in-memory TF-IDF index built from JSON/JSONL documents", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub corpus: CorpusArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct CorpusArgs {
    /// Input path (file or directory)
    #[arg(long)]
    pub input: String,
    /// Space separated stop words
    #[arg(long, default_value = "")]
    pub stop_words: String,
    /// Add the built-in English stop words
    #[arg(long, default_value_t = false)]
    pub english_stop_words: bool,
    /// JSON file with search settings (`parallel_workers`, `max_results`, `relevance_epsilon`)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Worker threads for parallel evaluation, overrides the config file
    #[arg(long, env = "SEARCH_WORKERS")]
    pub workers: Option<usize>,
}

/// One query's results as printed by `search --json`.
#[derive(Debug, Serialize)]
pub struct QueryResults<'a> {
    pub query: &'a str,
    pub documents: &'a [Document],
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the top documents for each query
    Search {
        /// Raw query, may be repeated
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
        /// Only return documents with this status
        #[arg(long, value_parser = parse_status, default_value = "actual")]
        status: DocumentStatus,
        /// Evaluate on the worker pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Results per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Print one JSON object per query instead of pages
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the query words found in one document
    Match {
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: i32,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Remove documents whose word sets repeat an earlier document
    Dedup,
}

fn parse_status(raw: &str) -> std::result::Result<DocumentStatus, String> {
    match raw.to_ascii_lowercase().as_str() {
        "actual" => Ok(DocumentStatus::Actual),
        "irrelevant" => Ok(DocumentStatus::Irrelevant),
        "banned" => Ok(DocumentStatus::Banned),
        "removed" => Ok(DocumentStatus::Removed),
        other => Err(format!("unknown status {other:?}")),
    }
}

/// Collect `.json`/`.jsonl` files under `input` (or `input` itself).
pub fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

pub fn load_docs(input: &Path) -> Result<Vec<InputDoc>> {
    let mut docs = Vec::new();
    for file in input_files(input) {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), n + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => {}
    }
    Ok(())
}

pub fn load_config(path: &Path) -> Result<SearchConfig> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("open config {}", path.display()))?,
    );
    serde_json::from_reader(reader).with_context(|| format!("parse config {}", path.display()))
}

pub fn build_index(args: &CorpusArgs) -> Result<InvertedIndex> {
    let mut stop_words = StopWords::from_text(&args.stop_words)?;
    if args.english_stop_words {
        stop_words = stop_words.merge(StopWords::english());
    }
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SearchConfig::default(),
    };
    if let Some(workers) = args.workers {
        config = config.with_parallel_workers(workers);
    }
    let mut index = InvertedIndex::with_config(stop_words, config)?;

    let docs = load_docs(Path::new(&args.input))?;
    for doc in &docs {
        index
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("document {}", doc.id))?;
    }
    tracing::info!(num_docs = index.document_count(), input = %args.input, "corpus loaded");
    Ok(index)
}

/// Execute `cli`, writing human readable output to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let mut index = build_index(&cli.corpus)?;

    match cli.command {
        Commands::Search { queries, status, parallel, page_size, json } => {
            let mode = if parallel { ExecutionMode::Parallel } else { ExecutionMode::Sequential };
            let with_status =
                move |_: i32, document_status: DocumentStatus, _: i32| document_status == status;
            let mut requests = RequestQueue::new(&index);
            for query in &queries {
                let found = requests.add_find_request_with(mode, query, with_status)?;
                if json {
                    let line = QueryResults { query, documents: &found };
                    writeln!(out, "{}", serde_json::to_string(&line)?)?;
                    continue;
                }
                writeln!(out, "Query: {query}")?;
                for (n, page) in paginate(&found, page_size)?.iter().enumerate() {
                    writeln!(out, "Page {}: {page}", n + 1)?;
                }
            }
            writeln!(out, "Empty results: {}", requests.no_result_requests())?;
        }
        Commands::Match { query, id, parallel } => {
            let (words, status) = if parallel {
                index.par_match_document(&query, id)?
            } else {
                index.match_document(&query, id)?
            };
            writeln!(out, "{{ document_id = {id}, status = {status:?}, words = {} }}", words.join(" "))?;
        }
        Commands::Dedup => {
            let removed = remove_duplicates(&mut index);
            tracing::info!(removed = removed.len(), "duplicates removed");
            for id in &removed {
                writeln!(out, "Found duplicate document id {id}")?;
            }
            writeln!(out, "Documents left: {}", index.document_count())?;
        }
    }
    Ok(())
}
