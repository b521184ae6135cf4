//! Minimal CLI: JSON (file | stdin | URL | request document) → TypeScript declarations
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::fetch::{FetchConfig, HttpMethod, MAX_RESPONSE_BYTES};
use crate::inference::{DateStrings, Options};
use crate::request::{load_request, GenerateRequest};
use crate::service::{self, GenerateReport};
use crate::{naming, save, DEFAULT_ROOT_NAME};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer TypeScript declarations from a single JSON value
#[derive(Parser, Debug)]
#[command(name = "json-tsgen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// describe a JSON file (or stdin)
    Generate(GenerateOut),
    /// fetch a URL and describe its response body
    Fetch(FetchOut),
    /// run a JSON request document and print the report
    Request(RequestOut),
    /// describe many JSON files independently
    Batch(BatchOut),
    /// show the platform, home directory and default save location
    Info,
}

#[derive(Args, Debug, Clone)]
struct InferenceSettings {
    /// top-level TypeScript type name
    #[arg(long)]
    root_type: Option<String>,

    /// JSON Pointer to select a subnode before inference (e.g. /data/items)
    #[arg(long)]
    json_pointer: Option<String>,

    /// type ISO-8601 date-time strings as `Date` instead of `string`
    #[arg(long, default_value_t = false)]
    date_type: bool,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    /// input JSON file, or '-' for stdin
    #[arg(long, short, default_value = "-")]
    input: String,

    #[command(flatten)]
    settings: InferenceSettings,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct FetchOut {
    /// http(s) URL returning JSON
    url: String,

    #[arg(long, short = 'X', value_enum, ignore_case = true, default_value_t = HttpMethod::Get)]
    method: HttpMethod,

    /// extra request header, "Name: value" (repeatable)
    #[arg(long = "header", short = 'H')]
    headers: Vec<String>,

    /// request body
    #[arg(long)]
    body: Option<String>,

    #[command(flatten)]
    settings: InferenceSettings,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// response size ceiling in bytes
    #[arg(long, default_value_t = MAX_RESPONSE_BYTES)]
    max_bytes: u64,

    /// permit localhost / private network targets
    #[arg(long)]
    allow_local: bool,

    /// also write the result to a .ts file
    #[arg(long)]
    save: bool,

    /// file name for --save (suggested from the URL if omitted)
    #[arg(long)]
    file_name: Option<String>,

    /// directory for --save (defaults to ~/quick-type-types)
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// print the JSON report instead of the declarations
    #[arg(long)]
    report: bool,
}

#[derive(clap::Parser, Debug)]
struct RequestOut {
    /// request document (JSON)
    path: PathBuf,

    /// permit localhost / private network targets
    #[arg(long)]
    allow_local: bool,

    /// type ISO-8601 date-time strings as `Date` instead of `string`
    #[arg(long)]
    date_type: bool,
}

#[derive(clap::Parser, Debug)]
struct BatchOut {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// write `<Name>Types.ts` per input here (stdout if omitted)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// type ISO-8601 date-time strings as `Date` instead of `string`
    #[arg(long)]
    date_type: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

fn options(date_type: bool) -> Options {
    let date_strings = if date_type { DateStrings::Date } else { DateStrings::Plain };
    Options { date_strings }
}

impl InferenceSettings {
    fn options(&self) -> Options {
        options(self.date_type)
    }

    /// `--root-type ""` counts as not given.
    fn root_name(&self) -> &str {
        self.root_type
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_ROOT_NAME)
    }
}

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when set and valid, `info` otherwise.
pub fn log_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                target.run()
            }
            Command::Fetch(target) => target.run(),
            Command::Request(target) => target.run(),
            Command::Batch(target) => target.run(),
            Command::Info => print_system_info(),
        }
    }
}

impl GenerateOut {
    fn run(&self) -> Result<()> {
        let source = read_input(&self.input)?;
        let value: serde_json::Value = serde_json::from_str(&source)
            .with_context(|| format!("failed to parse JSON from {}", self.input))?;
        let value = service::select(&value, self.settings.json_pointer.as_deref())?;
        let types = crate::generate_with(value, self.settings.root_name(), &self.settings.options())?;
        emit(&types, self.out.as_deref())
    }
}

impl FetchOut {
    fn run(&self) -> Result<()> {
        let request = GenerateRequest {
            url: self.url.clone(),
            method: self.method,
            headers: parse_headers(&self.headers)?,
            body: self.body.clone(),
            root_type_name: self.settings.root_type.clone(),
            save_to_file: self.save,
            file_name: self.file_name.clone(),
            save_path: self.save_path.clone(),
            json_pointer: self.settings.json_pointer.clone(),
        };
        let config = FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_response_bytes: self.max_bytes,
            allow_local: self.allow_local,
            ..FetchConfig::default()
        };
        let report = service::process_request(&request, &config, &self.settings.options());
        if self.report {
            print_report(&report)?;
        } else if let Some(types) = &report.types {
            print!("{types}");
        }
        finish(&report)
    }
}

impl RequestOut {
    fn run(&self) -> Result<()> {
        let request = load_request(&self.path)
            .with_context(|| format!("failed to load request document {}", self.path.display()))?;
        let config = FetchConfig { allow_local: self.allow_local, ..FetchConfig::default() };
        let report = service::process_request(&request, &config, &options(self.date_type));
        print_report(&report)?;
        finish(&report)
    }
}

impl BatchOut {
    fn run(&self) -> Result<()> {
        let paths = resolve_file_path_patterns(&self.input)?;
        let options = options(self.date_type);

        // every file gets its own inference; nothing is shared between them
        let results: Vec<(PathBuf, String, Result<String>)> = paths
            .par_iter()
            .map(|path| {
                let name = batch_type_name(path);
                let types = generate_file(path, &name, &options);
                (path.clone(), name, types)
            })
            .collect();

        let mut failed = 0usize;
        for (path, name, types) in results {
            match types {
                Ok(types) => match self.out_dir.as_ref() {
                    Some(dir) => {
                        let target = dir.join(format!("{name}Types.ts"));
                        emit(&types, Some(target.as_path()))?;
                    }
                    None => {
                        println!("// {}", path.display());
                        print!("{types}");
                    }
                },
                Err(error) => {
                    failed += 1;
                    eprintln!("{} {}: {error:#}", "failed".red().bold(), path.display());
                }
            }
        }
        if failed > 0 {
            bail!("{failed} of {} inputs failed", paths.len());
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source).context("failed to read stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn emit(types: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, types).with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "wrote declarations");
            eprintln!("{} {}", "wrote".green().bold(), out.display());
        }
        None => print!("{types}"),
    }
    Ok(())
}

fn print_report(report: &GenerateReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_system_info() -> Result<()> {
    let info = save::system_info()?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    if !info.is_writable {
        eprintln!("{} {}", "not writable".yellow().bold(), info.home_dir.display());
    }
    Ok(())
}

fn finish(report: &GenerateReport) -> Result<()> {
    if let Some(info) = &report.file_info {
        match (&info.file_path, &info.error) {
            (Some(path), _) => eprintln!("{} {}", "saved".green().bold(), path.display()),
            (None, Some(error)) => eprintln!("{} {}: {error}", "not saved".yellow().bold(), info.file_name),
            (None, None) => {}
        }
    }
    match &report.error {
        Some(error) if !report.success => bail!("{error}"),
        _ => Ok(()),
    }
}

/// `"Authorization: Bearer x"` → (`Authorization`, `Bearer x`)
fn parse_headers(raw: &[String]) -> Result<indexmap::IndexMap<String, String>> {
    raw.iter()
        .map(|line| match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("header must look like 'Name: value', got {line:?}"),
        })
        .collect()
}

fn batch_type_name(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    naming::root_type_name(&stem)
}

fn generate_file(path: &Path, root_name: &str, options: &Options) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse JSON source file ({})", path.display()))?;
    Ok(crate::generate_with(&value, root_name, options)?)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_parse_name_value_pairs() {
        let headers = parse_headers(&["Authorization: Bearer a:b".into(), " X-Id :7".into()]).unwrap();
        assert_eq!(headers["Authorization"], "Bearer a:b");
        assert_eq!(headers["X-Id"], "7");
        assert!(parse_headers(&["no-colon".into()]).is_err());
        assert!(parse_headers(&[": empty".into()]).is_err());
    }

    #[test]
    fn batch_names_come_from_file_stems() {
        assert_eq!(batch_type_name(Path::new("data/user-list.json")), "UserList");
        assert_eq!(batch_type_name(Path::new("orders.json")), "Orders");
    }

    #[test]
    fn glob_patterns_expand_and_must_match() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("b.json"), "[]").unwrap();
        let pattern = format!("{}/*.json", tmp.path().display());
        let mut paths = resolve_file_path_patterns([pattern.as_str(), "literal.json"]).unwrap();
        paths.sort();
        assert_eq!(paths.len(), 3);

        let none = format!("{}/*.yaml", tmp.path().display());
        assert!(resolve_file_path_patterns([none.as_str()]).is_err());
    }

    #[test]
    fn generate_file_describes_a_document() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("orders.json");
        std::fs::write(&path, r#"{"id": 7, "lines": [{"sku": "a"}]}"#).unwrap();
        let types = generate_file(&path, "Orders", &Options::default()).unwrap();
        assert!(types.contains("interface OrdersLinesItem {"));
        assert!(types.contains("export type Orders = Orders;"));
    }

    #[test]
    fn cli_parses_fetch_flags() {
        let cli = CommandLineInterface::try_parse_from([
            "json-tsgen", "fetch", "https://x.dev/users", "-X", "post", "-H", "A: 1", "--save", "--date-type",
        ])
        .unwrap();
        match cli.cmd {
            Command::Fetch(f) => {
                assert_eq!(f.method, HttpMethod::Post);
                assert_eq!(f.headers, ["A: 1"]);
                assert!(f.save);
                assert!(f.settings.date_type);
                assert_eq!(f.max_bytes, MAX_RESPONSE_BYTES);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn method_flag_ignores_case() {
        for raw in ["POST", "post", "Post"] {
            let cli = CommandLineInterface::try_parse_from(["json-tsgen", "fetch", "https://x.dev/a", "-X", raw]).unwrap();
            let Command::Fetch(f) = cli.cmd else { panic!("expected fetch") };
            assert_eq!(f.method, HttpMethod::Post);
        }
    }

    #[test]
    fn blank_root_type_uses_default() {
        let cli = CommandLineInterface::try_parse_from(["json-tsgen", "generate", "--root-type", " "]).unwrap();
        let Command::Generate(g) = cli.cmd else { panic!("expected generate") };
        assert_eq!(g.settings.root_name(), DEFAULT_ROOT_NAME);

        let cli = CommandLineInterface::try_parse_from(["json-tsgen", "generate", "--root-type", "Users"]).unwrap();
        let Command::Generate(g) = cli.cmd else { panic!("expected generate") };
        assert_eq!(g.settings.root_name(), "Users");
    }

    #[test]
    fn log_filter_respects_bare_levels() {
        use tracing::level_filters::LevelFilter;
        assert_eq!(filter_from(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(filter_from(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(filter_from(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn info_subcommand_parses() {
        let cli = CommandLineInterface::try_parse_from(["json-tsgen", "info"]).unwrap();
        assert!(matches!(cli.cmd, Command::Info));
    }
}
