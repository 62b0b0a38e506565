use gitparse::logging;
use gitparse::{AppResult, GitOutputParser, OutputKind, ParserConfig};
use log::LevelFilter;
use std::io::{self, Read};

const USAGE: &str = "usage: gitparse <status|diff|log|config|branch|tag|remote|ls-remote> \
                     [--config <path>] < captured-git-output";

fn main() {
    if let Err(e) = logging::init_logging(LevelFilter::Warn) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (kind, config_path) = match args.as_slice() {
        [kind] => (kind.as_str(), None),
        [kind, flag, path] if flag == "--config" => (kind.as_str(), Some(path.as_str())),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(kind, config_path) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(kind: &str, config_path: Option<&str>) -> AppResult<()> {
    let kind: OutputKind = kind.parse()?;

    let config = match config_path {
        Some(path) => ParserConfig::load_from(path)?,
        None => ParserConfig::load_or_default()?,
    };

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let parsed = GitOutputParser::new(config).parse_as(kind, &input)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);

    Ok(())
}
