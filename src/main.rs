//! Command line front end for saved annotation documents.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use polyedit::config::EditorConfig;

    let config = EditorConfig::load_from_default_path().unwrap_or_default();

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = cli::run(&config, &args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use polyedit::config::EditorConfig;
    use polyedit::format::{DocumentStore, JsonDirectory, PersistenceError, to_text};

    const USAGE: &str = "\
Usage:
  polyedit list [DIR]         List saved documents
  polyedit dump [DIR] NAME    Print the text dump of one document
  polyedit config             Print the effective configuration

DIR defaults to the configured json directory.";

    #[derive(Debug, thiserror::Error)]
    pub enum CliError {
        #[error("{0}")]
        Usage(&'static str),
        #[error(transparent)]
        Persistence(#[from] PersistenceError),
        #[error("No document named '{0}'")]
        NotFound(String),
        #[error("Failed to serialize configuration: {0}")]
        Config(#[from] serde_json::Error),
    }

    pub fn run(config: &EditorConfig, args: &[String]) -> Result<(), CliError> {
        let dir = |arg: Option<&String>| -> PathBuf {
            arg.map(PathBuf::from)
                .unwrap_or_else(|| config.persistence.json_dir.clone())
        };

        match args.first().map(String::as_str) {
            Some("list") => {
                let store = JsonDirectory::open(dir(args.get(1)))?;
                log::debug!("Listing documents in {:?}", store.dir());
                for name in store.list_all()? {
                    println!("{}", name);
                }
                Ok(())
            }
            Some("dump") => {
                let (dir_arg, name) = match args.len() {
                    2 => (None, &args[1]),
                    3 => (args.get(1), &args[2]),
                    _ => return Err(CliError::Usage(USAGE)),
                };
                let store = JsonDirectory::open(dir(dir_arg))?;
                let document = store
                    .fetch(name)?
                    .ok_or_else(|| CliError::NotFound(name.clone()))?;
                print!("{}", to_text(&document));
                Ok(())
            }
            Some("config") => {
                println!("{}", config.to_json()?);
                Ok(())
            }
            _ => Err(CliError::Usage(USAGE)),
        }
    }
}
