use std::{env, fs, path::PathBuf, process};

use anyhow::{Context, Result};

use spamscope::{
    config,
    infrastructure::{directories, logging},
    SpamScopeApp,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config)?;
    logging::init_tracing(&config, &paths)?;

    let mut args = env::args().skip(1);
    let Some(file) = args.next() else {
        eprintln!("usage: spamscope <messages.txt|messages.csv> [user-id]");
        process::exit(2);
    };
    let user_id = args.next();

    let app = SpamScopeApp::initialize(&config, &paths)?;

    let path = PathBuf::from(&file);
    let content = fs::read(&path).with_context(|| format!("failed to read {file}"))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file.as_str());

    let receipt = app.submit(&content, filename, user_id.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
