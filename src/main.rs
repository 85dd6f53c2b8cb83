use docverify_lib::models::DEFAULT_DOCUMENT_TYPE;
use docverify_lib::services::verification::NoiseMode;
use docverify_lib::services::render_report;
use docverify_lib::{init_logging, AppConfig, ConfigStore, DocumentInput, DocumentVerifier};
use std::io::Read;
use std::path::PathBuf;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(p) => std::fs::read_to_string(p).map_err(|e| format!("Failed to read {}: {}", p, e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn config_store(config_dir: Option<String>) -> Option<ConfigStore> {
    config_dir
        .map(PathBuf::from)
        .or_else(ConfigStore::default_config_dir)
        .map(ConfigStore::new)
}

fn load_config(store: Option<&ConfigStore>) -> Result<AppConfig, String> {
    let mut config = match store {
        Some(store) => store.load()?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides();
    Ok(config)
}

/// Persist `--set-backend-url` / `--set-offline` into the config file.
/// Returns true when any setting was written.
fn persist_settings(store: &ConfigStore, args: &[String]) -> Result<bool, String> {
    let mut written = false;
    if let Some(url) = parse_arg_value(args, "--set-backend-url") {
        let url = url.trim();
        if url.is_empty() {
            return Err("--set-backend-url requires a non-empty URL".to_string());
        }
        store.set_backend_url(url)?;
        written = true;
    }
    if let Some(value) = parse_arg_value(args, "--set-offline") {
        let offline = match value.as_str() {
            "on" | "true" | "1" => true,
            "off" | "false" | "0" => false,
            other => return Err(format!("Invalid --set-offline value: {}", other)),
        };
        store.set_offline(offline)?;
        written = true;
    }
    Ok(written)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        eprintln!(
            "Usage:\n  docverify [--file <path>] [--type <document_type>] [--json] [--offline] [--report] [--seed <n>] [--config <dir>]\n  docverify [--config <dir>] [--set-backend-url <url>] [--set-offline on|off]\n\nNotes:\n  - Reads the document from stdin when --file is absent.\n  - --json treats the input as a request body: {{\"text\": ..., \"document_type\": ...}}.\n  - --offline skips the backend and scores locally.\n  - --seed makes local scoring reproducible.\n  - --set-backend-url / --set-offline update the saved config and exit."
        );
        return Ok(());
    }

    init_logging();

    let store = config_store(parse_arg_value(&args, "--config"));
    if has_flag(&args, "--set-backend-url") || has_flag(&args, "--set-offline") {
        let store = store.ok_or("No config directory available")?;
        if persist_settings(&store, &args)? {
            eprintln!("Saved config to {}", store.config_file().display());
        }
        return Ok(());
    }

    let mut config = load_config(store.as_ref())?;
    if has_flag(&args, "--offline") {
        config.backend.enabled = false;
    }
    if let Some(seed) = parse_arg_value(&args, "--seed") {
        let seed: u64 = seed
            .parse()
            .map_err(|_| format!("Invalid --seed value: {}", seed))?;
        config.scoring.noise = NoiseMode::Seeded { seed };
    }
    config.scoring.validate()?;

    let raw = read_input(parse_arg_value(&args, "--file").as_deref())?;
    let input = if has_flag(&args, "--json") {
        let body: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON request: {}", e))?;
        DocumentInput::from_json(&body).map_err(|e| e.to_string())?
    } else {
        let document_type =
            parse_arg_value(&args, "--type").unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_string());
        DocumentInput::new(raw, &document_type)
    };

    let verifier = DocumentVerifier::from_config(&config);
    let result = verifier.verify_input(&input).await;

    if has_flag(&args, "--report") {
        println!("{}", render_report(&result, &input.document_type));
    } else {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize result: {}", e))?;
        println!("{}", json);
    }

    Ok(())
}
