use std::fs;

use reqwest::Url;

use super::Context;
use crate::cli::commands::InitArgs;
use crate::io::config_io;

const CONFIG_TOML_TEMPLATE: &str = r##"# tally configuration

[remote]
# Task endpoint. The client calls /csrf/, /todos/ and /todos/create/ under it.
base_url = ""
# Request timeout in seconds. Leave unset to wait until the server answers.
# timeout_secs = 30

[history]
# How many fetched snapshots to keep for undo (minimum 2)
depth = 2

[log]
# trace, debug, info, warn or error. RUST_LOG overrides per module.
level = "info"

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# show_key_hints = true
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
# green = "#44FF88"
# red = "#FF4444"
# yellow = "#FFD700"
"##;

/// Accept only absolute http(s) URLs
fn validate_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| format!("invalid url \"{}\": {}", url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!(
            "unsupported url scheme \"{}\" (expected http or https)",
            other
        )),
    }
}

pub fn cmd_init(args: InitArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    validate_url(&args.url)?;

    let path = &ctx.config_path;
    let created = !path.exists();
    if created {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        config_io::atomic_write(path, CONFIG_TOML_TEMPLATE.as_bytes())?;
    }

    // Existing files keep their comments and layout
    let mut doc = config_io::read_config_doc(path)?;
    config_io::set_base_url(&mut doc, &args.url);
    if let Some(secs) = args.timeout {
        config_io::set_timeout(&mut doc, secs);
    }
    config_io::write_config_doc(path, &doc)?;

    if created {
        println!("created {}", path.display());
    } else {
        println!("updated {}", path.display());
    }
    println!("remote: {}", args.url);
    Ok(())
}
