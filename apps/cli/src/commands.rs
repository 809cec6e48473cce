//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use pagebuilder_core::request::decode_template_properties;
use pagebuilder_core::{
    PageAssembler, PageModel, PropertyOptions, RenderContext, RenderOutcome, RequestInfo,
};
use pagebuilder_shared::{
    AppConfig, Preferences, RenderSettings, UnknownKeyPolicy, init_config, load_config,
};
use serde_json::{Map, Value};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PageBuilder: compose content fragments into a finished page.
#[derive(Parser)]
#[command(
    name = "pagebuilder",
    version,
    about = "Compose titles, content, navigation and breadcrumbs into a finished HTML page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render a page and write it to stdout.
    Render(RenderArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `render`.
#[derive(clap::Args)]
pub(crate) struct RenderArgs {
    /// JSON file with page properties (`-` for stdin). Takes precedence over form data.
    #[arg(short, long)]
    pub properties: Option<String>,

    /// Form-encoded request body carrying `templateProperties`.
    #[arg(long, env = "PAGEBUILDER_BODY")]
    pub body: Option<String>,

    /// Query string carrying `templateProperties`.
    #[arg(long, env = "QUERY_STRING")]
    pub query: Option<String>,

    /// Preference set before rendering (`key=value`, value parsed as JSON when possible).
    #[arg(long = "pref", value_name = "KEY=VALUE")]
    pub prefs: Vec<String>,

    /// Layout file overriding the configured one.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Script the page is rendered for; navigation discovery starts next to it.
    #[arg(long, env = "SCRIPT_FILENAME")]
    pub script: Option<PathBuf>,

    /// Request URI, used when no script is given.
    #[arg(long, env = "REQUEST_URI")]
    pub request_uri: Option<String>,

    /// Store the page instead of rendering it and print it as JSON.
    #[arg(long)]
    pub capture: bool,

    /// Reject unknown page properties.
    #[arg(long)]
    pub strict: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so rendered
/// pages on stdout stay clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagebuilder=info",
        1 => "pagebuilder=debug",
        _ => "pagebuilder=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let config = load_config()?;
    let output = render_page(args, &config)?;
    print!("{output}");
    Ok(())
}

/// Render per `args`: the page HTML, or the captured page as JSON.
fn render_page(args: RenderArgs, config: &AppConfig) -> Result<String> {
    let mut settings = RenderSettings::from(config);
    if let Some(layout) = args.layout {
        settings.layout_path = Some(layout);
    }
    if args.strict {
        settings.unknown_keys = UnknownKeyPolicy::Reject;
    }

    let properties = read_properties(
        args.properties.as_deref(),
        args.body.as_deref(),
        args.query.as_deref(),
    )?;
    let page = PageModel::from_properties(
        &properties,
        &Preferences::new(),
        &PropertyOptions::from(&settings),
    )?;

    let request = RequestInfo {
        script_filename: args.script,
        request_uri: args.request_uri,
    };
    let mut ctx = RenderContext::from_settings(request, &settings);
    for pref in &args.prefs {
        let (key, value) = parse_pref(pref)?;
        ctx.set_preference(key, value);
    }
    ctx.capture_mut().set_capture_mode(args.capture);

    let assembler = PageAssembler::from_settings(&settings)?;
    info!(request_id = %ctx.id(), "rendering page");

    match assembler.render(page, &mut ctx)? {
        RenderOutcome::Rendered(html) | RenderOutcome::Intercepted(html) => Ok(html),
        RenderOutcome::Captured(_) => {
            let captured = ctx
                .capture_mut()
                .get_stored(true)
                .ok_or_else(|| eyre!("capture mode produced no stored page"))?;
            Ok(format!("{}\n", serde_json::to_string_pretty(captured)?))
        }
    }
}

/// Page properties from a JSON file/stdin, or from form-encoded request data.
fn read_properties(
    path: Option<&str>,
    body: Option<&str>,
    query: Option<&str>,
) -> Result<Map<String, Value>> {
    let Some(path) = path else {
        return Ok(decode_template_properties(body, query)?);
    };

    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read properties from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {path}"))?
    };

    match serde_json::from_str::<Value>(&raw).wrap_err("properties are not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => Err(eyre!("properties must be a JSON object, got {other}")),
    }
}

/// Split `key=value`; the value is JSON when it parses, a string otherwise.
fn parse_pref(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| eyre!("preference `{raw}` is not of the form key=value"))?;
    if key.is_empty() {
        return Err(eyre!("preference `{raw}` has an empty key"));
    }
    let value =
        serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.into()));
    Ok((key.to_string(), value))
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pref_values_parse_as_json_or_string() {
        assert_eq!(
            parse_pref("localNavigation=false").unwrap(),
            ("localNavigation".to_string(), Value::Bool(false))
        );
        assert_eq!(
            parse_pref("Title=Late Title").unwrap(),
            ("Title".to_string(), Value::String("Late Title".into()))
        );
        assert_eq!(
            parse_pref("expr=a=b").unwrap(),
            ("expr".to_string(), Value::String("a=b".into()))
        );
    }

    #[test]
    fn malformed_prefs_are_rejected() {
        assert!(parse_pref("novalue").is_err());
        assert!(parse_pref("=x").is_err());
    }

    #[test]
    fn properties_fall_back_to_form_data() {
        let map = read_properties(
            None,
            None,
            Some("templateProperties=%7B%22title%22%3A%22Hi%22%7D"),
        )
        .unwrap();
        assert_eq!(map["title"], "Hi");
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pb-cli-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn render_args(argv: &[&str]) -> RenderArgs {
        let argv = ["pagebuilder", "render"].into_iter().chain(argv.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Render(args) => args,
            Command::Config { .. } => panic!("expected render"),
        }
    }

    fn write_page(dir: &std::path::Path) -> String {
        let path = dir.join("page.json");
        std::fs::write(
            &path,
            r#"{"title": "Visit Us", "content": "<p>Welcome</p>", "localNavigation": "<ul></ul>"}"#,
        )
        .unwrap();
        path.display().to_string()
    }

    #[test]
    fn render_with_capture_prints_stored_page() {
        let tmp = temp_dir("capture");
        let properties = write_page(&tmp);

        let output = render_page(
            render_args(&["--properties", &properties, "--capture"]),
            &AppConfig::default(),
        )
        .unwrap();
        let captured: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(captured["page"]["title"], "Visit Us");
        assert_eq!(captured["page"]["content"], "<p>Welcome</p>");
        assert!(captured["captured_at"].is_string());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn render_prefs_reach_the_page() {
        let tmp = temp_dir("prefs");
        let properties = write_page(&tmp);

        let output = render_page(
            render_args(&["--properties", &properties, "--pref", "Title=Late Title"]),
            &AppConfig::default(),
        )
        .unwrap();
        assert!(output.contains("Late Title"));
        assert!(!output.contains("Visit Us"));
        assert!(output.contains("<p>Welcome</p>"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "pagebuilder",
            "render",
            "--properties",
            "page.json",
            "--pref",
            "auxBox=true",
            "--capture",
        ])
        .unwrap();
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.properties.as_deref(), Some("page.json"));
                assert_eq!(args.prefs, vec!["auxBox=true"]);
                assert!(args.capture);
            }
            Command::Config { .. } => panic!("expected render"),
        }
    }
}
