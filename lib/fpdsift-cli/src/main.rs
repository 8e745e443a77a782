#![allow(missing_docs)]
use std::ffi::{OsStr, OsString};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fpdsift_core::{
    DocumentFormat, FpdConfig, FpdValidator, OptOutSignal, RedactionSource, Schema, TracingSink,
    ortb2,
};
use tracing::{Level, debug, warn};

fn main() -> Result<()> {
    let args = CliArgs::parse().context("parsing arguments")?;

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();
    if !args.remaining.is_empty() {
        warn!(remaining = ?args.remaining, "Warning: unused arguments left");
    }

    let loaded = args.schema.as_deref().map(load::<Schema>).transpose()?;
    let schema = match &loaded {
        Some(schema) => schema,
        None => ortb2::schema(),
    };
    let file_config = args.config.as_deref().map(load::<FpdConfig>).transpose()?;
    let validator = FpdValidator::new(schema, args.merge_config(file_config));
    debug!(config = ?validator.config(), custom_schema = loaded.is_some(), "starting");

    let (input, input_format) = read_input(args.input.as_deref())?;
    let data = input_format
        .parse::<serde_json::Value>(&input)
        .context("reading first-party data")?;

    let filtered = validator
        .process_value(&data, &args.redaction(), &mut TracingSink)
        .context("filtering first-party data")?;

    let rendered = args
        .format
        .render(&filtered)
        .context("rendering filtered data")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("writing output")?;

    Ok(())
}

#[derive(Debug)]
struct CliArgs {
    schema: Option<PathBuf>,
    config: Option<PathBuf>,
    skip_validations: bool,
    max_depth: Option<usize>,
    opt_out: bool,
    cookie: Option<String>,
    format: DocumentFormat,
    verbose: bool,
    input: Option<PathBuf>,
    remaining: Vec<OsString>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        Self::from_arguments(pico_args::Arguments::from_env())
    }

    fn from_arguments(mut pargs: pico_args::Arguments) -> Result<Self> {
        let skip_validations = pargs.contains("--skip-validations");
        let opt_out = pargs.contains("--opt-out");
        let verbose = pargs.contains(["-v", "--verbose"]);

        let schema = pargs
            .opt_value_from_os_str("--schema", parse_path)
            .context("parsing schema argument")?;
        let config = pargs
            .opt_value_from_os_str("--config", parse_path)
            .context("parsing config argument")?;
        let max_depth = pargs
            .opt_value_from_str("--max-depth")
            .context("parsing max depth argument")?;
        let cookie = pargs
            .opt_value_from_str("--cookie")
            .context("parsing cookie argument")?;
        let format = pargs
            .opt_value_from_str(["-f", "--format"])
            .context("parsing format argument")?;
        let input = pargs
            .opt_free_from_os_str(parse_path)
            .context("parsing input argument")?;

        Ok(Self {
            schema,
            config,
            skip_validations,
            max_depth,
            opt_out,
            cookie,
            format: format.unwrap_or_default(),
            verbose,
            input,
            remaining: pargs.finish(),
        })
    }

    /// The configuration read from file, if any, overridden by the flags.
    fn merge_config(&self, file_config: Option<FpdConfig>) -> FpdConfig {
        let mut config = file_config.unwrap_or_default();
        if self.skip_validations {
            config = config.with_skip_validations(true);
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        config
    }

    /// Opted out with `--opt-out`, or through the `--cookie` header.
    fn redaction(&self) -> impl RedactionSource + use<> {
        let signal = self
            .cookie
            .as_deref()
            .map(OptOutSignal::from_cookie_header)
            .unwrap_or_default();
        let opt_out = self.opt_out;
        move || opt_out || signal.is_opted_out()
    }
}

#[allow(clippy::unnecessary_wraps)]
fn parse_path(value: &OsStr) -> Result<PathBuf, &'static str> {
    Ok(PathBuf::from(value))
}

fn load<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DocumentFormat::from_path(path)
        .parse(&content)
        .with_context(|| format!("parsing {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<(String, DocumentFormat)> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok((content, DocumentFormat::from_path(path)))
        }
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("reading standard input")?;
            Ok((content, DocumentFormat::Json))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use fpdsift_core::Diagnostic;
    use serde_json::{Value, json};

    use super::*;

    fn args(values: &[&str]) -> CliArgs {
        let values = values.iter().map(OsString::from).collect();
        let_assert!(Ok(args) = CliArgs::from_arguments(pico_args::Arguments::from_vec(values)));
        args
    }

    fn file_config(yaml: &str) -> FpdConfig {
        let_assert!(Ok(config) = DocumentFormat::Yaml.parse::<FpdConfig>(yaml));
        config
    }

    fn filter(args: &CliArgs, data: &Value) -> Value {
        let validator = FpdValidator::ortb2(args.merge_config(None));
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let output = validator.process_value(data, &args.redaction(), &mut diagnostics);
        let_assert!(Ok(output) = output);
        output
    }

    #[test]
    fn should_override_skip_validations_from_file() {
        let file = file_config("skipValidations: false\nmaxDepth: 12\n");

        let config = args(&["--skip-validations"]).merge_config(Some(file));

        check!(config.skip_validations);
        check!(config.max_depth == 12);
    }

    #[test]
    fn should_override_max_depth_from_file() {
        let file = file_config("skipValidations: true\nmaxDepth: 12\n");

        let config = args(&["--max-depth", "3"]).merge_config(Some(file));

        check!(config == FpdConfig::default().with_skip_validations(true).with_max_depth(3));
    }

    #[test]
    fn should_keep_file_config_without_flags() {
        let file = file_config("maxDepth: 5\n");

        check!(args(&[]).merge_config(Some(file)) == file);
        check!(args(&[]).merge_config(None) == FpdConfig::default());
    }

    #[test]
    fn should_redact_from_cookie_header() {
        let data = json!({"global": {"user": {"yob": 1985, "keywords": "rust"}}});
        let args = args(&["--cookie", "sid=abc; _pubcid_optout=1"]);

        check!(!args.opt_out);
        check!(filter(&args, &data)["global"] == json!({"user": {"keywords": "rust"}}));
    }

    #[test]
    fn should_redact_with_opt_out_flag() {
        let data = json!({"global": {"user": {"yob": 1985, "keywords": "rust"}}});

        let redacted = filter(&args(&["--opt-out", "--cookie", "sid=abc"]), &data);
        let kept = filter(&args(&["--cookie", "sid=abc"]), &data);

        check!(redacted["global"] == json!({"user": {"keywords": "rust"}}));
        check!(kept["global"] == data["global"]);
    }

    #[test]
    fn should_render_yaml_output() {
        let args = args(&["-f", "yaml", "fpd.json"]);
        check!(args.format == DocumentFormat::Yaml);
        check!(args.input == Some(PathBuf::from("fpd.json")));

        let_assert!(Ok(rendered) = args.format.render(&json!({"site": {"name": "example"}})));
        let_assert!(Ok(back) = DocumentFormat::Yaml.parse::<Value>(&rendered));
        check!(back == json!({"site": {"name": "example"}}));
    }
}
