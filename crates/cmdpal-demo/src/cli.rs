#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo host.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `CMDPAL_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
cmdpal demo: a text pad with three command palettes

USAGE:
    cmdpal-demo [OPTIONS]

OPTIONS:
    --root=DIR           Directory listed by Choose file (default: .)
    --depth=N            Directory levels read below the root (default: 3)
    --log=PATH           Write logs to PATH (default: no logging)
    --log-json           Write logs as JSON lines
    --no-alt-screen      Draw on the main screen instead of the alternate one
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Ctrl+P              Choose quote
    Ctrl+Shift+P        Choose file
    Ctrl+Alt+P          Choose commands
    Ctrl+Z / Ctrl+Y     Undo / redo
    Ctrl+Q              Quit

    In a palette: type to filter, Up/Down to select, Enter to choose,
    Esc to close.

ENVIRONMENT VARIABLES:
    CMDPAL_DEMO_ROOT          Override --root
    CMDPAL_DEMO_DEPTH         Override --depth
    CMDPAL_DEMO_LOG           Override --log
    CMDPAL_DEMO_LOG_JSON      Set to 1 for --log-json
    CMDPAL_LOG                Log filter directive (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Directory listed by the file palette.
    pub root: PathBuf,
    /// Directory levels read below the root.
    pub depth: usize,
    /// Log file, if logging is enabled.
    pub log: Option<PathBuf>,
    /// Emit JSON log lines.
    pub log_json: bool,
    /// Use the alternate screen.
    pub alt_screen: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            depth: 3,
            log: None,
            log_json: false,
            alt_screen: true,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or bad input.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("cmdpal-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args`, reading overrides through `var`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending argument.
    pub fn parse_from<I, F>(args: I, var: F) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("CMDPAL_DEMO_ROOT") {
            opts.root = PathBuf::from(val);
        }
        if let Some(val) = var("CMDPAL_DEMO_DEPTH")
            && let Ok(n) = val.parse()
        {
            opts.depth = n;
        }
        if let Some(val) = var("CMDPAL_DEMO_LOG") {
            opts.log = Some(PathBuf::from(val));
        }
        if let Some(val) = var("CMDPAL_DEMO_LOG_JSON") {
            opts.log_json = matches!(val.as_str(), "1" | "true" | "yes");
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--log-json" => opts.log_json = true,
                "--no-alt-screen" => opts.alt_screen = false,
                other => {
                    if let Some(val) = other.strip_prefix("--root=") {
                        opts.root = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--depth=") {
                        opts.depth = val
                            .parse()
                            .map_err(|_| format!("Invalid --depth value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log = Some(PathBuf::from(val));
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Parsed, String> {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Opts::parse_from(args.iter().map(|s| (*s).to_string()), |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.root, PathBuf::from("."));
        assert_eq!(opts.depth, 3);
        assert_eq!(opts.log, None);
        assert!(!opts.log_json);
        assert!(opts.alt_screen);
    }

    #[test]
    fn flags_are_parsed() {
        let parsed = parse(
            &["--root=/tmp", "--depth=1", "--log=demo.log", "--log-json", "--no-alt-screen"],
            &[],
        );
        let Ok(Parsed::Run(opts)) = parsed else {
            panic!("unexpected {parsed:?}");
        };
        assert_eq!(opts.root, PathBuf::from("/tmp"));
        assert_eq!(opts.depth, 1);
        assert_eq!(opts.log, Some(PathBuf::from("demo.log")));
        assert!(opts.log_json);
        assert!(!opts.alt_screen);
    }

    #[test]
    fn flags_override_env() {
        let parsed = parse(
            &["--depth=5"],
            &[("CMDPAL_DEMO_DEPTH", "2"), ("CMDPAL_DEMO_ROOT", "/srv")],
        );
        let Ok(Parsed::Run(opts)) = parsed else {
            panic!("unexpected {parsed:?}");
        };
        assert_eq!(opts.depth, 5);
        assert_eq!(opts.root, PathBuf::from("/srv"));
    }

    #[test]
    fn bad_env_value_is_ignored() {
        let parsed = parse(&[], &[("CMDPAL_DEMO_DEPTH", "deep")]);
        assert_eq!(parsed, Ok(Parsed::Run(Opts::default())));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--help", "--bogus"], &[]), Ok(Parsed::Help));
        assert_eq!(parse(&["-V"], &[]), Ok(Parsed::Version));
    }

    #[test]
    fn errors_name_the_argument() {
        assert_eq!(
            parse(&["--depth=x"], &[]),
            Err("Invalid --depth value: x".to_string())
        );
        assert_eq!(
            parse(&["--frobnicate"], &[]),
            Err("Unknown argument: --frobnicate".to_string())
        );
    }

    #[test]
    fn help_text_lists_shortcuts() {
        assert!(HELP_TEXT.contains("Ctrl+Shift+P"));
        assert!(HELP_TEXT.contains("CMDPAL_DEMO_ROOT"));
        assert!(!VERSION.is_empty());
    }
}
