//! Command-line driver: argument definitions and the two commands.
//!
//! ```text
//! differentiator --eval "(x + 5) * (y - 3)" x=2 y=4
//! differentiator --diff "x^3 + 3*x + 5" --by x
//! differentiator --complex --eval "(x + y) * exp(z)" x=1+2i y=3+4i z=0+3.141592653589793i
//! ```
//! `run` returns the single line to print, main decides on the exit status.

use crate::Utils::engine_config::EngineConfig;
use crate::Utils::logger::{init_logger, parse_level};
use crate::symbolic::symbolic_engine::{Bindings, Expression};
use crate::symbolic::symbolic_engine_derivatives::PowerRule;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_traits::Scalar;
use crate::symbolic::utils::is_identifier;
use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use itertools::Itertools;
use log::{info, warn};
use num_complex::Complex;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "differentiator",
    version,
    about = "Evaluate or differentiate an algebraic expression",
    after_help = "Supported syntax: numbers, variables, + - * / ^, sin() cos() ln() exp(), parentheses"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["eval", "diff"])))]
pub struct Cli {
    /// Evaluate EXPR, every variable must be bound with NAME=VALUE
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    pub eval: Option<String>,

    /// Differentiate EXPR symbolically and print the derivative
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true, requires = "by")]
    pub diff: Option<String>,

    /// Variable to differentiate by
    #[arg(long, value_name = "VAR", requires = "diff")]
    pub by: Option<String>,

    /// Order of the derivative
    #[arg(long, default_value_t = 1)]
    pub order: usize,

    /// How powers are differentiated: textual or general
    #[arg(long, value_name = "RULE")]
    pub power_rule: Option<PowerRule>,

    /// Work over complex numbers, values like 1+2i
    #[arg(long)]
    pub complex: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Variable bindings for --eval
    #[arg(value_name = "NAME=VALUE", requires = "eval", conflicts_with = "diff")]
    pub bindings: Vec<String>,
}

impl Cli {
    /// configuration file values overridden by the flags given on the command line
    pub fn resolve_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.log_level = parse_level(level)?;
        }
        if let Some(rule) = self.power_rule {
            config.power_rule = rule;
        }
        if self.complex {
            config.complex = true;
        }
        Ok(config)
    }
}

pub fn run(cli: &Cli) -> Result<String> {
    let config = cli.resolve_config()?;
    init_logger(config.log_level, config.log_file.as_deref())?;
    info!("differentiator started with {:?}", config);
    if config.complex {
        execute::<Complex<f64>>(cli, &config)
    } else {
        execute::<f64>(cli, &config)
    }
}

fn execute<T: Scalar>(cli: &Cli, config: &EngineConfig) -> Result<String> {
    match (&cli.eval, &cli.diff) {
        (Some(text), None) => evaluate_command::<T>(text, &cli.bindings),
        (None, Some(_)) if !cli.bindings.is_empty() => {
            bail!(
                "bindings are only accepted with --eval, got {}",
                cli.bindings.iter().join(" ")
            )
        }
        (None, Some(text)) => {
            let var = cli.by.as_deref().context("--diff requires --by")?;
            differentiate_command::<T>(text, var, cli.order, config.power_rule)
        }
        _ => bail!("exactly one of --eval or --diff must be given"),
    }
}

/// `name=value`, the value is parsed in the scalar type of the run
pub fn parse_binding<T: Scalar>(arg: &str) -> Result<(String, T)> {
    let (name, value) = arg
        .split_once('=')
        .with_context(|| format!("binding `{}` must look like name=value", arg))?;
    let name = name.trim();
    if !is_identifier(name) {
        bail!("invalid variable name `{}` in binding `{}`", name, arg);
    }
    let value = T::parse_value(value)
        .with_context(|| format!("invalid {} value `{}` for {}", T::KIND, value, name))?;
    Ok((name.to_string(), value))
}

pub fn evaluate_command<T: Scalar>(text: &str, binding_args: &[String]) -> Result<String> {
    let expression = Expression::<T>::parse(text)?;
    let mut bindings = Bindings::new();
    for arg in binding_args {
        let (name, value) = parse_binding::<T>(arg)?;
        bindings.insert(name, value);
    }
    // every variable must have a value before evaluation starts
    if let Some(missing) = expression
        .variables()
        .into_iter()
        .find(|name| !bindings.contains_key(name))
    {
        return Err(SymbolicError::UnboundVariable(missing).into());
    }
    let unused = bindings
        .keys()
        .filter(|name| !expression.contains_variable(name))
        .sorted()
        .join(", ");
    if !unused.is_empty() {
        warn!("bindings not used by {}: {}", expression, unused);
    }
    let value = expression.evaluate(&bindings)?;
    info!("{} = {}", expression, value);
    Ok(value.to_string())
}

pub fn differentiate_command<T: Scalar>(
    text: &str,
    var: &str,
    order: usize,
    rule: PowerRule,
) -> Result<String> {
    if !is_identifier(var) {
        bail!("invalid variable name `{}` for --by", var);
    }
    let expression = Expression::<T>::parse(text)?;
    let derivative = expression.nth_derivative(var, order, rule);
    Ok(derivative.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["differentiator", "--log-level", "off"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_eval_command() {
        let out = run(&cli(&["--eval", "(x + 5) * (y - 3)", "x=2", "y=4"])).unwrap();
        assert_eq!(out, "7");
        let out = run(&cli(&["--eval", "-x^2", "x=3"])).unwrap();
        assert_eq!(out, "-9");
    }

    #[test]
    fn test_diff_command() {
        let out = run(&cli(&["--diff", "x^3 + 3*x + 5", "--by", "x"])).unwrap();
        assert_eq!(out, "((3 * (x ^ (3 - 1))) + 3)");
        let out = run(&cli(&["--diff", "sin(x)", "--by", "x", "--order", "2"])).unwrap();
        assert_eq!(out, "((-1) * sin(x))");
    }

    #[test]
    fn test_power_rule_flag() {
        let textual = run(&cli(&["--diff", "(2*x)^3", "--by", "x"])).unwrap();
        assert_eq!(textual, "0");
        let general = run(&cli(&[
            "--diff",
            "(2*x)^3",
            "--by",
            "x",
            "--power-rule",
            "general",
        ]))
        .unwrap();
        assert_ne!(general, "0");
    }

    #[test]
    fn test_unbound_variable_is_reported() {
        let err = run(&cli(&["--eval", "x + y", "x=1"])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SymbolicError>(),
            Some(&SymbolicError::UnboundVariable("y".to_string()))
        );
    }

    #[test]
    fn test_bad_inputs() {
        assert!(run(&cli(&["--eval", "x +", "x=1"])).is_err());
        assert!(run(&cli(&["--eval", "x", "x"])).is_err());
        assert!(run(&cli(&["--eval", "x", "x=abc"])).is_err());
        assert!(run(&cli(&["--eval", "x", "1x=2"])).is_err());
        assert!(run(&cli(&["--diff", "x", "--by", "1x"])).is_err());
    }

    #[test]
    fn test_argument_validation() {
        assert!(Cli::try_parse_from(["differentiator"]).is_err());
        assert!(Cli::try_parse_from(["differentiator", "--eval", "x", "--diff", "x"]).is_err());
        assert!(Cli::try_parse_from(["differentiator", "--diff", "x"]).is_err());
        assert!(Cli::try_parse_from(["differentiator", "--diff", "x", "--by", "x", "x=1"]).is_err());
        assert!(
            Cli::try_parse_from(["differentiator", "--diff", "x", "--by", "x", "--power-rule", "odd"])
                .is_err()
        );
    }

    #[test]
    fn test_bindings_rejected_in_diff_mode() {
        let parsed = Cli::try_parse_from(["differentiator", "--diff", "x", "--by", "x", "x=1"]);
        assert!(parsed.is_err());
        // a Cli assembled in code goes through the same check
        let mut diff = cli(&["--diff", "x", "--by", "x"]);
        diff.bindings = vec!["x=1".to_string()];
        assert!(run(&diff).is_err());
        assert_eq!(run(&cli(&["--diff", "x", "--by", "x"])).unwrap(), "1");
    }

    #[test]
    fn test_out_of_range_literal_fails() {
        assert!(run(&cli(&["--eval", "1e400+0"])).is_err());
    }

    #[test]
    fn test_complex_eval() {
        let out = run(&cli(&[
            "--complex",
            "--eval",
            "(x + y) * z",
            "x=1+2i",
            "y=3+4i",
            "z=0+1i",
        ]))
        .unwrap();
        // (4+6i) * i
        assert_eq!(out, "-6+4i");
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"off\"\n\n[engine]\npower_rule = \"general\"").unwrap();
        let path = file.path().to_str().unwrap();
        let parsed = Cli::try_parse_from([
            "differentiator",
            "--config",
            path,
            "--diff",
            "x^x",
            "--by",
            "x",
        ])
        .unwrap();
        let config = parsed.resolve_config().unwrap();
        assert_eq!(config.power_rule, PowerRule::General);
        let out = run(&parsed).unwrap();
        assert_eq!(out, "((x ^ x) * (ln(x) + (x / x)))");

        let missing = Cli::try_parse_from([
            "differentiator",
            "--config",
            "/nonexistent/differentiator.toml",
            "--eval",
            "1",
        ])
        .unwrap();
        assert!(run(&missing).is_err());
    }
}
