use crate::bridge::convert::convert;
use crate::bridge::query;
use crate::errors::NamelistError;
use crate::frontend::config::{Config, ProfileSpec, QuerySpec};
use crate::logging::{self, LogConfig};
use crate::profile::Profile;
use crate::runtime::{self, Runtime};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyList};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub namelist: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub queries: Vec<String>,
    pub profiles: Vec<String>,
    pub json: bool,
    pub color: bool,
    pub help: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            namelist: None,
            config: None,
            queries: Vec::new(),
            profiles: Vec::new(),
            json: false,
            color: true,
            help: false,
        }
    }
}

pub struct Cli {
    config: CliConfig,
}

impl Cli {
    pub fn new(config: CliConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<i32, String> {
        let file_config = match &self.config.config {
            Some(path) => Some(Config::load(path)?),
            None => None,
        };

        let _log_guard = logging::init(match &file_config {
            Some(config) => config.log_config(),
            None => LogConfig::from_env(),
        });

        let namelist = self
            .config
            .namelist
            .clone()
            .or_else(|| file_config.as_ref().map(|c| c.namelist.clone()))
            .ok_or_else(|| "No namelist file specified".to_string())?;

        let mut queries: Vec<QuerySpec> = file_config
            .as_ref()
            .map(|c| c.queries.clone())
            .unwrap_or_default();
        for spec in &self.config.queries {
            queries.push(parse_query_spec(spec)?);
        }

        let mut profiles: Vec<ProfileSpec> = file_config
            .as_ref()
            .map(|c| c.profiles.clone())
            .unwrap_or_default();
        for spec in &self.config.profiles {
            profiles.push(parse_profile_spec(spec)?);
        }

        let _runtime = Runtime::acquire();

        if !self.config.json {
            let version = runtime::python_version().map_err(|e| e.to_string())?;
            println!("Python version: {}", version);
        }

        runtime::run_file(&namelist).map_err(|e| e.to_string())?;

        let mut report = serde_json::Map::new();
        let mut missing = 0usize;

        for spec in &queries {
            let value = self.query_value(spec).map_err(|e| e.to_string())?;
            let label = target_label(&spec.name, &spec.component, spec.index);
            if value.is_null() {
                missing += 1;
            }
            if self.config.json {
                report.insert(label, value);
            } else {
                self.print_value(&label, &value);
            }
        }

        for spec in &profiles {
            let profile =
                Profile::from_namelist(&spec.name, spec.component.as_deref(), spec.index)
                    .map_err(|e| e.to_string())?
                    .ok_or_else(|| format!("{} is not a profile function", spec.name))?;
            for point in &spec.at {
                if point.len() < profile.arity().count() {
                    return Err(format!(
                        "{} takes {} coordinates, got {}",
                        spec.name,
                        profile.arity().count(),
                        point.len()
                    ));
                }
                let value = profile.value_at(point).map_err(|e| e.to_string())?;
                let label = format!("{}({})", spec.name, join_coords(point));
                if self.config.json {
                    report.insert(label, json!(value));
                } else {
                    self.print_value(&label, &json!(value));
                }
            }
        }

        if self.config.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&Value::Object(report)).map_err(|e| e.to_string())?
            );
        }

        if missing > 0 {
            self.print_error(&format!(
                "{} requested value{} not present in the namelist",
                missing,
                if missing == 1 { "" } else { "s" }
            ));
            return Ok(1);
        }

        Ok(0)
    }

    /// Read one namelist value as JSON: scalars and lists auto-detected,
    /// absent attributes reported as null.
    fn query_value(&self, spec: &QuerySpec) -> Result<Value, NamelistError> {
        let handle = query::attribute(&spec.name, spec.component.as_deref(), spec.index)?;
        let Some(handle) = handle else {
            return Ok(Value::Null);
        };
        Python::with_gil(|py| {
            let obj = handle.as_ref(py);
            if obj.is_none() {
                return Ok(Value::Null);
            }
            if obj.downcast::<PyList>().is_ok() {
                if let Some(values) = convert::<Vec<f64>>(obj) {
                    return Ok(json!(values));
                }
                if let Some(values) = convert::<Vec<String>>(obj) {
                    return Ok(json!(values));
                }
                return Ok(json!(query::repr(&handle)));
            }
            if obj.is_instance_of::<PyBool>() {
                return Ok(json!(convert::<bool>(obj)));
            }
            if let Some(value) = convert::<f64>(obj) {
                return Ok(json!(value));
            }
            if let Some(value) = convert::<String>(obj) {
                return Ok(json!(value));
            }
            Ok(json!(query::repr(&handle)))
        })
    }

    fn print_value(&self, label: &str, value: &Value) {
        if self.config.color {
            println!("\x1b[32m{}\x1b[0m = {}", label, value);
        } else {
            println!("{} = {}", label, value);
        }
    }

    fn print_error(&self, msg: &str) {
        if self.config.color {
            eprintln!("\x1b[31m{}\x1b[0m", msg);
        } else {
            eprintln!("{}", msg);
        }
    }
}

fn target_label(name: &str, component: &Option<String>, index: usize) -> String {
    match component {
        Some(component) => format!("{}[{}].{}", component, index, name),
        None => name.to_string(),
    }
}

fn join_coords(point: &[f64]) -> String {
    point
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse `name` or `Component[index].name`.
fn parse_target(spec: &str) -> Result<(String, Option<String>, usize), String> {
    match spec.split_once('.') {
        Some((component, name)) => {
            let (component, index) = match component.split_once('[') {
                Some((component, rest)) => {
                    let index = rest
                        .strip_suffix(']')
                        .and_then(|s| s.parse::<usize>().ok())
                        .ok_or_else(|| format!("Invalid component index in '{}'", spec))?;
                    (component, index)
                }
                None => (component, 0),
            };
            Ok((name.to_string(), Some(component.to_string()), index))
        }
        None => Ok((spec.to_string(), None, 0)),
    }
}

fn parse_query_spec(spec: &str) -> Result<QuerySpec, String> {
    let (name, component, index) = parse_target(spec)?;
    Ok(QuerySpec { name, component, index })
}

/// Parse `target@x,y,z` into a single-point profile evaluation.
fn parse_profile_spec(spec: &str) -> Result<ProfileSpec, String> {
    let (target, points) = spec
        .split_once('@')
        .ok_or_else(|| format!("Invalid profile spec '{}': expected name@x,y,z", spec))?;
    let (name, component, index) = parse_target(target)?;
    let coordinates = points
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| format!("Invalid coordinates in '{}': {}", spec, e))?;
    Ok(ProfileSpec {
        name,
        component,
        index,
        at: vec![coordinates],
    })
}

fn parse_args(args: &[String]) -> Result<CliConfig, String> {
    let mut config = CliConfig::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => config.help = true,
            "-q" | "--query" => config.queries.push(required_value(&mut iter, arg)?),
            "-p" | "--profile" => config.profiles.push(required_value(&mut iter, arg)?),
            "-c" | "--config" => {
                config.config = Some(PathBuf::from(required_value(&mut iter, arg)?))
            }
            "--json" => config.json = true,
            "--no-color" => config.color = false,
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            other => {
                if config.namelist.is_some() {
                    return Err("Multiple namelist files specified".to_string());
                }
                config.namelist = Some(PathBuf::from(other));
            }
        }
    }
    Ok(config)
}

fn required_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn print_usage() {
    println!("Usage: pynamelist [options] <namelist.py>");
    println!();
    println!("Options:");
    println!("  -q, --query SPEC     Print a namelist value; SPEC is `name` or `Component[i].name`");
    println!("  -p, --profile SPEC   Evaluate a profile; SPEC is `name@x,y,z`");
    println!("  -c, --config FILE    Load queries and profiles from a TOML run config");
    println!("      --json           Emit results as a JSON object");
    println!("      --no-color       Disable colored output");
    println!("  -h, --help           Show this help");
}

pub fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    if config.help {
        print_usage();
        return Ok(());
    }
    let code = Cli::new(config).run()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_component_targets() {
        assert_eq!(parse_target("my_pi").unwrap(), ("my_pi".to_string(), None, 0));
        assert_eq!(
            parse_target("Species[2].charge").unwrap(),
            ("charge".to_string(), Some("Species".to_string()), 2)
        );
        assert_eq!(
            parse_target("Laser.omega").unwrap(),
            ("omega".to_string(), Some("Laser".to_string()), 0)
        );
        assert!(parse_target("Species[x].charge").is_err());
    }

    #[test]
    fn parses_profile_spec() {
        let spec = parse_profile_spec("my_func@3.0, 4.5").unwrap();
        assert_eq!(spec.name, "my_func");
        assert_eq!(spec.at, vec![vec![3.0, 4.5]]);
        assert!(parse_profile_spec("my_func").is_err());
        assert!(parse_profile_spec("my_func@three").is_err());
    }

    #[test]
    fn parses_arguments() {
        let args: Vec<String> = ["-q", "my_pi", "--json", "input.py"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = parse_args(&args).unwrap();
        assert_eq!(config.queries, vec!["my_pi".to_string()]);
        assert!(config.json);
        assert_eq!(config.namelist, Some(PathBuf::from("input.py")));

        assert!(parse_args(&["--bogus".to_string()]).is_err());
        assert!(parse_args(&["-q".to_string()]).is_err());
    }
}
