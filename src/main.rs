use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use path_reducer::config::{
	discover_configs, load_config_file, load_merged_config, user_config_path,
};
use path_reducer::logging::setup_logging;
use path_reducer::{FileMetadata, PathReducer, ProcessIdentity};

#[derive(Parser)]
#[command(name = "pathreduce")]
#[command(
	author,
	version,
	about = "Normalize volatile path segments (pids, container ids, cgroups) into stable patterns"
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Pid of the process that owns the paths; its own /proc entries become /proc/self
	#[arg(long, default_value_t = 0)]
	pid: u32,

	/// Filesystem kind of the files (e.g. sysfs); filesystem pre-checks are skipped when unset
	#[arg(long = "fs", value_name = "KIND")]
	filesystem: Option<String>,

	/// Load rules from this file instead of the .pathreduce.toml cascade
	#[arg(long, value_name = "FILE", global = true, conflicts_with = "no_config")]
	config: Option<PathBuf>,

	/// Only use the built-in rules
	#[arg(long, global = true)]
	no_config: bool,

	/// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	/// Paths to reduce; read one per line from stdin when omitted
	paths: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// List the effective reduction rules in evaluation order
	Rules,
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the config files in the cascade with their rules
	Show,
	/// Check all config files for errors without reducing anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	setup_logging(cli.verbose)?;

	if let Some(ref command) = cli.command {
		return match command {
			Commands::Rules => handle_rules(&cli),
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	handle_reduce(&cli)
}

fn load_reducer(cli: &Cli) -> Result<PathReducer> {
	if cli.no_config {
		return PathReducer::with_builtin_rules().context("Failed to compile built-in rules");
	}

	let config = match cli.config {
		Some(ref path) => load_config_file(path)
			.with_context(|| format!("Failed to load {}", path.display()))?,
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			load_merged_config(&cwd).context("Failed to load configuration")?
		}
	};

	PathReducer::from_config(&config).context("Failed to compile rules")
}

fn handle_reduce(cli: &Cli) -> Result<ExitCode> {
	let reducer = load_reducer(cli)?;
	let file = cli.filesystem.as_deref().map(FileMetadata::new);
	let process = ProcessIdentity::new(cli.pid);

	let stdout = std::io::stdout();
	let mut out = stdout.lock();

	if cli.paths.is_empty() {
		for line in std::io::stdin().lock().lines() {
			let line = line.context("Failed to read stdin")?;
			writeln!(out, "{}", reducer.reduce_path(&line, file.as_ref(), &process))?;
		}
	} else {
		for path in &cli.paths {
			writeln!(out, "{}", reducer.reduce_path(path, file.as_ref(), &process))?;
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rules(cli: &Cli) -> Result<ExitCode> {
	let reducer = load_reducer(cli)?;

	if reducer.rules().is_empty() {
		println!("No rules configured.");
		return Ok(ExitCode::SUCCESS);
	}

	for (i, rule) in reducer.rules().iter().enumerate() {
		println!("Rule {}: {}", i + 1, rule.name);
		println!("    pattern: {}", rule.pattern.as_str());
		if let Some(ref hint) = rule.hint {
			println!("    hint: {}", hint);
		}
		println!("    pre-check: {}", rule.pre_check);
		println!("    rewrite: {}", rule.rewrite);
		match rule.source {
			Some(ref source) => println!("    source: {}", source.display()),
			None => println!("    source: built-in"),
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!(
			"# disable-builtin-rules: {}",
			loaded.config.disable_builtin_rules
		);
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		println!("# rules: {}", loaded.config.rules.len());
		println!();

		for (i, rule) in loaded.config.rules.iter().enumerate() {
			println!("  Rule {}:", i + 1);
			if let Some(ref name) = rule.name {
				println!("    name: {}", name);
			}
			println!("    pattern: {}", rule.pattern);
			if let Some(ref hint) = rule.hint {
				println!("    hint: {}", hint);
			}
			if let Some(ref filesystem) = rule.filesystem {
				println!("    filesystem: {}", filesystem);
			}
			if let Some(min_hex_run) = rule.min_hex_run {
				println!("    min_hex_run: {}", min_hex_run);
			}
			if let Some(group) = rule.group {
				println!("    group: {}", group);
			}
			if let Some(ref replacement) = rule.replacement {
				println!("    replacement: {}", replacement);
			}
			if rule.pid_aware {
				println!("    pid_aware: true");
			}
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} rules)",
						loaded.path.display(),
						loaded.config.rules.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
