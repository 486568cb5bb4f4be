use std::process::ExitCode;

use clap::Parser;
use jpyer::{
	Jpyer, JpyerError, Options,
	analyzer::AnalyzerOptions,
	cli::*,
	optimizer::OptimizerOptions,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	match run(Cli::parse().mode) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("{e}");
			ExitCode::FAILURE
		}
	}
}

fn run(mode: Mode) -> Result<ExitCode, JpyerError> {
	match mode {
		Mode::Translate { path, indent, out, no_optimize, ast } => {
			let mut options = Options::default();
			if no_optimize {
				options.optimizer = OptimizerOptions { constant_folding: false, simplify: false };
			}
			let jpyer = Jpyer::new(options);
			let (text, unit) = jpyer.translate_file(&path, indent)?;
			for error in jpyer.analyze(&unit) {
				eprintln!("warning: {error}");
			}
			if ast {
				print!("{}", jpyer.dump(&unit));
			}
			match out {
				Some(out) => std::fs::write(&out, text)
					.map_err(|e| anyhow::anyhow!("Failed write {}: {e}", out.display()))?,
				None => print!("{text}"),
			}
			Ok(ExitCode::SUCCESS)
		}
		Mode::Check { path, global_limit, depth_limit } => {
			let analyzer = AnalyzerOptions {
				global_var_limit:  (global_limit > 0).then_some(global_limit),
				block_depth_limit: depth_limit,
			};
			let jpyer = Jpyer::new(Options { analyzer, ..Default::default() });
			let (_, unit) = jpyer.translate_file(&path, Default::default())?;
			let errors = jpyer.analyze(&unit);
			for error in &errors {
				eprintln!("{}: {error}", path.display());
			}
			Ok(if errors.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
		}
		Mode::Ast { path } => {
			let jpyer = Jpyer::default();
			let (_, unit) = jpyer.translate_file(&path, Default::default())?;
			print!("{}", jpyer.dump(&unit));
			Ok(ExitCode::SUCCESS)
		}
	}
}
