use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::translator::Indent;

#[derive(Parser, Debug)]
#[command(name = "jpyer", version, after_long_help = "Translates a Java subset into Python source.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Translate a source file and print the result
	Translate {
		path:        PathBuf,
		/// Indentation: a width such as 4 or 2, or "tab"
		#[arg(long, default_value = "4")]
		indent:      Indent,
		/// Write the translation here instead of stdout
		#[arg(long, short)]
		out:         Option<PathBuf>,
		/// Skip constant folding and simplification
		#[arg(long)]
		no_optimize: bool,
		/// Also print the syntax tree
		#[arg(long)]
		ast:         bool,
	},
	/// Report semantic problems, failing when there are any
	Check {
		path:         PathBuf,
		/// How many fields the source may declare, 0 for no limit
		#[arg(long, default_value_t = 128)]
		global_limit: usize,
		/// How deeply blocks may nest
		#[arg(long)]
		depth_limit:  Option<usize>,
	},
	/// Print the syntax tree
	Ast { path: PathBuf },
}
