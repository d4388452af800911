//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text or the JSON envelope)
//!
//! ## Structure
//!
//! - `cli` - Command-line definition
//! - `commands` - One handler per subcommand
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering abstractions
//!
//! ## Usage
//!
//! ```ignore
//! use siteforge::presentation::{cli::Cli, commands, output};
//!
//! let cli = Cli::parse();
//! let renderer = output::create_renderer(output::OutputFormat::from_json_flag(cli.json), cli.verbose);
//! match commands::run(&cli) {
//!     Ok(result) => renderer.render(&result, &mut std::io::stdout())?,
//!     Err(err) => renderer.render_error(&err, &mut std::io::stderr())?,
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod factory;
pub mod output;

pub use factory::create_deploy_use_case;
