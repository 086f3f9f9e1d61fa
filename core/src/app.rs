//! Application related stuff

use crate::math::Float;
use clap::{Parser, Subcommand, ValueEnum};

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// Command line options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Inspect shading closures.", long_about = None)]
pub struct Options {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// List registered closures and their parameters.
    List,

    /// Estimate the albedo of a closure and check its sampler against its
    /// evaluation.
    Furnace {
        /// Closure name.
        #[arg(value_name = "CLOSURE")]
        closure: String,

        /// Closure parameter as NAME=VALUE. Vectors and colours take comma
        /// separated components.
        #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Angle between the view direction and the normal in degrees.
        #[arg(long, short = 't', value_name = "DEGREES", default_value_t = 0.0)]
        theta: Float,

        /// Number of samples.
        #[arg(long, short = 'n', value_name = "NUM", default_value_t = 65536)]
        samples: usize,

        /// Random sequence index.
        #[arg(long, value_name = "NUM", default_value_t = 0)]
        seed: u64,
    },

    /// Tabulate a subsurface profile.
    Bssrdf {
        /// Diffusion profile.
        #[arg(value_enum, value_name = "PROFILE")]
        profile: Profile,

        /// Closure parameter as NAME=VALUE.
        #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Number of radii to print per channel.
        #[arg(long, value_name = "NUM", default_value_t = 16)]
        steps: usize,
    },

    /// Print normalized blackbody colours.
    Blackbody {
        /// Lowest temperature in Kelvin.
        #[arg(long, value_name = "KELVIN", default_value_t = 1000.0)]
        min: Float,

        /// Highest temperature in Kelvin.
        #[arg(long, value_name = "KELVIN", default_value_t = 12000.0)]
        max: Float,

        /// Number of temperatures to print.
        #[arg(long, value_name = "NUM", default_value_t = 12)]
        steps: usize,
    },
}

/// Subsurface diffusion profiles.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Profile {
    Cubic,
    Dipole,
}

impl Profile {
    /// Returns the registry name of the closure.
    pub fn closure_name(&self) -> &'static str {
        match self {
            Profile::Cubic => "bssrdf_cubic",
            Profile::Dipole => "bssrdf_dipole",
        }
    }
}

/// Splits a `NAME=VALUE` argument.
///
/// * `arg` - The argument.
pub fn split_param(arg: &str) -> Result<(&str, &str), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("Invalid parameter '{arg}', expected NAME=VALUE"))
}
