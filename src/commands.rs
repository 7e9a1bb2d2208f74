//! Command-line flag definitions
//!
//! With no flags the utility opens the interactive menu. Any flag switches to
//! argument mode, which needs either `--test-api` or `--all`.

use clap::Parser;

use crate::common::{Error, Result};
use crate::runner::PresentOptions;

/// Automatically tests REST APIs with pyresttest
#[derive(Parser, Debug, Default)]
#[command(name = "resttest", version)]
#[command(
    about = "Automatically tests REST APIs with pyresttest",
    long_about = "Automatically tests REST APIs with pyresttest.\n\
                  Arguments are optional: with none, an interactive menu is opened and \
                  everything can be configured there."
)]
pub struct Cli {
    /// Which test to run, refer to the menu for test numbering
    #[arg(short = 't', long = "test-api")]
    pub test_api: Option<u8>,

    /// Show debug only for failed tests, on screen and in the file with [-w]
    #[arg(short = 'e', long)]
    pub only_errors: bool,

    /// Write output to a log file
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Show only the test group results (does not silence the log file)
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Return to the interactive menu after the tests complete
    #[arg(short = 'm', long)]
    pub menu: bool,

    /// Run all tests
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Ignore test info and show only minimal debug information (implies [-e])
    #[arg(short = 'i', long)]
    pub ignore_info: bool,
}

/// What an argument-mode invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    One(u8),
    All,
}

/// A validated argument-mode invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentRun {
    pub target: Target,
    pub options: PresentOptions,
    /// Open the menu afterwards instead of exiting
    pub menu: bool,
}

impl Cli {
    /// Reject flag combinations that make no sense together
    pub fn validate(&self) -> Result<()> {
        let any_option =
            self.only_errors || self.write || self.silent || self.menu || self.ignore_info;

        if any_option && !self.all && self.test_api.is_none() {
            return Err(Error::InvalidArguments(
                "if using arguments mode, [--test-api] must not be empty!\n\
                 Use resttest -h for more information"
                    .to_string(),
            ));
        }

        if self.all && self.test_api.is_some() {
            return Err(Error::InvalidArguments(
                "if using [--all], calling single test with [--test-api] is not allowed"
                    .to_string(),
            ));
        }

        if self.silent && (self.ignore_info || self.only_errors) && !self.write {
            return Err(Error::InvalidArguments(
                "if using [--silent], the usage of [--ignore-info] and/or [--only-errors] \
                 is not allowed, except if writing to file [-w]"
                    .to_string(),
            ));
        }

        if let Some(api) = self.test_api {
            if !(1..=5).contains(&api) {
                return Err(Error::InvalidArguments(
                    "api argument for [--test-api] must be between 1 - 5".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The argument-mode run requested, if any
    pub fn argument_run(&self) -> Option<ArgumentRun> {
        let target = if self.all {
            Target::All
        } else {
            Target::One(self.test_api?)
        };

        Some(ArgumentRun {
            target,
            options: PresentOptions {
                only_errors: self.only_errors,
                write: self.write,
                silent: self.silent,
                ignore_info: self.ignore_info,
            },
            menu: self.menu,
        })
    }
}
