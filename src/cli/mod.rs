//! Interactive menu and argument-mode dispatch
//!
//! Every test run, whether picked from the menu, from `--test-api` or as part
//! of `--all`, goes through [`App::dispatch`].

pub mod menu;

use colored::Colorize;
use std::io::BufRead;

use crate::commands::{ArgumentRun, Target};
use crate::common::{Error, Result};
use crate::report;
use crate::runner::{Orchestrator, PresentOptions, TranscriptSource, RUN_ALL_KEYS};
use crate::transcript::ParsedTranscript;
use menu::{Action, CommandTable, Prompt, ReviewChoice, SinkChoice};

/// How a finished run is shown
#[derive(Debug, Clone, Copy)]
pub enum Presentation {
    /// Fixed by command-line flags
    Arguments(PresentOptions),
    /// Ask the user after printing the summary
    Interactive,
}

/// Whether the menu opens after an argument-mode run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Exit,
    Menu,
}

pub struct App<S, R> {
    orchestrator: Orchestrator<S>,
    table: CommandTable,
    prompt: Prompt<R>,
}

impl<S: TranscriptSource, R: BufRead> App<S, R> {
    pub fn new(orchestrator: Orchestrator<S>, input: R) -> Self {
        let table = CommandTable::from_config(orchestrator.config());
        Self {
            orchestrator,
            table,
            prompt: Prompt::new(input),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<S> {
        &self.orchestrator
    }

    /// Run the requested tests, then the menu unless argument mode says to exit
    pub async fn run(&mut self, arguments: Option<ArgumentRun>) -> Result<()> {
        println!("\n\n{}", "RESTful API test utility".bold());

        if let Some(run) = arguments {
            if self.argument_run(&run).await == Continuation::Exit {
                return Ok(());
            }
        }

        self.menu_loop().await
    }

    /// Execute a validated argument-mode invocation
    pub async fn argument_run(&mut self, run: &ArgumentRun) -> Continuation {
        let presentation = Presentation::Arguments(run.options);

        match run.target {
            Target::One(id) => {
                self.dispatch(&id.to_string(), presentation).await;
            }
            Target::All => {
                self.orchestrator.begin_batch();
                for key in RUN_ALL_KEYS {
                    self.dispatch(key, presentation).await;
                }

                if run.options.write {
                    println!("Multiple logs created, concatenating....");
                    match self.orchestrator.finish_batch() {
                        Ok(Some(path)) => {
                            println!("All log files concatenated under: {}", path.display())
                        }
                        Ok(None) => println!("No log files were written"),
                        Err(e) => report_error(&e),
                    }
                }
            }
        }

        if run.menu {
            Continuation::Menu
        } else {
            Continuation::Exit
        }
    }

    /// Show the main menu until the user quits or input ends
    pub async fn menu_loop(&mut self) -> Result<()> {
        loop {
            println!("\n\n{}", "Menu:".bold());
            for line in self.table.lines() {
                println!("{line}");
            }

            let Some(choice) = self.prompt.ask()? else {
                return Ok(());
            };
            if !self.dispatch(&choice, Presentation::Interactive).await {
                return Ok(());
            }
        }
    }

    /// Perform the action bound to `key`
    ///
    /// Returns `false` when the key means quit. Run failures are reported
    /// here and do not end the session.
    pub async fn dispatch(&mut self, key: &str, presentation: Presentation) -> bool {
        let entry = match self.table.resolve(key).cloned() {
            Some(Action::Quit) => return false,
            Some(Action::RunTest(entry)) => entry,
            None => {
                println!("Unknown option, please try again");
                return true;
            }
        };

        let outcome = match self.orchestrator.run_test(&entry).await {
            Ok(parsed) => match presentation {
                Presentation::Arguments(options) => self.orchestrator.present(&parsed, &options),
                Presentation::Interactive => self.review(&parsed),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            report_error(&e);
        }
        true
    }

    /// Post-run menu: pick a filter and where to send the report
    fn review(&mut self, parsed: &ParsedTranscript) -> Result<()> {
        report::print_summary(&parsed.summary);

        loop {
            println!("{}", ReviewChoice::PROMPT);
            let Some(choice) = self.prompt.ask()? else {
                return Ok(());
            };

            let filter = match ReviewChoice::parse(&choice) {
                Some(ReviewChoice::Show(filter)) => filter,
                Some(ReviewChoice::Done) => return Ok(()),
                None => {
                    println!("unknown option \n");
                    continue;
                }
            };

            println!("{}", SinkChoice::PROMPT);
            let Some(sink) = self.prompt.ask()? else {
                return Ok(());
            };
            let Some(sink) = SinkChoice::parse(&sink) else {
                println!("unknown option");
                return Ok(());
            };

            if sink.screen() {
                report::print_report(&parsed.segments, filter);
            }
            if sink.file() {
                self.orchestrator.write_report(&parsed.segments, filter)?;
            }
        }
    }
}

fn report_error(e: &Error) {
    tracing::warn!(error = %e, "test run failed");
    println!("An error has occurred: {e}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::Config;
    use crate::common::paths::LogLayout;
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<PathBuf>>>,
        fail: bool,
    }

    #[async_trait]
    impl TranscriptSource for Recorder {
        async fn capture(&self, test_file: &Path) -> crate::common::Result<String> {
            self.calls.lock().unwrap().push(test_file.to_path_buf());
            if self.fail {
                return Err(Error::RunnerOutput("boom".to_string()));
            }
            Ok("*   Trying 127.0.0.1...\n> GET /\n* Closing connection 0\nERROR: x\nDEBUG:{\"body\": \"{}\", \"response\": 1, \"failures\": []}\n".to_string())
        }
    }

    fn app(source: Recorder, input: &str, root: &Path) -> App<Recorder, Cursor<String>> {
        let orchestrator = Orchestrator::new(source, Config::default(), LogLayout::new(root));
        App::new(orchestrator, Cursor::new(input.to_string()))
    }

    #[tokio::test]
    async fn test_menu_runs_then_quits() {
        let root = tempfile::tempdir().unwrap();
        let source = Recorder::default();
        let mut app = app(source.clone(), "1\n4\n0\n", root.path());

        app.run(None).await.unwrap();
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![PathBuf::from("quickstart.yaml")]
        );
    }

    #[tokio::test]
    async fn test_unknown_key_keeps_menu_open() {
        let root = tempfile::tempdir().unwrap();
        let source = Recorder::default();
        let mut app = app(source.clone(), "7\n", root.path());

        assert!(app.dispatch("7", Presentation::Interactive).await);
        assert!(!app.dispatch("0", Presentation::Interactive).await);
        // End of input closes the menu.
        app.menu_loop().await.unwrap();
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_writes_file() {
        let root = tempfile::tempdir().unwrap();
        let mut app = app(Recorder::default(), "2\n2\n4\n", root.path());

        assert!(app.dispatch("1", Presentation::Interactive).await);
        let days: Vec<_> = std::fs::read_dir(root.path()).unwrap().collect();
        assert_eq!(days.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_sink_leaves_review() {
        let root = tempfile::tempdir().unwrap();
        let mut app = app(Recorder::default(), "9\n1\n5\n0\n", root.path());

        // 9 re-prompts, 1 picks full debug, 5 is an unknown sink.
        assert!(app.dispatch("1", Presentation::Interactive).await);
        assert_eq!(app.prompt.ask().unwrap(), Some("0".to_string()));
        assert!(std::fs::read_dir(root.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_runner_failure_is_not_fatal() {
        let root = tempfile::tempdir().unwrap();
        let source = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut app = app(source.clone(), "", root.path());

        let run = ArgumentRun {
            target: Target::One(1),
            options: PresentOptions::default(),
            menu: true,
        };
        assert_eq!(app.argument_run(&run).await, Continuation::Menu);
        assert_eq!(source.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_all_only_runs_known_tests() {
        let root = tempfile::tempdir().unwrap();
        let source = Recorder::default();
        let mut app = app(source.clone(), "", root.path());

        let run = ArgumentRun {
            target: Target::All,
            options: PresentOptions {
                silent: true,
                ..PresentOptions::default()
            },
            menu: false,
        };
        assert_eq!(app.argument_run(&run).await, Continuation::Exit);
        assert_eq!(source.calls.lock().unwrap().len(), 1);
    }
}
