//! Menu tables and prompts
//!
//! Both the interactive menu and `--test-api` resolve their key through the
//! same [`CommandTable`].

use std::io::{self, BufRead, Write};

use crate::common::config::{Config, TestEntry};
use crate::common::Result;
use crate::report::ReportFilter;

const DEFAULT_LABEL: &str = "Run test";

/// What a menu key does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RunTest(TestEntry),
    Quit,
}

#[derive(Debug, Clone)]
struct MenuEntry {
    key: String,
    label: String,
    action: Action,
}

/// Key to action mapping for the main menu
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<MenuEntry>,
}

impl CommandTable {
    /// One entry per catalog test in numeric order, then `0` to quit
    pub fn from_config(config: &Config) -> Self {
        let mut tests: Vec<(&String, &TestEntry)> = config.tests.iter().collect();
        tests.sort_by_key(|(key, _)| (key.parse::<u32>().unwrap_or(u32::MAX), key.to_string()));

        let mut entries: Vec<MenuEntry> = tests
            .into_iter()
            .map(|(key, test)| MenuEntry {
                key: key.clone(),
                label: test
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("{DEFAULT_LABEL} ({})", test.file.display())),
                action: Action::RunTest(test.clone()),
            })
            .collect();

        entries.push(MenuEntry {
            key: "0".to_string(),
            label: "Quit".to_string(),
            action: Action::Quit,
        });

        Self { entries }
    }

    pub fn resolve(&self, key: &str) -> Option<&Action> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.action)
    }

    /// `1- Label` lines for printing
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("{}- {}", entry.key, entry.label))
            .collect()
    }
}

/// Answer to "What do you want to do now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    Show(ReportFilter),
    Done,
}

impl ReviewChoice {
    pub const PROMPT: &'static str = "\nWhat do you want to do now?\n\
                                      1- Full debug\n\
                                      2- Just errors\n\
                                      3- Just errors simplified (minimal output)\n\
                                      4- Nothing";

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Self::Show(ReportFilter::full())),
            "2" => Some(Self::Show(ReportFilter::errors())),
            "3" => Some(Self::Show(ReportFilter::minimal_errors())),
            "4" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Where a reviewed report goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkChoice {
    Screen,
    File,
    Both,
}

impl SinkChoice {
    pub const PROMPT: &'static str =
        "\n\n\n1- DEBUG on Screen\n2- Write DEBUG to file\n3- Both previous";

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Self::Screen),
            "2" => Some(Self::File),
            "3" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn screen(self) -> bool {
        matches!(self, Self::Screen | Self::Both)
    }

    pub fn file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Line-based prompt over any buffered reader
pub struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Prompt<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Print `-> ` and read one trimmed line; `None` at end of input
    pub fn ask(&mut self) -> Result<Option<String>> {
        print!("-> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    #[test]
    fn test_default_table() {
        let table = CommandTable::from_config(&Config::default());
        assert_eq!(
            table.lines(),
            vec!["1- Quick API tests (all APIs)", "0- Quit"]
        );
        assert_eq!(table.resolve("0"), Some(&Action::Quit));
        assert!(matches!(table.resolve("1"), Some(Action::RunTest(t)) if t.file == PathBuf::from("quickstart.yaml")));
        assert_eq!(table.resolve("2"), None);
    }

    #[test]
    fn test_table_sorts_numerically_and_labels_by_file() {
        let mut config = Config::default();
        for key in ["10", "2"] {
            config.tests.insert(
                key.to_string(),
                TestEntry {
                    file: PathBuf::from(format!("suite{key}.yaml")),
                    label: None,
                },
            );
        }
        let lines = CommandTable::from_config(&config).lines();
        assert_eq!(lines[1], "2- Run test (suite2.yaml)");
        assert_eq!(lines[2], "10- Run test (suite10.yaml)");
        assert_eq!(lines[3], "0- Quit");
    }

    #[test]
    fn test_review_and_sink_choices() {
        assert_eq!(
            ReviewChoice::parse("3"),
            Some(ReviewChoice::Show(ReportFilter::minimal_errors()))
        );
        assert_eq!(ReviewChoice::parse("4"), Some(ReviewChoice::Done));
        assert_eq!(ReviewChoice::parse("9"), None);
        assert!(SinkChoice::parse("3").unwrap().screen());
        assert!(SinkChoice::parse("3").unwrap().file());
        assert!(!SinkChoice::parse("2").unwrap().screen());
        assert_eq!(SinkChoice::parse(""), None);
    }

    #[test]
    fn test_prompt_reads_until_eof() {
        let mut prompt = Prompt::new(Cursor::new(" 1 \n"));
        assert_eq!(prompt.ask().unwrap(), Some("1".to_string()));
        assert_eq!(prompt.ask().unwrap(), None);
    }
}
