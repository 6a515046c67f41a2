use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one configuration entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    /// Value applied
    Accepted,
    /// Value applied with a substitution or caveat
    Warning(String),
    /// Entry ignored
    Skipped(String),
}

/// One reported configuration entry
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    /// 1-based line number, when the entry comes from a line
    pub line: Option<usize>,
    /// Key or subject of the entry
    pub key: String,
    /// Outcome
    pub status: EntryStatus,
}

/// Per-entry account of a configuration load
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigReport {
    /// Where the configuration came from
    pub source: String,
    /// Reported entries in file order
    pub entries: Vec<ConfigEntry>,
}

impl ConfigReport {
    /// Empty report for `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn accept(&mut self, line: Option<usize>, key: impl Into<String>) {
        self.push(line, key, EntryStatus::Accepted);
    }

    pub(crate) fn warn(&mut self, line: Option<usize>, key: impl Into<String>, message: impl Into<String>) {
        self.push(line, key, EntryStatus::Warning(message.into()));
    }

    pub(crate) fn skip(&mut self, line: Option<usize>, key: impl Into<String>, message: impl Into<String>) {
        self.push(line, key, EntryStatus::Skipped(message.into()));
    }

    fn push(&mut self, line: Option<usize>, key: impl Into<String>, status: EntryStatus) {
        self.entries.push(ConfigEntry {
            line,
            key: key.into(),
            status,
        });
    }

    /// Number of accepted entries
    pub fn accepted_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Accepted))
    }

    /// Number of entries accepted with a warning
    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Warning(_)))
    }

    /// Number of ignored entries
    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Skipped(_)))
    }

    /// Whether every entry was accepted as written
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0 && self.skipped_count() == 0
    }

    fn count(&self, predicate: impl Fn(&EntryStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.status)).count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static SKIP: Emoji<'_, '_> = Emoji("✗", "[SKIP]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Configuration Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("====================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Source").bold(), self.source));

            for entry in &self.entries {
                let (symbol, color_fn): (_, fn(&str) -> console::StyledObject<&str>) =
                    match &entry.status {
                        EntryStatus::Accepted => (OK, |s| style(s).green()),
                        EntryStatus::Warning(_) => (WARN, |s| style(s).yellow()),
                        EntryStatus::Skipped(_) => (SKIP, |s| style(s).red()),
                    };

                output.push_str(&format!("[{}] {}", symbol, location(entry)));
                output.push_str(&color_fn(&entry.key).to_string());
                match &entry.status {
                    EntryStatus::Accepted => output.push('\n'),
                    EntryStatus::Warning(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("WARNING").yellow().bold(), msg));
                    }
                    EntryStatus::Skipped(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("SKIPPED").red().bold(), msg));
                    }
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} accepted, {} warnings, {} skipped\n",
                style("Summary").bold(),
                style(self.accepted_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.skipped_count()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

fn location(entry: &ConfigEntry) -> String {
    match entry.line {
        Some(line) => format!("line {}: ", line),
        None => String::new(),
    }
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f)?;

        for entry in &self.entries {
            let symbol = match &entry.status {
                EntryStatus::Accepted => "✓",
                EntryStatus::Warning(_) => "⚠",
                EntryStatus::Skipped(_) => "✗",
            };
            write!(f, "[{}] {}{}", symbol, location(entry), entry.key)?;
            match &entry.status {
                EntryStatus::Accepted => writeln!(f)?,
                EntryStatus::Warning(msg) => writeln!(f, " - WARNING: {}", msg)?,
                EntryStatus::Skipped(msg) => writeln!(f, " - SKIPPED: {}", msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} accepted, {} warnings, {} skipped",
            self.accepted_count(),
            self.warning_count(),
            self.skipped_count()
        )
    }
}
