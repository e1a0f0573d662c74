//! Line-preserving INI document used for `Config/*.ini` edits.
//!
//! Only the lines that are edited change; comments, unknown lines, blank lines
//! and the file's line ending style survive a parse/serialize cycle.

use regex::Regex;
use std::sync::LazyLock;

pub const URL_SECTION: &str = "URL";
pub const GAME_NAME_KEY: &str = "GameName";
pub const ENGINE_SECTION: &str = "/Script/Engine.Engine";
pub const REDIRECT_KEY: &str = "+ActiveGameNameRedirects";

const SCRIPT_PREFIX: &str = "/Script/";

static REDIRECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*\+ActiveGameNameRedirects\s*=\s*\(\s*OldGameName\s*=\s*"([^"]*)"\s*,\s*NewGameName\s*=\s*"([^"]*)"\s*\)"#,
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl IniDocument {
    pub fn parse(content: &str) -> Self {
        let line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = content.is_empty() || content.ends_with('\n');

        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect()
        };

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn serialize(&self) -> String {
        let mut out = self.lines.join(self.line_ending);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.line_ending);
        }
        out
    }

    /// Apply `transform` to every line for which `skip` is false. Returns the
    /// number of lines changed.
    pub fn map_lines<F, S>(&mut self, skip: S, mut transform: F) -> usize
    where
        F: FnMut(&str) -> String,
        S: Fn(&str) -> bool,
    {
        let mut changed = 0;
        for line in self.lines.iter_mut() {
            if skip(line) {
                continue;
            }
            let updated = transform(line);
            if updated != *line {
                *line = updated;
                changed += 1;
            }
        }
        changed
    }

    /// Line range `(header, end)` of a section; `end` is exclusive and points at
    /// the next section header or the end of the document.
    pub fn section_range(&self, name: &str) -> Option<(usize, usize)> {
        let header = self
            .lines
            .iter()
            .position(|line| section_name(line) == Some(name))?;
        let end = self.lines[header + 1..]
            .iter()
            .position(|line| section_name(line).is_some())
            .map(|offset| header + 1 + offset)
            .unwrap_or(self.lines.len());
        Some((header, end))
    }

    /// Append an empty section if it does not exist yet.
    pub fn ensure_section(&mut self, name: &str) -> (usize, usize) {
        if let Some(range) = self.section_range(name) {
            return range;
        }
        if self.lines.last().is_some_and(|line| !line.trim().is_empty()) {
            self.lines.push(String::new());
        }
        self.lines.push(format!("[{}]", name));
        let header = self.lines.len() - 1;
        (header, header + 1)
    }

    /// Set `key=value` inside `section`, overwriting the first existing
    /// assignment of `key` or inserting a new line after the section's last
    /// non-blank line. The section is created if missing.
    pub fn set_key(&mut self, section: &str, key: &str, value: &str) {
        let (header, end) = self.ensure_section(section);
        let assignment = format!("{}={}", key, value);

        if let Some(index) = (header + 1..end).find(|&i| key_of(&self.lines[i]) == Some(key)) {
            self.lines[index] = assignment;
            return;
        }

        let insert_at = last_content_line(&self.lines, header, end) + 1;
        self.lines.insert(insert_at, assignment);
    }

    /// Value of the first assignment of `key` inside `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let (header, end) = self.section_range(section)?;
        self.lines[header + 1..end].iter().find_map(|line| {
            if key_of(line) == Some(key) {
                line.split_once('=').map(|(_, v)| v.trim())
            } else {
                None
            }
        })
    }

    /// Game name redirects declared in the engine section, with line indices.
    pub fn redirects(&self) -> Vec<(usize, GameNameRedirect)> {
        let Some((header, end)) = self.section_range(ENGINE_SECTION) else {
            return Vec::new();
        };
        (header + 1..end)
            .filter_map(|i| GameNameRedirect::parse(&self.lines[i]).map(|r| (i, r)))
            .collect()
    }

    /// Record that module `old_name` is now `new_name`.
    ///
    /// - the entry keyed by `old_name` is pointed at `new_name`;
    /// - entries that pointed at `old_name` are forwarded to `new_name`;
    /// - entries that would now redirect a name to itself are removed;
    /// - an entry is appended when none was keyed by `old_name`.
    ///
    /// Unrelated entries are untouched. Applying the same upsert twice
    /// leaves the document unchanged after the first call.
    pub fn upsert_redirect(&mut self, old_name: &str, new_name: &str) -> RedirectChanges {
        let mut changes = RedirectChanges::default();
        if old_name == new_name {
            return changes;
        }

        let (header, _) = self.ensure_section(ENGINE_SECTION);
        let mut keyed = false;
        let mut stale = Vec::new();

        for (index, mut redirect) in self.redirects() {
            let was = redirect.clone();
            if redirect.old_names(old_name) {
                keyed = true;
                redirect.new_game_name = script_path(new_name);
            } else if redirect.new_names(old_name) {
                redirect.new_game_name = script_path(new_name);
            }

            if redirect.is_self_redirect() {
                stale.push(index);
                changes.removed += 1;
            } else if redirect != was {
                self.lines[index] = redirect.to_line();
                changes.updated += 1;
            }
        }

        for index in stale.into_iter().rev() {
            self.lines.remove(index);
        }

        if !keyed {
            let (_, end) = self.section_range(ENGINE_SECTION).unwrap_or((header, header + 1));
            let insert_at = last_content_line(&self.lines, header, end) + 1;
            let entry = GameNameRedirect {
                old_game_name: script_path(old_name),
                new_game_name: script_path(new_name),
            };
            self.lines.insert(insert_at, entry.to_line());
            changes.added += 1;
        }

        changes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectChanges {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// One `+ActiveGameNameRedirects=(OldGameName="..", NewGameName="..")` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameNameRedirect {
    pub old_game_name: String,
    pub new_game_name: String,
}

impl GameNameRedirect {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = REDIRECT_PATTERN.captures(line)?;
        Some(Self {
            old_game_name: caps.get(1)?.as_str().to_string(),
            new_game_name: caps.get(2)?.as_str().to_string(),
        })
    }

    pub fn to_line(&self) -> String {
        format!(
            "{}=(OldGameName=\"{}\", NewGameName=\"{}\")",
            REDIRECT_KEY, self.old_game_name, self.new_game_name
        )
    }

    fn old_names(&self, module: &str) -> bool {
        names_module(&self.old_game_name, module)
    }

    fn new_names(&self, module: &str) -> bool {
        names_module(&self.new_game_name, module)
    }

    fn is_self_redirect(&self) -> bool {
        strip_script(&self.old_game_name) == strip_script(&self.new_game_name)
    }
}

pub fn is_redirect_line(line: &str) -> bool {
    line.trim_start().starts_with(REDIRECT_KEY)
}

fn script_path(module: &str) -> String {
    format!("{}{}", SCRIPT_PREFIX, module)
}

fn strip_script(value: &str) -> &str {
    value.strip_prefix(SCRIPT_PREFIX).unwrap_or(value)
}

/// Templates write bare names (`OldGameName="TP_Blank"`), renames write
/// script paths; both name the same module.
fn names_module(value: &str, module: &str) -> bool {
    strip_script(value) == module
}

fn section_name(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}

/// Plain `key=value` assignments only; array operators (`+key`, `-key`) and
/// comments are not keys.
fn key_of(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with([';', '#', '+', '-', '.', '!', '[']) {
        return None;
    }
    trimmed.split_once('=').map(|(key, _)| key.trim())
}

fn last_content_line(lines: &[String], header: usize, end: usize) -> usize {
    (header + 1..end)
        .rev()
        .find(|&i| !lines[i].trim().is_empty())
        .unwrap_or(header)
}
