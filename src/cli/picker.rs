//! Interactive JSON file picker for `lend table --pick`.
//!
//! Lists `*.json` exports under the working directory and lets the user pick
//! one by number or type a path. Parsing of the typed answer is kept pure so
//! it can be tested without a terminal.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// How deep below the working directory we look for exports.
const SEARCH_DEPTH: usize = 4;

const SKIPPED_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// What the user typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Quit,
    Index(usize),
    OutOfRange(usize),
    Path(PathBuf),
}

/// Interpret one line of user input against `count` listed files.
pub fn parse_answer(input: &str, count: usize) -> Option<Answer> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.eq_ignore_ascii_case("q") {
        return Some(Answer::Quit);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(Answer::Index(n - 1)),
        Ok(n) => Some(Answer::OutOfRange(n)),
        Err(_) => Some(Answer::Path(PathBuf::from(input))),
    }
}

/// Prompt on stdin/stdout until a usable JSON file is chosen.
pub fn prompt_for_json_path() -> Result<PathBuf, AppError> {
    let files = discover_json_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .json files found. Provide one with `lend table -f <file.json>`.",
        ));
    }

    println!("Found {} JSON file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, display_path(path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Pick a file (1-{}), type a path, or q to quit: ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else {
            return Err(AppError::new(2, "No input received."));
        };
        let line = line.map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        match parse_answer(&line, files.len()) {
            None => continue,
            Some(Answer::Quit) => return Err(AppError::new(2, "Canceled.")),
            Some(Answer::Index(idx)) => return Ok(files[idx].clone()),
            Some(Answer::OutOfRange(n)) => {
                println!("No file number {n}.");
            }
            Some(Answer::Path(path)) => match check_json_path(&path) {
                Ok(()) => return Ok(path),
                Err(err) => println!("{err}"),
            },
        }
    }
}

/// The path must be an existing file with a `.json` extension.
pub fn check_json_path(path: &Path) -> Result<(), AppError> {
    if !path.is_file() {
        return Err(AppError::new(
            2,
            format!("JSON file not found: {}", path.display()),
        ));
    }
    if !has_json_extension(path) {
        return Err(AppError::new(
            2,
            format!("Not a .json file: {}", path.display()),
        ));
    }
    Ok(())
}

/// Every `*.json` file under `root`, sorted by display path.
pub fn discover_json_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(root, 0, &mut found);
    found.sort_by_key(|p| display_path(p));
    found
}

fn walk(dir: &Path, depth: usize, found: &mut Vec<PathBuf>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(kind) = entry.file_type() else {
            continue;
        };
        if kind.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !SKIPPED_DIRS.contains(&name) {
                walk(&path, depth + 1, found);
            }
        } else if kind.is_file() && has_json_extension(&path) {
            found.push(path);
        }
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_parsed() {
        assert_eq!(parse_answer("  ", 3), None);
        assert_eq!(parse_answer("Q", 3), Some(Answer::Quit));
        assert_eq!(parse_answer("2", 3), Some(Answer::Index(1)));
        assert_eq!(parse_answer("4", 3), Some(Answer::OutOfRange(4)));
        assert_eq!(parse_answer("0", 3), Some(Answer::OutOfRange(0)));
        assert_eq!(
            parse_answer("data/700.json", 3),
            Some(Answer::Path(PathBuf::from("data/700.json")))
        );
    }

    #[test]
    fn discovery_skips_build_dirs_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("exports")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("b.json"), "[]").unwrap();
        fs::write(root.join("exports/a.JSON"), "[]").unwrap();
        fs::write(root.join("target/skip.json"), "[]").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = discover_json_files(root);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["b.json".to_string(), "exports/a.JSON".to_string()]);
    }

    #[test]
    fn check_rejects_missing_and_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("offers.txt");
        fs::write(&txt, "[]").unwrap();

        assert!(check_json_path(&dir.path().join("nope.json")).is_err());
        assert!(check_json_path(&txt).is_err());
        assert!(check_json_path(dir.path()).is_err());
    }
}
