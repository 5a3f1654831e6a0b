//! Hygiene: source-level rules checked at test time.
//!
//! Every failure in this crate is supposed to degrade to a safe default, so
//! anything that can panic or swallow an error without logging it is
//! budgeted. Budgets only shrink. Host globals are reachable from the
//! browser environment module and nowhere else.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "panics" },
    Budget { pattern: ".expect(", max: 0, why: "panics" },
    Budget { pattern: "panic!(", max: 0, why: "panics" },
    Budget { pattern: "unreachable!(", max: 0, why: "panics" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished" },
    Budget { pattern: "let _ =", max: 0, why: "discards an error without logging it" },
    // `SiteConfig::from_env` reads an unset variable as absent.
    Budget { pattern: ".ok()", max: 1, why: "discards an error without logging it" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" },
];

/// Only the browser host may touch these.
const HOST_GLOBALS: &[&str] = &["web_sys::window(", "local_storage(", "match_media(", "std::env::var("];
const HOST_GLOBAL_OWNERS: &[&str] = &["browser.rs", "config.rs"];

/// Production `.rs` files under `src/`, excluding `*_test.rs` modules.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn describe(hits: &[(String, usize)]) -> String {
    hits.iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn source_tree_is_found() {
    let files = source_files();
    assert!(
        files.iter().any(|file| file.path.ends_with("lib.rs")),
        "hygiene scan found no src/lib.rs; run from the crate root"
    );
}

#[test]
fn pattern_budgets_hold() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let total: usize = found.iter().map(|(_, count)| count).sum();
        if total > budget.max {
            failures.push(format!(
                "`{}` ({}) budget exceeded: found {total}, max {}\n{}",
                budget.pattern,
                budget.why,
                budget.max,
                describe(&found)
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn host_globals_stay_in_environment_modules() {
    let files: Vec<SourceFile> = source_files()
        .into_iter()
        .filter(|file| !HOST_GLOBAL_OWNERS.iter().any(|owner| file.path.ends_with(owner)))
        .collect();
    let mut leaks = Vec::new();
    for pattern in HOST_GLOBALS {
        let found = hits(&files, pattern);
        if !found.is_empty() {
            leaks.push(format!("`{pattern}` used outside the host modules:\n{}", describe(&found)));
        }
    }
    assert!(leaks.is_empty(), "{}", leaks.join("\n"));
}
