// 🏛️ Library System - Load inputs, replay commands, write results
//
// Order matters: the output file is truncated before any input is read, so
// a failed load leaves an empty output rather than a stale one.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::LendingConfig;
use crate::engine::{LendingEngine, ReplaySummary};
use crate::error::LendingError;
use crate::parser::{load_records, CommandParser, ItemParser, MemberParser};
use crate::sink::FileSink;
use crate::store::RecordStore;

/// The four files of one run
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub items: PathBuf,
    pub members: PathBuf,
    pub commands: PathBuf,
    pub output: PathBuf,
}

/// Process exit code for a failed run: 1 for an out-of-order borrow, 2 otherwise
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<LendingError>() {
        Some(LendingError::NonSequentialBorrow { .. }) => 1,
        _ => 2,
    }
}

pub fn run(paths: &RunPaths, config: &LendingConfig) -> Result<ReplaySummary> {
    let sink = FileSink::create(&paths.output)?;
    let delimiter = config.delimiter_byte()?;

    let items = load_records(&ItemParser, &paths.items, delimiter)?;
    let members = load_records(&MemberParser, &paths.members, delimiter)?;
    let commands = load_records(
        &CommandParser::new(config.date_format.clone()),
        &paths.commands,
        delimiter,
    )?;
    info!(
        items = items.len(),
        members = members.len(),
        commands = commands.len(),
        "inputs loaded"
    );

    let store = RecordStore::from_records(items, members).context("Invalid input records")?;
    let mut engine = LendingEngine::new(store, sink, config);
    info!(today = %engine.today(), "replaying commands");

    engine.replay(&commands)?;
    let (summary, _) = engine.finish()?;

    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, StoreError};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    const ITEMS: &str = "\
B,1,Dune,Frank Herbert,Science Fiction,normal
M,2,Nature,Springer,Science,limited
D,3,Alien,Ridley Scott,Horror,117 min,rare
";

    const MEMBERS: &str = "\
S,Ada Lovelace,10,555-0101,Computer Engineering,Engineering,3
A,Grace Hopper,20,555-0202,Mathematics,Science,Prof.
G,Linus,30,555-0303,Engineer
";

    fn setup(items: &str, members: &str, commands: &str) -> (TempDir, RunPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = RunPaths {
            items: dir.path().join("items.txt"),
            members: dir.path().join("members.txt"),
            commands: dir.path().join("commands.txt"),
            output: dir.path().join("output.txt"),
        };
        fs::write(&paths.items, items).unwrap();
        fs::write(&paths.members, members).unwrap();
        fs::write(&paths.commands, commands).unwrap();
        (dir, paths)
    }

    fn config() -> LendingConfig {
        LendingConfig {
            today: NaiveDate::from_ymd_opt(2024, 1, 10),
            ..LendingConfig::default()
        }
    }

    fn output(paths: &RunPaths) -> Vec<String> {
        fs::read_to_string(&paths.output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_full_run() {
        let (_dir, paths) = setup(
            ITEMS,
            MEMBERS,
            "borrow,10,1,01/01/2024\n\
             borrow,30,3,02/01/2024\n\
             borrow,20,1,03/01/2024\n\
             return,10,1\n\
             pay,30\n\
             displayItems\n",
        );

        let summary = run(&paths, &config()).unwrap();

        assert_eq!(
            output(&paths),
            vec![
                "Ada Lovelace successfully borrowed! Dune",
                "Linus cannot borrow rare item!",
                "Grace Hopper cannot borrow Dune, it is not available!",
                "Ada Lovelace successfully returned Dune",
                "Linus has paid penalty",
                " ",
                " ",
                "------ Item Information for 1 ------",
                "ID: 1 Name: Dune Status: Available",
                "Author: Frank Herbert Genre: Science Fiction",
                " ",
                "------ Item Information for 2 ------",
                "ID: 2 Name: Nature Status: Available",
                "Publisher: Springer Category: Science",
                " ",
                "------ Item Information for 3 ------",
                "ID: 3 Name: Alien Status: Available",
                "Director: Ridley Scott Category: Horror Runtime: 117 min",
            ]
        );
        assert_eq!(summary.commands, 6);
        assert_eq!(summary.borrowed, 1);
        assert_eq!(summary.rejected(), 2);
    }

    #[test]
    fn test_display_members_run() {
        let (_dir, paths) = setup(ITEMS, MEMBERS, "displayUsers\n");

        run(&paths, &config()).unwrap();

        assert_eq!(
            output(&paths),
            vec![
                " ",
                " ",
                "------ User Information for 10 ------",
                "Name: Ada Lovelace Phone: 555-0101",
                "Faculty: Engineering Department: Computer Engineering Grade: 3th",
                " ",
                "------ User Information for 20 ------",
                "Name: Prof. Grace Hopper Phone: 555-0202",
                "Faculty: Science Department: Mathematics",
                " ",
                "------ User Information for 30 ------",
                "Name: Linus Phone: 555-0303",
                "Occupation: Engineer",
            ]
        );
    }

    #[test]
    fn test_non_sequential_run_stops_output() {
        let (_dir, paths) = setup(
            ITEMS,
            MEMBERS,
            "borrow,10,1,05/01/2024\n\
             borrow,20,2,04/01/2024\n\
             displayItems\n",
        );

        let err = run(&paths, &config()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LendingError>(),
            Some(LendingError::NonSequentialBorrow { .. })
        ));
        assert_eq!(exit_code(&err), 1);
        assert_eq!(
            output(&paths),
            vec![
                "Ada Lovelace successfully borrowed! Dune",
                "Borrow dates must be sequential.",
            ]
        );
    }

    #[test]
    fn test_malformed_member_fails_before_replay() {
        let (_dir, paths) = setup(ITEMS, "X,Nobody,1,555\n", "displayItems\n");
        fs::write(&paths.output, "previous run\n").unwrap();

        let err = run(&paths, &config()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::UnknownKind { record: "member", .. })
        ));
        // Output was truncated, nothing replayed
        assert!(output(&paths).is_empty());
    }

    #[test]
    fn test_duplicate_item_ids_rejected() {
        let (_dir, paths) = setup(
            "B,1,Dune,Frank Herbert,Science Fiction,normal\nB,1,Emma,Jane Austen,Novel,normal\n",
            MEMBERS,
            "",
        );

        let err = run(&paths, &config()).unwrap_err();
        assert_eq!(err.downcast_ref::<StoreError>(), Some(&StoreError::DuplicateItem(1)));
    }

    #[test]
    fn test_missing_input_file() {
        let (dir, mut paths) = setup(ITEMS, MEMBERS, "");
        paths.commands = dir.path().join("absent.txt");

        assert!(run(&paths, &config()).is_err());
    }

    #[test]
    fn test_exit_code_for_other_failures() {
        let (_dir, paths) = setup(ITEMS, MEMBERS, "pay,99\n");
        let unknown_member = run(&paths, &config()).unwrap_err();
        assert_eq!(exit_code(&unknown_member), 2);

        let (_dir, paths) = setup(ITEMS, "X,Nobody,1,555\n", "");
        let malformed = run(&paths, &config()).unwrap_err();
        assert_eq!(exit_code(&malformed), 2);

        let io = anyhow::Error::from(LendingError::Output(std::io::Error::other("disk full")));
        assert_eq!(exit_code(&io), 2);
    }
}
