// 🏗️ Parser Framework
// One parser per input source: items, members, commands
//
// All three files share the same shape (one delimited record per line, a
// leading kind/command code), so they share one reader and differ only in
// how a record's fields become a typed value.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

use crate::command::Command;
use crate::entities::{CategoryTag, Item, ItemKind, Member, MemberProfile};
use crate::error::ParseError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceKind - Which input file a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Items,
    Members,
    Commands,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Items => "items",
            SourceKind::Members => "members",
            SourceKind::Commands => "commands",
        }
    }
}

/// Fields - One record plus the line it was read from, for error reporting
pub struct Fields<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'a StringRecord, line: u64) -> Self {
        Fields { record, line }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, index: usize, field: &'static str) -> Result<&'a str, ParseError> {
        self.record
            .get(index)
            .ok_or(ParseError::MissingField {
                field,
                line: self.line,
            })
    }

    pub fn id(&self, index: usize, field: &'static str) -> Result<u32, ParseError> {
        let value = self.get(index, field)?;
        value.parse().map_err(|_| ParseError::InvalidId {
            field,
            value: value.to_string(),
            line: self.line,
        })
    }

    fn owned(&self, index: usize, field: &'static str) -> Result<String, ParseError> {
        self.get(index, field).map(str::to_string)
    }

    fn tag(&self, index: usize) -> Result<CategoryTag, ParseError> {
        self.get(index, "type")?
            .parse()
            .map_err(|value| ParseError::UnknownCategoryTag {
                value,
                line: self.line,
            })
    }
}

// ============================================================================
// PARSER TRAIT
// ============================================================================

/// RecordParser - Turns the fields of one line into a typed record
pub trait RecordParser {
    type Output;

    fn parse_record(&self, fields: &Fields<'_>) -> Result<Self::Output, ParseError>;

    fn source(&self) -> SourceKind;

    /// Convenience for callers holding already-split fields
    fn parse_fields(&self, fields: &[&str], line: u64) -> Result<Self::Output, ParseError> {
        let record = StringRecord::from(fields.to_vec());
        self.parse_record(&Fields::new(&record, line))
    }
}

/// Read every record of a delimited file through a parser
///
/// Blank and whitespace-only lines are skipped and field counts may vary per
/// line. Surrounding whitespace of each field is trimmed. The first bad record
/// aborts the load.
pub fn load_records<P: RecordParser>(
    parser: &P,
    path: &Path,
    delimiter: u8,
) -> Result<Vec<P::Output>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| {
            format!(
                "Failed to open {} file: {}",
                parser.source().name(),
                path.display()
            )
        })?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to read record {} in {}", index + 1, path.display())
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(index as u64 + 1, |p| p.line());

        let parsed = parser
            .parse_record(&Fields::new(&record, line))
            .with_context(|| format!("Invalid {} record in {}", parser.source().name(), path.display()))?;
        records.push(parsed);
    }

    Ok(records)
}

// ============================================================================
// ITEM PARSER
// ============================================================================

/// `kind,id,title,extra...,tag` with kind B (author, genre), M (publisher,
/// category) or D (director, category, runtime)
pub struct ItemParser;

impl RecordParser for ItemParser {
    type Output = Item;

    fn parse_record(&self, fields: &Fields<'_>) -> Result<Item, ParseError> {
        let code = fields.get(0, "kind")?;
        let id = fields.id(1, "id")?;
        let title = fields.owned(2, "title")?;

        let (kind, tag) = match code {
            "B" => (
                ItemKind::Book {
                    author: fields.owned(3, "author")?,
                    genre: fields.owned(4, "genre")?,
                },
                fields.tag(5)?,
            ),
            "M" => (
                ItemKind::Magazine {
                    publisher: fields.owned(3, "publisher")?,
                    category: fields.owned(4, "category")?,
                },
                fields.tag(5)?,
            ),
            "D" => (
                ItemKind::Dvd {
                    director: fields.owned(3, "director")?,
                    category: fields.owned(4, "category")?,
                    runtime: fields.owned(5, "runtime")?,
                },
                fields.tag(6)?,
            ),
            other => {
                return Err(ParseError::UnknownKind {
                    record: "item",
                    kind: other.to_string(),
                    line: fields.line(),
                })
            }
        };

        Ok(Item::new(id, title, tag, kind))
    }

    fn source(&self) -> SourceKind {
        SourceKind::Items
    }
}

// ============================================================================
// MEMBER PARSER
// ============================================================================

/// `kind,name,id,phone,extra...` with kind S (department, faculty, grade),
/// A (department, faculty, title) or G (occupation)
pub struct MemberParser;

impl RecordParser for MemberParser {
    type Output = Member;

    fn parse_record(&self, fields: &Fields<'_>) -> Result<Member, ParseError> {
        let code = fields.get(0, "kind")?;

        let profile = match code {
            "S" => MemberProfile::Student {
                department: fields.owned(4, "department")?,
                faculty: fields.owned(5, "faculty")?,
                grade: fields.owned(6, "grade")?,
            },
            "A" => MemberProfile::Academic {
                department: fields.owned(4, "department")?,
                faculty: fields.owned(5, "faculty")?,
                title: fields.owned(6, "title")?,
            },
            "G" => MemberProfile::Guest {
                occupation: fields.owned(4, "occupation")?,
            },
            other => {
                return Err(ParseError::UnknownKind {
                    record: "member",
                    kind: other.to_string(),
                    line: fields.line(),
                })
            }
        };

        let name = fields.owned(1, "name")?;
        let id = fields.id(2, "id")?;
        let phone = fields.owned(3, "phone")?;

        Ok(Member::new(id, name, phone, profile))
    }

    fn source(&self) -> SourceKind {
        SourceKind::Members
    }
}

// ============================================================================
// COMMAND PARSER
// ============================================================================

/// `borrow,member,item,date` | `return,member,item` | `pay,member` |
/// `displayMembers` (alias `displayUsers`) | `displayItems`
pub struct CommandParser {
    date_format: String,
}

impl CommandParser {
    pub fn new(date_format: impl Into<String>) -> Self {
        CommandParser {
            date_format: date_format.into(),
        }
    }

    fn date(&self, fields: &Fields<'_>, index: usize) -> Result<NaiveDate, ParseError> {
        let value = fields.get(index, "date")?;
        NaiveDate::parse_from_str(value, &self.date_format).map_err(|_| ParseError::InvalidDate {
            value: value.to_string(),
            format: self.date_format.clone(),
            line: fields.line(),
        })
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        CommandParser::new("%d/%m/%Y")
    }
}

impl RecordParser for CommandParser {
    type Output = Command;

    fn parse_record(&self, fields: &Fields<'_>) -> Result<Command, ParseError> {
        match fields.get(0, "command")? {
            "borrow" => Ok(Command::Borrow {
                member: fields.id(1, "member id")?,
                item: fields.id(2, "item id")?,
                date: self.date(fields, 3)?,
            }),
            "return" => Ok(Command::Return {
                member: fields.id(1, "member id")?,
                item: fields.id(2, "item id")?,
            }),
            "pay" => Ok(Command::Pay {
                member: fields.id(1, "member id")?,
            }),
            "displayMembers" | "displayUsers" => Ok(Command::DisplayMembers),
            "displayItems" => Ok(Command::DisplayItems),
            other => Err(ParseError::UnknownCommand {
                value: other.to_string(),
                line: fields.line(),
            }),
        }
    }

    fn source(&self) -> SourceKind {
        SourceKind::Commands
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MemberCategory;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ========================================================================
    // Items
    // ========================================================================

    #[test]
    fn test_parse_book() {
        let item = ItemParser
            .parse_fields(&["B", "1", "Dune", "Frank Herbert", "Science Fiction", "normal"], 1)
            .unwrap();

        assert_eq!(item.id, 1);
        assert_eq!(item.title, "Dune");
        assert_eq!(item.tag, CategoryTag::Normal);
        assert_eq!(item.info_line(), "Author: Frank Herbert Genre: Science Fiction");
    }

    #[test]
    fn test_parse_dvd_has_runtime_before_tag() {
        let item = ItemParser
            .parse_fields(&["D", "7", "Alien", "Ridley Scott", "Horror", "117 min", "rare"], 1)
            .unwrap();

        assert_eq!(item.tag, CategoryTag::Rare);
        assert_eq!(
            item.kind,
            ItemKind::Dvd {
                director: "Ridley Scott".to_string(),
                category: "Horror".to_string(),
                runtime: "117 min".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_item_unknown_kind() {
        let err = ItemParser
            .parse_fields(&["X", "1", "Mystery", "a", "b", "normal"], 4)
            .unwrap_err();

        assert_eq!(
            err,
            ParseError::UnknownKind {
                record: "item",
                kind: "X".to_string(),
                line: 4,
            }
        );
    }

    #[test]
    fn test_parse_item_missing_tag() {
        let err = ItemParser
            .parse_fields(&["M", "2", "Nature", "Springer", "Science"], 2)
            .unwrap_err();

        assert_eq!(err, ParseError::MissingField { field: "type", line: 2 });
    }

    #[test]
    fn test_parse_item_bad_id_and_tag() {
        let bad_id = ItemParser
            .parse_fields(&["B", "one", "Dune", "a", "b", "normal"], 1)
            .unwrap_err();
        assert!(matches!(bad_id, ParseError::InvalidId { .. }));

        let bad_tag = ItemParser
            .parse_fields(&["B", "1", "Dune", "a", "b", "precious"], 1)
            .unwrap_err();
        assert!(matches!(bad_tag, ParseError::UnknownCategoryTag { .. }));
    }

    // ========================================================================
    // Members
    // ========================================================================

    #[test]
    fn test_parse_members() {
        let student = MemberParser
            .parse_fields(&["S", "Ada", "10", "555-0101", "CS", "Engineering", "3"], 1)
            .unwrap();
        let academic = MemberParser
            .parse_fields(&["A", "Grace", "20", "555-0202", "Math", "Science", "Prof."], 2)
            .unwrap();
        let guest = MemberParser
            .parse_fields(&["G", "Linus", "30", "555-0303", "Engineer"], 3)
            .unwrap();

        assert_eq!(student.id, 10);
        assert_eq!(student.category(), MemberCategory::Student);
        assert_eq!(academic.category(), MemberCategory::AcademicMember);
        assert_eq!(guest.category(), MemberCategory::Guest);
        assert_eq!(guest.phone, "555-0303");
    }

    #[test]
    fn test_parse_member_unknown_kind() {
        let err = MemberParser
            .parse_fields(&["Z", "Nobody", "1", "555"], 9)
            .unwrap_err();

        assert!(matches!(err, ParseError::UnknownKind { record: "member", line: 9, .. }));
    }

    // ========================================================================
    // Commands
    // ========================================================================

    #[test]
    fn test_parse_commands() {
        let parser = CommandParser::default();

        assert_eq!(
            parser.parse_fields(&["borrow", "10", "1", "05/02/2024"], 1).unwrap(),
            Command::Borrow {
                member: 10,
                item: 1,
                date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            }
        );
        assert_eq!(
            parser.parse_fields(&["return", "10", "1"], 2).unwrap(),
            Command::Return { member: 10, item: 1 }
        );
        assert_eq!(
            parser.parse_fields(&["pay", "10"], 3).unwrap(),
            Command::Pay { member: 10 }
        );
        assert_eq!(
            parser.parse_fields(&["displayMembers"], 4).unwrap(),
            Command::DisplayMembers
        );
        assert_eq!(
            parser.parse_fields(&["displayUsers"], 5).unwrap(),
            Command::DisplayMembers
        );
        assert_eq!(
            parser.parse_fields(&["displayItems"], 6).unwrap(),
            Command::DisplayItems
        );
    }

    #[test]
    fn test_parse_command_errors() {
        let parser = CommandParser::default();

        let unknown = parser.parse_fields(&["renew", "1", "2"], 1).unwrap_err();
        assert!(matches!(unknown, ParseError::UnknownCommand { .. }));

        let bad_date = parser.parse_fields(&["borrow", "1", "2", "2024-01-05"], 2).unwrap_err();
        assert!(matches!(bad_date, ParseError::InvalidDate { line: 2, .. }));

        let missing = parser.parse_fields(&["pay"], 3).unwrap_err();
        assert_eq!(missing, ParseError::MissingField { field: "member id", line: 3 });
    }

    // ========================================================================
    // File loading
    // ========================================================================

    #[test]
    fn test_load_records_from_file() {
        let file = write_temp(
            "B,1,Dune,Frank Herbert,Science Fiction,normal\n\
             \n\
             M, 2 ,Nature,Springer,Science,limited\n",
        );

        let items = load_records(&ItemParser, file.path(), b',').unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, 2);
        assert_eq!(items[1].tag, CategoryTag::Limited);
    }

    #[test]
    fn test_load_records_skips_whitespace_only_lines() {
        let commands = write_temp("displayItems\n   \n\t\npay,1\n");
        let parsed = load_records(&CommandParser::default(), commands.path(), b',').unwrap();
        assert_eq!(parsed, vec![Command::DisplayItems, Command::Pay { member: 1 }]);

        let items = write_temp("B,1,Dune,Frank Herbert,Science Fiction,normal\n  \n");
        assert_eq!(load_records(&ItemParser, items.path(), b',').unwrap().len(), 1);

        let members = write_temp(" \t \nG,Linus,30,555-0303,Engineer\n");
        let loaded = load_records(&MemberParser, members.path(), b',').unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 30);
    }

    #[test]
    fn test_load_records_custom_delimiter() {
        let file = write_temp("G;Linus;30;555-0303;Engineer\n");

        let members = load_records(&MemberParser, file.path(), b';').unwrap();

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Linus");
    }

    #[test]
    fn test_load_records_reports_bad_line() {
        let file = write_temp("borrow,1,2,01/01/2024\nlend,1,2\n");

        let err = load_records(&CommandParser::default(), file.path(), b',').unwrap_err();
        let parse_err = err.downcast_ref::<ParseError>().unwrap();

        assert_eq!(
            parse_err,
            &ParseError::UnknownCommand {
                value: "lend".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_load_records_missing_file() {
        let result = load_records(&ItemParser, Path::new("/nonexistent/items.txt"), b',');
        assert!(result.is_err());
    }
}
