//! Format-preserving editing of `pyproject.toml`.
//!
//! The manifest is loaded as a [`DocumentMut`], so comments, ordering and
//! spacing of everything that is not a templated field survive the rewrite.
//! Replaced values keep the whitespace and trailing comment around them.
//! Missing fields are added to the table that owns them, whether that table
//! is written as a `[header]` section or inline (`urls = { ... }`).
//!
//! A leading byte-order mark and CRLF line endings are carried over to the
//! output.

use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, TableLike, Value};
use tracing::debug;

use crate::domain::{DomainError, ManifestFields, entities::Author};

const BOM: char = '\u{feff}';

/// Read `[project].name` from manifest source.
pub fn project_name(source: &str) -> Result<String, DomainError> {
    let (_, body) = split_bom(source);
    let doc = parse(body)?;
    let project = doc
        .get("project")
        .ok_or(DomainError::ManifestFieldMissing { field: "project" })?
        .as_table_like()
        .ok_or_else(|| not_a_table("project"))?;

    let name = project
        .get("name")
        .ok_or(DomainError::ManifestFieldMissing {
            field: "project.name",
        })?;
    name.as_str()
        .map(str::to_string)
        .ok_or_else(|| not_a_string("project.name", name))
}

/// Rewrite the templated fields of a manifest, preserving everything else.
pub fn rewrite(source: &str, fields: &ManifestFields) -> Result<String, DomainError> {
    let (bom, body) = split_bom(source);
    let mut doc = parse(body)?;
    let overrides = &fields.overrides;

    let project_item = doc
        .get_mut("project")
        .ok_or(DomainError::ManifestFieldMissing { field: "project" })?;
    let inline_project = project_item.is_inline_table();
    let project = project_item
        .as_table_like_mut()
        .ok_or_else(|| not_a_table("project"))?;

    let name = project
        .get_mut("name")
        .ok_or(DomainError::ManifestFieldMissing {
            field: "project.name",
        })?;
    replace_string(name, "project.name", fields.name.as_str())?;

    let mut inserted = false;
    let scalars = [
        ("version", "project.version", &overrides.version),
        ("description", "project.description", &overrides.description),
    ];
    for (key, field, wanted) in scalars {
        let Some(wanted) = wanted else { continue };
        inserted |= upsert_string(project, key, field, wanted)?;
    }

    if let Some(author) = &overrides.author {
        let authors = authors_value(author);
        match project.get_mut("authors") {
            Some(existing) => replace_value(existing, authors),
            None => {
                project.insert("authors", Item::Value(authors));
                inserted = true;
            }
        }
    }

    let urls = [
        (
            "Documentation",
            "project.urls.Documentation",
            overrides.effective_documentation_url(),
        ),
        (
            "Repository",
            "project.urls.Repository",
            overrides.repository_url.clone(),
        ),
    ];
    if urls.iter().any(|(_, _, wanted)| wanted.is_some()) {
        if !project.contains_key("urls") {
            let table = if inline_project {
                Item::Value(Value::InlineTable(InlineTable::new()))
            } else {
                Item::Table(Table::new())
            };
            project.insert("urls", table);
        }
        let urls_item = project
            .get_mut("urls")
            .ok_or(DomainError::ManifestFieldMissing {
                field: "project.urls",
            })?;
        let inline_urls = urls_item.is_inline_table();
        let table = urls_item
            .as_table_like_mut()
            .ok_or_else(|| not_a_table("project.urls"))?;

        let mut grew = false;
        for (key, field, wanted) in &urls {
            let Some(wanted) = wanted else { continue };
            grew |= upsert_string(table, key, *field, wanted)?;
        }
        if grew && inline_urls {
            table.fmt();
        }
    }

    if inserted && inline_project {
        project.fmt();
    }

    let output = restore_line_endings(source, &format!("{bom}{doc}"));
    verify(&output, fields)?;
    debug!(fields = ?fields.touched_keys(), "Manifest rewritten");
    Ok(output)
}

/// Re-read the rewritten manifest and confirm every requested value landed.
fn verify(output: &str, fields: &ManifestFields) -> Result<(), DomainError> {
    let failed = |reason: String| DomainError::ManifestFieldShape {
        field: "project",
        reason,
    };

    let (_, body) = split_bom(output);
    let doc = body
        .parse::<DocumentMut>()
        .map_err(|e| failed(format!("rewritten manifest no longer parses: {e}")))?;
    let string_at = |path: &[&str]| -> Option<String> {
        let mut table = doc.get("project")?.as_table_like()?;
        let (last, parents) = path.split_last()?;
        for key in parents {
            table = table.get(key)?.as_table_like()?;
        }
        table.get(last)?.as_str().map(str::to_string)
    };

    let overrides = &fields.overrides;
    let expected = [
        (vec!["name"], Some(fields.name.as_str().to_string())),
        (vec!["version"], overrides.version.clone()),
        (vec!["description"], overrides.description.clone()),
        (
            vec!["urls", "Documentation"],
            overrides.effective_documentation_url(),
        ),
        (vec!["urls", "Repository"], overrides.repository_url.clone()),
    ];
    for (path, wanted) in expected {
        let Some(wanted) = wanted else { continue };
        if string_at(path.as_slice()).as_deref() != Some(wanted.as_str()) {
            return Err(failed(format!(
                "'{}' was not written as expected",
                path.join(".")
            )));
        }
    }
    Ok(())
}

fn parse(body: &str) -> Result<DocumentMut, DomainError> {
    body.parse::<DocumentMut>()
        .map_err(|e| DomainError::ManifestSyntax {
            reason: e.to_string(),
        })
}

fn split_bom(source: &str) -> (&str, &str) {
    match source.strip_prefix(BOM) {
        Some(body) => (&source[..BOM.len_utf8()], body),
        None => ("", source),
    }
}

/// Use the source's line ending throughout the output.
///
/// Lines the editor emits always end in `\n`, even in a CRLF file.
fn restore_line_endings(source: &str, output: &str) -> String {
    if source.contains("\r\n") {
        output.replace("\r\n", "\n").replace('\n', "\r\n")
    } else {
        output.to_string()
    }
}

/// Replace an existing string value or insert a new key. Returns `true` when
/// the key was inserted.
fn upsert_string(
    table: &mut dyn TableLike,
    key: &str,
    field: &'static str,
    wanted: &str,
) -> Result<bool, DomainError> {
    match table.get_mut(key) {
        Some(existing) => {
            replace_string(existing, field, wanted)?;
            Ok(false)
        }
        None => {
            table.insert(key, Item::Value(Value::from(wanted)));
            Ok(true)
        }
    }
}

fn replace_string(item: &mut Item, field: &'static str, wanted: &str) -> Result<(), DomainError> {
    if !item.is_str() {
        return Err(not_a_string(field, item));
    }
    replace_value(item, Value::from(wanted));
    Ok(())
}

/// Swap in `value`, keeping the whitespace and comment around the old one.
fn replace_value(item: &mut Item, mut value: Value) {
    if let Some(old) = item.as_value() {
        *value.decor_mut() = old.decor().clone();
    }
    *item = Item::Value(value);
}

fn authors_value(author: &Author) -> Value {
    let mut entry = InlineTable::new();
    entry.insert("name", Value::from(author.name.as_str()));
    if let Some(email) = &author.email {
        entry.insert("email", Value::from(email.as_str()));
    }
    let mut authors = Array::new();
    authors.push(entry);
    Value::Array(authors)
}

fn not_a_table(field: &'static str) -> DomainError {
    DomainError::ManifestFieldShape {
        field,
        reason: "expected a table".into(),
    }
}

fn not_a_string(field: &'static str, item: &Item) -> DomainError {
    DomainError::ManifestFieldShape {
        field,
        reason: format!("expected a string, found {}", item.type_name()),
    }
}
