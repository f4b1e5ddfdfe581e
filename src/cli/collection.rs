//! Collection CLI commands

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::{Collection, Field, FieldType, ItemData, Value};
use crate::storage::{table, CollectionStore};

pub fn list(output: &Output, store: &CollectionStore) -> Result<()> {
    let names = store.list()?;
    tracing::debug!(count = names.len(), "listing collections");

    // Item counts need a full load; a broken file should not hide the rest
    let entries: Vec<(String, Result<usize, String>)> = names
        .into_iter()
        .map(|name| {
            let count = store
                .load(&name)
                .map(|c| c.items.len())
                .map_err(|e| format!("{:#}", anyhow::Error::from(e)));
            (name, count)
        })
        .collect();

    if output.is_json() {
        let items: Vec<_> = entries
            .iter()
            .map(|(name, count)| match count {
                Ok(n) => serde_json::json!({ "name": name, "items": n }),
                Err(e) => serde_json::json!({ "name": name, "error": e }),
            })
            .collect();
        output.data(&items);
    } else if entries.is_empty() {
        println!("No collections found.");
    } else {
        for (name, count) in entries {
            match count {
                Ok(n) => println!("{} ({} items)", name, n),
                Err(_) => println!("{} (error loading)", name),
            }
        }
    }

    Ok(())
}

pub fn show(output: &Output, store: &CollectionStore, name: &str) -> Result<()> {
    let collection = store.load(name)?;

    if output.is_json() {
        output.data(&collection);
        return Ok(());
    }

    println!("Collection: {} ({})", collection.name, collection.collection_type);
    println!("Created: {}", collection.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", collection.updated_at.format("%Y-%m-%d %H:%M"));

    if !collection.fields.is_empty() {
        println!("\nFields:");
        for field in &collection.fields {
            let mut line = format!("  {} ({}", field.name, field.field_type);
            if field.required {
                line.push_str(", required");
            }
            line.push(')');
            if !field.options.is_empty() {
                line.push_str(&format!(" [{}]", field.options.join(", ")));
            }
            println!("{}", line);
        }
    }

    if collection.items.is_empty() {
        println!("\nNo items.");
    } else {
        println!("\nItems ({}):", collection.items.len());
        for line in render_grid(&collection) {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Lays items out in aligned columns, one per field
fn render_grid(collection: &Collection) -> Vec<String> {
    let header: Vec<String> = collection.fields.iter().map(|f| f.name.clone()).collect();
    let rows: Vec<Vec<String>> = collection
        .items
        .iter()
        .map(|item| {
            collection
                .fields
                .iter()
                .map(|f| item.get(&f.name).map(display_value).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(&header)];
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Boolean(true) => table::CHECK.to_string(),
        Value::Boolean(false) => table::CROSS.to_string(),
        other => other.to_string(),
    }
}

pub fn new(
    output: &Output,
    store: &CollectionStore,
    name: &str,
    collection_type: &str,
    field_specs: &[String],
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Collection name cannot be empty");
    }
    if store.exists(name) {
        bail!(
            "Collection already exists: {} ({})",
            name,
            store.path_for(name).display()
        );
    }

    let fields = field_specs
        .iter()
        .map(|spec| parse_field_spec(spec))
        .collect::<Result<Vec<_>>>()?;

    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.name == field.name) {
            bail!("Duplicate field name: {}", field.name);
        }
    }

    let collection = Collection::new(name, collection_type).with_fields(fields);
    store.save(&collection)?;
    let path = store.path_for(name);

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": collection.name,
            "type": collection.collection_type,
            "fields": collection.field_names(),
            "path": path.display().to_string(),
        }));
    } else {
        output.success(&format!(
            "Created collection: {} ({})",
            collection.name,
            path.display()
        ));
    }

    Ok(())
}

/// Parses `name:type[:required][:opt1,opt2,...]`
pub fn parse_field_spec(spec: &str) -> Result<Field> {
    let mut parts = spec.split(':');

    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        bail!("Field name cannot be empty in '{}'", spec);
    }

    let field_type: FieldType = match parts.next() {
        Some(t) => t
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("Invalid field spec '{}'", spec))?,
        None => FieldType::Text,
    };

    let mut field = Field::new(name, field_type);
    for part in parts {
        let part = part.trim();
        if part.eq_ignore_ascii_case("required") {
            field = field.required();
        } else if !part.is_empty() {
            let options: Vec<&str> = part
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .collect();
            field.options.extend(options.into_iter().map(String::from));
        }
    }

    Ok(field)
}

pub fn add(output: &Output, store: &CollectionStore, name: &str, assignments: &[String]) -> Result<()> {
    let mut collection = store.load(name)?;

    let mut data = ItemData::new();
    for assignment in assignments {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected KEY=VALUE, got '{}'", assignment))?;
        let key = key.trim();

        let field = collection.field(key).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown field '{}' (fields: {})",
                key,
                collection.field_names().join(", ")
            )
        })?;

        if raw.trim().is_empty() {
            continue;
        }
        data.insert(key.to_string(), parse_value(field, raw.trim())?);
    }

    for field in collection.fields.iter().filter(|f| f.required) {
        if !data.contains_key(&field.name) {
            bail!("Missing required field: {}", field.name);
        }
    }

    if data.is_empty() {
        bail!("Item has no values");
    }

    let id = collection.add_item(data).id.clone();
    store.save(&collection)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "collection": collection.name,
            "id": id.to_string(),
            "items": collection.items.len(),
        }));
    } else {
        output.success(&format!("Added item {} to {}", id, collection.name));
    }

    Ok(())
}

/// Converts command-line text to a value of the field's type
pub fn parse_value(field: &Field, raw: &str) -> Result<Value> {
    match &field.field_type {
        FieldType::Number => {
            let value = if raw.contains('.') {
                raw.parse::<f64>().ok().map(Value::Real)
            } else {
                raw.parse::<i64>().ok().map(Value::Integer)
            };
            value.ok_or_else(|| anyhow::anyhow!("Invalid number for {}: {}", field.name, raw))
        }
        FieldType::Boolean => match raw.to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | table::CHECK => Ok(Value::Boolean(true)),
            "false" | "no" | "n" | "0" | table::CROSS => Ok(Value::Boolean(false)),
            _ => bail!("Invalid boolean for {}: {}", field.name, raw),
        },
        FieldType::Select if !field.options.is_empty() => {
            if field.options.iter().any(|o| o == raw) {
                Ok(Value::Text(raw.to_string()))
            } else {
                bail!(
                    "Invalid option for {}: {} (expected one of: {})",
                    field.name,
                    raw,
                    field.options.join(", ")
                )
            }
        }
        _ => Ok(Value::Text(raw.to_string())),
    }
}

pub fn delete(output: &Output, store: &CollectionStore, name: &str) -> Result<()> {
    store.delete(name)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "name": name, "deleted": true }));
    } else {
        output.success(&format!("Deleted collection: {}", name));
    }

    Ok(())
}

pub fn path(output: &Output, store: &CollectionStore, name: &str) -> Result<()> {
    let path = store.path_for(name);

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name,
            "path": path.display().to_string(),
            "exists": store.exists(name),
        }));
    } else {
        println!("{}", path.display());
    }

    Ok(())
}
