//! Sample collection walkthrough

use anyhow::Result;

use super::output::Output;
use crate::domain::{item_data, Collection, Field, FieldType, Value};
use crate::storage::CollectionStore;

pub const DEMO_NAME: &str = "Guitar Practice";

/// Builds the sample collection without touching disk
pub fn guitar_practice() -> Collection {
    let mut collection = Collection::new(DEMO_NAME, "music").with_fields(vec![
        Field::new("song_name", FieldType::Text).required(),
        Field::new("artist", FieldType::Text),
        Field::new("difficulty", FieldType::Select).with_options([
            "beginner",
            "intermediate",
            "advanced",
        ]),
        Field::new("practiced_today", FieldType::Boolean),
        Field::new("rating", FieldType::Number),
    ]);

    let songs = [
        ("Wonderwall", "Oasis", "beginner", true, 4),
        ("Stairway to Heaven", "Led Zeppelin", "advanced", false, 5),
        ("Blackbird", "The Beatles", "intermediate", true, 4),
    ];
    for (song, artist, difficulty, practiced, rating) in songs {
        collection.add_item(item_data([
            ("song_name", Value::from(song)),
            ("artist", Value::from(artist)),
            ("difficulty", Value::from(difficulty)),
            ("practiced_today", Value::from(practiced)),
            ("rating", Value::from(rating)),
        ]));
    }

    collection
}

/// Saves the sample, reloads it, and prints the stored file
pub fn run(output: &Output, store: &CollectionStore) -> Result<()> {
    let collection = guitar_practice();
    store.save(&collection)?;

    let path = store.path_for(DEMO_NAME);
    let reloaded = store.load(DEMO_NAME)?;
    tracing::debug!(items = reloaded.items.len(), "demo collection reloaded");

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": reloaded.name,
            "path": path.display().to_string(),
            "items": reloaded.items.len(),
            "fields": reloaded.field_names(),
        }));
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    println!("Saved {} items to {}\n", reloaded.items.len(), path.display());
    println!("{}", content);

    Ok(())
}
