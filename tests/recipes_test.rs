//! Checks on the recipe database shipped with the repository.

use std::path::Path;

use letthemcook::types::LabelSet;
use letthemcook::RecipeStore;

fn shipped_store() -> RecipeStore {
    RecipeStore::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("recipes_db.json")).unwrap()
}

#[test]
fn shipped_database_covers_default_labels() {
    let store = shipped_store();
    assert!(store.missing(&LabelSet::default()).is_empty());
}

#[test]
fn shipped_records_are_complete() {
    let store = shipped_store();
    for label in LabelSet::default().iter() {
        let record = store.lookup(&label.id);
        assert!(record.name.is_some(), "{} has no name", label.id);
        assert!(record.calories.is_some(), "{} has no calories", label.id);
        assert!(record.ingredients.is_some(), "{} has no ingredients", label.id);
        assert!(record.instructions.is_some(), "{} has no instructions", label.id);
    }
}

#[test]
fn numeric_calories_are_stringified() {
    let store = shipped_store();
    assert_eq!(store.lookup("baklava").calories.as_deref(), Some("334"));
}
