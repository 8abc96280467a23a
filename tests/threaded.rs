use std::sync::Arc;
use std::thread;

use alembic::{AlchemySettings, Effect, Ingredient, Registry};

fn registry() -> Registry {
    Registry::from_ingredients([
        Ingredient::new(
            "Blue Mountain Flower",
            [Effect::new("Restore Health", 2.0, 0), Effect::new("Fortify Conjuration", 5.0, 60)],
        ),
        Ingredient::new(
            "Wheat",
            [Effect::new("Restore Health", 1.0, 0), Effect::new("Fortify Health", 4.0, 600)],
        ),
        Ingredient::new("Salt Pile", [Effect::new("Restore Magicka", 1.0, 0)]),
    ])
}

#[test]
fn registry_is_shared_read_only() {
    let registry = Arc::new(registry());
    let settings = Arc::new(AlchemySettings::default());

    let mut handles = vec![];

    // Each thread runs its own smart-search session over the shared registry.
    for (first, second) in [("restore", "fortify"), ("restore", "magicka"), ("fortify", "conjuration")] {
        let reg = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let mut session = reg.smart_search(false);
            session.search(&[first]);
            session
                .refine(second)
                .ingredients()
                .iter()
                .map(|i| i.name.clone())
                .collect::<Vec<_>>()
        }));
    }

    let results: Vec<Vec<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], ["Blue Mountain Flower", "Wheat"]);
    assert_eq!(results[1], ["Salt Pile"]);
    assert_eq!(results[2], ["Blue Mountain Flower"]);

    let reg = Arc::clone(&registry);
    let cfg = Arc::clone(&settings);
    let brewed = thread::spawn(move || reg.brew(&["blue", "wheat"], &cfg).map(|p| p.name().to_owned()))
        .join()
        .unwrap();
    assert_eq!(brewed.unwrap(), "Potion of Restore Health");
}

#[test]
fn registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<AlchemySettings>();
}
