use std::sync::Arc;
use std::thread;

use alembic::{AlchemySettings, ParserConfig, Registry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/ingredients.txt");
    let registry = Arc::new(
        Registry::from_file(path, &ParserConfig::default()).expect("failed to load registry"),
    );
    let settings = Arc::new(AlchemySettings::default());

    let pairs = [
        ("blue mountain", "wheat"),
        ("nightshade", "deathbell"),
        ("wheat", "giant's toe"),
        ("nightshade", "blue mountain"),
    ];

    let handles: Vec<_> = pairs
        .into_iter()
        .enumerate()
        .map(|(i, (a, b))| {
            let registry = Arc::clone(&registry);
            let settings = Arc::clone(&settings);
            thread::spawn(move || {
                // Each thread keeps its own search session
                let mut session = registry.smart_search(false);
                let shared = session.search(&["fortify"]).ingredients().len();
                let brewed = registry.brew(&[a, b], &settings);
                println!("Thread {i}: {shared} fortify ingredients, {a} + {b} => {brewed:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
