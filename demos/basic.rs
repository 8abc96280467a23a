use alembic::{ParserConfig, Registry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/ingredients.txt");
    let registry =
        Registry::from_file(path, &ParserConfig::default()).expect("failed to load registry");

    println!("{registry}");
    for ingredient in registry.iter() {
        println!("  {ingredient}");
    }

    // Re-render the registry in its text format
    println!("\n{}", registry.to_text());
}
