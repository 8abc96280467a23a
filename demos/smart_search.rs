use alembic::{ParserConfig, RankBy, Registry, SearchOutcome, SearchTarget};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/ingredients.txt");
    let registry =
        Registry::from_file(path, &ParserConfig::default()).expect("failed to load registry");

    // Union search over names
    let found = registry.find_any(&["wheat", "toe"], false, SearchTarget::Name);
    println!("wheat | toe:");
    for ingredient in found {
        println!("  {}", ingredient.name);
    }

    // Intersection over effects, narrowed one term at a time
    let mut session = registry.smart_search(false);
    let outcome = session.search(&["fortify health", "regen"]);
    println!("\nfortify health & regen:\n{outcome}");

    match session.refine("magicka") {
        SearchOutcome::Found(found) => {
            println!("\n... & magicka:");
            for ingredient in found {
                println!("  {}", ingredient.name);
            }
        }
        exhausted @ SearchOutcome::Exhausted { .. } => println!("\n{exhausted}"),
    }

    if let Some(best) = registry.find_best_by_effect("Damage Health", RankBy::Magnitude, &[] as &[&str]) {
        println!("\nstrongest Damage Health: {best}");
    }
}
