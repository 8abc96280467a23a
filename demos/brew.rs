use alembic::{AlchemySettings, BuildError, Registry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/demos");
    let settings = AlchemySettings::from_file(format!("{dir}/settings.toml"))
        .expect("failed to read settings");
    let registry = Registry::from_file(format!("{dir}/ingredients.txt"), &settings.parser)
        .expect("failed to load registry");

    let recipes: &[&[&str]] = &[
        &["blue mountain", "wheat"],
        &["nightshade", "deathbell"],
        &["wheat", "giant's toe", "blue mountain"],
        &["wheat"],
        &["nightshade", "giant's toe"],
    ];

    for &recipe in recipes {
        match registry.brew(recipe, &settings) {
            Ok(potion) => println!("{} => {potion}", recipe.join(" + ")),
            Err(BuildError::BuildFailed) => {
                println!("{} => nothing in common", recipe.join(" + "));
            }
            Err(err) => println!("{} => error: {err}", recipe.join(" + ")),
        }
    }

    // Mixed effects split by the pure-mixture perk
    let mut pure = AlchemySettings::default();
    pure.perks.pure_mixture = true;
    match registry.brew(&["blue mountain", "wheat", "nightshade"], &pure) {
        Ok(potion) => println!("\npure: {potion}"),
        Err(err) => println!("\npure: {err}"),
    }
}
