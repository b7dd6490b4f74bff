//! The `prizecheck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("prizecheck.toml").exists() {
        println!("prizecheck.toml already exists, skipping.");
    } else {
        std::fs::write("prizecheck.toml", SAMPLE_CONFIG)?;
        println!("Created prizecheck.toml");
    }

    std::fs::create_dir_all("decks")?;
    let example_path = std::path::Path::new("decks/example.toml");
    if example_path.exists() {
        println!("decks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DECK)?;
        println!("Created decks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: prizecheck validate --deck decks/example.toml");
    println!("  2. Run: prizecheck deal --deck decks/example.toml --seed 7");
    println!("  3. Run: prizecheck round --deck decks/example.toml --seed 7 --guess <ids> --used-time 60");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# prizecheck configuration

# Seconds to study the deck before guessing
total_time_secs = 120

# Where your rank and personal best are kept
# profile_path = "${HOME}/.config/prizecheck/profile.json"

# Directory of JSON card data for names and images
# catalog_dir = "data/cards"

# Fixed seed for repeatable deals
# seed = 7
"#;

const EXAMPLE_DECK: &str = r#"[deck]
title = "Gardevoir ex"
source = "https://limitlesstcg.com/decks/list/22011"

[[cards]]
id = "sv4pt5-7"
name = "Ralts"
count = 4

[[cards]]
id = "sv2-85"
name = "Kirlia"
count = 3

[[cards]]
id = "sv1-86"
name = "Gardevoir ex"
count = 2

[[cards]]
id = "sv3-87"
name = "Drifloon"
count = 2

[[cards]]
id = "sv3-88"
name = "Scream Tail"
count = 1

[[cards]]
id = "sv2-185"
name = "Iono"
count = 4

[[cards]]
id = "sv1-196"
name = "Arven"
count = 4

[[cards]]
id = "sv2-172"
name = "Boss's Orders"
count = 2

[[cards]]
id = "sv1-181"
name = "Nest Ball"
count = 4

[[cards]]
id = "sv1-196b"
name = "Ultra Ball"
count = 4

[[cards]]
id = "sv2-188"
name = "Rare Candy"
count = 3

[[cards]]
id = "sv3-190"
name = "Earthen Vessel"
count = 3

[[cards]]
id = "sve-5"
name = "Basic Psychic Energy"
count = 12

[[cards]]
id = "sve-7"
name = "Basic Darkness Energy"
count = 12
"#;
