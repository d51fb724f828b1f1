const SETTINGS_PATH: &str = "src/default_settings.toml";
const SECTIONS: [&str; 3] = ["completion", "storage", "codec"];

fn main() {
    println!("cargo:rerun-if-changed={SETTINGS_PATH}");
    // The settings singleton expects the embedded defaults to parse.
    let table: toml::Table = include_str!("src/default_settings.toml")
        .parse()
        .unwrap_or_else(|e| panic!("{SETTINGS_PATH} contains invalid TOML: {e}"));
    for section in SECTIONS {
        if !table.contains_key(section) {
            panic!("{SETTINGS_PATH} is missing the [{section}] table");
        }
    }
}
