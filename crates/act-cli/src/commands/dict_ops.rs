use std::fs;
use std::path::Path;
use std::process;

use act_engine::{latin1, settings, Dictionary};

use super::text_to_latin1;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Dictionary path from `--dict`, falling back to `storage.dict_file`.
pub fn dict_path(dict: Option<&str>) -> &Path {
    Path::new(dict.unwrap_or(&settings::settings().storage.dict_file))
}

pub fn learn(path: &Path, inputs: &[String]) {
    let mut dict = die!(Dictionary::open(path), "Error opening dictionary: {}");
    let mut learned = 0;
    for input in inputs {
        let bytes = die!(fs::read(input), "Error reading {input}: {}");
        let text = text_to_latin1(bytes);
        let n = die!(dict.add_text(&text), "Error learning {input}: {}");
        println!("{input}: {n} words");
        learned += n;
    }
    die!(dict.save(path), "Error saving dictionary: {}");
    println!("Learned {learned} words, {} distinct in dictionary", dict.len());
}

pub fn complete(path: &Path, prefix: Option<&str>, n: Option<usize>) {
    let dict = die!(Dictionary::open(path), "Error opening dictionary: {}");
    let prefix = match prefix.map(latin1::encode) {
        Some(None) => {
            eprintln!("Error: prefix is not Latin-1 text");
            process::exit(1);
        }
        Some(Some(bytes)) => Some(bytes),
        None => None,
    };
    let limit = n.unwrap_or(settings::settings().completion.max_suggestions);
    let completions = die!(
        dict.most_used(prefix.as_deref(), limit),
        "Error searching dictionary: {}"
    );
    if completions.is_empty() {
        println!("(no match)");
    }
    for c in &completions {
        println!("{}\t{}", c.text(), c.count);
    }
}

pub fn list(path: &Path) {
    let dict = die!(Dictionary::open(path), "Error opening dictionary: {}");
    let entries = die!(dict.most_used(None, 0), "Error listing dictionary: {}");
    if entries.is_empty() {
        println!("(empty)");
    } else {
        for c in &entries {
            println!("{}\t{}", c.text(), c.count);
        }
        println!("---");
        println!("{} words", entries.len());
    }
}

pub fn export(path: &Path) {
    let dict = die!(Dictionary::open(path), "Error opening dictionary: {}");
    let text = die!(dict.export_weighted_text(), "Error exporting dictionary: {}");
    print!("{}", latin1::decode(&text));
}
