use std::fs;
use std::path::Path;
use std::process;

use act_engine::huffman;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn compress(input: &str, output: &str) {
    let data = die!(fs::read(input), "Error reading {input}: {}");
    die!(
        huffman::write(Path::new(output), &data),
        "Error writing {output}: {}"
    );
    let written = die!(fs::metadata(output), "Error reading {output}: {}").len();
    println!(
        "{input} → {output}: {} → {written} bytes ({})",
        data.len(),
        ratio(data.len() as u64, written)
    );
}

pub fn decompress(input: &str, output: &str) {
    let data = die!(huffman::read(Path::new(input)), "Error decoding {input}: {}");
    die!(fs::write(output, &data), "Error writing {output}: {}");
    println!("{input} → {output}: {} bytes", data.len());
}

fn ratio(original: u64, compressed: u64) -> String {
    if original == 0 {
        return "n/a".to_string();
    }
    format!("{:.1}%", compressed as f64 * 100.0 / original as f64)
}
