use std::path::Path;

use clap::{Parser, Subcommand};

use act_cli::commands::{codec_ops, config_ops, dict_ops, shell};

#[derive(Parser)]
#[command(name = "actool", about = "Word completion dictionary and Huffman codec tool")]
struct Cli {
    /// Custom settings TOML file
    #[arg(long, global = true)]
    config: Option<String>,
    /// Write JSON trace logs to this directory (requires --features trace)
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file into the HUFF container
    Compress {
        /// Input file
        input: String,
        /// Output file
        output: String,
    },
    /// Decompress a HUFF container
    Decompress {
        /// Input file
        input: String,
        /// Output file
        output: String,
    },
    /// Add the words of text files to the dictionary
    Learn {
        /// Dictionary file (default: storage.dict_file)
        #[arg(long)]
        dict: Option<String>,
        /// Text files (UTF-8 or Latin-1)
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Show the most used words starting with a prefix
    Complete {
        /// Dictionary file (default: storage.dict_file)
        #[arg(long)]
        dict: Option<String>,
        /// Number of suggestions, 0 for all (default: completion.max_suggestions)
        #[arg(short, long)]
        n: Option<usize>,
        /// Prefix (empty matches every word)
        prefix: Option<String>,
    },
    /// List every word with its frequency
    List {
        /// Dictionary file (default: storage.dict_file)
        #[arg(long)]
        dict: Option<String>,
    },
    /// Print the weighted export text
    Export {
        /// Dictionary file (default: storage.dict_file)
        #[arg(long)]
        dict: Option<String>,
    },
    /// Interactive console
    Shell {
        /// Dictionary file (default: storage.dict_file)
        #[arg(long)]
        dict: Option<String>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(file) = &cli.config {
        config_ops::load_config(file);
    }
    if let Some(dir) = &cli.log_dir {
        act_engine::init_tracing(Path::new(dir));
    }

    match cli.command {
        Command::Compress { input, output } => codec_ops::compress(&input, &output),
        Command::Decompress { input, output } => codec_ops::decompress(&input, &output),
        Command::Learn { dict, files } => {
            dict_ops::learn(dict_ops::dict_path(dict.as_deref()), &files)
        }
        Command::Complete { dict, n, prefix } => dict_ops::complete(
            dict_ops::dict_path(dict.as_deref()),
            prefix.as_deref(),
            n,
        ),
        Command::List { dict } => dict_ops::list(dict_ops::dict_path(dict.as_deref())),
        Command::Export { dict } => dict_ops::export(dict_ops::dict_path(dict.as_deref())),
        Command::Shell { dict } => shell::shell_cmd(dict_ops::dict_path(dict.as_deref())),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
