//! Interactive console. Input is split on whitespace and every token is one
//! command; the first character selects it:
//!
//! | token      | action                                        |
//! |------------|-----------------------------------------------|
//! | `*prefix`  | list the most used words starting with prefix |
//! | `<file`    | merge a saved dictionary (default file if bare) |
//! | `>file`    | save the dictionary (default file if bare)    |
//! | `?`        | help                                          |
//! | `.`        | quit                                          |
//! | `word`     | add each run of two or more letters in `word` |


use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use act_engine::{latin1, settings, DictError, Dictionary};

const HELP: &str = "\
Commands:
    *[prefix]   show the most used words starting with prefix
    <[file]     merge a dictionary file
    >[file]     save the dictionary
    ?           this help
    .           quit
    word        add a word (punctuation and digits split it)
";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("not Latin-1 text: {0}")]
    Encoding(String),

    #[error("no word of two or more letters in {0}")]
    NoWord(String),

    #[error("cannot add {word}: {source}")]
    Add { word: String, source: DictError },

    #[error("search failed: {0}")]
    Search(DictError),

    #[error("cannot load {}: {source}", path.display())]
    Load { path: PathBuf, source: DictError },

    #[error("cannot save {}: {source}", path.display())]
    Save { path: PathBuf, source: DictError },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    dict: Dictionary,
    default_file: PathBuf,
    limit: usize,
}

impl Shell {
    pub fn new(dict: Dictionary, default_file: PathBuf, limit: usize) -> Self {
        Self {
            dict,
            default_file,
            limit,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Run commands from `input` until `.` or end of input. Command failures
    /// are reported on `err` and do not stop the loop.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        input: R,
        mut out: W,
        mut err: E,
    ) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            for token in line.split_whitespace() {
                match self.execute(token, &mut out) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => return out.flush(),
                    Err(ShellError::Io(e)) => return Err(e),
                    Err(e) => writeln!(err, "error: {e}")?,
                }
            }
            out.flush()?;
        }
        out.flush()
    }

    pub fn execute<W: Write>(&mut self, token: &str, out: &mut W) -> Result<Flow, ShellError> {
        let mut chars = token.chars();
        let first = chars.next();
        let rest = chars.as_str();
        match first {
            Some('*') => self.search(rest, out)?,
            Some('<') => {
                let path = self.file_arg(rest);
                self.dict
                    .merge_file(&path)
                    .map_err(|source| ShellError::Load {
                        path: path.clone(),
                        source,
                    })?;
                writeln!(out, "loaded {} ({} words)", path.display(), self.dict.len())?;
            }
            Some('>') => {
                let path = self.file_arg(rest);
                self.dict.save(&path).map_err(|source| ShellError::Save {
                    path: path.clone(),
                    source,
                })?;
                writeln!(out, "saved {}", path.display())?;
            }
            Some('?') => out.write_all(HELP.as_bytes())?,
            Some('.') => return Ok(Flow::Quit),
            _ => {
                let text = encode(token)?;
                let added = self.dict.add_text(&text).map_err(|source| ShellError::Add {
                    word: token.to_string(),
                    source,
                })?;
                if added == 0 {
                    return Err(ShellError::NoWord(token.to_string()));
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn search<W: Write>(&self, prefix: &str, out: &mut W) -> Result<(), ShellError> {
        let prefix = encode(prefix)?;
        let completions = self
            .dict
            .most_used(Some(&prefix), self.limit)
            .map_err(ShellError::Search)?;
        if completions.is_empty() {
            writeln!(out, "    (no match)")?;
        }
        for c in &completions {
            writeln!(out, "    {}", c.text())?;
        }
        Ok(())
    }

    fn file_arg(&self, arg: &str) -> PathBuf {
        if arg.is_empty() {
            self.default_file.clone()
        } else {
            PathBuf::from(arg)
        }
    }
}

fn encode(text: &str) -> Result<Vec<u8>, ShellError> {
    latin1::encode(text).ok_or_else(|| ShellError::Encoding(text.to_string()))
}

/// Entry point for `actool shell`: the dictionary at `path` is loaded when it
/// exists and becomes the default target of `<` and `>`.
pub fn shell_cmd(path: &Path) {
    let dict = Dictionary::open(path).unwrap_or_else(|e| {
        eprintln!("Error opening dictionary: {e}");
        process::exit(1);
    });
    println!(
        "{} words loaded from {}. Type ? for help.",
        dict.len(),
        path.display()
    );
    let limit = settings::settings().completion.max_suggestions;
    let mut shell = Shell::new(dict, path.to_path_buf(), limit);
    let stdin = io::stdin();
    if let Err(e) = shell.run(stdin.lock(), io::stdout(), io::stderr()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
