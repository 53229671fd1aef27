use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::command::Command;
use crate::commands::open_repo;
use crate::error::Result;
use crate::output::{self, Format};

const PROMPT: &str = "¿Borrar todas las tareas? [y/N] ";

/// Remove every task. Without `yes`, asks for confirmation on stdin first.
pub fn run(data_dir: &Path, yes: bool, format: Format) -> Result<()> {
    if !yes {
        let stdin = io::stdin();
        let confirmed = confirm(&mut stdin.lock(), &mut io::stderr())?;
        if !confirmed {
            output::print_unchanged("cancelled; nothing deleted", format);
            return Ok(());
        }
    }

    let mut repo = open_repo(data_dir)?;
    let removed = repo.tasks().len();
    repo.apply(Command::Clear)?;

    match format {
        Format::Json => println!("{}", serde_json::json!({ "removed": removed })),
        _ => eprintln!("Deleted {removed} tasks"),
    }
    Ok(())
}

/// Only an explicit yes counts; EOF or anything else declines.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, prompt_out: &mut W) -> Result<bool> {
    write!(prompt_out, "{PROMPT}")?;
    prompt_out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "s" | "si" | "sí"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> bool {
        let mut input = io::Cursor::new(text.as_bytes().to_vec());
        let mut prompt = Vec::new();
        let result = confirm(&mut input, &mut prompt).unwrap();
        assert_eq!(String::from_utf8(prompt).unwrap(), PROMPT);
        result
    }

    #[test]
    fn accepts_explicit_yes() {
        assert!(answer("y\n"));
        assert!(answer("YES\n"));
        assert!(answer("sí\n"));
    }

    #[test]
    fn declines_by_default() {
        assert!(!answer("\n"));
        assert!(!answer("n\n"));
        assert!(!answer(""));
        assert!(!answer("maybe\n"));
    }
}
