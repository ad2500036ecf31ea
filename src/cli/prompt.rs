use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

/// Ask on stderr whether an existing output folder may be replaced.
pub(super) fn prompt_overwrite(path: &Path) -> Result<bool> {
    eprint!("Output folder {} already exists. Overwrite? [y/N] ", path.display());
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yeah"));
    }
}
