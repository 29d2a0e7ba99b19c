//! URL list parsing.

/// Lines of `contents` that name something to clone.
///
/// Lines are trimmed; blank lines and `#` comments are skipped.
pub fn clone_targets(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blanks_and_comments() {
        let contents = "\
# starred on 2024-01-15
https://github.com/a/b.git

   # indented comment
  https://github.com/c/d.git  \r
\t
https://github.com/e/f.git";

        let targets: Vec<_> = clone_targets(contents).collect();
        assert_eq!(
            targets,
            vec![
                "https://github.com/a/b.git",
                "https://github.com/c/d.git",
                "https://github.com/e/f.git",
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clone_targets("").count(), 0);
        assert_eq!(clone_targets("\n\n# nothing\n").count(), 0);
    }
}
