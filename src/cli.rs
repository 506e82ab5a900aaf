use clap::Parser;
use std::path::{Component, Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "linepick",
    version,
    about = "Pick the changed lines that go into your next git commit"
)]
pub struct Cli {
    /// Only show changes under these paths
    pub paths: Vec<String>,

    /// Ignore whitespace changes
    #[arg(short = 'w', long = "ignore-ws")]
    pub ignore_whitespace: bool,

    /// Lines of context around each change
    #[arg(short = 'U', long = "context", value_name = "N")]
    pub context_lines: Option<u32>,

    /// Color theme (one-dark, github-dark, solarized-dark)
    #[arg(long)]
    pub theme: Option<String>,
}

/// Turn path arguments given relative to `cwd` into pathspecs relative to
/// the work tree root. A path naming the root itself means "everything", so
/// the whole list collapses to empty.
pub fn repo_pathspecs(cwd: &Path, workdir: &Path, paths: &[String]) -> Vec<String> {
    let prefix = cwd.strip_prefix(workdir).unwrap_or(Path::new(""));
    let mut specs = Vec::with_capacity(paths.len());
    for path in paths {
        let path = Path::new(path);
        let full = if path.is_absolute() {
            path.strip_prefix(workdir).unwrap_or(path).to_path_buf()
        } else {
            prefix.join(path)
        };

        let mut spec = PathBuf::new();
        for component in full.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    spec.pop();
                }
                other => spec.push(other),
            }
        }
        if spec.as_os_str().is_empty() {
            return Vec::new();
        }
        specs.push(spec.to_string_lossy().into_owned());
    }
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["linepick", "-w", "-U", "1", "src", "README.md"]);
        assert!(cli.ignore_whitespace);
        assert_eq!(cli.context_lines, Some(1));
        assert_eq!(cli.paths, vec!["src".to_string(), "README.md".to_string()]);
        assert_eq!(cli.theme, None);
    }

    #[test]
    fn test_pathspecs_are_rooted_at_the_work_tree() {
        let root = Path::new("/repo");
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            repo_pathspecs(Path::new("/repo/sub"), root, &args(&["b.txt", "./c", "../top.rs"])),
            vec!["sub/b.txt".to_string(), "sub/c".to_string(), "top.rs".to_string()]
        );
        assert_eq!(
            repo_pathspecs(root, root, &args(&["src", "/repo/README.md"])),
            vec!["src".to_string(), "README.md".to_string()]
        );
        assert!(repo_pathspecs(Path::new("/repo/sub"), root, &args(&["..", "x"])).is_empty());
    }
}
