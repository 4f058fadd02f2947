//! The subset of compiler flags the front end understands: macro definitions
//! and include search directories. Everything else is ignored.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerFlags {
    /// Names defined with `-D`, minus those later removed with `-U`.
    pub defines: Vec<String>,
    /// `-I`, `-isystem` and `-iquote` directories, absolute.
    pub include_dirs: Vec<PathBuf>,
}

impl CompilerFlags {
    /// Reads `flags` the way a compiler driver would. Relative include
    /// directories are taken relative to `working_directory`.
    pub fn parse(flags: &[String], working_directory: &Path) -> Self {
        let mut parsed = Self::default();
        let mut args = flags.iter().map(String::as_str);
        while let Some(arg) = args.next() {
            let (option, value) = match split_flag(arg) {
                Some((option, "")) => (option, args.next().unwrap_or_default()),
                Some(split) => split,
                None => continue,
            };
            if value.is_empty() {
                continue;
            }
            match option {
                "-D" => {
                    let name = value.split_once('=').map_or(value, |(name, _)| name);
                    if !parsed.defines.iter().any(|d| d == name) {
                        parsed.defines.push(name.to_string());
                    }
                }
                "-U" => parsed.defines.retain(|d| d != value),
                _ => parsed
                    .include_dirs
                    .push(absolute_in(working_directory, Path::new(value))),
            }
        }
        parsed
    }
}

fn split_flag(arg: &str) -> Option<(&str, &str)> {
    ["-isystem", "-iquote", "-D", "-U", "-I"]
        .into_iter()
        .find_map(|option| arg.strip_prefix(option).map(|value| (option, value)))
}

/// `path` joined onto `base` unless already absolute, with `.` and `..`
/// folded away so prefix checks see the real location.
pub fn absolute_in(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(args: &[&str]) -> CompilerFlags {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        CompilerFlags::parse(&args, Path::new("/work"))
    }

    #[test]
    fn defines_accept_joined_and_separate_values() {
        let parsed = flags(&["-DNDEBUG", "-D", "LEVEL=3", "-DNDEBUG=1"]);
        assert_eq!(parsed.defines, vec!["NDEBUG", "LEVEL"]);
    }

    #[test]
    fn undefine_removes_an_earlier_define() {
        let parsed = flags(&["-DTRACE", "-DFAST", "-UTRACE"]);
        assert_eq!(parsed.defines, vec!["FAST"]);
    }

    #[test]
    fn include_dirs_are_made_absolute() {
        let parsed = flags(&["-Iinclude", "-I", "../shared", "-isystem/usr/include", "-O2"]);
        assert_eq!(
            parsed.include_dirs,
            vec![
                PathBuf::from("/work/include"),
                PathBuf::from("/shared"),
                PathBuf::from("/usr/include"),
            ]
        );
    }

    #[test]
    fn dangling_option_is_ignored() {
        assert_eq!(flags(&["-I"]), CompilerFlags::default());
    }
}
