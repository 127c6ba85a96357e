//! Path utilities
//!
//! All paths handled here are plain '/' separated strings as they appear in
//! shell history. Nothing in this module touches the filesystem.

/// Normalize a path the way POSIX `normpath` does
///
/// Collapses repeated separators, drops `.` components and folds `dir/..`
/// pairs. Leading `..` components of a relative path are kept, `..` directly
/// under `/` is dropped. An empty result becomes `.`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Split a normalized relative path into its leading `..` count and the rest
///
/// `../../a/b` becomes `(2, "a/b")`, `..` becomes `(1, "")`.
pub fn split_parent_components(normalized: &str) -> (usize, String) {
    let mut count = 0;
    let mut rest = Vec::new();

    for component in normalized.split('/') {
        if component == ".." {
            count += 1;
        } else {
            rest.push(component);
        }
    }

    (count, rest.join("/"))
}

/// Remove the last `n` components from every directory
///
/// Directories with fewer than `n` components are dropped, `/` is dropped for
/// any `n > 0`, and a directory losing all of its components becomes `/`.
/// With `n == 0` the input is returned as is.
pub fn reduce_paths(paths: &[String], n: usize) -> Vec<String> {
    if n == 0 {
        return paths.to_vec();
    }

    paths
        .iter()
        .filter(|path| path.as_str() != "/")
        .filter_map(|path| {
            let components: Vec<&str> = path.trim_matches('/').split('/').collect();
            if components.len() < n {
                return None;
            }
            Some(format!("/{}", components[..components.len() - n].join("/")))
        })
        .collect()
}

/// Expand a leading `~` with the given home directory
pub fn expand_home(path: &str, home: &str) -> String {
    match path.strip_prefix('~') {
        Some(rest) => format!("{}{}", home, rest),
        None => path.to_string(),
    }
}

/// Strip trailing separators from a directory, keeping `/` intact
pub fn sanitize_dir(dir: &str) -> String {
    let trimmed = dir.trim();
    let stripped = trimmed.trim_end_matches('/');
    if stripped.is_empty() && trimmed.starts_with('/') {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}

/// Join a directory and a relative path with a single '/'
pub fn join_dir(dir: &str, relative: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, relative)
    } else {
        format!("{}/{}", dir, relative)
    }
}

/// Split a path into (parent, file name) for display
pub fn split_file_name(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dirs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("../filename"), "../filename");
        assert_eq!(normalize("./file"), "file");
        assert_eq!(normalize("a//b/./c"), "a/b/c");
        assert_eq!(normalize("/path/to/../dir/file.txt"), "/path/dir/file.txt");
        assert_eq!(normalize("/../etc"), "/etc");
        assert_eq!(normalize("a/../../b"), "../b");
        assert_eq!(normalize("../"), "..");
        assert_eq!(normalize("./"), ".");
        assert_eq!(normalize(""), ".");
    }

    #[test]
    fn test_split_parent_components() {
        assert_eq!(split_parent_components("../../a/b"), (2, "a/b".to_string()));
        assert_eq!(split_parent_components(".."), (1, String::new()));
        assert_eq!(split_parent_components("file..txt"), (0, "file..txt".to_string()));
    }

    #[test]
    fn test_reduce_paths() {
        let cases: Vec<(Vec<String>, usize, Vec<String>)> = vec![
            (dirs(&["/path/to/dir"]), 1, dirs(&["/path/to"])),
            (dirs(&["/path/to/dir"]), 0, dirs(&["/path/to/dir"])),
            (dirs(&["/path/to/dir/"]), 0, dirs(&["/path/to/dir/"])),
            (dirs(&["/path/to/dir"]), 2, dirs(&["/path"])),
            (dirs(&["/path/to/dir"]), 3, dirs(&["/"])),
            (dirs(&["/path/to/dir"]), 4, dirs(&[])),
            (dirs(&[]), 4, dirs(&[])),
            (dirs(&["/path/to/dir/extra"]), 4, dirs(&["/"])),
            (dirs(&["/path/to/dir/extra"]), 5, dirs(&[])),
            (dirs(&["/"]), 1, dirs(&[])),
            (dirs(&["/path/with/many/components/"]), 2, dirs(&["/path/with"])),
            (dirs(&["/path/with/many/components/"]), 4, dirs(&["/"])),
            (
                dirs(&["/path/with/many/components/", "/some/other"]),
                1,
                dirs(&["/path/with/many", "/some"]),
            ),
            (
                dirs(&["/path/with/many/components/", "/some/other"]),
                3,
                dirs(&["/path"]),
            ),
            (
                dirs(&["/path/with/many/components/", "/some/other"]),
                5,
                dirs(&[]),
            ),
        ];

        for (paths, n, expected) in cases {
            assert_eq!(reduce_paths(&paths, n), expected, "input: {} - {:?}", n, paths);
        }
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("~/notes.md", "/home/me"), "/home/me/notes.md");
        assert_eq!(expand_home("notes.md", "/home/me"), "notes.md");
    }

    #[test]
    fn test_sanitize_dir() {
        assert_eq!(sanitize_dir("/some/dir/"), "/some/dir");
        assert_eq!(sanitize_dir("/some/dir\n"), "/some/dir");
        assert_eq!(sanitize_dir("/"), "/");
        assert_eq!(sanitize_dir("//"), "/");
    }

    #[test]
    fn test_join_dir() {
        assert_eq!(join_dir("/some", "file"), "/some/file");
        assert_eq!(join_dir("/", "file"), "/file");
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("/a/b/c.txt"), ("/a/b/", "c.txt"));
        assert_eq!(split_file_name("c.txt"), ("", "c.txt"));
    }
}
