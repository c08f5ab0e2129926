use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into a
/// preceding normal component. Never touches the filesystem.
///
/// An empty result becomes `.`, so `clean("./a/..")` is `.` and
/// `clean("./testdata/x/")` is `testdata/x`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Order paths by their string form rather than component-wise, so that
/// `a.txt` sorts before `a/b.txt` the way a plain `sort` would list them.
pub fn cmp_path_strings(a: &Path, b: &Path) -> Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

pub fn sort_by_path_string(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| cmp_path_strings(a, b));
}
