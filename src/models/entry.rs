use std::path::{Component, Path};

/// Extensions (lowercase, without the dot) recognised as images.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Image,
    Directory,
}

impl EntryKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        IMAGE_EXTENSIONS
            .contains(&ext.as_str())
            .then_some(Self::Image)
    }

    /// Classifies a file name by its extension. Hidden names are not checked here.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn is_directory(self) -> bool {
        self == Self::Directory
    }
}

/// One filesystem object recorded in the catalog.
///
/// `path` is the catalog path of the containing directory, not of the entry
/// itself; see [`catalog_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn image(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Image,
        }
    }

    pub fn directory(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Catalog path of the entry itself (containing path joined with the name).
    pub fn full_path(&self) -> String {
        join_catalog_path(&self.path, &self.name)
    }
}

/// Images and subdirectories recorded directly under one catalog path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub images: Vec<Entry>,
    pub directories: Vec<Entry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.directories.is_empty()
    }
}

/// Normalises a filesystem path into the string used as a catalog key.
///
/// `.` components are dropped and the rest are joined with `/`, so
/// `./pictures/sub` and `pictures/sub` map to the same key.
pub fn catalog_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            Component::CurDir => {}
            Component::ParentDir => push_segment(&mut out, ".."),
            Component::Normal(segment) => push_segment(&mut out, &segment.to_string_lossy()),
        }
    }
    out
}

/// Joins two catalog paths, treating an empty side as the identity.
pub fn join_catalog_path(base: &str, rest: &str) -> String {
    let rest = rest.trim_matches('/');
    if base.is_empty() {
        return rest.to_string();
    }
    let mut out = base.to_string();
    push_segment(&mut out, rest);
    out
}

/// Returns `key` relative to `root`, or `None` if `key` is not under `root`.
pub fn relative_catalog_path<'a>(root: &str, key: &'a str) -> Option<&'a str> {
    if root.is_empty() {
        return Some(key);
    }
    if key == root {
        return Some("");
    }
    let rest = key.strip_prefix(root)?;
    if root.ends_with('/') {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

fn push_segment(out: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(segment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(EntryKind::from_extension("JPG"), Some(EntryKind::Image));
        assert_eq!(EntryKind::from_extension("webp"), Some(EntryKind::Image));
        assert_eq!(EntryKind::from_extension("svg"), None);
        assert_eq!(EntryKind::from_extension("txt"), None);
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(EntryKind::from_file_name("a.Jpeg"), Some(EntryKind::Image));
        assert_eq!(EntryKind::from_file_name("archive.tar.gz"), None);
        assert_eq!(EntryKind::from_file_name("png"), None);
    }

    #[test]
    fn test_catalog_path_normalisation() {
        assert_eq!(catalog_path(Path::new("./pictures")), "pictures");
        assert_eq!(catalog_path(Path::new("pictures/./sub")), "pictures/sub");
        assert_eq!(catalog_path(Path::new(".")), "");
        assert_eq!(catalog_path(Path::new("/srv/pics")), "/srv/pics");
    }

    #[test]
    fn test_join_and_relative() {
        assert_eq!(join_catalog_path("pictures", "sub"), "pictures/sub");
        assert_eq!(join_catalog_path("", "sub"), "sub");
        assert_eq!(join_catalog_path("pictures", ""), "pictures");
        assert_eq!(join_catalog_path("/", "srv"), "/srv");

        assert_eq!(relative_catalog_path("pictures", "pictures"), Some(""));
        assert_eq!(relative_catalog_path("pictures", "pictures/sub"), Some("sub"));
        assert_eq!(relative_catalog_path("pictures", "picturesque"), None);
        assert_eq!(relative_catalog_path("", "sub"), Some("sub"));
        assert_eq!(relative_catalog_path("/", "/srv"), Some("srv"));
    }

    #[test]
    fn test_full_path() {
        let entry = Entry::image("pictures/sub", "b.png");
        assert_eq!(entry.full_path(), "pictures/sub/b.png");
        assert!(!entry.is_directory());
        assert!(Entry::directory("pictures", "sub").is_directory());
    }
}
