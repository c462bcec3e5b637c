/// Extension-based categorization for organizing files.
///
/// A [`CategoryTable`] is an ordered list of named categories, each owning a set
/// of lowercase extensions (leading dot included). Lookups walk the table in
/// order and the first category containing the extension wins; anything left
/// over lands in the fallback category.
///
/// # Examples
///
/// ```
/// use dlsort::file_category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify("report.pdf").name(), "Documents");
/// assert_eq!(table.classify("photo.JPG").name(), "Images");
/// assert_eq!(table.classify("unknownfile.xyz").name(), "Others");
/// ```
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

/// Name of the catch-all category in the default table.
pub const FALLBACK_CATEGORY: &str = "Others";

/// A named bucket of file extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: HashSet<String>,
}

impl Category {
    /// Creates a category from a name and a list of extensions.
    ///
    /// Extensions are normalized to lowercase with a leading dot, so `"PDF"`
    /// and `".pdf"` are equivalent.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Returns the category name, which is also its directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this category claims the given (normalized) extension.
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Ordered mapping from category names to extension sets.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: usize,
}

impl CategoryTable {
    /// Builds a table from categories in lookup order.
    ///
    /// `fallback` names the catch-all category. If no category of that name is
    /// present, an empty one is appended at the end of the table.
    pub fn new(mut categories: Vec<Category>, fallback: &str) -> Self {
        let fallback = match categories.iter().position(|c| c.name == fallback) {
            Some(index) => index,
            None => {
                categories.push(Category::new(fallback, Vec::<&str>::new()));
                categories.len() - 1
            }
        };
        Self {
            categories,
            fallback,
        }
    }

    /// All categories, in lookup order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The catch-all category.
    pub fn fallback(&self) -> &Category {
        &self.categories[self.fallback]
    }

    /// Returns true if `category` is this table's fallback.
    pub fn is_fallback(&self, category: &Category) -> bool {
        category.name == self.fallback().name
    }

    /// Returns true if some category uses `name` as its directory name.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Returns the first category whose set contains the extension, if any.
    ///
    /// The fallback is never returned here since its set is empty.
    pub fn category_for_extension(&self, extension: &str) -> Option<&Category> {
        let extension = extension.to_lowercase();
        self.categories
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.fallback)
            .map(|(_, category)| category)
            .find(|category| category.contains(&extension))
    }

    /// Classifies a file name, falling back to the catch-all category.
    pub fn classify(&self, file_name: &str) -> &Category {
        self.category_for_extension(&extension_of(file_name))
            .unwrap_or_else(|| self.fallback())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let categories = vec![
            Category::new(
                "Documents",
                [
                    ".pdf", ".doc", ".docx", ".txt", ".rtf", ".xlsx", ".xls", ".ppt", ".pptx",
                ],
            ),
            Category::new(
                "Images",
                [
                    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff",
                ],
            ),
            Category::new(
                "Programs",
                [".exe", ".msi", ".dmg", ".pkg", ".deb", ".rpm", ".app"],
            ),
            Category::new("Archives", [".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"]),
            Category::new("Videos", [".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv"]),
            Category::new("Audio", [".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a"]),
            Category::new(
                "Code",
                [
                    ".py", ".js", ".html", ".css", ".java", ".cpp", ".c", ".json", ".xml",
                ],
            ),
            Category::new(FALLBACK_CATEGORY, Vec::<&str>::new()),
        ];
        Self::new(categories, FALLBACK_CATEGORY)
    }
}

/// Splits a file name into its stem and final extension (dot included).
///
/// A leading dot does not start an extension, and neither does a trailing one:
/// `.bashrc` and `notes.` have no extension.
///
/// ```
/// use dlsort::file_category::split_file_name;
///
/// assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_file_name("README"), ("README", ""));
/// assert_eq!(split_file_name(".bashrc"), (".bashrc", ""));
/// ```
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) if index > 0 && index < file_name.len() - 1 => file_name.split_at(index),
        _ => (file_name, ""),
    }
}

/// Returns the lowercase extension of a file name, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    split_file_name(file_name).1.to_lowercase()
}

/// Like [`split_file_name`], but for names that may not be valid UTF-8.
///
/// Returns the stem and the extension without its dot. The same rules apply:
/// a leading or trailing dot does not start an extension.
pub fn split_os_file_name(file_name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(file_name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(extension)) if !extension.is_empty() => (stem, Some(extension)),
        _ => (file_name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = CategoryTable::default();
        let names: Vec<_> = table.categories().iter().map(Category::name).collect();
        assert_eq!(
            names,
            vec![
                "Documents",
                "Images",
                "Programs",
                "Archives",
                "Videos",
                "Audio",
                "Code",
                "Others"
            ]
        );
        assert_eq!(table.fallback().name(), "Others");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.pdf"), ".pdf");
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn test_split_file_name_keeps_case() {
        assert_eq!(split_file_name("Photo.JPG"), ("Photo", ".JPG"));
        assert_eq!(split_file_name("notes(1).txt"), ("notes(1)", ".txt"));
    }

    #[test]
    fn test_split_os_file_name_agrees_with_split_file_name() {
        for name in ["archive.tar.gz", "README", ".bashrc", "notes.", "Photo.JPG", "a(1).txt"] {
            let (stem, extension) = split_os_file_name(OsStr::new(name));
            let expected = split_file_name(name);
            assert_eq!(stem, OsStr::new(expected.0), "stem of {}", name);
            let extension = extension
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            assert_eq!(extension, expected.1, "extension of {}", name);
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("photo.JPG").name(), "Images");
        assert_eq!(table.classify("Setup.EXE").name(), "Programs");
        assert_eq!(table.classify("song.Mp3").name(), "Audio");
    }

    #[test]
    fn test_classify_defaults_to_fallback() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("unknownfile.xyz").name(), "Others");
        assert_eq!(table.classify("LICENSE").name(), "Others");
        assert!(table.is_fallback(table.classify("noext")));
    }

    #[test]
    fn test_classify_is_pure() {
        let table = CategoryTable::default();
        for name in ["a.pdf", "b.zip", "c", "d.weird"] {
            assert_eq!(table.classify(name), table.classify(name));
        }
    }

    #[test]
    fn test_first_match_wins() {
        let table = CategoryTable::new(
            vec![
                Category::new("First", ["dat"]),
                Category::new("Second", [".DAT"]),
            ],
            "Misc",
        );
        assert_eq!(table.classify("x.dat").name(), "First");
        assert_eq!(table.classify("x.bin").name(), "Misc");
        assert_eq!(table.categories().len(), 3);
    }

    #[test]
    fn test_fallback_extensions_are_never_matched() {
        let table = CategoryTable::new(
            vec![
                Category::new("Rest", [".txt"]),
                Category::new("Text", [".txt"]),
            ],
            "Rest",
        );
        assert_eq!(table.classify("a.txt").name(), "Text");
        assert_eq!(table.fallback().name(), "Rest");
    }

    #[test]
    fn test_has_category() {
        let table = CategoryTable::default();
        assert!(table.has_category("Documents"));
        assert!(table.has_category("Others"));
        assert!(!table.has_category("documents"));
    }
}
