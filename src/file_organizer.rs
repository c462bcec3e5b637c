/// File organization system for moving files into category directories.
///
/// This module provides the [`Organizer`], which creates one subdirectory per
/// category inside a source directory and moves the source's immediate entries
/// into them. Name collisions in a category directory are resolved by
/// appending a `(N)` marker to the file stem.
use crate::file_category::{Category, CategoryTable, split_os_file_name};
use crate::output::OutputFormatter;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an organization run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source directory could not be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    SourceUnreadable { path: PathBuf, source: io::Error },
    /// A category directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A single entry that could not be moved. The entry stays where it was.
#[derive(Debug, Error)]
#[error("Error moving {name}: {source}")]
pub struct MoveFailure {
    /// The entry's file name, lossily converted for display.
    pub name: String,
    /// Where the entry was (and still is).
    pub source_path: PathBuf,
    /// Where the move was headed.
    pub destination: PathBuf,
    /// The error returned by the rename.
    pub source: io::Error,
}

/// What happened to one entry during a run.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The entry now lives at `destination`, inside `category`'s directory.
    Moved {
        category: String,
        destination: PathBuf,
    },
    /// The move failed; the entry was left in place.
    Failed(MoveFailure),
}

/// A move computed by [`Organizer::plan`] without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// The entry's current path.
    pub source: PathBuf,
    /// The category it would be moved into.
    pub category: String,
    /// The non-colliding path it would be moved to.
    pub destination: PathBuf,
}

/// Per-category counts and failures for one run.
#[derive(Debug)]
pub struct Summary {
    /// The directory that was organized.
    pub source_dir: PathBuf,
    counts: Vec<(String, usize)>,
    /// Entries that could not be moved.
    pub failures: Vec<MoveFailure>,
}

impl Summary {
    /// Creates a summary with a zero count for every category in the table.
    pub fn new(source_dir: &Path, table: &CategoryTable) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            counts: table
                .categories()
                .iter()
                .map(|c| (c.name().to_string(), 0))
                .collect(),
            failures: Vec::new(),
        }
    }

    /// Records one moved entry for `category`.
    pub fn record(&mut self, category: &str) {
        if let Some((_, count)) = self.counts.iter_mut().find(|(name, _)| name == category) {
            *count += 1;
        }
    }

    /// Returns the number of entries moved into `category`.
    pub fn count(&self, category: &str) -> usize {
        self.counts
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Categories with at least one moved entry, in table order.
    pub fn non_zero(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// Total number of entries moved.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// A source entry that passed the skip rules and has a target category.
struct Eligible<'t> {
    path: PathBuf,
    /// The name as stored on disk, which may not be valid UTF-8.
    name: OsString,
    /// `name` converted lossily, for classification and messages.
    label: String,
    category: &'t Category,
}

/// Organizes the immediate entries of a directory into category subdirectories.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    table: CategoryTable,
}

impl Organizer {
    /// Creates an organizer over the given category table.
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// The category table this organizer classifies with.
    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Ensures a subdirectory exists under `source_dir` for every category.
    ///
    /// Existing directories are left alone. Anything else already occupying a
    /// category's name is an error.
    pub fn ensure_category_dirs(&self, source_dir: &Path) -> OrganizeResult<()> {
        for category in self.table.categories() {
            let path = source_dir.join(category.name());
            match fs::create_dir(&path) {
                Ok(()) => debug!(path = %path.display(), "created category directory"),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {}
                Err(e) => {
                    return Err(OrganizeError::DirectoryCreationFailed { path, source: e });
                }
            }
        }
        Ok(())
    }

    /// Runs a full pass, printing each failed move as it happens.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dlsort::file_organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let summary = Organizer::default()
    ///     .run(Path::new("/home/me/Downloads"))
    ///     .expect("organize failed");
    /// println!("moved {} files", summary.total());
    /// ```
    pub fn run(&self, source_dir: &Path) -> OrganizeResult<Summary> {
        self.run_with(source_dir, |failure| {
            OutputFormatter::error(&failure.to_string())
        })
    }

    /// Runs a full pass, handing each failed move to `on_failure` immediately.
    ///
    /// Category directories are created first; a failure there aborts the run
    /// before anything moves. Individual move failures never abort the pass.
    pub fn run_with<F>(&self, source_dir: &Path, mut on_failure: F) -> OrganizeResult<Summary>
    where
        F: FnMut(&MoveFailure),
    {
        info!(source = %source_dir.display(), "organizing directory");
        self.ensure_category_dirs(source_dir)?;

        let mut summary = Summary::new(source_dir, &self.table);
        for entry in self.scan(source_dir)? {
            match self.move_entry(source_dir, &entry) {
                MoveOutcome::Moved {
                    category,
                    destination,
                } => {
                    debug!(
                        file = %entry.label,
                        destination = %destination.display(),
                        "moved"
                    );
                    summary.record(&category);
                }
                MoveOutcome::Failed(failure) => {
                    warn!(file = %failure.name, error = %failure.source, "move failed");
                    on_failure(&failure);
                    summary.failures.push(failure);
                }
            }
        }

        info!(
            moved = summary.total(),
            failed = summary.failures.len(),
            "organization finished"
        );
        Ok(summary)
    }

    /// Computes the moves a run would perform, without creating or moving anything.
    ///
    /// Destinations handed out earlier in the plan count as taken, so no two
    /// planned moves share a path.
    pub fn plan(&self, source_dir: &Path) -> OrganizeResult<Vec<PlannedMove>> {
        for category in self.table.categories() {
            let path = source_dir.join(category.name());
            if fs::symlink_metadata(&path).is_ok() && !path.is_dir() {
                return Err(OrganizeError::DirectoryCreationFailed {
                    path,
                    source: io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "a non-directory entry already uses this name",
                    ),
                });
            }
        }

        let mut reserved: HashSet<PathBuf> = HashSet::new();
        let mut moves = Vec::new();
        for entry in self.scan(source_dir)? {
            let category_dir = source_dir.join(entry.category.name());
            let destination = resolve_destination_with(&category_dir, &entry.name, |path| {
                reserved.contains(path) || is_occupied(path)
            });
            reserved.insert(destination.clone());
            moves.push(PlannedMove {
                source: entry.path,
                category: entry.category.name().to_string(),
                destination,
            });
        }
        Ok(moves)
    }

    /// Lists `source_dir` once and keeps the entries that should be moved.
    fn scan(&self, source_dir: &Path) -> OrganizeResult<Vec<Eligible<'_>>> {
        let entries = fs::read_dir(source_dir).map_err(|e| OrganizeError::SourceUnreadable {
            path: source_dir.to_path_buf(),
            source: e,
        })?;

        let mut eligible = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            let name = entry.file_name();
            // Category names and the hidden marker are ASCII, and the extension
            // sits after an ASCII dot, so a lossy label classifies the same way.
            let label = name.to_string_lossy().into_owned();

            if path.is_dir() && self.table.has_category(&label) {
                continue;
            }
            if label.starts_with('.') {
                debug!(file = %label, "skipping hidden entry");
                continue;
            }

            let category = self.table.classify(&label);
            // Only plain files fall through to the catch-all category.
            if self.table.is_fallback(category) && !path.is_file() {
                debug!(file = %label, "skipping unrecognized non-file entry");
                continue;
            }

            eligible.push(Eligible {
                path,
                name,
                label,
                category,
            });
        }
        Ok(eligible)
    }

    fn move_entry(&self, source_dir: &Path, entry: &Eligible<'_>) -> MoveOutcome {
        let category_dir = source_dir.join(entry.category.name());
        let destination = resolve_destination(&category_dir, &entry.name);

        match fs::rename(&entry.path, &destination) {
            Ok(()) => MoveOutcome::Moved {
                category: entry.category.name().to_string(),
                destination,
            },
            Err(e) => MoveOutcome::Failed(MoveFailure {
                name: entry.label.clone(),
                source_path: entry.path.clone(),
                destination,
                source: e,
            }),
        }
    }
}

/// Returns a path in `dir` for `file_name` that no existing entry occupies.
///
/// See [`resolve_destination_with`] for the naming scheme.
pub fn resolve_destination(dir: &Path, file_name: impl AsRef<OsStr>) -> PathBuf {
    resolve_destination_with(dir, file_name, is_occupied)
}

/// Returns the first candidate path in `dir` for which `is_taken` is false.
///
/// The first candidate is `file_name` itself. Each further attempt `N` builds
/// `stem(N).ext` from the original stem, after removing any `(N-1)` marker
/// already present in it. The marker removal only looks at the previous
/// counter, so `a(1).txt` first becomes `a(1)(1).txt`, then `a(2).txt`.
///
/// Names are handled as [`OsStr`], so names that are not valid UTF-8 keep
/// their exact bytes.
///
/// ```
/// use dlsort::file_organizer::resolve_destination_with;
/// use std::path::{Path, PathBuf};
///
/// let taken = [PathBuf::from("/d/notes.txt")];
/// let path = resolve_destination_with(Path::new("/d"), "notes.txt", |p| taken.iter().any(|t| t == p));
/// assert_eq!(path, PathBuf::from("/d/notes(1).txt"));
/// ```
pub fn resolve_destination_with<F>(
    dir: &Path,
    file_name: impl AsRef<OsStr>,
    mut is_taken: F,
) -> PathBuf
where
    F: FnMut(&Path) -> bool,
{
    let file_name = file_name.as_ref();
    let (stem, extension) = split_os_file_name(file_name);
    let mut candidate = dir.join(file_name);
    let mut counter: u64 = 1;

    while is_taken(&candidate) {
        let previous = format!("({})", counter - 1);
        let mut name = remove_marker(stem, &previous);
        name.push(format!("({})", counter));
        if let Some(extension) = extension {
            name.push(".");
            name.push(extension);
        }
        candidate = dir.join(name);
        counter += 1;
    }
    candidate
}

/// Removes every occurrence of `marker` from `stem`, scanning left to right.
fn remove_marker(stem: &OsStr, marker: &str) -> OsString {
    match stem.to_str() {
        Some(stem) => stem.replace(marker, "").into(),
        None => remove_marker_bytes(stem, marker),
    }
}

#[cfg(unix)]
fn remove_marker_bytes(stem: &OsStr, marker: &str) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = stem.as_bytes();
    let marker = marker.as_bytes();
    let mut kept = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index..].starts_with(marker) {
            index += marker.len();
        } else {
            kept.push(bytes[index]);
            index += 1;
        }
    }
    OsString::from_vec(kept)
}

// TODO: strip markers from ill-formed UTF-16 names through OsStrExt::encode_wide.
#[cfg(not(unix))]
fn remove_marker_bytes(stem: &OsStr, _marker: &str) -> OsString {
    stem.to_os_string()
}

/// True if anything, including a dangling symlink, sits at `path`.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
