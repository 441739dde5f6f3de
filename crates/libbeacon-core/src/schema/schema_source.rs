use crate::file_reader;
use crate::schema::SchemaBuildError;
use indexmap::IndexSet;
use std::path::Path;
use std::path::PathBuf;
use wildmatch::WildMatch;

type Result<T> = std::result::Result<T, SchemaBuildError>;

const IMPORT_PREFIX: &str = "#import ";

/// A schema file whose `#import <path-or-glob>` lines are expanded,
/// recursively, into one SDL string.
///
/// Import paths are relative to the file containing them. Each file is
/// included at most once, so import cycles are harmless.
#[derive(Clone, Debug)]
pub struct SchemaSource {
    root: PathBuf,
}
impl SchemaSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Every file that makes up this source, in inclusion order.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut seen = IndexSet::new();
        let mut sdl = String::new();
        self.gather(&self.root, &mut seen, &mut sdl)?;
        Ok(seen.into_iter().collect())
    }

    /// Reads and stitches the whole source.
    pub fn read(&self) -> Result<String> {
        let mut seen = IndexSet::new();
        let mut sdl = String::new();
        self.gather(&self.root, &mut seen, &mut sdl)?;
        Ok(sdl)
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn gather(
        &self,
        file: &Path,
        seen: &mut IndexSet<PathBuf>,
        out: &mut String,
    ) -> Result<()> {
        let canonical = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
        if !seen.insert(canonical) {
            return Ok(());
        }

        let content = file_reader::read_content(file)?;
        let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
        for line in content.lines() {
            match line.trim_start().strip_prefix(IMPORT_PREFIX) {
                Some(pattern) => {
                    for import in resolve_import(base_dir, file, pattern.trim())? {
                        self.gather(&import, seen, out)?;
                    }
                },
                None => {
                    out.push_str(line);
                    out.push('\n');
                },
            }
        }
        Ok(())
    }
}

fn resolve_import(base_dir: &Path, importing_file: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !pattern.contains(['*', '?']) {
        return Ok(vec![base_dir.join(pattern)]);
    }

    // Walk from the longest wildcard-free directory prefix of the pattern.
    let fixed_prefix: PathBuf = Path::new(pattern)
        .components()
        .take_while(|c| !c.as_os_str().to_string_lossy().contains(['*', '?']))
        .collect();
    let walk_root = base_dir.join(&fixed_prefix);
    let matcher = WildMatch::new(pattern);

    let mut matches = vec![];
    for entry in walkdir::WalkDir::new(&walk_root) {
        let entry = entry.map_err(|err| SchemaBuildError::ImportResolutionError {
            importing_file: importing_file.to_path_buf(),
            message: err.to_string(),
            pattern: pattern.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(base_dir).unwrap_or(entry.path());
        if matcher.matches(&relative.to_string_lossy()) {
            matches.push(entry.path().to_path_buf());
        }
    }
    matches.sort();
    Ok(matches)
}
