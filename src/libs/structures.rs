use anyhow::bail;
use itertools::Itertools;
use std::path::Path;

/// A structure file together with the display name derived from its path.
///
/// The name doubles as the object name inside the aligner's working context,
/// so it must be unique across the whole input set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub path: String,
    pub name: String,
}

/// Get the root file name, excluding the rest of the path and extensions.
///
/// The last extension is stripped; if it was `.gz` (case-insensitive), one
/// more extension is stripped.
///
/// ```
/// use rmsdmat::libs::structures::rootname;
/// assert_eq!(rootname("foo/bar.pdb"), "bar");
/// assert_eq!(rootname("foo/bar.pdb.gz"), "bar");
/// assert_eq!(rootname("bar"), "bar");
/// ```
pub fn rootname(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (stem, ext) = split_ext(&base);
    if ext.eq_ignore_ascii_case("gz") {
        split_ext(stem).0.to_string()
    } else {
        stem.to_string()
    }
}

// A leading dot (".bashrc") is not an extension
fn split_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i + 1..]),
        _ => (name, ""),
    }
}

/// Reduce the raw input list to the distinct paths, sorted lexicographically,
/// each paired with its display name.
///
/// The sorted order drives matrix indexing and output row/column order.
/// Distinct paths sharing one display name would alias a single object in the
/// aligner's namespace and silently corrupt the matrix, so collisions are
/// rejected here.
pub fn unique_structures(paths: &[String]) -> anyhow::Result<Vec<Structure>> {
    let structures: Vec<Structure> = paths
        .iter()
        .unique()
        .sorted()
        .map(|path| Structure {
            path: path.to_string(),
            name: rootname(path),
        })
        .collect();

    for (prev, cur) in structures
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .tuple_windows()
    {
        if prev.name == cur.name {
            bail!(
                "structures `{}` and `{}` both map to the display name `{}`; rename one of them",
                prev.path,
                cur.path,
                cur.name
            );
        }
    }

    Ok(structures)
}
