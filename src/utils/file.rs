//! Filename arithmetic shared by every task module: splitting image paths
//! around compound extensions, rebuilding them with prefixes/suffixes, and
//! the numbering schemes FSL uses for multi-file outputs.

use std::path::{Path, PathBuf};

use crate::config::defs::{OutputType, TaskError};

/// Extensions treated as a single unit when splitting a filename.
const COMPOUND_EXTENSIONS: &[&str] = &[".nii.gz", ".tar.gz", ".niml.dset"];

/// Split a path into (directory, stem, extension).
///
/// Compound extensions are matched case-insensitively and stripped as one
/// piece, but only when the filename is longer than the extension itself, so
/// a file literally named `.nii.gz` still splits on the last dot.
pub fn split_filename(path: &Path) -> (PathBuf, String, String) {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let lower = name.to_lowercase();
    for compound in COMPOUND_EXTENSIONS {
        if name.len() > compound.len() && lower.ends_with(compound) {
            let cut = name.len() - compound.len();
            return (dir, name[..cut].to_string(), name[cut..].to_string());
        }
    }

    match name.rfind('.') {
        Some(idx) if idx > 0 => (dir, name[..idx].to_string(), name[idx..].to_string()),
        _ => (dir, name, String::new()),
    }
}

/// Rebuild a filename as `dir/(prefix + stem + suffix + ext)`.
///
/// With `newpath` the directory is replaced by its absolute form; otherwise
/// the original directory is kept as-is. The extension is dropped entirely
/// when `use_ext` is false.
pub fn fname_presuffix(
    path: &Path,
    prefix: &str,
    suffix: &str,
    newpath: Option<&Path>,
    use_ext: bool,
) -> PathBuf {
    let (dir, stem, ext) = split_filename(path);
    let ext = if use_ext { ext } else { String::new() };
    let dir = match newpath {
        Some(p) => std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf()),
        None => dir,
    };
    dir.join(format!("{prefix}{stem}{suffix}{ext}"))
}

/// The FSL output filename builder: `cwd/basename<suffix><ext>`, where the
/// extension comes from the configured output type unless `change_ext` is
/// false or an explicit `ext` overrides it.
pub fn gen_fname(
    basename: &Path,
    cwd: &Path,
    suffix: Option<&str>,
    change_ext: bool,
    ext: Option<&str>,
    output_type: OutputType,
    tool: &'static str,
) -> Result<PathBuf, TaskError> {
    if basename.as_os_str().is_empty() {
        return Err(TaskError::EmptyBasename { tool });
    }
    let ext = ext.unwrap_or_else(|| output_type.ext());
    let suffix = if change_ext {
        match suffix {
            Some(s) if !s.is_empty() => format!("{s}{ext}"),
            _ => ext.to_string(),
        }
    } else {
        suffix.unwrap_or("").to_string()
    };
    Ok(fname_presuffix(basename, "", &suffix, Some(cwd), false))
}

/// Anchor a possibly-relative path under the task working directory.
pub fn resolve_under(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Per-class suffixes are always numbered, starting at 0: `_seg_0`, `_seg_1`, ...
pub fn per_class_suffixes(stem: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{stem}_{i}")).collect()
}

/// Per-volume suffixes are unnumbered for a single volume and 1-based
/// otherwise: `_restore` vs `_restore_1`, `_restore_2`, ...
pub fn per_volume_suffixes(stem: &str, count: usize) -> Vec<String> {
    if count > 1 {
        (1..=count).map(|i| format!("{stem}_{i}")).collect()
    } else {
        vec![stem.to_string()]
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Num(u64),
    Text(String),
}

fn natural_key(s: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                chunks.push(Chunk::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                chunks.push(Chunk::Num(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        chunks.push(Chunk::Num(digits.parse().unwrap_or(u64::MAX)));
    }
    if !text.is_empty() {
        chunks.push(Chunk::Text(text));
    }
    chunks
}

/// Sort paths so numbered files come out in human order: `stat10` after
/// `stat2`, not between `stat1` and `stat2`.
pub fn human_order_sort(paths: &mut [PathBuf]) {
    paths.sort_by_key(|p| natural_key(&p.to_string_lossy()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defs::OutputType;

    #[test]
    fn test_split_filename_simple() {
        let (dir, stem, ext) = split_filename(Path::new("/home/data/subject.nii"));
        assert_eq!(dir, Path::new("/home/data"));
        assert_eq!(stem, "subject");
        assert_eq!(ext, ".nii");
    }

    #[test]
    fn test_split_filename_compound() {
        let (dir, stem, ext) = split_filename(Path::new("/home/data/subject.nii.gz"));
        assert_eq!(dir, Path::new("/home/data"));
        assert_eq!(stem, "subject");
        assert_eq!(ext, ".nii.gz");
    }

    #[test]
    fn test_split_filename_compound_case_insensitive() {
        let (_, stem, ext) = split_filename(Path::new("ARCHIVE.TAR.GZ"));
        assert_eq!(stem, "ARCHIVE");
        assert_eq!(ext, ".TAR.GZ");
    }

    #[test]
    fn test_split_filename_bare_compound_extension() {
        // a file named exactly like a compound extension splits on the last dot
        let (_, stem, ext) = split_filename(Path::new(".nii.gz"));
        assert_eq!(stem, ".nii");
        assert_eq!(ext, ".gz");
    }

    #[test]
    fn test_split_filename_no_extension() {
        let (dir, stem, ext) = split_filename(Path::new("/tmp/dof"));
        assert_eq!(dir, Path::new("/tmp"));
        assert_eq!(stem, "dof");
        assert_eq!(ext, "");
    }

    #[test]
    fn test_split_round_trip() {
        for original in ["/a/b/x.nii", "/a/b/x.nii.gz", "/a/b/x.tar.gz", "rel/y.niml.dset"] {
            let (dir, stem, ext) = split_filename(Path::new(original));
            assert_eq!(dir.join(format!("{stem}{ext}")), Path::new(original));
        }
    }

    #[test]
    fn test_fname_presuffix() {
        let out = fname_presuffix(Path::new("foo.nii.gz"), "pre", "post", Some(Path::new("/tmp")), true);
        assert_eq!(out, Path::new("/tmp/prefoopost.nii.gz"));
    }

    #[test]
    fn test_fname_presuffix_drop_extension() {
        let out = fname_presuffix(Path::new("/data/foo.nii.gz"), "", "_mesh.vtk", None, false);
        assert_eq!(out, Path::new("/data/foo_mesh.vtk"));
    }

    #[test]
    fn test_gen_fname_appends_type_extension() {
        let out = gen_fname(
            Path::new("/in/brain.nii.gz"),
            Path::new("/work"),
            Some("_brain"),
            true,
            None,
            OutputType::NiftiGz,
            "bet",
        )
        .unwrap();
        assert_eq!(out, Path::new("/work/brain_brain.nii.gz"));
    }

    #[test]
    fn test_gen_fname_rejects_empty_basename() {
        let err = gen_fname(
            Path::new(""),
            Path::new("/work"),
            None,
            true,
            None,
            OutputType::Nifti,
            "bet",
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::EmptyBasename { tool: "bet" }));
    }

    #[test]
    fn test_per_class_suffixes_zero_based() {
        assert_eq!(per_class_suffixes("_seg", 3), vec!["_seg_0", "_seg_1", "_seg_2"]);
    }

    #[test]
    fn test_per_volume_suffixes_single_is_unnumbered() {
        assert_eq!(per_volume_suffixes("_restore", 1), vec!["_restore"]);
    }

    #[test]
    fn test_per_volume_suffixes_multi_is_one_based() {
        assert_eq!(per_volume_suffixes("_restore", 2), vec!["_restore_1", "_restore_2"]);
    }

    #[test]
    fn test_human_order_sort() {
        let mut paths = vec![
            PathBuf::from("/s/zstat10.nii.gz"),
            PathBuf::from("/s/zstat2.nii.gz"),
            PathBuf::from("/s/zstat1.nii.gz"),
        ];
        human_order_sort(&mut paths);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/s/zstat1.nii.gz"),
                PathBuf::from("/s/zstat2.nii.gz"),
                PathBuf::from("/s/zstat10.nii.gz"),
            ]
        );
    }
}
