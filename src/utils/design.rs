//! Line-oriented scanning of FEAT design, contrast and setup files. These are
//! small text files; the counts in their headers decide how many numbered
//! statistic images the model tools write.

use std::fs;
use std::path::Path;

use crate::config::defs::TaskError;

/// Number of explanatory variables, from the `/NumWaves` header line.
/// `None` when the file carries no such line.
pub fn count_waves(design_file: &Path) -> Result<Option<usize>, TaskError> {
    header_count(design_file, "/NumWaves")
}

/// Number of contrasts, from the `/NumContrasts` header line.
pub fn count_contrasts(con_file: &Path) -> Result<Option<usize>, TaskError> {
    header_count(con_file, "/NumContrasts")
}

fn header_count(path: &Path, key: &str) -> Result<Option<usize>, TaskError> {
    let text = fs::read_to_string(path)?;
    for line in text.lines() {
        if line.starts_with(key) {
            let count = line
                .split_whitespace()
                .last()
                .filter(|token| *token != key)
                .and_then(|token| token.parse::<usize>().ok())
                .ok_or_else(|| TaskError::MalformedDesign {
                    path: path.to_path_buf(),
                    line: line.to_string(),
                })?;
            return Ok(Some(count));
        }
    }
    Ok(None)
}

/// The two facts a FEAT setup file decides about output layout.
#[derive(Debug, Clone)]
pub struct FsfInfo {
    /// `set fmri(inmelodic) 1` switches the run to a `.ica` directory.
    pub is_ica: bool,
    /// Quoted value of `set fmri(outputdir)`, when present and well-formed.
    pub output_dir: Option<String>,
}

pub fn read_fsf(path: &Path) -> Result<FsfInfo, TaskError> {
    let text = fs::read_to_string(path)?;
    let is_ica = text.contains("set fmri(inmelodic) 1");
    let mut output_dir = None;
    for line in text.lines() {
        if line.contains("set fmri(outputdir)") {
            let parts: Vec<&str> = line.split('"').collect();
            if parts.len() >= 2 {
                output_dir = Some(parts[parts.len() - 2].to_string());
            }
        }
    }
    Ok(FsfInfo { is_ica, output_dir })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_count_waves() -> anyhow::Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "/NumWaves\t3")?;
        writeln!(f, "/NumPoints\t120")?;
        writeln!(f, "/Matrix")?;
        assert_eq!(count_waves(f.path())?, Some(3));
        Ok(())
    }

    #[test]
    fn test_count_contrasts_missing_line() -> anyhow::Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "/Matrix")?;
        assert_eq!(count_contrasts(f.path())?, None);
        Ok(())
    }

    #[test]
    fn test_malformed_count() -> anyhow::Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "/NumContrasts many")?;
        let err = count_contrasts(f.path()).unwrap_err();
        assert!(matches!(err, TaskError::MalformedDesign { .. }));
        Ok(())
    }

    #[test]
    fn test_read_fsf() -> anyhow::Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "set fmri(level) 1")?;
        writeln!(f, "set fmri(inmelodic) 1")?;
        writeln!(f, "set fmri(outputdir) \"/scans/run1\"")?;
        let info = read_fsf(f.path())?;
        assert!(info.is_ica);
        assert_eq!(info.output_dir.as_deref(), Some("/scans/run1"));
        Ok(())
    }

    #[test]
    fn test_read_fsf_unquoted_outputdir_is_ignored() -> anyhow::Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "set fmri(outputdir) runs")?;
        let info = read_fsf(f.path())?;
        assert!(!info.is_ica);
        assert_eq!(info.output_dir, None);
        Ok(())
    }
}
