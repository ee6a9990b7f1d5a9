use std::{fs, io};
use std::io::Error;
use std::path::{Path, PathBuf};

/// Paths of every JSON or YAML job in a directory, sorted so runs are reproducible
pub fn get_job_paths(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths = fs::read_dir(dir)?
        .map(|res| res.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, io::Error>>()?;
    paths.retain(|path| {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("json") | Some("yml") | Some("yaml")
        )
    });
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[test]
    fn only_job_documents_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.yaml", "a.json", "c.yml", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let names: Vec<String> = get_job_paths(dir.path())
            .unwrap()
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()).map(String::from))
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml", "c.yml"]);
    }
}
