// CLASSIFICATION: COMMUNITY
// Filename: config.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-08-03

//! Loader configuration rewrite.

use log::info;
use std::fs;
use std::io;
use std::path::Path;

const RECOVERY_HEADER: &str =
    "# This file is used as an alternative if ux0:tai/config.txt is not found.\n";

const CONFIG_HEADER: &str = "\
# For users plugins, you must refresh taiHEN from HENkaku Settings for
# changes to take place.
# For kernel plugins, you must reboot for changes to take place.
";

const CONFIG_BODY: &str = "\
*KERNEL
# henkaku.skprx is hard-coded to load and is not listed here
*main
# main is a special titleid for SceShell
";

/// Regenerate one loader config file. The parent directory is created if
/// missing and an existing file is removed first: overwrite, never merge.
pub fn write_loader_config(path: &Path, recovery: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut contents = String::new();
    if recovery {
        contents.push_str(RECOVERY_HEADER);
    }
    contents.push_str(CONFIG_HEADER);
    contents.push_str(CONFIG_BODY);
    fs::write(path, contents)?;
    info!("wrote loader config {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_fixed_contents_and_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tai").join("config.txt");
        write_loader_config(&path, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# For users plugins"));
        assert!(text.contains("*KERNEL\n"));
        assert!(text.ends_with("# main is a special titleid for SceShell\n"));
        assert!(!text.contains("alternative"));
    }

    #[test]
    fn recovery_variant_gets_extra_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        write_loader_config(&path, true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(RECOVERY_HEADER));
    }

    #[test]
    fn existing_file_is_overwritten_not_merged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "old user content\n").unwrap();
        write_loader_config(&path, false).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("old user content"));
    }
}
