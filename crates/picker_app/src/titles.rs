use std::fs;
use std::path::Path;

use anyhow::Context;
use picker_engine::TitleList;

/// Every `*.txt` file in `dir` as a title list named after its stem, sorted by name.
pub(crate) fn load_dir(dir: &Path) -> anyhow::Result<Vec<TitleList>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("could not read title list directory {}", dir.display()))?;

    let mut lists = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("could not read title list {}", path.display()))?;
        lists.push(TitleList {
            name: name.to_string(),
            titles: parse_titles(&text),
        });
    }
    lists.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(lists)
}

fn parse_titles(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let titles = parse_titles("# Game Boy\nPokemon Red\n\n   Tetris  \r\n#Zelda\n");
        assert_eq!(titles, vec!["Pokemon Red".to_string(), "Tetris".to_string()]);
    }

    #[test]
    fn only_text_files_are_loaded_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("snes.txt"), "Super Metroid\n").unwrap();
        fs::write(dir.path().join("gb.txt"), "Tetris\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nes.txt")).unwrap();

        let lists = load_dir(dir.path()).unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["gb", "snes"]);
        assert_eq!(lists[0].titles, vec!["Tetris".to_string()]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_dir(&dir.path().join("nope")).is_err());
    }
}
