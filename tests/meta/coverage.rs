//! Keeps `tests/unit` an exact mirror of `src` and every unit file compiled

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    /// Relative paths of every directory and `.rs` file below `base`
    fn relative_paths(base: &Path) -> io::Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        collect(base, base, &mut paths)?;
        Ok(paths)
    }

    fn collect(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_prefix_error| io::Error::other("path outside base"))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.insert(relative);
                collect(&path, base, paths)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    fn file_name(path: &str) -> &str {
        path.rsplit('/').next().unwrap_or(path)
    }

    /// Crate roots and module declaration files need no tests of their own
    fn is_module_glue(path: &str) -> bool {
        matches!(file_name(path), "lib.rs" | "main.rs" | "mod.rs")
    }

    fn file_stem(path: &str) -> &str {
        let name = file_name(path);
        name.strip_suffix(".rs").unwrap_or(name)
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src = relative_paths(Path::new(SRC_DIR)).expect("src is readable");
        let unit = relative_paths(Path::new(UNIT_DIR)).unwrap_or_default();

        let missing: Vec<String> = src
            .iter()
            .filter(|path| !is_module_glue(path) && !unit.contains(*path))
            .map(|path| format!("  - src/{path} -> {UNIT_DIR}/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit test counterparts:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src = relative_paths(Path::new(SRC_DIR)).expect("src is readable");
        let unit = relative_paths(Path::new(UNIT_DIR)).unwrap_or_default();

        let orphaned: Vec<String> = unit
            .iter()
            .filter(|path| file_name(path) != "mod.rs" && !src.contains(*path))
            .map(|path| format!("  - {UNIT_DIR}/{path} -> src/{path} (missing)"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without source counterparts:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_all_unit_files_are_declared() {
        let unit = relative_paths(Path::new(UNIT_DIR)).unwrap_or_default();
        let mut undeclared = Vec::new();

        for path in unit.iter().filter(|path| !is_module_glue(path)) {
            let (parent, module) = match path.rsplit_once('/') {
                Some((parent, _)) => (format!("{parent}/mod.rs"), file_stem(path)),
                None => ("main.rs".to_string(), file_stem(path)),
            };
            let declarations =
                fs::read_to_string(Path::new(UNIT_DIR).join(&parent)).unwrap_or_default();
            let declared = declarations.lines().any(|line| {
                let line = line.trim();
                line == format!("mod {module};") || line == format!("pub mod {module};")
            });
            if !declared {
                undeclared.push(format!("  - {UNIT_DIR}/{path} (not declared in {parent})"));
            }
        }

        assert!(
            undeclared.is_empty(),
            "Unit test files that are never compiled:\n{}",
            undeclared.join("\n")
        );
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let tests = relative_paths(Path::new("tests")).expect("tests is readable");
        let empty: Vec<String> = tests
            .iter()
            .filter(|path| path.ends_with(".rs") && !is_module_glue(path))
            .filter(|path| {
                fs::read_to_string(Path::new("tests").join(path))
                    .map(|content| !content.contains("#[test]"))
                    .unwrap_or(true)
            })
            .map(|path| format!("  - tests/{path}"))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without any #[test] functions:\n{}",
            empty.join("\n")
        );
    }
}
