use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    /// Parses completely and generates a listing.
    CompileSuccess,
    /// Parsing stops early; the listing covers the statements before it.
    PartialParse,
    /// Code generation fails.
    CodegenError,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BenchConfig {
    pub enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    pub statements: Option<usize>,
    pub listing_file: Option<String>,
    pub error_contains_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    pub bench: BenchConfig,
    pub expected: ExpectedOutcome,
}

/// One directory under `tests/programs`: a SimpleLang program and the
/// outcome its compilation must produce.
#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub source: String,
    pub spec: CaseSpec,
}

const PROGRAM_FILE: &str = "program.sl";
const CASE_FILE: &str = "case.yaml";

impl Case {
    /// Reads a case directory. Directories without `case.yaml` are not cases.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let case_path = dir.join(CASE_FILE);
        if !case_path.exists() {
            return Ok(None);
        }

        let name = dir
            .file_name()
            .and_then(|value| value.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid case directory name {}", dir.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(
            &fs::read_to_string(&case_path)
                .with_context(|| format!("Reading {}", case_path.display()))?,
        )
        .with_context(|| format!("Parsing {}", case_path.display()))?;

        let program_path = dir.join(PROGRAM_FILE);
        ensure!(
            program_path.exists(),
            "Missing {PROGRAM_FILE} for case {name}"
        );
        let source = fs::read_to_string(&program_path)
            .with_context(|| format!("Reading {}", program_path.display()))?;

        Ok(Some(Self {
            name,
            dir: dir.to_path_buf(),
            source,
            spec,
        }))
    }

    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }
}

pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();
    for entry in
        fs::read_dir(programs_dir).with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir()
            && let Some(case) = Case::load(&path)?
        {
            cases.push(case);
        }
    }

    ensure!(
        !cases.is_empty(),
        "No test cases found in {}",
        programs_dir.display()
    );
    cases.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(cases)
}

/// Cases flagged for benchmarking, in name order.
pub fn bench_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let cases = load_cases(programs_dir)?;
    Ok(cases
        .into_iter()
        .filter(|case| case.spec.bench.enabled)
        .collect())
}

pub fn normalize_output(output: &str) -> String {
    output.replace("\r\n", "\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "simplelang-case-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create case dir");
        dir
    }

    #[test]
    fn loads_program_source_with_case() -> Result<()> {
        let dir = scratch_dir("ok");
        fs::write(dir.join(PROGRAM_FILE), "int a;\n")?;
        fs::write(
            dir.join(CASE_FILE),
            "class: compile_success\nbench:\n  enabled: false\nexpected:\n  statements: 1\n",
        )?;

        let case = Case::load(&dir)?.context("expected a case")?;
        fs::remove_dir_all(&dir).ok();
        assert_eq!(case.source, "int a;\n");
        assert_eq!(case.spec.class, CaseClass::CompileSuccess);
        assert_eq!(case.spec.expected.statements, Some(1));
        Ok(())
    }

    #[test]
    fn skips_directories_without_case_file() -> Result<()> {
        let dir = scratch_dir("skip");
        let loaded = Case::load(&dir)?;
        fs::remove_dir_all(&dir).ok();
        assert!(loaded.is_none());
        Ok(())
    }

    #[test]
    fn requires_program_file() -> Result<()> {
        let dir = scratch_dir("missing");
        fs::write(
            dir.join(CASE_FILE),
            "class: codegen_error\nbench:\n  enabled: false\nexpected: {}\n",
        )?;
        let err = Case::load(&dir).expect_err("expected missing program error");
        fs::remove_dir_all(&dir).ok();
        assert!(err.to_string().contains("Missing program.sl"));
        Ok(())
    }
}
