use crate::model::ExamError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const QUESTION_FILE: &str = "q.qmd";
const SOLUTION_FILE: &str = "sol.qmd";
const QUESTION_TMP: &str = "tmp.qmd";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExamOptions {
    /// Include every question of a category instead of one random pick.
    #[serde(default = "default_true")]
    pub all: bool,
    #[serde(default = "default_true")]
    pub solutions: bool,
    /// Print the question directory name above each question.
    #[serde(default = "default_true")]
    pub labels: bool,
    /// Student-facing build: forces `all`, `solutions` and `labels` off.
    #[serde(default)]
    pub exam_mode: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ExamOptions {
    fn default() -> Self {
        Self {
            all: true,
            solutions: true,
            labels: true,
            exam_mode: false,
            seed: default_seed(),
        }
    }
}

impl ExamOptions {
    pub fn effective(&self) -> Self {
        if !self.exam_mode {
            return self.clone();
        }
        Self {
            all: false,
            solutions: false,
            labels: false,
            ..self.clone()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    48
}

fn read(path: &Path) -> Result<String, ExamError> {
    fs::read_to_string(path).map_err(|e| ExamError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn write(path: &Path, content: &str) -> Result<(), ExamError> {
    fs::write(path, content).map_err(|e| ExamError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn label_block(dir_name: &str, labels: bool) -> String {
    let output = if labels { "asis" } else { "false" };
    format!(
        "```{{python}}\n#| echo: false\n#| output: {output}\nmy_dir = '{dir_name}'\nprint(f'**{{my_dir}}.**')\n```\n\n"
    )
}

/// Sorted `Q{n}-*` directories directly under `root`.
fn question_dirs(root: &Path, n: u32) -> Result<Vec<PathBuf>, ExamError> {
    let prefix = format!("Q{}-", n);
    let entries = fs::read_dir(root).map_err(|e| ExamError::Io {
        path: root.display().to_string(),
        source: e,
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Writes `tmp.qmd` in every `Q{n}-*` directory and concatenates them (or a
/// random one of them) into `root/tmp{n}.qmd`. Returns the path written.
///
/// A category without questions yields an empty file when every question is
/// included, and `ExamError::NoQuestions` when one has to be picked.
pub fn assemble_category(
    root: &Path,
    n: u32,
    options: &ExamOptions,
    rng: &mut StdRng,
) -> Result<PathBuf, ExamError> {
    let opts = options.effective();
    let cat_file = root.join(format!("tmp{}.qmd", n));
    let dirs = question_dirs(root, n)?;
    if dirs.is_empty() {
        if !opts.all {
            return Err(ExamError::NoQuestions(n, root.display().to_string()));
        }
        write(&cat_file, "")?;
        warn!("No Q{}-* questions under {}, wrote empty {}", n, root.display(), cat_file.display());
        return Ok(cat_file);
    }

    let mut tmp_files = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        let dir_name = dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let mut content = label_block(dir_name, opts.labels);
        content.push_str(&read(&dir.join(QUESTION_FILE))?);
        if opts.solutions {
            content.push_str(&read(&dir.join(SOLUTION_FILE))?);
        }
        let tmp = dir.join(QUESTION_TMP);
        write(&tmp, &content)?;
        debug!("Wrote {}", tmp.display());
        tmp_files.push(tmp);
    }

    let chosen: Vec<&PathBuf> = if opts.all {
        tmp_files.iter().collect()
    } else {
        let idx = rng.random_range(0..tmp_files.len());
        vec![&tmp_files[idx]]
    };

    let mut combined = String::new();
    for file in chosen {
        combined.push_str(&read(file)?);
    }
    write(&cat_file, &combined)?;
    info!("Generated {} from {} question(s)", cat_file.display(), dirs.len());
    Ok(cat_file)
}

/// Assembles every category with one RNG seeded from `options.seed`.
pub fn assemble_exam(root: &Path, categories: &[u32], options: &ExamOptions) -> Result<Vec<PathBuf>, ExamError> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    categories
        .iter()
        .map(|&n| assemble_category(root, n, options, &mut rng))
        .collect()
}

/// Copies `source_root/question/q.qmd` to `dest`.
pub fn copy_single_question(source_root: &Path, question: &str, dest: &Path) -> Result<(), ExamError> {
    let content = read(&source_root.join(question).join(QUESTION_FILE))?;
    write(dest, &content)?;
    info!("Copied {} into {}", question, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exam_mode_turns_everything_off() {
        let opts = ExamOptions {
            exam_mode: true,
            ..ExamOptions::default()
        };
        let eff = opts.effective();
        assert!(!eff.all && !eff.solutions && !eff.labels);
        assert_eq!(eff.seed, 48);
    }

    #[test]
    fn label_block_matches_quarto_chunk() {
        assert_eq!(
            label_block("Q1-02", true),
            "```{python}\n#| echo: false\n#| output: asis\nmy_dir = 'Q1-02'\nprint(f'**{my_dir}.**')\n```\n\n"
        );
        assert!(label_block("Q1-02", false).contains("#| output: false\n"));
    }
}
