use std::fs;
use std::path::Path;
use tempfile::TempDir;
use weekday_align::exam::{assemble_exam, copy_single_question, ExamOptions};
use weekday_align::model::ExamError;

fn question(root: &Path, dir: &str, q: &str, sol: &str) {
    let path = root.join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("q.qmd"), q).unwrap();
    fs::write(path.join("sol.qmd"), sol).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    question(dir.path(), "Q1-02", "question B\n", "solution B\n");
    question(dir.path(), "Q1-01", "question A\n", "solution A\n");
    question(dir.path(), "Q1-03", "question C\n", "solution C\n");
    question(dir.path(), "Q2-01", "question D\n", "solution D\n");
    fs::write(dir.path().join("Q1-notes.txt"), "not a directory").unwrap();
    dir
}

#[test]
fn all_questions_with_solutions_in_order() {
    let dir = fixture();
    let files = assemble_exam(dir.path(), &[1, 2], &ExamOptions::default()).unwrap();
    assert_eq!(files, vec![dir.path().join("tmp1.qmd"), dir.path().join("tmp2.qmd")]);

    let cat = fs::read_to_string(dir.path().join("tmp1.qmd")).unwrap();
    let a = cat.find("question A").unwrap();
    let b = cat.find("question B").unwrap();
    let c = cat.find("question C").unwrap();
    assert!(a < b && b < c);
    assert!(cat.contains("solution B\n"));
    assert!(cat.contains("my_dir = 'Q1-01'"));
    assert_eq!(cat.matches("#| output: asis").count(), 3);

    let tmp = fs::read_to_string(dir.path().join("Q1-01").join("tmp.qmd")).unwrap();
    assert!(tmp.ends_with("question A\nsolution A\n"));
}

#[test]
fn exam_mode_picks_one_question_reproducibly() {
    let dir = fixture();
    let opts = ExamOptions {
        exam_mode: true,
        ..ExamOptions::default()
    };
    assemble_exam(dir.path(), &[1], &opts).unwrap();
    let first = fs::read_to_string(dir.path().join("tmp1.qmd")).unwrap();
    assemble_exam(dir.path(), &[1], &opts).unwrap();
    let second = fs::read_to_string(dir.path().join("tmp1.qmd")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.matches("question").count(), 1);
    assert!(!first.contains("solution"));
    assert!(first.contains("#| output: false"));
}

#[test]
fn empty_category_cannot_be_picked_from() {
    let dir = fixture();
    let opts = ExamOptions {
        exam_mode: true,
        ..ExamOptions::default()
    };
    let err = assemble_exam(dir.path(), &[7], &opts).unwrap_err();
    assert!(matches!(err, ExamError::NoQuestions(7, _)));
}

#[test]
fn empty_category_does_not_stop_later_ones() {
    let dir = TempDir::new().unwrap();
    question(dir.path(), "Q1-01", "question A\n", "solution A\n");
    question(dir.path(), "Q3-01", "question E\n", "solution E\n");

    let files = assemble_exam(dir.path(), &[1, 2, 3], &ExamOptions::default()).unwrap();
    assert_eq!(files.len(), 3);

    let tmp2 = dir.path().join("tmp2.qmd");
    assert!(tmp2.exists());
    assert_eq!(fs::read_to_string(tmp2).unwrap(), "");

    let tmp3 = fs::read_to_string(dir.path().join("tmp3.qmd")).unwrap();
    assert!(tmp3.contains("question E\nsolution E\n"));
}

#[test]
fn single_question_copy() {
    let dir = fixture();
    let dest = dir.path().join("tmp08.qmd");
    copy_single_question(dir.path(), "Q1-03", &dest).unwrap();
    assert_eq!(fs::read_to_string(dest).unwrap(), "question C\n");
    assert!(copy_single_question(dir.path(), "Q9-99", &dir.path().join("x.qmd")).is_err());
}
