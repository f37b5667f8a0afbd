use anyhow::{Result, ensure};
use util::{output_path, run_in_repo_root};

mod util;

#[test]
fn test_align_letters() -> Result<()> {
    run_in_repo_root("align -c test_files/config/letters.toml --print-table aba baba")
}

#[test]
fn test_align_letters_statistics() -> Result<()> {
    let output = output_path("letters.toml");
    run_in_repo_root(&format!(
        "align -c test_files/config/letters.toml -o {output} abab baba"
    ))?;

    let statistics = std::fs::read_to_string(&output)?;
    std::fs::remove_file(&output)?;
    ensure!(
        statistics.contains("algorithm = \"needleman-wunsch\""),
        "{statistics}"
    );
    ensure!(statistics.contains("score = 2.0"), "{statistics}");
    ensure!(statistics.contains("alignment_count = 2"), "{statistics}");
    Ok(())
}

#[test]
fn test_align_phonetic_hirschberg() -> Result<()> {
    run_in_repo_root("align -c test_files/config/phonetic.toml pate bate")
}

#[test]
fn test_align_ternary_maximisation() -> Result<()> {
    run_in_repo_root("align -l debug -c test_files/config/ternary.toml pamf bamv")
}

#[test]
fn test_align_unknown_symbol() {
    assert!(run_in_repo_root("align -c test_files/config/letters.toml abx ab").is_err());
}

#[test]
fn test_batch_letters() -> Result<()> {
    let output = output_path("batch-letters.toml");
    run_in_repo_root(&format!(
        "batch -c test_files/config/letters.toml -p test_files/pairs/letters.txt --no-progress -t 2 -o {output}"
    ))?;

    let statistics = std::fs::read_to_string(&output)?;
    std::fs::remove_file(&output)?;
    ensure!(statistics.contains("pair_count = 5"), "{statistics}");
    ensure!(statistics.contains("aligned_count = 3"), "{statistics}");
    ensure!(statistics.contains("failed_count = 2"), "{statistics}");
    Ok(())
}

#[test]
fn test_batch_phonetic() -> Result<()> {
    run_in_repo_root(
        "batch -c test_files/config/phonetic.toml -p test_files/pairs/phonetic.txt --quiet",
    )
}
