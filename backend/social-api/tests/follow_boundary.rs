use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(needle))
        .unwrap_or(false)
}

fn src_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[test]
fn follow_edge_writes_only_happen_in_the_follow_repository() {
    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root()) {
        let path_str = file.to_string_lossy();
        if path_str.ends_with("db/follow_repo.rs") {
            continue;
        }
        if file_contains(&file, "INSERT INTO follows") || file_contains(&file, "DELETE FROM follows")
        {
            offenders.push(path_str.to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Follow edge writes must go through db::follow_repo only. Offenders: {:?}",
            offenders
        );
    }
}

#[test]
fn like_set_writes_only_happen_in_the_like_repository() {
    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root()) {
        let path_str = file.to_string_lossy();
        if path_str.ends_with("db/like_repo.rs") {
            continue;
        }
        if file_contains(&file, "INSERT INTO likes") || file_contains(&file, "DELETE FROM likes") {
            offenders.push(path_str.to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Like set writes must go through db::like_repo only. Offenders: {:?}",
            offenders
        );
    }
}

#[test]
fn comments_have_no_update_or_delete_path() {
    // Comments are append-only; no source file may mutate or remove them.
    let mut offenders = Vec::new();
    for file in collect_rs_files(&src_root()) {
        if file_contains(&file, "UPDATE comments") || file_contains(&file, "DELETE FROM comments") {
            offenders.push(file.to_string_lossy().to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Comments are append-only; no UPDATE/DELETE statements allowed. Offenders: {:?}",
            offenders
        );
    }
}
