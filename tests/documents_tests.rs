//! Integration tests for project document collection

use pal::{load_documents, Document, DocumentScanner, ScanError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x10\x00\x00\x00\x10\x08\x06\x00\x00\x00\x1f\xf3\xffa\x00\x00\x00\x01sRGB\x00\xae\xce\x1c\xe9\x00\x00\x00\x04gAMA\x00\x00\xb1\x8f\x0b\xfca\x05\x00\x00\x00\tpHYs\x00\x00\x0e\xc3\x00\x00\x0e\xc3\x01\xc7o\xa8d\x00\x00\x00\x0cIDAT8Oc\xf8\xff\xff?\x03\x00\x05\xfe\x02\xfe\xdc\xccY\xe7\x00\x00\x00\x00IEND\xaeB`\x82";

fn add_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn by_path(documents: Vec<Document>) -> BTreeMap<String, String> {
    documents.into_iter().map(|doc| (doc.path, doc.content)).collect()
}

fn collect(root: &Path, excludes: &[&str], max_file_bytes: u64) -> BTreeMap<String, String> {
    let excludes: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();
    by_path(load_documents(root, &excludes, max_file_bytes).unwrap())
}

#[test]
fn test_root_rules_exclude_matching_files() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), "README.md", "Hello, world!");
    add_file(tmp.path(), "notes.txt", "scratch");
    add_file(tmp.path(), ".gitignore", "*.txt\n");

    let docs = collect(tmp.path(), &[], 10_000);
    assert_eq!(docs.get("README.md").map(String::as_str), Some("Hello, world!"));
    assert!(!docs.contains_key("notes.txt"));
}

#[test]
fn test_subdirectory_negation_reincludes_only_its_own_files() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), ".gitignore", "*.txt\n");
    add_file(tmp.path(), "subdir/.gitignore", "!.aimportant.txt\n");
    add_file(tmp.path(), "subdir/.aimportant.txt", "should be included");
    add_file(tmp.path(), "subdir/other.txt", "should be excluded");
    add_file(tmp.path(), ".aimportant.txt", "root copy");

    let docs = collect(tmp.path(), &[], 10_000);
    assert_eq!(
        docs.get("subdir/.aimportant.txt").map(String::as_str),
        Some("should be included")
    );
    assert!(!docs.contains_key("subdir/other.txt"));
    assert!(!docs.contains_key(".aimportant.txt"));
}

#[test]
fn test_wildcard_rule_file_excludes_whole_directory() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), "adir/.gitignore", "*");
    add_file(tmp.path(), "adir/plain.md", "nothing else ignores this");
    add_file(tmp.path(), "adir/deep/nested.rs", "fn f() {}");
    add_file(tmp.path(), "keep.md", "kept");

    let docs = collect(tmp.path(), &[], 10_000);
    assert_eq!(docs.keys().collect::<Vec<_>>(), ["keep.md"]);
}

#[test]
fn test_project_with_mixed_rules() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    let mut included = BTreeMap::new();
    included.insert("README.md", "Hello, world!");
    included.insert("subdir/README.md", "");
    included.insert("src/main.go", "package main\n\nfunc main() {\n\tprintln(\"Hello, World!\")\n}");
    included.insert("subdir/.aimportant.txt", "should be included");
    included.insert(".gitignore", "*.txt\n*.sql\nnode_modules\nbuild");
    included.insert("subdir/.gitignore", "!.aimportant.txt\n");
    included.insert("subdir1/.gitignore", "*.log");

    let excluded = [
        ("subdir/backup.sql", ""),
        ("subdir/node_modules/leftPad.js", ""),
        ("subdir1/access.log", ""),
        ("subdir1/nested/access.log", ""),
        ("subdir2/config.xml", ""),
        (".git/hello.md", ""),
        ("build/compiled/bin/output.exe", ""),
        (".afile.txt", "should be excluded"),
        ("subdir/other.txt", "should be excluded"),
        ("adir/.gitignore", "*"),
    ];

    for (path, content) in &included {
        add_file(root, path, content);
    }
    for (path, content) in &excluded {
        add_file(root, path, content);
    }
    add_file(root, "image.png", PNG_BYTES);

    let docs = collect(root, &["*.xml"], 10_000);
    let expected: BTreeMap<String, String> =
        included.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    assert_eq!(docs, expected);
}

#[test]
fn test_size_limit_is_inclusive() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), "exact.md", "a".repeat(100));
    add_file(tmp.path(), "over.md", "a".repeat(101));

    let docs = collect(tmp.path(), &[], 100);
    assert!(docs.contains_key("exact.md"));
    assert!(!docs.contains_key("over.md"));

    let docs = collect(tmp.path(), &[], 1);
    assert!(docs.is_empty());
}

#[test]
fn test_binary_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), "image.png", PNG_BYTES);
    add_file(tmp.path(), "notes.md", "plain text, with ünïcödé");

    let docs = collect(tmp.path(), &[], 10_000);
    assert_eq!(docs.keys().collect::<Vec<_>>(), ["notes.md"]);
    assert_eq!(docs["notes.md"], "plain text, with ünïcödé");
}

#[test]
fn test_character_cut_by_sample_boundary_rejects_file() {
    let tmp = TempDir::new().unwrap();
    let mut content = vec![b'a'; 8 * 1024 - 1];
    content.extend_from_slice("é tail".as_bytes());
    add_file(tmp.path(), "split.md", &content);

    let mut aligned = vec![b'a'; 8 * 1024 - 2];
    aligned.extend_from_slice("é tail".as_bytes());
    add_file(tmp.path(), "aligned.md", &aligned);

    let docs = collect(tmp.path(), &[], 1_000_000);
    assert_eq!(docs.keys().collect::<Vec<_>>(), ["aligned.md"]);
}

#[test]
fn test_git_directory_cannot_be_reincluded() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), ".git/HEAD", "ref: refs/heads/main\n");
    add_file(tmp.path(), ".pal/notes.md", "private");
    add_file(tmp.path(), ".gitignore", "!.git\n!.pal/\n");

    let docs = collect(tmp.path(), &["!.git/HEAD"], 10_000);
    assert_eq!(docs.keys().collect::<Vec<_>>(), [".gitignore"]);
}

#[test]
fn test_excluded_directory_rule_files_are_not_read() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), ".gitignore", "vendor/\n");
    add_file(tmp.path(), "vendor/.gitignore", "!*\n");
    add_file(tmp.path(), "vendor/lib.rs", "pub fn f() {}");

    let mut scanner = DocumentScanner::new(tmp.path().to_path_buf());
    let docs = by_path(scanner.scan().unwrap());

    assert_eq!(docs.keys().collect::<Vec<_>>(), [".gitignore"]);
    assert_eq!(scanner.stats().dirs_pruned, 1);
    assert_eq!(scanner.stats().rule_files_loaded, 1);
}

#[test]
fn test_extra_patterns_precede_rule_files() {
    let tmp = TempDir::new().unwrap();
    add_file(tmp.path(), "generated.rs", "// generated");
    add_file(tmp.path(), "docs/generated.rs", "// documented");
    add_file(tmp.path(), "docs/.gitignore", "!generated.rs\n");

    let docs = collect(tmp.path(), &["generated.rs"], 10_000);
    assert!(!docs.contains_key("generated.rs"));
    assert!(docs.contains_key("docs/generated.rs"));
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_documents(tmp.path().join("nope"), &[], 10_000).unwrap_err();
    assert!(matches!(err, ScanError::Root { .. }));
}

#[test]
fn test_empty_project_yields_no_documents() {
    let tmp = TempDir::new().unwrap();
    assert!(load_documents(tmp.path(), &[], 10_000).unwrap().is_empty());
}
