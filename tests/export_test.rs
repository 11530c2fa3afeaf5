use feed_slides::export::{ARCHIVE_NAME, export_archive, export_slide};
use feed_slides::{ImageData, Project, ResultStore};
use std::fs;
use tempfile::TempDir;

const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn archive_names(path: &std::path::Path) -> Vec<String> {
    let file = fs::File::open(path).expect("Failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("Failed to read archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

#[test]
fn test_archive_holds_generated_slides_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project = Project::default();
    let mut store = ResultStore::new();
    store.insert(0, ImageData::new("image/png", PNG.to_vec()));
    store.insert(2, ImageData::new("image/png", PNG.to_vec()));
    store.insert(5, ImageData::new("image/png", PNG.to_vec()));

    let path = export_archive(&project.deck, &store, temp_dir.path())
        .unwrap()
        .expect("archive should be written");

    assert_eq!(path.file_name().unwrap(), ARCHIVE_NAME);
    assert_eq!(
        archive_names(&path),
        vec![
            "slide_01_cover.png",
            "slide_03_main_1.png",
            "slide_06_summary.png"
        ]
    );
}

#[test]
fn test_archive_ignores_images_beyond_the_deck() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project = Project::default();
    let mut store = ResultStore::new();
    store.insert(40, ImageData::new("image/png", PNG.to_vec()));

    let result = export_archive(&project.deck, &store, temp_dir.path()).unwrap();
    assert!(result.is_none());
    assert!(!temp_dir.path().join(ARCHIVE_NAME).exists());
}

#[test]
fn test_single_slide_named_after_title() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project = Project::default();
    let mut store = ResultStore::new();
    store.insert(2, ImageData::new("image/png", PNG.to_vec()));

    let path = export_slide(&project.deck, &store, 2, temp_dir.path())
        .unwrap()
        .expect("slide should be written");

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "slide_03_3__1__プロフィール設定.png"
    );
    assert_eq!(fs::read(&path).unwrap(), PNG);
}
