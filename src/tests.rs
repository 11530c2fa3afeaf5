use super::*;
use crate::catalog::{CoverLayout, ThemeId};
use crate::structure::MainSlideDraft;
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Records the reference count of every call.
#[derive(Default)]
struct RecordingClient {
    calls: RefCell<Vec<(String, usize)>>,
}

impl GenerationClient for RecordingClient {
    fn generate_image(&self, prompt: &str) -> Result<ImageData> {
        self.calls.borrow_mut().push((prompt.to_string(), 0));
        Ok(ImageData::new("image/png", PNG.to_vec()))
    }

    fn generate_image_with_reference(&self, prompt: &str, _: &ImageData) -> Result<ImageData> {
        self.calls.borrow_mut().push((prompt.to_string(), 1));
        Ok(ImageData::new("image/png", PNG.to_vec()))
    }

    fn generate_image_with_references(&self, prompt: &str, refs: &[&ImageData]) -> Result<ImageData> {
        self.calls.borrow_mut().push((prompt.to_string(), refs.len()));
        Ok(ImageData::new("image/png", PNG.to_vec()))
    }

    fn generate_structure(&self, _: &str) -> Result<PostStructure> {
        parse_structure(r#"{"coverTitle":"朝活のすすめ","mainSlides":[]}"#)
    }
}

#[test]
fn test_sparse_project_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("feed.json");
    fs::write(
        &path,
        r#"{"design":{"theme":"no_such_theme","cover":{"layout":"diagonal"}}}"#,
    )
    .expect("Failed to write project");

    let project = Project::from_file(&path).unwrap();
    assert_eq!(project.design.theme, ThemeId::ModernLifestyle);
    assert_eq!(project.design.cover.layout, CoverLayout::from_id("diagonal"));
    assert_eq!(project.deck, Deck::default());

    let prompt = compile_prompt(&project, project.deck.slide(0).unwrap());
    assert!(prompt.contains(ThemeId::ModernLifestyle.background()));
}

#[test]
fn test_loaded_images_flow_into_references() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("me.png"), PNG).unwrap();
    fs::write(dir.path().join("mood.png"), PNG).unwrap();
    fs::write(
        dir.path().join("feed.json"),
        r#"{"deck":{"intro":{"text":"hi","character_image":"me.png","style_reference":"mood.png"}}}"#,
    )
    .unwrap();

    let project = Project::from_file(&dir.path().join("feed.json")).unwrap();
    let intro = project.deck.slide(1).unwrap();
    let references = resolve_references(&project, intro);
    assert_eq!(references.len(), 2);
    assert_eq!(references[0].role, ReferenceRole::Character);
    assert_eq!(references[1].role, ReferenceRole::Style);

    let client = RecordingClient::default();
    let prompt = compile_prompt(&project, intro);
    dispatch(&client, &prompt, &references).unwrap();
    let calls = client.calls.borrow();
    assert_eq!(calls[0].1, 2);
    assert!(calls[0].0.contains("STYLE REFERENCE"));
}

#[test]
fn test_structure_outline_drives_prompts() {
    let client = RecordingClient::default();
    let outline = client.generate_structure("朝の習慣について").unwrap();

    let mut project = Project::default();
    project.deck.apply_structure(&PostStructure {
        main_slides: vec![MainSlideDraft {
            title: String::new(),
            image_desc: "朝日が差し込む部屋".to_string(),
            text: "早起きは三文の徳".to_string(),
        }],
        ..outline
    });

    assert_eq!(project.deck.len(), 4);
    let main = project.deck.slide(2).unwrap();
    assert_eq!(main.label(), "3. ページ 1");
    let prompt = compile_prompt(&project, main);
    assert!(prompt.contains("朝日が差し込む部屋"));
    assert!(compile_prompt(&project, project.deck.slide(0).unwrap()).contains("朝活のすすめ"));
}

#[test]
fn test_exported_directory_seeds_next_run() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let deck = Deck::default();
    let mut store = ResultStore::new();
    store.insert(0, ImageData::new("image/png", PNG.to_vec()));
    store.insert(3, ImageData::new("image/png", PNG.to_vec()));

    let written = export_directory(&deck, &store, dir.path()).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["slide_01_cover.png", "slide_04_main_2.png"]);

    let reloaded = ResultStore::load_exported(dir.path()).unwrap();
    assert_eq!(reloaded, store);
}

#[test]
fn test_untyped_section_background_keeps_global_frame() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("feed.json");
    fs::write(
        &path,
        r#"{"design":{"background":{"type":"frame"}},
            "deck":{"intro":{"text":"導入","background":{"type":null,"description":"和紙の質感"}}}}"#,
    )
    .expect("Failed to write project");

    let project = Project::from_file(&path).unwrap();
    let prompt = compile_prompt(&project, project.deck.slide(1).unwrap());
    assert!(prompt.contains("thick decorative border frame"));
    assert!(prompt.contains("和紙の質感"));
}
