use feed_slides::model::{BackgroundKind, BackgroundOverride};
use feed_slides::{
    BatchHandle, BatchOptions, FeedError, GenerationClient, Generator, ImageData, PostStructure,
    Project, Result, ResultStore, RunState, SlideStatus,
};
use std::cell::RefCell;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn image(byte: u8) -> ImageData {
    ImageData::new("image/png", vec![byte])
}

fn no_pacing() -> BatchOptions {
    BatchOptions {
        pacing: Duration::ZERO,
    }
}

/// Mock client recording the reference count of every call. Calls are numbered
/// from 0; the returned image carries that number.
#[derive(Default)]
struct MockClient {
    calls: RefCell<Vec<usize>>,
    fail_on: Option<usize>,
    cancel_on: Option<(usize, BatchHandle)>,
    no_credential: bool,
}

impl MockClient {
    fn record(&self, reference_count: usize) -> Result<ImageData> {
        let call = self.calls.borrow().len();
        self.calls.borrow_mut().push(reference_count);
        if let Some((at, handle)) = &self.cancel_on {
            if *at == call {
                handle.cancel();
            }
        }
        if self.fail_on == Some(call) {
            return Err(FeedError::GenerationFailed("No image was returned".to_string()));
        }
        Ok(image(100 + call as u8))
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl GenerationClient for MockClient {
    fn ensure_credential(&self) -> Result<()> {
        if self.no_credential {
            Err(FeedError::MissingCredential)
        } else {
            Ok(())
        }
    }

    fn generate_image(&self, _: &str) -> Result<ImageData> {
        self.record(0)
    }

    fn generate_image_with_reference(&self, _: &str, _: &ImageData) -> Result<ImageData> {
        self.record(1)
    }

    fn generate_image_with_references(&self, _: &str, refs: &[&ImageData]) -> Result<ImageData> {
        self.record(refs.len())
    }

    fn generate_structure(&self, _: &str) -> Result<PostStructure> {
        Err(FeedError::StructureParseFailed("not used".to_string()))
    }
}

#[test]
fn test_full_run_generates_every_slide_in_order() {
    let project = Project::default();
    let generator = Generator::new(MockClient::default(), no_pacing());

    let report = generator.run_batch(&project).unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.generated, (0..project.deck.len()).collect::<Vec<_>>());
    assert_eq!(generator.client().call_count(), project.deck.len());

    let snapshot = generator.handle().snapshot();
    assert_eq!(snapshot.run, RunState::Completed);
    assert!(snapshot.statuses.values().all(|s| *s == SlideStatus::Done));
    assert_eq!(snapshot.previewing, Some(project.deck.len() - 1));

    let results = generator.results();
    for index in 0..project.deck.len() {
        assert_eq!(results.get(index), Some(&image(100 + index as u8)));
    }
}

#[test]
fn test_entry_point_follows_reference_count() {
    let mut project = Project::default();
    project.deck.intro.section.character_image = Some(image(1));
    project.deck.mains[0].section.character_image = Some(image(2));
    project.deck.mains[0].section.style_reference = Some(image(3));
    project.deck.summary.section.character_image = Some(image(4));
    project.deck.summary.section.style_reference = Some(image(5));
    project.deck.summary.section.background = Some(BackgroundOverride {
        kind: Some(BackgroundKind::Image),
        image: Some(image(6)),
        ..BackgroundOverride::default()
    });

    let generator = Generator::new(MockClient::default(), no_pacing());
    generator.run_batch(&project).unwrap();

    // cover, intro, three mains, summary
    assert_eq!(*generator.client().calls.borrow(), vec![0, 1, 2, 0, 0, 3]);
}

#[test]
fn test_done_slides_are_skipped_and_kept() {
    let project = Project::default();
    let mut seeded = ResultStore::new();
    seeded.insert(1, image(7));
    let generator = Generator::new(MockClient::default(), no_pacing()).with_results(seeded);

    let report = generator.run_batch(&project).unwrap();

    assert_eq!(report.skipped, vec![1]);
    assert_eq!(generator.client().call_count(), project.deck.len() - 1);
    assert_eq!(generator.results().get(1), Some(&image(7)));
    assert_eq!(generator.handle().status(1), Some(SlideStatus::Done));
}

#[test]
fn test_cancel_stops_before_next_slide() {
    let project = Project::default();
    let handle = BatchHandle::new();
    let client = MockClient {
        cancel_on: Some((2, handle.clone())),
        ..MockClient::default()
    };
    let generator = Generator::with_handle(client, no_pacing(), handle.clone());

    let report = generator.run_batch(&project).unwrap();

    assert_eq!(report.state, RunState::Cancelled);
    assert_eq!(generator.client().call_count(), 3);
    assert_eq!(handle.run_state(), RunState::Cancelled);
    for index in 0..3 {
        assert_eq!(handle.status(index), Some(SlideStatus::Done));
    }
    for index in 3..project.deck.len() {
        assert_eq!(handle.status(index), Some(SlideStatus::Pending));
    }

    // A new run resumes with the remaining slides only.
    let report = generator.run_batch(&project).unwrap();
    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.skipped, vec![0, 1, 2]);
    assert_eq!(generator.client().call_count(), project.deck.len());
}

#[test]
fn test_failed_slide_does_not_stop_the_run() {
    let project = Project::default();
    let client = MockClient {
        fail_on: Some(1),
        ..MockClient::default()
    };
    let generator = Generator::new(client, no_pacing());

    let report = generator.run_batch(&project).unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.failed, vec![1]);
    assert_eq!(generator.client().call_count(), project.deck.len());

    let snapshot = generator.handle().snapshot();
    assert_eq!(snapshot.statuses[&1], SlideStatus::Error);
    assert!(snapshot.errors[&1].contains("No image was returned"));
    assert_eq!(snapshot.statuses[&2], SlideStatus::Done);
    assert!(!generator.results().contains(1));
    assert_eq!(generator.results().len(), project.deck.len() - 1);
}

#[test]
fn test_missing_credential_makes_no_calls() {
    let project = Project::default();
    let client = MockClient {
        no_credential: true,
        ..MockClient::default()
    };
    let generator = Generator::new(client, no_pacing());

    assert!(matches!(
        generator.run_batch(&project),
        Err(FeedError::MissingCredential)
    ));
    assert!(matches!(
        generator.generate_single(&project, 0),
        Err(FeedError::MissingCredential)
    ));
    assert_eq!(generator.client().call_count(), 0);
    assert_eq!(generator.handle().run_state(), RunState::Idle);
    assert!(generator.handle().snapshot().statuses.is_empty());
}

#[test]
fn test_single_generation_overwrites() {
    let project = Project::default();
    let mut seeded = ResultStore::new();
    seeded.insert(0, image(7));
    let generator = Generator::new(MockClient::default(), no_pacing()).with_results(seeded);

    generator.generate_single(&project, 0).unwrap();

    assert_eq!(generator.client().call_count(), 1);
    assert_eq!(generator.results().get(0), Some(&image(100)));
    assert_eq!(generator.handle().status(0), Some(SlideStatus::Done));

    assert!(matches!(
        generator.generate_single(&project, 42),
        Err(FeedError::SlideNotFound(42))
    ));
    assert_eq!(generator.client().call_count(), 1);
}

#[test]
fn test_single_generation_failure_is_reported() {
    let project = Project::default();
    let client = MockClient {
        fail_on: Some(0),
        ..MockClient::default()
    };
    let generator = Generator::new(client, no_pacing());

    assert!(matches!(
        generator.generate_single(&project, 3),
        Err(FeedError::GenerationFailed(_))
    ));
    assert_eq!(generator.handle().status(3), Some(SlideStatus::Error));
    assert!(generator.results().is_empty());
}

#[test]
fn test_pacing_between_slides() {
    let project = Project::default();
    let pacing = Duration::from_millis(20);
    let generator = Generator::new(MockClient::default(), BatchOptions { pacing });

    let start = Instant::now();
    generator.run_batch(&project).unwrap();

    let waits = project.deck.len() as u32 - 1;
    assert!(start.elapsed() >= pacing * waits);
}

#[test]
fn test_each_generated_slide_is_handed_off_before_the_next() {
    let project = Project::default();
    let handle = BatchHandle::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let observer = handle.clone();
    let log = Arc::clone(&seen);
    let mut done = ResultStore::new();
    done.insert(1, image(1));
    let generator = Generator::with_handle(
        MockClient {
            fail_on: Some(2),
            ..MockClient::default()
        },
        no_pacing(),
        handle,
    )
    .with_results(done)
    .with_on_slide_done(move |index, image| {
        assert_eq!(observer.status(index), Some(SlideStatus::Generating));
        assert!(!observer.results().contains(index));
        log.lock().unwrap().push((index, image.data[0]));
        if index == 0 {
            return Err(FeedError::ExportError("disk full".to_string()));
        }
        Ok(())
    });

    let report = generator.run_batch(&project).unwrap();

    // Slide 2 was skipped and slide 4 (third call) failed
    assert_eq!(report.failed, vec![3]);
    assert_eq!(report.generated, vec![0, 2, 4, 5]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(0, 100), (2, 101), (4, 103), (5, 104)]
    );
    // A failing hand-off keeps the image
    assert!(generator.results().contains(0));

    generator.generate_single(&project, 1).unwrap();
    assert_eq!(seen.lock().unwrap().last(), Some(&(1, 105)));
}
