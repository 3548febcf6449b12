#![allow(dead_code)]

use image::{GrayImage, ImageFormat, Luma};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scansift_core::identity::KeyError;
use scansift_core::{DecisionRecord, Diagnostics, EventSink, SelectionEvent, SkipReason};

/// Collects every event in emission order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SelectionEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SelectionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn records(&self) -> Option<Vec<DecisionRecord>> {
        self.events().into_iter().find_map(|event| match event {
            SelectionEvent::Complete { records, .. } => Some(records),
            _ => None,
        })
    }

    pub fn progress_counts(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SelectionEvent::Progress { processed, .. } => Some(processed),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SelectionEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SelectionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Keeps `(file, reason)` for every skipped JPG and TIFF.
#[derive(Default)]
pub struct RecordingDiagnostics {
    pub skipped: Mutex<Vec<(String, String)>>,
    pub skipped_counterparts: Mutex<Vec<(String, KeyError)>>,
}

impl RecordingDiagnostics {
    pub fn skipped(&self) -> Vec<(String, String)> {
        self.skipped.lock().unwrap().clone()
    }

    pub fn skipped_counterparts(&self) -> Vec<(String, KeyError)> {
        self.skipped_counterparts.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn on_counterpart_skipped(&self, file: &str, reason: &KeyError) {
        self.skipped_counterparts
            .lock()
            .unwrap()
            .push((file.to_string(), reason.clone()));
    }

    fn on_file_skipped(&self, file: &str, reason: &SkipReason) {
        let kind = match reason {
            SkipReason::BadKey(_) => "bad_key",
            SkipReason::NoCounterpart(_) => "no_counterpart",
            SkipReason::Unreadable(_) => "unreadable",
        };
        self.skipped
            .lock()
            .unwrap()
            .push((file.to_string(), kind.to_string()));
    }
}

/// Parent folder with empty `JPG` and `TIF` subfolders.
pub struct ScanFolders {
    pub root: tempfile::TempDir,
    pub jpg: PathBuf,
    pub tif: PathBuf,
}

impl ScanFolders {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let jpg = root.path().join("JPG");
        let tif = root.path().join("TIF");
        fs::create_dir_all(&jpg).unwrap();
        fs::create_dir_all(&tif).unwrap();
        Self { root, jpg, tif }
    }

    /// A 10x10 page where exactly `gray_pixels` samples are mid-gray.
    /// Stored losslessly as PNG under the `.jpg` name so values survive.
    pub fn add_jpg(&self, name: &str, gray_pixels: u32) -> PathBuf {
        let path = self.jpg.join(name);
        write_page(&path, gray_pixels);
        path
    }

    pub fn add_tif(&self, name: &str) -> PathBuf {
        let path = self.tif.join(name);
        write_page(&path, 0);
        path
    }

    pub fn add_raw(&self, dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

fn write_page(path: &Path, gray_pixels: u32) {
    let page = GrayImage::from_fn(10, 10, |x, y| {
        let i = y * 10 + x;
        if i < gray_pixels {
            Luma([128])
        } else if i % 2 == 0 {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    page.save_with_format(path, ImageFormat::Png).unwrap();
}
