use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use futures::StreamExt;
use reqwest::{
    multipart::{Form, Part},
    Body,
};

use crate::{
    entities::{form_file::FormFile, knitting_form::KnittingForm},
    errors::AppError,
};

/// Cumulative bytes handed to the transport for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Whole percent, rounded. `None` while the total is unknown.
    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let percent = ((self.loaded as f64 * 100.0) / self.total as f64).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

struct ProgressTracker {
    loaded: AtomicU64,
    total: u64,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    fn advance(&self, bytes: u64) {
        let loaded = self.loaded.fetch_add(bytes, Ordering::AcqRel) + bytes;
        if let Some(callback) = &self.callback {
            callback(UploadProgress {
                loaded,
                total: self.total,
            });
        }
    }
}

/// Text fields and files of one multipart submission.
#[derive(Debug, Clone)]
pub struct MultipartPayload {
    pub text: Vec<(&'static str, String)>,
    pub files: Vec<(&'static str, FormFile)>,
}

impl MultipartPayload {
    pub fn from_form(form: &KnittingForm) -> Self {
        MultipartPayload {
            text: form.text_parts(),
            files: form
                .attachments
                .parts()
                .into_iter()
                .map(|(name, file)| (name, file.clone()))
                .collect(),
        }
    }

    pub fn file_bytes(&self) -> u64 {
        self.files.iter().map(|(_, file)| file.len()).sum()
    }

    pub fn part_names(&self) -> Vec<&'static str> {
        self.text
            .iter()
            .map(|(name, _)| *name)
            .chain(self.files.iter().map(|(name, _)| *name))
            .collect()
    }

    /// Builds the request body. File parts are streamed in `chunk_size`
    /// pieces and every piece read by the transport is reported.
    pub fn into_form(
        self,
        chunk_size: usize,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Form, AppError> {
        let tracker = Arc::new(ProgressTracker {
            loaded: AtomicU64::new(0),
            total: self.file_bytes(),
            callback: on_progress,
        });
        let chunk_size = chunk_size.max(1);

        let mut form = Form::new();
        for (name, value) in self.text {
            form = form.text(name, value);
        }
        for (name, file) in self.files {
            form = form.part(name, file_part(&file, chunk_size, Arc::clone(&tracker))?);
        }
        Ok(form)
    }
}

fn file_part(
    file: &FormFile,
    chunk_size: usize,
    tracker: Arc<ProgressTracker>,
) -> Result<Part, AppError> {
    let bytes = file.bytes();
    let len = bytes.len();

    let chunks = futures::stream::iter((0..len).step_by(chunk_size)).map(move |start| {
        let end = (start + chunk_size).min(len);
        let chunk = bytes[start..end].to_vec();
        tracker.advance(chunk.len() as u64);
        Ok::<_, std::io::Error>(chunk)
    });

    let part = Part::stream_with_length(Body::wrap_stream(chunks), len as u64)
        .file_name(file.file_name.clone())
        .mime_str(&file.mime)?;
    Ok(part)
}
