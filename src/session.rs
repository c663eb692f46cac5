//! Editing session: the editor wired to persistence and model services.
//!
//! [`Session`] owns the [`Editor`], the [`AnnotationStore`] and a
//! [`DocumentStore`]. Every handled message ends by scheduling debounced
//! saves for the images it changed; [`Session::tick`] flushes due saves and
//! drives completion polling after a frame run. Service failures never roll
//! back the store; they are kept as dismissible [`Notice`]s.

use web_time::Instant;

use crate::bridge::{AssistedBridge, BridgeError, FrameService, SegmentationService};
use crate::config::{DisplayConfig, EditorConfig, PersistenceConfig};
use crate::editor::{Editor, Outcome};
use crate::files::{self, FileRegistry};
use crate::format::{
    ChangePoller, Document, DocumentStore, PendingSave, PersistenceError, PollStatus,
    SaveScheduler, decode, encode, to_text,
};
use crate::message::Message;
use crate::model::ImageKey;
use crate::render::Frame;
use crate::store::AnnotationStore;
use crate::transform::Viewport;

/// Which service a notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSource {
    Persistence,
    Segmentation,
    FrameProcessing,
}

/// A non-fatal failure shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub source: NoticeSource,
    pub message: String,
}

/// Result of [`Session::export`].
#[derive(Debug, Clone)]
pub struct Export {
    pub document: Document,
    pub text: String,
}

pub struct Session<D: DocumentStore> {
    editor: Editor,
    store: AnnotationStore,
    documents: D,
    scheduler: SaveScheduler,
    files: FileRegistry,
    assisted: Option<AssistedBridge>,
    frames: Option<Box<dyn FrameService>>,
    poller: Option<ChangePoller>,
    notices: Vec<Notice>,
    persistence: PersistenceConfig,
    display: DisplayConfig,
}

impl<D: DocumentStore> Session<D> {
    pub fn new(config: &EditorConfig, documents: D) -> Self {
        let scheduler =
            SaveScheduler::new().with_debounce_delay(config.persistence.auto_save_debounce());
        Self {
            editor: Editor::new(config.interaction.clone()),
            store: AnnotationStore::new(),
            documents,
            scheduler,
            files: FileRegistry::new(),
            assisted: None,
            frames: None,
            poller: None,
            notices: Vec::new(),
            persistence: config.persistence.clone(),
            display: config.display.clone(),
        }
    }

    /// Attach an assisted segmentation service.
    pub fn with_segmentation(mut self, service: Box<dyn SegmentationService>) -> Self {
        self.assisted = Some(AssistedBridge::new(service));
        self
    }

    /// Attach a frame processing service.
    pub fn with_frame_service(mut self, service: Box<dyn FrameService>) -> Self {
        self.frames = Some(service);
        self
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut D {
        &mut self.documents
    }

    pub fn scheduler(&self) -> &SaveScheduler {
        &self.scheduler
    }

    pub fn files(&self) -> &FileRegistry {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut FileRegistry {
        &mut self.files
    }

    pub fn assisted(&self) -> Option<&AssistedBridge> {
        self.assisted.as_ref()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn dismiss_all(&mut self) {
        self.notices.clear();
        if let Some(bridge) = self.assisted.as_mut() {
            bridge.dismiss_error();
        }
    }

    /// Display list for the active image.
    pub fn frame(&self) -> Option<Frame> {
        self.editor.frame(&self.store, &self.display)
    }

    /// Original file name behind an image key.
    pub fn file_name(&self, key: &ImageKey) -> String {
        self.files
            .lookup(key.as_str())
            .unwrap_or(key.as_str())
            .to_string()
    }

    /// Process one editor message.
    pub fn handle(&mut self, message: Message, now: Instant) -> Outcome {
        let outcome = self.editor.update(&mut self.store, message);
        if let Outcome::Assisted(request) = &outcome {
            let result = match self.assisted.as_mut() {
                Some(bridge) => bridge.handle(request),
                None => Err(BridgeError::Unavailable),
            };
            if let Err(err) = result {
                self.notify(NoticeSource::Segmentation, err.to_string());
            }
        }
        self.schedule_dirty(now);
        outcome
    }

    /// Make `key` the active image.
    ///
    /// Edits still in flight are committed to the previous image and its
    /// pending save keeps its own key. An image seen for the first time is
    /// loaded from the document store.
    pub fn switch_image(&mut self, key: ImageKey, viewport: Viewport, now: Instant) {
        let first_visit = !self.store.contains(&key);
        self.editor.open_image(&mut self.store, key.clone(), viewport);
        self.schedule_dirty(now);

        let file_name = self.file_name(&key);
        if first_visit {
            self.load_document(&key, &file_name);
        }
        if let Some(bridge) = self.assisted.as_mut() {
            if let Err(err) = bridge.load_image(&file_name) {
                self.notices.push(Notice {
                    source: NoticeSource::Segmentation,
                    message: err.to_string(),
                });
            }
        }
    }

    fn load_document(&mut self, key: &ImageKey, file_name: &str) {
        let base = files::base_name(file_name);
        let document = match self.documents.fetch(base) {
            Ok(Some(document)) => document,
            Ok(None) => {
                log::debug!("No saved document for {}", base);
                return;
            }
            Err(err) => {
                self.notify(NoticeSource::Persistence, format!("Failed to load {}: {}", base, err));
                return;
            }
        };
        match decode(&document, key) {
            Ok(polygons) => {
                log::info!("Loaded {} polygon(s) for {}", polygons.len(), key);
                self.store.set_polygons(key, polygons);
                self.store.mark_clean(key);
            }
            Err(err) => {
                self.notify(NoticeSource::Persistence, format!("Failed to read {}: {}", base, err));
            }
        }
    }

    /// Snapshot every modified image into the save scheduler.
    fn schedule_dirty(&mut self, now: Instant) {
        for key in self.store.take_dirty() {
            let file_name = self.file_name(&key);
            let document = encode(&file_name, self.store.get_polygons(&key));
            let base = files::base_name(&file_name).to_string();
            self.scheduler.schedule(key, base, document, now);
        }
    }

    /// Advance timers: flush due saves and poll for frame results.
    pub fn tick(&mut self, now: Instant) {
        self.schedule_dirty(now);
        for save in self.scheduler.take_due(now) {
            // Failures are already recorded as notices
            let _ = self.write(save, now);
        }
        self.poll(now);
    }

    fn write(&mut self, save: PendingSave, now: Instant) -> Result<(), PersistenceError> {
        match self.documents.save(&save.base_name, &save.document) {
            Ok(()) => {
                log::info!(
                    "Saved {} ({} instance(s)) to {}",
                    save.base_name,
                    save.document.instance_count(),
                    self.documents.display_name()
                );
                self.scheduler.mark_saved(now);
                Ok(())
            }
            Err(err) => {
                self.scheduler.mark_save_failed();
                self.notify(
                    NoticeSource::Persistence,
                    format!("Failed to save {}: {}", save.base_name, err),
                );
                Err(err)
            }
        }
    }

    /// Save the active image immediately, bypassing the debounce.
    ///
    /// Saves of other images stay pending. Does nothing without an image.
    pub fn force_save(&mut self, now: Instant) -> Result<(), PersistenceError> {
        self.schedule_dirty(now);
        let Some(key) = self.editor.image_key().cloned() else {
            return Ok(());
        };
        let save = match self.scheduler.take(&key) {
            Some(save) => save,
            None => {
                let file_name = self.file_name(&key);
                PendingSave {
                    base_name: files::base_name(&file_name).to_string(),
                    document: encode(&file_name, self.store.get_polygons(&key)),
                    key,
                    due_at: now,
                    superseded: 0,
                }
            }
        };
        self.write(save, now)
    }

    /// Force-save the active image and return its document and text dump.
    pub fn export(&mut self, now: Instant) -> Result<Option<Export>, PersistenceError> {
        self.force_save(now)?;
        let Some(key) = self.editor.image_key() else {
            return Ok(None);
        };
        let document = encode(&self.file_name(key), self.store.get_polygons(key));
        let text = to_text(&document);
        Ok(Some(Export { document, text }))
    }

    /// Hand the active image's frame to the frame processing service and
    /// start polling for its results.
    pub fn run_frame(&mut self, now: Instant) -> Result<(), BridgeError> {
        let Some(key) = self.editor.image_key().cloned() else {
            return Ok(());
        };
        if self.frames.is_none() {
            self.notify(NoticeSource::FrameProcessing, BridgeError::Unavailable.to_string());
            return Err(BridgeError::Unavailable);
        }

        let frame = files::frame_number(&self.file_name(&key));
        if let Err(err) = self.force_save(now) {
            log::warn!("Running frame {} without a fresh save: {}", frame, err);
        }

        let baseline = self.documents.list_all().unwrap_or_else(|err| {
            log::warn!("Could not list documents before running frame: {}", err);
            Vec::new()
        });

        let result = match self.frames.as_mut() {
            Some(service) => {
                log::info!("Running frame {} on {}", frame, service.display_name());
                service.run_frame(frame)
            }
            None => Err(BridgeError::Unavailable),
        };
        if let Err(err) = result {
            self.notify(NoticeSource::FrameProcessing, format!("Failed to run model: {}", err));
            return Err(err);
        }

        self.poller = Some(ChangePoller::new(
            baseline,
            now,
            self.persistence.poll_interval(),
            self.persistence.poll_timeout(),
        ));
        Ok(())
    }

    fn poll(&mut self, now: Instant) {
        let Some(poller) = self.poller.as_mut() else {
            return;
        };
        if !poller.is_due(now) {
            return;
        }
        let status = match self.documents.list_all() {
            Ok(listing) => poller.observe(now, listing),
            Err(err) => {
                log::error!("Polling: {}", err);
                poller.poll_failed(now)
            }
        };
        match status {
            PollStatus::Waiting => {}
            PollStatus::Changed(names) => {
                self.poller = None;
                for base in names {
                    self.import(&base);
                }
            }
            PollStatus::TimedOut => {
                self.poller = None;
                self.notify(
                    NoticeSource::FrameProcessing,
                    "Timed out waiting for model results".to_string(),
                );
            }
        }
    }

    /// Load an externally produced document into the store.
    fn import(&mut self, base: &str) {
        let document = match self.documents.fetch(base) {
            Ok(Some(document)) => document,
            Ok(None) => return,
            Err(err) => {
                self.notify(NoticeSource::Persistence, format!("Failed to load {}: {}", base, err));
                return;
            }
        };
        let key = match self.files.url_for_base_name(base) {
            Some(url) => ImageKey::from(url),
            None if !document.image_name.is_empty() => ImageKey::new(document.image_name.clone()),
            None => ImageKey::from(base),
        };
        match decode(&document, &key) {
            Ok(polygons) if polygons.is_empty() => {
                log::debug!("Ignoring empty result document {}", base);
            }
            Ok(polygons) => {
                log::info!("Imported {} polygon(s) for {}", polygons.len(), key);
                self.store.set_polygons(&key, polygons);
                self.store.mark_clean(&key);
            }
            Err(err) => {
                self.notify(NoticeSource::Persistence, format!("Failed to read {}: {}", base, err));
            }
        }
    }

    fn notify(&mut self, source: NoticeSource, message: String) {
        log::error!("{:?}: {}", source, message);
        self.notices.push(Notice { source, message });
    }
}
