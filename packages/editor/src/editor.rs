//! The embeddable editor: store, drag engine and renderer behind one handle.

use crate::config::EditorConfig;
use crate::drag::{BoundsProvider, DragEngine, DragFeedback, DragPayload, DropOutcome, FrameRequest, Point};
use crate::errors::EditorError;
use crate::storage::{StorageError, StorageProvider, UploadFile};
use crate::store::EditorStore;
use mailbuilder_blocks::{BlockKind, EmailData, EmailMetadata};
use mailbuilder_common::{load_email_data, save_email_data, Bindings, FileSystem};
use mailbuilder_compiler_html::{compile_to_html, RenderOptions};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rendered document plus the file name to save it under
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedHtml {
    pub file_name: String,
    pub html: String,
}

#[derive(Debug, Default)]
pub struct MailBuilder {
    store: EditorStore,
    drag: DragEngine,
    metadata: EmailMetadata,
    /// Preview values layered over variable defaults
    overrides: Bindings,
}

impl MailBuilder {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: EditorStore::new(config),
            drag: DragEngine::new(),
            metadata: EmailMetadata::now(),
            overrides: Bindings::new(),
        }
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EditorStore {
        &mut self.store
    }

    pub fn config(&self) -> &EditorConfig {
        self.store.config()
    }

    // ---- rendering ----

    /// Variable defaults, then preview overrides
    pub fn bindings(&self) -> Bindings {
        let mut bindings = Bindings::from_variables(&self.store.state().variables);
        bindings.merge(self.overrides.iter());
        bindings
    }

    pub fn set_variable_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides.merge(values);
    }

    pub fn clear_variable_values(&mut self) {
        self.overrides = Bindings::new();
    }

    pub fn get_html(&self) -> String {
        self.get_html_with(self.config().render.clone())
    }

    pub fn get_html_with(&self, options: RenderOptions) -> String {
        let state = self.store.state();
        compile_to_html(&state.blocks, &state.email_styles, &self.bindings(), options)
    }

    /// Always a complete document, whatever the configured options
    pub fn preview_html(&self) -> String {
        self.get_html_with(RenderOptions {
            full_document: true,
            ..self.config().render.clone()
        })
    }

    pub fn export_html(&self) -> ExportedHtml {
        let file_name = self.config().export_file_name.clone();
        let html = self.preview_html();
        info!(%file_name, bytes = html.len(), "exported html");
        ExportedHtml { file_name, html }
    }

    // ---- persistence ----

    pub fn load_data(&mut self, data: EmailData) {
        info!(
            blocks = data.blocks.len(),
            variables = data.variables.len(),
            "loading email data"
        );
        self.drag.cancel(&mut self.store);
        self.metadata = data.metadata.clone();
        self.store.load_data(data);
    }

    /// Current template, `updatedAt` set to now
    pub fn get_data(&self) -> EmailData {
        let mut data = self.store.to_data();
        data.metadata = self.metadata.clone();
        data.metadata.touch();
        data
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let data = EmailData::from_json(json)?;
        self.load_data(data);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(self.get_data().to_json_pretty()?)
    }

    pub fn open(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<(), EditorError> {
        let data = load_email_data(fs, path)?;
        self.load_data(data);
        Ok(())
    }

    /// Write the template and mark the editor clean
    pub fn save(&mut self, fs: &mut dyn FileSystem, path: &Path) -> Result<(), EditorError> {
        let data = self.get_data();
        save_email_data(fs, path, &data)?;
        self.metadata = data.metadata;
        self.store.mark_saved();
        info!(path = %path.display(), "saved email data");
        Ok(())
    }

    // ---- drag and drop ----

    pub fn start_drag(&mut self, payload: DragPayload, bounds: &dyn BoundsProvider, origin: Point) -> bool {
        self.drag.start(&mut self.store, payload, bounds, origin)
    }

    pub fn drag_move(&mut self, point: Point) -> FrameRequest {
        self.drag.pointer_move(point)
    }

    pub fn drag_frame(&mut self) {
        self.drag.on_animation_frame(&mut self.store);
    }

    pub fn drop_at(&mut self, point: Option<Point>) -> DropOutcome {
        self.drag.drop(&mut self.store, point)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel(&mut self.store);
    }

    pub fn drag_left_viewport(&mut self) {
        self.drag.pointer_left_viewport(&mut self.store);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_feedback(&self) -> &DragFeedback {
        self.drag.feedback()
    }

    // ---- assets ----

    /// Upload an image and point an image or logo block at it.
    ///
    /// The block is only touched once the provider returns a URL.
    pub fn upload_image(
        &mut self,
        block_id: &str,
        provider: &mut dyn StorageProvider,
        file: UploadFile,
    ) -> Result<String, EditorError> {
        let block = self
            .store
            .get_block_by_id(block_id)
            .ok_or_else(|| EditorError::BlockNotFound(block_id.to_string()))?;
        if !matches!(block.kind, BlockKind::Image { .. } | BlockKind::Logo { .. }) {
            return Err(EditorError::NotAnImage(block_id.to_string()));
        }
        if !file.is_image() {
            return Err(StorageError::UnsupportedType(file.content_type).into());
        }

        let uploaded = provider.upload(file, None).map_err(|err| {
            warn!(block_id, %err, "image upload failed");
            err
        })?;
        let url = uploaded.url;

        self.store.update_block_with(block_id, |block| match &mut block.kind {
            BlockKind::Image { src, .. } | BlockKind::Logo { src, .. } => *src = url.clone(),
            _ => {}
        });
        debug!(block_id, %url, "image source updated");
        Ok(url)
    }

    /// Tear down: cancel any drag and reset the store
    pub fn destroy(&mut self) {
        self.drag.cancel(&mut self.store);
        self.store.reset();
        self.overrides = Bindings::new();
        self.metadata = EmailMetadata::now();
        debug!("editor destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use mailbuilder_blocks::{create_image, create_text, EmailStyles, Variable};
    use mailbuilder_common::MockFileSystem;
    use serde_json::json;

    struct FailingStorage;

    impl StorageProvider for FailingStorage {
        fn upload(&mut self, _file: UploadFile, _path: Option<&str>) -> Result<crate::storage::UploadResult, StorageError> {
            Err(StorageError::Backend("bucket unavailable".to_string()))
        }

        fn delete(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::NotFound(key.to_string()))
        }

        fn list(&self, _prefix: Option<&str>) -> Result<Vec<crate::storage::StoredObject>, StorageError> {
            Ok(Vec::new())
        }

        fn get_url(&self, key: &str) -> String {
            key.to_string()
        }

        fn get_signed_url(&self, key: &str, _expires_in: Option<u64>) -> Result<String, StorageError> {
            Err(StorageError::NotFound(key.to_string()))
        }
    }

    fn png() -> UploadFile {
        UploadFile::new("photo.png", "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_preview_values_override_defaults() {
        let mut editor = MailBuilder::default();
        editor.load_data(EmailData::new(
            vec![create_text(Some(json!({ "content": "Hi {{ first_name }}" }))).unwrap()],
            EmailStyles::default(),
            vec![Variable::new("v1", "First name", "first_name", "friend")],
        ));

        assert!(editor.get_html().contains("Hi friend"));

        editor.set_variable_values([("first_name", "Ada")]);
        assert!(editor.get_html().contains("Hi Ada"));

        editor.clear_variable_values();
        assert!(editor.get_html().contains("Hi friend"));
    }

    #[test]
    fn test_export_is_full_document() {
        let config = EditorConfig {
            render: RenderOptions::fragment(),
            ..Default::default()
        };
        let editor = MailBuilder::new(config);

        assert!(!editor.get_html().contains("<html"));

        let exported = editor.export_html();
        assert_eq!(exported.file_name, "email-template.html");
        assert!(exported.html.contains("<html"));
    }

    #[test]
    fn test_json_round_trip_keeps_created_at() {
        let mut editor = MailBuilder::default();
        editor.store_mut().add_block(create_text(None).unwrap(), None, None);
        let json = editor.to_json().unwrap();
        let created_at = editor.get_data().metadata.created_at;

        let mut other = MailBuilder::default();
        other.load_json(&json).unwrap();

        assert_eq!(other.store().blocks(), editor.store().blocks());
        assert_eq!(other.get_data().metadata.created_at, created_at);
        assert!(!other.store().state().is_dirty);
        assert!(!other.store().can_undo());
    }

    #[test]
    fn test_load_json_rejects_garbage() {
        let mut editor = MailBuilder::default();
        assert!(matches!(editor.load_json("{ nope"), Err(EditorError::Json(_))));
    }

    #[test]
    fn test_save_and_open_through_file_system() {
        let mut fs = MockFileSystem::new();
        let path = Path::new("templates/welcome.json");

        let mut editor = MailBuilder::default();
        editor.store_mut().add_block(create_text(None).unwrap(), None, None);
        assert!(editor.store().state().is_dirty);

        editor.save(&mut fs, path).unwrap();
        assert!(!editor.store().state().is_dirty);

        let mut reopened = MailBuilder::default();
        reopened.open(&fs, path).unwrap();
        assert_eq!(reopened.store().blocks(), editor.store().blocks());

        assert!(matches!(
            reopened.open(&fs, Path::new("missing.json")),
            Err(EditorError::Common(_))
        ));
    }

    #[test]
    fn test_upload_image_sets_src() {
        let mut editor = MailBuilder::default();
        let image = create_image(None).unwrap();
        let image_id = image.id.clone();
        editor.store_mut().add_block(image, None, None);

        let mut storage = MemoryStorage::new("https://cdn.example.com");
        let url = editor.upload_image(&image_id, &mut storage, png()).unwrap();

        assert!(url.starts_with("https://cdn.example.com/uploads/"));
        match &editor.store().get_block_by_id(&image_id).unwrap().kind {
            BlockKind::Image { src, .. } => assert_eq!(src, &url),
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_failed_upload_leaves_block_untouched() {
        let mut editor = MailBuilder::default();
        let image = create_image(Some(json!({ "src": "https://old.example.com/a.png" }))).unwrap();
        let image_id = image.id.clone();
        editor.store_mut().add_block(image.clone(), None, None);
        let version = editor.store().version();

        let err = editor
            .upload_image(&image_id, &mut FailingStorage, png())
            .unwrap_err();

        assert!(matches!(err, EditorError::Storage(StorageError::Backend(_))));
        assert_eq!(editor.store().get_block_by_id(&image_id), Some(&image));
        assert_eq!(editor.store().version(), version);
    }

    #[test]
    fn test_upload_rejects_non_image_targets() {
        let mut editor = MailBuilder::default();
        let text = create_text(None).unwrap();
        let text_id = text.id.clone();
        let image = create_image(None).unwrap();
        let image_id = image.id.clone();
        editor.store_mut().set_blocks(vec![text, image]);
        let mut storage = MemoryStorage::default();

        assert!(matches!(
            editor.upload_image(&text_id, &mut storage, png()),
            Err(EditorError::NotAnImage(_))
        ));
        assert!(matches!(
            editor.upload_image("missing", &mut storage, png()),
            Err(EditorError::BlockNotFound(_))
        ));
        assert!(matches!(
            editor.upload_image(
                &image_id,
                &mut storage,
                UploadFile::new("notes.txt", "text/plain", vec![1])
            ),
            Err(EditorError::Storage(StorageError::UnsupportedType(_)))
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_destroy_resets_everything() {
        let mut editor = MailBuilder::default();
        editor.store_mut().add_block(create_text(None).unwrap(), None, None);
        editor.set_variable_values([("first_name", "Ada")]);

        editor.destroy();

        assert!(editor.store().blocks().is_empty());
        assert!(!editor.store().can_undo());
        assert!(editor.bindings().is_empty());
    }
}
