use mailbuilder_blocks::{create_block, patch_from_value, EmailData};
use mailbuilder_compiler_html::{compile_email, RenderOptions};
use mailbuilder_editor::{
    DragPayload, DropOutcome, EditorConfig, FrameRequest, MailBuilder, Mutation, Point, Rect,
};
use mailbuilder_linter::{lint_blocks, LintOptions};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn parse_json<T: serde::de::DeserializeOwned>(context: &str, json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(context, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

fn outcome_json(outcome: &DropOutcome) -> Value {
    match outcome {
        DropOutcome::Added { block_id } => json!({ "status": "added", "blockId": block_id }),
        DropOutcome::Moved { block_id } => json!({ "status": "moved", "blockId": block_id }),
        DropOutcome::Unchanged => json!({ "status": "unchanged" }),
        DropOutcome::Rejected(err) => json!({ "status": "rejected", "reason": err.to_string() }),
        DropOutcome::NoTarget => json!({ "status": "noTarget" }),
    }
}

/// Editor handle for a browser host. Structured values cross the boundary
/// as JSON strings.
#[wasm_bindgen]
pub struct Editor {
    inner: MailBuilder,
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor, optionally from an `EditorConfig` JSON object
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Editor, JsValue> {
        let config = match config_json {
            Some(json) => parse_json::<EditorConfig>("Config error", &json)?,
            None => EditorConfig::default(),
        };
        Ok(Editor {
            inner: MailBuilder::new(config),
        })
    }

    // ---- persistence ----

    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.inner.load_json(json).map_err(|e| js_error("Load error", e))
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.inner.to_json().map_err(|e| js_error("Save error", e))
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.inner.store().state().is_dirty
    }

    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.inner.store_mut().mark_saved();
    }

    pub fn version(&self) -> f64 {
        self.inner.store().version() as f64
    }

    /// Current top-level blocks as a JSON array
    pub fn blocks(&self) -> Result<String, JsValue> {
        to_json(&self.inner.store().blocks())
    }

    // ---- rendering ----

    #[wasm_bindgen(js_name = getHtml)]
    pub fn get_html(&self) -> String {
        self.inner.get_html()
    }

    #[wasm_bindgen(js_name = previewHtml)]
    pub fn preview_html(&self) -> String {
        self.inner.preview_html()
    }

    /// `{ fileName, html }`
    #[wasm_bindgen(js_name = exportHtml)]
    pub fn export_html(&self) -> Result<String, JsValue> {
        to_json(&self.inner.export_html())
    }

    /// Preview values from a `{ key: value }` JSON object
    #[wasm_bindgen(js_name = setVariableValues)]
    pub fn set_variable_values(&mut self, values_json: &str) -> Result<(), JsValue> {
        let values: BTreeMap<String, String> = parse_json("Variables error", values_json)?;
        self.inner.set_variable_values(values);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearVariableValues)]
    pub fn clear_variable_values(&mut self) {
        self.inner.clear_variable_values();
    }

    // ---- mutations ----

    /// Apply a serialized `Mutation`, returning `{ version, changed }`
    pub fn apply(&mut self, mutation_json: &str) -> Result<String, JsValue> {
        let mutation: Mutation = parse_json("Mutation error", mutation_json)?;
        let result = self
            .inner
            .store_mut()
            .apply(mutation)
            .map_err(|e| js_error("Mutation rejected", e))?;
        Ok(json!({ "version": result.version, "changed": result.changed }).to_string())
    }

    /// Create a block of `block_type` and insert it; returns the new id
    #[wasm_bindgen(js_name = addBlock)]
    pub fn add_block(
        &mut self,
        block_type: &str,
        overrides_json: Option<String>,
        index: Option<u32>,
        parent_column_id: Option<String>,
    ) -> Result<Option<String>, JsValue> {
        let overrides = overrides_json
            .map(|json| parse_json::<Value>("Overrides error", &json))
            .transpose()?;
        let block = create_block(block_type, overrides).map_err(|e| js_error("Block error", e))?;
        let block_id = block.id.clone();

        let added = self.inner.store_mut().add_block(
            block,
            index.map(|i| i as usize),
            parent_column_id.as_deref(),
        );
        Ok(added.then_some(block_id))
    }

    #[wasm_bindgen(js_name = updateBlock)]
    pub fn update_block(&mut self, block_id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let value: Value = parse_json("Patch error", patch_json)?;
        let patch = patch_from_value(value).map_err(|e| js_error("Patch error", e))?;
        Ok(self.inner.store_mut().update_block(block_id, patch))
    }

    #[wasm_bindgen(js_name = deleteBlock)]
    pub fn delete_block(&mut self, block_id: &str) -> bool {
        self.inner.store_mut().delete_block(block_id)
    }

    #[wasm_bindgen(js_name = moveBlock)]
    pub fn move_block(&mut self, block_id: &str, to_index: u32, parent_column_id: Option<String>) -> bool {
        self.inner
            .store_mut()
            .move_block(block_id, to_index as usize, parent_column_id.as_deref())
    }

    #[wasm_bindgen(js_name = duplicateBlock)]
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        self.inner.store_mut().duplicate_block(block_id)
    }

    /// Block JSON, or `None` for an unknown id
    #[wasm_bindgen(js_name = getBlock)]
    pub fn get_block(&self, block_id: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .store()
            .get_block_by_id(block_id)
            .map(to_json)
            .transpose()
    }

    #[wasm_bindgen(js_name = selectBlock)]
    pub fn select_block(&mut self, block_id: Option<String>) {
        self.inner.store_mut().select_block(block_id.as_deref());
    }

    #[wasm_bindgen(js_name = selectedBlockId)]
    pub fn selected_block_id(&self) -> Option<String> {
        self.inner.store().state().selected_block_id.clone()
    }

    pub fn undo(&mut self) -> bool {
        self.inner.store_mut().undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.store_mut().redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.store().can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.store().can_redo()
    }

    // ---- drag and drop ----

    /// Begin a gesture. `payload_json` is a `DragPayload`, `bounds_json` maps
    /// rendered block and column ids to `{ top, bottom, left, right }`.
    #[wasm_bindgen(js_name = startDrag)]
    pub fn start_drag(&mut self, payload_json: &str, bounds_json: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        let payload: DragPayload = parse_json("Payload error", payload_json)?;
        let bounds: HashMap<String, Rect> = parse_json("Bounds error", bounds_json)?;
        Ok(self.inner.start_drag(payload, &bounds, Point::new(x, y)))
    }

    /// Record the pointer; `true` when the host should request an animation frame
    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.drag_move(Point::new(x, y)) == FrameRequest::Schedule
    }

    #[wasm_bindgen(js_name = dragFrame)]
    pub fn drag_frame(&mut self) {
        self.inner.drag_frame();
    }

    /// Ghost, indicator and highlight state for the current gesture
    #[wasm_bindgen(js_name = dragFeedback)]
    pub fn drag_feedback(&self) -> Result<String, JsValue> {
        to_json(self.inner.drag_feedback())
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Finish the gesture, returning `{ status, blockId?, reason? }`
    pub fn drop(&mut self, x: Option<f64>, y: Option<f64>) -> String {
        let point = x.zip(y).map(|(x, y)| Point::new(x, y));
        outcome_json(&self.inner.drop_at(point)).to_string()
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.inner.cancel_drag();
    }

    #[wasm_bindgen(js_name = dragLeftViewport)]
    pub fn drag_left_viewport(&mut self) {
        self.inner.drag_left_viewport();
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}

/// Render a saved template without an editor instance
#[wasm_bindgen(js_name = renderEmail)]
pub fn render_email(data_json: &str, full_document: bool) -> Result<String, JsValue> {
    let data = EmailData::from_json(data_json).map_err(|e| js_error("Template error", e))?;
    let options = RenderOptions {
        full_document,
        ..Default::default()
    };
    Ok(compile_email(&data, &Default::default(), options))
}

/// Lint a saved template, returning the diagnostics as JSON
#[wasm_bindgen(js_name = lintEmail)]
pub fn lint_email(data_json: &str) -> Result<String, JsValue> {
    let data = EmailData::from_json(data_json).map_err(|e| js_error("Template error", e))?;
    to_json(&lint_blocks(&data, LintOptions::default()))
}

/// A fresh block of the given type, as JSON
#[wasm_bindgen(js_name = createBlock)]
pub fn create_block_js(block_type: &str, overrides_json: Option<String>) -> Result<String, JsValue> {
    let overrides = overrides_json
        .map(|json| parse_json::<Value>("Overrides error", &json))
        .transpose()?;
    let block = create_block(block_type, overrides).map_err(|e| js_error("Block error", e))?;
    to_json(&block)
}
